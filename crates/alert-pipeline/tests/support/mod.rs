//! Test doubles for the pipeline's device and feed seams.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use alert_pipeline::{
    AlertFeed, DeviceError, Devices, FeedSubscription, Notification, NotificationSurface,
    PermissionState, SirenClip, SpeechSynth, Utterance, Vibrator,
};
use feed_client::{AlertEvent, ChangeFilter, FeedError, SubscriptionId};

/// One recorded device interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    PermissionCheck,
    PermissionRequest,
    Show {
        title: String,
        body: String,
        tag: String,
        renotify: bool,
        click_target: String,
    },
    Vibrate(Vec<u64>),
    Seek(Duration),
    SetVolume(f64),
    Play,
    Pause,
    CancelSpeech,
    Speak {
        text: String,
        pitch: f64,
        rate: f64,
        volume: f64,
    },
}

/// Ordered, timestamped log shared by all fake devices in a test.
#[derive(Default)]
pub struct Recorder {
    log: Mutex<Vec<(Instant, DeviceCall)>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, call: DeviceCall) {
        self.log.lock().unwrap().push((Instant::now(), call));
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn timed(&self) -> Vec<(Instant, DeviceCall)> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls().iter().filter(|call| pred(call)).count()
    }

    pub fn plays(&self) -> usize {
        self.count(|call| matches!(call, DeviceCall::Play))
    }

    pub fn shown_bodies(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::Show { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn spoken_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::Speak { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }
}

/// Notification surface with a scripted permission state.
pub struct FakeSurface {
    recorder: Arc<Recorder>,
    state: Mutex<PermissionState>,
    on_request: PermissionState,
}

impl FakeSurface {
    pub fn granted(recorder: Arc<Recorder>) -> Self {
        Self {
            recorder,
            state: Mutex::new(PermissionState::Granted),
            on_request: PermissionState::Granted,
        }
    }

    pub fn denied(recorder: Arc<Recorder>) -> Self {
        Self {
            recorder,
            state: Mutex::new(PermissionState::Denied),
            on_request: PermissionState::Denied,
        }
    }

    /// Permission not yet decided; a request resolves to `on_request`.
    pub fn undecided(recorder: Arc<Recorder>, on_request: PermissionState) -> Self {
        Self {
            recorder,
            state: Mutex::new(PermissionState::Default),
            on_request,
        }
    }
}

#[async_trait]
impl NotificationSurface for FakeSurface {
    async fn permission_state(&self) -> Result<PermissionState, DeviceError> {
        self.recorder.record(DeviceCall::PermissionCheck);
        Ok(*self.state.lock().unwrap())
    }

    async fn request_permission(&self) -> Result<PermissionState, DeviceError> {
        self.recorder.record(DeviceCall::PermissionRequest);
        *self.state.lock().unwrap() = self.on_request;
        Ok(self.on_request)
    }

    async fn show(&self, notification: Notification) -> Result<(), DeviceError> {
        self.recorder.record(DeviceCall::Show {
            title: notification.title,
            body: notification.body,
            tag: notification.tag,
            renotify: notification.renotify,
            click_target: notification.data.click_target,
        });
        Ok(())
    }
}

/// Siren clip that records calls; optionally refuses to start playback.
pub struct FakeSiren {
    recorder: Arc<Recorder>,
    reject_play: bool,
}

impl FakeSiren {
    pub fn new(recorder: Arc<Recorder>) -> Self {
        Self {
            recorder,
            reject_play: false,
        }
    }

    pub fn rejecting(recorder: Arc<Recorder>) -> Self {
        Self {
            recorder,
            reject_play: true,
        }
    }
}

#[async_trait]
impl SirenClip for FakeSiren {
    async fn seek(&self, position: Duration) -> Result<(), DeviceError> {
        self.recorder.record(DeviceCall::Seek(position));
        Ok(())
    }

    async fn set_volume(&self, volume: f64) -> Result<(), DeviceError> {
        self.recorder.record(DeviceCall::SetVolume(volume));
        Ok(())
    }

    async fn play(&self) -> Result<(), DeviceError> {
        self.recorder.record(DeviceCall::Play);
        if self.reject_play {
            Err(DeviceError::PlaybackRejected(
                "no user gesture yet".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    async fn pause(&self) -> Result<(), DeviceError> {
        self.recorder.record(DeviceCall::Pause);
        Ok(())
    }
}

/// Speech synthesizer that records calls; optionally absent.
pub struct FakeSynth {
    recorder: Arc<Recorder>,
    available: bool,
}

impl FakeSynth {
    pub fn new(recorder: Arc<Recorder>) -> Self {
        Self {
            recorder,
            available: true,
        }
    }

    pub fn unavailable(recorder: Arc<Recorder>) -> Self {
        Self {
            recorder,
            available: false,
        }
    }
}

#[async_trait]
impl SpeechSynth for FakeSynth {
    async fn speak(&self, utterance: Utterance) -> Result<(), DeviceError> {
        if !self.available {
            return Err(DeviceError::Unavailable("no speech synthesis".to_string()));
        }
        self.recorder.record(DeviceCall::Speak {
            text: utterance.text,
            pitch: utterance.pitch,
            rate: utterance.rate,
            volume: utterance.volume,
        });
        Ok(())
    }

    async fn cancel(&self) -> Result<(), DeviceError> {
        if !self.available {
            return Err(DeviceError::Unavailable("no speech synthesis".to_string()));
        }
        self.recorder.record(DeviceCall::CancelSpeech);
        Ok(())
    }
}

/// Vibrator that records the requested pattern.
pub struct FakeVibrator {
    recorder: Arc<Recorder>,
}

impl FakeVibrator {
    pub fn new(recorder: Arc<Recorder>) -> Self {
        Self { recorder }
    }
}

#[async_trait]
impl Vibrator for FakeVibrator {
    async fn vibrate(&self, pattern: &[u64]) -> Result<bool, DeviceError> {
        self.recorder.record(DeviceCall::Vibrate(pattern.to_vec()));
        Ok(true)
    }
}

/// Recording devices with permission granted and every channel working.
pub fn recording_devices(recorder: &Arc<Recorder>) -> Devices {
    Devices {
        notifications: Arc::new(FakeSurface::granted(recorder.clone())),
        siren: Arc::new(FakeSiren::new(recorder.clone())),
        speech: Arc::new(FakeSynth::new(recorder.clone())),
        vibrator: Arc::new(FakeVibrator::new(recorder.clone())),
    }
}

#[derive(Default)]
struct FeedInner {
    next_id: SubscriptionId,
    sources: VecDeque<mpsc::UnboundedReceiver<Result<AlertEvent, FeedError>>>,
    fail_next: bool,
    issued: Vec<SubscriptionId>,
}

/// Feed whose subscriptions are driven by the test through channels.
pub struct ScriptedFeed {
    inner: Mutex<FeedInner>,
    released: Arc<Mutex<Vec<SubscriptionId>>>,
}

impl ScriptedFeed {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(FeedInner {
                next_id: 1,
                ..FeedInner::default()
            }),
            released: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Queue an event source for the next subscribe call.
    pub fn add_source(&self) -> EventSource {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner.lock().unwrap().sources.push_back(rx);
        EventSource { tx }
    }

    /// Make the next subscribe call fail.
    pub fn fail_next_subscribe(&self) {
        self.inner.lock().unwrap().fail_next = true;
    }

    /// Subscription IDs handed out so far.
    pub fn issued(&self) -> Vec<SubscriptionId> {
        self.inner.lock().unwrap().issued.clone()
    }

    /// Subscription IDs that have been unsubscribed.
    pub fn released(&self) -> Vec<SubscriptionId> {
        self.released.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertFeed for ScriptedFeed {
    async fn subscribe(
        &self,
        _channel: &str,
        _filter: ChangeFilter,
    ) -> Result<Box<dyn FeedSubscription>, FeedError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_next {
            inner.fail_next = false;
            return Err(FeedError::Connection("scripted failure".to_string()));
        }
        let rx = inner
            .sources
            .pop_front()
            .ok_or_else(|| FeedError::Connection("no scripted source".to_string()))?;
        let id = inner.next_id;
        inner.next_id += 1;
        inner.issued.push(id);
        Ok(Box::new(ScriptedSubscription {
            id,
            rx,
            released: self.released.clone(),
        }))
    }
}

/// Test-side sender driving one scripted subscription.
pub struct EventSource {
    tx: mpsc::UnboundedSender<Result<AlertEvent, FeedError>>,
}

impl EventSource {
    /// Deliver an event to the subscription.
    pub fn send(
        &self,
        event: AlertEvent,
    ) -> Result<(), mpsc::error::SendError<Result<AlertEvent, FeedError>>> {
        self.tx.send(Ok(event))
    }

    /// Deliver a transport error to the subscription.
    pub fn fail(
        &self,
        error: FeedError,
    ) -> Result<(), mpsc::error::SendError<Result<AlertEvent, FeedError>>> {
        self.tx.send(Err(error))
    }
}

struct ScriptedSubscription {
    id: SubscriptionId,
    rx: mpsc::UnboundedReceiver<Result<AlertEvent, FeedError>>,
    released: Arc<Mutex<Vec<SubscriptionId>>>,
}

#[async_trait]
impl FeedSubscription for ScriptedSubscription {
    fn id(&self) -> SubscriptionId {
        self.id
    }

    async fn next_event(&mut self) -> Option<Result<AlertEvent, FeedError>> {
        self.rx.recv().await
    }

    async fn unsubscribe(&mut self) -> Result<(), FeedError> {
        self.rx.close();
        self.released.lock().unwrap().push(self.id);
        Ok(())
    }
}

/// An alert event carrying only a water level.
pub fn alert(level: f64) -> AlertEvent {
    AlertEvent {
        id: None,
        water_level: level,
        recorded_at: None,
    }
}

/// Let spawned tasks run to idle without advancing the paused clock.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
