//! Configuration for the alert pipeline.

/// Configuration for the alert pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Feed channel the pipeline joins.
    pub channel: String,

    /// Database table whose INSERTs trigger alerts.
    pub table: String,

    /// In-app destination a notification click routes to.
    pub click_target: String,

    /// Icon shown on the system notification.
    pub icon: Option<String>,

    /// Badge shown on the system notification.
    pub badge: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel: "water-alerts".to_string(),
            table: "water_alerts".to_string(),
            click_target: "/dashboard".to_string(),
            icon: None,
            badge: None,
        }
    }
}

impl PipelineConfig {
    /// Create a config with a non-default click target.
    pub fn with_click_target(click_target: impl Into<String>) -> Self {
        Self {
            click_target: click_target.into(),
            ..Default::default()
        }
    }
}
