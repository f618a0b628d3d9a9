//! Viewer session registry operations.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::error::{Result, RouterError};

/// A registered viewer session (one open tab or window).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Caller-chosen session identifier.
    pub id: String,
    /// Gateway window handle backing this session.
    pub window_id: String,
    /// Route the session is currently displaying.
    pub route: String,
    /// Version of the controller that last claimed this session.
    pub controller_version: String,
    /// Registration timestamp.
    pub registered_at: String,
    /// Last registration or route-change timestamp.
    pub last_seen_at: String,
}

/// Register a session, replacing any prior registration with the same id.
pub async fn register_session(
    pool: &SqlitePool,
    id: &str,
    window_id: &str,
    route: &str,
    controller_version: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (id, window_id, route, controller_version)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            window_id = excluded.window_id,
            route = excluded.route,
            controller_version = excluded.controller_version,
            last_seen_at = datetime('now')
        "#,
    )
    .bind(id)
    .bind(window_id)
    .bind(route)
    .bind(controller_version)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a session by ID.
pub async fn get_session(pool: &SqlitePool, id: &str) -> Result<Session> {
    sqlx::query_as::<_, Session>(
        r#"
        SELECT id, window_id, route, controller_version, registered_at, last_seen_at
        FROM sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| RouterError::NotFound {
        entity: "Session",
        id: id.to_string(),
    })
}

/// Sessions currently displaying `route`, most recently seen first.
pub async fn find_sessions_by_route(pool: &SqlitePool, route: &str) -> Result<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(
        r#"
        SELECT id, window_id, route, controller_version, registered_at, last_seen_at
        FROM sessions
        WHERE route = ?
        ORDER BY last_seen_at DESC, rowid
        "#,
    )
    .bind(route)
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// Record a session's route change.
pub async fn update_route(pool: &SqlitePool, id: &str, route: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET route = ?, last_seen_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(route)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RouterError::NotFound {
            entity: "Session",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Remove a session by ID.
pub async fn remove_session(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RouterError::NotFound {
            entity: "Session",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all registered sessions.
pub async fn list_sessions(pool: &SqlitePool) -> Result<Vec<Session>> {
    let sessions = sqlx::query_as::<_, Session>(
        r#"
        SELECT id, window_id, route, controller_version, registered_at, last_seen_at
        FROM sessions
        ORDER BY registered_at, rowid
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(sessions)
}

/// Stamp every registered session with `controller_version`.
///
/// Called once at daemon startup so existing sessions are controlled by the
/// new version immediately, without re-registering. Returns the number of
/// sessions claimed.
pub async fn claim_sessions(pool: &SqlitePool, controller_version: &str) -> Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE sessions
        SET controller_version = ?
        "#,
    )
    .bind(controller_version)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
