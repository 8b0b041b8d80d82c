//! Helper functions shared across the UI layer.

use crate::app::{App, AppEvent, FetchReason, LoadState};
use crate::catalog::MovieSource;
use futures::FutureExt;
use ratatui::layout::Rect;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Run `future`, turning a panic into `Err(message)`.
///
/// Spawned tasks use this so a panic is reported back to the UI as
/// `AppEvent::TaskPanicked` instead of vanishing inside the runtime.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future).catch_unwind().await.map_err(|panic| {
        if let Some(s) = panic.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "panic with non-string payload".to_string()
        }
    })
}

/// Start a background fetch from the configured catalog.
///
/// At most one fetch is in flight; a second request while one is pending is
/// refused with a status message. Returns whether a task was spawned.
pub fn spawn_catalog_fetch(
    app: &mut App,
    reason: FetchReason,
    event_tx: &mpsc::Sender<AppEvent>,
) -> bool {
    if app.is_fetching() {
        app.set_status("Already loading movies");
        return false;
    }

    let catalog = app.catalog.clone();
    let tx = event_tx.clone();
    tracing::info!(source = %catalog.describe(), ?reason, "Spawning catalog fetch");

    app.load_state = LoadState::Loading(reason);
    app.set_status(format!("Loading movies from {}...", catalog.describe()));
    app.needs_redraw = true;

    app.fetch_handle = Some(tokio::spawn(async move {
        let event = match catch_task_panic(catalog.fetch()).await {
            Ok(result) => AppEvent::CatalogLoaded {
                reason,
                result: result.map_err(|e| e.to_string()),
            },
            Err(panic_msg) => {
                tracing::error!(task = "catalog_fetch", error = %panic_msg, "Background task panicked");
                AppEvent::TaskPanicked {
                    task: "catalog_fetch",
                    error: panic_msg,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(error = %e, event = "CatalogLoaded", "Channel send failed (receiver dropped)");
        }
    }));
    true
}

/// A rectangle covering the given percentage of `area`, centered in it.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = area.height.saturating_mul(percent_y) / 100;
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catch_task_panic_passes_value() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_str_payload() {
        let result: Result<(), String> = catch_task_panic(async { panic!("boom") }).await;
        assert_eq!(result, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn test_catch_task_panic_string_payload() {
        let id = 3;
        let result: Result<(), String> =
            catch_task_panic(async move { panic!("movie {} missing", id) }).await;
        assert_eq!(result, Err("movie 3 missing".to_string()));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_rect(50, 50, area), Rect::new(25, 10, 50, 20));
        assert_eq!(centered_rect(100, 100, area), area);
    }
}
