//! Background task events.

use crate::app::{App, AppEvent, LoadState};

/// Apply a finished background task to the application state.
pub(super) async fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::CatalogLoaded { reason, result } => {
            app.apply_catalog(reason, result).await;
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            if task == "catalog_fetch" {
                app.fetch_handle = None;
                app.load_state = LoadState::Failed(format!("internal error: {}", error));
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FetchReason;
    use crate::board::{Movie, MovieBoard, Selection};
    use crate::catalog::Catalog;
    use crate::storage::{Database, MovieRepository};

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        App::new(
            MovieBoard::new(MovieRepository::new(db), Selection::default()),
            Catalog::Builtin,
        )
    }

    #[tokio::test]
    async fn test_catalog_loaded_installs_movies() {
        let mut app = test_app().await;
        app.load_state = LoadState::Loading(FetchReason::Initial);

        let movies = vec![Movie::new("1", "Seven", "Thriller")];
        handle_app_event(
            &mut app,
            AppEvent::CatalogLoaded {
                reason: FetchReason::Initial,
                result: Ok(movies),
            },
        )
        .await;

        assert_eq!(app.load_state, LoadState::Ready);
        assert_eq!(app.movies.movies().len(), 1);
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Loaded 1 movies");
    }

    #[tokio::test]
    async fn test_reset_keeps_existing_on_failure() {
        let mut app = test_app().await;
        app.movies
            .replace(vec![Movie::new("1", "Seven", "Thriller")])
            .await
            .unwrap();
        app.load_state = LoadState::Loading(FetchReason::Reset);

        handle_app_event(
            &mut app,
            AppEvent::CatalogLoaded {
                reason: FetchReason::Reset,
                result: Err("Request timed out after 15s".into()),
            },
        )
        .await;

        assert!(matches!(app.load_state, LoadState::Failed(_)));
        assert_eq!(app.movies.movies().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_panic_clears_loading() {
        let mut app = test_app().await;
        app.load_state = LoadState::Loading(FetchReason::Initial);

        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "catalog_fetch",
                error: "boom".into(),
            },
        )
        .await;

        assert!(!app.is_fetching());
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("catalog_fetch"));
    }
}
