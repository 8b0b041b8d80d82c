use crate::board::{
    BoardError, CategoryChoice, Direction, Movie, MovieBoard, MovieId, PageSize, VoteState,
};
use crate::catalog::Catalog;
use crate::keybindings::KeybindingRegistry;
use crate::storage::Database;
use crate::theme::{StyleMap, ThemeVariant};
use ratatui::style::Style;
use std::borrow::Cow;
use tokio::time::{Duration, Instant};

/// How long a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

/// How long a partly typed page number waits for its next digit.
pub const PAGE_ENTRY_TIMEOUT: Duration = Duration::from_millis(1500);

// ============================================================================
// Focus and Load State
// ============================================================================

/// Which panel receives list navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Movies,
    Tokens,
}

/// Why a catalog fetch was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    /// The store had no movie list at startup.
    Initial,
    /// The user asked to reset the collection.
    Reset,
}

/// State of the fallback provider as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Ready,
    Loading(FetchReason),
    Failed(String),
}

/// Category picker overlay. Option 0 is "All".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPicker {
    pub selected: usize,
}

/// Events from background tasks
pub enum AppEvent {
    /// The catalog fetch finished.
    CatalogLoaded {
        reason: FetchReason,
        result: Result<Vec<Movie>, String>,
    },
    /// A background task panicked.
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    /// Movie collection, votes and selection, persisted to the database.
    pub movies: MovieBoard<Database>,
    /// Fallback provider for the initial load and for resets.
    pub catalog: Catalog,

    pub theme: StyleMap,
    pub keybindings: KeybindingRegistry,

    // UI State
    pub focus: Focus,
    /// Row within the current page window.
    pub selected_movie: usize,
    pub selected_token: usize,
    pub picker: Option<CategoryPicker>,

    pub load_state: LoadState,
    /// Handle to the in-flight catalog fetch, if any.
    pub fetch_handle: Option<tokio::task::JoinHandle<()>>,

    pub show_help: bool,
    pub help_scroll_offset: usize,

    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Page number being typed and when its last digit arrived.
    pub page_entry: Option<(usize, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(movies: MovieBoard<Database>, catalog: Catalog) -> Self {
        Self {
            movies,
            catalog,
            theme: StyleMap::default(),
            keybindings: KeybindingRegistry::new(),
            focus: Focus::Movies,
            selected_movie: 0,
            selected_token: 0,
            picker: None,
            load_state: LoadState::Ready,
            fetch_handle: None,
            show_help: false,
            help_scroll_offset: 0,
            status_message: None,
            page_entry: None,
            needs_redraw: true,
        }
    }

    /// Resolve a semantic role name to its `Style`.
    pub fn style(&self, role: &str) -> Style {
        self.theme.resolve(role)
    }

    pub fn set_theme(&mut self, variant: ThemeVariant) {
        self.theme = StyleMap::new(variant);
        self.needs_redraw = true;
    }

    /// Cycle to the next theme variant. Returns its name for status display.
    pub fn cycle_theme(&mut self) -> &'static str {
        let next = self.theme.variant().next();
        self.set_theme(next);
        next.name()
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired. Returns true if a message was cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------------
    // Selection helpers
    // ------------------------------------------------------------------------

    /// The movie under the cursor on the current page.
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.window().get(self.selected_movie).copied()
    }

    fn selected_movie_id(&self) -> Option<MovieId> {
        self.selected_movie().map(|m| m.id.clone())
    }

    /// "All" followed by every category in the collection.
    pub fn picker_options(&self) -> Vec<CategoryChoice> {
        std::iter::once(CategoryChoice::All)
            .chain(
                self.movies
                    .categories()
                    .into_iter()
                    .map(|c| CategoryChoice::Named(c.to_string())),
            )
            .collect()
    }

    /// Keep cursor indices inside their lists after any change.
    pub fn clamp_selections(&mut self) {
        let rows = self.movies.window().len();
        self.selected_movie = self.selected_movie.min(rows.saturating_sub(1));

        let tokens = self.movies.selection().tokens().len();
        self.selected_token = self.selected_token.min(tokens.saturating_sub(1));
        if tokens == 0 && self.focus == Focus::Tokens {
            self.focus = Focus::Movies;
        }

        if let Some(picker) = self.picker.as_mut() {
            let options = self.movies.categories().len() + 1;
            picker.selected = picker.selected.min(options - 1);
        }
    }

    pub fn nav_up(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            picker.selected = picker.selected.saturating_sub(1);
            return;
        }
        match self.focus {
            Focus::Movies => self.selected_movie = self.selected_movie.saturating_sub(1),
            Focus::Tokens => self.selected_token = self.selected_token.saturating_sub(1),
        }
    }

    pub fn nav_down(&mut self) {
        if let Some(picker) = self.picker.as_mut() {
            let max_index = self.movies.categories().len();
            picker.selected = picker.selected.saturating_add(1).min(max_index);
            return;
        }
        match self.focus {
            Focus::Movies => {
                let max_index = self.movies.window().len().saturating_sub(1);
                self.selected_movie = self.selected_movie.saturating_add(1).min(max_index);
            }
            Focus::Tokens => {
                let max_index = self.movies.selection().tokens().len().saturating_sub(1);
                self.selected_token = self.selected_token.saturating_add(1).min(max_index);
            }
        }
    }

    /// Movies → Tokens → Movies. Tokens is skipped while the list is empty.
    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Movies if !self.movies.selection().tokens().is_empty() => Focus::Tokens,
            _ => Focus::Movies,
        };
    }

    // ------------------------------------------------------------------------
    // Category picker
    // ------------------------------------------------------------------------

    /// Open the picker with the current choice highlighted.
    pub fn open_picker(&mut self) {
        let current = self.movies.selection().category().clone();
        let selected = self
            .picker_options()
            .iter()
            .position(|c| *c == current)
            .unwrap_or(0);
        self.picker = Some(CategoryPicker { selected });
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Apply the highlighted picker option and close the picker.
    pub fn confirm_picker(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let Some(choice) = self.picker_options().into_iter().nth(picker.selected) else {
            return;
        };
        self.select_category(choice);
    }

    pub fn select_category(&mut self, choice: CategoryChoice) {
        tracing::debug!(category = %choice.label(), "Category selected");
        self.movies.select_category(choice);
        self.selected_movie = 0;
        self.clamp_selections();
    }

    /// Remove the token under the cursor.
    pub fn remove_selected_token(&mut self) -> Option<String> {
        let removed = self.movies.remove_token(self.selected_token);
        self.clamp_selections();
        removed
    }

    // ------------------------------------------------------------------------
    // Pagination
    // ------------------------------------------------------------------------

    pub fn cycle_page_size(&mut self) -> PageSize {
        let size = self.movies.cycle_page_size();
        self.selected_movie = 0;
        size
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        let moved = self.movies.go_to_page(page);
        if moved {
            self.selected_movie = 0;
        }
        moved
    }

    /// Feed one typed digit into the page number being entered.
    ///
    /// The jump happens as soon as no further digit could name an existing
    /// page; otherwise the number waits for Enter, another digit, or
    /// [`PAGE_ENTRY_TIMEOUT`].
    pub fn push_page_digit(&mut self, digit: usize) {
        let typed = match self.page_entry.take() {
            Some((n, _)) => n.saturating_mul(10).saturating_add(digit),
            None if digit == 0 => return,
            None => digit,
        };
        if typed.saturating_mul(10) > self.movies.page_count() {
            self.jump_to_typed_page(typed);
        } else {
            self.page_entry = Some((typed, Instant::now()));
            self.set_status(format!("Page {}_", typed));
        }
    }

    /// Jump to the pending page number, if any.
    pub fn commit_page_entry(&mut self) -> bool {
        match self.page_entry.take() {
            Some((page, _)) => {
                self.jump_to_typed_page(page);
                true
            }
            None => false,
        }
    }

    /// Commit a pending page number whose next digit never came.
    pub fn expire_page_entry(&mut self) -> bool {
        match self.page_entry {
            Some((_, at)) if at.elapsed() >= PAGE_ENTRY_TIMEOUT => self.commit_page_entry(),
            _ => false,
        }
    }

    fn jump_to_typed_page(&mut self, page: usize) {
        if page > self.movies.page_count() {
            self.set_status(format!("No page {}", page));
        } else {
            self.go_to_page(page);
            self.set_status(format!("Page {}", page));
        }
    }

    pub fn previous_page(&mut self) -> bool {
        let moved = self.movies.previous_page();
        if moved {
            self.selected_movie = 0;
        }
        moved
    }

    pub fn next_page(&mut self) -> bool {
        let moved = self.movies.next_page();
        if moved {
            self.selected_movie = 0;
        }
        moved
    }

    // ------------------------------------------------------------------------
    // Collection changes (write-through)
    // ------------------------------------------------------------------------

    /// Like or dislike the selected movie. `None` when the page is empty.
    pub async fn rate_selected(
        &mut self,
        direction: Direction,
    ) -> Result<Option<(String, VoteState)>, BoardError> {
        let Some(id) = self.selected_movie_id() else {
            return Ok(None);
        };
        let state = self.movies.rate(&id, direction).await?;
        let title = self
            .movies
            .movie(&id)
            .map(|m| m.title.clone())
            .unwrap_or_default();
        Ok(Some((title, state)))
    }

    /// Delete the selected movie. `None` when the page is empty.
    pub async fn delete_selected(&mut self) -> Result<Option<Movie>, BoardError> {
        let Some(id) = self.selected_movie_id() else {
            return Ok(None);
        };
        let removed = self.movies.delete(&id).await?;
        self.clamp_selections();
        Ok(Some(removed))
    }

    /// True while a catalog fetch is in flight.
    pub fn is_fetching(&self) -> bool {
        matches!(self.load_state, LoadState::Loading(_))
    }

    /// Install a finished catalog fetch.
    pub async fn apply_catalog(
        &mut self,
        reason: FetchReason,
        result: Result<Vec<Movie>, String>,
    ) {
        self.fetch_handle = None;
        match result {
            Ok(movies) => match self.movies.replace(movies).await {
                Ok(()) => {
                    let count = self.movies.movies().len();
                    self.load_state = LoadState::Ready;
                    self.selected_movie = 0;
                    self.clamp_selections();
                    match reason {
                        FetchReason::Initial => {
                            self.set_status(format!("Loaded {} movies", count))
                        }
                        FetchReason::Reset => {
                            self.set_status(format!("Reset: {} movies restored", count))
                        }
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to persist fetched movies");
                    self.load_state = LoadState::Ready;
                    self.clamp_selections();
                    self.set_status(format!("Failed to save movies: {}", e));
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, ?reason, "Catalog fetch failed");
                self.set_status(format!("Failed to load movies: {}", e));
                self.load_state = LoadState::Failed(e);
            }
        }
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
            tracing::debug!("Aborted catalog fetch on App drop");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Selection;
    use crate::storage::MovieRepository;
    use tokio::time::{self, Duration};

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let board = MovieBoard::new(MovieRepository::new(db), Selection::default());
        App::new(board, Catalog::Builtin)
    }

    async fn seeded_app() -> App {
        let mut app = test_app().await;
        app.apply_catalog(FetchReason::Initial, Ok(crate::catalog::builtin_movies().unwrap()))
            .await;
        app
    }

    #[tokio::test]
    async fn test_empty_app_has_no_selection() {
        let app = test_app().await;
        assert!(app.selected_movie().is_none());
        assert_eq!(app.picker_options(), vec![CategoryChoice::All]);
    }

    #[tokio::test]
    async fn test_status_expires_after_3_seconds() {
        let mut app = test_app().await;
        time::pause();
        app.set_status("Test message");

        time::advance(Duration::from_secs(2)).await;
        app.clear_expired_status();
        assert!(app.status_message.is_some());

        time::advance(Duration::from_secs(2)).await;
        assert!(app.clear_expired_status());
        assert!(app.status_message.is_none());
    }

    #[tokio::test]
    async fn test_nav_down_clamps_to_page() {
        let mut app = seeded_app().await;
        for _ in 0..10 {
            app.nav_down();
        }
        assert_eq!(app.selected_movie, 3);
        assert_eq!(app.selected_movie().unwrap().title, "Sans un bruit");
    }

    #[tokio::test]
    async fn test_page_change_resets_cursor() {
        let mut app = seeded_app().await;
        app.nav_down();
        assert!(app.next_page());
        assert_eq!(app.selected_movie, 0);
        assert_eq!(app.selected_movie().unwrap().title, "Creed II");
    }

    #[tokio::test]
    async fn test_rate_selected_persists() {
        let mut app = seeded_app().await;
        let (title, state) = app.rate_selected(Direction::Up).await.unwrap().unwrap();
        assert_eq!(title, "Oceans 8");
        assert_eq!(state, VoteState::Liked);

        let stored = app.movies.repository().load().await.unwrap().unwrap();
        assert_eq!(stored[0].likes, 5);
    }

    #[tokio::test]
    async fn test_delete_selected_clamps_cursor() {
        let mut app = seeded_app().await;
        app.go_to_page(3);
        app.nav_down();
        assert_eq!(app.selected_movie, 1);

        let removed = app.delete_selected().await.unwrap().unwrap();
        assert_eq!(removed.title, "Gone Girl");
        assert_eq!(app.selected_movie, 0);
        assert_eq!(app.movies.movies().len(), 9);
    }

    #[tokio::test]
    async fn test_picker_selects_category() {
        let mut app = seeded_app().await;
        app.open_picker();
        assert_eq!(app.picker, Some(CategoryPicker { selected: 0 }));

        app.nav_down();
        app.confirm_picker();
        assert!(app.picker.is_none());
        assert_eq!(app.movies.selection().tokens().to_vec(), vec!["Comedy".to_string()]);
        assert_eq!(app.movies.filtered().len(), 2);
    }

    #[tokio::test]
    async fn test_picker_nav_clamps() {
        let mut app = seeded_app().await;
        app.open_picker();
        for _ in 0..20 {
            app.nav_down();
        }
        // All + Comedy, Animation, Thriller, Drame
        assert_eq!(app.picker.unwrap().selected, 4);
    }

    #[tokio::test]
    async fn test_focus_skips_empty_tokens() {
        let mut app = seeded_app().await;
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Movies);

        app.select_category(CategoryChoice::Named("Thriller".into()));
        app.cycle_focus();
        assert_eq!(app.focus, Focus::Tokens);

        app.remove_selected_token();
        assert_eq!(app.focus, Focus::Movies);
    }

    #[tokio::test]
    async fn test_failed_catalog_sets_state() {
        let mut app = test_app().await;
        app.load_state = LoadState::Loading(FetchReason::Initial);
        assert!(app.is_fetching());

        app.apply_catalog(FetchReason::Initial, Err("HTTP error: status 500".into()))
            .await;
        assert_eq!(
            app.load_state,
            LoadState::Failed("HTTP error: status 500".into())
        );
        assert!(!app.is_fetching());
        assert!(app.movies.movies().is_empty());
    }

    #[tokio::test]
    async fn test_cycle_theme_round_trip() {
        let mut app = test_app().await;
        assert_eq!(app.theme.variant(), ThemeVariant::Dark);
        assert_eq!(app.cycle_theme(), "Light");
        assert_eq!(app.cycle_theme(), "Dark");
    }
}
