//! The movie board view-model.
//!
//! [`Board`] owns the movie collection, the viewer's votes and the selection
//! state, and is entirely synchronous. [`MovieBoard`] pairs it with a
//! [`MovieRepository`] so every collection change is written through to the
//! store before the call returns.

mod movie;
mod rating;
mod view;

pub use movie::{dedup_by_id, Movie, MovieId};
pub use rating::{Direction, VoteLedger, VoteState};
pub use view::{CategoryChoice, PageSize, PaginationOrder, Selection, TokenMode};

use crate::catalog::{CatalogError, MovieSource};
use crate::storage::{KeyValueStore, MovieRepository, StoreError};
use std::ops::Deref;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("No movie with id {0}")]
    UnknownMovie(MovieId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// ============================================================================
// Board
// ============================================================================

/// In-memory movie collection plus the session state layered over it.
#[derive(Debug, Clone, Default)]
pub struct Board {
    movies: Vec<Movie>,
    votes: VoteLedger,
    selection: Selection,
}

impl Board {
    pub fn new(selection: Selection) -> Self {
        Self {
            movies: Vec::new(),
            votes: VoteLedger::new(),
            selection,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn votes(&self) -> &VoteLedger {
        &self.votes
    }

    pub fn movie(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == *id)
    }

    pub fn vote_state(&self, id: &MovieId) -> VoteState {
        self.votes.state(id)
    }

    // ------------------------------------------------------------------------
    // Collection mutations
    // ------------------------------------------------------------------------

    /// Replace the whole collection. Votes are kept.
    pub fn replace(&mut self, mut movies: Vec<Movie>) {
        dedup_by_id(&mut movies);
        self.movies = movies;
        view::clamp_page(&self.movies, &mut self.selection);
    }

    /// Apply a like/dislike to the movie with `id`.
    pub fn rate(&mut self, id: &MovieId, direction: Direction) -> Result<VoteState, BoardError> {
        let movie = self
            .movies
            .iter_mut()
            .find(|m| m.id == *id)
            .ok_or_else(|| BoardError::UnknownMovie(id.clone()))?;
        Ok(self.votes.apply(movie, direction))
    }

    /// Remove the movie with `id`, preserving the order of the rest.
    pub fn delete(&mut self, id: &MovieId) -> Result<Movie, BoardError> {
        let index = self
            .movies
            .iter()
            .position(|m| m.id == *id)
            .ok_or_else(|| BoardError::UnknownMovie(id.clone()))?;
        let removed = self.movies.remove(index);
        view::clamp_page(&self.movies, &mut self.selection);
        Ok(removed)
    }

    // ------------------------------------------------------------------------
    // Selection changes
    // ------------------------------------------------------------------------

    pub fn select_category(&mut self, choice: CategoryChoice) {
        self.selection.select_category(choice);
        view::clamp_page(&self.movies, &mut self.selection);
    }

    pub fn remove_token(&mut self, index: usize) -> Option<String> {
        let removed = self.selection.remove_token(index);
        view::clamp_page(&self.movies, &mut self.selection);
        removed
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.selection.set_page_size(size);
    }

    pub fn cycle_page_size(&mut self) -> PageSize {
        let next = self.selection.page_size().next();
        self.selection.set_page_size(next);
        next
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        view::go_to_page(&self.movies, &mut self.selection, page)
    }

    pub fn previous_page(&mut self) -> bool {
        let page = self.selection.current_page().saturating_sub(1);
        self.go_to_page(page)
    }

    pub fn next_page(&mut self) -> bool {
        let page = self.selection.current_page().saturating_add(1);
        self.go_to_page(page)
    }

    // ------------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------------

    pub fn categories(&self) -> Vec<&str> {
        view::categories(&self.movies)
    }

    pub fn filtered(&self) -> Vec<&Movie> {
        view::filtered(&self.movies, &self.selection)
    }

    pub fn page_count(&self) -> usize {
        view::page_count(&self.movies, &self.selection)
    }

    pub fn window(&self) -> Vec<&Movie> {
        view::window(&self.movies, &self.selection)
    }

    pub fn pagination_visible(&self) -> bool {
        view::pagination_visible(&self.movies, &self.selection)
    }

    pub fn has_previous(&self) -> bool {
        view::has_previous(&self.selection)
    }

    pub fn has_next(&self) -> bool {
        view::has_next(&self.movies, &self.selection)
    }
}

// ============================================================================
// Persisted Board
// ============================================================================

/// Where the collection came from on initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Store,
    Provider,
}

/// A [`Board`] whose collection changes are written through to a store.
pub struct MovieBoard<S> {
    board: Board,
    repo: MovieRepository<S>,
}

impl<S> Deref for MovieBoard<S> {
    type Target = Board;

    fn deref(&self) -> &Board {
        &self.board
    }
}

impl<S: KeyValueStore> MovieBoard<S> {
    pub fn new(repo: MovieRepository<S>, selection: Selection) -> Self {
        Self {
            board: Board::new(selection),
            repo,
        }
    }

    pub fn repository(&self) -> &MovieRepository<S> {
        &self.repo
    }

    /// Load the persisted collection, if any. Returns whether one was found.
    pub async fn load_persisted(&mut self) -> Result<bool, BoardError> {
        match self.repo.load().await? {
            Some(movies) => {
                tracing::info!(count = movies.len(), "Loaded movies from store");
                self.board.replace(movies);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Store-first initialization, falling back to `source`.
    ///
    /// A corrupt persisted copy is logged and treated as absent.
    pub async fn initialize(
        &mut self,
        source: &impl MovieSource,
    ) -> Result<LoadOrigin, BoardError> {
        match self.load_persisted().await {
            Ok(true) => return Ok(LoadOrigin::Store),
            Ok(false) => {}
            Err(BoardError::Store(StoreError::Corrupt(e))) => {
                tracing::warn!(error = %e, "Persisted movies are corrupt, refetching");
            }
            Err(e) => return Err(e),
        }
        self.reset_from(source).await?;
        Ok(LoadOrigin::Provider)
    }

    /// Replace the collection and persist it.
    pub async fn replace(&mut self, movies: Vec<Movie>) -> Result<(), BoardError> {
        self.write_through(|board| {
            board.replace(movies);
            Ok(())
        })
        .await
    }

    /// Re-query `source`, bypassing the store, and overwrite the store.
    pub async fn reset_from(&mut self, source: &impl MovieSource) -> Result<usize, BoardError> {
        let movies = source.fetch().await?;
        self.replace(movies).await?;
        Ok(self.board.movies().len())
    }

    pub async fn rate(
        &mut self,
        id: &MovieId,
        direction: Direction,
    ) -> Result<VoteState, BoardError> {
        self.write_through(|board| board.rate(id, direction)).await
    }

    pub async fn delete(&mut self, id: &MovieId) -> Result<Movie, BoardError> {
        let removed = self.write_through(|board| board.delete(id)).await?;
        tracing::info!(movie_id = %removed.id, title = %removed.title, "Deleted movie");
        Ok(removed)
    }

    // Selection changes never touch the store.

    pub fn select_category(&mut self, choice: CategoryChoice) {
        self.board.select_category(choice);
    }

    pub fn remove_token(&mut self, index: usize) -> Option<String> {
        self.board.remove_token(index)
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.board.set_page_size(size);
    }

    pub fn cycle_page_size(&mut self) -> PageSize {
        self.board.cycle_page_size()
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.board.go_to_page(page)
    }

    pub fn previous_page(&mut self) -> bool {
        self.board.previous_page()
    }

    pub fn next_page(&mut self) -> bool {
        self.board.next_page()
    }

    /// Apply `change` and save the result. If the save fails the board is
    /// rolled back, so memory never runs ahead of the store.
    async fn write_through<T>(
        &mut self,
        change: impl FnOnce(&mut Board) -> Result<T, BoardError>,
    ) -> Result<T, BoardError> {
        let before = self.board.clone();
        let out = change(&mut self.board)?;
        if let Err(e) = self.repo.save(self.board.movies()).await {
            tracing::warn!(error = %e, "Save failed, rolling back change");
            self.board = before;
            return Err(e.into());
        }
        Ok(out)
    }
}
