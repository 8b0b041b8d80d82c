//! Like/dislike state machine.
//!
//! Each movie is in exactly one of three vote states for the current viewer.
//! The membership sets in [`VoteLedger`] are the source of truth for that state;
//! the counters on [`Movie`] are adjusted as a side effect of each transition.

use super::movie::{Movie, MovieId};
use std::collections::HashSet;

/// Direction of a rating action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

/// The viewer's vote on a single movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoteState {
    #[default]
    Neutral,
    Liked,
    Disliked,
}

impl VoteState {
    /// State reached by applying `direction` to `self`.
    ///
    /// Voting in the same direction twice toggles back to neutral; voting in
    /// the opposite direction switches sides.
    pub fn after(self, direction: Direction) -> Self {
        match (self, direction) {
            (Self::Neutral, Direction::Up) => Self::Liked,
            (Self::Neutral, Direction::Down) => Self::Disliked,
            (Self::Liked, Direction::Up) => Self::Neutral,
            (Self::Liked, Direction::Down) => Self::Disliked,
            (Self::Disliked, Direction::Down) => Self::Neutral,
            (Self::Disliked, Direction::Up) => Self::Liked,
        }
    }
}

/// Per-viewer record of which movies were liked or disliked.
///
/// Session-scoped: never persisted, and survives collection resets.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    liked: HashSet<MovieId>,
    disliked: HashSet<MovieId>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current vote state for a movie.
    pub fn state(&self, id: &MovieId) -> VoteState {
        debug_assert!(
            !(self.liked.contains(id) && self.disliked.contains(id)),
            "movie {id} is both liked and disliked"
        );
        if self.liked.contains(id) {
            VoteState::Liked
        } else if self.disliked.contains(id) {
            VoteState::Disliked
        } else {
            VoteState::Neutral
        }
    }

    /// Apply a rating to `movie`, updating membership and counters together.
    ///
    /// Decrements saturate at zero: a vote recorded before a reset can point
    /// at a freshly fetched counter that is already 0.
    pub fn apply(&mut self, movie: &mut Movie, direction: Direction) -> VoteState {
        let from = self.state(&movie.id);
        let to = from.after(direction);

        match from {
            VoteState::Liked => {
                self.liked.remove(&movie.id);
                movie.likes = movie.likes.saturating_sub(1);
            }
            VoteState::Disliked => {
                self.disliked.remove(&movie.id);
                movie.dislikes = movie.dislikes.saturating_sub(1);
            }
            VoteState::Neutral => {}
        }

        match to {
            VoteState::Liked => {
                self.liked.insert(movie.id.clone());
                movie.likes = movie.likes.saturating_add(1);
            }
            VoteState::Disliked => {
                self.disliked.insert(movie.id.clone());
                movie.dislikes = movie.dislikes.saturating_add(1);
            }
            VoteState::Neutral => {}
        }

        tracing::debug!(movie_id = %movie.id, ?from, ?to, "Applied rating");
        to
    }

    /// True when no movie is in both sets.
    pub fn is_consistent(&self) -> bool {
        self.liked.is_disjoint(&self.disliked)
    }

    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    pub fn disliked_count(&self) -> usize {
        self.disliked.len()
    }
}
