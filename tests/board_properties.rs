//! Property tests for the rating state machine and page projection.
//!
//! These drive a plain `Board` (no store) through random operation sequences
//! and check the invariants that must hold after every step.

use movieboard::board::{
    Board, CategoryChoice, Direction, Movie, MovieId, PageSize, PaginationOrder, Selection,
    TokenMode, VoteState,
};
use proptest::prelude::*;

const CATEGORIES: [&str; 3] = ["Drama", "Comedy", "Thriller"];

fn arb_movies() -> impl Strategy<Value = Vec<Movie>> {
    prop::collection::vec((0..CATEGORIES.len(), 0u32..50, 0u32..50), 1..30).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (cat, likes, dislikes))| {
                let mut movie = Movie::new(format!("m{}", i).as_str(), &format!("Movie {}", i), CATEGORIES[cat]);
                movie.likes = likes;
                movie.dislikes = dislikes;
                movie
            })
            .collect()
    })
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Up), Just(Direction::Down)]
}

fn arb_page_size() -> impl Strategy<Value = PageSize> {
    prop_oneof![Just(PageSize::Four), Just(PageSize::Eight), Just(PageSize::Twelve)]
}

fn arb_order() -> impl Strategy<Value = PaginationOrder> {
    prop_oneof![
        Just(PaginationOrder::SliceThenFilter),
        Just(PaginationOrder::FilterThenSlice)
    ]
}

fn board_with(movies: Vec<Movie>, size: PageSize, order: PaginationOrder) -> Board {
    let mut board = Board::new(Selection::new(size, order, TokenMode::Multiset));
    board.replace(movies);
    board
}

/// Walk every page and concatenate the windows.
fn all_windows(board: &mut Board) -> Vec<MovieId> {
    let mut seen = Vec::new();
    for page in 1..=board.page_count() {
        board.go_to_page(page);
        assert_eq!(board.selection().current_page(), page);
        let window = board.window();
        assert!(window.len() <= board.selection().page_size().get());
        seen.extend(window.iter().map(|m| m.id.clone()));
    }
    seen
}

proptest! {
    /// Counters always equal the starting value plus the viewer's own vote.
    #[test]
    fn counters_track_vote_state(
        movies in arb_movies(),
        ops in prop::collection::vec((any::<prop::sample::Index>(), arb_direction()), 0..60),
    ) {
        let original = movies.clone();
        let mut board = board_with(movies, PageSize::Four, PaginationOrder::SliceThenFilter);

        for (index, direction) in ops {
            let id = original[index.index(original.len())].id.clone();
            board.rate(&id, direction).unwrap();
            prop_assert!(board.votes().is_consistent());
        }

        for before in &original {
            let after = board.movie(&before.id).unwrap();
            let state = board.vote_state(&before.id);
            prop_assert_eq!(after.likes, before.likes + u32::from(state == VoteState::Liked));
            prop_assert_eq!(after.dislikes, before.dislikes + u32::from(state == VoteState::Disliked));
        }
    }

    /// Voting the same way twice is a no-op on the counters.
    #[test]
    fn double_vote_is_identity(movies in arb_movies(), direction in arb_direction()) {
        let original = movies.clone();
        let mut board = board_with(movies, PageSize::Four, PaginationOrder::SliceThenFilter);
        let id = original[0].id.clone();

        board.rate(&id, direction).unwrap();
        board.rate(&id, direction).unwrap();

        prop_assert_eq!(board.vote_state(&id), VoteState::Neutral);
        prop_assert_eq!(board.movies(), original.as_slice());
    }

    /// Delete removes exactly the target and keeps everyone else in order.
    #[test]
    fn delete_removes_one(movies in arb_movies(), pick in any::<prop::sample::Index>()) {
        let original = movies.clone();
        let mut board = board_with(movies, PageSize::Four, PaginationOrder::SliceThenFilter);
        let target = original[pick.index(original.len())].id.clone();

        board.delete(&target).unwrap();

        let expected: Vec<&Movie> = original.iter().filter(|m| m.id != target).collect();
        let actual: Vec<&Movie> = board.movies().iter().collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(board.delete(&target).is_err());
    }

    /// Without a token filter every movie shows up on exactly one page.
    #[test]
    fn pages_partition_unfiltered_collection(
        movies in arb_movies(),
        size in arb_page_size(),
        order in arb_order(),
    ) {
        let expected: Vec<MovieId> = movies.iter().map(|m| m.id.clone()).collect();
        let mut board = board_with(movies, size, order);

        prop_assert_eq!(board.page_count(), expected.len().div_ceil(size.get()));
        prop_assert_eq!(all_windows(&mut board), expected);
    }

    /// Filter-then-slice pages partition the token-filtered collection.
    #[test]
    fn filter_then_slice_partitions_matches(
        movies in arb_movies(),
        size in arb_page_size(),
        cat in 0..CATEGORIES.len(),
    ) {
        let category = CATEGORIES[cat];
        let expected: Vec<MovieId> = movies
            .iter()
            .filter(|m| m.category == category)
            .map(|m| m.id.clone())
            .collect();
        let mut board = board_with(movies, size, PaginationOrder::FilterThenSlice);
        board.select_category(CategoryChoice::Named(category.to_string()));

        prop_assert_eq!(board.pagination_visible(), !expected.is_empty());
        prop_assert_eq!(all_windows(&mut board), expected);
    }

    /// Selection changes never reorder or alter the collection.
    #[test]
    fn selection_does_not_touch_movies(
        movies in arb_movies(),
        cats in prop::collection::vec(0..CATEGORIES.len(), 0..6),
        size in arb_page_size(),
    ) {
        let original = movies.clone();
        let mut board = board_with(movies, PageSize::Four, PaginationOrder::SliceThenFilter);

        for cat in cats {
            board.select_category(CategoryChoice::Named(CATEGORIES[cat].to_string()));
        }
        board.set_page_size(size);
        board.remove_token(0);
        prop_assert_eq!(board.selection().current_page(), 1);

        board.select_category(CategoryChoice::All);
        prop_assert!(board.selection().tokens().is_empty());
        prop_assert_eq!(board.filtered().len(), original.len());
        prop_assert_eq!(board.movies(), original.as_slice());
    }
}
