//! End-to-end tests for the persisted board: store-first initialization,
//! write-through of every collection change, and reset from the catalog.
//!
//! Each test gets its own store, either a `MemoryStore` or an in-memory
//! SQLite database.

use movieboard::board::{
    BoardError, CategoryChoice, Direction, LoadOrigin, Movie, MovieBoard, MovieId, PageSize,
    PaginationOrder, Selection, TokenMode, VoteState,
};
use movieboard::catalog::{Catalog, CatalogError, MovieSource};
use movieboard::storage::{
    Database, KeyValueStore, MemoryStore, MovieRepository, StoreError, MOVIES_KEY,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// A provider that returns a fixed list and counts how often it was asked.
struct FixedSource {
    movies: Vec<Movie>,
    calls: AtomicUsize,
}

impl FixedSource {
    fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MovieSource for FixedSource {
    async fn fetch(&self) -> Result<Vec<Movie>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.movies.clone())
    }
}

/// A store that accepts writes until `fail_writes` is set.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_writes: Arc<AtomicBool>,
}

impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(sqlx::Error::PoolClosed));
        }
        self.inner.set(key, value).await
    }
}

struct FailingSource;

impl MovieSource for FailingSource {
    async fn fetch(&self) -> Result<Vec<Movie>, CatalogError> {
        Err(CatalogError::HttpStatus(503))
    }
}

/// Ten movies, ids "1".."10"; ids 2, 5 and 8 are Comedy.
fn ten_movies() -> Vec<Movie> {
    (1..=10u64)
        .map(|i| {
            let category = if i % 3 == 2 { "Comedy" } else { "Drama" };
            Movie::new(i, &format!("Movie {}", i), category)
        })
        .collect()
}

fn memory_board() -> (MemoryStore, MovieBoard<MemoryStore>) {
    let store = MemoryStore::new();
    let board = MovieBoard::new(MovieRepository::new(store.clone()), Selection::default());
    (store, board)
}

async fn stored(store: &impl KeyValueStore) -> Vec<Movie> {
    let raw = store.get(MOVIES_KEY).await.unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

// ============================================================================
// Initialization
// ============================================================================

#[tokio::test]
async fn test_empty_store_uses_provider_and_persists() {
    let (store, mut board) = memory_board();
    let source = FixedSource::new(ten_movies());

    let origin = board.initialize(&source).await.unwrap();

    assert_eq!(origin, LoadOrigin::Provider);
    assert_eq!(source.calls(), 1);
    assert_eq!(stored(&store).await, ten_movies());
}

#[tokio::test]
async fn test_store_wins_over_provider() {
    let (store, mut board) = memory_board();
    let persisted = vec![Movie::new("42", "Stored", "Drama")];
    store
        .set(MOVIES_KEY, &serde_json::to_string(&persisted).unwrap())
        .await
        .unwrap();
    let source = FixedSource::new(ten_movies());

    let origin = board.initialize(&source).await.unwrap();

    assert_eq!(origin, LoadOrigin::Store);
    assert_eq!(source.calls(), 0);
    assert_eq!(board.movies(), persisted.as_slice());
}

#[tokio::test]
async fn test_corrupt_store_falls_back_to_provider() {
    let (store, mut board) = memory_board();
    store.set(MOVIES_KEY, "{not json").await.unwrap();
    let source = FixedSource::new(ten_movies());

    assert!(matches!(
        board.load_persisted().await,
        Err(BoardError::Store(StoreError::Corrupt(_)))
    ));
    assert_eq!(board.initialize(&source).await.unwrap(), LoadOrigin::Provider);
    assert_eq!(stored(&store).await.len(), 10);
}

#[tokio::test]
async fn test_provider_failure_leaves_store_untouched() {
    let (store, mut board) = memory_board();

    let err = board.initialize(&FailingSource).await.unwrap_err();

    assert!(matches!(err, BoardError::Catalog(CatalogError::HttpStatus(503))));
    assert!(board.movies().is_empty());
    assert_eq!(store.get(MOVIES_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_numeric_ids_in_store_are_accepted() {
    let (store, mut board) = memory_board();
    store
        .set(
            MOVIES_KEY,
            r#"[{"id":7,"title":"Seven","category":"Thriller","likes":2,"dislikes":1}]"#,
        )
        .await
        .unwrap();

    assert!(board.load_persisted().await.unwrap());
    assert_eq!(board.movies()[0].id, MovieId::from("7"));
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_like_toggle_is_persisted() {
    let (store, mut board) = memory_board();
    board
        .replace(vec![Movie::new(1u64, "A", "Drama")])
        .await
        .unwrap();
    let id = MovieId::from(1u64);

    assert_eq!(board.rate(&id, Direction::Up).await.unwrap(), VoteState::Liked);
    assert_eq!(stored(&store).await[0].likes, 1);

    assert_eq!(board.rate(&id, Direction::Up).await.unwrap(), VoteState::Neutral);
    assert_eq!(stored(&store).await[0].likes, 0);
}

#[tokio::test]
async fn test_like_then_dislike_is_persisted() {
    let (store, mut board) = memory_board();
    board
        .replace(vec![Movie::new(1u64, "A", "Drama")])
        .await
        .unwrap();
    let id = MovieId::from(1u64);

    board.rate(&id, Direction::Up).await.unwrap();
    assert_eq!(board.rate(&id, Direction::Down).await.unwrap(), VoteState::Disliked);

    let movies = stored(&store).await;
    assert_eq!((movies[0].likes, movies[0].dislikes), (0, 1));
}

#[tokio::test]
async fn test_ten_movies_in_three_pages() {
    let (_store, mut board) = memory_board();
    board.replace(ten_movies()).await.unwrap();

    assert_eq!(board.page_count(), 3);
    let first: Vec<&str> = board.window().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(first, ["1", "2", "3", "4"]);

    assert!(board.go_to_page(3));
    let last: Vec<&str> = board.window().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(last, ["9", "10"]);
}

#[tokio::test]
async fn test_category_filter_selects_three() {
    let (_store, mut board) = memory_board();
    board.replace(ten_movies()).await.unwrap();

    board.select_category(CategoryChoice::Named("Comedy".into()));

    let filtered = board.filtered();
    assert_eq!(filtered.len(), 3);
    assert!(filtered.iter().all(|m| m.category == "Comedy"));
}

#[tokio::test]
async fn test_delete_is_persisted_in_order() {
    let (store, mut board) = memory_board();
    board.replace(ten_movies()).await.unwrap();

    board.delete(&MovieId::from(5u64)).await.unwrap();

    let ids: Vec<String> = stored(&store)
        .await
        .iter()
        .map(|m| m.id.to_string())
        .collect();
    assert_eq!(ids, ["1", "2", "3", "4", "6", "7", "8", "9", "10"]);
}

#[tokio::test]
async fn test_selection_changes_do_not_write() {
    let (store, mut board) = memory_board();
    board.replace(ten_movies()).await.unwrap();
    store.set(MOVIES_KEY, "sentinel").await.unwrap();

    board.select_category(CategoryChoice::Named("Drama".into()));
    board.set_page_size(PageSize::Eight);
    board.next_page();
    board.remove_token(0);

    assert_eq!(store.get(MOVIES_KEY).await.unwrap().as_deref(), Some("sentinel"));
}

#[tokio::test]
async fn test_failed_write_rolls_back_memory() {
    let store = FlakyStore::default();
    let mut board = MovieBoard::new(MovieRepository::new(store.clone()), Selection::default());
    board
        .replace(vec![Movie::new(1u64, "A", "Drama"), Movie::new(2u64, "B", "Comedy")])
        .await
        .unwrap();
    let id = MovieId::from(1u64);
    board.rate(&id, Direction::Up).await.unwrap();
    let persisted = stored(&store).await;

    store.fail_writes.store(true, Ordering::SeqCst);

    let err = board.rate(&id, Direction::Down).await.unwrap_err();
    assert!(matches!(err, BoardError::Store(StoreError::Backend(_))));
    assert_eq!(board.vote_state(&id), VoteState::Liked);
    assert_eq!(board.movie(&id).map(|m| (m.likes, m.dislikes)), Some((1, 0)));

    assert!(board.delete(&MovieId::from(2u64)).await.is_err());
    assert_eq!(board.movies(), persisted.as_slice());

    assert!(board.replace(Vec::new()).await.is_err());
    assert_eq!(board.movies(), persisted.as_slice());
    assert!(board.votes().is_consistent());
}

// ============================================================================
// Reset
// ============================================================================

#[tokio::test]
async fn test_reset_overwrites_store_and_keeps_votes() {
    let (store, mut board) = memory_board();
    let source = FixedSource::new(ten_movies());
    board.initialize(&source).await.unwrap();

    let id = MovieId::from(3u64);
    board.rate(&id, Direction::Up).await.unwrap();
    board.delete(&MovieId::from(1u64)).await.unwrap();

    let count = board.reset_from(&source).await.unwrap();

    assert_eq!(count, 10);
    assert_eq!(source.calls(), 2);
    assert_eq!(stored(&store).await, ten_movies());
    // Membership survives the reset even though the counter was restored.
    assert_eq!(board.vote_state(&id), VoteState::Liked);
    assert_eq!(board.movie(&id).unwrap().likes, 0);
}

#[tokio::test]
async fn test_reset_failure_keeps_collection() {
    let (_store, mut board) = memory_board();
    board.replace(ten_movies()).await.unwrap();

    assert!(board.reset_from(&FailingSource).await.is_err());
    assert_eq!(board.movies().len(), 10);
}

// ============================================================================
// SQLite store
// ============================================================================

#[tokio::test]
async fn test_sqlite_round_trip_through_builtin_catalog() {
    let db = Database::open(":memory:").await.unwrap();
    let selection = Selection::new(
        PageSize::Twelve,
        PaginationOrder::FilterThenSlice,
        TokenMode::Set,
    );
    let mut board = MovieBoard::new(MovieRepository::new(db.clone()), selection);

    assert_eq!(board.initialize(&Catalog::Builtin).await.unwrap(), LoadOrigin::Provider);
    let gone_girl = MovieId::from("10");
    board.rate(&gone_girl, Direction::Down).await.unwrap();

    // A fresh board over the same database sees the write.
    let mut reopened = MovieBoard::new(MovieRepository::new(db), Selection::default());
    assert_eq!(
        reopened.initialize(&Catalog::Builtin).await.unwrap(),
        LoadOrigin::Store
    );
    assert_eq!(reopened.movie(&gone_girl).unwrap().dislikes, 13);
    // Votes are per session.
    assert_eq!(reopened.vote_state(&gone_girl), VoteState::Neutral);
}
