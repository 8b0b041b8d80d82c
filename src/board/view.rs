//! View selection state and the projections derived from it.
//!
//! Nothing here mutates the movie collection. Every projection is recomputed
//! from the current collection and [`Selection`] on demand.

use super::movie::Movie;
use serde::Deserialize;
use std::fmt;

// ============================================================================
// Page Size
// ============================================================================

/// Allowed page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Four,
    Eight,
    Twelve,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Four, PageSize::Eight, PageSize::Twelve];

    pub fn get(self) -> usize {
        match self {
            Self::Four => 4,
            Self::Eight => 8,
            Self::Twelve => 12,
        }
    }

    pub fn from_count(n: usize) -> Option<Self> {
        match n {
            4 => Some(Self::Four),
            8 => Some(Self::Eight),
            12 => Some(Self::Twelve),
            _ => None,
        }
    }

    /// Cycle 4 → 8 → 12 → 4.
    pub fn next(self) -> Self {
        match self {
            Self::Four => Self::Eight,
            Self::Eight => Self::Twelve,
            Self::Twelve => Self::Four,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

// ============================================================================
// Category Choice
// ============================================================================

/// Value of the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryChoice {
    #[default]
    All,
    Named(String),
}

impl CategoryChoice {
    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Named(name) => name,
        }
    }
}

// ============================================================================
// Modes
// ============================================================================

/// Order in which pagination and the token filter are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationOrder {
    /// Slice the full collection by page, then drop rows failing the token
    /// filter. Pages can come out short or empty.
    #[default]
    SliceThenFilter,
    /// Filter by tokens first, then slice the survivors into pages.
    FilterThenSlice,
}

/// How repeated selections of the same category are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenMode {
    /// Every selection appends a token, duplicates included.
    #[default]
    Multiset,
    /// Re-selecting a category already in the list is a no-op.
    Set,
}

// ============================================================================
// Selection
// ============================================================================

/// UI selection state for one session.
#[derive(Debug, Clone)]
pub struct Selection {
    category: CategoryChoice,
    tokens: Vec<String>,
    page_size: PageSize,
    /// 1-based.
    current_page: usize,
    order: PaginationOrder,
    token_mode: TokenMode,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(PageSize::default(), PaginationOrder::default(), TokenMode::default())
    }
}

impl Selection {
    pub fn new(page_size: PageSize, order: PaginationOrder, token_mode: TokenMode) -> Self {
        Self {
            category: CategoryChoice::All,
            tokens: Vec::new(),
            page_size,
            current_page: 1,
            order,
            token_mode,
        }
    }

    pub fn category(&self) -> &CategoryChoice {
        &self.category
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn order(&self) -> PaginationOrder {
        self.order
    }

    /// Set the selector value.
    ///
    /// `All` clears the token list. A named category is appended to it.
    pub fn select_category(&mut self, choice: CategoryChoice) {
        match &choice {
            CategoryChoice::All => self.tokens.clear(),
            CategoryChoice::Named(name) => {
                let present = self.tokens.iter().any(|t| t == name);
                if !(self.token_mode == TokenMode::Set && present) {
                    self.tokens.push(name.clone());
                }
            }
        }
        self.category = choice;
    }

    /// Remove the token at `index`. The selector value is left unchanged.
    pub fn remove_token(&mut self, index: usize) -> Option<String> {
        if index < self.tokens.len() {
            Some(self.tokens.remove(index))
        } else {
            None
        }
    }

    /// Change page size and return to the first page.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.current_page = 1;
    }

    /// Token predicate: pass-all when no tokens, otherwise match any token.
    pub fn passes(&self, movie: &Movie) -> bool {
        self.tokens.is_empty() || self.tokens.iter().any(|t| *t == movie.category)
    }

    fn set_page(&mut self, page: usize) {
        self.current_page = page;
    }
}

// ============================================================================
// Projections
// ============================================================================

/// Distinct categories in first-appearance order.
pub fn categories(movies: &[Movie]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for movie in movies {
        if !seen.contains(&movie.category.as_str()) {
            seen.push(&movie.category);
        }
    }
    seen
}

/// Movies matching the selector value.
pub fn filtered<'a>(movies: &'a [Movie], selection: &Selection) -> Vec<&'a Movie> {
    match selection.category() {
        CategoryChoice::All => movies.iter().collect(),
        CategoryChoice::Named(name) => movies.iter().filter(|m| m.category == *name).collect(),
    }
}

/// Number of pages shown in the pagination bar.
pub fn page_count(movies: &[Movie], selection: &Selection) -> usize {
    let size = selection.page_size().get();
    let count = match selection.order() {
        PaginationOrder::SliceThenFilter => filtered(movies, selection).len(),
        PaginationOrder::FilterThenSlice => movies.iter().filter(|m| selection.passes(m)).count(),
    };
    count.div_ceil(size)
}

/// Index range of the current page, clamped to `len`.
fn page_bounds(selection: &Selection, len: usize) -> (usize, usize) {
    let size = selection.page_size().get();
    let start = selection.current_page().saturating_sub(1).saturating_mul(size);
    let end = start.saturating_add(size);
    (start.min(len), end.min(len))
}

/// Movies visible on the current page.
pub fn window<'a>(movies: &'a [Movie], selection: &Selection) -> Vec<&'a Movie> {
    match selection.order() {
        PaginationOrder::SliceThenFilter => {
            let (start, end) = page_bounds(selection, movies.len());
            movies[start..end]
                .iter()
                .filter(|m| selection.passes(m))
                .collect()
        }
        PaginationOrder::FilterThenSlice => {
            let passing: Vec<&Movie> = movies.iter().filter(|m| selection.passes(m)).collect();
            let (start, end) = page_bounds(selection, passing.len());
            passing[start..end].to_vec()
        }
    }
}

/// Whether the pagination bar is shown at all.
pub fn pagination_visible(movies: &[Movie], selection: &Selection) -> bool {
    !filtered(movies, selection).is_empty()
}

pub fn has_previous(selection: &Selection) -> bool {
    selection.current_page() > 1
}

pub fn has_next(movies: &[Movie], selection: &Selection) -> bool {
    selection.current_page() < page_count(movies, selection)
}

/// Jump to `page` if it exists. Returns whether the page changed.
pub fn go_to_page(movies: &[Movie], selection: &mut Selection, page: usize) -> bool {
    let pages = page_count(movies, selection);
    if page == 0 || page > pages || page == selection.current_page() {
        return false;
    }
    selection.set_page(page);
    true
}

/// Keep the current page within `[1, max(page_count, 1)]`.
pub fn clamp_page(movies: &[Movie], selection: &mut Selection) {
    let last = page_count(movies, selection).max(1);
    if selection.current_page() > last {
        selection.set_page(last);
    }
}
