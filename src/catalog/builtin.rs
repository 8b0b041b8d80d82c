use super::{parse_movies, CatalogError};
use crate::board::Movie;

const BUILTIN_CATALOG: &str = include_str!("../../assets/movies.json");

/// The movie list bundled with the binary.
pub fn builtin_movies() -> Result<Vec<Movie>, CatalogError> {
    parse_movies(BUILTIN_CATALOG)
}
