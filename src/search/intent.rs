//! Query interpretation heuristics: follow-up detection and page-size
//! negotiation.

use regex::Regex;
use std::sync::LazyLock;

/// Results per page when the query does not ask for a count.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Smallest page size a query can request.
pub const MIN_PAGE_SIZE: usize = 1;

/// Largest page size a query can request.
pub const MAX_PAGE_SIZE: usize = 10;

/// Substrings that mark a query as a continuation of the previous search.
const FOLLOW_UP_MARKERS: [&str; 3] = ["other", "more", "then"];

static PAGE_SIZE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\b").expect("page size pattern is valid"));

/// Returns `true` if the query reads as a follow-up ("show me more", "what
/// about other areas", "and then?").
///
/// This is a substring heuristic, not intent classification: a genuinely new
/// query that happens to contain a marker ("smoother espresso") is treated as
/// a follow-up, and rephrasings that avoid the markers are not. That
/// imprecision is accepted behavior, preserved as-is; replacing the detector
/// is a product decision confined to this function.
pub fn is_follow_up(query: &str) -> bool {
    let query = query.to_lowercase();
    FOLLOW_UP_MARKERS.iter().any(|marker| query.contains(marker))
}

/// Extracts the requested page size from the query text.
///
/// The first standalone integer token wins ("show me 3 cafes" -> 3), clamped
/// to `[MIN_PAGE_SIZE, MAX_PAGE_SIZE]`. Queries without a number get
/// [`DEFAULT_PAGE_SIZE`]; a number too large to even parse is treated as the
/// maximum.
pub fn requested_page_size(query: &str) -> usize {
    match PAGE_SIZE_PATTERN.find(query) {
        Some(token) => match token.as_str().parse::<usize>() {
            Ok(n) => n.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            Err(_) => MAX_PAGE_SIZE,
        },
        None => DEFAULT_PAGE_SIZE,
    }
}
