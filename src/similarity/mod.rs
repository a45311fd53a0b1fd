//! Lexical name similarity.
//!
//! The search pipeline fuses vector similarity with a lexical score so that
//! results whose names closely match the query text get a nudge upward.


/// Scores how closely a cafe name matches the query text, in `[0.0, 1.0]`.
///
/// Case-insensitively, if either string contains the other as a substring the
/// score is `1.0`. Otherwise the score is the normalized Levenshtein
/// similarity `1 - distance / max(len)` over the lowercased strings, where
/// distance counts single-character insertions, deletions, and substitutions.
///
/// Empty-string convention: two empty strings score `1.0`; if exactly one
/// side is empty the score is `0.0` (the containment shortcut does not apply
/// to empty strings).
pub fn name_similarity(name: &str, query: &str) -> f32 {
    let name = name.to_lowercase();
    let query = query.to_lowercase();

    if !name.is_empty() && !query.is_empty() && (name.contains(&query) || query.contains(&name)) {
        return 1.0;
    }

    strsim::normalized_levenshtein(&name, &query) as f32
}
