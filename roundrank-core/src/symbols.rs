/// Symbol normalization.
use std::collections::HashSet;

/// Normalize a raw symbol source into the working symbol set.
///
/// Entries are trimmed and upper-cased; blank entries are dropped and later
/// duplicates removed, so the result keeps order of first appearance.
pub fn normalize_symbols<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
