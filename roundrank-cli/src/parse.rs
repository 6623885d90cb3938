/// Verdict classification: raw oracle text → three-way outcome.
///
/// The oracle is asked to answer with the winning symbol but often wraps it
/// in prose, so matching is by substring containment, not equality.
use roundrank_core::Outcome;

/// Classify an oracle verdict for the pair `(symbol1, symbol2)`.
///
/// Precedence:
/// 1. both symbols present → `Draw` (indeterminate)
/// 2. `symbol1` present → `Symbol1Wins`
/// 3. `symbol2` present → `Symbol2Wins`
/// 4. neither (including empty text) → `Draw`
///
/// Matching is case-sensitive; symbols are upper-cased before the run.
pub fn classify_verdict(text: &str, symbol1: &str, symbol2: &str) -> Outcome {
    let has1 = text.contains(symbol1);
    let has2 = text.contains(symbol2);

    match (has1, has2) {
        (true, true) => Outcome::Draw,
        (true, false) => Outcome::Symbol1Wins,
        (false, true) => Outcome::Symbol2Wins,
        (false, false) => Outcome::Draw,
    }
}
