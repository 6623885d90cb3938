/// roundrank-core: Pure-computation round-robin ranking.
///
/// Every unordered symbol pair judged once → win credits + outcome table →
/// iterative score propagation → ranked list. No IO or async here:
/// just bookkeeping and math. Bring your own judge.
///
/// # Quick start
///
/// ```rust
/// use roundrank_core::{normalize_symbols, score_round_robin, Outcome, RoundRobin};
///
/// let symbols = normalize_symbols(["aaa", "bbb", "ccc", "AAA"]);
/// let mut rr = RoundRobin::new(symbols);
///
/// for (i, j) in rr.pairs() {
///     // Ask your judge about rr.symbol(i) vs rr.symbol(j) here.
///     let outcome = if i == 0 { Outcome::Symbol1Wins } else { Outcome::Draw };
///     rr.record((i, j), outcome);
/// }
///
/// for r in score_round_robin(&rr) {
///     println!("{}: {:.2}", r.symbol, r.score);
/// }
/// ```

pub mod constants;
pub mod cost;
pub mod propagation;
pub mod symbols;
pub mod tournament;
pub mod types;

// Re-export primary public API at crate root.
pub use cost::{CostAccumulator, Pricing};
pub use propagation::{ScorePropagator, propagate_scores, score_round_robin};
pub use symbols::normalize_symbols;
pub use tournament::{OutcomeTable, RoundRobin, round_robin_pairs, total_pairs};
pub use types::{Outcome, Pair, RankedSymbol, WinCountEntry};
