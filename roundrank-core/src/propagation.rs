/// Iterative score propagation over a round-robin outcome table.
///
/// Seeds each symbol from its smoothed win count, then repeatedly lets score
/// flow from loser to winner in proportion to the loser's current score, so
/// beating a currently strong symbol is worth more than beating a weak one.
/// Scores are renormalized to a fixed mean after every iteration and only
/// mean something relative to each other within one run.
use crate::constants::{
    DRAW_TRANSFER_DIVISOR, INITIAL_WIN_SMOOTHING, ITERATION_SCORE_FLOOR, NORMALIZED_MEAN_SCORE,
    PROPAGATION_ITERATIONS,
};
use crate::tournament::{OutcomeTable, RoundRobin};
use crate::types::{Outcome, RankedSymbol};

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub struct ScorePropagator<'a> {
    outcomes: &'a OutcomeTable,
    /// Current scores, indexed like the symbols of the outcome table.
    pub scores: Vec<f64>,
}

impl<'a> ScorePropagator<'a> {
    /// Seed scores as `1000 * (wins + 1) / (mean(wins) + 1)`.
    pub fn new(win_counts: &[f64], outcomes: &'a OutcomeTable) -> Self {
        assert_eq!(
            win_counts.len(),
            outcomes.num_symbols(),
            "win counts cover {} symbols but the outcome table covers {}",
            win_counts.len(),
            outcomes.num_symbols()
        );

        let scores = if win_counts.is_empty() {
            Vec::new()
        } else {
            let denominator = mean(win_counts) + INITIAL_WIN_SMOOTHING;
            win_counts
                .iter()
                .map(|&w| NORMALIZED_MEAN_SCORE * (w + INITIAL_WIN_SMOOTHING) / denominator)
                .collect()
        };

        ScorePropagator { outcomes, scores }
    }

    fn run_iteration(&mut self) {
        let mut new_scores = vec![ITERATION_SCORE_FLOOR; self.scores.len()];

        for ((i, j), outcome) in self.outcomes.iter() {
            match outcome {
                Outcome::Draw | Outcome::Unresolved => {
                    new_scores[i] += self.scores[j] / DRAW_TRANSFER_DIVISOR;
                    new_scores[j] += self.scores[i] / DRAW_TRANSFER_DIVISOR;
                }
                Outcome::Symbol1Wins => new_scores[i] += self.scores[j],
                Outcome::Symbol2Wins => new_scores[j] += self.scores[i],
            }
        }

        self.scores = new_scores;
    }

    /// Rescale so the arithmetic mean is exactly `NORMALIZED_MEAN_SCORE`.
    fn normalize_scores(&mut self) {
        if self.scores.is_empty() {
            return;
        }
        let avg = mean(&self.scores);
        for score in &mut self.scores {
            *score = NORMALIZED_MEAN_SCORE * *score / avg;
        }
    }

    /// Run exactly `iterations` propagate-then-normalize steps. No early stop.
    pub fn calculate_scores(&mut self, iterations: usize) {
        for _ in 0..iterations {
            self.run_iteration();
            self.normalize_scores();
        }
    }
}

/// Final propagated scores, same order as `win_counts`.
pub fn propagate_scores(win_counts: &[f64], outcomes: &OutcomeTable) -> Vec<f64> {
    let mut propagator = ScorePropagator::new(win_counts, outcomes);
    propagator.calculate_scores(PROPAGATION_ITERATIONS);
    propagator.scores
}

/// Score a finished round robin and rank it, highest score first.
///
/// Equal scores keep order of first appearance.
pub fn score_round_robin(round_robin: &RoundRobin) -> Vec<RankedSymbol> {
    let scores = propagate_scores(round_robin.win_counts(), round_robin.outcomes());
    let mut ranked: Vec<RankedSymbol> = round_robin
        .symbols()
        .iter()
        .zip(scores)
        .map(|(symbol, score)| RankedSymbol { symbol: symbol.clone(), score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::round_robin_pairs;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn round_robin(names: &[&str], outcomes: &[Outcome]) -> RoundRobin {
        let mut rr = RoundRobin::new(names.iter().map(|s| s.to_string()).collect());
        for (pair, &outcome) in rr.pairs().into_iter().zip(outcomes) {
            rr.record(pair, outcome);
        }
        rr
    }

    fn random_round_robin(n: usize, seed: u64) -> RoundRobin {
        let mut rng = StdRng::seed_from_u64(seed);
        let names: Vec<String> = (0..n).map(|i| format!("S{i}")).collect();
        let mut rr = RoundRobin::new(names);
        for pair in round_robin_pairs(n) {
            let outcome = match rng.random_range(0..4) {
                0 => Outcome::Symbol1Wins,
                1 => Outcome::Symbol2Wins,
                2 => Outcome::Draw,
                _ => Outcome::Unresolved,
            };
            rr.record(pair, outcome);
        }
        rr
    }

    #[test]
    fn test_initial_scores_are_smoothed() {
        // wins [2, 1, 0], mean 1 → 1000 * (w + 1) / 2
        let rr = round_robin(
            &["AAA", "BBB", "CCC"],
            &[Outcome::Symbol1Wins, Outcome::Symbol1Wins, Outcome::Symbol1Wins],
        );
        let propagator = ScorePropagator::new(rr.win_counts(), rr.outcomes());
        assert_eq!(propagator.scores, vec![1500.0, 1000.0, 500.0]);
    }

    #[test]
    fn test_three_symbol_scenario_ranks_and_means() {
        // AAA beats everyone, BBB beats CCC.
        let rr = round_robin(
            &["AAA", "BBB", "CCC"],
            &[Outcome::Symbol1Wins, Outcome::Symbol1Wins, Outcome::Symbol1Wins],
        );
        assert_eq!(rr.win_counts(), &[2.0, 1.0, 0.0]);

        let ranked = score_round_robin(&rr);
        let order: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["AAA", "BBB", "CCC"]);
        assert!(ranked[0].score > ranked[1].score);
        assert!(ranked[1].score > ranked[2].score);

        let avg = ranked.iter().map(|r| r.score).sum::<f64>() / 3.0;
        assert!((avg - NORMALIZED_MEAN_SCORE).abs() < 1e-9, "mean was {avg}");
    }

    #[test]
    fn test_first_iteration_by_hand() {
        // Seeds [1500, 1000, 500] → raw [1501, 501, 1], mean 2003 / 3.
        let rr = round_robin(
            &["AAA", "BBB", "CCC"],
            &[Outcome::Symbol1Wins, Outcome::Symbol1Wins, Outcome::Symbol1Wins],
        );
        let mut propagator = ScorePropagator::new(rr.win_counts(), rr.outcomes());
        propagator.calculate_scores(1);
        let avg = 2003.0 / 3.0;
        let expected = [1000.0 * 1501.0 / avg, 1000.0 * 501.0 / avg, 1000.0 * 1.0 / avg];
        for (got, want) in propagator.scores.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_draw_transfers_a_third() {
        // All draws: seeds equal at 1000, each iteration gives 1 + 1000/3 to both.
        let rr = round_robin(&["AAA", "BBB"], &[Outcome::Draw]);
        let mut propagator = ScorePropagator::new(rr.win_counts(), rr.outcomes());
        propagator.run_iteration();
        assert!((propagator.scores[0] - (1.0 + 1000.0 / 3.0)).abs() < 1e-12);
        assert_eq!(propagator.scores[0], propagator.scores[1]);
    }

    #[test]
    fn test_mean_is_normalized_after_every_iteration() {
        for seed in 0..20 {
            let rr = random_round_robin(9, seed);
            let mut propagator = ScorePropagator::new(rr.win_counts(), rr.outcomes());
            for iteration in 0..PROPAGATION_ITERATIONS {
                propagator.calculate_scores(1);
                let avg = mean(&propagator.scores);
                assert!(
                    (avg - NORMALIZED_MEAN_SCORE).abs() < 1e-6,
                    "seed {seed} iteration {iteration}: mean {avg}"
                );
            }
        }
    }

    #[test]
    fn test_propagation_is_deterministic() {
        let rr = random_round_robin(12, 7);
        let first = propagate_scores(rr.win_counts(), rr.outcomes());
        let second = propagate_scores(rr.win_counts(), rr.outcomes());
        assert_eq!(first, second);
    }

    #[test]
    fn test_win_credit_sums_to_pair_count() {
        for (n, seed) in [(2, 1), (5, 2), (10, 3), (17, 4)] {
            let rr = random_round_robin(n, seed);
            let total: f64 = rr.win_counts().iter().sum();
            assert_eq!(total, rr.total_pairs() as f64);
            assert_eq!(rr.judged_count(), n * (n - 1) / 2);
        }
    }

    #[test]
    fn test_unresolved_propagates_like_draw() {
        let draws = round_robin(&["AAA", "BBB", "CCC"], &[Outcome::Draw, Outcome::Symbol1Wins, Outcome::Draw]);
        let unresolved = round_robin(
            &["AAA", "BBB", "CCC"],
            &[Outcome::Unresolved, Outcome::Symbol1Wins, Outcome::Unresolved],
        );
        assert_eq!(score_round_robin(&draws), score_round_robin(&unresolved));
    }

    #[test]
    fn test_equal_scores_keep_first_appearance() {
        let rr = round_robin(&["ZZZ", "AAA", "MMM"], &[Outcome::Draw, Outcome::Draw, Outcome::Draw]);
        let order: Vec<String> = score_round_robin(&rr).into_iter().map(|r| r.symbol).collect();
        assert_eq!(order, vec!["ZZZ", "AAA", "MMM"]);
    }

    #[test]
    fn test_scores_stay_positive_with_cycles() {
        // Pairs: AB AC AD BC BD CD
        let rr = round_robin(
            &["AAA", "BBB", "CCC", "DDD"],
            &[
                Outcome::Draw,
                Outcome::Symbol1Wins, // AAA beats CCC
                Outcome::Symbol2Wins, // DDD beats AAA
                Outcome::Symbol2Wins, // CCC beats BBB
                Outcome::Symbol1Wins, // BBB beats DDD
                Outcome::Symbol1Wins, // CCC beats DDD
            ],
        );
        let scores = propagate_scores(rr.win_counts(), rr.outcomes());
        assert!(scores.iter().all(|s| s.is_finite() && *s > 0.0));
    }
}
