/// Sequential round-robin tournament runner.
///
/// Judges every pair strictly one at a time in enumeration order, because each
/// progress line reports running totals that depend on all earlier pairs.
use std::io::{self, Write};

use roundrank_core::{CostAccumulator, Pricing, RoundRobin};
use tracing::info;

use crate::error::PlanError;
use crate::llm::Judge;
use crate::output::{ProgressLine, write_progress_header, write_progress_line};
use crate::prompt::build_instruction;

/// Validated inputs for one run. Building it performs every precondition
/// check, so a plan that exists is safe to hand to the oracle.
#[derive(Debug)]
pub struct TournamentPlan {
    symbols: Vec<String>,
    objective: String,
    template: String,
}

impl TournamentPlan {
    /// `symbols` must already be normalized.
    pub fn new(symbols: Vec<String>, objective: Option<String>, template: String) -> Result<Self, PlanError> {
        let objective = match objective {
            Some(o) if !o.trim().is_empty() => o,
            _ => return Err(PlanError::MissingObjective),
        };
        if symbols.len() < 2 {
            return Err(PlanError::TooFewSymbols(symbols.len()));
        }
        Ok(TournamentPlan {
            symbols,
            objective,
            template,
        })
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }
}

/// Everything a finished run produced.
pub struct TournamentReport {
    pub round_robin: RoundRobin,
    pub cost: CostAccumulator,
    pub total_retries: usize,
}

/// Judge every pair once and accumulate outcomes, win counts and cost.
///
/// Writes the progress header and one line per judged pair to `out`.
pub async fn run_tournament<J, W>(
    judge: &J,
    plan: &TournamentPlan,
    pricing: Pricing,
    out: &mut W,
) -> io::Result<TournamentReport>
where
    J: Judge + ?Sized,
    W: Write,
{
    let mut round_robin = RoundRobin::new(plan.symbols.clone());
    let mut cost = CostAccumulator::new(pricing);
    let mut total_retries = 0;

    info!(
        symbols = round_robin.num_symbols(),
        pairs = round_robin.total_pairs(),
        "starting round robin"
    );
    write_progress_header(out)?;

    for pair in round_robin.pairs() {
        let symbol1 = round_robin.symbol(pair.0).to_string();
        let symbol2 = round_robin.symbol(pair.1).to_string();
        let instruction = build_instruction(&plan.template, &plan.objective, &symbol1, &symbol2);

        let judgment = judge.judge(&symbol1, &symbol2, &instruction).await;
        total_retries += judgment.retries;

        let running_cost = cost.add(judgment.prompt_tokens, judgment.completion_tokens);
        let running_wins = round_robin.record(pair, judgment.outcome);
        let winner = judgment.outcome.winner(pair).map_or("", |idx| round_robin.symbol(idx));

        write_progress_line(
            out,
            &ProgressLine {
                symbol1: &symbol1,
                symbol2: &symbol2,
                winner,
                outcome: judgment.outcome,
                running_wins,
                running_cost,
            },
        )?;
    }

    info!(
        judged = round_robin.judged_count(),
        unresolved = round_robin.unresolved_count(),
        retries = total_retries,
        cost = cost.total(),
        "round robin complete"
    );

    Ok(TournamentReport {
        round_robin,
        cost,
        total_retries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::extract_objective;
    use crate::llm::Judgment;
    use crate::parse::classify_verdict;
    use crate::prompt::DEFAULT_TEMPLATE;
    use async_trait::async_trait;
    use roundrank_core::{Outcome, score_round_robin, total_pairs};
    use std::sync::Mutex;

    const PRICING: Pricing = Pricing {
        prompt_per_million: 5.0,
        completion_per_million: 25.0,
    };

    /// Answers with whichever symbol appears first in `strength`; unknown
    /// symbols make it answer with prose naming neither.
    struct StrengthJudge {
        strength: Vec<&'static str>,
        calls: Mutex<Vec<(String, String, String)>>,
    }

    impl StrengthJudge {
        fn new(strength: &[&'static str]) -> Self {
            StrengthJudge {
                strength: strength.to_vec(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Judge for StrengthJudge {
        async fn judge(&self, symbol1: &str, symbol2: &str, instruction: &str) -> Judgment {
            self.calls
                .lock()
                .unwrap()
                .push((symbol1.to_string(), symbol2.to_string(), instruction.to_string()));

            let rank = |s: &str| self.strength.iter().position(|x| *x == s);
            let text = match (rank(symbol1), rank(symbol2)) {
                (Some(a), Some(b)) if a < b => format!("The answer is {symbol1}."),
                (Some(_), Some(_)) => format!("The answer is {symbol2}."),
                _ => "I cannot tell.".to_string(),
            };

            Judgment {
                outcome: classify_verdict(&text, symbol1, symbol2),
                prompt_tokens: 100,
                completion_tokens: 4,
                retries: 0,
            }
        }
    }

    fn plan(symbols: &[&str]) -> TournamentPlan {
        TournamentPlan::new(
            symbols.iter().map(|s| s.to_string()).collect(),
            Some("growth".to_string()),
            DEFAULT_TEMPLATE.to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_three_symbol_tournament_end_to_end() {
        let judge = StrengthJudge::new(&["AAA", "BBB", "CCC"]);
        let mut out = Vec::new();

        let report = run_tournament(&judge, &plan(&["AAA", "BBB", "CCC"]), PRICING, &mut out)
            .await
            .unwrap();

        let rr = &report.round_robin;
        assert_eq!(rr.win_counts(), &[2.0, 1.0, 0.0]);

        let ranked = score_round_robin(rr);
        let order: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(order, vec!["AAA", "BBB", "CCC"]);
        let mean = ranked.iter().map(|r| r.score).sum::<f64>() / ranked.len() as f64;
        assert!((mean - 1000.0).abs() < 1e-9);

        let expected_cost = 3.0 * PRICING.cost_of(100, 4);
        assert!((report.cost.total() - expected_cost).abs() < 1e-12);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4, "header + one line per pair:\n{text}");
        let winners: Vec<&str> = lines[1..].iter().map(|l| l.split_whitespace().nth(2).unwrap()).collect();
        assert_eq!(winners, vec!["AAA", "AAA", "BBB"]);
    }

    #[tokio::test]
    async fn test_every_pair_judged_once_in_order() {
        let names = ["S1", "S2", "S3", "S4", "S5", "S6", "S7"];
        let judge = StrengthJudge::new(&names);
        let mut out = Vec::new();

        let report = run_tournament(&judge, &plan(&names), PRICING, &mut out).await.unwrap();

        let calls = judge.calls.lock().unwrap();
        assert_eq!(calls.len(), total_pairs(names.len()));
        let mut expected = Vec::new();
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                expected.push((names[i].to_string(), names[j].to_string()));
            }
        }
        let seen: Vec<(String, String)> = calls.iter().map(|(a, b, _)| (a.clone(), b.clone())).collect();
        assert_eq!(seen, expected);

        assert!(report.round_robin.is_complete());
        let credit: f64 = report.round_robin.win_counts().iter().sum();
        assert_eq!(credit, total_pairs(names.len()) as f64);
    }

    #[tokio::test]
    async fn test_instruction_is_substituted() {
        let judge = StrengthJudge::new(&["AAPL", "MSFT"]);
        let mut out = Vec::new();
        run_tournament(&judge, &plan(&["AAPL", "MSFT"]), PRICING, &mut out).await.unwrap();

        let calls = judge.calls.lock().unwrap();
        let instruction = &calls[0].2;
        assert!(instruction.contains("Objective: growth"));
        assert!(instruction.contains("AAPL"));
        assert!(instruction.contains("MSFT"));
    }

    #[tokio::test]
    async fn test_undecided_judge_gives_half_credit() {
        let judge = StrengthJudge::new(&[]);
        let mut out = Vec::new();
        let report = run_tournament(&judge, &plan(&["AAA", "BBB", "CCC", "DDD"]), PRICING, &mut out)
            .await
            .unwrap();

        assert_eq!(report.round_robin.win_counts(), &[1.5, 1.5, 1.5, 1.5]);
        assert!(report.round_robin.outcomes().iter().all(|(_, o)| o == Outcome::Draw));
    }

    #[test]
    fn test_objective_file_without_objective_line_rejects_plan() {
        let objective = extract_objective("# objective goes here\n\n  not at column zero\n");
        assert_eq!(objective, None);

        let result = TournamentPlan::new(
            vec!["AAA".into(), "BBB".into()],
            objective,
            DEFAULT_TEMPLATE.to_string(),
        );

        assert_eq!(result.unwrap_err(), PlanError::MissingObjective);
    }

    #[test]
    fn test_blank_objective_is_missing() {
        let result = TournamentPlan::new(vec!["AAA".into(), "BBB".into()], Some("   ".into()), String::new());
        assert_eq!(result.unwrap_err(), PlanError::MissingObjective);
    }

    #[test]
    fn test_too_few_symbols() {
        let result = TournamentPlan::new(vec!["AAA".into()], Some("growth".into()), String::new());
        assert_eq!(result.unwrap_err(), PlanError::TooFewSymbols(1));
    }
}
