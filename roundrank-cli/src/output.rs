/// Output formatting: progress lines, result tables and JSON.
use std::io::{self, Write};

use roundrank_core::{Outcome, RankedSymbol, WinCountEntry};
use serde::Serialize;

/// One judged pair with the running totals after it.
pub struct ProgressLine<'a> {
    pub symbol1: &'a str,
    pub symbol2: &'a str,
    /// Empty for a draw.
    pub winner: &'a str,
    pub outcome: Outcome,
    /// Win counts of `(symbol1, symbol2)` after this pair.
    pub running_wins: (f64, f64),
    pub running_cost: f64,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    objective: &'a str,
    scores: &'a [RankedSymbol],
    win_counts: &'a [WinCountEntry],
    pairs_judged: usize,
    unresolved: usize,
    retries: usize,
    prompt_tokens: u64,
    completion_tokens: u64,
    cost: f64,
}

/// Totals reported after the tables.
pub struct RunSummary<'a> {
    pub objective: &'a str,
    pub pairs_judged: usize,
    pub unresolved: usize,
    pub retries: usize,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub cost: f64,
}

pub fn write_progress_header<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{:>5} {:>5}  {:>6}  {:>9}  {:>7}", "SYMB1", "SYMB2", "WINNER", "WCOUNT", "COST($)")
}

/// Winner's running count for a win; both counts for a draw.
pub fn write_progress_line<W: Write>(out: &mut W, line: &ProgressLine) -> io::Result<()> {
    let wcount = if line.outcome.is_draw() {
        format!("{:.1}/{:.1}", line.running_wins.0, line.running_wins.1)
    } else if line.outcome == Outcome::Symbol1Wins {
        format!("{:.1}", line.running_wins.0)
    } else {
        format!("{:.1}", line.running_wins.1)
    };
    let marker = if line.outcome == Outcome::Unresolved { "  (unresolved)" } else { "" };

    writeln!(
        out,
        "{:>5} {:>5}  {:>6}  {:>9}  {:>7.2}{}",
        line.symbol1, line.symbol2, line.winner, wcount, line.running_cost, marker
    )?;
    out.flush()
}

/// Echo the loaded symbols and objective ahead of the progress table.
pub fn write_preamble<W: Write>(out: &mut W, symbols: &[String], objective: &str) -> io::Result<()> {
    writeln!(out, "Loaded symbols: {}", symbols.join(", "))?;
    writeln!(out, "Objective: {objective}")?;
    writeln!(out)
}

/// Print scores (descending) then win counts (descending, alphabetical ties).
pub fn print_tables(scores: &[RankedSymbol], win_counts: &[WinCountEntry], summary: &RunSummary) {
    let name_width = scores
        .iter()
        .map(|r| r.symbol.len())
        .max()
        .unwrap_or(7)
        .max(7);

    println!();
    println!("Scores:");
    for r in scores {
        println!("{:>name_width$} {:>8.2}", r.symbol, r.score);
    }

    println!();
    println!("Win counts:");
    for w in win_counts {
        println!("{:>name_width$} {:>8.2}", w.symbol, w.wins);
    }

    println!();
    println!(
        "{} pairs judged ({} unresolved, {} retries) | tokens: {} in + {} out | cost: ${:.2}",
        summary.pairs_judged,
        summary.unresolved,
        summary.retries,
        summary.prompt_tokens,
        summary.completion_tokens,
        summary.cost,
    );
}

fn render_json(scores: &[RankedSymbol], win_counts: &[WinCountEntry], summary: &RunSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonOutput {
        objective: summary.objective,
        scores,
        win_counts,
        pairs_judged: summary.pairs_judged,
        unresolved: summary.unresolved,
        retries: summary.retries,
        prompt_tokens: summary.prompt_tokens,
        completion_tokens: summary.completion_tokens,
        cost: summary.cost,
    })
}

/// Print results as JSON.
pub fn print_json(scores: &[RankedSymbol], win_counts: &[WinCountEntry], summary: &RunSummary) -> serde_json::Result<()> {
    println!("{}", render_json(scores, win_counts, summary)?);
    Ok(())
}
