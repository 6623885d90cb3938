/// Instruction building for pairwise judgments.
///
/// A template carries three placeholder tokens that are replaced verbatim:
/// `OBJECTIVE`, `SYMBOL1`, `SYMBOL2`.
use std::path::Path;

use crate::bail;

pub const OBJECTIVE_TOKEN: &str = "OBJECTIVE";
pub const SYMBOL1_TOKEN: &str = "SYMBOL1";
pub const SYMBOL2_TOKEN: &str = "SYMBOL2";

/// Built-in instruction template, used when no template file is given.
pub const DEFAULT_TEMPLATE: &str = "\
You are comparing two symbols against an objective.

Objective: OBJECTIVE

Which of SYMBOL1 and SYMBOL2 better satisfies the objective?
Answer with exactly one symbol, either SYMBOL1 or SYMBOL2, and nothing else.
";

/// Substitute the objective and both symbols into `template`.
///
/// The objective is substituted first, so an objective mentioning the
/// symbol tokens gets them replaced as well.
pub fn build_instruction(template: &str, objective: &str, symbol1: &str, symbol2: &str) -> String {
    template
        .replace(OBJECTIVE_TOKEN, objective)
        .replace(SYMBOL1_TOKEN, symbol1)
        .replace(SYMBOL2_TOKEN, symbol2)
}

/// Load a template file and verify it mentions both symbol tokens.
pub fn load_template(path: &Path) -> String {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read instructions file {}: {e}", path.display())));

    for token in [OBJECTIVE_TOKEN, SYMBOL1_TOKEN, SYMBOL2_TOKEN] {
        if !content.contains(token) {
            tracing::warn!(path = %path.display(), token, "instruction template is missing a placeholder");
        }
    }
    content
}
