/// Symbol and objective loading.
use std::io::{self, BufRead, IsTerminal};
use std::path::Path;

use roundrank_core::normalize_symbols;

use crate::bail;

/// Parse a symbol source as either a JSON array of strings or plain text
/// (one symbol per line). The result is normalized: trimmed, upper-cased,
/// deduplicated, blanks dropped.
pub fn parse_symbols_from_str(content: &str) -> Result<Vec<String>, serde_json::Error> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let raw: Vec<String> = serde_json::from_str(trimmed)?;
        Ok(normalize_symbols(raw))
    } else {
        Ok(normalize_symbols(trimmed.lines()))
    }
}

/// The objective is the first line whose first character is alphanumeric.
///
/// Lines starting with whitespace or punctuation (comments, bullets) are skipped.
pub fn extract_objective(content: &str) -> Option<String> {
    content
        .lines()
        .find(|l| l.chars().next().is_some_and(char::is_alphanumeric))
        .map(|l| l.trim_end().to_string())
}

/// Load symbols from the symbols file, inline `--symbol` values, or stdin.
///
/// A missing default file is not an error when inline symbols were given.
pub fn load_symbols(path: &Path, path_was_explicit: bool, inline: &[String]) -> Vec<String> {
    let mut raw = Vec::new();

    match std::fs::read_to_string(path) {
        Ok(content) => {
            raw = parse_symbols_from_str(&content)
                .unwrap_or_else(|e| bail(format!("{} looks like JSON but failed to parse: {e}", path.display())));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound && !path_was_explicit => {}
        Err(e) => bail(format!("Failed to read symbols file {}: {e}", path.display())),
    }

    raw.extend(inline.iter().cloned());

    // From stdin (only if nothing else provided anything)
    if raw.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No symbols provided. Use --symbols <file>, --symbol <name>, or pipe symbols via stdin.");
        }
        let content = stdin
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}")))
            .join("\n");
        raw = parse_symbols_from_str(&content)
            .unwrap_or_else(|e| bail(format!("stdin looks like JSON but failed to parse: {e}")));
    }

    normalize_symbols(raw)
}

/// Read the objective file; an absent objective line is reported by the caller.
pub fn load_objective(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path)
        .unwrap_or_else(|e| bail(format!("Failed to read objective file {}: {e}", path.display())));
    extract_objective(&content)
}
