use std::collections::HashSet;

use crate::constants::{DRAW_CREDIT, WIN_CREDIT};

/// An unordered symbol pair as enumerated: `(i, j)` with `i < j`.
///
/// `i` is always "symbol1" and `j` "symbol2" for that pair.
pub type Pair = (usize, usize);

/// Normalized three-way result of judging one pair.
///
/// `Unresolved` marks a judgment whose oracle call failed (unparseable body,
/// unexpected error, retries exhausted). It is credited and propagated exactly
/// like `Draw`; it exists so a run can report how many pairs were not
/// genuinely decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    Symbol1Wins,
    Symbol2Wins,
    Draw,
    Unresolved,
}

impl Outcome {
    /// True for both a real draw and an unresolved judgment.
    pub fn is_draw(self) -> bool {
        matches!(self, Outcome::Draw | Outcome::Unresolved)
    }

    /// Win-count credit `(symbol1, symbol2)`. Always sums to 1.0.
    pub fn credits(self) -> (f64, f64) {
        match self {
            Outcome::Symbol1Wins => (WIN_CREDIT, 0.0),
            Outcome::Symbol2Wins => (0.0, WIN_CREDIT),
            Outcome::Draw | Outcome::Unresolved => (DRAW_CREDIT, DRAW_CREDIT),
        }
    }

    /// Index of the winning symbol within `pair`, `None` for draws.
    pub fn winner(self, pair: Pair) -> Option<usize> {
        match self {
            Outcome::Symbol1Wins => Some(pair.0),
            Outcome::Symbol2Wins => Some(pair.1),
            Outcome::Draw | Outcome::Unresolved => None,
        }
    }
}

/// A symbol with its final propagated score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedSymbol {
    pub symbol: String,
    pub score: f64,
}

/// A symbol with its accumulated win credit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WinCountEntry {
    pub symbol: String,
    pub wins: f64,
}

/// Symbol names by their 0..N positions. Names are distinct and non-blank.
pub(crate) struct SymbolIndex {
    symbols: Vec<String>,
}

impl SymbolIndex {
    pub fn from_symbols(symbols: Vec<String>) -> Self {
        let mut seen = HashSet::with_capacity(symbols.len());
        for (idx, symbol) in symbols.iter().enumerate() {
            assert!(!symbol.trim().is_empty(), "Blank symbol at position {}", idx);
            assert!(seen.insert(symbol.as_str()), "Duplicate symbol: {}", symbol);
        }
        SymbolIndex { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn name(&self, idx: usize) -> &str {
        &self.symbols[idx]
    }

    pub fn names(&self) -> &[String] {
        &self.symbols
    }
}
