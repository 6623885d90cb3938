/// Round-robin tournament accumulator.
///
/// Pure bookkeeping with no async or IO. The caller judges each pair
/// externally, in the order `pairs()` returns, and feeds each outcome back
/// through `record()`.
use crate::types::{Outcome, Pair, SymbolIndex, WinCountEntry};

/// Number of unordered pairs among `num_symbols` symbols: n·(n−1)/2.
pub fn total_pairs(num_symbols: usize) -> usize {
    num_symbols * num_symbols.saturating_sub(1) / 2
}

/// Every unordered pair exactly once: outer `i` ascending, inner `j > i` ascending.
pub fn round_robin_pairs(num_symbols: usize) -> impl Iterator<Item = Pair> {
    (0..num_symbols).flat_map(move |i| ((i + 1)..num_symbols).map(move |j| (i, j)))
}

/// Outcomes keyed by enumerated pair, stored as a packed upper triangle.
#[derive(Debug, Clone)]
pub struct OutcomeTable {
    num_symbols: usize,
    slots: Vec<Option<Outcome>>,
}

impl OutcomeTable {
    pub fn new(num_symbols: usize) -> Self {
        OutcomeTable {
            num_symbols,
            slots: vec![None; total_pairs(num_symbols)],
        }
    }

    fn slot(&self, (i, j): Pair) -> usize {
        assert!(
            i < j && j < self.num_symbols,
            "pair ({}, {}) out of range (num_symbols = {})",
            i,
            j,
            self.num_symbols
        );
        // Pairs before row i, then the offset within row i.
        i * self.num_symbols - i * (i + 1) / 2 + (j - i - 1)
    }

    /// Record the outcome for `pair`. Each pair is written exactly once.
    pub fn insert(&mut self, pair: Pair, outcome: Outcome) {
        let slot = self.slot(pair);
        assert!(
            self.slots[slot].is_none(),
            "pair ({}, {}) already has a recorded outcome",
            pair.0,
            pair.1
        );
        self.slots[slot] = Some(outcome);
    }

    pub fn num_symbols(&self) -> usize {
        self.num_symbols
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Recorded outcomes in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Pair, Outcome)> + '_ {
        round_robin_pairs(self.num_symbols)
            .zip(self.slots.iter())
            .filter_map(|(pair, slot)| slot.map(|outcome| (pair, outcome)))
    }
}

pub struct RoundRobin {
    index: SymbolIndex,
    outcomes: OutcomeTable,
    win_counts: Vec<f64>,
}

impl RoundRobin {
    /// `symbols` must already be normalized: no duplicates, no blanks.
    pub fn new(symbols: Vec<String>) -> Self {
        let index = SymbolIndex::from_symbols(symbols);
        let num_symbols = index.len();
        assert!(num_symbols >= 2, "RoundRobin requires at least two symbols to compare.");

        RoundRobin {
            index,
            outcomes: OutcomeTable::new(num_symbols),
            win_counts: vec![0.0; num_symbols],
        }
    }

    pub fn num_symbols(&self) -> usize {
        self.index.len()
    }

    pub fn symbols(&self) -> &[String] {
        self.index.names()
    }

    pub fn symbol(&self, idx: usize) -> &str {
        self.index.name(idx)
    }

    /// All pairs in the order they must be judged.
    pub fn pairs(&self) -> Vec<Pair> {
        round_robin_pairs(self.num_symbols()).collect()
    }

    pub fn total_pairs(&self) -> usize {
        total_pairs(self.num_symbols())
    }

    /// Record a judged pair and credit its win counts.
    ///
    /// Returns the running win counts of `(symbol1, symbol2)` after the update.
    pub fn record(&mut self, pair: Pair, outcome: Outcome) -> (f64, f64) {
        self.outcomes.insert(pair, outcome);
        let (credit1, credit2) = outcome.credits();
        self.win_counts[pair.0] += credit1;
        self.win_counts[pair.1] += credit2;
        (self.win_counts[pair.0], self.win_counts[pair.1])
    }

    pub fn outcomes(&self) -> &OutcomeTable {
        &self.outcomes
    }

    /// Accumulated win credit, same order as `symbols()`.
    pub fn win_counts(&self) -> &[f64] {
        &self.win_counts
    }

    pub fn judged_count(&self) -> usize {
        self.outcomes.iter().count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| *o == Outcome::Unresolved).count()
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.is_complete()
    }

    /// Win counts sorted descending, ties broken alphabetically.
    pub fn ranked_win_counts(&self) -> Vec<WinCountEntry> {
        let mut entries: Vec<WinCountEntry> = self
            .symbols()
            .iter()
            .zip(self.win_counts.iter())
            .map(|(symbol, &wins)| WinCountEntry { symbol: symbol.clone(), wins })
            .collect();
        entries.sort_by(|a, b| b.wins.total_cmp(&a.wins).then_with(|| a.symbol.cmp(&b.symbol)));
        entries
    }
}
