/// Mean score every propagation iteration renormalizes to.
pub const NORMALIZED_MEAN_SCORE: f64 = 1000.0;

/// Fixed number of propagation iterations.
///
/// This is a literal count, not a convergence tolerance: the magnitude of the
/// final scores depends on it, so changing it changes every reported number.
pub const PROPAGATION_ITERATIONS: usize = 20;

/// Additive smoothing applied to win counts when seeding the initial scores,
/// so a symbol with no wins still starts above zero.
pub const INITIAL_WIN_SMOOTHING: f64 = 1.0;

/// Floor every symbol's accumulator starts from on each iteration.
pub const ITERATION_SCORE_FLOOR: f64 = 1.0;

/// A draw transfers `opponent_score / DRAW_TRANSFER_DIVISOR` each way,
/// weaker than the full transfer of a clear win.
pub const DRAW_TRANSFER_DIVISOR: f64 = 3.0;

/// Win-count credit for a clear win.
pub const WIN_CREDIT: f64 = 1.0;

/// Win-count credit each side receives for a draw.
pub const DRAW_CREDIT: f64 = 0.5;

/// Token prices are quoted per this many tokens.
pub const TOKENS_PER_PRICE_UNIT: f64 = 1_000_000.0;
