/// AI tuning constants, indexed by difficulty level (1..=3).
///
/// Scores are centipawns; see `ai::tactics::capture_value`.
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 3;

/// Half-width of the uniform noise added to every candidate score.
pub const NOISE: [i32; 3] = [150, 50, 10];

/// Think interval as a multiple of the speed's ticks per square.
pub const THINK_INTERVAL_SQUARES: [u64; 3] = [3, 2, 1];

/// Probability of acting once the think interval has elapsed.
pub const MOVE_PROBABILITY: [f64; 3] = [0.4, 0.7, 0.95];

/// Level 1 picks uniformly among this many best moves.
pub const TOP_K_LEVEL_ONE: usize = 3;

/// Small bonus per square of forward progress for pawns.
pub const PAWN_ADVANCE_BONUS: i32 = 10;

/// Bonus for standing close to the centre, per square of reduced distance.
pub const CENTER_BONUS: i32 = 5;

/// Fraction (percent) of the moving piece's value lost when its destination is merely exposed.
pub const EXPOSED_PENALTY_PERCENT: i32 = 30;

/// Flat bonus for a destination an own piece can retake right after an enemy arrives.
pub const RECAPTURE_BONUS: i32 = 40;

/// Clamp a requested level into the supported range and return its table index.
pub fn level_index(level: u8) -> usize {
    (level.clamp(MIN_LEVEL, MAX_LEVEL) - MIN_LEVEL) as usize
}
