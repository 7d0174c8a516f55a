//! Scoring module - line clear points, drop points, levels and gravity speed
//!
//! Line clears pay `LINE_CLEAR_SCORES[lines] * level`, using the level in
//! effect when the clearing piece locked. Levels start at 1 and advance every
//! 10 lines.

use std::time::Duration;

use crate::types::{
    BASE_DROP_MS, DROP_DECAY, DROP_INTERVAL_MIN_MS, HARD_DROP_POINTS_PER_CELL, LINES_PER_LEVEL,
    LINE_CLEAR_SCORES, SOFT_DROP_POINTS_PER_CELL, START_LEVEL,
};

/// Calculate line clear score
/// lines: number of lines cleared by one lock (0-4)
/// level: level at the moment of the lock (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    LINE_CLEAR_SCORES
        .get(lines)
        .copied()
        .unwrap_or(0)
        .saturating_mul(level)
}

/// Calculate drop score
/// soft_drop: +1 per cell
/// hard_drop: +2 per cell
pub fn calculate_drop_score(cells: u32, is_hard_drop: bool) -> u32 {
    let per_cell = if is_hard_drop {
        HARD_DROP_POINTS_PER_CELL
    } else {
        SOFT_DROP_POINTS_PER_CELL
    };
    cells.saturating_mul(per_cell)
}

/// Level for a running line total
pub fn calculate_level(total_lines: u32) -> u32 {
    START_LEVEL + total_lines / LINES_PER_LEVEL
}

/// Gravity interval for a level, in milliseconds
///
/// `max(80, round(800 * 0.86^(level - 1)))`
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    let interval = (f64::from(BASE_DROP_MS) * DROP_DECAY.powi(exponent)).round();
    (interval as u32).max(DROP_INTERVAL_MIN_MS)
}

/// Gravity interval for a level
pub fn drop_interval(level: u32) -> Duration {
    Duration::from_millis(u64::from(get_drop_interval_ms(level)))
}
