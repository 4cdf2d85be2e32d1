//! Scoring module - classic line-clear scoring, levels and gravity dwell
//!
//! - Line clears award `LINE_SCORES[lines - 1] * (level + 1)`.
//! - Level is `lines / 10`.
//! - Soft drop awards one point per row descended.

use crate::types::{Timing, LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_POINTS};

/// Calculate line clear score
/// lines: number of lines cleared at once; more than 4 scores as 4
/// level: level before the clear (0-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 {
        return 0;
    }
    let base_score = LINE_SCORES[lines.min(LINE_SCORES.len()) - 1];
    base_score.saturating_mul(level.saturating_add(1))
}

/// Calculate drop score for `rows` rows soft dropped
pub fn calculate_drop_score(rows: u32) -> u32 {
    rows.saturating_mul(SOFT_DROP_POINTS)
}

/// Level management
/// Level increases every 10 lines cleared
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL
}

/// Seconds a piece may stay on a row at `level` before gravity moves it
pub fn dwell_time(level: u32, timing: &Timing) -> f64 {
    let dwell = timing.base_dwell - level as f64 * timing.dwell_step;
    dwell.max(timing.min_dwell)
}
