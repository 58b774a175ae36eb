//! Session high score
//!
//! Lives only as long as the session; nothing is written to storage.

use serde::{Deserialize, Serialize};

use crate::consts::{HIGH_SCORE_GAP, SCORE_DIGITS, SCORE_GLYPH_WIDTH};

/// Render a score zero-padded to the display width
pub fn format_score(score: u32) -> String {
    format!("{:0width$}", score, width = SCORE_DIGITS)
}

/// Best score seen this session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    pub fn new() -> Self {
        Self { best: 0 }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Keep the larger of the current best and `score`. Returns true on a new best.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.best {
            log::info!("New high score: {} (was {})", score, self.best);
            self.best = score;
            true
        } else {
            false
        }
    }

    /// "HI 00250"
    pub fn display_text(&self) -> String {
        format!("HI {}", format_score(self.best))
    }

    /// Right-anchored x for the high score so it sits left of the score display
    pub fn display_x(score_x: f32, score_text: &str) -> f32 {
        score_x - score_text.len() as f32 * SCORE_GLYPH_WIDTH - HIGH_SCORE_GAP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_pads() {
        assert_eq!(format_score(0), "00000");
        assert_eq!(format_score(42), "00042");
        assert_eq!(format_score(99999), "99999");
        assert_eq!(format_score(123456), "123456");
    }

    #[test]
    fn test_record_keeps_max() {
        let mut high = HighScore::new();
        assert!(high.record(100));
        assert!(!high.record(50));
        assert!(!high.record(100));
        assert_eq!(high.best(), 100);
        assert!(high.record(250));
        assert_eq!(high.display_text(), "HI 00250");
    }

    #[test]
    fn test_display_x() {
        let x = HighScore::display_x(1000.0, "00250");
        assert_eq!(x, 1000.0 - 5.0 * SCORE_GLYPH_WIDTH - HIGH_SCORE_GAP);
    }
}
