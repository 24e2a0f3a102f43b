/// Clamp a raw progress value into `[0, 100]`.
///
/// The backend computes the percentage server-side, so the client never
/// trusts it to be in range. NaN is treated as no progress.
pub fn clamp_percentage(raw: f64) -> f64 {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, 100.0)
}

/// Display model for a progress bar: clamped percentage plus a
/// "completed / total" label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    percentage: f64,
    completed: u32,
    total: u32,
}

impl Progress {
    pub fn new(raw: f64, completed: u32, total: u32) -> Self {
        Self {
            percentage: clamp_percentage(raw),
            completed,
            total,
        }
    }

    /// Clamped percentage, unrounded.
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Clamped percentage rounded half away from zero for display.
    pub fn percent(&self) -> u8 {
        self.percentage.round() as u8
    }

    /// Fraction in `[0, 1]`, for gauge widgets.
    pub fn ratio(&self) -> f64 {
        self.percentage / 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.percentage >= 100.0
    }

    pub fn label(&self) -> String {
        format!("{} / {} tasks", self.completed, self.total)
    }

    pub fn percent_label(&self) -> String {
        format!("{}%", self.percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_out_of_range_values() {
        assert_eq!(clamp_percentage(-5.0), 0.0);
        assert_eq!(clamp_percentage(150.0), 100.0);
        assert_eq!(clamp_percentage(42.5), 42.5);
        assert_eq!(clamp_percentage(f64::NAN), 0.0);
        assert_eq!(clamp_percentage(f64::INFINITY), 100.0);
        assert_eq!(clamp_percentage(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn clamped_value_always_in_range() {
        for raw in [-1e9, -0.1, 0.0, 0.1, 33.33, 99.99, 100.0, 100.01, 1e9] {
            let p = clamp_percentage(raw);
            assert!((0.0..=100.0).contains(&p), "{raw} -> {p}");
        }
    }

    #[test]
    fn percent_rounds_for_display() {
        assert_eq!(Progress::new(57.4, 0, 0).percent(), 57);
        assert_eq!(Progress::new(57.5, 0, 0).percent(), 58);
        assert_eq!(Progress::new(66.67, 2, 3).percent(), 67);
        assert_eq!(Progress::new(150.0, 0, 0).percent(), 100);
        assert_eq!(Progress::new(-3.0, 0, 0).percent(), 0);
    }

    #[test]
    fn label_shows_counts() {
        let p = Progress::new(40.0, 2, 5);
        assert_eq!(p.label(), "2 / 5 tasks");
        assert_eq!(p.percent_label(), "40%");
    }

    #[test]
    fn complete_only_at_hundred() {
        assert!(Progress::new(100.0, 5, 5).is_complete());
        assert!(Progress::new(250.0, 5, 5).is_complete());
        assert!(!Progress::new(99.9, 4, 5).is_complete());
    }

    #[test]
    fn ratio_is_fraction() {
        assert_eq!(Progress::new(25.0, 1, 4).ratio(), 0.25);
        assert_eq!(Progress::new(-10.0, 0, 4).ratio(), 0.0);
        assert_eq!(Progress::new(110.0, 4, 4).ratio(), 1.0);
    }
}
