//! Derived-figure arithmetic: budgets, installation progress, readiness.
//!
//! These values are computed per request from already-fetched rows and are
//! never stored.

/// Project budget: planned length times the base rate per meter.
pub fn project_budget(total_length_m: f64, base_rate_per_m: f64) -> f64 {
    total_length_m * base_rate_per_m
}

/// Installation progress as a percentage of the planned length.
///
/// Clamped to `[0, 100]`. A project with no planned length has no meaningful
/// progress and reports 0.
pub fn progress_percent(meters_done: f64, total_length_m: f64) -> f64 {
    if total_length_m <= 0.0 {
        return 0.0;
    }
    (meters_done / total_length_m * 100.0).clamp(0.0, 100.0)
}

/// Preparation readiness as a percentage of completed required items.
///
/// Only `required` items count toward the percentage. With no required items
/// the checklist is vacuously 0% ready (nothing has been defined yet).
pub fn readiness_percent(completed_required: i64, total_required: i64) -> f64 {
    if total_required <= 0 {
        return 0.0;
    }
    (completed_required as f64 / total_required as f64 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_length_times_rate() {
        assert_eq!(project_budget(1000.0, 25.5), 25500.0);
        assert_eq!(project_budget(0.0, 25.5), 0.0);
    }

    #[test]
    fn progress_zero_planned_length() {
        assert_eq!(progress_percent(500.0, 0.0), 0.0);
        assert_eq!(progress_percent(500.0, -1.0), 0.0);
    }

    #[test]
    fn progress_normal_case() {
        assert_eq!(progress_percent(250.0, 1000.0), 25.0);
        assert_eq!(progress_percent(1000.0, 1000.0), 100.0);
    }

    #[test]
    fn progress_clamps_overshoot() {
        // More meters logged than planned stays at 100.
        assert_eq!(progress_percent(1500.0, 1000.0), 100.0);
    }

    #[test]
    fn readiness_no_items() {
        assert_eq!(readiness_percent(0, 0), 0.0);
    }

    #[test]
    fn readiness_partial() {
        assert_eq!(readiness_percent(3, 4), 75.0);
        assert_eq!(readiness_percent(4, 4), 100.0);
    }
}
