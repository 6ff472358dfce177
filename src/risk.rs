use crate::models::{DayOutcome, FloodWarning};

/// Worst case over the horizon.
///
/// Any flooding day wins. Otherwise any warning day yields a warning carrying
/// the highest level seen on any day, not just the warning days.
pub fn overall_risk(outcomes: &[DayOutcome]) -> FloodWarning {
    let warnings: Vec<FloodWarning> = outcomes.iter().map(|o| o.warning).collect();
    overall_risk_from_warnings(&warnings, peak_level(outcomes))
}

/// Same reduction over bare warnings, with the peak level supplied by the caller.
pub fn overall_risk_from_warnings(warnings: &[FloodWarning], peak_level: f64) -> FloodWarning {
    if warnings.iter().any(FloodWarning::is_flooding) {
        FloodWarning::Flooding
    } else if warnings.iter().any(FloodWarning::is_warning) {
        FloodWarning::Warning(peak_level)
    } else {
        FloodWarning::NoRisk
    }
}

/// Highest river level across all days, 0.0 for an empty run.
pub fn peak_level(outcomes: &[DayOutcome]) -> f64 {
    outcomes
        .iter()
        .map(|o| o.river.current_level)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiverState;

    fn day(level: f64, warning: FloodWarning) -> DayOutcome {
        DayOutcome {
            river: RiverState::new(level, 10.0, 50.0),
            warning,
        }
    }

    #[test]
    fn test_flooding_dominates() {
        let outcomes = [
            day(3.0, FloodWarning::NoRisk),
            day(8.5, FloodWarning::Warning(8.5)),
            day(10.0, FloodWarning::Flooding),
            day(4.0, FloodWarning::NoRisk),
        ];
        assert_eq!(overall_risk(&outcomes), FloodWarning::Flooding);
    }

    #[test]
    fn test_flooding_dominates_bare_warnings() {
        let warnings = [
            FloodWarning::NoRisk,
            FloodWarning::Warning(8.5),
            FloodWarning::Flooding,
            FloodWarning::NoRisk,
        ];
        assert_eq!(
            overall_risk_from_warnings(&warnings, 10.0),
            FloodWarning::Flooding
        );
    }

    #[test]
    fn test_warning_carries_peak_across_all_days() {
        let mut outcomes = vec![
            day(8.2, FloodWarning::Warning(8.2)),
            day(6.0, FloodWarning::NoRisk),
        ];
        // Peak sits on a day tagged NoRisk
        outcomes.push(DayOutcome {
            river: RiverState::new(9.1, 10.0, 50.0),
            warning: FloodWarning::NoRisk,
        });

        assert_eq!(overall_risk(&outcomes), FloodWarning::Warning(9.1));
    }

    #[test]
    fn test_no_risk_when_all_days_calm() {
        let outcomes = [day(2.0, FloodWarning::NoRisk), day(3.0, FloodWarning::NoRisk)];
        assert_eq!(overall_risk(&outcomes), FloodWarning::NoRisk);
    }

    #[test]
    fn test_empty_run_is_no_risk() {
        assert_eq!(overall_risk(&[]), FloodWarning::NoRisk);
        assert_eq!(peak_level(&[]), 0.0);
    }
}
