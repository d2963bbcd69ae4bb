//! Alert and warning generation from daily risk classifications.
//!
//! Pure derived artifacts: regenerated from the statistics, never mutated.
//! Extreme and High risk days produce alerts; Moderate days — or Low days
//! that still pool more than the advisory depth — produce warnings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analysis::{DailyStats, RiskLevel, SimulationSummary};

/// Low-risk days still warrant an advisory above this max depth, mm.
const ADVISORY_DEPTH_MM: f64 = 10.0;

/// Severity tier of a notice, ordered Low < Moderate < High < Critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

const CRITICAL_ACTIONS: &[&str] = &[
    "Evacuate low-lying areas immediately",
    "Avoid all travel unless absolutely necessary",
    "Move to higher ground",
    "Keep emergency supplies ready",
];

const HIGH_ACTIONS: &[&str] = &[
    "Prepare for potential evacuation",
    "Avoid flooded roads and areas",
    "Keep vehicles in safe locations",
    "Stock emergency supplies",
];

const MODERATE_ACTIONS: &[&str] = &[
    "Monitor weather conditions",
    "Avoid low-lying areas",
    "Be prepared for travel disruptions",
];

const ADVISORY_ACTIONS: &[&str] = &[
    "Exercise caution in low-lying areas",
    "Monitor local conditions",
];

/// One alert or warning record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloodNotice {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub day: usize,
    pub date: NaiveDate,
    pub severity: Severity,
    pub message: String,
    pub actions: &'static [&'static str],
}

/// Counts plus the single highest-risk day (first day attaining the
/// maximal risk ordinal; None only for zero-day runs).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertSummary {
    pub total_alerts: usize,
    pub total_warnings: usize,
    pub highest_risk_day: Option<DailyStats>,
}

/// The full alert artifact handed to serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertBundle {
    pub generated_at: DateTime<Utc>,
    pub simulation_period: String,
    pub alerts: Vec<FloodNotice>,
    pub warnings: Vec<FloodNotice>,
    pub summary: AlertSummary,
}

/// Map every daily record to its notice, partitioned into alerts and
/// warnings. `generated_at` is caller-supplied so the mapping itself stays
/// a pure function.
pub fn generate_alerts(summary: &SimulationSummary, generated_at: DateTime<Utc>) -> AlertBundle {
    let mut alerts = Vec::new();
    let mut warnings = Vec::new();

    for stat in &summary.daily_statistics {
        let depth = stat.max_water_depth_mm;
        let area = stat.flooded_area_km2;
        match stat.risk_level {
            RiskLevel::Extreme => alerts.push(FloodNotice {
                kind: "EXTREME FLOOD WARNING",
                day: stat.day,
                date: stat.date,
                severity: Severity::Critical,
                message: format!(
                    "Extreme flood conditions expected. Water depth may reach {depth}mm. \
                     Approximately {area} km2 may be affected. IMMEDIATE EVACUATION advised."
                ),
                actions: CRITICAL_ACTIONS,
            }),
            RiskLevel::High => alerts.push(FloodNotice {
                kind: "SEVERE FLOOD ALERT",
                day: stat.day,
                date: stat.date,
                severity: Severity::High,
                message: format!(
                    "Severe flooding expected. Water depth up to {depth}mm. \
                     Area of {area} km2 likely to be flooded."
                ),
                actions: HIGH_ACTIONS,
            }),
            RiskLevel::Moderate => warnings.push(FloodNotice {
                kind: "FLOOD WATCH",
                day: stat.day,
                date: stat.date,
                severity: Severity::Moderate,
                message: format!(
                    "Moderate flooding possible. Water depth up to {depth}mm expected."
                ),
                actions: MODERATE_ACTIONS,
            }),
            RiskLevel::Low if depth > ADVISORY_DEPTH_MM => warnings.push(FloodNotice {
                kind: "FLOOD ADVISORY",
                day: stat.day,
                date: stat.date,
                severity: Severity::Low,
                message: format!(
                    "Minor flooding possible in some areas. Water depth up to {depth}mm."
                ),
                actions: ADVISORY_ACTIONS,
            }),
            RiskLevel::Low => {}
        }
    }

    // First day attaining the maximal risk wins ties.
    let highest_risk_day = summary
        .daily_statistics
        .iter()
        .fold(None::<&DailyStats>, |best, stat| match best {
            Some(b) if stat.risk_level <= b.risk_level => Some(b),
            _ => Some(stat),
        })
        .cloned();

    let bundle_summary = AlertSummary {
        total_alerts: alerts.len(),
        total_warnings: warnings.len(),
        highest_risk_day,
    };

    AlertBundle {
        generated_at,
        simulation_period: summary.simulation_period.clone(),
        alerts,
        warnings,
        summary: bundle_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 8, 12, 0, 0).unwrap()
    }

    fn day_stat(day: usize, max_depth: f64) -> DailyStats {
        DailyStats {
            day,
            date: NaiveDate::from_ymd_opt(2024, 6, day as u32).unwrap(),
            max_water_depth_mm: max_depth,
            avg_water_depth_mm: max_depth / 4.0,
            flooded_area_km2: 1.25,
            total_precipitation_mm: 80.0,
            peak_intensity_mm_h: 20.0,
            risk_level: RiskLevel::from_max_depth(max_depth),
        }
    }

    fn summary_of(stats: Vec<DailyStats>) -> SimulationSummary {
        SimulationSummary {
            simulation_period: "2024-06-01 to 2024-06-08".into(),
            total_simulation_hours: stats.len() * 24,
            max_water_depth_mm: stats.iter().map(|s| s.max_water_depth_mm).fold(0.0, f64::max),
            max_flooded_area_km2: 1.25,
            total_precipitation_mm: 560.0,
            grid_resolution: "100x100".into(),
            daily_statistics: stats,
        }
    }

    #[test]
    fn extreme_day_raises_a_critical_alert() {
        let bundle = generate_alerts(&summary_of(vec![day_stat(1, 600.0)]), stamp());
        assert_eq!(bundle.alerts.len(), 1);
        assert!(bundle.warnings.is_empty());

        let alert = &bundle.alerts[0];
        assert_eq!(alert.kind, "EXTREME FLOOD WARNING");
        assert_eq!(alert.severity, Severity::Critical);
        assert!(alert.message.contains("600"), "message: {}", alert.message);
        assert_eq!(alert.actions.len(), 4);
    }

    #[test]
    fn high_day_raises_a_severe_alert() {
        let bundle = generate_alerts(&summary_of(vec![day_stat(1, 250.0)]), stamp());
        assert_eq!(bundle.alerts.len(), 1);
        assert_eq!(bundle.alerts[0].kind, "SEVERE FLOOD ALERT");
        assert_eq!(bundle.alerts[0].severity, Severity::High);
    }

    #[test]
    fn moderate_day_raises_a_watch() {
        let bundle = generate_alerts(&summary_of(vec![day_stat(1, 120.0)]), stamp());
        assert!(bundle.alerts.is_empty());
        assert_eq!(bundle.warnings.len(), 1);
        assert_eq!(bundle.warnings[0].kind, "FLOOD WATCH");
        assert_eq!(bundle.warnings[0].severity, Severity::Moderate);
    }

    #[test]
    fn shallow_low_day_stays_silent_but_pooling_advises() {
        let quiet = generate_alerts(&summary_of(vec![day_stat(1, 8.0)]), stamp());
        assert!(quiet.alerts.is_empty() && quiet.warnings.is_empty());

        let pooling = generate_alerts(&summary_of(vec![day_stat(1, 15.0)]), stamp());
        assert_eq!(pooling.warnings.len(), 1);
        assert_eq!(pooling.warnings[0].kind, "FLOOD ADVISORY");
        assert_eq!(pooling.warnings[0].severity, Severity::Low);
        assert_eq!(pooling.warnings[0].actions.len(), 2);
    }

    #[test]
    fn summary_counts_and_highest_day() {
        let bundle = generate_alerts(
            &summary_of(vec![
                day_stat(1, 30.0),
                day_stat(2, 250.0),
                day_stat(3, 120.0),
                day_stat(4, 260.0),
            ]),
            stamp(),
        );
        assert_eq!(bundle.summary.total_alerts, 2);
        assert_eq!(bundle.summary.total_warnings, 1);
        // Days 2 and 4 are both High; the first one wins.
        let highest = bundle.summary.highest_risk_day.as_ref().unwrap();
        assert_eq!(highest.day, 2);
    }

    #[test]
    fn empty_run_produces_an_empty_bundle() {
        let bundle = generate_alerts(&summary_of(Vec::new()), stamp());
        assert_eq!(bundle.summary.total_alerts, 0);
        assert_eq!(bundle.summary.total_warnings, 0);
        assert!(bundle.summary.highest_risk_day.is_none());
    }

    #[test]
    fn bundle_serializes_with_contract_field_names() {
        let bundle = generate_alerts(&summary_of(vec![day_stat(1, 600.0)]), stamp());
        let json = serde_json::to_string(&bundle).unwrap();
        for field in ["generated_at", "simulation_period", "alerts", "warnings", "type", "severity", "actions"] {
            assert!(json.contains(field), "missing field {field}");
        }
        // The serialized tag matches the display label.
        assert!(json.contains("\"CRITICAL\""));
        assert_eq!(Severity::Critical.label(), "CRITICAL");
    }
}
