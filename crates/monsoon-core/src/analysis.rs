//! Progression analysis: daily statistics, risk classification, and the
//! run-level summary handed to serialization and alerting.
//!
//! A pure reduction over the depth/extent/precipitation series — re-running
//! it on the same arrays produces identical records.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::grid::{ExtentSeries, FieldSeries};

/// Hourly timesteps per simulated day.
pub const STEPS_PER_DAY: usize = 24;
/// Assumed footprint of one grid cell, km² (0.4 km cell side at the
/// reference 100-cell resolution over the ~40 km region box).
pub const CELL_AREA_KM2: f64 = 0.16;

// ── Risk classification ───────────────────────────────────────────────────────

/// Four-level daily risk label, ordered Low < Moderate < High < Extreme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

impl RiskLevel {
    /// Classify a daily maximum water depth in mm. Boundaries at 50/200/500
    /// are exclusive on the low side: exactly 50.0 is already Moderate.
    pub fn from_max_depth(depth_mm: f64) -> Self {
        if depth_mm < 50.0 {
            Self::Low
        } else if depth_mm < 200.0 {
            Self::Moderate
        } else if depth_mm < 500.0 {
            Self::High
        } else {
            Self::Extreme
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::Extreme => "Extreme",
        }
    }

    /// Numeric ordinal used by forecast consumers (Low=1 … Extreme=4).
    pub fn score(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Moderate => 2,
            Self::High => 3,
            Self::Extreme => 4,
        }
    }
}

// ── Records ───────────────────────────────────────────────────────────────────

/// One simulated day's reduced statistics. Depth and precipitation figures
/// are rounded to one decimal, areas to two, for human-facing output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    /// 1-based day index.
    pub day: usize,
    pub date: NaiveDate,
    pub max_water_depth_mm: f64,
    /// Mean over cells holding water; 0.0 when the whole day stayed dry.
    pub avg_water_depth_mm: f64,
    /// Cells whose daily-maximum flood class is nonzero, scaled by the
    /// per-cell area assumption.
    pub flooded_area_km2: f64,
    pub total_precipitation_mm: f64,
    pub peak_intensity_mm_h: f64,
    pub risk_level: RiskLevel,
}

/// Run-level aggregation across all simulated days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub simulation_period: String,
    pub total_simulation_hours: usize,
    pub max_water_depth_mm: f64,
    pub max_flooded_area_km2: f64,
    pub total_precipitation_mm: f64,
    pub grid_resolution: String,
    pub daily_statistics: Vec<DailyStats>,
}

/// One hour of the progression timeline (plotting/animation consumers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPoint {
    pub hour: usize,
    pub max_depth_mm: f64,
    /// Percentage of cells with a nonzero flood class.
    pub flooded_area_pct: f64,
}

/// Compact per-day view served to forecast consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub day: usize,
    pub risk_level: RiskLevel,
    pub risk_score: u8,
    pub max_water_depth_mm: f64,
    pub flooded_area_km2: f64,
    pub precipitation_mm: f64,
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// Reduce the full series to `days` daily records plus the run summary.
///
/// Precondition: every series must hold at least `days × 24` steps on the
/// same grid; violations are reported, never defaulted.
pub fn analyze_progression(
    depth: &FieldSeries,
    extent: &ExtentSeries,
    forecast: &FieldSeries,
    start: DateTime<Utc>,
    days: usize,
) -> Result<SimulationSummary, SimulationError> {
    let required = days * STEPS_PER_DAY;
    let available = depth.steps.min(extent.steps).min(forecast.steps);
    if available < required {
        return Err(SimulationError::HorizonTooShort { required, available });
    }
    if extent.size != depth.size || forecast.size != depth.size {
        return Err(SimulationError::GridMismatch {
            expected: depth.size,
            actual: if extent.size != depth.size { extent.size } else { forecast.size },
        });
    }

    let size = depth.size;
    let cells = size * size;
    let mut daily_statistics = Vec::with_capacity(days);

    for day in 0..days {
        let t0 = day * STEPS_PER_DAY;
        let t1 = t0 + STEPS_PER_DAY;

        let mut max_depth = 0.0f64;
        let mut wet_sum = 0.0f64;
        let mut wet_count = 0usize;
        let mut total_precip = 0.0f64;
        let mut peak_intensity = 0.0f64;
        // Daily maximum flood class per cell, reduced to a flooded flag.
        let mut cell_flooded = vec![false; cells];

        for t in t0..t1 {
            for &d in depth.step(t) {
                let d = d as f64;
                if d > max_depth {
                    max_depth = d;
                }
                if d > 0.0 {
                    wet_sum += d;
                    wet_count += 1;
                }
            }
            for (flag, &class) in cell_flooded.iter_mut().zip(extent.step(t)) {
                *flag |= class.is_flooded();
            }
            for &p in forecast.step(t) {
                let p = p as f64;
                total_precip += p;
                if p > peak_intensity {
                    peak_intensity = p;
                }
            }
        }

        // Explicit dry-day fallback; a NaN here would poison every
        // downstream aggregate.
        let avg_depth = if wet_count == 0 { 0.0 } else { wet_sum / wet_count as f64 };
        let flooded_cells = cell_flooded.iter().filter(|&&f| f).count();

        daily_statistics.push(DailyStats {
            day: day + 1,
            date: (start + Duration::days(day as i64)).date_naive(),
            max_water_depth_mm: round1(max_depth),
            avg_water_depth_mm: round1(avg_depth),
            flooded_area_km2: round2(flooded_cells as f64 * CELL_AREA_KM2),
            total_precipitation_mm: round1(total_precip),
            peak_intensity_mm_h: round1(peak_intensity),
            risk_level: RiskLevel::from_max_depth(max_depth),
        });
    }

    let max_water_depth_mm = daily_statistics
        .iter()
        .map(|s| s.max_water_depth_mm)
        .fold(0.0, f64::max);
    let max_flooded_area_km2 = daily_statistics
        .iter()
        .map(|s| s.flooded_area_km2)
        .fold(0.0, f64::max);
    let total_precipitation_mm =
        round1(daily_statistics.iter().map(|s| s.total_precipitation_mm).sum());

    let period_end = start + Duration::days(days as i64);
    Ok(SimulationSummary {
        simulation_period: format!(
            "{} to {}",
            start.format("%Y-%m-%d"),
            period_end.format("%Y-%m-%d")
        ),
        total_simulation_hours: required,
        max_water_depth_mm,
        max_flooded_area_km2,
        total_precipitation_mm,
        grid_resolution: format!("{size}x{size}"),
        daily_statistics,
    })
}

/// Per-hour progression curve over however many steps the series share.
pub fn hourly_timeline(depth: &FieldSeries, extent: &ExtentSeries) -> Vec<HourlyPoint> {
    let steps = depth.steps.min(extent.steps);
    let cells = (depth.size * depth.size).max(1);

    (0..steps)
        .map(|t| {
            let max_depth = depth.step(t).iter().cloned().fold(0.0f32, f32::max) as f64;
            let flooded = extent.step(t).iter().filter(|c| c.is_flooded()).count();
            HourlyPoint {
                hour: t,
                max_depth_mm: round1(max_depth),
                flooded_area_pct: round1(flooded as f64 / cells as f64 * 100.0),
            }
        })
        .collect()
}

/// Project the summary into the compact per-day forecast view.
pub fn daily_forecast(summary: &SimulationSummary) -> Vec<DailyForecast> {
    summary
        .daily_statistics
        .iter()
        .map(|s| DailyForecast {
            date: s.date,
            day: s.day,
            risk_level: s.risk_level,
            risk_score: s.risk_level.score(),
            max_water_depth_mm: s.max_water_depth_mm,
            flooded_area_km2: s.flooded_area_km2,
            precipitation_mm: s.total_precipitation_mm,
        })
        .collect()
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::FloodClass;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    /// Risk boundaries are exclusive-low and exhaustive.
    #[test]
    fn risk_levels_partition_the_depth_axis() {
        assert_eq!(RiskLevel::from_max_depth(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_max_depth(49.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_max_depth(50.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_max_depth(199.9), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_max_depth(200.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_max_depth(499.9), RiskLevel::High);
        assert_eq!(RiskLevel::from_max_depth(500.0), RiskLevel::Extreme);
        assert_eq!(RiskLevel::from_max_depth(5000.0), RiskLevel::Extreme);
    }

    #[test]
    fn risk_ordering_and_scores_agree() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Extreme);
        assert_eq!(RiskLevel::Low.score(), 1);
        assert_eq!(RiskLevel::Extreme.score(), 4);
        assert_eq!(RiskLevel::Moderate.label(), "Moderate");
    }

    /// Build one day of data with a known wet patch on a 4×4 grid.
    fn one_wet_day() -> (FieldSeries, ExtentSeries, FieldSeries) {
        let size = 4;
        let mut depth = FieldSeries::zeros(STEPS_PER_DAY, size);
        let mut extent = ExtentSeries::new(STEPS_PER_DAY, size);
        let mut forecast = FieldSeries::zeros(STEPS_PER_DAY, size);

        // Hour 3: two wet cells, one classified, 12 mm/h of rain at one cell.
        depth.set(3, 1, 1, 60.0);
        depth.set(3, 2, 2, 20.0);
        extent.step_mut(3)[1 * size + 1] = FloodClass::from_depth(60.0);
        extent.step_mut(3)[2 * size + 2] = FloodClass::from_depth(20.0);
        forecast.set(3, 1, 1, 12.0);
        forecast.set(4, 1, 1, 8.0);

        (depth, extent, forecast)
    }

    #[test]
    fn daily_stats_reduce_the_day_correctly() {
        let (depth, extent, forecast) = one_wet_day();
        let summary = analyze_progression(&depth, &extent, &forecast, start(), 1).unwrap();

        assert_eq!(summary.daily_statistics.len(), 1);
        let stats = &summary.daily_statistics[0];
        assert_eq!(stats.day, 1);
        assert_eq!(stats.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(stats.max_water_depth_mm, 60.0);
        // Mean over the wet cells only: (60 + 20) / 2.
        assert_eq!(stats.avg_water_depth_mm, 40.0);
        // Both wet cells classify nonzero at their daily maximum.
        assert_eq!(stats.flooded_area_km2, round2(2.0 * CELL_AREA_KM2));
        assert_eq!(stats.total_precipitation_mm, 20.0);
        assert_eq!(stats.peak_intensity_mm_h, 12.0);
        assert_eq!(stats.risk_level, RiskLevel::Moderate);

        assert_eq!(summary.total_simulation_hours, 24);
        assert_eq!(summary.grid_resolution, "4x4");
        assert_eq!(summary.simulation_period, "2024-06-01 to 2024-06-02");
    }

    /// Cells at exactly zero are excluded from the average, not averaged in.
    #[test]
    fn dry_cells_do_not_dilute_the_mean() {
        let size = 4;
        let mut depth = FieldSeries::zeros(STEPS_PER_DAY, size);
        depth.set(0, 0, 0, 10.0);
        let extent = ExtentSeries::new(STEPS_PER_DAY, size);
        let forecast = FieldSeries::zeros(STEPS_PER_DAY, size);

        let summary = analyze_progression(&depth, &extent, &forecast, start(), 1).unwrap();
        assert_eq!(summary.daily_statistics[0].avg_water_depth_mm, 10.0);
    }

    /// An entirely dry horizon produces zeros, never NaN.
    #[test]
    fn dry_horizon_yields_finite_zero_statistics() {
        let size = 4;
        let depth = FieldSeries::zeros(STEPS_PER_DAY, size);
        let extent = ExtentSeries::new(STEPS_PER_DAY, size);
        let forecast = FieldSeries::zeros(STEPS_PER_DAY, size);

        let summary = analyze_progression(&depth, &extent, &forecast, start(), 1).unwrap();
        let stats = &summary.daily_statistics[0];
        assert_eq!(stats.avg_water_depth_mm, 0.0);
        assert_eq!(stats.flooded_area_km2, 0.0);
        assert_eq!(stats.risk_level, RiskLevel::Low);
        assert!(summary.max_water_depth_mm == 0.0);
    }

    #[test]
    fn short_series_is_a_precondition_failure() {
        let size = 4;
        let depth = FieldSeries::zeros(30, size);
        let extent = ExtentSeries::new(30, size);
        let forecast = FieldSeries::zeros(30, size);

        let err = analyze_progression(&depth, &extent, &forecast, start(), 2).unwrap_err();
        assert_eq!(err, SimulationError::HorizonTooShort { required: 48, available: 30 });
    }

    #[test]
    fn reanalysis_is_idempotent() {
        let (depth, extent, forecast) = one_wet_day();
        let a = analyze_progression(&depth, &extent, &forecast, start(), 1).unwrap();
        let b = analyze_progression(&depth, &extent, &forecast, start(), 1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn hourly_timeline_tracks_wet_hours() {
        let (depth, extent, _) = one_wet_day();
        let timeline = hourly_timeline(&depth, &extent);
        assert_eq!(timeline.len(), STEPS_PER_DAY);
        assert_eq!(timeline[3].max_depth_mm, 60.0);
        // 2 flooded cells out of 16.
        assert_eq!(timeline[3].flooded_area_pct, 12.5);
        assert_eq!(timeline[0].max_depth_mm, 0.0);
        assert_eq!(timeline[0].flooded_area_pct, 0.0);
    }

    #[test]
    fn daily_forecast_projects_scores() {
        let (depth, extent, forecast) = one_wet_day();
        let summary = analyze_progression(&depth, &extent, &forecast, start(), 1).unwrap();
        let view = daily_forecast(&summary);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].risk_level, RiskLevel::Moderate);
        assert_eq!(view[0].risk_score, 2);
        assert_eq!(view[0].max_water_depth_mm, 60.0);
    }

    /// Field names in the JSON artifact are part of the external contract.
    #[test]
    fn summary_serializes_with_contract_field_names() {
        let (depth, extent, forecast) = one_wet_day();
        let summary = analyze_progression(&depth, &extent, &forecast, start(), 1).unwrap();
        let json = serde_json::to_string(&summary).unwrap();

        for field in [
            "simulation_period",
            "total_simulation_hours",
            "max_water_depth_mm",
            "max_flooded_area_km2",
            "total_precipitation_mm",
            "grid_resolution",
            "daily_statistics",
            "risk_level",
        ] {
            assert!(json.contains(field), "missing field {field} in {json}");
        }
        assert!(json.contains("\"Moderate\""));
    }
}
