//! Severity scenario ladder and seasonal/diurnal modulation factors.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// One entry of the fixed severity ladder.
#[derive(Debug, Clone, Copy)]
pub struct WeatherScenario {
    pub name: &'static str,
    /// Base rainfall intensity, mm/h.
    pub intensity_mm_h: f64,
    /// Base occurrence probability per weather system.
    pub probability: f64,
}

/// The five scenarios, scanned in order; the first whose probability
/// exceeds the modulated gate value is instantiated.
pub const SCENARIOS: [WeatherScenario; 5] = [
    WeatherScenario { name: "Light Rain", intensity_mm_h: 2.0, probability: 0.3 },
    WeatherScenario { name: "Moderate Rain", intensity_mm_h: 8.0, probability: 0.4 },
    WeatherScenario { name: "Heavy Rain", intensity_mm_h: 25.0, probability: 0.2 },
    WeatherScenario { name: "Very Heavy Rain", intensity_mm_h: 50.0, probability: 0.08 },
    WeatherScenario { name: "Extreme Rain", intensity_mm_h: 100.0, probability: 0.02 },
];

/// Seasonal modulation: monsoon months June–September dominate, with the
/// shoulder months May and October elevated.
pub fn monsoon_factor(time: DateTime<Utc>) -> f64 {
    match time.month() {
        6..=9 => 2.5,
        5 | 10 => 1.5,
        _ => 1.0,
    }
}

/// Diurnal modulation: afternoon convection peak 14:00–20:00, mild
/// early-morning drizzle window 02:00–06:00.
pub fn diurnal_factor(time: DateTime<Utc>) -> f64 {
    match time.hour() {
        14..=20 => 1.8,
        2..=6 => 1.2,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(month: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, month, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn monsoon_factor_peaks_june_to_september() {
        assert_eq!(monsoon_factor(at(7, 12)), 2.5);
        assert_eq!(monsoon_factor(at(9, 12)), 2.5);
        assert_eq!(monsoon_factor(at(5, 12)), 1.5);
        assert_eq!(monsoon_factor(at(10, 12)), 1.5);
        assert_eq!(monsoon_factor(at(1, 12)), 1.0);
    }

    #[test]
    fn diurnal_factor_peaks_in_the_afternoon() {
        assert_eq!(diurnal_factor(at(7, 14)), 1.8);
        assert_eq!(diurnal_factor(at(7, 20)), 1.8);
        assert_eq!(diurnal_factor(at(7, 3)), 1.2);
        assert_eq!(diurnal_factor(at(7, 10)), 1.0);
        assert_eq!(diurnal_factor(at(7, 21)), 1.0);
    }

    #[test]
    fn scenario_ladder_intensities_rise_with_rarity() {
        for pair in SCENARIOS.windows(2) {
            assert!(pair[1].intensity_mm_h > pair[0].intensity_mm_h);
        }
        assert_eq!(SCENARIOS[4].probability, 0.02);
    }
}
