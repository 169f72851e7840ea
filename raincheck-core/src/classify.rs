//! Rainfall intensity classification.
//!
//! Measured rainfall always wins; the condition label only matters when the
//! provider reports no precipitation for the last hour.

use serde::Serialize;

const MODERATE_THRESHOLD_MM: f64 = 0.5;
const HEAVY_THRESHOLD_MM: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    CloudRain,
    Cloud,
    Sun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleHint {
    LightRain,
    ModerateRain,
    HeavyRain,
    Drizzle,
    Cloudy,
    Dry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RainfallStatus {
    pub text: String,
    pub icon: IconKind,
    pub style: StyleHint,
}

struct Descriptor {
    text: &'static str,
    icon: IconKind,
    style: StyleHint,
}

/// Presentation for a dry last hour, keyed by condition label.
const DRY_HOUR_TABLE: &[(&str, Descriptor)] = &[
    (
        "Rain",
        Descriptor { text: "Light rain detected", icon: IconKind::CloudRain, style: StyleHint::LightRain },
    ),
    (
        "Drizzle",
        Descriptor { text: "Drizzle detected", icon: IconKind::CloudRain, style: StyleHint::Drizzle },
    ),
    (
        "Clouds",
        Descriptor { text: "No rain - Cloudy", icon: IconKind::Cloud, style: StyleHint::Cloudy },
    ),
];

const DRY_FALLBACK: Descriptor =
    Descriptor { text: "No rain detected", icon: IconKind::Sun, style: StyleHint::Dry };

/// Classify a rainfall rate and condition label for display.
///
/// Negative or non-finite rates are treated as "no measured rainfall".
pub fn rainfall_status(rainfall_mm_per_hour: f64, condition_main: &str) -> RainfallStatus {
    let r = rainfall_mm_per_hour;

    if r.is_finite() && r > 0.0 {
        let (label, style) = if r < MODERATE_THRESHOLD_MM {
            ("Light rain", StyleHint::LightRain)
        } else if r < HEAVY_THRESHOLD_MM {
            ("Moderate rain", StyleHint::ModerateRain)
        } else {
            ("Heavy rain", StyleHint::HeavyRain)
        };

        return RainfallStatus {
            text: format!("{label}: {r} mm/h"),
            icon: IconKind::CloudRain,
            style,
        };
    }

    let descriptor = DRY_HOUR_TABLE
        .iter()
        .find(|(condition, _)| *condition == condition_main)
        .map(|(_, d)| d)
        .unwrap_or(&DRY_FALLBACK);

    RainfallStatus {
        text: descriptor.text.to_string(),
        icon: descriptor.icon,
        style: descriptor.style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measured_rainfall_bands() {
        let light = rainfall_status(0.3, "Rain");
        assert_eq!(light.text, "Light rain: 0.3 mm/h");
        assert_eq!(light.style, StyleHint::LightRain);

        let moderate = rainfall_status(0.5, "Clear");
        assert_eq!(moderate.text, "Moderate rain: 0.5 mm/h");
        assert_eq!(moderate.style, StyleHint::ModerateRain);

        let heavy = rainfall_status(2.0, "Clouds");
        assert_eq!(heavy.text, "Heavy rain: 2 mm/h");
        assert_eq!(heavy.style, StyleHint::HeavyRain);
        assert_eq!(heavy.icon, IconKind::CloudRain);
    }

    #[test]
    fn band_edges() {
        assert_eq!(rainfall_status(0.49, "").style, StyleHint::LightRain);
        assert_eq!(rainfall_status(1.99, "").style, StyleHint::ModerateRain);
        assert_eq!(rainfall_status(12.7, "").text, "Heavy rain: 12.7 mm/h");
    }

    #[test]
    fn dry_hour_uses_condition_table() {
        let rain = rainfall_status(0.0, "Rain");
        assert_eq!(rain.text, "Light rain detected");
        assert_eq!(rain.icon, IconKind::CloudRain);

        let drizzle = rainfall_status(0.0, "Drizzle");
        assert_eq!(drizzle.text, "Drizzle detected");
        assert_eq!(drizzle.style, StyleHint::Drizzle);

        let clouds = rainfall_status(0.0, "Clouds");
        assert_eq!(clouds.text, "No rain - Cloudy");
        assert_eq!(clouds.icon, IconKind::Cloud);

        let clear = rainfall_status(0.0, "Clear");
        assert_eq!(clear.text, "No rain detected");
        assert_eq!(clear.icon, IconKind::Sun);
        assert_eq!(clear.style, StyleHint::Dry);
    }

    #[test]
    fn condition_match_is_exact() {
        assert_eq!(rainfall_status(0.0, "rain").text, "No rain detected");
        assert_eq!(rainfall_status(0.0, "Snow").text, "No rain detected");
    }

    #[test]
    fn out_of_domain_rates_fall_back_to_condition() {
        assert_eq!(rainfall_status(f64::NAN, "Drizzle").text, "Drizzle detected");
        assert_eq!(rainfall_status(-1.0, "Clouds").text, "No rain - Cloudy");
        assert_eq!(rainfall_status(f64::INFINITY, "Clear").text, "No rain detected");
    }

    #[test]
    fn every_input_lands_in_exactly_one_band() {
        let conditions = ["Rain", "Drizzle", "Clouds", "Clear", "Snow", ""];
        let rates = [0.0, 0.01, 0.3, 0.4999, 0.5, 1.0, 1.9999, 2.0, 50.0];

        for condition in conditions {
            for rate in rates {
                let status = rainfall_status(rate, condition);
                let again = rainfall_status(rate, condition);
                assert_eq!(status, again);

                let measured = [
                    rate > 0.0 && rate < 0.5,
                    (0.5..2.0).contains(&rate),
                    rate >= 2.0,
                ];
                let matched = measured.iter().filter(|m| **m).count();
                if rate > 0.0 {
                    assert_eq!(matched, 1, "rate {rate} matched {matched} bands");
                    assert!(status.text.ends_with(" mm/h"));
                } else {
                    assert_eq!(matched, 0);
                    assert!(!status.text.ends_with(" mm/h"));
                }
            }
        }
    }
}
