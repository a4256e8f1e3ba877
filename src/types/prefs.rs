//! Read-only preference snapshot driving which series are built
//!
//! The surrounding application owns the preference store and its change
//! listeners; the engine only reads a fresh snapshot per call.

use serde::{Deserialize, Serialize};

use crate::types::metric;

/// Per-statistic boolean flags from the preference store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceSnapshot {
    pub show_distance: bool,
    pub show_elevation: bool,
    pub show_duration: bool,
    pub show_avg_pace: bool,
    pub show_avg_speed: bool,
    pub show_body_weight: bool,
    pub show_body_fat: bool,
    pub show_battery: bool,
    pub show_training_effect: bool,
    pub show_number_of_tours: bool,
    pub show_year_separator: bool,
}

impl Default for PreferenceSnapshot {
    fn default() -> Self {
        Self {
            show_distance: true,
            show_elevation: true,
            show_duration: true,
            show_avg_pace: false,
            show_avg_speed: false,
            show_body_weight: false,
            show_body_fat: false,
            show_battery: false,
            show_training_effect: false,
            show_number_of_tours: true,
            show_year_separator: true,
        }
    }
}

impl PreferenceSnapshot {
    /// Metric names enabled by this snapshot, in chart stacking order
    pub fn enabled_metrics(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.show_distance {
            names.push(metric::DISTANCE);
        }
        if self.show_elevation {
            names.push(metric::ELEVATION_GAIN);
        }
        if self.show_duration {
            names.push(metric::DURATION);
        }
        if self.show_avg_pace {
            names.push(metric::AVG_PACE);
        }
        if self.show_avg_speed {
            names.push(metric::AVG_SPEED);
        }
        if self.show_body_weight {
            names.push(metric::BODY_WEIGHT);
        }
        if self.show_body_fat {
            names.push(metric::BODY_FAT);
        }
        if self.show_battery {
            names.push(metric::BATTERY);
        }
        if self.show_training_effect {
            names.push(metric::TRAINING_EFFECT_AEROB);
            names.push(metric::TRAINING_EFFECT_ANAEROB);
        }
        names
    }

    /// Snapshot with every series flag enabled
    pub fn all_enabled() -> Self {
        Self {
            show_distance: true,
            show_elevation: true,
            show_duration: true,
            show_avg_pace: true,
            show_avg_speed: true,
            show_body_weight: true,
            show_body_fat: true,
            show_battery: true,
            show_training_effect: true,
            show_number_of_tours: true,
            show_year_separator: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_core_graphs() {
        let prefs = PreferenceSnapshot::default();
        let names = prefs.enabled_metrics();
        assert_eq!(
            names,
            vec![metric::DISTANCE, metric::ELEVATION_GAIN, metric::DURATION]
        );
        assert!(prefs.show_number_of_tours);
        assert!(prefs.show_year_separator);
    }

    #[test]
    fn test_training_effect_flag_covers_both_metrics() {
        let prefs = PreferenceSnapshot {
            show_training_effect: true,
            ..Default::default()
        };
        let names = prefs.enabled_metrics();
        assert!(names.contains(&metric::TRAINING_EFFECT_AEROB));
        assert!(names.contains(&metric::TRAINING_EFFECT_ANAEROB));
    }

    #[test]
    fn test_all_enabled_lists_every_metric() {
        let names = PreferenceSnapshot::all_enabled().enabled_metrics();
        assert_eq!(names.len(), 10);
    }

    #[test]
    fn test_snapshot_deserializes_with_missing_flags() {
        let prefs: PreferenceSnapshot =
            serde_json::from_str(r#"{ "show_avg_pace": true }"#).unwrap();
        assert!(prefs.show_avg_pace);
        // unspecified flags fall back to defaults
        assert!(prefs.show_distance);
        assert!(!prefs.show_battery);
    }
}
