use serde::{Deserialize, Serialize};

/// Thresholds for the per-hand detectors. Distances are sensor millimetres,
/// speeds are metres per second, durations are seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Minimum travel towards the sensor for a push.
    pub push_distance_threshold: f32,
    /// A push must be strictly faster than this.
    pub push_speed_threshold: f32,

    /// Minimum travel along one axis for a swipe.
    pub swipe_distance_threshold: f32,
    /// A swipe must be strictly faster than this.
    pub swipe_speed_threshold: f32,

    /// Per-axis wobble tolerated while holding still.
    pub stillness_threshold: f32,
    /// Stillness must last strictly longer than this before it is reported.
    pub still_hold_secs: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            push_distance_threshold: 400.0,
            push_speed_threshold: 0.5,
            swipe_distance_threshold: 250.0,
            swipe_speed_threshold: 1.0,
            stillness_threshold: 10.0,
            still_hold_secs: 5.0,
        }
    }
}
