//! Per-hand gesture detectors.
//!
//! Every detector is fed the hand trace once per accepted sample and looks at
//! no more than its two newest entries, so evaluation is O(1) per frame.

pub mod config;
pub mod push;
pub mod still;
pub mod swipe;

pub use config::DetectionConfig;
pub use push::PushDetector;
pub use still::StillDetector;
pub use swipe::SwipeDetector;

use crate::catalog::GestureSet;
use crate::models::GestureEvent;
use crate::tracking::HandTrace;

pub trait GestureDetector: Send {
    /// The configuration unit this detector implements.
    fn gesture_set(&self) -> GestureSet;

    /// Evaluates the newest sample of `trace`. Returns at most one event and
    /// resets internal state after producing it.
    fn on_sample(&mut self, trace: &HandTrace) -> Option<GestureEvent>;

    /// Drops any candidate in progress.
    fn reset(&mut self);
}

/// Builds the detector backing `set`.
pub fn create_detector(set: GestureSet, config: &DetectionConfig) -> Box<dyn GestureDetector> {
    match set {
        GestureSet::Push => Box::new(PushDetector::new(config)),
        GestureSet::SwipeAll => Box::new(SwipeDetector::new(config)),
        GestureSet::Still => Box::new(StillDetector::new(config)),
    }
}

/// Metres per second for a travel of `change_mm` over `duration_secs`.
///
/// `None` when the duration is zero or negative: the motion is not measurable yet.
pub(crate) fn speed_mps(change_mm: f32, duration_secs: f32) -> Option<f32> {
    if duration_secs <= 0.0 || !duration_secs.is_finite() {
        return None;
    }
    Some((change_mm / 1000.0) / duration_secs)
}
