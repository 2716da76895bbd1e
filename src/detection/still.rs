use crate::catalog::GestureSet;
use crate::models::{GestureEvent, Position3D, TimedSample};
use crate::tracking::HandTrace;

use super::{DetectionConfig, GestureDetector};

const ENABLE_LOGS: bool = false;

use crate::log_debug;

/// Reports a hand held motionless for longer than the hold duration.
///
/// The anchor moves to the newest sample whenever the hand leaves the
/// tolerance box and after every report, so a hand that stays put is
/// reported again once per hold duration.
#[derive(Debug, Clone)]
pub struct StillDetector {
    tolerance: f32,
    hold_secs: f32,
    anchor: Option<TimedSample>,
}

impl StillDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            tolerance: config.stillness_threshold,
            hold_secs: config.still_hold_secs,
            anchor: None,
        }
    }

    pub fn anchor(&self) -> Option<&TimedSample> {
        self.anchor.as_ref()
    }

    fn within_tolerance(&self, from: &Position3D, to: &Position3D) -> bool {
        (to.x - from.x).abs() <= self.tolerance
            && (to.y - from.y).abs() <= self.tolerance
            && (to.z - from.z).abs() <= self.tolerance
    }
}

impl GestureDetector for StillDetector {
    fn gesture_set(&self) -> GestureSet {
        GestureSet::Still
    }

    fn on_sample(&mut self, trace: &HandTrace) -> Option<GestureEvent> {
        let last = *trace.last()?;

        let Some(anchor) = self.anchor else {
            self.anchor = Some(last);
            return None;
        };

        if !self.within_tolerance(&anchor.position, &last.position) {
            self.anchor = Some(last);
            return None;
        }

        let elapsed = last.time - anchor.time;
        if elapsed > self.hold_secs {
            log_debug!("hand still for {elapsed:.2}s");
            self.anchor = Some(last);
            return Some(GestureEvent::still(anchor.position, elapsed));
        }
        None
    }

    fn reset(&mut self) {
        self.anchor = None;
    }
}
