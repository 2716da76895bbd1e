use anyhow::{Context, Result};

use crate::catalog::GestureSet;
use crate::detection::GestureDetector;
use crate::models::{GestureEvent, Position3D};
use crate::sensing::SensorControl;

use super::HandTrace;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Identity the sensor runtime assigns to a tracked hand.
pub type HandId = u32;

#[derive(Debug)]
struct BoundHand {
    id: HandId,
    /// Sensor clock at creation; trace timestamps are relative to it.
    created_at: f32,
    trace: HandTrace,
}

/// Binds one detector to the lifecycle of at most one hand.
///
/// Hand callbacks for other identities are ignored. A second hand created
/// while one is bound is handed back to the sensor with a stop command.
pub struct HandLifecycleTracker {
    detector: Box<dyn GestureDetector>,
    hand: Option<BoundHand>,
    is_tracking: bool,
}

impl HandLifecycleTracker {
    pub fn new(detector: Box<dyn GestureDetector>) -> Self {
        Self {
            detector,
            hand: None,
            is_tracking: false,
        }
    }

    pub fn gesture_set(&self) -> GestureSet {
        self.detector.gesture_set()
    }

    pub fn is_tracking(&self) -> bool {
        self.is_tracking
    }

    pub fn bound_hand(&self) -> Option<HandId> {
        self.hand.as_ref().map(|hand| hand.id)
    }

    pub fn trace(&self) -> Option<&HandTrace> {
        self.hand.as_ref().map(|hand| &hand.trace)
    }

    /// Returns `true` when `id` is now bound to this tracker.
    pub fn on_hand_create(
        &mut self,
        id: HandId,
        position: Position3D,
        time: f32,
        control: &mut dyn SensorControl,
    ) -> bool {
        if let Some(bound) = &self.hand {
            if bound.id != id {
                log_debug!(
                    "{} tracker already bound to hand {}; rejecting hand {id}",
                    self.gesture_set().as_str(),
                    bound.id
                );
                if let Err(err) = control.stop_tracking(id) {
                    log_warn!("failed to stop tracking rejected hand {id}: {err:?}");
                }
            }
            return false;
        }

        let mut trace = HandTrace::new();
        trace.append(0.0, position);
        self.hand = Some(BoundHand {
            id,
            created_at: time,
            trace,
        });
        self.is_tracking = true;
        self.detector.reset();
        log_debug!("{} tracker bound to hand {id}", self.gesture_set().as_str());
        true
    }

    pub fn on_hand_update(&mut self, id: HandId, position: Position3D, time: f32) -> Option<GestureEvent> {
        let hand = self.hand.as_mut().filter(|hand| hand.id == id)?;

        let outcome = hand.trace.append(time - hand.created_at, position);
        if !outcome.changed() {
            log_debug!("dropped sample for hand {id} at sensor time {time}");
            return None;
        }
        self.detector.on_sample(&hand.trace)
    }

    /// Returns `true` when the bound hand was lost.
    pub fn on_hand_destroy(&mut self, id: HandId) -> bool {
        if self.bound_hand() != Some(id) {
            return false;
        }
        self.release();
        log_debug!("{} tracker lost hand {id}", self.gesture_set().as_str());
        true
    }

    /// Asks the sensor to find a hand at `point`. Once the sensor accepts, the
    /// tracker counts as tracking; the hand itself arrives with `on_hand_create`.
    pub fn start_tracking(&mut self, point: Position3D, control: &mut dyn SensorControl) -> Result<()> {
        control
            .start_tracking(point)
            .with_context(|| format!("{} tracker failed to start tracking", self.gesture_set().as_str()))?;
        self.is_tracking = true;
        Ok(())
    }

    /// Releases the bound hand, if any, and tells the sensor to drop it.
    pub fn stop_tracking(&mut self, control: &mut dyn SensorControl) -> Result<()> {
        let bound = self.bound_hand();
        self.release();
        match bound {
            Some(id) => control
                .stop_tracking(id)
                .with_context(|| format!("failed to stop tracking hand {id}")),
            None => Ok(()),
        }
    }

    fn release(&mut self) {
        self.hand = None;
        self.is_tracking = false;
        self.detector.reset();
    }
}
