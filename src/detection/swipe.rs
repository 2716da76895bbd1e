//! Swipe detection on the horizontal and vertical axes.
//!
//! Both axes are tracked independently. Direction naming is fixed: a growing
//! `x` is a left swipe and a growing `y` is a down swipe. A swipe on either
//! axis clears both candidates, so one motion yields at most one event.

use crate::catalog::{GestureKind, GestureSet};
use crate::models::{GestureEvent, Position3D, TimedSample};
use crate::tracking::HandTrace;

use super::{speed_mps, DetectionConfig, GestureDetector};

const ENABLE_LOGS: bool = false;

use crate::{log_debug, log_trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn coord(self, position: &Position3D) -> f32 {
        match self {
            Axis::Horizontal => position.x,
            Axis::Vertical => position.y,
        }
    }

    fn direction(self, from: &Position3D, to: &Position3D) -> GestureKind {
        let growing = self.coord(to) > self.coord(from);
        match (self, growing) {
            (Axis::Horizontal, true) => GestureKind::SwipeLeft,
            (Axis::Horizontal, false) => GestureKind::SwipeRight,
            (Axis::Vertical, true) => GestureKind::SwipeDown,
            (Axis::Vertical, false) => GestureKind::SwipeUp,
        }
    }
}

fn is_growing(direction: GestureKind) -> bool {
    matches!(direction, GestureKind::SwipeLeft | GestureKind::SwipeDown)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AxisCandidate {
    start: TimedSample,
    direction: GestureKind,
}

enum AxisStep {
    Idle,
    /// Distance threshold reached; carries the direction and measured speed.
    Completed(GestureKind, f32),
}

#[derive(Debug, Clone)]
pub struct SwipeDetector {
    distance_threshold: f32,
    speed_threshold: f32,
    horizontal: Option<AxisCandidate>,
    vertical: Option<AxisCandidate>,
}

impl SwipeDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            distance_threshold: config.swipe_distance_threshold,
            speed_threshold: config.swipe_speed_threshold,
            horizontal: None,
            vertical: None,
        }
    }

    /// Direction of the horizontal candidate, if one is in progress.
    pub fn horizontal_direction(&self) -> Option<GestureKind> {
        self.horizontal.map(|candidate| candidate.direction)
    }

    /// Direction of the vertical candidate, if one is in progress.
    pub fn vertical_direction(&self) -> Option<GestureKind> {
        self.vertical.map(|candidate| candidate.direction)
    }

    fn slot(&mut self, axis: Axis) -> &mut Option<AxisCandidate> {
        match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    fn step_axis(&mut self, axis: Axis, previous: TimedSample, last: TimedSample) -> AxisStep {
        let distance_threshold = self.distance_threshold;
        let slot = self.slot(axis);

        let Some(candidate) = *slot else {
            let direction = axis.direction(&previous.position, &last.position);
            log_debug!("{direction:?} candidate from t={}", previous.time);
            *slot = Some(AxisCandidate {
                start: previous,
                direction,
            });
            return AxisStep::Idle;
        };

        let (prev_coord, last_coord) = (axis.coord(&previous.position), axis.coord(&last.position));
        let still_moving = if is_growing(candidate.direction) {
            last_coord > prev_coord
        } else {
            last_coord < prev_coord
        };
        if !still_moving {
            log_debug!("{:?} candidate dropped at t={}", candidate.direction, last.time);
            *slot = None;
            return AxisStep::Idle;
        }

        let start_coord = axis.coord(&candidate.start.position);
        let change = if is_growing(candidate.direction) {
            last_coord - start_coord
        } else {
            start_coord - last_coord
        };
        log_trace!("{:?} change={change}", candidate.direction);
        if change < distance_threshold {
            return AxisStep::Idle;
        }

        match speed_mps(change, last.time - candidate.start.time) {
            Some(speed) => AxisStep::Completed(candidate.direction, speed),
            None => AxisStep::Idle,
        }
    }
}

impl GestureDetector for SwipeDetector {
    fn gesture_set(&self) -> GestureSet {
        GestureSet::SwipeAll
    }

    fn on_sample(&mut self, trace: &HandTrace) -> Option<GestureEvent> {
        let (previous, last) = match (trace.second_last(), trace.last()) {
            (Some(previous), Some(last)) => (*previous, *last),
            _ => return None,
        };

        // Horizontal wins when both axes complete on the same sample.
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if let AxisStep::Completed(direction, speed) = self.step_axis(axis, previous, last) {
                self.reset();
                if speed > self.speed_threshold {
                    return Some(GestureEvent::swipe(direction, last.position, speed));
                }
                log_debug!("{direction:?} too slow: {speed:.3} m/s");
                return None;
            }
        }
        None
    }

    fn reset(&mut self) {
        self.horizontal = None;
        self.vertical = None;
    }
}
