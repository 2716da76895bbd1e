use crate::catalog::GestureSet;
use crate::models::{GestureEvent, TimedSample};
use crate::tracking::HandTrace;

use super::{speed_mps, DetectionConfig, GestureDetector};

const ENABLE_LOGS: bool = false;

use crate::{log_debug, log_trace};

/// Detects a fast movement of the hand towards the sensor (decreasing `z`).
#[derive(Debug, Clone)]
pub struct PushDetector {
    distance_threshold: f32,
    speed_threshold: f32,
    /// Sample the current candidate started from; `None` while not detecting.
    start: Option<TimedSample>,
}

impl PushDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            distance_threshold: config.push_distance_threshold,
            speed_threshold: config.push_speed_threshold,
            start: None,
        }
    }

    pub fn is_detecting(&self) -> bool {
        self.start.is_some()
    }
}

impl GestureDetector for PushDetector {
    fn gesture_set(&self) -> GestureSet {
        GestureSet::Push
    }

    fn on_sample(&mut self, trace: &HandTrace) -> Option<GestureEvent> {
        let (previous, last) = match (trace.second_last(), trace.last()) {
            (Some(previous), Some(last)) => (*previous, *last),
            _ => return None,
        };
        let approaching = last.position.z < previous.position.z;

        let Some(start) = self.start else {
            if approaching {
                log_debug!("push candidate from z={} at t={}", previous.position.z, previous.time);
                self.start = Some(previous);
            }
            return None;
        };

        if !approaching {
            log_debug!("push candidate dropped, hand moved back at t={}", last.time);
            self.reset();
            return None;
        }

        let change = start.position.z - last.position.z;
        log_trace!("push change={change} at t={}", last.time);
        if change < self.distance_threshold {
            return None;
        }

        let speed = speed_mps(change, last.time - start.time)?;
        self.reset();

        if speed > self.speed_threshold {
            Some(GestureEvent::push(last.position, speed))
        } else {
            log_debug!("push too slow: {speed:.3} m/s");
            None
        }
    }

    fn reset(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GestureKind;
    use crate::models::Position3D;

    /// Feeds `(time, z)` samples the way the lifecycle tracker does: the first
    /// sample only seeds the trace. Returns the index and event of every emission.
    fn run(detector: &mut PushDetector, samples: &[(f32, f32)]) -> Vec<(usize, GestureEvent)> {
        let mut trace = HandTrace::new();
        let mut events = Vec::new();
        for (idx, &(time, z)) in samples.iter().enumerate() {
            trace.append(time, Position3D::new(0.0, 0.0, z));
            if idx == 0 {
                continue;
            }
            if let Some(event) = detector.on_sample(&trace) {
                events.push((idx, event));
            }
        }
        events
    }

    #[test]
    fn fast_push_is_reported_when_threshold_crossed() {
        let mut detector = PushDetector::new(&DetectionConfig::default());
        let events = run(&mut detector, &[(0.0, 1000.0), (0.1, 900.0), (0.3, 550.0)]);

        assert_eq!(events.len(), 1, "expected one push, got {events:?}");
        let (idx, event) = events[0];
        assert_eq!(idx, 2);
        assert_eq!(event.kind, GestureKind::Push);
        assert_eq!(event.position.z, 550.0);
        // 450 mm over 0.3 s
        let speed = event.speed().unwrap();
        assert!((speed - 1.5).abs() < 1e-4, "got {speed}");
        assert!(!detector.is_detecting());
    }

    #[test]
    fn single_sample_never_detects() {
        let mut detector = PushDetector::new(&DetectionConfig::default());
        let mut trace = HandTrace::new();
        trace.append(0.0, Position3D::new(0.0, 0.0, 1000.0));
        assert!(detector.on_sample(&trace).is_none());
        assert!(!detector.is_detecting());
    }

    #[test]
    fn slow_push_resets_without_event() {
        let mut detector = PushDetector::new(&DetectionConfig::default());
        // 400 mm over 1 s is 0.4 m/s
        let events = run(&mut detector, &[(0.0, 1000.0), (0.5, 800.0), (1.0, 600.0)]);

        assert!(events.is_empty(), "got {events:?}");
        assert!(!detector.is_detecting());
    }

    #[test]
    fn reversal_drops_candidate() {
        let mut detector = PushDetector::new(&DetectionConfig::default());
        let events = run(
            &mut detector,
            &[(0.0, 1000.0), (0.1, 800.0), (0.2, 850.0), (0.3, 500.0)],
        );

        // The last step only opens a new candidate from z=850.
        assert!(events.is_empty(), "got {events:?}");
        assert!(detector.is_detecting());
    }

    #[test]
    fn below_distance_keeps_detecting() {
        let mut detector = PushDetector::new(&DetectionConfig::default());
        let events = run(&mut detector, &[(0.0, 1000.0), (0.1, 900.0), (0.2, 700.0)]);
        assert!(events.is_empty());
        assert!(detector.is_detecting());
    }

    #[test]
    fn repeated_motion_triggers_again() {
        let mut detector = PushDetector::new(&DetectionConfig::default());
        let events = run(
            &mut detector,
            &[
                (0.0, 1000.0),
                (0.1, 800.0),
                (0.2, 550.0),
                (0.3, 1000.0),
                (0.4, 800.0),
                (0.5, 550.0),
            ],
        );

        let indices: Vec<usize> = events.iter().map(|(idx, _)| *idx).collect();
        assert_eq!(indices, vec![2, 5]);
    }

    #[test]
    fn zero_duration_is_not_reported() {
        let mut detector = PushDetector::new(&DetectionConfig::default());
        detector.start = Some(TimedSample::new(0.2, Position3D::new(0.0, 0.0, 1000.0)));

        let mut trace = HandTrace::new();
        trace.append(0.1, Position3D::new(0.0, 0.0, 1000.0));
        trace.append(0.2, Position3D::new(0.0, 0.0, 500.0));

        assert!(detector.on_sample(&trace).is_none());
        assert!(detector.is_detecting(), "unmeasurable step must not reset");
    }
}
