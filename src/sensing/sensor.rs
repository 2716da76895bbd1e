//! Boundary to the sensor runtime.
//!
//! The runtime reports hand lifecycle callbacks and gestures it recognises on
//! its own, and accepts tracking and listener commands back.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::EngagementGesture;
use crate::models::Position3D;
use crate::tracking::HandId;

/// One callback delivered by the sensor runtime. `time` is the sensor clock in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SensorEvent {
    HandCreate {
        id: HandId,
        position: Position3D,
        time: f32,
    },
    HandUpdate {
        id: HandId,
        position: Position3D,
        time: f32,
    },
    HandDestroy {
        id: HandId,
        time: f32,
    },
    /// Recognised on the engagement channel ("Wave", "Click", "RaiseHand").
    EngagementGesture { name: String, position: Position3D },
    /// Recognised on the secondary gesture channel.
    ChannelGesture { name: String, position: Position3D },
}

/// Commands the engine sends back to the sensor runtime.
pub trait SensorControl {
    /// Asks the runtime to start tracking a hand near `at`. A `HandCreate`
    /// follows once the runtime has locked on.
    fn start_tracking(&mut self, at: Position3D) -> Result<()>;

    fn stop_tracking(&mut self, hand: HandId) -> Result<()>;

    /// Replaces the set of gestures recognised on the engagement channel.
    fn set_engagement_gestures(&mut self, gestures: &[EngagementGesture]) -> Result<()>;

    fn set_gesture_channel(&mut self, enabled: bool) -> Result<()>;
}

/// A sensor runtime driven by the poll loop.
pub trait Sensor: SensorControl + Send {
    /// Waits for the next frame and returns its callbacks in delivery order.
    fn poll_frame(&mut self) -> Result<Vec<SensorEvent>>;

    /// `true` once the sensor will never deliver another frame.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// A command as issued through [`SensorControl`], for sensors that record them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum SensorCommand {
    StartTracking { at: Position3D },
    StopTracking { hand: HandId },
    SetEngagementGestures { gestures: Vec<EngagementGesture> },
    SetGestureChannel { enabled: bool },
}
