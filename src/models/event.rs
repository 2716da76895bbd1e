use serde::{Deserialize, Serialize};

use crate::catalog::{GestureKind, SessionState};

use super::Position3D;

/// Kind-specific data attached to a recognised gesture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum GesturePayload {
    /// Metres per second over the completed motion (push and swipe).
    Speed(f32),
    /// Seconds the hand was held still.
    Hold(f32),
    /// Reported by the sensor's own gesture channel; nothing was measured.
    Empty,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub position: Position3D,
    pub payload: GesturePayload,
}

impl GestureEvent {
    pub fn push(position: Position3D, speed: f32) -> Self {
        Self {
            kind: GestureKind::Push,
            position,
            payload: GesturePayload::Speed(speed),
        }
    }

    pub fn swipe(kind: GestureKind, position: Position3D, speed: f32) -> Self {
        debug_assert!(kind.is_swipe());
        Self {
            kind,
            position,
            payload: GesturePayload::Speed(speed),
        }
    }

    pub fn still(position: Position3D, hold_secs: f32) -> Self {
        Self {
            kind: GestureKind::Still,
            position,
            payload: GesturePayload::Hold(hold_secs),
        }
    }

    pub fn speed(&self) -> Option<f32> {
        match self.payload {
            GesturePayload::Speed(speed) => Some(speed),
            _ => None,
        }
    }

    pub fn hold_secs(&self) -> Option<f32> {
        match self.payload {
            GesturePayload::Hold(secs) => Some(secs),
            _ => None,
        }
    }
}

/// Everything the engine publishes to its subscribers.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum EngineEvent {
    #[serde(rename_all = "camelCase")]
    GestureRecognized { gesture: GestureEvent },
    #[serde(rename_all = "camelCase")]
    SessionStateChanged {
        old_state: SessionState,
        new_state: SessionState,
    },
}
