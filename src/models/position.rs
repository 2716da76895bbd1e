use serde::{Deserialize, Serialize};

/// A point in sensor space, millimetres. `z` is the distance from the sensor.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position3D {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One entry of a hand trace. `time` is seconds since the hand was created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimedSample {
    pub time: f32,
    pub position: Position3D,
}

impl TimedSample {
    pub const fn new(time: f32, position: Position3D) -> Self {
        Self { time, position }
    }
}
