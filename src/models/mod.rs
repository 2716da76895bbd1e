pub mod event;
pub mod position;

pub use event::{EngineEvent, GestureEvent, GesturePayload};
pub use position::{Position3D, TimedSample};
