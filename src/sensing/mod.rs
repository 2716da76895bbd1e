pub mod controller;
pub mod loop_worker;
pub mod replay;
pub mod sensor;

pub use controller::PollController;
pub use loop_worker::{poll_loop, PollConfig};
pub use replay::ReplaySensor;
pub use sensor::{Sensor, SensorCommand, SensorControl, SensorEvent};
