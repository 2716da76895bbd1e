pub mod lifecycle;
pub mod trace;

pub use lifecycle::{HandId, HandLifecycleTracker};
pub use trace::{AppendOutcome, HandTrace};
