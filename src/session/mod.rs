pub mod events;
pub mod machine;
pub mod state;

pub use events::{ChannelListener, EngineListener};
pub use machine::SessionStateMachine;
pub use state::{SessionInfo, SessionSnapshot};
