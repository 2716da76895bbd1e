use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::session::SessionStateMachine;

use super::loop_worker::{poll_loop, PollConfig};
use super::sensor::Sensor;

type PollHandle<S> = JoinHandle<Result<(S, SessionStateMachine)>>;

/// Owns the background poll task and its cancellation token.
pub struct PollController<S: Sensor + 'static> {
    handle: Option<PollHandle<S>>,
    cancel_token: Option<CancellationToken>,
}

impl<S: Sensor + 'static> PollController<S> {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Token that cancels the running poll task, for signal handlers.
    pub fn cancel_token(&self) -> Option<CancellationToken> {
        self.cancel_token.clone()
    }

    /// Moves `sensor` and `engine` onto a new poll task.
    pub fn start(&mut self, sensor: S, engine: SessionStateMachine, config: PollConfig) -> Result<()> {
        if self.handle.is_some() {
            bail!("poll loop already active");
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(sensor, engine, config, cancel_token.clone()));
        info!("Poll loop started");

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancels the poll task and waits for its teardown.
    pub async fn stop(&mut self) -> Result<(S, SessionStateMachine)> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        self.join().await
    }

    /// Waits for the poll task to end on its own, e.g. when the sensor runs dry.
    pub async fn join(&mut self) -> Result<(S, SessionStateMachine)> {
        let Some(handle) = self.handle.take() else {
            bail!("poll loop not running");
        };
        self.cancel_token = None;
        handle.await.context("poll loop task failed to join")?
    }
}

impl<S: Sensor + 'static> Default for PollController<S> {
    fn default() -> Self {
        Self::new()
    }
}
