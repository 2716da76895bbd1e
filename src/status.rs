//! Session status feedback through the sensor's status LED.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::SessionState;
use crate::models::EngineEvent;
use crate::session::EngineListener;

const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedStatus {
    Off,
    Green,
    Red,
    Yellow,
    BlinkingYellow,
    BlinkingGreen,
    AlternateRedYellow,
    AlternateRedGreen,
}

impl LedStatus {
    /// Value understood by the device firmware.
    pub fn code(&self) -> u8 {
        match self {
            LedStatus::Off => 0x0,
            LedStatus::Green => 0x1,
            LedStatus::Red => 0x2,
            LedStatus::Yellow => 0x3,
            LedStatus::BlinkingYellow => 0x4,
            LedStatus::BlinkingGreen => 0x5,
            LedStatus::AlternateRedYellow => 0x6,
            LedStatus::AlternateRedGreen => 0x7,
        }
    }

    pub fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::Stopped => LedStatus::AlternateRedGreen,
            SessionState::Starting => LedStatus::Yellow,
            SessionState::InProgress => LedStatus::Green,
            SessionState::Halted => LedStatus::Red,
        }
    }
}

pub trait LedDriver: Send {
    fn set_led(&mut self, status: LedStatus) -> Result<()>;
}

/// Driver for setups without a controllable LED; logs the colour instead.
#[derive(Debug, Default)]
pub struct LoggingLed {
    current: Option<LedStatus>,
}

impl LoggingLed {
    pub fn current(&self) -> Option<LedStatus> {
        self.current
    }
}

impl LedDriver for LoggingLed {
    fn set_led(&mut self, status: LedStatus) -> Result<()> {
        log_info!("Status LED -> {status:?} (0x{:x})", status.code());
        self.current = Some(status);
        Ok(())
    }
}

/// Subscriber that mirrors session state changes onto an LED.
pub struct StatusIndicator<D: LedDriver> {
    driver: D,
}

impl<D: LedDriver> StatusIndicator<D> {
    /// Shows `state` right away, then follows state changes.
    pub fn attach(driver: D, state: SessionState) -> Self {
        let mut indicator = Self { driver };
        indicator.show(state);
        indicator
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn show(&mut self, state: SessionState) {
        if let Err(err) = self.driver.set_led(LedStatus::for_state(state)) {
            log_warn!("failed to update status LED: {err:?}");
        }
    }
}

impl<D: LedDriver> EngineListener for StatusIndicator<D> {
    fn on_event(&mut self, event: &EngineEvent) {
        if let EngineEvent::SessionStateChanged { new_state, .. } = event {
            self.show(*new_state);
        }
    }
}
