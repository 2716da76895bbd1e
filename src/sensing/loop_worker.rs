use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::session::SessionStateMachine;

use super::sensor::{Sensor, SensorEvent};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollConfig {
    /// Pause between sensor polls.
    pub frame_interval_ms: u64,
    /// Frames slower than this are reported.
    pub slow_frame_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 33,
            slow_frame_ms: 100,
        }
    }
}

/// Drives `engine` from `sensor` until cancelled or the sensor runs dry.
///
/// The engine is only ever touched from this task. A failed or panicking frame
/// is logged and skipped. On exit the engine is shut down against the sensor
/// and both are handed back.
pub async fn poll_loop<S>(
    mut sensor: S,
    mut engine: SessionStateMachine,
    config: PollConfig,
    cancel_token: CancellationToken,
) -> Result<(S, SessionStateMachine)>
where
    S: Sensor + 'static,
{
    let mut ticker = tokio::time::interval(Duration::from_millis(config.frame_interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let slow_frame = Duration::from_millis(config.slow_frame_ms);

    engine.activate(&mut sensor);
    let mut frames: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("poll loop shutting down after {frames} frames");
                break;
            }
            _ = ticker.tick() => {}
        }

        if sensor.is_exhausted() {
            log_info!("sensor stream ended after {frames} frames");
            break;
        }

        let frame_start = Instant::now();
        let (returned, result) = poll_frame_blocking(sensor)
            .await
            .context("sensor poll worker join failed")?;
        sensor = returned;

        match result {
            Ok(events) => {
                for event in events {
                    engine.handle_event(event, &mut sensor);
                }
            }
            Err(err) => log_error!("sensor frame {frames} failed: {err:?}"),
        }

        let frame_duration = frame_start.elapsed();
        if frame_duration > slow_frame {
            log_warn!(
                "slow sensor frame {frames}: {}ms (> {}ms)",
                frame_duration.as_millis(),
                config.slow_frame_ms
            );
        }
        frames = frames.wrapping_add(1);
    }

    engine.shutdown(&mut sensor);
    Ok((sensor, engine))
}

/// Polls on the blocking pool, handing the sensor back with the result.
async fn poll_frame_blocking<S>(
    mut sensor: S,
) -> std::result::Result<(S, Result<Vec<SensorEvent>>), tokio::task::JoinError>
where
    S: Sensor + 'static,
{
    tokio::task::spawn_blocking(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| sensor.poll_frame()))
            .unwrap_or_else(|_| Err(anyhow!("sensor panicked while polling")));
        (sensor, result)
    })
    .await
}
