use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::catalog::EngagementGesture;
use crate::models::Position3D;
use crate::tracking::HandId;

use super::sensor::{Sensor, SensorCommand, SensorControl, SensorEvent};

const ENABLE_LOGS: bool = true;

use crate::log_info;

#[derive(Debug, Deserialize)]
struct ReplayScript {
    frames: Vec<Vec<SensorEvent>>,
}

/// Sensor that plays back a recorded script, one frame per poll.
///
/// Commands sent to it are recorded instead of acted upon, since the script
/// already contains the runtime's reaction to them.
#[derive(Debug, Default)]
pub struct ReplaySensor {
    frames: VecDeque<Vec<SensorEvent>>,
    commands: Vec<SensorCommand>,
}

impl ReplaySensor {
    pub fn new(frames: Vec<Vec<SensorEvent>>) -> Self {
        Self {
            frames: frames.into(),
            commands: Vec::new(),
        }
    }

    /// Loads a JSON script of the form `{ "frames": [[event, ...], ...] }`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read replay script {}", path.display()))?;
        let script: ReplayScript = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse replay script {}", path.display()))?;
        log_info!("Loaded {} replay frames from {}", script.frames.len(), path.display());
        Ok(Self::new(script.frames))
    }

    pub fn remaining_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn commands(&self) -> &[SensorCommand] {
        &self.commands
    }
}

impl SensorControl for ReplaySensor {
    fn start_tracking(&mut self, at: Position3D) -> Result<()> {
        self.commands.push(SensorCommand::StartTracking { at });
        Ok(())
    }

    fn stop_tracking(&mut self, hand: HandId) -> Result<()> {
        self.commands.push(SensorCommand::StopTracking { hand });
        Ok(())
    }

    fn set_engagement_gestures(&mut self, gestures: &[EngagementGesture]) -> Result<()> {
        self.commands.push(SensorCommand::SetEngagementGestures {
            gestures: gestures.to_vec(),
        });
        Ok(())
    }

    fn set_gesture_channel(&mut self, enabled: bool) -> Result<()> {
        self.commands.push(SensorCommand::SetGestureChannel { enabled });
        Ok(())
    }
}

impl Sensor for ReplaySensor {
    fn poll_frame(&mut self) -> Result<Vec<SensorEvent>> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }

    fn is_exhausted(&self) -> bool {
        self.is_finished()
    }
}
