use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::catalog::GestureSet;
use crate::detection::DetectionConfig;
use crate::sensing::PollConfig;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub detection: DetectionConfig,
    pub poll: PollConfig,
    /// Gesture sets enabled at startup, in order.
    pub gestures: Vec<GestureSet>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            poll: PollConfig::default(),
            gestures: vec![GestureSet::Push, GestureSet::SwipeAll, GestureSet::Still],
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<EngineSettings>,
}

impl SettingsStore {
    /// Missing or unreadable JSON falls back to defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring malformed settings in {}: {err}", path.display());
                EngineSettings::default()
            })
        } else {
            EngineSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn settings(&self) -> EngineSettings {
        self.data
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn update_detection(&self, detection: DetectionConfig) -> Result<()> {
        self.update(|settings| settings.detection = detection)
    }

    pub fn update_gestures(&self, gestures: Vec<GestureSet>) -> Result<()> {
        self.update(|settings| settings.gestures = gestures)
    }

    pub fn reload(&self) -> Result<()> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let data: EngineSettings = serde_json::from_str(&contents)?;
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = data;
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut EngineSettings)) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        apply(&mut *guard);
        self.persist(&*guard)
    }

    fn persist(&self, data: &EngineSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
