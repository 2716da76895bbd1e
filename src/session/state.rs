use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::SessionState;

/// Identity of one engagement session, opened by Wave/Click and closed on shutdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub id: String,
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn open(started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at,
        }
    }
}

/// Point-in-time view of the session machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub session: Option<SessionInfo>,
    /// Trackers currently marked as tracking a hand.
    pub tracked_hands: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_get_distinct_ids() {
        let now = Utc::now();
        let first = SessionInfo::open(now);
        let second = SessionInfo::open(now);
        assert_ne!(first.id, second.id);
        assert_eq!(first.started_at, now);
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let snapshot = SessionSnapshot {
            state: SessionState::InProgress,
            session: None,
            tracked_hands: 2,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["state"], "InProgress");
        assert_eq!(json["trackedHands"], 2);
    }
}
