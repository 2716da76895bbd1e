//! Fixed vocabulary shared by detectors, the session machine and consumers.

use serde::{Deserialize, Serialize};

/// A gesture the engine can report to the application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GestureKind {
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
    Push,
    Still,
}

impl GestureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureKind::SwipeUp => "SwipeUp",
            GestureKind::SwipeDown => "SwipeDown",
            GestureKind::SwipeLeft => "SwipeLeft",
            GestureKind::SwipeRight => "SwipeRight",
            GestureKind::Push => "Push",
            GestureKind::Still => "Still",
        }
    }

    /// Exact, case-sensitive lookup used for names reported by the sensor.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "SwipeUp" => Some(GestureKind::SwipeUp),
            "SwipeDown" => Some(GestureKind::SwipeDown),
            "SwipeLeft" => Some(GestureKind::SwipeLeft),
            "SwipeRight" => Some(GestureKind::SwipeRight),
            "Push" => Some(GestureKind::Push),
            "Still" => Some(GestureKind::Still),
            _ => None,
        }
    }

    pub fn is_swipe(&self) -> bool {
        matches!(
            self,
            GestureKind::SwipeUp
                | GestureKind::SwipeDown
                | GestureKind::SwipeLeft
                | GestureKind::SwipeRight
        )
    }
}

/// Unit of configuration: each set is backed by exactly one detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GestureSet {
    Push,
    /// All four swipe directions.
    SwipeAll,
    Still,
}

impl GestureSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            GestureSet::Push => "Push",
            GestureSet::SwipeAll => "SwipeAll",
            GestureSet::Still => "Still",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionState {
    #[default]
    Stopped,
    Starting,
    InProgress,
    Halted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Stopped => "Stopped",
            SessionState::Starting => "Starting",
            SessionState::InProgress => "InProgress",
            SessionState::Halted => "Halted",
        }
    }
}

/// Coarse gestures recognised by the sensor itself on the engagement channel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EngagementGesture {
    Wave,
    Click,
    RaiseHand,
}

impl EngagementGesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementGesture::Wave => "Wave",
            EngagementGesture::Click => "Click",
            EngagementGesture::RaiseHand => "RaiseHand",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Wave" => Some(EngagementGesture::Wave),
            "Click" => Some(EngagementGesture::Click),
            "RaiseHand" => Some(EngagementGesture::RaiseHand),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engagement_names_are_exact() {
        assert_eq!(EngagementGesture::from_name("Wave"), Some(EngagementGesture::Wave));
        assert_eq!(EngagementGesture::from_name("Click"), Some(EngagementGesture::Click));
        assert_eq!(
            EngagementGesture::from_name("RaiseHand"),
            Some(EngagementGesture::RaiseHand)
        );
        assert_eq!(EngagementGesture::from_name("wave"), None);
        assert_eq!(EngagementGesture::from_name("Circle"), None);
    }

    #[test]
    fn gesture_names_round_trip_through_as_str() {
        for kind in [
            GestureKind::SwipeUp,
            GestureKind::SwipeDown,
            GestureKind::SwipeLeft,
            GestureKind::SwipeRight,
            GestureKind::Push,
            GestureKind::Still,
        ] {
            assert_eq!(GestureKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(GestureKind::from_name("SwipeAll"), None);
    }

    #[test]
    fn session_starts_stopped() {
        assert_eq!(SessionState::default(), SessionState::Stopped);
    }
}
