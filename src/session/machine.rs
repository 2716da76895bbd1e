//! Engagement protocol and detector gating.
//!
//! ```text
//! Stopped --Wave/Click--> Starting --RaiseHand--> InProgress --all hands lost--> Halted
//!                                                     ^                            |
//!                                                     +---------RaiseHand----------+
//! ```
//!
//! `Stopped` is only re-entered through [`SessionStateMachine::shutdown`].

use chrono::Utc;

use crate::catalog::{EngagementGesture, GestureKind, GestureSet, SessionState};
use crate::detection::{create_detector, DetectionConfig};
use crate::models::{EngineEvent, GestureEvent, GesturePayload, Position3D};
use crate::sensing::{SensorControl, SensorEvent};
use crate::tracking::{HandId, HandLifecycleTracker};

use super::events::{EngineListener, EventBus};
use super::state::{SessionInfo, SessionSnapshot};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

const START_GESTURES: [EngagementGesture; 2] = [EngagementGesture::Wave, EngagementGesture::Click];
const CONFIRM_GESTURES: [EngagementGesture; 1] = [EngagementGesture::RaiseHand];

pub struct SessionStateMachine {
    config: DetectionConfig,
    state: SessionState,
    session: Option<SessionInfo>,
    /// One tracker per configured gesture set, in the order they were added.
    trackers: Vec<HandLifecycleTracker>,
    gesture_channel_active: bool,
    bus: EventBus,
}

impl SessionStateMachine {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            state: SessionState::Stopped,
            session: None,
            trackers: Vec::new(),
            gesture_channel_active: false,
            bus: EventBus::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            session: self.session.clone(),
            tracked_hands: self.trackers.iter().filter(|t| t.is_tracking()).count(),
        }
    }

    pub fn subscribe(&mut self, listener: impl EngineListener + 'static) {
        self.bus.subscribe(Box::new(listener));
    }

    pub fn configured_gestures(&self) -> Vec<GestureSet> {
        self.trackers.iter().map(|t| t.gesture_set()).collect()
    }

    pub fn tracker(&self, set: GestureSet) -> Option<&HandLifecycleTracker> {
        self.trackers.iter().find(|t| t.gesture_set() == set)
    }

    /// Instantiates the detector for `set`. Returns `false` if it is already live.
    pub fn add_gesture(&mut self, set: GestureSet) -> bool {
        if self.tracker(set).is_some() {
            return false;
        }
        let detector = create_detector(set, &self.config);
        self.trackers.push(HandLifecycleTracker::new(detector));
        log_info!("Gesture {} enabled", set.as_str());
        true
    }

    /// Drops the detector for `set`. Returns `false` if it was not live.
    ///
    /// The sensor is not asked to stop the hand, since other trackers may
    /// still be bound to the same identity.
    pub fn remove_gesture(&mut self, set: GestureSet) -> bool {
        let before = self.trackers.len();
        self.trackers.retain(|t| t.gesture_set() != set);
        let removed = self.trackers.len() != before;
        if removed {
            log_info!("Gesture {} disabled", set.as_str());
        }
        removed
    }

    /// Starts listening for the engagement gestures that open a session.
    pub fn activate(&mut self, control: &mut dyn SensorControl) {
        if let Err(err) = control.set_engagement_gestures(&START_GESTURES) {
            log_warn!("failed to listen for engagement gestures: {err:?}");
        }
    }

    /// Releases every hand, drops all detectors, silences the sensor channels
    /// and returns to `Stopped`.
    pub fn shutdown(&mut self, control: &mut dyn SensorControl) {
        for tracker in self.trackers.iter_mut() {
            if let Err(err) = tracker.stop_tracking(control) {
                log_warn!("{err:?}");
            }
        }
        self.trackers.clear();

        self.gesture_channel_active = false;
        if let Err(err) = control.set_gesture_channel(false) {
            log_warn!("failed to disable gesture channel: {err:?}");
        }
        if let Err(err) = control.set_engagement_gestures(&[]) {
            log_warn!("failed to clear engagement gestures: {err:?}");
        }

        self.transition(SessionState::Stopped);
    }

    pub fn handle_event(&mut self, event: SensorEvent, control: &mut dyn SensorControl) {
        match event {
            SensorEvent::HandCreate { id, position, time } => {
                self.on_hand_create(id, position, time, control)
            }
            SensorEvent::HandUpdate { id, position, time } => self.on_hand_update(id, position, time),
            SensorEvent::HandDestroy { id, time } => self.on_hand_destroy(id, time),
            SensorEvent::EngagementGesture { name, position } => {
                self.on_engagement_gesture(&name, position, control)
            }
            SensorEvent::ChannelGesture { name, position } => self.on_channel_gesture(&name, position),
        }
    }

    pub fn on_hand_create(
        &mut self,
        id: HandId,
        position: Position3D,
        time: f32,
        control: &mut dyn SensorControl,
    ) {
        for tracker in self.trackers.iter_mut() {
            tracker.on_hand_create(id, position, time, control);
        }
    }

    pub fn on_hand_update(&mut self, id: HandId, position: Position3D, time: f32) {
        let recognized: Vec<GestureEvent> = self
            .trackers
            .iter_mut()
            .filter_map(|tracker| tracker.on_hand_update(id, position, time))
            .collect();

        for gesture in recognized {
            log_info!("Recognized {} at {:?}", gesture.kind.as_str(), gesture.position);
            self.bus.emit(EngineEvent::GestureRecognized { gesture });
        }
    }

    pub fn on_hand_destroy(&mut self, id: HandId, _time: f32) {
        let mut lost = false;
        for tracker in self.trackers.iter_mut() {
            lost |= tracker.on_hand_destroy(id);
        }
        if !lost {
            return;
        }

        let any_tracking = self.trackers.iter().any(|t| t.is_tracking());
        if !any_tracking && self.state == SessionState::InProgress {
            self.transition(SessionState::Halted);
        }
    }

    /// Unknown names, and names not expected in the current state, are ignored.
    pub fn on_engagement_gesture(
        &mut self,
        name: &str,
        position: Position3D,
        control: &mut dyn SensorControl,
    ) {
        let Some(gesture) = EngagementGesture::from_name(name) else {
            log_debug!("ignoring unknown engagement gesture {name:?}");
            return;
        };

        match (gesture, self.state) {
            (EngagementGesture::Wave | EngagementGesture::Click, SessionState::Stopped) => {
                self.transition(SessionState::Starting);
                if let Err(err) = control.set_engagement_gestures(&CONFIRM_GESTURES) {
                    log_warn!("failed to listen for {}: {err:?}", EngagementGesture::RaiseHand.as_str());
                }
                self.gesture_channel_active = true;
                if let Err(err) = control.set_gesture_channel(true) {
                    log_warn!("failed to enable gesture channel: {err:?}");
                }
            }
            (EngagementGesture::RaiseHand, SessionState::Starting | SessionState::Halted) => {
                for tracker in self.trackers.iter_mut().filter(|t| !t.is_tracking()) {
                    if let Err(err) = tracker.start_tracking(position, control) {
                        log_warn!("{err:?}");
                    }
                }
                // Stay put when the sensor refused every start, so the next
                // RaiseHand retries.
                if self.trackers.is_empty() || self.trackers.iter().any(|t| t.is_tracking()) {
                    self.transition(SessionState::InProgress);
                } else {
                    log_warn!("no detector could start tracking; still {}", self.state.as_str());
                }
            }
            (gesture, state) => {
                log_debug!("ignoring {} while {}", gesture.as_str(), state.as_str());
            }
        }
    }

    /// Forwards gestures recognised by the sensor's own channel while it is active.
    pub fn on_channel_gesture(&mut self, name: &str, position: Position3D) {
        if !self.gesture_channel_active {
            return;
        }
        let Some(kind) = GestureKind::from_name(name) else {
            log_debug!("ignoring unknown channel gesture {name:?}");
            return;
        };
        self.bus.emit(EngineEvent::GestureRecognized {
            gesture: GestureEvent {
                kind,
                position,
                payload: GesturePayload::Empty,
            },
        });
    }

    fn transition(&mut self, new_state: SessionState) {
        if new_state == self.state {
            return;
        }
        let old_state = self.state;
        self.state = new_state;

        match (old_state, new_state) {
            (SessionState::Stopped, _) => self.session = Some(SessionInfo::open(Utc::now())),
            (_, SessionState::Stopped) => self.session = None,
            _ => {}
        }

        let session_id = self.session.as_ref().map(|s| s.id.as_str()).unwrap_or("-");
        log_info!(
            "Session {session_id}: {} -> {}",
            old_state.as_str(),
            new_state.as_str()
        );

        self.bus.emit(EngineEvent::SessionStateChanged {
            old_state,
            new_state,
        });
    }
}
