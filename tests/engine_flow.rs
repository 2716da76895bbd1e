use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use handgest_lib::catalog::{EngagementGesture, GestureKind, GestureSet, SessionState};
use handgest_lib::detection::DetectionConfig;
use handgest_lib::models::{EngineEvent, Position3D};
use handgest_lib::sensing::{
    PollConfig, PollController, ReplaySensor, Sensor, SensorCommand, SensorControl, SensorEvent,
};
use handgest_lib::session::{ChannelListener, SessionStateMachine};
use handgest_lib::tracking::HandId;

fn engine(sets: &[GestureSet]) -> SessionStateMachine {
    let mut engine = SessionStateMachine::new(DetectionConfig::default());
    for set in sets {
        engine.add_gesture(*set);
    }
    engine
}

fn record(engine: &mut SessionStateMachine) -> Arc<Mutex<Vec<EngineEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    engine.subscribe(move |event: &EngineEvent| sink.lock().unwrap().push(event.clone()));
    events
}

fn gestures(events: &[EngineEvent]) -> Vec<GestureKind> {
    events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::GestureRecognized { gesture } => Some(gesture.kind),
            _ => None,
        })
        .collect()
}

fn engagement(name: &str) -> SensorEvent {
    SensorEvent::EngagementGesture {
        name: name.to_string(),
        position: Position3D::new(0.0, 200.0, 1200.0),
    }
}

fn update(id: HandId, time: f32, x: f32, y: f32, z: f32) -> SensorEvent {
    SensorEvent::HandUpdate {
        id,
        position: Position3D::new(x, y, z),
        time,
    }
}

/// Engagement, a left swipe, hand loss and re-engagement.
fn session_script() -> Vec<Vec<SensorEvent>> {
    vec![
        vec![engagement("Wave")],
        vec![engagement("RaiseHand")],
        vec![SensorEvent::HandCreate {
            id: 1,
            position: Position3D::new(0.0, 0.0, 1200.0),
            time: 10.0,
        }],
        vec![update(1, 10.05, 100.0, 0.0, 1200.0)],
        vec![update(1, 10.10, 200.0, 0.0, 1200.0)],
        vec![update(1, 10.15, 300.0, 0.0, 1200.0)],
        vec![SensorEvent::HandDestroy { id: 1, time: 10.5 }],
        vec![engagement("RaiseHand")],
    ]
}

#[test]
fn full_session_protocol() {
    let mut sensor = ReplaySensor::default();
    let mut engine = engine(&[GestureSet::SwipeAll, GestureSet::Push]);
    let events = record(&mut engine);
    engine.activate(&mut sensor);

    for frame in session_script() {
        for event in frame {
            engine.handle_event(event, &mut sensor);
        }
    }

    let events = events.lock().unwrap();
    assert_eq!(gestures(&events), vec![GestureKind::SwipeLeft]);

    let transitions: Vec<SessionState> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::SessionStateChanged { new_state, .. } => Some(*new_state),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            SessionState::Starting,
            SessionState::InProgress,
            SessionState::Halted,
            SessionState::InProgress,
        ]
    );
    assert_eq!(
        sensor.commands()[0],
        SensorCommand::SetEngagementGestures {
            gestures: vec![EngagementGesture::Wave, EngagementGesture::Click]
        }
    );
}

#[test]
fn second_hand_is_sent_back_to_the_sensor() {
    let mut sensor = ReplaySensor::default();
    let mut engine = engine(&[GestureSet::Push]);
    engine.handle_event(engagement("Click"), &mut sensor);
    engine.handle_event(engagement("RaiseHand"), &mut sensor);

    for id in [1, 2] {
        engine.handle_event(
            SensorEvent::HandCreate {
                id,
                position: Position3D::new(0.0, 0.0, 1000.0),
                time: 0.0,
            },
            &mut sensor,
        );
    }

    assert_eq!(engine.tracker(GestureSet::Push).unwrap().bound_hand(), Some(1));
    assert!(sensor.commands().contains(&SensorCommand::StopTracking { hand: 2 }));
}

#[tokio::test]
async fn poll_loop_replays_script_and_tears_down() {
    let mut engine = engine(&[GestureSet::SwipeAll]);
    let (listener, mut rx) = ChannelListener::new();
    engine.subscribe(listener);

    let mut controller = PollController::new();
    controller
        .start(
            ReplaySensor::new(session_script()),
            engine,
            PollConfig {
                frame_interval_ms: 1,
                slow_frame_ms: 1_000,
            },
        )
        .unwrap();
    let second = controller.start(
        ReplaySensor::default(),
        SessionStateMachine::new(DetectionConfig::default()),
        PollConfig::default(),
    );
    assert!(second.is_err());

    let (sensor, engine) = tokio::time::timeout(Duration::from_secs(5), controller.join())
        .await
        .expect("replay should finish")
        .unwrap();

    assert_eq!(engine.state(), SessionState::Stopped);
    assert!(engine.configured_gestures().is_empty());
    assert_eq!(
        sensor.commands().last(),
        Some(&SensorCommand::SetEngagementGestures { gestures: vec![] })
    );

    let mut received = Vec::new();
    while let Ok(event) = rx.try_recv() {
        received.push(event);
    }
    assert_eq!(gestures(&received), vec![GestureKind::SwipeLeft]);
    assert_eq!(
        received.last(),
        Some(&EngineEvent::SessionStateChanged {
            old_state: SessionState::InProgress,
            new_state: SessionState::Stopped,
        })
    );
}

/// Fails every other frame and panics once, then delivers a push.
struct FlakySensor {
    polls: usize,
    script: ReplaySensor,
}

impl SensorControl for FlakySensor {
    fn start_tracking(&mut self, at: Position3D) -> Result<()> {
        self.script.start_tracking(at)
    }

    fn stop_tracking(&mut self, hand: HandId) -> Result<()> {
        self.script.stop_tracking(hand)
    }

    fn set_engagement_gestures(&mut self, gestures: &[EngagementGesture]) -> Result<()> {
        self.script.set_engagement_gestures(gestures)
    }

    fn set_gesture_channel(&mut self, enabled: bool) -> Result<()> {
        self.script.set_gesture_channel(enabled)
    }
}

impl Sensor for FlakySensor {
    fn poll_frame(&mut self) -> Result<Vec<SensorEvent>> {
        self.polls += 1;
        match self.polls {
            1 => panic!("driver crashed"),
            n if n % 2 == 0 => bail!("device timeout"),
            _ => self.script.poll_frame(),
        }
    }
}

#[tokio::test]
async fn failing_frames_do_not_stop_the_loop() {
    let mut engine = engine(&[GestureSet::Push]);
    let (listener, mut rx) = ChannelListener::new();
    engine.subscribe(listener);

    let sensor = FlakySensor {
        polls: 0,
        script: ReplaySensor::new(vec![
            vec![engagement("Wave")],
            vec![engagement("RaiseHand")],
            vec![SensorEvent::HandCreate {
                id: 3,
                position: Position3D::new(0.0, 0.0, 1000.0),
                time: 0.0,
            }],
            vec![update(3, 0.1, 0.0, 0.0, 900.0)],
            vec![update(3, 0.3, 0.0, 0.0, 550.0)],
        ]),
    };

    let mut controller = PollController::new();
    controller
        .start(
            sensor,
            engine,
            PollConfig {
                frame_interval_ms: 1,
                slow_frame_ms: 1_000,
            },
        )
        .unwrap();

    let push = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = rx.recv().await {
            if let EngineEvent::GestureRecognized { gesture } = event {
                return Some(gesture);
            }
        }
        None
    })
    .await
    .expect("push should arrive")
    .expect("channel closed early");
    assert_eq!(push.kind, GestureKind::Push);

    let (sensor, engine) = controller.stop().await.unwrap();
    assert!(!controller.is_running());
    assert_eq!(engine.state(), SessionState::Stopped);
    assert!(sensor
        .script
        .commands()
        .contains(&SensorCommand::StopTracking { hand: 3 }));
}
