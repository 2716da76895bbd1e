pub mod catalog;
pub mod detection;
pub mod models;
pub mod sensing;
pub mod session;
pub mod settings;
pub mod status;
pub mod tracking;
mod utils;

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use log::info;

use models::EngineEvent;
use sensing::{PollController, ReplaySensor};
use session::{ChannelListener, SessionStateMachine};
use settings::SettingsStore;
use status::{LoggingLed, StatusIndicator};

const DEFAULT_SETTINGS_PATH: &str = "handgest.json";

/// Builds an engine from `settings`, with every configured gesture enabled.
pub fn build_engine(settings: &settings::EngineSettings) -> SessionStateMachine {
    let mut engine = SessionStateMachine::new(settings.detection.clone());
    for set in &settings.gestures {
        engine.add_gesture(*set);
    }
    engine
}

/// Replays a recorded sensor script through the engine and logs what it sees.
///
/// The script path is the first CLI argument or `HANDGEST_REPLAY`.
pub fn run() -> anyhow::Result<()> {
    let debug_mode = std::env::var("HANDGEST_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(if debug_mode {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    info!("handgest starting up...");

    let settings_path = std::env::var("HANDGEST_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let settings = SettingsStore::new(settings_path)?.settings();

    let replay_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("HANDGEST_REPLAY").ok())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: handgest <replay.json> (or set HANDGEST_REPLAY)"))?;
    let sensor = ReplaySensor::load(&replay_path)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    runtime.block_on(async move {
        let mut engine = build_engine(&settings);
        engine.subscribe(StatusIndicator::attach(LoggingLed::default(), engine.state()));

        let (listener, mut events) = ChannelListener::new();
        engine.subscribe(listener);
        let consumer = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match &event {
                    EngineEvent::GestureRecognized { .. } => match serde_json::to_string(&event) {
                        Ok(json) => info!("{json}"),
                        Err(err) => log::warn!("failed to serialize event: {err}"),
                    },
                    EngineEvent::SessionStateChanged { .. } => {}
                }
            }
        });

        let mut controller = PollController::new();
        controller.start(sensor, engine, settings.poll.clone())?;

        if let Some(shutdown) = controller.cancel_token() {
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, stopping poll loop");
                    shutdown.cancel();
                }
            });
        }

        let (sensor, engine) = controller.join().await?;
        info!(
            "Replay finished in state {} after {} sensor commands",
            engine.state().as_str(),
            sensor.commands().len()
        );

        drop(engine);
        consumer.await.context("event consumer failed to join")?;
        Ok(())
    })
}
