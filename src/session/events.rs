use tokio::sync::mpsc;

use crate::models::EngineEvent;

/// Receives every event the engine publishes, synchronously and in order.
pub trait EngineListener: Send {
    fn on_event(&mut self, event: &EngineEvent);
}

impl<F> EngineListener for F
where
    F: FnMut(&EngineEvent) + Send,
{
    fn on_event(&mut self, event: &EngineEvent) {
        self(event)
    }
}

/// Forwards events to a tokio channel so another task can consume them.
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl ChannelListener {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EngineListener for ChannelListener {
    fn on_event(&mut self, event: &EngineEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.tx.send(event.clone());
    }
}

/// Listener registry; dispatch follows registration order.
#[derive(Default)]
pub(crate) struct EventBus {
    listeners: Vec<Box<dyn EngineListener>>,
}

impl EventBus {
    pub(crate) fn subscribe(&mut self, listener: Box<dyn EngineListener>) {
        self.listeners.push(listener);
    }

    pub(crate) fn emit(&mut self, event: EngineEvent) {
        for listener in self.listeners.iter_mut() {
            listener.on_event(&event);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SessionState;
    use std::sync::{Arc, Mutex};

    fn state_change() -> EngineEvent {
        EngineEvent::SessionStateChanged {
            old_state: SessionState::Stopped,
            new_state: SessionState::Starting,
        }
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::default();
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(Box::new(move |_: &EngineEvent| order.lock().unwrap().push(tag)));
        }

        bus.emit(state_change());

        assert_eq!(bus.len(), 3);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn channel_listener_forwards_events() {
        let (listener, mut rx) = ChannelListener::new();
        let mut bus = EventBus::default();
        bus.subscribe(Box::new(listener));

        bus.emit(state_change());

        assert_eq!(rx.try_recv().unwrap(), state_change());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_listener_survives_dropped_receiver() {
        let (listener, rx) = ChannelListener::new();
        drop(rx);
        let mut bus = EventBus::default();
        bus.subscribe(Box::new(listener));
        bus.emit(state_change());
    }
}
