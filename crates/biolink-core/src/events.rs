use tokio::sync::broadcast;

/// Something observable happened to the persisted state.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The profile document was replaced. Carries the serialized size.
    ConfigSaved { bytes: usize },
    ViewRecorded { count: u64 },
}

/// Broadcast fan-out of [`StoreEvent`]s to in-process observers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(16));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: StoreEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        bus.publish(StoreEvent::ViewRecorded { count: 3 });
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::ViewRecorded { count: 3 });
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new(1);
        bus.publish(StoreEvent::ConfigSaved { bytes: 2 });
    }
}
