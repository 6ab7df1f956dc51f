use std::collections::VecDeque;

use crate::event::Event;

/// FIFO queue between input/scheduler producers and the panels.
///
/// Each frame the app loop publishes key, resize, tick and snapshot events,
/// then drains the queue in order and broadcasts through the registry.
pub struct EventBus {
    queue: VecDeque<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn publish(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Enqueue a batch, e.g. the lifecycle events of a panel switch.
    pub fn publish_all(&mut self, events: impl IntoIterator<Item = Event>) {
        self.queue.extend(events);
    }

    /// Remove and return all pending events, preserving insertion order.
    pub fn drain(&mut self) -> Vec<Event> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn drain_returns_all_and_empties() {
        let mut bus = EventBus::new();
        bus.publish(Event::Tick {
            now: Instant::now(),
        });
        bus.publish(Event::Quit);
        assert_eq!(bus.len(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(bus.is_empty());
    }

    #[test]
    fn drain_on_empty_returns_empty() {
        let mut bus = EventBus::new();
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn publish_all_preserves_order() {
        let mut bus = EventBus::new();
        bus.publish(Event::Resize { cols: 80, rows: 24 });
        bus.publish_all(vec![
            Event::ModuleDeactivated { id: "live".into() },
            Event::ModuleActivated { id: "tech".into() },
        ]);
        bus.publish(Event::Quit);
        let events = bus.drain();
        assert!(matches!(&events[0], Event::Resize { cols: 80, rows: 24 }));
        assert!(matches!(&events[1], Event::ModuleDeactivated { id } if id == "live"));
        assert!(matches!(&events[2], Event::ModuleActivated { id } if id == "tech"));
        assert!(matches!(&events[3], Event::Quit));
    }
}
