use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::event::Event;
use crate::module::Module;

/// Direction for [`ModuleRegistry::cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Next,
    Prev,
}

/// Ordered set of panels with exactly one active panel once non-empty.
pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
    active_idx: Option<usize>,
    index: HashMap<&'static str, usize>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            active_idx: None,
            index: HashMap::new(),
        }
    }

    /// Add a panel. The first registered panel becomes active.
    pub fn register(&mut self, module: Box<dyn Module>) -> Result<()> {
        let id = module.id();
        if self.index.contains_key(id) {
            bail!("duplicate panel id: {}", id);
        }
        self.index.insert(id, self.modules.len());
        self.modules.push(module);
        if self.active_idx.is_none() {
            self.active_idx = Some(0);
        }
        Ok(())
    }

    /// Activate a panel by id. Returns the lifecycle events to publish.
    pub fn activate(&mut self, id: &str) -> Result<Vec<Event>> {
        match self.index.get(id).copied() {
            Some(to) => {
                let from = self.active_idx.unwrap_or(to);
                Ok(self.switch_to(from, to))
            }
            None => bail!("unknown panel id: {}", id),
        }
    }

    /// Move to the next or previous panel, wrapping around.
    pub fn cycle(&mut self, direction: Cycle) -> Vec<Event> {
        let len = self.modules.len();
        if len == 0 {
            return Vec::new();
        }
        let cur = self.active_idx.unwrap_or(0);
        let to = match direction {
            Cycle::Next => (cur + 1) % len,
            Cycle::Prev => (cur + len - 1) % len,
        };
        self.switch_to(cur, to)
    }

    fn switch_to(&mut self, from: usize, to: usize) -> Vec<Event> {
        let mut events = Vec::with_capacity(2);
        if from != to {
            events.push(Event::ModuleDeactivated {
                id: self.modules[from].id().to_string(),
            });
        }
        self.active_idx = Some(to);
        events.push(Event::ModuleActivated {
            id: self.modules[to].id().to_string(),
        });
        events
    }

    pub fn active(&self) -> Option<&dyn Module> {
        self.active_idx.map(|i| &*self.modules[i])
    }

    pub fn active_mut(&mut self) -> Option<&mut (dyn Module + 'static)> {
        self.active_idx.map(|i| &mut *self.modules[i])
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.active_idx.map(|i| self.modules[i].id())
    }

    pub fn list(&self) -> Vec<(&'static str, &'static str)> {
        self.modules.iter().map(|m| (m.id(), m.title())).collect()
    }

    pub fn get(&self, id: &str) -> Option<&dyn Module> {
        self.index.get(id).map(|&i| &*self.modules[i])
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Route an event.
    ///
    /// Keys reach the active panel only; lifecycle events reach the panel
    /// they name; everything else (ticks, resizes, snapshots) reaches all.
    pub fn broadcast(&mut self, event: &Event) {
        match event {
            Event::Key(_) => {
                if let Some(m) = self.active_mut() {
                    m.handle_event(event);
                }
            }
            Event::ModuleActivated { id } | Event::ModuleDeactivated { id } => {
                if let Some(idx) = self.index.get(id.as_str()).copied() {
                    self.modules[idx].handle_event(event);
                }
            }
            _ => {
                for m in &mut self.modules {
                    m.handle_event(event);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    type Log = Arc<Mutex<Vec<String>>>;

    struct FakePanel {
        id: &'static str,
        title: &'static str,
        log: Log,
    }

    impl FakePanel {
        fn boxed(id: &'static str, title: &'static str) -> Box<dyn Module> {
            Self::logged(id, title, Log::default())
        }

        fn logged(id: &'static str, title: &'static str, log: Log) -> Box<dyn Module> {
            Box::new(Self { id, title, log })
        }
    }

    impl Module for FakePanel {
        fn id(&self) -> &'static str {
            self.id
        }
        fn title(&self) -> &'static str {
            self.title
        }
        fn handle_event(&mut self, ev: &Event) {
            let tag = match ev {
                Event::Tick { .. } => "tick",
                Event::Key(_) => "key",
                Event::ModuleActivated { .. } => "activated",
                Event::ModuleDeactivated { .. } => "deactivated",
                _ => "other",
            };
            self.log.lock().unwrap().push(format!("{}:{}", self.id, tag));
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn three() -> ModuleRegistry {
        let mut reg = ModuleRegistry::new();
        reg.register(FakePanel::boxed("live", "Audience")).unwrap();
        reg.register(FakePanel::boxed("communes", "Communes")).unwrap();
        reg.register(FakePanel::boxed("tech", "Technique")).unwrap();
        reg
    }

    #[test]
    fn first_register_auto_activates() {
        let reg = three();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.active_id(), Some("live"));
    }

    #[test]
    fn duplicate_id_returns_error() {
        let mut reg = three();
        let err = reg.register(FakePanel::boxed("live", "Again")).unwrap_err();
        assert!(err.to_string().contains("duplicate panel id"));
    }

    #[test]
    fn activate_emits_lifecycle_events() {
        let mut reg = three();
        let events = reg.activate("tech").unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], Event::ModuleDeactivated { id } if id == "live"));
        assert!(matches!(&events[1], Event::ModuleActivated { id } if id == "tech"));
        assert_eq!(reg.active().unwrap().title(), "Technique");
    }

    #[test]
    fn activate_current_only_reports_activation() {
        let mut reg = three();
        let events = reg.activate("live").unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn activate_unknown_id_fails() {
        let mut reg = three();
        let err = reg.activate("weather").unwrap_err();
        assert!(err.to_string().contains("unknown panel id"));
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let mut reg = three();
        reg.cycle(Cycle::Prev);
        assert_eq!(reg.active_id(), Some("tech"));
        reg.cycle(Cycle::Next);
        assert_eq!(reg.active_id(), Some("live"));
        reg.cycle(Cycle::Next);
        assert_eq!(reg.active_id(), Some("communes"));
    }

    #[test]
    fn cycle_on_empty_is_noop() {
        let mut reg = ModuleRegistry::new();
        assert!(reg.cycle(Cycle::Next).is_empty());
        assert!(reg.active().is_none());
    }

    #[test]
    fn list_and_get() {
        let reg = three();
        assert_eq!(reg.list()[1], ("communes", "Communes"));
        assert!(reg.get("tech").is_some());
        assert!(reg.get("nope").is_none());
    }

    #[test]
    fn broadcast_routing() {
        let log_a = Log::default();
        let log_b = Log::default();
        let mut reg = ModuleRegistry::new();
        reg.register(FakePanel::logged("a", "A", log_a.clone())).unwrap();
        reg.register(FakePanel::logged("b", "B", log_b.clone())).unwrap();

        reg.broadcast(&Event::Tick {
            now: Instant::now(),
        });
        let key = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('x'),
            crossterm::event::KeyModifiers::NONE,
        );
        reg.broadcast(&Event::Key(key));
        reg.broadcast(&Event::ModuleActivated { id: "b".into() });

        assert_eq!(log_a.lock().unwrap().as_slice(), &["a:tick", "a:key"]);
        assert_eq!(log_b.lock().unwrap().as_slice(), &["b:tick", "b:activated"]);
    }
}
