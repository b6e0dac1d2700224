//! Change notifications published after the store is mutated.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    ProblemsUpdated,
    SessionsUpdated,
    AchievementsUpdated,
    SettingsUpdated,
}

impl ChangeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ChangeEvent::ProblemsUpdated => "cruxlog:problems:updated",
            ChangeEvent::SessionsUpdated => "cruxlog:sessions:updated",
            ChangeEvent::AchievementsUpdated => "cruxlog:achievements:updated",
            ChangeEvent::SettingsUpdated => "cruxlog:settings:updated",
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type Subscriber = Box<dyn Fn(ChangeEvent)>;

/// Fire-and-forget fan-out to registered subscribers.
#[derive(Default)]
pub struct Notifier {
    subscribers: Vec<Subscriber>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, f: F)
    where
        F: Fn(ChangeEvent) + 'static,
    {
        self.subscribers.push(Box::new(f));
    }

    pub fn emit(&self, event: ChangeEvent) {
        tracing::trace!(event = event.name(), "change event");
        for s in &self.subscribers {
            s(event);
        }
    }

    pub fn emit_all(&self, events: &[ChangeEvent]) {
        for e in events {
            self.emit(*e);
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
