use super::object::ObjectId;
use crate::value::{Name, PropValue};

/// Input waiting for the next main-context iteration.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// Invoke the handlers connected to `signal` on `object`.
    Emit {
        object: ObjectId,
        signal: Name,
        args: Vec<PropValue>,
    },
    /// The user asked to close a top-level window.
    CloseWindow { window: ObjectId },
}

impl PlatformEvent {
    pub fn object(&self) -> ObjectId {
        match self {
            PlatformEvent::Emit { object, .. } => *object,
            PlatformEvent::CloseWindow { window } => *window,
        }
    }
}

/// FIFO queue for platform events
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<PlatformEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlatformEvent) {
        self.events.push(event);
    }

    /// Take the whole batch. Events pushed while it is being handled wait
    /// for the next iteration.
    pub fn take(&mut self) -> Vec<PlatformEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
