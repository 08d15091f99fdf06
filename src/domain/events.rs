use crate::domain::timeline::{ChunkInterval, TimeRange, Timestamp};
use std::fmt::Debug;

/// Base trait for all domain events
pub trait DomainEvent: Debug + Clone {
    fn event_type(&self) -> &'static str;
}

/// Events emitted by the timeline
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineEvent {
    RangeChanged {
        range: TimeRange,
    },
    IntervalChanged {
        interval: ChunkInterval,
        anchor: Timestamp,
    },
    Reanchored {
        anchor: Timestamp,
        at_start: bool,
    },
    DragStarted,
    DragEnded,
}

impl DomainEvent for TimelineEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TimelineEvent::RangeChanged { .. } => "RangeChanged",
            TimelineEvent::IntervalChanged { .. } => "IntervalChanged",
            TimelineEvent::Reanchored { .. } => "Reanchored",
            TimelineEvent::DragStarted => "DragStarted",
            TimelineEvent::DragEnded => "DragEnded",
        }
    }
}

/// Event dispatcher for publishing events
pub trait EventDispatcher {
    fn publish(&self, event: TimelineEvent);
}

/// Simple in-memory event dispatcher
#[derive(Default)]
pub struct InMemoryEventDispatcher {
    handlers: Vec<Box<dyn Fn(&TimelineEvent)>>,
}

impl InMemoryEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: Fn(&TimelineEvent) + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

impl EventDispatcher for InMemoryEventDispatcher {
    fn publish(&self, event: TimelineEvent) {
        for handler in &self.handlers {
            handler(&event);
        }
    }
}
