use std::fmt;

/// One interaction recorded by the analytics stub.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedEvent {
    pub category: String,
    pub action: String,
    pub label: String,
}

impl TrackedEvent {
    pub fn new(
        category: impl Into<String>,
        action: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            action: action.into(),
            label: label.into(),
        }
    }
}

impl fmt::Display for TrackedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.category, self.action, self.label)
    }
}

/// Receives every tracked event, e.g. to forward it to an analytics backend.
pub trait AnalyticsSink {
    fn track(&mut self, event: &TrackedEvent);
}

impl<F> AnalyticsSink for F
where
    F: FnMut(&TrackedEvent),
{
    fn track(&mut self, event: &TrackedEvent) {
        self(event)
    }
}

#[derive(Default)]
pub(crate) struct Analytics {
    history: Vec<TrackedEvent>,
    sink: Option<Box<dyn AnalyticsSink>>,
}

impl fmt::Debug for Analytics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analytics")
            .field("history", &self.history)
            .field("sink", &self.sink.as_ref().map(|_| "<sink>"))
            .finish()
    }
}

impl Analytics {
    pub(crate) fn set_sink(&mut self, sink: Box<dyn AnalyticsSink>) {
        self.sink = Some(sink);
    }

    pub(crate) fn track_event(&mut self, category: &str, action: &str, label: &str) {
        let event = TrackedEvent::new(category, action, label);
        tracing::info!(
            category = %event.category,
            action = %event.action,
            "Event tracked: {event}"
        );
        if let Some(sink) = self.sink.as_mut() {
            sink.track(&event);
        }
        self.history.push(event);
    }

    pub(crate) fn history(&self) -> &[TrackedEvent] {
        &self.history
    }

    pub(crate) fn take_history(&mut self) -> Vec<TrackedEvent> {
        std::mem::take(&mut self.history)
    }
}
