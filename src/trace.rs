use std::collections::VecDeque;

use crate::{Error, Result};

const DEFAULT_LOG_LIMIT: usize = 10_000;

/// Opt-in bounded buffer of `[event]` and `[timer]` lines.
///
/// Every line is also emitted through `tracing` at trace level, whether or
/// not the buffer is enabled.
#[derive(Debug, Clone)]
pub(crate) struct TraceLog {
    enabled: bool,
    logs: VecDeque<String>,
    log_limit: usize,
}

impl Default for TraceLog {
    fn default() -> Self {
        Self {
            enabled: false,
            logs: VecDeque::new(),
            log_limit: DEFAULT_LOG_LIMIT,
        }
    }
}

impl TraceLog {
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn set_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.log_limit = max_entries;
        while self.logs.len() > self.log_limit {
            self.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn take(&mut self) -> Vec<String> {
        self.logs.drain(..).collect()
    }

    pub(crate) fn event(&mut self, line: String) {
        tracing::trace!(target: "page_interactions::event", "{line}");
        self.push(line);
    }

    pub(crate) fn timer(&mut self, line: String) {
        tracing::trace!(target: "page_interactions::timer", "{line}");
        self.push(line);
    }

    fn push(&mut self, line: String) {
        if !self.enabled {
            return;
        }
        if self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }
}
