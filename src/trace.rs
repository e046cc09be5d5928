use super::*;
use std::collections::VecDeque;

const DEFAULT_TRACE_LOG_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TraceCategory {
    Events,
    Dom,
}

/// Bounded in-memory trace buffer, optionally echoed to stderr.
#[derive(Debug, Clone)]
pub(crate) struct TraceLog {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) dom: bool,
    pub(crate) to_stderr: bool,
    limit: usize,
    lines: VecDeque<String>,
}

impl Default for TraceLog {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            dom: true,
            to_stderr: true,
            limit: DEFAULT_TRACE_LOG_LIMIT,
            lines: VecDeque::new(),
        }
    }
}

impl TraceLog {
    pub(crate) fn wants(&self, category: TraceCategory) -> bool {
        self.enabled
            && match category {
                TraceCategory::Events => self.events,
                TraceCategory::Dom => self.dom,
            }
    }

    /// The line is built lazily so disabled tracing costs nothing.
    pub(crate) fn record(&mut self, category: TraceCategory, line: impl FnOnce() -> String) {
        if !self.wants(category) {
            return;
        }
        let line = line();
        if self.to_stderr {
            eprintln!("{line}");
        }
        if self.lines.len() >= self.limit {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub(crate) fn set_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Config(
                "trace log limit requires at least 1 entry".into(),
            ));
        }
        self.limit = max_entries;
        if self.lines.len() > self.limit {
            let excess = self.lines.len() - self.limit;
            self.lines.drain(..excess);
        }
        Ok(())
    }

    pub(crate) fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines).into()
    }
}
