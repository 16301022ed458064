//! Action logging with pattern-based filtering and in-memory storage
//!
//! Every dispatched action can be logged through `tracing` and, optionally,
//! kept in a bounded [`ActionLog`] so a session can report what happened.
//! Patterns use a tiny glob syntax:
//!
//! - `*` matches any sequence of characters
//! - `?` matches any single character
//! - Literal text matches exactly
//!
//! `Load*` matches every load request and its results, `*Failure` matches
//! every failed effect, `SubscribeNewsletter` matches only that action.
//!
//! # Example
//!
//! ```ignore
//! let config = ActionLoggerConfig::new(Some("Load*,Subscribe*"), None);
//! let middleware = ActionLoggerMiddleware::with_log(ActionLogConfig::new(50, config));
//! ```

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::action::{ActionPhase, ActionSummary};
use crate::store::Middleware;

/// Include/exclude filter for action names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ActionLoggerConfig {
    /// If non-empty, only log actions matching these patterns
    #[serde(rename = "include")]
    pub include_patterns: Vec<String>,
    /// Exclude actions matching these patterns (applied after include)
    #[serde(rename = "exclude")]
    pub exclude_patterns: Vec<String>,
}

impl ActionLoggerConfig {
    /// Create a config from comma-separated pattern lists
    ///
    /// # Example
    /// ```
    /// use storefront_dispatch_core::logger::ActionLoggerConfig;
    ///
    /// let config = ActionLoggerConfig::new(Some("Load*"), Some("LoadFooter*"));
    /// assert!(config.should_log("LoadOffersSuccess"));
    /// assert!(!config.should_log("LoadFooterFailure"));
    /// assert!(!config.should_log("SubscribeNewsletter"));
    /// ```
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
        Self {
            include_patterns: include.map(split_patterns).unwrap_or_default(),
            exclude_patterns: exclude.map(split_patterns).unwrap_or_default(),
        }
    }

    /// Create a config with specific pattern vectors
    pub fn with_patterns(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self {
            include_patterns: include,
            exclude_patterns: exclude,
        }
    }

    /// Check if an action name passes the include/exclude patterns
    pub fn should_log(&self, action_name: &str) -> bool {
        if !self.include_patterns.is_empty()
            && !self
                .include_patterns
                .iter()
                .any(|p| glob_match(p, action_name))
        {
            return false;
        }

        !self
            .exclude_patterns
            .iter()
            .any(|p| glob_match(p, action_name))
    }
}

fn split_patterns(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// An entry in the action log
#[derive(Debug, Clone)]
pub struct ActionLogEntry {
    /// Action name (from Action::name())
    pub name: &'static str,
    pub phase: ActionPhase,
    /// Summary representation (from ActionSummary::summary())
    pub summary: String,
    pub timestamp: Instant,
    /// Sequence number for ordering
    pub sequence: u64,
    /// Whether the action replaced any slice (set after the reducer runs)
    pub state_changed: Option<bool>,
}

impl ActionLogEntry {
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }

    /// Format the elapsed time for display (e.g., "2.3s", "150ms")
    pub fn elapsed_display(&self) -> String {
        let elapsed = self.elapsed();
        if elapsed.as_secs() >= 1 {
            format!("{:.1}s", elapsed.as_secs_f64())
        } else {
            format!("{}ms", elapsed.as_millis())
        }
    }
}

/// Configuration for the action log ring buffer
#[derive(Debug, Clone)]
pub struct ActionLogConfig {
    /// Maximum number of entries to keep
    pub capacity: usize,
    pub filter: ActionLoggerConfig,
}

impl Default for ActionLogConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            filter: ActionLoggerConfig::default(),
        }
    }
}

impl ActionLogConfig {
    pub fn new(capacity: usize, filter: ActionLoggerConfig) -> Self {
        Self { capacity, filter }
    }
}

/// Bounded in-memory history of dispatched actions.
///
/// Oldest entries are discarded once capacity is reached.
#[derive(Debug, Clone)]
pub struct ActionLog {
    entries: VecDeque<ActionLogEntry>,
    config: ActionLogConfig,
    next_sequence: u64,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(ActionLogConfig::default())
    }
}

impl ActionLog {
    pub fn new(config: ActionLogConfig) -> Self {
        Self {
            entries: VecDeque::with_capacity(config.capacity),
            config,
            next_sequence: 0,
        }
    }

    /// Record an action if it passes the filter.
    pub fn record<A: ActionSummary>(&mut self, action: &A) -> Option<&ActionLogEntry> {
        let name = action.name();
        if self.config.capacity == 0 || !self.config.filter.should_log(name) {
            return None;
        }

        if self.entries.len() >= self.config.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActionLogEntry {
            name,
            phase: action.phase(),
            summary: action.summary(),
            timestamp: Instant::now(),
            sequence: self.next_sequence,
            state_changed: None,
        });
        self.next_sequence += 1;
        self.entries.back()
    }

    fn mark_last(&mut self, changed: bool) {
        if let Some(entry) = self.entries.back_mut() {
            entry.state_changed = Some(changed);
        }
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter()
    }

    /// The most recent N entries, newest first
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries.iter().rev().take(count)
    }

    /// Entries that recorded a failed effect
    pub fn failures(&self) -> impl Iterator<Item = &ActionLogEntry> {
        self.entries
            .iter()
            .filter(|e| e.phase == ActionPhase::Failure)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Middleware that logs every dispatched action.
///
/// - **Tracing only** ([`ActionLoggerMiddleware::new`]): `tracing::debug!` per action
/// - **With storage** ([`ActionLoggerMiddleware::with_log`]): also keeps an [`ActionLog`]
#[derive(Debug, Clone)]
pub struct ActionLoggerMiddleware {
    config: ActionLoggerConfig,
    log: Option<ActionLog>,
    /// Whether the action currently being dispatched was recorded
    recorded: bool,
}

impl Default for ActionLoggerMiddleware {
    fn default() -> Self {
        Self::new(ActionLoggerConfig::default())
    }
}

impl ActionLoggerMiddleware {
    /// Tracing only, no in-memory storage
    pub fn new(config: ActionLoggerConfig) -> Self {
        Self {
            config,
            log: None,
            recorded: false,
        }
    }

    /// Tracing plus in-memory storage
    pub fn with_log(config: ActionLogConfig) -> Self {
        Self {
            config: config.filter.clone(),
            log: Some(ActionLog::new(config)),
            recorded: false,
        }
    }

    pub fn log(&self) -> Option<&ActionLog> {
        self.log.as_ref()
    }

    pub fn config(&self) -> &ActionLoggerConfig {
        &self.config
    }
}

impl<A: ActionSummary> Middleware<A> for ActionLoggerMiddleware {
    fn before(&mut self, action: &A) {
        let name = action.name();
        if self.config.should_log(name) {
            tracing::debug!(action = %name, phase = action.phase().as_str(), "dispatch");
        }

        self.recorded = match self.log {
            Some(ref mut log) => log.record(action).is_some(),
            None => false,
        };
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.config.should_log(action.name()) {
            tracing::trace!(action = %action.name(), state_changed, "reduced");
        }
        if self.recorded {
            if let Some(ref mut log) = self.log {
                log.mark_last(state_changed);
            }
        }
    }
}

/// Simple glob pattern matching supporting `*` and `?`.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < text.len() {
        match pattern.get(pi) {
            Some('*') => {
                backtrack = Some((pi, ti));
                pi += 1;
            }
            Some(&c) if c == '?' || c == text[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match backtrack {
                // Let the last star swallow one more character
                Some((star_pi, star_ti)) => {
                    pi = star_pi + 1;
                    ti = star_ti + 1;
                    backtrack = Some((star_pi, star_ti + 1));
                }
                None => return false,
            },
        }
    }

    pattern[pi..].iter().all(|&c| c == '*')
}
