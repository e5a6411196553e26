//! Options that affect diagnostics output, with change notification.
//!
//! An [`OptionsManager`] owns the current [`Options`] and forwards every
//! change to registered [`OptionListener`]s. A listener registered after
//! options were already set by the user is first told about each of them,
//! so late listeners start from the same state as early ones.
//!
//! None of these options change rewriting results; they only control how
//! terms and traces are rendered.

use crate::error::OptionError;
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

/// How much of each rewrite step is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TraceVerbosity {
    /// Nothing is logged
    Off,
    /// Rule names only
    #[default]
    Rules,
    /// Rule names with the terms before and after
    Full,
}

impl TraceVerbosity {
    /// Canonical option value.
    pub fn name(self) -> &'static str {
        match self {
            TraceVerbosity::Off => "off",
            TraceVerbosity::Rules => "rules",
            TraceVerbosity::Full => "full",
        }
    }
}

impl FromStr for TraceVerbosity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" | "none" => Ok(TraceVerbosity::Off),
            "rules" => Ok(TraceVerbosity::Rules),
            "full" => Ok(TraceVerbosity::Full),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TraceVerbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Option identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// Maximum printed term depth
    ExprDepth,
    /// Rewrite trace verbosity
    TraceVerbosity,
}

impl OptionKey {
    /// All option keys.
    pub const ALL: [OptionKey; 2] = [OptionKey::ExprDepth, OptionKey::TraceVerbosity];

    /// Canonical option name.
    pub fn name(self) -> &'static str {
        match self {
            OptionKey::ExprDepth => "expr-depth",
            OptionKey::TraceVerbosity => "trace-verbosity",
        }
    }

    /// Look up a key by its canonical name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Diagnostics options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    expr_depth: Option<usize>,
    trace_verbosity: TraceVerbosity,
    user_set: SmallVec<[OptionKey; 2]>,
}

impl Options {
    /// Default options, nothing set by the user.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the printed term depth (`None` prints whole terms).
    pub fn with_expr_depth(mut self, depth: Option<usize>) -> Self {
        self.expr_depth = depth;
        self.mark_user_set(OptionKey::ExprDepth);
        self
    }

    /// Set the trace verbosity.
    pub fn with_trace_verbosity(mut self, verbosity: TraceVerbosity) -> Self {
        self.trace_verbosity = verbosity;
        self.mark_user_set(OptionKey::TraceVerbosity);
        self
    }

    /// Maximum printed term depth.
    pub fn expr_depth(&self) -> Option<usize> {
        self.expr_depth
    }

    /// Trace verbosity.
    pub fn trace_verbosity(&self) -> TraceVerbosity {
        self.trace_verbosity
    }

    /// Check whether `key` was set explicitly.
    pub fn was_set_by_user(&self, key: OptionKey) -> bool {
        self.user_set.contains(&key)
    }

    /// Keys set explicitly, in the order they were first set.
    pub fn user_set_keys(&self) -> &[OptionKey] {
        &self.user_set
    }

    fn mark_user_set(&mut self, key: OptionKey) {
        if !self.user_set.contains(&key) {
            self.user_set.push(key);
        }
    }
}

/// Receiver of option changes.
pub trait OptionListener: Send + Sync {
    /// Called after `key` changed; `options` holds the new values.
    /// Listeners ignore keys they have no use for.
    fn notify_set_option(&self, key: OptionKey, options: &Options);
}

/// Owner of the current options and their listeners.
#[derive(Default)]
pub struct OptionsManager {
    options: Options,
    listeners: Vec<Arc<dyn OptionListener>>,
}

impl OptionsManager {
    /// Manage `options`.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            listeners: Vec::new(),
        }
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Register a listener. It is first notified of every option the user
    /// has already set, then receives all later changes.
    pub fn register_listener(&mut self, listener: Arc<dyn OptionListener>) {
        for &key in self.options.user_set_keys() {
            listener.notify_set_option(key, &self.options);
        }
        self.listeners.push(listener);
    }

    /// Set the printed term depth.
    pub fn set_expr_depth(&mut self, depth: Option<usize>) {
        self.options.expr_depth = depth;
        self.changed(OptionKey::ExprDepth);
    }

    /// Set the trace verbosity.
    pub fn set_trace_verbosity(&mut self, verbosity: TraceVerbosity) {
        self.options.trace_verbosity = verbosity;
        self.changed(OptionKey::TraceVerbosity);
    }

    /// Set an option from its textual name and value.
    ///
    /// `expr-depth` takes a non-negative integer, or `-1`/`none` for no
    /// limit. `trace-verbosity` takes `off`, `rules` or `full`.
    pub fn set_from_str(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let key =
            OptionKey::parse(name).ok_or_else(|| OptionError::UnknownOption(name.to_string()))?;
        let invalid = || OptionError::InvalidValue {
            key: key.name(),
            value: value.to_string(),
        };
        match key {
            OptionKey::ExprDepth => {
                let depth = match value.trim() {
                    "-1" | "none" => None,
                    v => Some(v.parse::<usize>().map_err(|_| invalid())?),
                };
                self.set_expr_depth(depth);
            }
            OptionKey::TraceVerbosity => {
                let verbosity = value.trim().parse().map_err(|()| invalid())?;
                self.set_trace_verbosity(verbosity);
            }
        }
        Ok(())
    }

    fn changed(&mut self, key: OptionKey) {
        self.options.mark_user_set(key);
        debug!(option = key.name(), listeners = self.listeners.len(), "option set");
        for listener in &self.listeners {
            listener.notify_set_option(key, &self.options);
        }
    }
}

impl fmt::Debug for OptionsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionsManager")
            .field("options", &self.options)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
