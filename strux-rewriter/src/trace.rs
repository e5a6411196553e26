//! Rewrite traces and their rendering.
//!
//! A [`Trace`] is the ordered list of rule firings of one rewrite
//! invocation. How traces are printed and logged is controlled by a
//! [`TraceFormat`], which a [`TraceFormatHandle`] keeps in sync with an
//! [`OptionsManager`](strux_core::OptionsManager).

use crate::rewrites::RewriteId;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use strux_core::{OptionKey, OptionListener, Options, Term, TraceVerbosity};

/// One rule firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteStep {
    /// Rule that fired
    pub rule: RewriteId,
    /// Node the rule matched
    pub before: Term,
    /// Replacement produced by the rule
    pub after: Term,
}

impl RewriteStep {
    /// Render with terms cut at `expr_depth`.
    pub fn display(&self, expr_depth: Option<usize>) -> impl fmt::Display + '_ {
        StepDisplay {
            step: self,
            expr_depth,
        }
    }
}

struct StepDisplay<'a> {
    step: &'a RewriteStep,
    expr_depth: Option<usize>,
}

impl fmt::Display for StepDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} --> {}",
            self.step.rule,
            self.step.before.display_depth(self.expr_depth),
            self.step.after.display_depth(self.expr_depth)
        )
    }
}

impl fmt::Display for RewriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.display(None).fmt(f)
    }
}

/// Rule firings of one invocation, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    steps: Vec<RewriteStep>,
}

impl Trace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a firing.
    pub fn push(&mut self, step: RewriteStep) {
        self.steps.push(step);
    }

    /// Number of firings.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check whether no rule fired.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Recorded steps.
    pub fn steps(&self) -> &[RewriteStep] {
        &self.steps
    }

    /// Iterate over the recorded steps.
    pub fn iter(&self) -> std::slice::Iter<'_, RewriteStep> {
        self.steps.iter()
    }

    /// Rules in firing order.
    pub fn rules(&self) -> impl Iterator<Item = RewriteId> + '_ {
        self.steps.iter().map(|step| step.rule)
    }

    /// Check whether `rule` fired at least once.
    pub fn fired(&self, rule: RewriteId) -> bool {
        self.rules().any(|r| r == rule)
    }

    /// Take the steps out of the trace.
    pub fn into_steps(self) -> Vec<RewriteStep> {
        self.steps
    }

    /// Render the trace one step per line according to `format`.
    ///
    /// `Off` renders nothing, `Rules` only rule names.
    pub fn render(&self, format: &TraceFormat) -> String {
        let mut out = String::new();
        for step in &self.steps {
            match format.verbosity {
                TraceVerbosity::Off => return out,
                TraceVerbosity::Rules => out.push_str(step.rule.name()),
                TraceVerbosity::Full => out.push_str(&step.display(format.expr_depth).to_string()),
            }
            out.push('\n');
        }
        out
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a RewriteStep;
    type IntoIter = std::slice::Iter<'a, RewriteStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// How traces are rendered and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceFormat {
    /// Maximum depth of printed terms, `None` for no limit
    pub expr_depth: Option<usize>,
    /// What each step reports
    pub verbosity: TraceVerbosity,
}

impl Default for TraceFormat {
    fn default() -> Self {
        Self::from_options(&Options::default())
    }
}

impl TraceFormat {
    /// Format matching the current values of `options`.
    pub fn from_options(options: &Options) -> Self {
        Self {
            expr_depth: options.expr_depth(),
            verbosity: options.trace_verbosity(),
        }
    }
}

/// Shared, updatable [`TraceFormat`].
///
/// Registered with an options manager, it follows changes to the
/// `expr-depth` and `trace-verbosity` options. Clones share the same
/// format.
#[derive(Debug, Clone, Default)]
pub struct TraceFormatHandle {
    inner: Arc<RwLock<TraceFormat>>,
}

impl TraceFormatHandle {
    /// Handle holding `format`.
    pub fn new(format: TraceFormat) -> Self {
        Self {
            inner: Arc::new(RwLock::new(format)),
        }
    }

    /// Current format.
    pub fn get(&self) -> TraceFormat {
        *self.inner.read()
    }

    /// Replace the format.
    pub fn set(&self, format: TraceFormat) {
        *self.inner.write() = format;
    }

    /// Set the printed term depth.
    pub fn set_expr_depth(&self, depth: Option<usize>) {
        self.inner.write().expr_depth = depth;
    }

    /// Set the verbosity.
    pub fn set_verbosity(&self, verbosity: TraceVerbosity) {
        self.inner.write().verbosity = verbosity;
    }
}

impl OptionListener for TraceFormatHandle {
    fn notify_set_option(&self, key: OptionKey, options: &Options) {
        match key {
            OptionKey::ExprDepth => self.set_expr_depth(options.expr_depth()),
            OptionKey::TraceVerbosity => self.set_verbosity(options.trace_verbosity()),
        }
    }
}
