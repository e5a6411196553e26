//! The rewrite engine.
//!
//! Terms are normalized bottom-up. At each node the children are brought to
//! normal form first, then the rule table for the node's operator is
//! scanned in order and the first rule that returns a replacement fires.
//! The replacement is normalized again from scratch, since it may have new
//! children and may match other rules. A node is in normal form when no
//! rule of its table fires.
//!
//! Every firing is checked: a rule must not build an ill-formed term,
//! change the sort, or return its input, and with
//! [`RewriteConfig::check_measure`] a size-decreasing rule must really
//! shrink the node. Any violation is a defect in the catalog and aborts
//! the invocation.

use crate::entail::{EntailmentOracle, StructuralOracle};
use crate::error::{Result, RewriteError};
use crate::rewrites::RewriteId;
use crate::rules::{Measure, Rule, RuleContext, rules_for};
use crate::trace::{RewriteStep, Trace, TraceFormat, TraceFormatHandle};
use rustc_hash::FxHashMap;
use strux_core::{Term, TraceVerbosity};
use tracing::{debug, error, trace};

/// Log target of per-rule events.
pub const LOG_TARGET: &str = "strux::rewrite";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    /// Maximum number of rule firings per invocation, `None` for no limit.
    pub max_steps: Option<usize>,
    /// Remember the normal form of every visited subterm.
    pub enable_cache: bool,
    /// Verify that size-decreasing rules shrink the term.
    pub check_measure: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            enable_cache: true,
            check_measure: cfg!(debug_assertions),
        }
    }
}

impl RewriteConfig {
    /// Set the step cap.
    pub fn with_max_steps(mut self, max_steps: Option<usize>) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Enable or disable memoization.
    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Enable or disable the measure check.
    pub fn with_measure_check(mut self, enable: bool) -> Self {
        self.check_measure = enable;
        self
    }
}

/// Statistics of one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// Rules fired
    pub steps: u64,
    /// Nodes entered, including cache hits
    pub nodes_visited: u64,
    /// Normal forms found in the cache
    pub cache_hits: u64,
    /// Nodes normalized without a cached result
    pub cache_misses: u64,
    /// Firings per rule
    pub per_rule: FxHashMap<RewriteId, u64>,
}

impl RewriteStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute cache hit rate.
    pub fn cache_hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    /// Number of times `rule` fired.
    pub fn fired(&self, rule: RewriteId) -> u64 {
        self.per_rule.get(&rule).copied().unwrap_or(0)
    }
}

/// Result of a checked invocation.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// Normal form
    pub term: Term,
    /// Rules fired, in order
    pub trace: Trace,
    /// Counters
    pub stats: RewriteStats,
}

/// Rewriter for string and regular expression terms.
///
/// Holds no state between invocations besides its configuration, so one
/// instance can serve many threads as long as the oracle is reentrant.
///
/// # Examples
///
/// ```
/// use strux_core::{Sort, Term};
/// use strux_rewriter::{RewriteId, StringsRewriter};
///
/// let x = Term::var("x", Sort::String);
/// let t = Term::mk_substr(&x, &Term::int(-1), &Term::int(3)).unwrap();
/// let (nf, trace) = StringsRewriter::new().rewrite_with_trace(&t);
/// assert_eq!(nf, Term::empty_string());
/// assert!(trace.fired(RewriteId::SsStartNeg));
/// ```
#[derive(Debug, Clone)]
pub struct StringsRewriter<O = StructuralOracle> {
    oracle: O,
    config: RewriteConfig,
    format: TraceFormatHandle,
}

impl StringsRewriter<StructuralOracle> {
    /// Rewriter with the structural oracle and default configuration.
    pub fn new() -> Self {
        Self::with_oracle(StructuralOracle::new())
    }
}

impl Default for StringsRewriter<StructuralOracle> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: EntailmentOracle> StringsRewriter<O> {
    /// Rewriter answering guard queries with `oracle`.
    pub fn with_oracle(oracle: O) -> Self {
        Self {
            oracle,
            config: RewriteConfig::default(),
            format: TraceFormatHandle::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: RewriteConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing trace format handle.
    pub fn with_trace_format(mut self, format: TraceFormatHandle) -> Self {
        self.format = format;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Guard oracle.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Handle controlling how steps are logged. Register it with an
    /// options manager to follow option changes.
    pub fn trace_format(&self) -> &TraceFormatHandle {
        &self.format
    }

    /// Normal form of `term`.
    ///
    /// # Panics
    ///
    /// Panics if a rule of the catalog misbehaves or the step cap is
    /// reached; see [`StringsRewriter::try_rewrite`].
    pub fn rewrite(&self, term: &Term) -> Term {
        match self.try_rewrite(term) {
            Ok(nf) => nf,
            Err(err) => panic!("{err}"),
        }
    }

    /// Normal form of `term` with the rules fired to reach it.
    ///
    /// # Panics
    ///
    /// Same conditions as [`StringsRewriter::rewrite`].
    pub fn rewrite_with_trace(&self, term: &Term) -> (Term, Trace) {
        match self.try_rewrite_with_trace(term) {
            Ok(outcome) => (outcome.term, outcome.trace),
            Err(err) => panic!("{err}"),
        }
    }

    /// Normal form of `term`, or the catalog defect that prevented it.
    pub fn try_rewrite(&self, term: &Term) -> Result<Term> {
        self.run(term, false).map(|outcome| outcome.term)
    }

    /// Normal form, trace and statistics, or the catalog defect that
    /// prevented them.
    pub fn try_rewrite_with_trace(&self, term: &Term) -> Result<RewriteOutcome> {
        self.run(term, true)
    }

    fn run(&self, term: &Term, record: bool) -> Result<RewriteOutcome> {
        let mut inv = Invocation {
            ctx: RuleContext {
                oracle: &self.oracle,
            },
            config: &self.config,
            format: self.format.get(),
            record,
            cache: FxHashMap::default(),
            trace: Trace::new(),
            stats: RewriteStats::new(),
        };
        let nf = inv.normalize(term)?;
        debug!(
            steps = inv.stats.steps,
            nodes = inv.stats.nodes_visited,
            cache_hits = inv.stats.cache_hits,
            "rewrite finished"
        );
        Ok(RewriteOutcome {
            term: nf,
            trace: inv.trace,
            stats: inv.stats,
        })
    }
}

/// `term` over new arguments. Normal forms keep their sort, so this only
/// fails if a sort check was skipped.
fn rebuild(term: &Term, args: Vec<Term>) -> Result<Term> {
    term.with_args(args).map_err(|source| {
        error!(target: LOG_TARGET, op = term.op().name(), %source, "cannot rebuild node");
        RewriteError::RebuildFailed {
            op: term.op().name(),
            source,
        }
    })
}

/// State of one top-level invocation.
struct Invocation<'a> {
    ctx: RuleContext<'a>,
    config: &'a RewriteConfig,
    format: TraceFormat,
    record: bool,
    cache: FxHashMap<Term, Term>,
    trace: Trace,
    stats: RewriteStats,
}

impl Invocation<'_> {
    fn normalize(&mut self, term: &Term) -> Result<Term> {
        self.stats.nodes_visited += 1;
        if self.config.enable_cache {
            if let Some(nf) = self.cache.get(term) {
                self.stats.cache_hits += 1;
                return Ok(nf.clone());
            }
            self.stats.cache_misses += 1;
        }

        let mut current = self.normalize_children(term)?;
        while let Some(next) = self.fire_first(&current)? {
            current = self.normalize_children(&next)?;
        }

        if self.config.enable_cache {
            self.cache.insert(current.clone(), current.clone());
            self.cache.insert(term.clone(), current.clone());
        }
        Ok(current)
    }

    fn normalize_children(&mut self, term: &Term) -> Result<Term> {
        if term.args().is_empty() {
            return Ok(term.clone());
        }
        let mut changed = false;
        let mut args = Vec::with_capacity(term.args().len());
        for arg in term.args() {
            let nf = self.normalize(arg)?;
            changed |= &nf != arg;
            args.push(nf);
        }
        if !changed {
            return Ok(term.clone());
        }
        rebuild(term, args)
    }

    fn fire_first(&mut self, term: &Term) -> Result<Option<Term>> {
        for rule in rules_for(term.op()) {
            let out = (rule.apply)(term, &self.ctx).map_err(|source| {
                error!(target: LOG_TARGET, rule = %rule.id, %source, "rule built a malformed term");
                RewriteError::MalformedOutput {
                    rule: rule.id,
                    source,
                }
            })?;
            if let Some(out) = out {
                self.accept(rule, term, &out)?;
                return Ok(Some(out));
            }
        }
        Ok(None)
    }

    fn accept(&mut self, rule: &Rule, before: &Term, after: &Term) -> Result<()> {
        if let Err(err) = self.check(rule, before, after) {
            error!(target: LOG_TARGET, rule = %rule.id, %err, "rule catalog defect");
            return Err(err);
        }

        self.stats.steps += 1;
        *self.stats.per_rule.entry(rule.id).or_insert(0) += 1;
        if let Some(limit) = self.config.max_steps
            && self.stats.steps > limit as u64
        {
            let err = RewriteError::StepLimitExceeded {
                limit,
                rule: rule.id,
            };
            error!(target: LOG_TARGET, %err, "step cap reached");
            return Err(err);
        }

        match self.format.verbosity {
            TraceVerbosity::Off => {}
            TraceVerbosity::Rules => trace!(target: LOG_TARGET, rule = %rule.id, "rewrite"),
            TraceVerbosity::Full => trace!(
                target: LOG_TARGET,
                rule = %rule.id,
                before = %before.display_depth(self.format.expr_depth),
                after = %after.display_depth(self.format.expr_depth),
                "rewrite"
            ),
        }
        if self.record {
            self.trace.push(RewriteStep {
                rule: rule.id,
                before: before.clone(),
                after: after.clone(),
            });
        }
        Ok(())
    }

    fn check(&self, rule: &Rule, before: &Term, after: &Term) -> Result<()> {
        if before.sort() != after.sort() {
            return Err(RewriteError::SortChanged {
                rule: rule.id,
                from: before.sort(),
                to: after.sort(),
            });
        }
        if before == after {
            return Err(RewriteError::NoProgress { rule: rule.id });
        }
        if self.config.check_measure
            && rule.measure == Measure::Size
            && after.size() >= before.size()
        {
            return Err(RewriteError::MeasureViolation {
                rule: rule.id,
                before: before.size(),
                after: after.size(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entail::Entail;
    use strux_core::{Sort, Word};

    fn lit(w: &str) -> Term {
        Term::mk_string(w).unwrap()
    }

    fn x() -> Term {
        Term::var("x", Sort::String)
    }

    #[test]
    fn test_leaf_is_normal() {
        let rw = StringsRewriter::new();
        let outcome = rw.try_rewrite_with_trace(&x()).unwrap();
        assert_eq!(outcome.term, x());
        assert!(outcome.trace.is_empty());
        assert_eq!(outcome.stats.steps, 0);
    }

    #[test]
    fn test_rebuild_reports_the_node() {
        let t = Term::mk_len(&x()).unwrap();
        assert_eq!(
            rebuild(&t, vec![lit("ab")]).unwrap(),
            Term::mk_len(&lit("ab")).unwrap()
        );
        match rebuild(&t, vec![Term::int(1)]) {
            Err(RewriteError::RebuildFailed { op, .. }) => assert_eq!(op, "str.len"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_children_first_then_node() {
        let rw = StringsRewriter::new();
        let inner = Term::mk_concat([lit("ab"), lit("c")]).unwrap();
        let t = Term::mk_len(&inner).unwrap();
        let (nf, trace) = rw.rewrite_with_trace(&t);
        assert_eq!(nf, Term::int(3));
        assert_eq!(
            trace.rules().collect::<Vec<_>>(),
            vec![RewriteId::ConcatNorm, RewriteId::LenEval]
        );
        assert_eq!(trace.steps()[1].before, Term::mk_len(&lit("abc")).unwrap());
    }

    #[test]
    fn test_cache_reuses_shared_subterms() {
        let rw = StringsRewriter::new();
        let sub = Term::mk_substr(&x(), &Term::int(-1), &Term::int(2)).unwrap();
        let t = Term::mk_concat([sub.clone(), x(), sub]).unwrap();
        let outcome = rw.try_rewrite_with_trace(&t).unwrap();
        assert_eq!(outcome.term, x());
        assert!(outcome.stats.cache_hits > 0);
        assert!(outcome.stats.cache_hit_rate() > 0.0);
        assert_eq!(outcome.stats.fired(RewriteId::SsStartNeg), 1);

        let uncached = StringsRewriter::new().with_config(RewriteConfig::default().with_cache(false));
        let outcome = uncached.try_rewrite_with_trace(&t).unwrap();
        assert_eq!(outcome.term, x());
        assert_eq!(outcome.stats.cache_hits, 0);
        assert_eq!(outcome.stats.fired(RewriteId::SsStartNeg), 2);
    }

    #[test]
    fn test_step_cap() {
        let rw = StringsRewriter::new()
            .with_config(RewriteConfig::default().with_max_steps(Some(1)));
        let inner = Term::mk_concat([lit("ab"), lit("c")]).unwrap();
        let t = Term::mk_len(&inner).unwrap();
        let err = rw.try_rewrite(&t).unwrap_err();
        assert_eq!(
            err,
            RewriteError::StepLimitExceeded {
                limit: 1,
                rule: RewriteId::LenEval
            }
        );
        assert!(rw.try_rewrite(&lit("ab")).is_ok());
    }

    #[test]
    #[should_panic(expected = "step limit")]
    fn test_rewrite_panics_on_defect() {
        let rw = StringsRewriter::new()
            .with_config(RewriteConfig::default().with_max_steps(Some(0)));
        let t = Term::mk_len(&lit("ab")).unwrap();
        rw.rewrite(&t);
    }

    /// Oracle that never decides anything.
    struct Undecided;

    impl EntailmentOracle for Undecided {
        fn length_geq(&self, _: &Term, _: i64) -> Entail {
            Entail::Unknown
        }
        fn length_leq(&self, _: &Term, _: i64) -> Entail {
            Entail::Unknown
        }
        fn is_constant(&self, _: &Term) -> Option<Word> {
            None
        }
        fn contains(&self, _: &Term, _: &Term) -> Entail {
            Entail::Unknown
        }
        fn equal_length(&self, _: &Term, _: &Term) -> Entail {
            Entail::Unknown
        }
        fn arith_geq(&self, _: &Term, _: &Term) -> Entail {
            Entail::Unknown
        }
    }

    #[test]
    fn test_custom_oracle_is_consulted() {
        let y = Term::var("y", Sort::String);
        let t = Term::mk_contains(&x(), &Term::mk_concat([x(), y.clone()]).unwrap()).unwrap();
        assert_eq!(StringsRewriter::with_oracle(Undecided).rewrite(&t), t);
        assert_eq!(
            StringsRewriter::new().rewrite(&t),
            Term::mk_eq(&Term::empty_string(), &y).unwrap()
        );
    }

    #[test]
    fn test_trace_format_follows_handle() {
        let rw = StringsRewriter::new();
        rw.trace_format().set_verbosity(TraceVerbosity::Full);
        assert_eq!(rw.trace_format().get().verbosity, TraceVerbosity::Full);
        let t = Term::mk_len(&lit("ab")).unwrap();
        assert_eq!(rw.rewrite(&t), Term::int(2));
    }
}
