//! SMT-LIB style printing of terms.

use super::{Op, Term};
use num_traits::Signed;
use std::fmt;

/// Depth-limited display adapter for a [`Term`].
///
/// Applications nested deeper than the limit are printed as `(...)`.
pub struct DisplayTerm<'a> {
    term: &'a Term,
    max_depth: Option<usize>,
}

impl<'a> DisplayTerm<'a> {
    /// Wrap `term`, eliding anything below `max_depth`.
    pub fn new(term: &'a Term, max_depth: Option<usize>) -> Self {
        Self { term, max_depth }
    }
}

impl fmt::Display for DisplayTerm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_term(self.term, self.max_depth, f)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_term(self, None, f)
    }
}

fn write_term(term: &Term, depth: Option<usize>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match term.op() {
        Op::Var(name) => return f.write_str(name),
        Op::Str(w) => return write!(f, "{w}"),
        Op::Int(n) if n.is_negative() => return write!(f, "(- {})", n.abs()),
        Op::Int(n) => return write!(f, "{n}"),
        Op::Bool(b) => return write!(f, "{b}"),
        Op::ReNone | Op::ReAll | Op::ReAllChar => return f.write_str(term.op().name()),
        _ => {}
    }

    if depth == Some(0) {
        return f.write_str("(...)");
    }
    let child_depth = depth.map(|d| d - 1);

    f.write_str("(")?;
    match term.op() {
        Op::ReLoop { lo, hi } => write!(f, "(_ re.loop {lo} {hi})")?,
        op => f.write_str(op.name())?,
    }
    for arg in term.args() {
        f.write_str(" ")?;
        write_term(arg, child_depth, f)?;
    }
    f.write_str(")")
}
