//! Rewrite rule identifiers.
//!
//! Every rule of the catalog has one [`RewriteId`] with a stable display
//! name. The enum, its list of values and both directions of the name
//! mapping are generated from a single table, so an identifier without a
//! name cannot be declared.
//!
//! Raw numeric values coming from elsewhere (e.g. a diagnostic dump) go
//! through [`RewriteId::from_raw`] and [`rewrite_name`], which never fail:
//! unknown values render as [`UNSUPPORTED`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Name printed for raw values outside the identifier table.
pub const UNSUPPORTED: &str = "<unsupported>";

/// Operator family a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// `str.contains`
    Containment,
    /// `str.indexof`
    IndexOf,
    /// Regular expressions and membership
    Regex,
    /// `str.replace` and `str.replace_all`
    Replace,
    /// `str.substr`
    Substring,
    /// Integer, case and reversal conversions
    StringConversion,
    /// String equalities
    Split,
    /// `str.prefixof` and `str.suffixof`
    SuffixPrefix,
    /// `str.to_code` and `str.from_code`
    CodeConversion,
    /// `str.<=`
    Comparison,
    /// Concatenation, length, Boolean and arithmetic glue
    Core,
}

macro_rules! rewrite_ids {
    ($( $(#[$meta:meta])* $variant:ident = $name:literal in $family:ident, )*) => {
        /// Identifier of a rewrite rule.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u32)]
        pub enum RewriteId {
            $( $(#[$meta])* $variant, )*
        }

        impl RewriteId {
            /// Every identifier, in declaration order.
            pub const ALL: &'static [RewriteId] = &[ $( RewriteId::$variant, )* ];

            /// Display name.
            pub fn name(self) -> &'static str {
                match self {
                    $( RewriteId::$variant => $name, )*
                }
            }

            /// Family of the rule.
            pub fn family(self) -> Family {
                match self {
                    $( RewriteId::$variant => Family::$family, )*
                }
            }

            /// Inverse of [`RewriteId::name`].
            pub fn parse_name(text: &str) -> Option<Self> {
                match text {
                    $( $name => Some(RewriteId::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

rewrite_ids! {
    /// `contains(x, y)` where the components of `y` appear contiguously in `x`
    CtnComponent = "CTN_COMPONENT" in Containment,
    /// `contains(x, c)` with a one-character constant split over components
    CtnConcatChar = "CTN_CONCAT_CHAR" in Containment,
    /// `contains` of two constants
    CtnConst = "CTN_CONST" in Containment,
    /// `contains(x, x)`
    CtnEq = "CTN_EQ" in Containment,
    /// Needle provably longer than the haystack
    CtnLenIneq = "CTN_LEN_INEQ" in Containment,
    /// Needle at least as long as the haystack becomes an equality
    CtnLenIneqNstrict = "CTN_LEN_INEQ_NSTRICT" in Containment,
    /// `contains("", y)` becomes `y = ""`
    CtnLhsEmptystr = "CTN_LHS_EMPTYSTR" in Containment,
    /// Needle needs more of some character than the haystack has
    CtnMsetNss = "CTN_MSET_NSS" in Containment,
    /// Constant haystack missing a constant piece of the needle
    CtnNconstCtnConcat = "CTN_NCONST_CTN_CONCAT" in Containment,
    /// `contains(x, replace(x, y, z))` with `z` longer than `y`
    CtnRepl = "CTN_REPL" in Containment,
    /// One-character needle absent from a replace's pattern and replacement
    CtnReplChar = "CTN_REPL_CHAR" in Containment,
    /// Constant replacement containing the needle
    CtnReplCnstsToCtn = "CTN_REPL_CNSTS_TO_CTN" in Containment,
    /// Needle is a replace on the empty string
    CtnReplEmpty = "CTN_REPL_EMPTY" in Containment,
    /// Entailed one-character needle through a replace
    CtnReplLenOneToCtn = "CTN_REPL_LEN_ONE_TO_CTN" in Containment,
    /// `contains(replace(x, y, x), x)`
    CtnReplSelf = "CTN_REPL_SELF" in Containment,
    /// `contains(x, replace(x, y, z))` with `|y| = |z|`
    CtnReplSimpRepl = "CTN_REPL_SIMP_REPL" in Containment,
    /// Replacement entailed to contain the needle
    CtnReplToCtn = "CTN_REPL_TO_CTN" in Containment,
    /// Needle equal to the replacement
    CtnReplToCtnDisj = "CTN_REPL_TO_CTN_DISJ" in Containment,
    /// `contains(x, "")`
    CtnRhsEmptystr = "CTN_RHS_EMPTYSTR" in Containment,
    /// `contains(x, replace(x, y, z))` with `z` not in `x`
    CtnRplNonCtn = "CTN_RPL_NON_CTN" in Containment,
    /// A constant component of the haystack contains the constant needle
    CtnSplit = "CTN_SPLIT" in Containment,
    /// Needle of length at most one split over components
    CtnSplitOnes = "CTN_SPLIT_ONES" in Containment,
    /// Irrelevant constant end points of the haystack are dropped
    CtnStripEndpt = "CTN_STRIP_ENDPT" in Containment,
    /// Needle is a substring of the haystack
    CtnSubstr = "CTN_SUBSTR" in Containment,
    /// Sides of an equality with provably different lengths
    EqLenDeq = "EQ_LEN_DEQ" in Split,
    /// One side cannot contain the other
    EqNctn = "EQ_NCTN" in Split,
    /// Constant prefixes or suffixes disagree
    EqNfix = "EQ_NFIX" in Split,
    /// `str.from_code` of a constant
    FromCodeEval = "FROM_CODE_EVAL" in CodeConversion,
    /// Needle is the first component of the haystack
    IdofDefCtn = "IDOF_DEF_CTN" in IndexOf,
    /// Empty needle found at the start position
    IdofEmpIdof = "IDOF_EMP_IDOF" in IndexOf,
    /// `indexof(x, x, 0)`
    IdofEqCstStart = "IDOF_EQ_CST_START" in IndexOf,
    /// `indexof(x, x, i)` with symbolic `i`
    IdofEqNorm = "IDOF_EQ_NORM" in IndexOf,
    /// `indexof(x, x, i)` with constant non-zero `i`
    IdofEqNstart = "IDOF_EQ_NSTART" in IndexOf,
    /// `indexof` of constants
    IdofFind = "IDOF_FIND" in IndexOf,
    /// Needle longer than the haystack
    IdofLen = "IDOF_LEN" in IndexOf,
    /// Start position beyond the haystack
    IdofMax = "IDOF_MAX" in IndexOf,
    /// Haystack cannot contain the needle
    IdofNctn = "IDOF_NCTN" in IndexOf,
    /// Negative start position
    IdofNeg = "IDOF_NEG" in IndexOf,
    /// `indexof` of constants with no occurrence
    IdofNfind = "IDOF_NFIND" in IndexOf,
    /// Constant prefix of the haystack holds the needle
    IdofNormPrefix = "IDOF_NORM_PREFIX" in IndexOf,
    /// A prefix of the haystack contains the needle
    IdofPullEndpt = "IDOF_PULL_ENDPT" in IndexOf,
    /// Irrelevant trailing constant of the haystack is dropped
    IdofStripCnstEndpts = "IDOF_STRIP_CNST_ENDPTS" in IndexOf,
    /// Start plus needle length beyond the haystack
    IdofStripSymLen = "IDOF_STRIP_SYM_LEN" in IndexOf,
    /// `str.from_int` of a constant
    ItosEval = "ITOS_EVAL" in StringConversion,
    /// Intersection that is provably empty
    ReAndEmpty = "RE_AND_EMPTY" in Regex,
    /// Union or intersection flattening and deduplication
    ReAndorFlatten = "RE_ANDOR_FLATTEN" in Regex,
    /// One-character string in a star
    ReCharInStrStar = "RE_CHAR_IN_STR_STAR" in Regex,
    /// Regex concatenation simplification
    ReConcat = "RE_CONCAT" in Regex,
    /// Regex concatenation flattening
    ReConcatFlatten = "RE_CONCAT_FLATTEN" in Regex,
    /// Adjacent duplicate stars in a regex concatenation
    ReConcatOpt = "RE_CONCAT_OPT" in Regex,
    /// Membership in a concatenation of `re.allchar`/`re.all`
    ReConcatPureAllchar = "RE_CONCAT_PURE_ALLCHAR" in Regex,
    /// Membership in `re.all ++ str.to_re t ++ re.all`
    ReConcatToContains = "RE_CONCAT_TO_CONTAINS" in Regex,
    /// Empty string in a star
    ReEmptyInStrStar = "RE_EMPTY_IN_STR_STAR" in Regex,
    /// Constant in the star of a single character
    ReInDistCharStar = "RE_IN_DIST_CHAR_STAR" in Regex,
    /// Membership in every string
    ReInSigmaStar = "RE_IN_SIGMA_STAR" in Regex,
    /// Degenerate loop bounds
    ReLoop = "RE_LOOP" in Regex,
    /// Loop of a star
    ReLoopStar = "RE_LOOP_STAR" in Regex,
    /// Union containing `re.all`
    ReOrAll = "RE_OR_ALL" in Regex,
    /// Constant prefix consumed by a regex prefix
    ReSimpleConsume = "RE_SIMPLE_CONSUME" in Regex,
    /// Star of the empty language
    ReStarEmpty = "RE_STAR_EMPTY" in Regex,
    /// Star of the empty string
    ReStarEmptyString = "RE_STAR_EMPTY_STRING" in Regex,
    /// Nested star
    ReStarNestedStar = "RE_STAR_NESTED_STAR" in Regex,
    /// Empty string dropped from a union under a star
    ReStarUnion = "RE_STAR_UNION" in Regex,
    /// Pattern has a character the constant haystack lacks
    ReplCharNcontribFind = "REPL_CHAR_NCONTRIB_FIND" in Replace,
    /// Replace pushed into an `ite` of constants
    ReplDualReplIte = "REPL_DUAL_REPL_ITE" in Replace,
    /// Outer replace cannot match after an inner replace
    ReplReplShortCircuit = "REPL_REPL_SHORT_CIRCUIT" in Replace,
    /// `replace(x, replace(y, x, y), z)`
    ReplRepl2Inv = "REPL_REPL2_INV" in Replace,
    /// `replace(x, replace(y, x, y), y)`
    ReplRepl2InvId = "REPL_REPL2_INV_ID" in Replace,
    /// `replace(x, y, replace(y, x, z))`
    ReplRepl3Inv = "REPL_REPL3_INV" in Replace,
    /// `replace(x, y, replace(y, x, y))`
    ReplRepl3InvId = "REPL_REPL3_INV_ID" in Replace,
    /// Pattern is a prefix substring of the haystack
    ReplSubstIdx = "REPL_SUBST_IDX" in Replace,
    /// `str.replace_all` of constants
    ReplallConst = "REPLALL_CONST" in Replace,
    /// `str.replace_all` with an empty pattern
    ReplallEmptyFind = "REPLALL_EMPTY_FIND" in Replace,
    /// Replace confined to a prefix that contains the pattern
    RplCctn = "RPL_CCTN" in Replace,
    /// Replace moved past a first component without the pattern
    RplCctnRpl = "RPL_CCTN_RPL" in Replace,
    /// Pattern is the first component of the haystack
    RplCntsSubsts = "RPL_CNTS_SUBSTS" in Replace,
    /// `str.replace` of constants
    RplConstFind = "RPL_CONST_FIND" in Replace,
    /// Constant pattern absent from the constant haystack
    RplConstNfind = "RPL_CONST_NFIND" in Replace,
    /// Non-empty pattern in the empty string
    RplEmpCntsSubsts = "RPL_EMP_CNTS_SUBSTS" in Replace,
    /// Pattern equal to the replacement
    RplId = "RPL_ID" in Replace,
    /// Haystack cannot contain the pattern
    RplNctn = "RPL_NCTN" in Replace,
    /// Irrelevant trailing constant pulled out of a replace
    RplPullEndpt = "RPL_PULL_ENDPT" in Replace,
    /// Pattern equal to the haystack
    RplReplace = "RPL_REPLACE" in Replace,
    /// Empty pattern prepends the replacement
    RplRplEmpty = "RPL_RPL_EMPTY" in Replace,
    /// `replace(x, y, x)` with `y` at least as long as `x`
    RplRplLenId = "RPL_RPL_LEN_ID" in Replace,
    /// `replace(c, y, c)` with a one-character constant
    RplXYXSimp = "RPL_X_Y_X_SIMP" in Replace,
    /// Equality split at components of equal length
    SplitEq = "SPLIT_EQ" in Split,
    /// Common prefix stripped from both sides
    SplitEqStripL = "SPLIT_EQ_STRIP_L" in Split,
    /// Common suffix stripped from both sides
    SplitEqStripR = "SPLIT_EQ_STRIP_R" in Split,
    /// Nested substring windows
    SsCombine = "SS_COMBINE" in Substring,
    /// Window end beyond a constant
    SsConstEndOob = "SS_CONST_END_OOB" in Substring,
    /// Length beyond the range of a constant
    SsConstLenMaxOob = "SS_CONST_LEN_MAX_OOB" in Substring,
    /// Non-positive length on a constant
    SsConstLenNonPos = "SS_CONST_LEN_NON_POS" in Substring,
    /// Substring of a constant
    SsConstSs = "SS_CONST_SS" in Substring,
    /// Start beyond any representable position on a constant
    SsConstStartMaxOob = "SS_CONST_START_MAX_OOB" in Substring,
    /// Negative start on a constant
    SsConstStartNeg = "SS_CONST_START_NEG" in Substring,
    /// Start past the end of a constant
    SsConstStartOob = "SS_CONST_START_OOB" in Substring,
    /// Substring of the empty string
    SsEmptystr = "SS_EMPTYSTR" in Substring,
    /// Window end normalized to the string length
    SsEndPtNorm = "SS_END_PT_NORM" in Substring,
    /// String entailed to be empty
    SsGeqZeroStartEntailsEmpS = "SS_GEQ_ZERO_START_ENTAILS_EMP_S" in Substring,
    /// Window covers the whole string
    SsLenInclude = "SS_LEN_INCLUDE" in Substring,
    /// Non-positive constant length
    SsLenNonPos = "SS_LEN_NON_POS" in Substring,
    /// One-character window at zero on a string of length at most one
    SsLenOneZZ = "SS_LEN_ONE_Z_Z" in Substring,
    /// Positive length entails the start is out of bounds
    SsNonZeroLenEntailsOob = "SS_NON_ZERO_LEN_ENTAILS_OOB" in Substring,
    /// Length entailed to be non-positive
    SsStartEntailsZeroLen = "SS_START_ENTAILS_ZERO_LEN" in Substring,
    /// Start entailed to be at or past the end
    SsStartGeqLen = "SS_START_GEQ_LEN" in Substring,
    /// Negative constant start
    SsStartNeg = "SS_START_NEG" in Substring,
    /// Components after the window are dropped
    SsStripEndPt = "SS_STRIP_END_PT" in Substring,
    /// Components before the window are dropped
    SsStripStartPt = "SS_STRIP_START_PT" in Substring,
    /// `str.to_int` of a concatenation with a non-digit constant
    StoiConcatNonnum = "STOI_CONCAT_NONNUM" in StringConversion,
    /// `str.to_int` of a constant
    StoiEval = "STOI_EVAL" in StringConversion,
    /// Case conversion of a constant
    StrConvConst = "STR_CONV_CONST" in StringConversion,
    /// Nested case conversions
    StrConvIdem = "STR_CONV_IDEM" in StringConversion,
    /// Case conversion of a decimal numeral
    StrConvItos = "STR_CONV_ITOS" in StringConversion,
    /// Case conversion distributed over concatenation
    StrConvMinscopeConcat = "STR_CONV_MINSCOPE_CONCAT" in StringConversion,
    /// `"" = replace(x, y, "")`
    StrEmpReplEmp = "STR_EMP_REPL_EMP" in Split,
    /// `"" = replace(x, y, z)` with non-empty `z`
    StrEmpReplEmpR = "STR_EMP_REPL_EMP_R" in Split,
    /// `"" = replace(x, y, x)`
    StrEmpReplXYX = "STR_EMP_REPL_X_Y_X" in Split,
    /// `"" = substr(x, i, n)` expanded to bounds
    StrEmpSubstrElim = "STR_EMP_SUBSTR_ELIM" in Split,
    /// `"" = substr(x, i, n)` with valid start and positive length
    StrEmpSubstrLeqLen = "STR_EMP_SUBSTR_LEQ_LEN" in Split,
    /// `"" = substr(x, i, n)` with start inside `x`
    StrEmpSubstrLeqZ = "STR_EMP_SUBSTR_LEQ_Z" in Split,
    /// Empty concatenation split into empty components
    StrEqConjLenEntail = "STR_EQ_CONJ_LEN_ENTAIL" in Split,
    /// `x ++ c = c ++ x` with a non-homogeneous constant
    StrEqConstNhomog = "STR_EQ_CONST_NHOMOG" in Split,
    /// `x ++ c = c ++ x` with a homogeneous constant
    StrEqHomogConst = "STR_EQ_HOMOG_CONST" in Split,
    /// `"" = replace(x, y, z)`
    StrEqReplEmp = "STR_EQ_REPL_EMP" in Split,
    /// `replace(x, y, z) = x`
    StrEqReplNotCtn = "STR_EQ_REPL_NOT_CTN" in Split,
    /// `replace(x, y, z) = replace(x, y, w)`
    StrEqReplToDis = "STR_EQ_REPL_TO_DIS" in Split,
    /// `replace(x, y, z) = z` with `y` not in `z`
    StrEqReplToEq = "STR_EQ_REPL_TO_EQ" in Split,
    /// `x = y ++ x ++ z`
    StrEqUnify = "STR_EQ_UNIFY" in Split,
    /// Common constant prefix of a `str.<=`
    StrLeqCprefix = "STR_LEQ_CPREFIX" in Comparison,
    /// `str.<=` with an empty side
    StrLeqEmpty = "STR_LEQ_EMPTY" in Comparison,
    /// `str.<=` of constants
    StrLeqEval = "STR_LEQ_EVAL" in Comparison,
    /// `str.<=(x, x)`
    StrLeqId = "STR_LEQ_ID" in Comparison,
    /// `str.rev` of a constant
    StrRevConst = "STR_REV_CONST" in StringConversion,
    /// `str.rev(str.rev(x))`
    StrRevIdem = "STR_REV_IDEM" in StringConversion,
    /// `str.rev` distributed over concatenation
    StrRevMinscopeConcat = "STR_REV_MINSCOPE_CONCAT" in StringConversion,
    /// Substring of a one-character replace
    SubstrReplSwap = "SUBSTR_REPL_SWAP" in Substring,
    /// Prefix or suffix test of constants
    SufPrefixConst = "SUF_PREFIX_CONST" in SuffixPrefix,
    /// Haystack cannot contain the affix
    SufPrefixCtn = "SUF_PREFIX_CTN" in SuffixPrefix,
    /// Empty affix
    SufPrefixEmpty = "SUF_PREFIX_EMPTY" in SuffixPrefix,
    /// Empty haystack
    SufPrefixEmptyConst = "SUF_PREFIX_EMPTY_CONST" in SuffixPrefix,
    /// Affix at least as long as the haystack
    SufPrefixEq = "SUF_PREFIX_EQ" in SuffixPrefix,
    /// Affix of equal length becomes an equality
    SufPrefixToEqs = "SUF_PREFIX_TO_EQS" in SuffixPrefix,
    /// `str.to_code` of a constant
    ToCodeEval = "TO_CODE_EVAL" in CodeConversion,

    /// Concatenation flattening and constant merging
    ConcatNorm = "CONCAT_NORM" in Core,
    /// `str.len` of a constant
    LenEval = "LEN_EVAL" in Core,
    /// `str.len` distributed over concatenation
    LenConcat = "LEN_CONCAT" in Core,
    /// Equality of identical terms or distinct literals
    EqEval = "EQ_EVAL" in Core,
    /// Boolean connective folding
    BoolEval = "BOOL_EVAL" in Core,
    /// `ite` with a constant or redundant condition
    IteEval = "ITE_EVAL" in Core,
    /// Integer arithmetic folding
    ArithEval = "ARITH_EVAL" in Core,
    /// Integer comparison decided by entailment
    ArithLeqEntail = "ARITH_LEQ_ENTAIL" in Core,
    /// Membership of a constant decided by evaluation
    ReInEval = "RE_IN_EVAL" in Regex,
    /// Membership in the empty language
    ReInNone = "RE_IN_NONE" in Regex,
    /// Membership in a single string becomes an equality
    ReInStrToRe = "RE_IN_STR_TO_RE" in Regex,
}

impl RewriteId {
    /// Raw numeric value.
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Identifier with the given raw value, if there is one.
    pub fn from_raw(raw: u32) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }
}

/// Name of a raw identifier value; [`UNSUPPORTED`] for values outside the
/// table.
pub fn rewrite_name(raw: u32) -> &'static str {
    RewriteId::from_raw(raw).map_or(UNSUPPORTED, RewriteId::name)
}

impl fmt::Display for RewriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for RewriteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for RewriteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        RewriteId::parse_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown rewrite `{name}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn test_names_are_unique() {
        let names: FxHashSet<&str> = RewriteId::ALL.iter().map(|id| id.name()).collect();
        assert_eq!(names.len(), RewriteId::ALL.len());
        assert!(!names.contains(UNSUPPORTED));
    }

    #[test]
    fn test_name_round_trip() {
        for &id in RewriteId::ALL {
            assert_eq!(RewriteId::parse_name(id.name()), Some(id));
        }
        assert_eq!(RewriteId::parse_name("NOT_A_RULE"), None);
        assert_eq!(RewriteId::parse_name("ctn_eq"), None);
    }

    #[test]
    fn test_raw_values_follow_declaration_order() {
        for (index, &id) in RewriteId::ALL.iter().enumerate() {
            assert_eq!(id.as_raw() as usize, index);
            assert_eq!(RewriteId::from_raw(id.as_raw()), Some(id));
        }
    }

    #[test]
    fn test_unknown_raw_value_is_unsupported() {
        let past_end = RewriteId::ALL.len() as u32;
        assert_eq!(RewriteId::from_raw(past_end), None);
        assert_eq!(rewrite_name(past_end), UNSUPPORTED);
        assert_eq!(rewrite_name(u32::MAX), UNSUPPORTED);
        assert_eq!(rewrite_name(0), "CTN_COMPONENT");
    }

    #[test]
    fn test_families() {
        assert_eq!(RewriteId::CtnEq.family(), Family::Containment);
        assert_eq!(RewriteId::SubstrReplSwap.family(), Family::Substring);
        assert_eq!(RewriteId::ReInEval.family(), Family::Regex);
        assert_eq!(RewriteId::SplitEqStripL.family(), Family::Split);
        assert_eq!(RewriteId::ToCodeEval.family(), Family::CodeConversion);
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&RewriteId::RplId).unwrap();
        assert_eq!(json, "\"RPL_ID\"");
        let back: RewriteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RewriteId::RplId);
        assert!(serde_json::from_str::<RewriteId>("\"NOPE\"").is_err());
    }
}
