//! Error types for type resolution and strategy invocation.

use thiserror::Error;

/// Why a `tail` modifier was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailViolation {
    /// The field is not the last declared field of its owner.
    NotLastField,
    /// The field's type is not a sequence.
    NotSequence,
}

impl std::fmt::Display for TailViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TailViolation::NotLastField => write!(f, "must be on last field"),
            TailViolation::NotSequence => write!(f, "field type is not a sequence"),
        }
    }
}

/// Errors raised while resolving a type's metadata.
///
/// Every failure is returned to the immediate caller; nothing is logged
/// and swallowed inside the registry.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("rlp: unknown modifier \"{token}\" on {owner}.{field}")]
    ModifierSyntax {
        token: String,
        owner: String,
        field: String,
    },

    #[error("rlp: invalid modifier \"tail\" for {owner}.{field} ({reason})")]
    ModifierPlacement {
        owner: String,
        field: String,
        reason: TailViolation,
    },

    #[error("rlp: cannot build strategies for {ty}: {reason}")]
    StrategyBuild { ty: String, reason: String },

    #[error("rlp: nesting of {ty} exceeds the depth limit of {limit}")]
    DepthExceeded { ty: String, limit: usize },

    #[error("rlp: type cache lock poisoned")]
    LockPoisoned,
}

impl ResolveError {
    /// Shorthand for a builder failure on `ty`.
    pub fn build(ty: impl ToString, reason: impl Into<String>) -> Self {
        ResolveError::StrategyBuild {
            ty: ty.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while a decode or write strategy runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("rlp: unexpected end of input")]
    UnexpectedEnd,

    #[error("rlp: expected input string or byte")]
    ExpectedString,

    #[error("rlp: expected input list")]
    ExpectedList,

    #[error("rlp: non-canonical size information")]
    NonCanonicalSize,

    #[error("rlp: non-canonical integer (leading zero bytes) for {ty}")]
    LeadingZero { ty: String },

    #[error("rlp: input string too long for {ty}")]
    UintOverflow { ty: String },

    #[error("rlp: value size exceeds available input length")]
    ValueTooLarge,

    #[error("rlp: invalid boolean encoding for {ty}")]
    InvalidBool { ty: String },

    #[error("rlp: invalid UTF-8 for {ty}")]
    InvalidUtf8 { ty: String },

    #[error("rlp: too few elements for {ty}")]
    TooFewElements { ty: String },

    #[error("rlp: input list has too many elements for {ty}")]
    TooManyElements { ty: String },

    #[error("rlp: call of list_end outside of any list")]
    NotInList,

    #[error("rlp: call of list_end not positioned at end of list")]
    NotAtListEnd,

    #[error("rlp: input contains more than one value")]
    TrailingData,

    #[error("rlp: cannot write {got} as {expected}")]
    TypeMismatch { expected: String, got: String },

    #[error("rlp: strategies for {ty} are not resolved yet")]
    Unresolved { ty: String },
}
