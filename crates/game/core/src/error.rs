//! Common error infrastructure for fray-core.
//!
//! Domain-specific errors (e.g. [`crate::effects::EffectError`],
//! [`crate::fight::FightError`]) live next to the operations they validate.
//! Every one of them implements [`GameError`] so callers can decide how to
//! surface a failure without matching on each variant.
//!
//! A missed attack is not an error: it is a
//! [`crate::combat::DamageLog`] with `successful == false`.

/// Severity level of an error, used for categorization and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input (unknown id, insufficient resources). State is untouched.
    Validation,

    /// The operation cannot proceed because an invariant does not hold
    /// (fewer than two parties, nobody left to act). Reported to the
    /// initiator; no persisted state was mutated.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all fray-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity by whether the caller's input or the entity state is
///   at fault
/// - `error_code` returns a stable `DOMAIN_REASON` identifier per variant
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
