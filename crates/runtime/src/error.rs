//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine setup failures and rejected intents so clients can bubble
//! them up with the combatant they concern.
use arena_core::{CombatantId, CommandError, ErrorSeverity, GameError, SetupError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("{combatant} intent rejected: {source}")]
    Command {
        combatant: CombatantId,
        #[source]
        source: CommandError,
    },

    #[error("match is already over")]
    MatchOver,

    #[error("character '{name}' is not in the roster")]
    UnknownCharacter { name: String },
}

impl RuntimeError {
    pub fn command(combatant: CombatantId, source: CommandError) -> Self {
        Self::Command { combatant, source }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Setup(inner) => inner.severity(),
            Self::Command { source, .. } => source.severity(),
            Self::MatchOver => ErrorSeverity::Validation,
            Self::UnknownCharacter { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Setup(inner) => inner.error_code(),
            Self::Command { source, .. } => source.error_code(),
            Self::MatchOver => "RUNTIME_MATCH_OVER",
            Self::UnknownCharacter { .. } => "RUNTIME_UNKNOWN_CHARACTER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_code_and_severity() {
        let source = CommandError::Dead {
            combatant: CombatantId::P1,
        };
        let err = RuntimeError::command(CombatantId::P1, source.clone());
        assert_eq!(err.severity(), source.severity());
        assert_eq!(err.error_code(), "COMMAND_DEAD");

        let err = RuntimeError::from(SetupError::GridTooSmall {
            width: 1,
            height: 1,
        });
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(RuntimeError::MatchOver.error_code(), "RUNTIME_MATCH_OVER");
    }
}
