use thiserror::Error;
use uuid::Uuid;

use crate::machine::SessionPhase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {operation} while the session is {phase}")]
    InvalidTransition {
        operation: &'static str,
        phase: SessionPhase,
    },
    #[error("Expression {0} is not part of the current session")]
    InvalidReference(Uuid),
    #[error("No candidates available to build a session")]
    EmptyPool,
}
