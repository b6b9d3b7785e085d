//! Ошибки сборки guard'а

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardSetupError {
    #[error("patrol route must contain at least one waypoint")]
    EmptyPatrolRoute,
    #[error("alert route must contain at least one waypoint")]
    EmptyAlertRoute,
    #[error("patrol waypoint {index} has no look target")]
    MissingLookTarget { index: usize },
}
