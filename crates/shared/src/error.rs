use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pre-submit form validation failures. These never reach the gateway; a
/// presenter rejects the submission locally and keeps the entered values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    #[error("destination does not match any known destination")]
    UnknownDestination,
    #[error("price must be a positive integer")]
    NonPositivePrice,
    #[error("end date must come after start date")]
    InvertedDates,
}
