//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, authorization helpers and error
//! types that form the vocabulary of the account lifecycle domain.

mod authorization;
mod errors;
mod ids;
mod timestamp;

pub use authorization::{ensure_self_service, AuthorizationResult};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::AccountId;
pub use timestamp::Timestamp;
