//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, authorization, errors)
//! - `account` - Account deletion marker, schedules and trigger payloads

pub mod account;
pub mod foundation;
