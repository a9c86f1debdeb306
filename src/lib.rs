//! Account Lifecycle - Deferred account deletion
//!
//! Users request deletion of their own account; after a grace period a
//! one-shot schedule fires and purges the account from the identity
//! provider, the primary data store and object storage. Until then the
//! request can be cancelled.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
