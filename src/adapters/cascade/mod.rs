//! Cascade target adapters.
//!
//! | Port | Adapters |
//! |------|----------|
//! | `IdentityProvider` | `HttpIdentityProvider`, `InMemoryIdentityProvider` |
//! | `PrimaryStore` | `PostgresPrimaryStore`, `InMemoryPrimaryStore` |
//! | `ObjectStore` | `LocalObjectStore`, `InMemoryObjectStore` |

mod http_identity;
mod in_memory;
mod local_object_store;
mod postgres_primary;

pub use http_identity::{HttpIdentityConfig, HttpIdentityProvider};
pub use in_memory::{InMemoryIdentityProvider, InMemoryObjectStore, InMemoryPrimaryStore};
pub use local_object_store::LocalObjectStore;
pub use postgres_primary::PostgresPrimaryStore;
