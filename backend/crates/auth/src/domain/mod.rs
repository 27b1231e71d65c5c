//! Domain Layer
//!
//! Contains entities, value objects, the authorization policy and the
//! credential store trait.

pub mod entity;
pub mod policy;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::identity::{Identity, IdentityChanges, NewIdentity};
pub use policy::{Action, allow, authorize};
pub use repository::IdentityRepository;
