//! Record models for the Pet Shop API

mod owner;
mod pet;
pub mod schema;

pub use owner::{NewOwner, Owner};
pub use pet::{Gender, NewPet, Pet, PhotoFile};
pub use schema::{RecordKind, SchemaError, SchemaIssue, validate_owners, validate_pets};

/// Anything with a server-assigned identifier.
pub trait Record {
    /// Server-assigned, immutable identifier
    fn id(&self) -> i64;
}

/// Serde helper: treat `None` and blank strings alike when serializing.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

/// Turn form input into an optional value, dropping blank strings.
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
