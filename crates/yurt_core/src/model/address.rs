//! Address domain model.

use serde::{Deserialize, Serialize};

/// Storage-generated address identity.
pub type AddressId = i64;

/// Persisted address row.
///
/// Addresses own nothing else and are never mutated after creation; a
/// relocation always inserts a new row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub city: String,
    pub district: String,
    pub street: String,
    pub building: Option<String>,
    pub postal_code: Option<String>,
}

/// Free-form address fields supplied by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCreateRequest {
    pub city: String,
    pub district: String,
    pub street: String,
    pub building: Option<String>,
    pub postal_code: Option<String>,
}

impl AddressCreateRequest {
    /// Creates a request with the required fields and no optional parts.
    pub fn new(
        city: impl Into<String>,
        district: impl Into<String>,
        street: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            district: district.into(),
            street: street.into(),
            building: None,
            postal_code: None,
        }
    }
}
