//! User record entity.

use serde::{Deserialize, Serialize};

/// A user record as stored in the `users` table.
///
/// Records are created outside this system and are never mutated by it. The
/// cached form is the JSON object `{"name", "profession", "age", "country"}`,
/// the same shape the durable row has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserRecord {
    /// Unique name, also the lookup and cache key.
    pub name: String,

    /// Profession.
    pub profession: String,

    /// Age in years.
    pub age: i32,

    /// Country of residence.
    pub country: String,
}

impl UserRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        profession: impl Into<String>,
        age: i32,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            profession: profession.into(),
            age,
            country: country.into(),
        }
    }
}
