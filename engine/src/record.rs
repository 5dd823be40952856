//! User record types.

use crate::{error::Result, Error, UserId};
use serde::{Deserialize, Serialize};

/// A user as presented to callers, from either the remote origin or the overlay.
///
/// Remote payloads carry more fields than these (username, address, company);
/// anything unknown is dropped on decode and missing strings decode as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Remote-assigned integer or locally generated timestamp
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl UserRecord {
    /// Build a record from caller-supplied fields under the given id.
    pub fn from_fields(id: UserId, fields: UserFields) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
        }
    }

    /// The editable part of the record.
    pub fn fields(&self) -> UserFields {
        UserFields {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Editable user fields, as sent to the create and update endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl UserFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Reject the first field that is empty or only whitespace.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                return Err(Error::EmptyField(field));
            }
        }
        Ok(())
    }
}
