use super::{Credential, Email, FieldError, Nif, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const TEXT_FIELD_MAX_LEN: usize = 45;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Guest,
    Normal,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Guest => "GUEST",
            UserRole::Normal => "NORMAL",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GUEST" => Ok(UserRole::Guest),
            "NORMAL" => Ok(UserRole::Normal),
            "ADMIN" => Ok(UserRole::Admin),
            _ => Err(FieldError::Role(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub national_id: Nif,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub email: Email,
    pub birth_date: NaiveDate,
    pub registration_date: NaiveDate,
    #[serde(skip_serializing)]
    pub credential: Credential,
    pub role: UserRole,
}

impl User {
    /// Checks the free-text fields; the identifier fields validate themselves
    /// on construction.
    pub fn validate(&self) -> Result<(), FieldError> {
        check_text("first_name", &self.first_name)?;
        check_text("last_name", &self.last_name)?;
        check_text("address", &self.address)?;
        Ok(())
    }

    /// The three keys this user can be looked up by.
    pub fn equivalence_keys(&self) -> [&str; 3] {
        [
            self.id.as_str(),
            self.national_id.as_str(),
            self.email.as_str(),
        ]
    }
}

fn check_text(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Empty { field });
    }
    if value.chars().count() > TEXT_FIELD_MAX_LEN {
        return Err(FieldError::TooLong {
            field,
            max: TEXT_FIELD_MAX_LEN,
        });
    }
    Ok(())
}
