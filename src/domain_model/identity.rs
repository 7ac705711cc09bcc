use super::FieldError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const USER_ID_LEN: usize = 5;
pub const EMAIL_MAX_LEN: usize = 45;

static NIF_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{8}[A-Z]$").unwrap());

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$").unwrap()
});

/// Canonical user identifier: five ASCII alphanumeric characters, upper-cased.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Builds the id the way default accounts get theirs: initial of the first
    /// name, initials of the first two surname words and the last two
    /// characters of the NIF.
    ///
    /// A single-word surname contributes its initial twice. Spanish accented
    /// initials are folded to their base letter; other non-ASCII initials are
    /// rejected.
    pub fn derive(first_name: &str, last_name: &str, nif: &Nif) -> Result<Self, FieldError> {
        let first = first_name
            .split_whitespace()
            .find_map(|w| w.chars().next())
            .map(fold_initial)
            .ok_or(FieldError::Empty {
                field: "first_name",
            })?;

        let mut surnames = last_name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .map(fold_initial);
        let s1 = surnames.next().ok_or(FieldError::Empty { field: "last_name" })?;
        let s2 = surnames.next().unwrap_or(s1);

        let mut raw = String::with_capacity(USER_ID_LEN);
        raw.extend([first, s1, s2]);
        raw.push_str(nif.suffix());
        raw.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_uppercase();
        if id.len() != USER_ID_LEN || !id.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(FieldError::UserId(s.to_string()));
        }
        Ok(UserId(id))
    }
}

fn fold_initial(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'Á' | 'À' | 'Ä' => 'A',
        'é' | 'è' | 'ë' | 'É' | 'È' | 'Ë' => 'E',
        'í' | 'ì' | 'ï' | 'Í' | 'Ì' | 'Ï' => 'I',
        'ó' | 'ò' | 'ö' | 'Ó' | 'Ò' | 'Ö' => 'O',
        'ú' | 'ù' | 'ü' | 'Ú' | 'Ù' | 'Ü' => 'U',
        'ñ' | 'Ñ' => 'N',
        'ç' | 'Ç' => 'C',
        _ => c,
    }
}

impl TryFrom<String> for UserId {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Spanish national id number: eight digits and a letter.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Nif(String);

impl Nif {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last two characters (final digit and letter).
    pub fn suffix(&self) -> &str {
        // ASCII-only by construction.
        &self.0[7..]
    }
}

impl fmt::Display for Nif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Nif {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let nif = s.trim().to_ascii_uppercase();
        if !NIF_PATTERN.is_match(&nif) {
            return Err(FieldError::Nif(s.to_string()));
        }
        Ok(Nif(nif))
    }
}

impl TryFrom<String> for Nif {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Nif> for String {
    fn from(value: Nif) -> Self {
        value.0
    }
}

/// Stored lower-cased, so addresses differing only in case are the same key.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let email = s.trim().to_ascii_lowercase();
        if email.chars().count() > EMAIL_MAX_LEN {
            return Err(FieldError::TooLong {
                field: "email",
                max: EMAIL_MAX_LEN,
            });
        }
        if !EMAIL_PATTERN.is_match(&email) {
            return Err(FieldError::Email(s.to_string()));
        }
        Ok(Email(email))
    }
}

impl TryFrom<String> for Email {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_is_normalized_to_upper_case() {
        let id: UserId = " u0001 ".parse().unwrap();
        assert_eq!(id.as_str(), "U0001");
    }

    #[test]
    fn user_id_rejects_wrong_length_and_symbols() {
        assert!("U001".parse::<UserId>().is_err());
        assert!("U00011".parse::<UserId>().is_err());
        assert!("U-001".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn derive_matches_default_account_ids() {
        let admin_nif: Nif = "76543210A".parse().unwrap();
        let guest_nif: Nif = "06543210I".parse().unwrap();

        let admin = UserId::derive("Admin", "Admin Admin", &admin_nif).unwrap();
        let guest = UserId::derive("invitado", "Invitado Invitado", &guest_nif).unwrap();

        assert_eq!(admin.as_str(), "AAA0A");
        assert_eq!(guest.as_str(), "III0I");
    }

    #[test]
    fn derive_repeats_a_single_surname_initial() {
        let nif: Nif = "12345678Z".parse().unwrap();
        let id = UserId::derive("Luis", "Pérez", &nif).unwrap();
        assert_eq!(id.as_str(), "LPP8Z");
    }

    #[test]
    fn user_id_rejects_non_ascii_letters() {
        assert!(matches!(
            "ñandú".parse::<UserId>(),
            Err(FieldError::UserId(_))
        ));
        assert!("ÁB12C".parse::<UserId>().is_err());
    }

    #[test]
    fn derive_folds_accented_initials_to_ascii() {
        let nif: Nif = "12345678Z".parse().unwrap();
        let id = UserId::derive("Ángel", "Álvarez Ñúñez", &nif).unwrap();
        assert_eq!(id.as_str(), "AAN8Z");

        let id = UserId::derive("óscar", "úbeda", &nif).unwrap();
        assert_eq!(id.as_str(), "OUU8Z");
    }

    #[test]
    fn derive_rejects_initials_without_an_ascii_form() {
        let nif: Nif = "12345678Z".parse().unwrap();
        assert!(matches!(
            UserId::derive("Łukasz", "Nowak", &nif),
            Err(FieldError::UserId(_))
        ));
    }

    #[test]
    fn derive_requires_names() {
        let nif: Nif = "12345678Z".parse().unwrap();
        assert_eq!(
            UserId::derive("  ", "Pérez", &nif),
            Err(FieldError::Empty {
                field: "first_name"
            })
        );
        assert_eq!(
            UserId::derive("Luis", "", &nif),
            Err(FieldError::Empty { field: "last_name" })
        );
    }

    #[test]
    fn nif_requires_eight_digits_and_a_letter() {
        assert_eq!("12345678a".parse::<Nif>().unwrap().as_str(), "12345678A");
        assert!("1234567A".parse::<Nif>().is_err());
        assert!("123456789".parse::<Nif>().is_err());
        assert!("X2345678A".parse::<Nif>().is_err());
    }

    #[test]
    fn email_format() {
        assert!("a@example.com".parse::<Email>().is_ok());
        assert!("jv.admin@gmail.com".parse::<Email>().is_ok());
        assert!("no-at-sign.com".parse::<Email>().is_err());
        assert!("a@localhost".parse::<Email>().is_err());
        assert!("a b@example.com".parse::<Email>().is_err());

        assert_eq!(
            " Jv.Admin@Gmail.COM ".parse::<Email>().unwrap().as_str(),
            "jv.admin@gmail.com"
        );

        let long = format!("{}@example.com", "x".repeat(40));
        assert!(matches!(
            long.parse::<Email>(),
            Err(FieldError::TooLong { field: "email", .. })
        ));
    }

    #[test]
    fn serde_rejects_invalid_ids() {
        let ok: UserId = serde_json::from_str("\"aaa0a\"").unwrap();
        assert_eq!(ok.as_str(), "AAA0A");
        assert!(serde_json::from_str::<UserId>("\"bad\"").is_err());
    }
}
