//! Registered user accounts, the pool of assignable people.

use serde::{Deserialize, Serialize};

use super::{de, initials_of};

/// A registered account.
///
/// The backend returns accounts as a map keyed by id; the key is copied
/// into [`Account::id`] when the listing is decoded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account id (map key of the listing).
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub id: String,
    /// Given name.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub first_name: String,
    /// Family name.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub last_name: String,
    /// E-mail address.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub email: String,
    /// Badge color.
    #[serde(default, alias = "color", deserialize_with = "de::lenient_string")]
    pub profile_color: String,
    /// Badge initials, if the backend sent them.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub initials: String,
}

impl Account {
    /// `"<first> <last>"`, the name stored in a task's assignee list.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Stored initials, or initials derived from the full name.
    #[must_use]
    pub fn badge_initials(&self) -> String {
        if self.initials.trim().is_empty() {
            initials_of(&self.full_name())
        } else {
            self.initials.clone()
        }
    }
}

/// The signed-in user, as reported by `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Whether the backend session is authenticated.
    #[serde(default)]
    pub logged_in: bool,
    /// Given name.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub first_name: String,
    /// Family name.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub last_name: String,
    /// E-mail address.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub email: String,
    /// Badge color.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub profile_color: String,
}

impl Profile {
    /// `"<first> <last>"`, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Sign-up form posted to `POST /api/sign-up`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Login e-mail.
    pub email: String,
    /// Password.
    pub password: String,
    /// Badge color.
    pub profile_color: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn color_alias_and_derived_initials() {
        let account: Account = serde_json::from_value(json!({
            "firstName": "Bob",
            "lastName": "Stone",
            "color": "#ff0000"
        }))
        .unwrap();
        assert_eq!(account.profile_color, "#ff0000");
        assert_eq!(account.full_name(), "Bob Stone");
        assert_eq!(account.badge_initials(), "BS");
    }
}
