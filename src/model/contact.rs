//! Address-book contacts.

use serde::{Deserialize, Serialize};

use super::{de, initials_of};

/// A contact as stored by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Backend id.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub id: String,
    /// Given name; drives sorting and grouping.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub first_name: String,
    /// Family name.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub last_name: String,
    /// E-mail address.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub email: String,
    /// Phone number.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub phone: String,
    /// Badge color, a CSS color string.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub color: String,
    /// Badge initials. Derived from the names when the backend omits them.
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub initials: String,
    /// Path of an uploaded picture.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Contact {
    /// `"<first> <last>"`, trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Fills in initials from the names when they are missing.
    pub fn normalize(&mut self) {
        if self.initials.trim().is_empty() {
            self.initials = initials_of(&self.full_name());
        }
    }
}

/// Editable contact fields, sent by `add-contact` and `contact/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    /// Given name (required).
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// E-mail address (required).
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Badge color.
    pub color: String,
    /// Path returned by an image upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&Contact> for ContactFields {
    fn from(contact: &Contact) -> Self {
        Self {
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            color: contact.color.clone(),
            image_url: contact.image_url.clone(),
        }
    }
}
