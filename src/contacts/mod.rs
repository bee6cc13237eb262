//! Contact directory: the alphabetical address book.
//!
//! Every mutation is one backend call followed by a full reload of the
//! listing. Nothing is patched locally.

use std::path::Path;

use crate::api::{Api, ApiError};
use crate::model::{Contact, ContactFields};

/// Heading of the group for names that do not start with a Latin letter.
pub const OTHER_GROUP: char = '#';

/// Contacts sharing the first letter of their first name.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactGroup {
    /// Uppercase `A`..=`Z`, or [`OTHER_GROUP`].
    pub letter: char,
    /// Members sorted by first name.
    pub contacts: Vec<Contact>,
}

/// Sorts by first name, ignoring case, and groups by initial letter.
///
/// Groups come in `A`..=`Z` order, followed by a single [`OTHER_GROUP`]
/// for everything else.
#[must_use]
pub fn group_contacts(mut contacts: Vec<Contact>) -> Vec<ContactGroup> {
    contacts.sort_by_cached_key(|c| c.first_name.to_lowercase());

    let mut groups: Vec<ContactGroup> = Vec::new();
    let mut other = Vec::new();
    for contact in contacts {
        let letter = contact
            .first_name
            .trim_start()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .filter(char::is_ascii_uppercase);
        let Some(letter) = letter else {
            other.push(contact);
            continue;
        };
        match groups.iter_mut().find(|g| g.letter == letter) {
            Some(group) => group.contacts.push(contact),
            None => groups.push(ContactGroup { letter, contacts: vec![contact] }),
        }
    }
    groups.sort_by_key(|g| g.letter);
    if !other.is_empty() {
        groups.push(ContactGroup { letter: OTHER_GROUP, contacts: other });
    }
    groups
}

/// Checks the contact form.
///
/// # Errors
///
/// [`ApiError::Validation`] when the first name or e-mail is blank.
pub fn validate(fields: &ContactFields) -> Result<(), ApiError> {
    let mut missing = Vec::new();
    if fields.first_name.trim().is_empty() {
        missing.push("first name");
    }
    if fields.email.trim().is_empty() {
        missing.push("email");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("Please fill in: {}", missing.join(", "))))
    }
}

/// The grouped contact list and the operations on it.
pub struct ContactDirectory<'a> {
    api: Api<'a>,
    groups: Vec<ContactGroup>,
}

impl<'a> ContactDirectory<'a> {
    /// An empty directory; call [`Self::fetch_and_display_contacts`] to load it.
    #[must_use]
    pub fn new(api: Api<'a>) -> Self {
        Self { api, groups: Vec::new() }
    }

    /// Current groups.
    #[must_use]
    pub fn groups(&self) -> &[ContactGroup] {
        &self.groups
    }

    /// Number of contacts across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.contacts.len()).sum()
    }

    /// Whether the directory holds no contacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Reloads the listing and replaces every group.
    ///
    /// # Errors
    ///
    /// Errors of `GET /api/contacts`; the previous groups are kept then.
    pub async fn fetch_and_display_contacts(&mut self) -> Result<&[ContactGroup], ApiError> {
        let contacts = self.api.contacts().await?;
        self.groups = group_contacts(contacts);
        tracing::debug!(contacts = self.len(), groups = self.groups.len(), "contacts loaded");
        Ok(&self.groups)
    }

    /// Details of one contact.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id, or the backend's error.
    pub async fn show(&self, id: &str) -> Result<Contact, ApiError> {
        self.api.contact(id).await
    }

    /// Creates a contact, then reloads the list.
    ///
    /// # Errors
    ///
    /// Validation errors (nothing is sent) or the backend's error.
    pub async fn add(&mut self, fields: &ContactFields) -> Result<(), ApiError> {
        validate(fields)?;
        self.api.add_contact(fields).await?;
        tracing::info!(name = %fields.first_name, "contact added");
        self.fetch_and_display_contacts().await?;
        Ok(())
    }

    /// Saves `fields` for contact `id`, then reloads the list.
    ///
    /// With `image`, the picture is uploaded first and its stored path
    /// becomes the contact's `imageUrl`.
    ///
    /// # Errors
    ///
    /// Validation errors (nothing is sent), a failed upload (the contact is
    /// not saved), or the backend's error.
    pub async fn update(
        &mut self,
        id: &str,
        fields: &ContactFields,
        image: Option<&Path>,
    ) -> Result<(), ApiError> {
        validate(fields)?;
        let mut fields = fields.clone();
        if let Some(image) = image {
            fields.image_url = Some(self.api.upload_image(id, image).await?);
        }
        self.api.update_contact(id, &fields).await?;
        tracing::info!(contact = %id, "contact saved");
        self.fetch_and_display_contacts().await?;
        Ok(())
    }

    /// Deletes contact `id`, then reloads the list.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id, or the backend's error.
    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        self.api.delete_contact(id).await?;
        tracing::info!(contact = %id, "contact deleted");
        self.fetch_and_display_contacts().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RequestBody;
    use crate::testing::{reply, ScriptedBackend};
    use serde_json::json;

    fn named(first: &str) -> Contact {
        Contact { first_name: first.into(), ..Contact::default() }
    }

    fn letters(groups: &[ContactGroup]) -> Vec<char> {
        groups.iter().map(|g| g.letter).collect()
    }

    #[test]
    fn groups_ignore_case_and_follow_the_alphabet() {
        let groups = group_contacts(vec![named("Carl"), named("bob"), named("Ann")]);
        assert_eq!(letters(&groups), ['A', 'B', 'C']);
        assert_eq!(groups[1].contacts[0].first_name, "bob");
    }

    #[test]
    fn members_are_sorted_within_a_group() {
        let groups = group_contacts(vec![named("anna"), named("Adam"), named("Ben")]);
        let a: Vec<_> = groups[0].contacts.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(a, ["Adam", "anna"]);
    }

    #[test]
    fn other_names_collect_in_a_trailing_group() {
        let groups = group_contacts(vec![named("Émile"), named("Zoe"), named("42"), named("")]);
        assert_eq!(letters(&groups), ['Z', OTHER_GROUP]);
        assert_eq!(groups[1].contacts.len(), 3);
    }

    #[test]
    fn first_name_and_email_are_required() {
        let err = validate(&ContactFields::default()).unwrap_err();
        assert_eq!(err, ApiError::Validation("Please fill in: first name, email".into()));
        let ok = ContactFields { first_name: "Ann".into(), email: "a@x.io".into(), ..ContactFields::default() };
        assert!(validate(&ok).is_ok());
    }

    #[tokio::test]
    async fn add_reloads_the_whole_list() {
        let backend = ScriptedBackend::new(vec![
            reply("POST /api/add-contact", 201, json!({"id": "c2"})),
            reply("GET /api/contacts", 200, json!({
                "c1": {"firstName": "Bob", "lastName": "Stone"},
                "c2": {"firstName": "Ann", "lastName": "Lee"}
            })),
        ]);
        let mut directory = ContactDirectory::new(Api::new(&backend));
        let fields = ContactFields {
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@x.io".into(),
            ..ContactFields::default()
        };

        directory.add(&fields).await.unwrap();

        assert_eq!(backend.routes(), vec!["POST /api/add-contact", "GET /api/contacts"]);
        assert_eq!(letters(directory.groups()), ['A', 'B']);
        assert_eq!(directory.groups()[0].contacts[0].initials, "AL");
        assert_eq!(directory.len(), 2);
    }

    #[tokio::test]
    async fn invalid_contact_is_not_sent() {
        let backend = ScriptedBackend::new(vec![]);
        let mut directory = ContactDirectory::new(Api::new(&backend));

        assert!(directory.add(&ContactFields::default()).await.is_err());
        assert!(backend.routes().is_empty());
    }

    #[tokio::test]
    async fn update_uploads_image_first_and_stores_its_path() {
        let backend = ScriptedBackend::new(vec![
            reply("POST /api/upload-image", 200, json!({"filePath": "uploads/c1.png"})),
            reply("PUT /api/contact/c1", 200, json!({})),
            reply("GET /api/contacts", 200, json!([{"id": "c1", "firstName": "Ann"}])),
        ]);
        let mut directory = ContactDirectory::new(Api::new(&backend));
        let fields = ContactFields {
            first_name: "Ann".into(),
            email: "ann@x.io".into(),
            ..ContactFields::default()
        };

        directory.update("c1", &fields, Some(Path::new("avatar.png"))).await.unwrap();

        assert_eq!(
            backend.routes(),
            vec!["POST /api/upload-image", "PUT /api/contact/c1", "GET /api/contacts"]
        );
        let upload = &backend.requests_to("POST /api/upload-image")[0];
        assert!(matches!(&upload.body, RequestBody::Upload { fields, .. }
            if fields == &[("contactId".to_string(), "c1".to_string())]));
        assert_eq!(backend.json_body("PUT /api/contact/c1")["imageUrl"], "uploads/c1.png");
    }

    #[tokio::test]
    async fn failed_upload_leaves_contact_untouched() {
        let backend = ScriptedBackend::new(vec![reply(
            "POST /api/upload-image",
            413,
            json!({"message": "file too large"}),
        )]);
        let mut directory = ContactDirectory::new(Api::new(&backend));
        let fields = ContactFields {
            first_name: "Ann".into(),
            email: "ann@x.io".into(),
            ..ContactFields::default()
        };

        let err = directory.update("c1", &fields, Some(Path::new("big.png"))).await.unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 413, .. }));
        assert_eq!(backend.routes(), vec!["POST /api/upload-image"]);
    }

    #[tokio::test]
    async fn delete_of_unknown_contact_is_not_found() {
        let backend = ScriptedBackend::new(vec![reply(
            "POST /api/delete/contact/c9",
            404,
            json!({"message": "no such contact"}),
        )]);
        let mut directory = ContactDirectory::new(Api::new(&backend));

        let err = directory.delete("c9").await.unwrap_err();

        assert_eq!(err, ApiError::contact_not_found("c9"));
        assert_eq!(backend.routes(), vec!["POST /api/delete/contact/c9"]);
    }
}
