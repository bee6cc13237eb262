//! Assignee selection and account lookups.

use crate::api::{Api, ApiError};
use crate::model::Account;

/// Ordered, duplicate-free list of chosen assignee names.
///
/// One selection belongs to one add or edit session; nothing is shared
/// between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssigneeSelection {
    names: Vec<String>,
}

impl AssigneeSelection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A selection seeded from existing names; later duplicates are dropped.
    #[must_use]
    pub fn seeded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        selection.set(names);
        selection
    }

    /// Replaces the selection.
    pub fn set<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.clear();
        for name in names {
            let name = name.into();
            if !self.contains(&name) {
                self.names.push(name);
            }
        }
    }

    /// Adds `name` if absent, removes it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.names.iter().position(|n| n == name) {
            self.names.remove(pos);
            false
        } else {
            self.names.push(name.to_string());
            true
        }
    }

    /// Whether `name` is selected.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Selected names in selection order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of selected names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Drops every name.
    pub fn clear(&mut self) {
        self.names.clear();
    }
}

/// One row of the assignee dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeOption {
    /// Account id.
    pub account_id: String,
    /// `"<first> <last>"`.
    pub full_name: String,
    /// Badge initials.
    pub initials: String,
    /// Badge color.
    pub color: String,
    /// Whether the name is in the selection.
    pub checked: bool,
}

/// Short-lived cache of `GET /api/accounts`.
///
/// The first lookup fetches the listing; later lookups reuse it until
/// [`AccountDirectory::invalidate`] is called. Create one per render cycle.
pub struct AccountDirectory<'a> {
    api: Api<'a>,
    accounts: Option<Vec<Account>>,
}

impl<'a> AccountDirectory<'a> {
    /// A directory that has not fetched anything yet.
    #[must_use]
    pub fn new(api: Api<'a>) -> Self {
        Self { api, accounts: None }
    }

    /// All accounts, fetched on first use.
    ///
    /// # Errors
    ///
    /// Errors of `GET /api/accounts`.
    pub async fn accounts(&mut self) -> Result<&[Account], ApiError> {
        if self.accounts.is_none() {
            self.accounts = Some(self.api.accounts().await?);
        }
        Ok(self.accounts.as_deref().unwrap_or_default())
    }

    /// Forgets the cached listing.
    pub fn invalidate(&mut self) {
        self.accounts = None;
    }

    /// Profile color of the account with the given names.
    ///
    /// # Errors
    ///
    /// Errors of `GET /api/accounts`.
    pub async fn profile_color(
        &mut self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<String>, ApiError> {
        Ok(self
            .accounts()
            .await?
            .iter()
            .find(|a| a.first_name == first_name && a.last_name == last_name)
            .map(|a| a.profile_color.clone())
            .filter(|c| !c.is_empty()))
    }

    /// Profile color for a stored assignee name (`"<first> <last>"`).
    ///
    /// # Errors
    ///
    /// Errors of `GET /api/accounts`.
    pub async fn color_of(&mut self, full_name: &str) -> Result<Option<String>, ApiError> {
        Ok(color_for(self.accounts().await?, full_name).map(str::to_string))
    }

    /// Full name of the account with `id`.
    ///
    /// # Errors
    ///
    /// Errors of `GET /api/accounts`.
    pub async fn full_name(&mut self, id: &str) -> Result<Option<String>, ApiError> {
        Ok(self.accounts().await?.iter().find(|a| a.id == id).map(Account::full_name))
    }

    /// Id of the account with the given names.
    ///
    /// # Errors
    ///
    /// Errors of `GET /api/accounts`.
    pub async fn id_by_name(
        &mut self,
        first_name: &str,
        last_name: &str,
    ) -> Result<Option<String>, ApiError> {
        Ok(self
            .accounts()
            .await?
            .iter()
            .find(|a| a.first_name == first_name && a.last_name == last_name)
            .map(|a| a.id.clone()))
    }

    /// Dropdown rows, checked according to `selection`.
    ///
    /// # Errors
    ///
    /// Errors of `GET /api/accounts`.
    pub async fn options(
        &mut self,
        selection: &AssigneeSelection,
    ) -> Result<Vec<AssigneeOption>, ApiError> {
        Ok(self
            .accounts()
            .await?
            .iter()
            .map(|account| {
                let full_name = account.full_name();
                AssigneeOption {
                    account_id: account.id.clone(),
                    checked: selection.contains(&full_name),
                    initials: account.badge_initials(),
                    color: account.profile_color.clone(),
                    full_name,
                }
            })
            .collect())
    }

    /// Toggles the account with `account_id` in `selection` by its full name.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown account id.
    pub async fn toggle(
        &mut self,
        selection: &mut AssigneeSelection,
        account_id: &str,
    ) -> Result<bool, ApiError> {
        let name = self
            .full_name(account_id)
            .await?
            .ok_or_else(|| ApiError::NotFound { kind: "account", id: account_id.to_string() })?;
        Ok(selection.toggle(&name))
    }
}

/// Profile color of the account whose names match a stored assignee name.
///
/// The name is split at its first space into first and last name.
#[must_use]
pub fn color_for<'a>(accounts: &'a [Account], full_name: &str) -> Option<&'a str> {
    let full_name = full_name.trim();
    let (first, last) = full_name.split_once(' ').unwrap_or((full_name, ""));
    accounts
        .iter()
        .find(|a| a.first_name == first && a.last_name == last.trim())
        .map(|a| a.profile_color.as_str())
        .filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{reply, ScriptedBackend};
    use serde_json::json;

    fn accounts_reply() -> crate::cassette::format::Interaction {
        reply(
            "GET /api/accounts",
            200,
            json!({
                "u1": {"firstName": "Ann", "lastName": "Lee", "profileColor": "#ff7a00"},
                "u2": {"firstName": "Bob", "lastName": "Stone", "profileColor": "#9327ff", "initials": "BS"}
            }),
        )
    }

    #[test]
    fn toggling_never_duplicates() {
        let mut selection = AssigneeSelection::new();
        assert!(selection.toggle("Ann Lee"));
        assert!(!selection.toggle("Ann Lee"));
        assert!(selection.toggle("Ann Lee"));
        assert_eq!(selection.names(), ["Ann Lee"]);
    }

    #[test]
    fn seeding_drops_duplicates_and_keeps_order() {
        let selection = AssigneeSelection::seeded(["Bob Stone", "Ann Lee", "Bob Stone"]);
        assert_eq!(selection.names(), ["Bob Stone", "Ann Lee"]);
        assert_eq!(selection.len(), 2);
    }

    #[tokio::test]
    async fn directory_fetches_once_until_invalidated() {
        let backend = ScriptedBackend::new(vec![accounts_reply(), accounts_reply()]);
        let mut directory = AccountDirectory::new(Api::new(&backend));

        assert_eq!(directory.color_of("Ann Lee").await.unwrap().as_deref(), Some("#ff7a00"));
        assert_eq!(directory.full_name("u2").await.unwrap().as_deref(), Some("Bob Stone"));
        assert_eq!(directory.id_by_name("Bob", "Stone").await.unwrap().as_deref(), Some("u2"));
        assert_eq!(backend.routes().len(), 1);

        directory.invalidate();
        assert_eq!(directory.color_of("Nobody Here").await.unwrap(), None);
        assert_eq!(backend.routes().len(), 2);
    }

    #[tokio::test]
    async fn options_reflect_selection_and_toggle_by_id() {
        let backend = ScriptedBackend::new(vec![accounts_reply()]);
        let mut directory = AccountDirectory::new(Api::new(&backend));
        let mut selection = AssigneeSelection::seeded(["Bob Stone"]);

        let options = directory.options(&selection).await.unwrap();
        assert_eq!(options.len(), 2);
        assert!(!options[0].checked);
        assert_eq!(options[0].initials, "AL");
        assert!(options[1].checked);

        assert!(directory.toggle(&mut selection, "u1").await.unwrap());
        assert_eq!(selection.names(), ["Bob Stone", "Ann Lee"]);
        let err = directory.toggle(&mut selection, "u9").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { kind: "account", .. }));
    }
}
