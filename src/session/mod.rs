//! Login gating: sign-in, sign-up, sign-out and the session check that
//! guards every board command.

pub mod token;

pub use token::TokenStore;

use crate::api::{Api, ApiError};
use crate::config::{Config, ConfigKey};
use crate::model::{Profile, Registration};

/// Sign-up form as entered.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    /// Account data sent to the backend.
    pub registration: Registration,
    /// Repeated password.
    pub confirm_password: String,
    /// Privacy policy checkbox.
    pub accept_privacy_policy: bool,
}

/// Logs in and stores the returned bearer token.
///
/// # Errors
///
/// [`ApiError::Validation`] for blank input, [`ApiError::Unauthorized`] for
/// rejected credentials, [`ApiError::Storage`] if the token cannot be saved.
pub async fn login(
    api: Api<'_>,
    tokens: &TokenStore<'_>,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ApiError::Validation("e-mail and password are required".into()));
    }
    let token = api.login(email.trim(), password).await?;
    tokens.save(&token).map_err(ApiError::Storage)?;
    tracing::info!(email = email.trim(), "logged in");
    Ok(())
}

/// Logs in with the guest account from `config.json`.
///
/// # Errors
///
/// As [`login`]; [`ApiError::Validation`] when no guest account is configured.
pub async fn guest_login(
    api: Api<'_>,
    tokens: &TokenStore<'_>,
    config: &Config,
) -> Result<(), ApiError> {
    let email = config.get(ConfigKey::GuestEmail);
    if email.is_empty() {
        return Err(ApiError::Validation(format!(
            "no guest account configured ({} missing)",
            ConfigKey::GuestEmail
        )));
    }
    login(api, tokens, email, config.get(ConfigKey::GuestPassword)).await
}

/// Logs out; the stored token is dropped once the backend confirms.
///
/// # Errors
///
/// Returns the backend's refusal or a storage error; the token is kept then.
pub async fn logout(api: Api<'_>, tokens: &TokenStore<'_>) -> Result<(), ApiError> {
    api.logout().await?;
    tokens.clear().map_err(ApiError::Storage)?;
    tracing::info!("logged out");
    Ok(())
}

/// Registers a new account, then logs in with it.
///
/// # Errors
///
/// [`ApiError::Validation`] for mismatched passwords or an unchecked privacy
/// policy (no request is sent), otherwise the errors of sign-up and [`login`].
pub async fn sign_up(
    api: Api<'_>,
    tokens: &TokenStore<'_>,
    form: &SignUpForm,
) -> Result<(), ApiError> {
    let registration = &form.registration;
    if registration.password != form.confirm_password {
        return Err(ApiError::Validation("Passwords do not match".into()));
    }
    if !form.accept_privacy_policy {
        return Err(ApiError::Validation("Please accept our privacy policy.".into()));
    }
    api.sign_up(registration).await?;
    tracing::info!(email = %registration.email, "registration successful");
    login(api, tokens, &registration.email, &registration.password).await
}

/// Checks the backend session. Any failure means "not logged in".
///
/// # Errors
///
/// Always [`ApiError::Unauthorized`] with the uniform not-logged-in message.
pub async fn require_login(api: Api<'_>) -> Result<Profile, ApiError> {
    match api.status().await {
        Ok(profile) if profile.logged_in => Ok(profile),
        Ok(_) => {
            tracing::warn!("session check: not logged in");
            Err(ApiError::not_logged_in())
        }
        Err(err) => {
            tracing::warn!(error = %err, "session check failed");
            Err(ApiError::not_logged_in())
        }
    }
}
