//! `joinboard login`, `logout`, `signup` and `whoami` commands.

use crate::cli::{LoginArgs, SignupArgs};
use crate::context::ServiceContext;
use crate::model::{Profile, Registration};
use crate::session::{self, SignUpForm};

/// Execute the `login` command.
///
/// # Errors
///
/// Returns an error string if the credentials are rejected or the token
/// cannot be stored.
pub async fn login(ctx: &ServiceContext, args: &LoginArgs) -> Result<(), String> {
    let tokens = ctx.tokens();
    if args.guest {
        session::guest_login(ctx.api(), &tokens, &ctx.config).await.map_err(|e| e.to_string())?;
        println!("Logged in as guest.");
        return Ok(());
    }
    let email = args.email.as_deref().unwrap_or_default();
    let password = args.password.as_deref().unwrap_or_default();
    session::login(ctx.api(), &tokens, email, password).await.map_err(|e| e.to_string())?;
    println!("Logged in as {}.", email.trim());
    Ok(())
}

/// Execute the `logout` command.
///
/// # Errors
///
/// Returns an error string if the backend does not confirm the logout.
pub async fn logout(ctx: &ServiceContext) -> Result<(), String> {
    session::logout(ctx.api(), &ctx.tokens()).await.map_err(|e| e.to_string())?;
    println!("Logged out.");
    Ok(())
}

/// Execute the `signup` command.
///
/// # Errors
///
/// Returns an error string for invalid input, a refused registration or a
/// failed login afterwards.
pub async fn signup(ctx: &ServiceContext, args: &SignupArgs) -> Result<(), String> {
    let form = SignUpForm {
        registration: Registration {
            first_name: args.first_name.trim().to_string(),
            last_name: args.last_name.trim().to_string(),
            email: args.email.trim().to_string(),
            password: args.password.clone(),
            profile_color: args.color.clone(),
        },
        confirm_password: args.confirm_password.clone(),
        accept_privacy_policy: args.accept_privacy_policy,
    };
    session::sign_up(ctx.api(), &ctx.tokens(), &form).await.map_err(|e| e.to_string())?;
    println!("You signed up successfully and are now logged in.");
    Ok(())
}

/// Execute the `whoami` command.
///
/// # Errors
///
/// Returns the "not logged in" message when there is no session.
pub async fn whoami(ctx: &ServiceContext) -> Result<(), String> {
    let profile = super::require_login(ctx).await?;
    println!("{}", describe(&profile));
    Ok(())
}

/// `"<name> <email>"` for display.
fn describe(profile: &Profile) -> String {
    match (profile.full_name().as_str(), profile.email.as_str()) {
        ("", email) => email.to_string(),
        (name, "") => name.to_string(),
        (name, email) => format!("{name} <{email}>"),
    }
}
