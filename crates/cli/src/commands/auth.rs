//! Sign-in, registration and identity commands.
//!
//! # Usage
//!
//! ```bash
//! afritheatre login -e asha@example.com -p secret
//! afritheatre register -n "Asha W." -e asha@example.com -p secret --phone 0700000000
//! afritheatre whoami
//! afritheatre logout
//! ```

use afritheatre_core::UserRecord;
use afritheatre_site::forms::{LoginForm, SignUpForm};
use secrecy::SecretString;

use super::{CliError, CliSession};

fn describe(user: &UserRecord) -> String {
    let role = user.role.as_ref().map_or("user", |role| role.as_str());
    format!("{} <{}> ({role})", user.name, user.email)
}

/// Exchange credentials for a token and persist it.
///
/// # Errors
///
/// Returns an error if either field is empty or the API rejects the
/// credentials. The token file is left untouched on failure.
pub async fn login(session: &mut CliSession, email: &str, password: &str) -> Result<(), CliError> {
    let form = LoginForm {
        email: email.trim().to_string(),
        password: password.to_string(),
    };
    form.validate()?;

    let auth = session.identity().login(&form.email, &form.password).await?;
    session.login(SecretString::from(auth.token), auth.user).await;

    if let Some(user) = session.current_user() {
        tracing::info!("Signed in as {}", describe(user));
    }
    tracing::debug!(path = %session.store().path().display(), "Token saved");
    Ok(())
}

/// Create an account. Does not sign in.
///
/// # Errors
///
/// Returns an error if the password is shorter than six characters, the
/// name is blank, the email is invalid, or the API refuses the account.
pub async fn register(
    session: &CliSession,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
) -> Result<(), CliError> {
    let form = SignUpForm {
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        phone: phone.trim().to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
    };
    form.validate()?;

    session
        .identity()
        .register(&form.name, &form.email, &form.password, &form.phone)
        .await?;

    tracing::info!("Registration successful. Run `afritheatre login` to sign in.");
    Ok(())
}

/// Forget the persisted token.
pub async fn logout(session: &mut CliSession) {
    session.logout().await;
    tracing::info!("Signed out");
}

/// Re-validate the persisted token and show its owner.
///
/// # Errors
///
/// Returns `CliError::NotSignedIn` when there is no token or the API no
/// longer accepts it; the token file is removed in the latter case.
pub async fn whoami(session: &mut CliSession) -> Result<(), CliError> {
    let user = super::require(session, afritheatre_site::session::any_user).await?;
    tracing::info!("{}", describe(&user));
    if let Some(phone) = &user.phone {
        tracing::info!("  Phone: {phone}");
    }
    if let Some(joined) = &user.created_at {
        tracing::info!("  Joined: {joined}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use afritheatre_core::{Email, Role};

    use super::*;

    #[test]
    fn test_describe_defaults_role_to_user() {
        let user = UserRecord::new("Bo".to_string(), Email::parse("b@x.com").unwrap());
        assert_eq!(describe(&user), "Bo <b@x.com> (user)");
    }

    #[test]
    fn test_describe_admin() {
        let user = UserRecord::new("Asha".to_string(), Email::parse("a@x.com").unwrap())
            .with_role(Role::Admin);
        assert_eq!(describe(&user), "Asha <a@x.com> (admin)");
    }
}
