//! Session middleware configuration.
//!
//! The session cookie is the browser's durable storage scope: it holds the
//! bearer token slot read by the session manager. Sessions live in memory and
//! the cookie is signed with a key derived from `SITE_SESSION_SECRET`.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "afritheatre_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Derive the 64-byte cookie signing key from the configured secret.
fn signing_key(secret: &SecretString) -> Key {
    let digest = Sha512::digest(secret.expose_secret().as_bytes());
    Key::from(digest.as_slice())
}

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer(
    config: &SiteConfig,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(signing_key(&config.session_secret))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use crate::config::ApiConfig;

    use super::*;

    fn config(base_url: &str) -> SiteConfig {
        SiteConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: base_url.to_string(),
            session_secret: SecretString::from("k3Y!s9#Lq2@Zx7$Vm4&Wp8*Rt1^Hn6%B"),
            rate_limit: false,
            api: ApiConfig::new("http://localhost:5000", Duration::from_secs(10)).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_session_layer_signs_cookies() {
        let _layer: SessionManagerLayer<MemoryStore, SignedCookie> =
            create_session_layer(&config("https://afritheatre.example"));
    }

    #[test]
    fn test_signing_key_is_deterministic() {
        let secret = SecretString::from("k3Y!s9#Lq2@Zx7$Vm4&Wp8*Rt1^Hn6%B");
        assert_eq!(signing_key(&secret).master(), signing_key(&secret).master());
    }

    #[test]
    fn test_signing_key_differs_per_secret() {
        let a = signing_key(&SecretString::from("a".repeat(40)));
        let b = signing_key(&SecretString::from("b".repeat(40)));
        assert_ne!(a.master(), b.master());
    }
}
