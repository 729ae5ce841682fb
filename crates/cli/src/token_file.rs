//! File-backed token slot.
//!
//! The CLI keeps one bearer token in a single file so a `login` in one
//! invocation is picked up by `whoami` in the next. The slot never reports
//! errors to the session manager: a file that cannot be read is treated as
//! empty and a failed write is logged.

use std::path::{Path, PathBuf};

use afritheatre_site::session::TokenStore;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable overriding the token file location.
pub const TOKEN_FILE_ENV: &str = "AFRITHEATRE_TOKEN_FILE";

/// Token slot stored at a fixed path.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Slot at `path`. The file is created on the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot at `AFRITHEATRE_TOKEN_FILE`, or `<config dir>/afritheatre/token`.
    ///
    /// Returns `None` when neither is available.
    pub fn from_env() -> Option<Self> {
        std::env::var(TOKEN_FILE_ENV)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(Self::new)
            .or_else(|| {
                dirs::config_dir().map(|dir| Self::new(dir.join("afritheatre").join("token")))
            })
    }

    /// Location of the token file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, token: &str) -> std::io::Result<()> {
        use tokio::io::AsyncWriteExt;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner read/write only, from the moment the file exists
        #[cfg(unix)]
        options.mode(0o600);
        let mut file = options.open(&self.path).await?;

        // `mode` only applies on creation; tighten a file left by an older run
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
        }

        file.write_all(token.as_bytes()).await?;
        file.flush().await
    }
}

impl TokenStore for FileTokenStore {
    async fn load(&self) -> Option<SecretString> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Some(SecretString::from(contents.trim().to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not read token file"
                );
                None
            }
        }
    }

    async fn save(&self, token: &SecretString) {
        if let Err(e) = self.write(token.expose_secret()).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Could not write token file");
        }
    }

    async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not remove token file"
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(dir: &tempfile::TempDir) -> FileTokenStore {
        FileTokenStore::new(dir.path().join("nested").join("token"))
    }

    #[tokio::test]
    async fn test_missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(&dir).load().await.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let slot = store(&dir);

        slot.save(&SecretString::from("tok-123")).await;

        let loaded = slot.load().await.unwrap();
        assert_eq!(loaded.expose_secret(), "tok-123");
    }

    #[tokio::test]
    async fn test_save_replaces_previous_token() {
        let dir = tempfile::tempdir().unwrap();
        let slot = store(&dir);

        slot.save(&SecretString::from("first")).await;
        slot.save(&SecretString::from("second")).await;

        assert_eq!(slot.load().await.unwrap().expose_secret(), "second");
    }

    #[tokio::test]
    async fn test_clear_removes_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let slot = store(&dir);
        slot.save(&SecretString::from("tok")).await;

        slot.clear().await;
        slot.clear().await;

        assert!(!slot.path().exists());
        assert!(slot.load().await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let slot = store(&dir);
        slot.save(&SecretString::from("tok")).await;

        let mode = std::fs::metadata(slot.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_tightens_existing_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let slot = store(&dir);
        std::fs::create_dir_all(slot.path().parent().unwrap()).unwrap();
        std::fs::write(slot.path(), "stale-token-that-is-longer").unwrap();
        std::fs::set_permissions(slot.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        slot.save(&SecretString::from("fresh")).await;

        let mode = std::fs::metadata(slot.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(slot.load().await.unwrap().expose_secret(), "fresh");
    }
}
