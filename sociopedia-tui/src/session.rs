use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sociopedia_types::User;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What we persist between runs: the `token` cookie and who it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Manages the session file in the user's config directory.
///
/// The file is written atomically with 0600 permissions so only the owner
/// can read the cookie.
#[derive(Debug, Clone)]
pub struct SessionStore {
    file_path: PathBuf,
}

impl SessionStore {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Loads the stored session.
    ///
    /// Returns `Ok(None)` when there is no session file or it doesn't hold
    /// a usable session. Only I/O failures are errors.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.file_path)
            .context("Failed to read session file")?;

        if content.trim().is_empty() {
            log::warn!("Session file is empty, treating as no session");
            return Ok(None);
        }

        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Session file is corrupted ({}), treating as no session", e);
                return Ok(None);
            }
        };

        let token = session.token.trim();
        if token.is_empty() || token.chars().any(|c| c.is_control()) {
            log::warn!("Session token is invalid, treating as no session");
            return Ok(None);
        }

        log::debug!("Loaded session for {} from {}", session.user.username, self.file_path.display());
        Ok(Some(session))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create session directory")?;
        }

        let json = serde_json::to_string_pretty(session)
            .context("Failed to serialize session")?;

        let temp_path = self.file_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)
            .context("Failed to create temporary session file")?;
        file.write_all(json.as_bytes())
            .context("Failed to write session")?;
        file.sync_all()
            .context("Failed to sync session file to disk")?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))
                .context("Failed to set session file permissions")?;
        }

        fs::rename(&temp_path, &self.file_path)
            .context("Failed to rename temporary session file")?;

        log::info!("Saved session for {} to {}", session.user.username, self.file_path.display());
        Ok(())
    }

    /// Deletes the session file. Succeeds when there is nothing to delete.
    pub fn delete(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)
                .context("Failed to delete session file")?;
            log::info!("Deleted session file at {}", self.file_path.display());
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn session() -> Session {
        Session {
            token: "eyJhbGciOiJIUzI1NiJ9.payload.sig".to_string(),
            user: User {
                id: "u1".to_string(),
                username: "alice".to_string(),
                email: Some("alice@example.com".to_string()),
                profile_picture: None,
                bio: None,
                followers: vec![],
                following: vec![],
            },
        }
    }

    fn store(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));
        assert!(!dir.path().join("session.tmp").exists());
    }

    #[test]
    fn test_load_nonexistent() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store(&dir).load().unwrap(), None);
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.save(&session()).unwrap();
        store.delete().unwrap();
        assert!(!store.path().exists());

        // Nothing left to delete
        store.delete().unwrap();
    }

    #[test]
    fn test_corrupted_files_return_none() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        fs::write(store.path(), "").unwrap();
        assert_eq!(store.load().unwrap(), None);

        fs::write(store.path(), "not json").unwrap();
        assert_eq!(store.load().unwrap(), None);

        let mut bad = session();
        bad.token = "tok\u{0}en".to_string();
        fs::write(store.path(), serde_json::to_string(&bad).unwrap()).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&session()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
