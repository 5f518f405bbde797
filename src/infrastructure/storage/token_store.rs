#[cfg(test)]
#[path = "token_store_test.rs"]
mod tests;

use std::fs;
use std::io::ErrorKind;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

/// Durable home for the bearer token. Survives restarts until the session
/// manager clears it.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SessionFile {
    token: Option<String>,
}

/// JSON file holding the token under the `token` key.
pub struct FileTokenStore {
    pub file_path: PathBuf,
}

impl Default for FileTokenStore {
    fn default() -> FileTokenStore {
        return FileTokenStore::new(PathBuf::from(Config::get(ConfigKey::SessionFile)));
    }
}

impl FileTokenStore {
    pub fn new(file_path: PathBuf) -> FileTokenStore {
        return FileTokenStore { file_path };
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let contents = match fs::read_to_string(&self.file_path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let data: SessionFile = serde_json::from_str(&contents)?;
        return Ok(data.token.filter(|token| return !token.is_empty()));
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = SessionFile {
            token: Some(token.to_string()),
        };

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.file_path)?;

        // The mode above only applies to new files.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(serde_json::to_string(&data)?.as_bytes())?;
        return Ok(());
    }

    fn clear(&self) -> Result<()> {
        return match fs::remove_file(&self.file_path) {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        };
    }
}

/// Process-local store, for `--ephemeral` runs and tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[cfg(test)]
    pub fn with_token(token: &str) -> MemoryTokenStore {
        return MemoryTokenStore {
            token: Mutex::new(Some(token.to_string())),
        };
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let token = self
            .token
            .lock()
            .map_err(|_| return anyhow::anyhow!("token store lock poisoned"))?;
        return Ok(token.clone());
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut current = self
            .token
            .lock()
            .map_err(|_| return anyhow::anyhow!("token store lock poisoned"))?;
        *current = Some(token.to_string());
        return Ok(());
    }

    fn clear(&self) -> Result<()> {
        let mut current = self
            .token
            .lock()
            .map_err(|_| return anyhow::anyhow!("token store lock poisoned"))?;
        *current = None;
        return Ok(());
    }
}
