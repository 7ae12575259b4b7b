use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SALT_FILE: &str = ".encryption_salt";
const SECRET_FILE: &str = ".device_secret";

/// Key material for the credential cipher, generated once per installation
/// and kept in the app data directory.
pub struct KeyManager {
    salt_path: PathBuf,
    secret_path: PathBuf,
}

impl KeyManager {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            salt_path: app_data_dir.join(SALT_FILE),
            secret_path: app_data_dir.join(SECRET_FILE),
        }
    }

    /// Load or generate the 32-byte Argon2 salt
    pub fn initialize(&self) -> Result<[u8; 32], KeyManagerError> {
        if self.salt_path.exists() {
            let bytes = fs::read(&self.salt_path)
                .map_err(|e| KeyManagerError::IoError(format!("Failed to read salt file: {}", e)))?;

            if bytes.len() != 32 {
                return Err(KeyManagerError::InvalidSalt(format!(
                    "Expected 32 bytes, got {}",
                    bytes.len()
                )));
            }

            let mut salt = [0u8; 32];
            salt.copy_from_slice(&bytes);
            Ok(salt)
        } else {
            let salt = Self::random_bytes();
            Self::write(&self.salt_path, &salt)?;
            Ok(salt)
        }
    }

    /// Load or generate the device secret the cipher key is derived from
    pub fn device_secret(&self) -> Result<String, KeyManagerError> {
        if self.secret_path.exists() {
            let secret = fs::read_to_string(&self.secret_path).map_err(|e| {
                KeyManagerError::IoError(format!("Failed to read device secret: {}", e))
            })?;
            let secret = secret.trim().to_string();
            if secret.is_empty() {
                return Err(KeyManagerError::InvalidSalt(
                    "Device secret file is empty".to_string(),
                ));
            }
            Ok(secret)
        } else {
            let secret = general_purpose::STANDARD.encode(Self::random_bytes());
            Self::write(&self.secret_path, secret.as_bytes())?;
            Ok(secret)
        }
    }

    pub fn salt_path(&self) -> &PathBuf {
        &self.salt_path
    }

    fn random_bytes() -> [u8; 32] {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    }

    fn write(path: &Path, bytes: &[u8]) -> Result<(), KeyManagerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                KeyManagerError::IoError(format!("Failed to create directory: {}", e))
            })?;
        }
        fs::write(path, bytes).map_err(|e| {
            KeyManagerError::IoError(format!("Failed to write {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug, Error)]
pub enum KeyManagerError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Invalid salt: {0}")]
    InvalidSalt(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_salt_is_generated_once_and_reused() {
        let dir = TempDir::new().unwrap();
        let manager = KeyManager::new(dir.path().to_path_buf());

        assert!(!manager.salt_path().exists());
        let first = manager.initialize().unwrap();
        let second = manager.initialize().unwrap();

        assert_eq!(first, second);
        assert!(first.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_device_secret_is_stable() {
        let dir = TempDir::new().unwrap();
        let manager = KeyManager::new(dir.path().to_path_buf());

        let first = manager.device_secret().unwrap();
        let again = KeyManager::new(dir.path().to_path_buf())
            .device_secret()
            .unwrap();

        assert_eq!(first, again);
    }

    #[test]
    fn test_truncated_salt_is_rejected() {
        let dir = TempDir::new().unwrap();
        let manager = KeyManager::new(dir.path().to_path_buf());
        fs::write(manager.salt_path(), [0u8; 16]).unwrap();

        assert!(matches!(
            manager.initialize(),
            Err(KeyManagerError::InvalidSalt(_))
        ));
    }
}
