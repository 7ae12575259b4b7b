pub mod encryption;
pub mod key_manager;

pub use encryption::{EncryptionError, EncryptionService};
pub use key_manager::{KeyManager, KeyManagerError};
