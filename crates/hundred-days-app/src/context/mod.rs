pub mod bootstrap;
pub mod error;
pub mod state;

pub use error::UserFacingError;
pub use state::AppContext;
