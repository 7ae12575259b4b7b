mod profile;
mod repository;
mod username;

pub use profile::{UserProfile, UserStats};
pub use repository::{UserRepository, UsernameRepository};
pub use username::{
    ClaimDecision, Username, UsernamePolicy, UsernameReservation,
    USERNAME_CHANGE_COOLDOWN_HOURS, USERNAME_MAX_LEN, USERNAME_MIN_LEN,
};
