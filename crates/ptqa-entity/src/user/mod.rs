//! User domain entities.

pub mod model;
pub mod principal;
pub mod role;
pub mod status;

pub use model::{CreateUser, UpdateUser, User};
pub use principal::Principal;
pub use role::UserRole;
pub use status::UserStatus;
