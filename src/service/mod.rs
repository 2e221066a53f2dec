//! Service layer
//!
//! Contains business logic separated from HTTP handlers.
//! Services orchestrate the database and the account directory.

mod account;
mod directory;
mod friendship;
pub mod validation;

pub use account::{AccountService, NewAccount};
pub use directory::AccountDirectory;
pub use friendship::FriendshipService;
