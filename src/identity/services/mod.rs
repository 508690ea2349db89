//! Application services for accounts, sessions, and the user directory.

mod account;
mod directory;
mod session;

pub use account::{
    AccountError, AccountResult, AccountService, AccountSettings, RegisterUserRequest,
};
pub use directory::{DirectoryError, DirectoryResult, UserDirectoryService};
pub use session::{LoginOutcome, SessionError, SessionResult, SessionService, SessionSettings};
