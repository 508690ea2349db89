//! Domain model for users and roles.

mod email;
mod error;
mod ids;
mod role;
mod user;
mod verification;

pub use email::EmailAddress;
pub use error::{IdentityDomainError, ParseRoleError};
pub use ids::{EmployeeId, UserId};
pub use role::Role;
pub use user::{NewUser, PasswordHash, PersistedUserData, User, UserPatch, UserProfile, Username};
pub use verification::{PendingVerification, VerificationCode};
