mod crypto;
mod db;
mod extractor;
mod session;

pub use db::{authenticate_user, find_user, register_user, update_user_name, RegisterOutcome};
pub use extractor::{ApiUser, CurrentUser, MaybeUser};
pub use session::{session_key, Session, SESSION_COOKIE};
