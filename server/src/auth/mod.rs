pub mod password;
pub mod session;
pub mod token;

pub use password::{hash_password, verify_password};
pub use session::{Caller, SessionSlot, current_token, resolve_caller};
pub use token::{TokenError, TokenIssuer};
