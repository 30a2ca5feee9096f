pub mod login;
pub mod register;

pub use login::{attempt_login, handle_login};
pub use register::{attempt_registration, handle_register, handle_trainers_page};
