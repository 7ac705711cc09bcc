mod credential;
mod error;
mod identity;
mod user;

pub use credential::*;
pub use error::*;
pub use identity::*;
pub use user::*;
