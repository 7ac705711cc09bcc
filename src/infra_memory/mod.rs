//! In-process storage backend with the same transactional and uniqueness
//! behaviour as the MySQL adapter.

mod equivalence_repo_memory;
mod store;
mod user_repo_memory;

pub use equivalence_repo_memory::*;
pub use store::*;
pub use user_repo_memory::*;
