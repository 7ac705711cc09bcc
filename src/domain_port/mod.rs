mod equivalence_repo;
mod repo_tx;
mod user_repo;

pub use equivalence_repo::*;
pub use repo_tx::*;
pub use user_repo::*;
