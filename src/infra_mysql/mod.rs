mod equivalence_repo_mysql;
mod schema;
mod user_repo_mysql;

pub use equivalence_repo_mysql::*;
pub use schema::*;
pub use user_repo_mysql::*;

mod repo_tx_mysql;

pub use repo_tx_mysql::*;

mod util;
