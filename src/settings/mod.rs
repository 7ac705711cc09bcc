//! Settings come from a TOML file overlaid by `USERDIR__*` environment
//! variables, e.g. `USERDIR__STORAGE__URL`.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
