//! CLI subcommand implementations.

pub mod detect;
pub mod fetch;
pub mod insights;
pub mod search;
pub mod sessions;
pub mod suggest;
mod util;
