//! Command implementations.
//!
//! Each resource family has a `run_*` entry point that calls the matching
//! library functions and renders the result to the supplied writer.

pub mod groups;
pub mod licenses;
pub mod users;

pub use groups::run_groups;
pub use licenses::run_licenses;
pub use users::run_users;

use std::io::Write;

use crate::cli::{Command, OutputFormat};
use crate::client::GraphClient;
use crate::error::Result;
use crate::licenses::FailureHints;

/// Everything a command needs besides its own arguments.
pub struct Context<'a> {
    pub client: &'a GraphClient,
    pub hints: &'a FailureHints,
    pub format: OutputFormat,
}

/// Dispatches a parsed command.
pub async fn execute(ctx: &Context<'_>, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Users(cmd) => run_users(ctx, cmd, out).await,
        Command::Licenses(cmd) => run_licenses(ctx, cmd, out).await,
        Command::Groups(cmd) => run_groups(ctx, cmd, out).await,
    }
}
