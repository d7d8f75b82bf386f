//! Command-line surface for `gua`.
//!
//! Exit codes:
//! - 0: success (including a cancelled delete)
//! - 1: runtime error (config, authentication, Graph request)
//! - 2: argument validation error (clap handles this automatically)

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// GraphUserAdmin - Microsoft 365 user, license, and group management using
/// the Microsoft Graph API with client-credentials authentication.
#[derive(Debug, Parser)]
#[command(name = "gua", version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, global = true, default_value = "config.json")]
    pub config: PathBuf,

    /// Enable verbose output for debugging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for listings and details.
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage Microsoft 365 users.
    #[command(subcommand)]
    Users(UsersCommand),

    /// Manage Microsoft 365 licenses.
    #[command(subcommand)]
    Licenses(LicensesCommand),

    /// Manage Microsoft 365 groups.
    #[command(subcommand)]
    Groups(GroupsCommand),
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List all users in the tenant.
    List {
        /// OData $filter expression, e.g. "accountEnabled eq false".
        #[arg(long)]
        filter: Option<String>,
    },

    /// Get details for a specific user.
    Get { upn: String },

    /// Create a new user. The user must change the password at first sign-in.
    Create {
        upn: String,
        display_name: String,
        mail_nickname: String,
        password: String,
    },

    /// Update a user property.
    ///
    /// Common properties: displayName, jobTitle, department, officeLocation,
    /// mobilePhone, businessPhones (JSON array), usageLocation (two-letter
    /// country code, e.g. "US"). VALUE is parsed as JSON when possible and
    /// sent as a string otherwise.
    Update {
        upn: String,
        property: String,
        /// Allows values starting with hyphens (e.g. negative numbers).
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Delete a user. Deleted users can be restored within 30 days.
    Delete {
        upn: String,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum LicensesCommand {
    /// List all subscribed SKUs in the tenant.
    ListSkus,

    /// Show licenses assigned to a user.
    Get { upn: String },

    /// Add one or more licenses to a user by SKU ID.
    AddUser {
        upn: String,
        #[arg(required = true, num_args = 1..)]
        sku_ids: Vec<String>,
    },

    /// Remove one or more licenses from a user by SKU ID.
    RemoveUser {
        upn: String,
        #[arg(required = true, num_args = 1..)]
        sku_ids: Vec<String>,
    },

    /// Show licenses assigned to a group.
    GetGroup { group_id: String },

    /// Add one or more licenses to a group. Group-based licensing assigns
    /// them to all members.
    AddGroup {
        group_id: String,
        #[arg(required = true, num_args = 1..)]
        sku_ids: Vec<String>,
    },

    /// Remove one or more licenses from a group.
    RemoveGroup {
        group_id: String,
        #[arg(required = true, num_args = 1..)]
        sku_ids: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List all groups in the tenant.
    List,

    /// Show group memberships for a user.
    Get { upn: String },

    /// Add a user to a group.
    AddUser { group_id: String, upn: String },

    /// Remove a user from a group.
    RemoveUser { group_id: String, upn: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("gua").chain(args.iter().copied()))
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_apply_without_global_flags() {
        let cli = parse(&["users", "list"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(!cli.verbose);
        assert_eq!(cli.output, OutputFormat::Table);
        assert!(matches!(cli.command, Command::Users(UsersCommand::List { filter: None })));
    }

    #[test]
    fn global_flags_accepted_after_subcommand() {
        let cli = parse(&["groups", "list", "-c", "/etc/gua.json", "-v", "-o", "json"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/gua.json"));
        assert!(cli.verbose);
        assert_eq!(cli.output, OutputFormat::Json);
    }

    #[test]
    fn add_user_collects_every_sku() {
        let cli = parse(&["licenses", "add-user", "alice@example.com", "SKU_A", "SKU_B"]).unwrap();
        match cli.command {
            Command::Licenses(LicensesCommand::AddUser { upn, sku_ids }) => {
                assert_eq!(upn, "alice@example.com");
                assert_eq!(sku_ids, vec!["SKU_A", "SKU_B"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_user_without_sku_is_rejected() {
        assert!(parse(&["licenses", "add-user", "alice@example.com"]).is_err());
    }

    #[test]
    fn create_requires_four_arguments() {
        assert!(parse(&["users", "create", "a@b.com", "A", "a"]).is_err());
        assert!(parse(&["users", "create", "a@b.com", "A", "a", "pw"]).is_ok());
    }

    #[test]
    fn update_accepts_hyphenated_value() {
        let cli = parse(&["users", "update", "a@b.com", "employeeId", "-42"]).unwrap();
        match cli.command {
            Command::Users(UsersCommand::Update { value, .. }) => assert_eq!(value, "-42"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(parse(&["devices", "list"]).is_err());
    }
}
