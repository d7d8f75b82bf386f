//! User management commands.

use std::io::Write;

use serde_json::Map;
use tabled::Tabled;

use crate::cli::{OutputFormat, UsersCommand};
use crate::error::Result;
use crate::output::{confirm, detail, info, list, or_dash, success, warning};
use crate::users::{
    create_user, delete_user, get_user, list_users, parse_property_value, update_user,
    CreateUserRequest, User,
};

use super::Context;

/// User row for table display.
#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "User Principal Name")]
    user_principal_name: String,
    #[tabled(rename = "Mail")]
    mail: String,
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        UserRow {
            display_name: or_dash(&user.display_name),
            user_principal_name: or_dash(&user.user_principal_name),
            mail: or_dash(&user.mail),
        }
    }
}

/// Runs a user command.
pub async fn run_users(ctx: &Context<'_>, cmd: UsersCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
        UsersCommand::List { filter } => {
            let users = list_users(ctx.client, filter.as_deref()).await?;
            let rows = users.iter().map(UserRow::from).collect();
            list(out, ctx.format, rows, &users, "No users found.")
        }
        UsersCommand::Get { upn } => {
            let user = get_user(ctx.client, &upn).await?;
            print_user(ctx, &user, out)
        }
        UsersCommand::Create {
            upn,
            display_name,
            mail_nickname,
            password,
        } => {
            let request = CreateUserRequest::new(&upn, &display_name, &mail_nickname, &password);
            let user = create_user(ctx.client, &request).await?;
            // JSON output is the created entity alone.
            if ctx.format == OutputFormat::Table {
                success(out, "Successfully created user!")?;
            }
            print_user(ctx, &user, out)
        }
        UsersCommand::Update {
            upn,
            property,
            value,
        } => {
            let mut properties = Map::new();
            properties.insert(property.clone(), parse_property_value(&value));
            update_user(ctx.client, &upn, &properties).await?;
            success(out, &format!("Successfully updated {property} for {upn}"))
        }
        UsersCommand::Delete { upn, yes } => {
            if !yes {
                warning(out, &format!("This will delete user {upn}"))?;
                if !confirm(out, "Continue?")? {
                    return info(out, "Cancelled.");
                }
            }
            delete_user(ctx.client, &upn).await?;
            success(out, &format!("Successfully deleted user {upn}"))
        }
    }
}

fn print_user(ctx: &Context<'_>, user: &User, out: &mut impl Write) -> Result<()> {
    let enabled = user
        .account_enabled
        .map(|e| e.to_string())
        .unwrap_or_else(|| "-".to_string());
    let fields = [
        ("ID", user.id.clone()),
        ("Display Name", or_dash(&user.display_name)),
        ("User Principal Name", or_dash(&user.user_principal_name)),
        ("Mail", or_dash(&user.mail)),
        ("Mail Nickname", or_dash(&user.mail_nickname)),
        ("Account Enabled", enabled),
    ];
    detail(out, ctx.format, &fields, user)
}
