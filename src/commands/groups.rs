//! Group management commands.

use std::io::Write;

use tabled::Tabled;

use crate::cli::GroupsCommand;
use crate::error::Result;
use crate::groups::{add_member, list_groups, list_user_groups, remove_member, Group};
use crate::output::{list, or_dash, success};
use crate::users::get_user;

use super::Context;

#[derive(Tabled)]
struct GroupRow {
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Group> for GroupRow {
    fn from(group: &Group) -> Self {
        GroupRow {
            display_name: or_dash(&group.display_name),
            id: group.id.clone(),
            description: or_dash(&group.description),
        }
    }
}

#[derive(Tabled)]
struct MembershipRow {
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Runs a group command.
pub async fn run_groups(ctx: &Context<'_>, cmd: GroupsCommand, out: &mut impl Write) -> Result<()> {
    match cmd {
        GroupsCommand::List => {
            let groups = list_groups(ctx.client).await?;
            let rows = groups.iter().map(GroupRow::from).collect();
            list(out, ctx.format, rows, &groups, "No groups found.")
        }
        GroupsCommand::Get { upn } => {
            let groups = list_user_groups(ctx.client, &upn).await?;
            let rows = groups
                .iter()
                .map(|g| MembershipRow {
                    display_name: or_dash(&g.display_name),
                    id: g.id.clone(),
                })
                .collect();
            list(out, ctx.format, rows, &groups, "User is not a member of any groups.")
        }
        GroupsCommand::AddUser { group_id, upn } => {
            // Membership references take the object id, not the UPN.
            let user = get_user(ctx.client, &upn).await?;
            add_member(ctx.client, &group_id, &user.id).await?;
            success(out, &format!("Successfully added user {upn} to group {group_id}"))
        }
        GroupsCommand::RemoveUser { group_id, upn } => {
            let user = get_user(ctx.client, &upn).await?;
            remove_member(ctx.client, &group_id, &user.id).await?;
            success(out, &format!("Successfully removed user {upn} from group {group_id}"))
        }
    }
}
