//! License management commands.

use std::io::Write;

use tabled::Tabled;

use crate::cli::LicensesCommand;
use crate::error::Result;
use crate::licenses::{
    assign_group_licenses, assign_user_licenses, get_group_licenses, get_user_licenses,
    list_subscribed_skus, resolve_part_numbers, LicenseDetail, SubscribedSku,
};
use crate::output::{list, or_dash, success};

use super::Context;

#[derive(Tabled)]
struct SkuRow {
    #[tabled(rename = "SKU Part Number")]
    part_number: String,
    #[tabled(rename = "SKU ID")]
    sku_id: String,
    #[tabled(rename = "Consumed")]
    consumed: i64,
    #[tabled(rename = "Enabled")]
    enabled: i64,
    #[tabled(rename = "Available")]
    available: i64,
}

impl From<&SubscribedSku> for SkuRow {
    fn from(sku: &SubscribedSku) -> Self {
        SkuRow {
            part_number: or_dash(&sku.sku_part_number),
            sku_id: sku.sku_id.clone(),
            consumed: sku.consumed_units,
            enabled: sku.prepaid_units.enabled,
            available: sku.available_units(),
        }
    }
}

#[derive(Tabled)]
struct LicenseRow {
    #[tabled(rename = "SKU Part Number")]
    part_number: String,
    #[tabled(rename = "SKU ID")]
    sku_id: String,
}

impl From<&LicenseDetail> for LicenseRow {
    fn from(detail: &LicenseDetail) -> Self {
        LicenseRow {
            part_number: or_dash(&detail.sku_part_number),
            sku_id: detail.sku_id.clone(),
        }
    }
}

/// Runs a license command.
pub async fn run_licenses(
    ctx: &Context<'_>,
    cmd: LicensesCommand,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        LicensesCommand::ListSkus => {
            let skus = list_subscribed_skus(ctx.client).await?;
            let rows = skus.iter().map(SkuRow::from).collect();
            list(out, ctx.format, rows, &skus, "No subscribed SKUs found.")
        }
        LicensesCommand::Get { upn } => {
            let details = get_user_licenses(ctx.client, &upn).await?;
            print_licenses(ctx, &details, "No licenses assigned to this user.", out)
        }
        LicensesCommand::AddUser { upn, sku_ids } => {
            assign_user_licenses(ctx.client, &upn, &sku_ids, &[], ctx.hints).await?;
            success(
                out,
                &format!("Successfully added {} license(s) to {upn}", sku_ids.len()),
            )
        }
        LicensesCommand::RemoveUser { upn, sku_ids } => {
            assign_user_licenses(ctx.client, &upn, &[], &sku_ids, ctx.hints).await?;
            success(
                out,
                &format!("Successfully removed {} license(s) from {upn}", sku_ids.len()),
            )
        }
        LicensesCommand::GetGroup { group_id } => {
            let mut details = get_group_licenses(ctx.client, &group_id).await?;
            if details.iter().any(|d| d.sku_part_number.is_none()) {
                let skus = list_subscribed_skus(ctx.client).await?;
                resolve_part_numbers(&mut details, &skus);
            }
            print_licenses(ctx, &details, "No licenses assigned to this group.", out)
        }
        LicensesCommand::AddGroup { group_id, sku_ids } => {
            assign_group_licenses(ctx.client, &group_id, &sku_ids, &[], ctx.hints).await?;
            success(
                out,
                &format!(
                    "Successfully added {} license(s) to group {group_id}",
                    sku_ids.len()
                ),
            )
        }
        LicensesCommand::RemoveGroup { group_id, sku_ids } => {
            assign_group_licenses(ctx.client, &group_id, &[], &sku_ids, ctx.hints).await?;
            success(
                out,
                &format!(
                    "Successfully removed {} license(s) from group {group_id}",
                    sku_ids.len()
                ),
            )
        }
    }
}

fn print_licenses(
    ctx: &Context<'_>,
    details: &[LicenseDetail],
    empty: &str,
    out: &mut impl Write,
) -> Result<()> {
    let rows = details.iter().map(LicenseRow::from).collect();
    list(out, ctx.format, rows, details, empty)
}
