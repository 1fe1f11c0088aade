//! Update command

use super::Context;
use crate::output;
use campus_admin_core::{AdminResult, EntityKind};

pub async fn handle(ctx: &Context<'_>, kind: EntityKind, id: &str, values: &[(String, String)]) -> AdminResult<()> {
    let mut page = ctx.page(kind);
    page.select(id).await?;
    page.begin_edit().await?;
    super::submit_values(&mut page, values).await?;
    tracing::info!(entity = %kind, id, "updated");

    if let Some(view) = page.detail() {
        if !ctx.format.print(view) {
            output::print_detail(view);
        }
    }
    Ok(())
}
