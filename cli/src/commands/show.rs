//! Show command

use super::Context;
use crate::output;
use campus_admin_core::{AdminResult, EntityKind};

pub async fn handle(ctx: &Context<'_>, kind: EntityKind, id: &str) -> AdminResult<()> {
    let mut page = ctx.page(kind);
    let view = page.select(id).await?;
    if !ctx.format.print(view) {
        output::print_detail(view);
    }
    Ok(())
}
