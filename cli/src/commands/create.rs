//! Create command

use super::Context;
use crate::output;
use campus_admin_core::{AdminResult, EntityKind};

pub async fn handle(ctx: &Context<'_>, kind: EntityKind, values: &[(String, String)]) -> AdminResult<()> {
    let mut page = ctx.page(kind);
    page.begin_create().await;
    super::submit_values(&mut page, values).await?;
    tracing::info!(entity = %kind, "created");

    let list = page.list();
    if !ctx.format.print(&list.items()) {
        let rows = list.items().iter().map(|item| list.config().row(item)).collect();
        output::print_table(list.config().headers(), rows);
    }
    Ok(())
}
