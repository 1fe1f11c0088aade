//! Filters command

use super::Context;
use crate::output;
use campus_admin_core::form::SelectOption;
use campus_admin_core::{AdminResult, EntityKind};
use serde::Serialize;

#[derive(Serialize)]
struct FilterInfo {
    id: String,
    label: String,
    field: String,
    options: Vec<SelectOption>,
}

pub async fn handle(ctx: &Context<'_>, kind: EntityKind) -> AdminResult<()> {
    let mut page = ctx.page(kind);
    // dynamic options come from the loaded page
    page.load().await?;
    let list = page.list();

    let filters: Vec<FilterInfo> = list
        .config()
        .filters
        .iter()
        .map(|f| FilterInfo {
            id: f.id.clone(),
            label: f.label.clone(),
            field: f.field.clone(),
            options: list.filter_options(&f.id),
        })
        .collect();

    if !ctx.format.print(&filters) {
        let rows = filters
            .into_iter()
            .map(|f| {
                let options = f.options.into_iter().map(|o| o.label).collect::<Vec<_>>().join(", ");
                vec![f.id, f.label, options]
            })
            .collect();
        output::print_table(vec!["Filter".into(), "Bezeichnung".into(), "Werte".into()], rows);
    }
    Ok(())
}
