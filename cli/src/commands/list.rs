//! List command

use super::Context;
use crate::output;
use campus_admin_core::{AdminResult, EntityKind};

pub async fn handle(
    ctx: &Context<'_>,
    kind: EntityKind,
    search: Option<String>,
    filters: Vec<(String, String)>,
    page_no: u32,
) -> AdminResult<()> {
    let mut page = ctx.page(kind);
    let list = page.list_mut();

    // criteria first: a backend list asks for a fetch, a frontend list filters whatever the fetch brings
    if let Some(term) = search.as_deref() {
        list.set_search(term);
    }
    for (id, value) in &filters {
        if list.config().filter(id).is_none() {
            eprintln!("unbekannter Filter: {} (siehe `campus filters {}`)", id, kind);
            continue;
        }
        list.set_filter(id, Some(value.as_str()));
    }
    list.go_to_page(page_no).await?;

    if !ctx.format.print(&list.items()) {
        let config = list.config();
        let rows = list.items().iter().map(|item| config.row(item)).collect();
        output::print_table(config.headers(), rows);
        if let Some(p) = list.pagination() {
            println!("Seite {}/{} · {} Einträge", p.current_page, p.total_pages, p.total_records);
        }
    }
    Ok(())
}
