//! Interactive search
//!
//! Reads one search term per line from stdin. Terms are debounced before the
//! list is refreshed, so pasting or typing several lines quickly costs a
//! single backend request.

use super::Context;
use crate::output;
use campus_admin_core::debounce::Debouncer;
use campus_admin_core::{AdminResult, EntityKind, ListOrchestrator, Refresh};
use colored::Colorize;
use std::io::{self, BufRead};
use std::time::Duration;
use tokio::sync::mpsc;

pub async fn handle(ctx: &Context<'_>, kind: EntityKind) -> AdminResult<()> {
    let mut page = ctx.page(kind);
    page.load().await?;
    render(ctx, page.list());

    let (debouncer, mut settled) = Debouncer::new(Duration::from_millis(ctx.config.search_debounce_ms));
    let mut debouncer = Some(debouncer);
    let (line_tx, mut lines) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    eprintln!("{}", "Suchbegriff eingeben (Strg-D beendet):".dimmed());

    loop {
        tokio::select! {
            line = lines.recv(), if debouncer.is_some() => match line {
                Some(line) => {
                    if let Some(d) = &debouncer {
                        d.push(line);
                    }
                }
                // stdin closed: dropping the debouncer flushes the last term
                None => debouncer = None,
            },
            term = settled.recv() => {
                let Some(term) = term else { break };
                let list = page.list_mut();
                if let Refresh::Fetch(_) = list.set_search(&term) {
                    if let Err(e) = list.fetch().await {
                        eprintln!("{} {}", "Error:".red(), e.user_message());
                        continue;
                    }
                }
                render(ctx, page.list());
            }
        }
    }
    Ok(())
}

fn render(ctx: &Context<'_>, list: &ListOrchestrator) {
    if !ctx.format.print(&list.items()) {
        let config = list.config();
        output::print_table(config.headers(), list.items().iter().map(|i| config.row(i)).collect());
    }
}
