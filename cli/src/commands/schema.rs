//! Schema and entity overview commands

use super::Context;
use crate::output::{self, OutputFormat};
use campus_admin_core::{AdminResult, EntityKind};
use colored::Colorize;
use serde::Serialize;

const MAX_LISTED_OPTIONS: usize = 6;

pub async fn handle(ctx: &Context<'_>, kind: EntityKind) -> AdminResult<()> {
    let form = kind.config().form_for(None);
    form.load_options(Some(&ctx.client)).await;
    if ctx.format.print(&form.render()) {
        return Ok(());
    }

    for section in form.sections() {
        println!("{}", section.title.bold());
        if let Some(subtitle) = &section.subtitle {
            println!("{}", subtitle.dimmed());
        }
        let rows = section
            .fields
            .iter()
            .map(|field| {
                let bounds = match (field.min, field.max) {
                    (Some(min), Some(max)) => format!("{}..{}", min, max),
                    (Some(min), None) => format!(">= {}", min),
                    (None, Some(max)) => format!("<= {}", max),
                    (None, None) => String::new(),
                };
                let options = form.available_options(&field.name);
                let mut listed: Vec<String> = options
                    .iter()
                    .take(MAX_LISTED_OPTIONS)
                    .map(|o| format!("{}={}", o.value, o.label))
                    .collect();
                if options.len() > MAX_LISTED_OPTIONS {
                    listed.push(format!("… (+{})", options.len() - MAX_LISTED_OPTIONS));
                }
                vec![
                    field.name.clone(),
                    field.label.clone(),
                    field.field_type.to_string(),
                    if field.required { "ja".into() } else { String::new() },
                    bounds,
                    listed.join(", "),
                ]
            })
            .collect();
        output::print_table(
            ["Feld", "Bezeichnung", "Typ", "Pflicht", "Bereich", "Optionen"]
                .map(String::from)
                .to_vec(),
            rows,
        );
        println!();
    }
    Ok(())
}

#[derive(Serialize)]
struct EntitySummary {
    name: &'static str,
    singular: String,
    plural: String,
    resource: String,
}

pub fn entities(format: OutputFormat) {
    let summaries: Vec<EntitySummary> = EntityKind::ALL
        .iter()
        .map(|kind| {
            let config = kind.config();
            EntitySummary {
                name: kind.as_str(),
                singular: config.singular,
                plural: config.plural,
                resource: config.resource,
            }
        })
        .collect();
    if !format.print(&summaries) {
        let rows = summaries
            .into_iter()
            .map(|s| vec![s.name.to_string(), s.plural, s.resource])
            .collect();
        output::print_table(vec!["Name".into(), "Bezeichnung".into(), "Ressource".into()], rows);
    }
}
