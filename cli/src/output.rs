//! Output formatting

use campus_admin_core::detail::{BadgeTone, DetailValue, DetailView};
use campus_admin_core::{Notice, NoticeLevel};
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Parse the `default_format` config value
    pub fn parse(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value, true).ok()
    }

    /// Structured output for json/yaml. Returns false for table, which each command renders itself.
    pub fn print<T: Serialize>(&self, data: &T) -> bool {
        match self {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
                true
            }
            OutputFormat::Yaml => {
                print!("{}", serde_yaml::to_string(data).unwrap_or_default());
                true
            }
            OutputFormat::Table => false,
        }
    }
}

pub fn print_table(headers: Vec<String>, rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("{}", "Keine Einträge gefunden.".dimmed());
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");
}

fn tone(label: &str, tone: BadgeTone) -> ColoredString {
    let label = format!(" {} ", label);
    match tone {
        BadgeTone::Success => label.black().on_green(),
        BadgeTone::Info => label.black().on_cyan(),
        BadgeTone::Warning => label.black().on_yellow(),
        BadgeTone::Danger => label.white().on_red(),
        BadgeTone::Neutral => label.normal().reversed(),
    }
}

pub fn print_detail(view: &DetailView) {
    let header = &view.header;
    print!("{}  {}", format!("[{}]", header.initials).bold(), header.title.bold());
    for badge in &header.badges {
        print!(" {}", tone(&badge.label, badge.tone));
    }
    println!();
    if let Some(subtitle) = &header.subtitle {
        println!("{}", subtitle.dimmed());
    }

    for section in &view.sections {
        println!();
        println!("{}", section.title.underline());
        let width = section.items.iter().map(|i| i.label.chars().count()).max().unwrap_or(0);
        for item in &section.items {
            let label = format!("{:width$}", item.label, width = width);
            match &item.value {
                DetailValue::Text(text) => println!("  {}  {}", label.dimmed(), text),
                DetailValue::Node(entries) => {
                    println!("  {}", label.dimmed());
                    for entry in entries {
                        println!("  {:width$}  - {}", "", entry, width = width);
                    }
                }
            }
        }
    }
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("{} {}", "✓".green(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", "✗".red(), notice.message),
        }
    }
}
