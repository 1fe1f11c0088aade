//! Campus Admin CLI
//!
//! Command-line front end for the campus administration engine.
//!
//! # Usage
//!
//! ```bash
//! campus list students --search max --filter school_class=3b
//! campus show rooms 4
//! campus create rooms --set name=Aula --set capacity=200
//! campus update activities 7 --set max_participants=12
//! campus delete groups 3
//! campus schema students --format yaml
//! campus config set api_url https://campus.example.org
//! ```

use campus_admin_core::{logging, AdminConfig, ApiClient, EntityKind};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;

mod commands;
mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "campus")]
#[command(author = "Campus Admin")]
#[command(version)]
#[command(about = "Campus administration command line interface", long_about = None)]
struct Cli {
    /// API base URL (without /api)
    #[arg(long, env = "CAMPUS_API_URL")]
    api_url: Option<String>,

    /// Bearer token for authentication
    #[arg(long, env = "CAMPUS_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format
    #[arg(long, short)]
    format: Option<OutputFormat>,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List entities
    List {
        entity: EntityKind,
        /// Search term
        #[arg(long, short)]
        search: Option<String>,
        /// Filter as id=value (repeatable)
        #[arg(long = "filter", value_parser = commands::parse_key_val)]
        filters: Vec<(String, String)>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show entity details
    Show { entity: EntityKind, id: String },
    /// Create an entity from field values
    Create {
        entity: EntityKind,
        /// Field value as name=value (repeatable)
        #[arg(long = "set", value_parser = commands::parse_key_val)]
        values: Vec<(String, String)>,
    },
    /// Update an entity
    Update {
        entity: EntityKind,
        id: String,
        #[arg(long = "set", value_parser = commands::parse_key_val)]
        values: Vec<(String, String)>,
    },
    /// Delete an entity
    Delete {
        entity: EntityKind,
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Interactive search: one term per line, debounced
    Browse { entity: EntityKind },
    /// Show the form schema of an entity
    Schema { entity: EntityKind },
    /// Show the list filters of an entity and their options
    Filters { entity: EntityKind },
    /// List the known entity kinds
    Entities,
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match AdminConfig::load(cli.profile.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Warning:".yellow(), e);
            AdminConfig::default()
        }
    };
    let level = match cli.verbose {
        0 => config.log_level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    logging::init(&level);

    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(token) = cli.token {
        config.api_token = Some(token);
    }
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(OutputFormat::parse))
        .unwrap_or(OutputFormat::Table);

    let result = match cli.command {
        Commands::Config { action } => commands::config::handle(action, cli.profile.as_deref(), format),
        Commands::Entities => {
            commands::schema::entities(format);
            Ok(())
        }
        command => match ApiClient::from_config(&config) {
            Ok(client) => run(command, client, &config, format).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e.user_message());
        std::process::exit(1);
    }
}

async fn run(
    command: Commands,
    client: ApiClient,
    config: &AdminConfig,
    format: OutputFormat,
) -> campus_admin_core::AdminResult<()> {
    let ctx = commands::Context { client, config, format };
    match command {
        Commands::List { entity, search, filters, page } => {
            commands::list::handle(&ctx, entity, search, filters, page).await
        }
        Commands::Show { entity, id } => commands::show::handle(&ctx, entity, &id).await,
        Commands::Create { entity, values } => commands::create::handle(&ctx, entity, &values).await,
        Commands::Update { entity, id, values } => {
            commands::update::handle(&ctx, entity, &id, &values).await
        }
        Commands::Delete { entity, id, yes } => commands::delete::handle(&ctx, entity, &id, yes).await,
        Commands::Browse { entity } => commands::browse::handle(&ctx, entity).await,
        Commands::Schema { entity } => commands::schema::handle(&ctx, entity).await,
        Commands::Filters { entity } => commands::filters::handle(&ctx, entity).await,
        Commands::Entities | Commands::Config { .. } => Ok(()),
    }
}
