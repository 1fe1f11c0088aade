//! Config commands

use crate::output::OutputFormat;
use crate::ConfigCommands;
use campus_admin_core::{AdminConfig, AdminResult};

fn mask(token: &str) -> String {
    format!("{}****", token.chars().take(8).collect::<String>())
}

fn shown(config: &AdminConfig, key: &str) -> AdminResult<String> {
    let value = config.get(key)?;
    Ok(match (key, value) {
        ("api_token", Some(token)) => mask(&token),
        (_, Some(value)) => value,
        (_, None) => "(not set)".into(),
    })
}

pub fn handle(action: ConfigCommands, profile: Option<&str>, format: OutputFormat) -> AdminResult<()> {
    match action {
        ConfigCommands::Init => {
            let path = AdminConfig::default().save(profile)?;
            println!("Configuration initialized at {}", path.display());
        }
        ConfigCommands::Set { key, value } => {
            let mut config = AdminConfig::load(profile)?;
            config.set(&key, &value)?;
            config.save(profile)?;
            println!("Set {} successfully", key);
        }
        ConfigCommands::Get { key } => {
            let config = AdminConfig::load(profile)?;
            println!("{}: {}", key, shown(&config, &key)?);
        }
        ConfigCommands::List => {
            let mut config = AdminConfig::load(profile)?;
            config.api_token = config.api_token.as_deref().map(mask);
            if !format.print(&config) {
                for key in AdminConfig::keys() {
                    println!("{}: {}", key, shown(&config, key)?);
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_masked() {
        let mut config = AdminConfig::default();
        assert_eq!(shown(&config, "api_token").unwrap(), "(not set)");
        config.set("api_token", "abcdefghijklmnop").unwrap();
        assert_eq!(shown(&config, "api_token").unwrap(), "abcdefgh****");
        assert_eq!(shown(&config, "page_size").unwrap(), "50");
        assert!(shown(&config, "nope").is_err());
    }
}
