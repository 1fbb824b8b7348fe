use clap::Subcommand;
use literacy_core::{Catalog, Config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "analysis.delay_ms", "export.file_name")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value (empty clears an optional path; export.scale takes 1 to 8)
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.apply(&key, &value)?;
            let custom_catalog = match &config.survey.catalog_path {
                Some(path) if key == "survey.catalog_path" => Some(path.as_path()),
                _ => None,
            };
            // An unreadable catalog would block every survey command.
            if let Some(path) = custom_catalog {
                let catalog = Catalog::from_toml_file(path)?;
                config.save()?;
                println!(
                    "ok ({} categories, {} questions)",
                    catalog.len(),
                    catalog.question_count()
                );
            } else {
                config.save()?;
                println!("ok");
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
