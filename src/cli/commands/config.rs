use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            println!("📄 Current configuration:\n");
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("{}", yaml);
        }

        if *edit_config {
            if !path.exists() {
                warning(format!(
                    "No configuration file at {}; run `cruxlog init` first.",
                    path.display()
                ));
                return Ok(());
            }
            ConfigLogic::edit(&path, editor.as_deref())?;
            success("Configuration file edited successfully.");
        }
    }

    Ok(())
}
