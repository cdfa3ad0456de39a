use anyhow::Result;
use console::{Term, style};

use debrid_dl::config::ConfigManager;

use crate::cli::ConfigAction;

pub async fn handle_config(config_manager: &ConfigManager, action: ConfigAction) -> Result<()> {
    let term = Term::stdout();

    match action {
        ConfigAction::Show => {
            let contents = std::fs::read_to_string(config_manager.config_file())?;
            term.write_line(&format!("{} Current configuration:", style("⚙️").cyan()))?;
            term.write_line("")?;
            term.write_line(&contents)?;
        }

        ConfigAction::Path => {
            term.write_line(&config_manager.config_file().display().to_string())?;
        }
    }

    Ok(())
}
