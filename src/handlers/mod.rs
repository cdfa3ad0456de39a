mod config;
mod fetch;
mod key;

pub use config::handle_config;
pub use fetch::handle_fetch;
pub use key::handle_key;

use crate::cli::Commands;

/// Config-management commands must keep working with a broken config file.
pub fn should_skip_config_validation(command: &Commands) -> bool {
    matches!(command, Commands::Config { .. })
}
