use anyhow::Result;
use console::{Term, style};
use dialoguer::Password;
use std::process;

use debrid_dl::credentials::KeyStore;

use crate::cli::KeyAction;

pub async fn handle_key(action: KeyAction) -> Result<()> {
    let term = Term::stdout();
    let store = KeyStore::new()?;

    match action {
        KeyAction::Set { value } => {
            let key = match value {
                Some(value) => value,
                None => Password::new()
                    .with_prompt("Enter your debrid API key")
                    .interact()?,
            };
            let key = key.trim().to_string();
            if key.is_empty() {
                term.write_line(&format!(
                    "{} Refusing to store an empty key",
                    style("❌").red()
                ))?;
                process::exit(1);
            }
            store.save(&key)?;
            term.write_line(&format!(
                "{} API key stored in {}",
                style("✅").green(),
                store.file().display()
            ))?;
        }

        KeyAction::Show => match store.load() {
            Some(key) => {
                term.write_line(&format!(
                    "{} Stored key: {} ({})",
                    style("🔑").cyan(),
                    mask(&key),
                    store.file().display()
                ))?;
            }
            None => {
                term.write_line(&format!(
                    "{} No API key stored. Run 'debrid-dl key set' to add one",
                    style("❌").red()
                ))?;
            }
        },

        KeyAction::Clear => {
            store.clear()?;
            term.write_line(&format!("{} Stored API key removed", style("✅").green()))?;
        }
    }

    Ok(())
}

/// Keep just enough of the key visible to recognize it.
fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}...{tail}")
}
