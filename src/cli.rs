use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "debrid-dl")]
#[command(about = "Fetch magnet contents through a debrid service")]
#[command(long_about = "
debrid-dl hands magnet links to a debrid service (Real-Debrid API), waits for
the remote side to materialize the content, then downloads every resulting
file into a local folder named after the job. Individual file failures are
reported and counted without aborting the rest of the batch.

Examples:
  debrid-dl fetch 'magnet:?xt=urn:btih:...'   # one-shot fetch, exits non-zero on failure
  debrid-dl fetch                             # prompt for magnets in a loop
  debrid-dl fetch -o ~/Music --poll-seconds 10
  debrid-dl key set                           # store the API key for future runs
  debrid-dl config show                       # inspect configuration
")]
#[command(version)]
pub struct Cli {
    /// API key for the debrid service (overrides the stored key)
    #[arg(short = 'k', long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a magnet and download the resulting files
    #[command(visible_alias = "f")]
    Fetch {
        /// Magnet link (prompted for when missing)
        #[arg(value_name = "MAGNET")]
        magnet: Option<String>,

        /// Local output folder
        #[arg(short, long, value_name = "FOLDER")]
        #[arg(help = "Folder the job's files are downloaded into")]
        output: Option<String>,

        /// Seconds between remote status checks
        #[arg(long, value_name = "SECONDS")]
        poll_seconds: Option<u64>,

        /// Maximum seconds to wait for the remote job to finish
        #[arg(long, value_name = "SECONDS")]
        timeout_seconds: Option<u64>,
    },

    /// Manage the stored API key
    #[command(visible_alias = "k")]
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Manage configuration
    #[command(visible_alias = "cfg")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum KeyAction {
    /// Store an API key for future runs
    Set {
        /// Key value (prompted for when missing)
        value: Option<String>,
    },

    /// Show where the key is stored and whether one is present
    Show,

    /// Remove the stored key
    Clear,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the current configuration
    Show,

    /// Print the configuration file path
    Path,
}

impl Cli {
    /// Reject argument combinations clap cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if let Commands::Fetch {
            magnet,
            poll_seconds,
            timeout_seconds,
            ..
        } = &self.command
        {
            if let Some(magnet) = magnet {
                if !magnet.starts_with("magnet:") {
                    return Err("the MAGNET argument must be a magnet: URI".to_string());
                }
            }
            if *poll_seconds == Some(0) {
                return Err("--poll-seconds must be a positive number".to_string());
            }
            if *timeout_seconds == Some(0) {
                return Err("--timeout-seconds must be a positive number".to_string());
            }
        }
        Ok(())
    }
}
