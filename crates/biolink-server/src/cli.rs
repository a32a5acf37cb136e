use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Link-in-bio profile page: config API, admin page and static files.
#[derive(Parser, Debug)]
#[command(name = "biolink-server", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the TOML config file
    #[arg(long, value_name = "FILE", default_value = "biolink.toml")]
    pub config: PathBuf,

    /// Directory holding index.html, admin/ and config.json
    #[arg(long, value_name = "DIR")]
    pub web_dir: Option<PathBuf>,

    /// Directory holding config.json and views.json written by the API
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:3001
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Serve the site (the default)
    Serve,
    /// Follow a running site like an open profile page and log every live update
    Watch {
        /// Site root, e.g. http://localhost:3001
        url: String,
        /// Poll interval in milliseconds (defaults to the config file value)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
        /// Persist the page's local storage to this JSON file
        #[arg(long, value_name = "FILE")]
        storage: Option<PathBuf>,
    },
    /// Load the profile the way the admin page does and write it as pretty JSON
    Export {
        /// Site root, e.g. http://localhost:3001
        url: String,
        /// Output file
        out: PathBuf,
        /// Local storage JSON file used as the offline fallback
        #[arg(long, value_name = "FILE")]
        storage: Option<PathBuf>,
    },
}

impl Args {
    /// Flags win over the config file.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.web_dir {
            config.server.web_dir = dir.clone();
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = dir.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
    }
}
