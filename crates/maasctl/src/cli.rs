//! Command-line definition for maasctl

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "maasctl")]
#[command(about = "Query and tag machines through the MAAS REST API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// MAAS API URL (overrides MAAS_API_URL and the config file)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// API key consumer_key:token_key:token_secret (overrides MAAS_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// MAAS user whose API key is provisioned when no credentials file exists
    #[arg(long, global = true)]
    pub username: Option<String>,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print raw JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Nodes, server name and server hostname (default)
    Summary,

    /// List all nodes
    Nodes,

    /// Show one node
    Node { system_id: String },

    /// Accept all declared nodes
    AcceptAll,

    /// Commission a node
    Commission { system_id: String },

    /// Power on a node
    Start { system_id: String },

    /// Power off a node
    Stop { system_id: String },

    /// Delete a node from MAAS
    Remove { system_id: String },

    /// List all tags
    Tags,

    /// Create a tag unless it already exists
    TagNew { name: String },

    /// Delete a tag
    TagDelete { name: String },

    /// Apply a tag to a node
    TagMachine { tag: String, system_id: String },

    /// Tag every node with its own system id
    TagNames,

    /// Tag every node to use the fast path installer
    TagFpi,

    /// Read or write server configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print the MAAS server hostname
    Hostname,

    /// List availability zones
    Zones,

    /// Create an availability zone
    ZoneNew {
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List MAAS users
    Users,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Read a configuration item (e.g. maas_name)
    Get { name: String },

    /// Set a configuration item
    Set { name: String, value: String },
}
