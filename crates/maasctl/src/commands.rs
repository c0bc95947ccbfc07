//! maasctl command implementations

use crate::cli::{Cli, Commands, ConfigAction};
use crate::output;
use anyhow::{Context, Result};
use maasclient::{ClientConfig, MaasClient};
use serde_json::Value;
use tracing::debug;

/// Merge config file, environment and CLI flags (flags win)
pub fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = ClientConfig::load_from_path(path)?;
            config.apply_env();
            config
        }
        None => ClientConfig::load().context("Failed to load maasclient configuration")?,
    };

    if let Some(url) = &cli.url {
        config.api_url = url.clone();
    }
    if let Some(key) = &cli.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(username) = &cli.username {
        config.username = username.clone();
    }

    Ok(config)
}

/// Execute the parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;
    debug!("Using MAAS API at {}", config.api_url);

    // Hostname comes from the URL alone; no API key needed
    if matches!(cli.command, Some(Commands::Hostname)) {
        println!("{}", maasclient::server_hostname(&config.api_url)?);
        return Ok(());
    }

    let client = MaasClient::connect(&config).context("Failed to authenticate with MAAS")?;
    let command = cli.command.unwrap_or(Commands::Summary);

    dispatch(&client, command, cli.json)
}

fn dispatch(client: &MaasClient, command: Commands, as_json: bool) -> Result<()> {
    match command {
        Commands::Summary => summary(client, as_json),
        Commands::Nodes => {
            let nodes = client.nodes().context("Failed to list nodes")?;
            print_list(&nodes, as_json, output::format_nodes);
            Ok(())
        }
        Commands::Node { system_id } => {
            let node = client
                .node(&system_id)
                .with_context(|| format!("Failed to read node {}", system_id))?;
            println!("{}", output::json(&node));
            Ok(())
        }
        Commands::AcceptAll => {
            let accepted = client.nodes_accept_all().context("Failed to accept nodes")?;
            print_result(&accepted, as_json, "Accepted all declared nodes");
            Ok(())
        }
        Commands::Commission { system_id } => {
            let node = client
                .node_commission(&system_id)
                .with_context(|| format!("Failed to commission {}", system_id))?;
            print_result(&node, as_json, &format!("Commissioning {}", system_id));
            Ok(())
        }
        Commands::Start { system_id } => {
            let node = client
                .node_start(&system_id)
                .with_context(|| format!("Failed to start {}", system_id))?;
            print_result(&node, as_json, &format!("Started {}", system_id));
            Ok(())
        }
        Commands::Stop { system_id } => {
            let node = client
                .node_stop(&system_id)
                .with_context(|| format!("Failed to stop {}", system_id))?;
            print_result(&node, as_json, &format!("Stopped {}", system_id));
            Ok(())
        }
        Commands::Remove { system_id } => {
            client
                .node_remove(&system_id)
                .with_context(|| format!("Failed to remove {}", system_id))?;
            println!("{}", output::success(&format!("Removed {}", system_id)));
            Ok(())
        }
        Commands::Tags => {
            let tags = client.tags().context("Failed to list tags")?;
            print_list(&tags, as_json, output::format_tags);
            Ok(())
        }
        Commands::TagNew { name } => {
            let created = client
                .tag_new(&name)
                .with_context(|| format!("Failed to create tag {}", name))?;
            if as_json {
                println!("{}", created);
            } else if created {
                println!("{}", output::success(&format!("Created tag {}", name)));
            } else {
                println!("Tag {} already exists", name);
            }
            Ok(())
        }
        Commands::TagDelete { name } => {
            client
                .tag_delete(&name)
                .with_context(|| format!("Failed to delete tag {}", name))?;
            println!("{}", output::success(&format!("Deleted tag {}", name)));
            Ok(())
        }
        Commands::TagMachine { tag, system_id } => {
            client
                .tag_machine(&tag, &system_id)
                .with_context(|| format!("Failed to tag {} with {}", system_id, tag))?;
            println!("{}", output::success(&format!("Tagged {} with {}", system_id, tag)));
            Ok(())
        }
        Commands::TagNames => {
            let nodes = client.nodes().context("Failed to list nodes")?;
            client.tag_name(&nodes).context("Failed to tag nodes by name")?;
            println!("{}", output::success(&format!("Checked {} node(s)", nodes.len())));
            Ok(())
        }
        Commands::TagFpi => {
            let nodes = client.nodes().context("Failed to list nodes")?;
            client
                .tag_fpi(&nodes)
                .context("Failed to tag nodes for the fast path installer")?;
            println!(
                "{}",
                output::success(&format!("Checked {} node(s) for {}", nodes.len(), maasclient::FPI_TAG))
            );
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Get { name } => {
                let value = client
                    .get_server_config(&name)
                    .with_context(|| format!("Failed to read server config {}", name))?;
                print_result(&value, as_json, &output::format_value(&value));
                Ok(())
            }
            ConfigAction::Set { name, value } => {
                client
                    .set_server_config(&name, &value)
                    .with_context(|| format!("Failed to set server config {}", name))?;
                println!("{}", output::success(&format!("Set {}", name)));
                Ok(())
            }
        },
        Commands::Hostname => {
            println!("{}", client.server_hostname()?);
            Ok(())
        }
        Commands::Zones => {
            let zones = client.zones().context("Failed to list zones")?;
            print_list(&zones, as_json, output::format_zones);
            Ok(())
        }
        Commands::ZoneNew { name, description } => {
            let zone = client
                .zone_new(&name, &description)
                .with_context(|| format!("Failed to create zone {}", name))?;
            print_result(&zone, as_json, &format!("Created zone {}", name));
            Ok(())
        }
        Commands::Users => {
            let users = client.users().context("Failed to list users")?;
            print_list(&users, as_json, output::format_users);
            Ok(())
        }
    }
}

/// Nodes, server name and hostname in one go
fn summary(client: &MaasClient, as_json: bool) -> Result<()> {
    let nodes = client.nodes().context("Failed to list nodes")?;
    let maas_name = client
        .get_server_config("maas_name")
        .context("Failed to read server config maas_name")?;
    let hostname = client.server_hostname()?;

    if as_json {
        let summary = serde_json::json!({
            "nodes": nodes,
            "maas_name": maas_name,
            "server_hostname": hostname,
        });
        println!("{}", output::json(&summary));
    } else {
        println!("{}", output::format_nodes(&nodes));
        println!();
        println!("MAAS name: {}", output::format_value(&maas_name));
        println!("Server:    {}", hostname);
    }
    Ok(())
}

fn print_list(items: &[Value], as_json: bool, format: fn(&[Value]) -> String) {
    if as_json {
        println!("{}", output::json(&Value::Array(items.to_vec())));
    } else {
        println!("{}", format(items));
    }
}

fn print_result(value: &Value, as_json: bool, message: &str) {
    if as_json {
        println!("{}", output::json(value));
    } else {
        println!("{}", output::success(message));
    }
}
