//! Human-readable and JSON rendering of MAAS responses

use maasclient::types;
use maasclient::NodeStatus;
use owo_colors::OwoColorize;
use serde_json::Value;

/// Pretty-printed JSON
pub fn json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// One line per node: hostname, system id, status, tags
pub fn format_nodes(nodes: &[Value]) -> String {
    if nodes.is_empty() {
        return format!("{}", "No nodes".dimmed());
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:<16} {:<14} {}\n",
        "HOSTNAME".bold(),
        "SYSTEM ID".bold(),
        "STATUS".bold(),
        "TAGS".bold()
    ));

    for node in nodes {
        let status = NodeStatus::of(node)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        let tags = types::tag_names(node).join(",");

        out.push_str(&format!(
            "{:<24} {:<16} {:<14} {}\n",
            types::hostname(node).unwrap_or("-"),
            types::system_id(node).unwrap_or("-"),
            status,
            tags.cyan()
        ));
    }

    out.trim_end().to_string()
}

/// Tag names, one per line
pub fn format_tags(tags: &[Value]) -> String {
    if tags.is_empty() {
        return format!("{}", "No tags".dimmed());
    }
    tags.iter()
        .filter_map(types::tag_name_of)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `name: description` per zone
pub fn format_zones(zones: &[Value]) -> String {
    zones
        .iter()
        .map(|z| {
            let name = z.get("name").and_then(Value::as_str).unwrap_or("-");
            let description = z.get("description").and_then(Value::as_str).unwrap_or("");
            if description.is_empty() {
                name.to_string()
            } else {
                format!("{}: {}", name, description.dimmed())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_users(users: &[Value]) -> String {
    users
        .iter()
        .filter_map(|u| u.get("username").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Scalar config values print bare, anything else as JSON
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => json(other),
    }
}

pub fn success(message: &str) -> String {
    format!("{} {}", "✓".green(), message)
}
