use crate::config::OutputFormat;
use rolemap_core::{HostAddress, Resolution, Role};
use std::collections::BTreeSet;

pub fn render_resolution(resolution: &Resolution, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(resolution)?,
        OutputFormat::Yaml => serde_yaml::to_string(resolution)?,
        OutputFormat::Text => resolution
            .roles()
            .iter()
            .map(|(role, hosts)| format!("{}: {}", role, join_hosts(hosts, " ")))
            .collect::<Vec<_>>()
            .join("\n"),
    };
    Ok(rendered)
}

/// One address per line.
pub fn render_hosts(hosts: &BTreeSet<HostAddress>) -> String {
    join_hosts(hosts, "\n")
}

pub fn render_catalog() -> String {
    Role::ALL
        .iter()
        .map(|role| role.tag())
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_hosts(hosts: &BTreeSet<HostAddress>, separator: &str) -> String {
    hosts
        .iter()
        .map(HostAddress::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
