//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Input file locations
    #[serde(default)]
    pub input: InputSection,

    /// Address derivation policy
    #[serde(default)]
    pub networking: NetworkingSection,

    /// Output rendering
    #[serde(default)]
    pub output: OutputSection,
}

/// Input file section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSection {
    /// JSON file with the server record
    pub server: Option<String>,

    /// JSON file with the attached interface list
    pub interfaces: Option<String>,
}

/// Networking policy section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkingSection {
    /// Networks whose addresses are external
    pub public_network_names: Option<Vec<String>>,

    /// Preferred address order specification
    pub address_order: Option<String>,

    /// Omit all IPv6 addresses
    #[serde(default)]
    pub ipv6_support_disabled: bool,

    /// Keep fixed addresses bound only to inactive interfaces
    #[serde(default)]
    pub ignore_port_state: bool,

    /// Metadata key holding the hostname
    pub hostname_key: Option<String>,
}

/// Output section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSection {
    /// Output format: "text", "json", or "template"
    pub format: Option<String>,

    /// Handlebars template for the template format
    pub template: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# node-addrs Configuration File

[input]
# JSON file with the server record (required)
# Accepts the bare record or the {"server": {...}} response body
# server = "server.json"

# JSON file with the attached interfaces
# Accepts a bare list or the {"interfaceAttachments": [...]} response body
# interfaces = "interfaces.json"

[networking]
# Networks whose addresses are external; every other network is internal
# Note: CLI --public-network values REPLACE this list entirely (not merged)
public_network_names = ["public"]

# Preferred address order (comma separated)
# Identifiers: internal-v4, internal-v6, external-v4, external-v6
# Unnamed identifiers follow in the order listed above; unknown ones are ignored
address_order = "internal-v4, internal-v6, external-v4, external-v6"

# Omit all IPv6 addresses
# ipv6_support_disabled = false

# Keep fixed addresses that are bound only to inactive interfaces
# ignore_port_state = false

# Metadata key holding the hostname (default: hostname)
# hostname_key = "hostname"

[output]
# Output format: "text", "json", or "template"
# format = "text"

# Handlebars template for the template format
# Available variables: {{#each addresses}} {{type}} {{address}} {{/each}}
# template = '{{#each addresses}}{{address}} {{/each}}'
"#
    .to_string()
}
