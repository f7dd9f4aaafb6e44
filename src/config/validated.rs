//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;

use crate::addresses::{AddressOrder, NetworkingOptions};

use super::cli::{Cli, OutputFormatArg};
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// How the resolved address list is written to stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `TYPE<TAB>ADDRESS` line per address.
    Text,
    /// JSON array of `{"type", "address"}` objects.
    Json,
    /// Handlebars template rendered with an `addresses` array.
    Template(String),
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Template(_) => write!(f, "template"),
        }
    }
}

/// Format selector before the template text is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatKind {
    Text,
    Json,
    Template,
}

impl From<OutputFormatArg> for FormatKind {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => Self::Text,
            OutputFormatArg::Json => Self::Json,
            OutputFormatArg::Template => Self::Template,
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// JSON file with the server record (required)
    pub server: PathBuf,

    /// JSON file with the attached interfaces.
    /// If `None`, the interface list is empty.
    pub interfaces: Option<PathBuf>,

    /// Address derivation policy
    pub networking: NetworkingOptions,

    /// Output rendering
    pub output: OutputFormat,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interfaces_str = self
            .interfaces
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string());
        let public: Vec<&str> = self
            .networking
            .public_network_names
            .iter()
            .map(String::as_str)
            .collect();

        write!(
            f,
            "Config {{ server: {}, interfaces: {}, public_networks: [{}], order: [{}], \
             ipv6_disabled: {}, ignore_port_state: {}, hostname_key: {}, format: {} }}",
            self.server.display(),
            interfaces_str,
            public.join(", "),
            self.networking.address_order,
            self.networking.ipv6_support_disabled,
            self.networking.ignore_port_state,
            self.networking.hostname_key,
            self.output,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The server path is missing
    /// - A public network name is blank
    /// - The hostname key is empty
    /// - The output format is unknown, or its template is missing or invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        // Merge input paths (server is required)
        let server = Self::resolve_server(cli, toml)?;
        let interfaces = Self::resolve_interfaces(cli, toml);

        // Build networking policy
        let networking = Self::build_networking(cli, toml)?;

        // Merge and validate output format
        let output = Self::resolve_output(cli, toml)?;

        Ok(Self {
            server,
            interfaces,
            networking,
            output,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_server(cli: &Cli, toml: Option<&TomlConfig>) -> Result<PathBuf, ConfigError> {
        // CLI takes precedence
        if let Some(ref path) = cli.server {
            return Ok(path.clone());
        }

        toml.and_then(|t| t.input.server.as_ref().map(PathBuf::from))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::SERVER,
                    "Use --server or set input.server in config file",
                )
            })
    }

    fn resolve_interfaces(cli: &Cli, toml: Option<&TomlConfig>) -> Option<PathBuf> {
        // CLI takes precedence
        if let Some(ref path) = cli.interfaces {
            return Some(path.clone());
        }

        toml.and_then(|t| t.input.interfaces.as_ref().map(PathBuf::from))
    }

    fn build_networking(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<NetworkingOptions, ConfigError> {
        let networking = toml.map(|t| &t.networking);

        // CLI names replace TOML names entirely; an explicit empty TOML list is honored
        let public_networks = if cli.public_networks.is_empty() {
            networking
                .and_then(|n| n.public_network_names.clone())
                .unwrap_or_else(|| vec![defaults::PUBLIC_NETWORK_NAME.to_string()])
        } else {
            cli.public_networks.clone()
        };

        for name in &public_networks {
            validate_network_name(name)?;
        }

        // Priority: CLI explicit > TOML > default
        let order_spec = cli
            .address_order
            .as_deref()
            .or_else(|| networking.and_then(|n| n.address_order.as_deref()))
            .unwrap_or(defaults::ADDRESS_ORDER);

        let hostname_key = cli
            .hostname_key
            .as_deref()
            .or_else(|| networking.and_then(|n| n.hostname_key.as_deref()))
            .unwrap_or(defaults::HOSTNAME_KEY);

        if hostname_key.is_empty() {
            return Err(ConfigError::EmptyHostnameKey);
        }

        // Flags only enable: CLI OR TOML
        let ipv6_disabled =
            cli.ipv6_disabled || networking.is_some_and(|n| n.ipv6_support_disabled);
        let ignore_port_state =
            cli.ignore_port_state || networking.is_some_and(|n| n.ignore_port_state);

        Ok(NetworkingOptions::default()
            .with_public_networks(public_networks)
            .with_address_order(AddressOrder::parse(order_spec))
            .with_ipv6_support_disabled(ipv6_disabled)
            .with_ignore_port_state(ignore_port_state)
            .with_hostname_key(hostname_key))
    }

    fn resolve_output(cli: &Cli, toml: Option<&TomlConfig>) -> Result<OutputFormat, ConfigError> {
        let output = toml.map(|t| &t.output);

        let template = cli
            .template
            .clone()
            .or_else(|| output.and_then(|o| o.template.clone()));

        // Priority: CLI explicit > TOML > template given > default
        let kind = match cli.format {
            Some(arg) => FormatKind::from(arg),
            None => match output.and_then(|o| o.format.as_deref()) {
                Some(value) => parse_output_format(value)?,
                None if template.is_some() => FormatKind::Template,
                None => parse_output_format(defaults::OUTPUT_FORMAT)?,
            },
        };

        match kind {
            FormatKind::Text => Ok(OutputFormat::Text),
            FormatKind::Json => Ok(OutputFormat::Json),
            FormatKind::Template => {
                let template = template.ok_or_else(|| {
                    ConfigError::missing(
                        field::TEMPLATE,
                        "Use --template or set output.template in config file",
                    )
                })?;
                Self::validate_template(&template)?;
                Ok(OutputFormat::Template(template))
            }
        }
    }

    fn validate_template(template: &str) -> Result<(), ConfigError> {
        let hbs = Handlebars::new();
        // Compile-check only; render with empty context to validate syntax
        hbs.render_template(template, &serde_json::json!({}))
            .map_err(|e| ConfigError::InvalidTemplate {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_output_format(s: &str) -> Result<FormatKind, ConfigError> {
    match s.to_lowercase().as_str() {
        "text" | "plain" => Ok(FormatKind::Text),
        "json" => Ok(FormatKind::Json),
        "template" | "handlebars" => Ok(FormatKind::Template),
        _ => Err(ConfigError::InvalidOutputFormat {
            value: s.to_string(),
        }),
    }
}

fn validate_network_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::InvalidNetworkName {
            name: name.to_string(),
            reason: "must not be blank",
        });
    }

    if name.trim() != name {
        return Err(ConfigError::InvalidNetworkName {
            name: name.to_string(),
            reason: "must not have leading or trailing whitespace",
        });
    }

    Ok(())
}
