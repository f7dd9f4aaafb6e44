//! Application execution logic.
//!
//! Loads the server record and interfaces, derives the address list,
//! and renders it in the configured output format.

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

use node_addrs::addresses::{AddressError, NetworkingOptions, NodeAddress, node_addresses};
use node_addrs::config::{OutputFormat, ValidatedConfig};
use node_addrs::server::{JsonFileSource, ServerSource, SourceError};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to load the input records.
    #[error("Failed to load input: {0}")]
    Source(#[from] SourceError),

    /// The server's address map is malformed.
    #[error("Failed to derive node addresses: {0}")]
    Addresses(#[from] AddressError),

    /// Failed to serialize the address list as JSON.
    #[error("Failed to serialize addresses: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to render the output template.
    #[error("Failed to render output template: {0}")]
    Template(String),
}

/// Template data for rendering the output.
#[derive(Serialize)]
struct TemplateData<'a> {
    addresses: &'a [NodeAddress],
}

/// Executes one resolution using the configured input files.
///
/// Returns the rendered output, ready to be written to stdout.
///
/// # Errors
///
/// Returns an error if:
/// - An input file cannot be read or parsed
/// - The address map is structurally malformed
/// - The output cannot be rendered
#[cfg(not(tarpaulin_include))]
pub fn execute(config: &ValidatedConfig) -> Result<String, RunError> {
    let mut source = JsonFileSource::new(&config.server);
    if let Some(ref path) = config.interfaces {
        source = source.with_interfaces(path);
    }

    let addresses = resolve(&source, &config.networking)?;
    tracing::info!(
        "Resolved {} node addresses from {}",
        addresses.len(),
        source.server_path().display()
    );

    render(&addresses, &config.output)
}

/// Loads records from `source` and derives the node's address list.
fn resolve<S: ServerSource>(
    source: &S,
    options: &NetworkingOptions,
) -> Result<Vec<NodeAddress>, RunError> {
    let server = source.server()?;
    let interfaces = source.interfaces()?;

    tracing::debug!(
        "Server '{}' (status: {}): {} networks, {} interfaces",
        server.name,
        server.status,
        server.addresses.len(),
        interfaces.len()
    );

    Ok(node_addresses(&server, &interfaces, options)?)
}

/// Renders the address list in the given output format.
fn render(addresses: &[NodeAddress], format: &OutputFormat) -> Result<String, RunError> {
    match format {
        OutputFormat::Text => Ok(addresses
            .iter()
            .map(|a| format!("{}\t{}\n", a.kind, a.address))
            .collect()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(addresses).map_err(RunError::Serialize)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Template(template) => {
            let handlebars = Handlebars::new();
            handlebars
                .render_template(template, &TemplateData { addresses })
                .map_err(|e| RunError::Template(e.to_string()))
        }
    }
}
