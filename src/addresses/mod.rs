//! Node address derivation.
//!
//! This module turns a server record and its attached interfaces into the
//! ordered, typed address list an orchestrator expects for a node:
//!
//! 1. **Extract** ([`extract()`]) - validate the raw address map into [`RawAddress`] records
//! 2. **Correlate** ([`Reachability`]) - drop fixed addresses bound only to inactive ports
//! 3. **Classify** ([`classify()`]) - sort each address into one of four [`Bucket`]s
//! 4. **Order** ([`AddressOrder`]) - emit buckets in the preferred order, hostname last
//!
//! Everything is synchronous and pure; see [`node_addresses`].

mod classify;
mod correlate;
mod extract;
mod order;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use classify::{Bucket, Buckets, UnknownBucket, classify};
pub use correlate::Reachability;
pub use extract::{AddressKind, IpVersion, Origin, RawAddress, extract};
pub use order::{AddressOrder, emit};

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::defaults;
use crate::server::{InterfaceRecord, ServerRecord};

/// Error raised when the address map does not have the documented shape.
///
/// Soft anomalies (missing fields, unknown versions, unknown networks) never
/// surface here; they are skipped or defaulted during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// A network's value is not a list of entries.
    #[error("Address map entry for network '{network}' must be a list, found {found}")]
    MalformedNetwork {
        /// Network name
        network: String,
        /// JSON kind that was found instead
        found: &'static str,
    },

    /// An entry in a network's list is not a mapping.
    #[error("Address entry {index} of network '{network}' must be a mapping, found {found}")]
    MalformedEntry {
        /// Network name
        network: String,
        /// Position in the network's list
        index: usize,
        /// JSON kind that was found instead
        found: &'static str,
    },
}

/// Semantic type of an emitted node address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeAddressType {
    /// Reachable only inside the cloud.
    #[serde(rename = "InternalIP")]
    InternalIp,
    /// Reachable from outside the cloud.
    #[serde(rename = "ExternalIP")]
    ExternalIp,
    /// The node's hostname.
    #[serde(rename = "Hostname")]
    Hostname,
}

impl fmt::Display for NodeAddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InternalIp => write!(f, "InternalIP"),
            Self::ExternalIp => write!(f, "ExternalIP"),
            Self::Hostname => write!(f, "Hostname"),
        }
    }
}

/// One entry of a node's address list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress {
    /// Address type.
    #[serde(rename = "type")]
    pub kind: NodeAddressType,
    /// IP literal or hostname.
    pub address: String,
}

impl NodeAddress {
    /// Creates a node address.
    #[must_use]
    pub fn new(kind: NodeAddressType, address: impl Into<String>) -> Self {
        Self {
            kind,
            address: address.into(),
        }
    }
}

/// Operator policy for address derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkingOptions {
    /// Networks whose addresses are external; all others are internal.
    pub public_network_names: BTreeSet<String>,

    /// Preferred bucket order.
    pub address_order: AddressOrder,

    /// Omit every IPv6 address, access address included.
    pub ipv6_support_disabled: bool,

    /// Keep fixed addresses regardless of interface port state.
    pub ignore_port_state: bool,

    /// Metadata key holding the hostname.
    pub hostname_key: String,
}

impl Default for NetworkingOptions {
    fn default() -> Self {
        Self {
            public_network_names: BTreeSet::from([defaults::PUBLIC_NETWORK_NAME.to_string()]),
            address_order: AddressOrder::parse(defaults::ADDRESS_ORDER),
            ipv6_support_disabled: false,
            ignore_port_state: false,
            hostname_key: defaults::HOSTNAME_KEY.to_string(),
        }
    }
}

impl NetworkingOptions {
    /// Replaces the set of public network names.
    #[must_use]
    pub fn with_public_networks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_network_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the preferred bucket order.
    #[must_use]
    pub fn with_address_order(mut self, order: AddressOrder) -> Self {
        self.address_order = order;
        self
    }

    /// Sets whether IPv6 addresses are omitted.
    #[must_use]
    pub fn with_ipv6_support_disabled(mut self, disabled: bool) -> Self {
        self.ipv6_support_disabled = disabled;
        self
    }

    /// Sets whether interface port state is ignored.
    #[must_use]
    pub fn with_ignore_port_state(mut self, ignore: bool) -> Self {
        self.ignore_port_state = ignore;
        self
    }

    /// Sets the metadata key holding the hostname.
    #[must_use]
    pub fn with_hostname_key(mut self, key: impl Into<String>) -> Self {
        self.hostname_key = key.into();
        self
    }
}

/// Derives the ordered address list for a node.
///
/// # Examples
///
/// ```
/// use node_addrs::addresses::{NetworkingOptions, NodeAddress, NodeAddressType, node_addresses};
/// use node_addrs::server::ServerRecord;
///
/// let server: ServerRecord = serde_json::from_value(serde_json::json!({
///     "accessIPv4": "203.0.113.10",
///     "metadata": { "hostname": "node-1.novalocal" },
///     "addresses": { "private": [{ "addr": "10.0.0.4", "version": 4 }] }
/// }))
/// .unwrap();
///
/// let addresses = node_addresses(&server, &[], &NetworkingOptions::default()).unwrap();
///
/// assert_eq!(
///     addresses,
///     [
///         NodeAddress::new(NodeAddressType::InternalIp, "10.0.0.4"),
///         NodeAddress::new(NodeAddressType::ExternalIp, "203.0.113.10"),
///         NodeAddress::new(NodeAddressType::Hostname, "node-1.novalocal"),
///     ]
/// );
/// ```
///
/// # Errors
///
/// Returns [`AddressError`] if the server's address map is structurally
/// malformed. No partial list is returned in that case.
pub fn node_addresses(
    server: &ServerRecord,
    interfaces: &[InterfaceRecord],
    options: &NetworkingOptions,
) -> Result<Vec<NodeAddress>, AddressError> {
    let extracted = extract(server)?;

    let reachability = if options.ignore_port_state {
        Reachability::permissive()
    } else {
        Reachability::new(interfaces)
    };

    let mut buckets = Buckets::default();
    for address in extracted {
        if options.ipv6_support_disabled && address.version == IpVersion::V6 {
            tracing::debug!("Omitting {} (IPv6 support disabled)", address.addr);
            continue;
        }

        if !reachability.is_reachable(&address) {
            tracing::debug!(
                "Omitting fixed address {} (bound only to inactive interfaces)",
                address.addr
            );
            continue;
        }

        let bucket = classify(&address, &options.public_network_names);
        buckets.push(bucket, address.addr);
    }

    if buckets.is_empty() {
        tracing::debug!("Server '{}' has no usable IP addresses", server.name);
    }

    let hostname = server.metadata_value(&options.hostname_key);
    let addresses = emit(&buckets, &options.address_order, hostname);

    tracing::debug!(
        "Derived {} addresses for server '{}' (order: {})",
        addresses.len(),
        server.name,
        options.address_order
    );

    Ok(addresses)
}
