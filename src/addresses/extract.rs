//! Address extraction from the server's raw address map.
//!
//! Turns the loosely typed `addresses` JSON into [`RawAddress`] records.
//! Shape violations (a network that is not a list, an entry that is not a
//! mapping) fail the whole call. Anything softer is logged and skipped.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::server::ServerRecord;

use super::AddressError;

/// Entry key holding the IP literal.
pub const ADDR_KEY: &str = "addr";

/// Entry key holding the numeric IP version.
pub const VERSION_KEY: &str = "version";

/// Entry key holding the fixed/floating hint.
pub const TYPE_HINT_KEY: &str = "OS-EXT-IPS:type";

/// Entry key holding the MAC address.
pub const MAC_KEY: &str = "OS-EXT-IPS-MAC:mac_addr";

/// IP version of an extracted address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpVersion {
    /// IPv4 address.
    V4,
    /// IPv6 address.
    V6,
}

impl IpVersion {
    /// Maps the entry's numeric `version` field; anything but 4 or 6 is `None`.
    ///
    /// Both integer (`4`) and float (`4.0`) encodings are accepted.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let Value::Number(number) = value else {
            return None;
        };

        let version = number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|v| v.fract() == 0.0 && (0.0..=255.0).contains(v))
                .map(whole_float_to_u64)
        })?;

        match version {
            4 => Some(Self::V4),
            6 => Some(Self::V6),
            _ => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // caller checks range and fraction
fn whole_float_to_u64(value: f64) -> u64 {
    value as u64
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// How the address is attached to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Bound to a port by the network fabric. Also the default when untagged.
    Fixed,
    /// Separately allocated and mapped onto a port.
    Floating,
}

impl AddressKind {
    /// Interprets the optional type hint. Only `"floating"` is floating.
    #[must_use]
    pub fn from_hint(hint: Option<&str>) -> Self {
        match hint {
            Some("floating") => Self::Floating,
            Some("fixed") | None => Self::Fixed,
            Some(other) => {
                tracing::debug!("Unknown address type hint '{other}', treating as fixed");
                Self::Fixed
            }
        }
    }
}

/// Where an extracted address came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The server's own `accessIPv4`/`accessIPv6` field.
    Access,
    /// An entry in the named network's address list.
    Network(String),
}

/// One address found on the server, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAddress {
    /// Where the address was found.
    pub origin: Origin,
    /// The IP literal, as reported.
    pub addr: String,
    /// IP version, as reported.
    pub version: IpVersion,
    /// Fixed or floating.
    pub kind: AddressKind,
    /// MAC address, when the entry carries one.
    pub mac: Option<String>,
}

impl RawAddress {
    /// Creates a synthetic access address.
    #[must_use]
    pub fn access(addr: impl Into<String>, version: IpVersion) -> Self {
        Self {
            origin: Origin::Access,
            addr: addr.into(),
            version,
            kind: AddressKind::Fixed,
            mac: None,
        }
    }

    /// Returns the owning network name, or `None` for access addresses.
    #[must_use]
    pub fn network(&self) -> Option<&str> {
        match &self.origin {
            Origin::Access => None,
            Origin::Network(name) => Some(name),
        }
    }

    /// Returns true for the synthetic access addresses.
    #[must_use]
    pub const fn is_access(&self) -> bool {
        matches!(self.origin, Origin::Access)
    }
}

/// Extracts every usable address from the server, in discovery order.
///
/// Order: access IPv4, access IPv6 (each only when non-empty), then each
/// network in ascending name order with its entries in list order.
///
/// # Errors
///
/// Returns [`AddressError`] if a network's value is not a list or one of
/// its entries is not a mapping. No partial result is returned.
pub fn extract(server: &ServerRecord) -> Result<Vec<RawAddress>, AddressError> {
    let mut addresses = Vec::new();

    if !server.access_ipv4.is_empty() {
        addresses.push(RawAddress::access(&server.access_ipv4, IpVersion::V4));
    }
    if !server.access_ipv6.is_empty() {
        addresses.push(RawAddress::access(&server.access_ipv6, IpVersion::V6));
    }

    for (network, entries) in &server.addresses {
        let Value::Array(entries) = entries else {
            return Err(AddressError::MalformedNetwork {
                network: network.clone(),
                found: json_kind(entries),
            });
        };

        for (index, entry) in entries.iter().enumerate() {
            let Value::Object(fields) = entry else {
                return Err(AddressError::MalformedEntry {
                    network: network.clone(),
                    index,
                    found: json_kind(entry),
                });
            };

            if let Some(address) = parse_entry(network, index, fields) {
                addresses.push(address);
            }
        }
    }

    Ok(addresses)
}

/// Parses one entry mapping; `None` means the entry is skipped.
fn parse_entry(network: &str, index: usize, fields: &Map<String, Value>) -> Option<RawAddress> {
    let Some(addr) = fields
        .get(ADDR_KEY)
        .and_then(Value::as_str)
        .filter(|addr| !addr.is_empty())
    else {
        tracing::debug!("Skipping {network}[{index}]: missing '{ADDR_KEY}'");
        return None;
    };

    let Some(version) = fields.get(VERSION_KEY).and_then(IpVersion::from_json) else {
        tracing::debug!("Skipping {network}[{index}] ({addr}): '{VERSION_KEY}' is not 4 or 6");
        return None;
    };

    Some(RawAddress {
        origin: Origin::Network(network.to_string()),
        addr: addr.to_string(),
        version,
        kind: AddressKind::from_hint(fields.get(TYPE_HINT_KEY).and_then(Value::as_str)),
        mac: fields
            .get(MAC_KEY)
            .and_then(Value::as_str)
            .map(ToString::to_string),
    })
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server_with(addresses: Value) -> ServerRecord {
        serde_json::from_value(json!({ "addresses": addresses })).unwrap()
    }

    fn literals(addresses: &[RawAddress]) -> Vec<&str> {
        addresses.iter().map(|a| a.addr.as_str()).collect()
    }

    mod ip_version {
        use super::*;

        #[test]
        fn accepts_integer_and_float_encodings() {
            assert_eq!(IpVersion::from_json(&json!(4)), Some(IpVersion::V4));
            assert_eq!(IpVersion::from_json(&json!(4.0)), Some(IpVersion::V4));
            assert_eq!(IpVersion::from_json(&json!(6)), Some(IpVersion::V6));
            assert_eq!(IpVersion::from_json(&json!(6.0)), Some(IpVersion::V6));
        }

        #[test]
        fn rejects_other_values() {
            assert_eq!(IpVersion::from_json(&json!(5)), None);
            assert_eq!(IpVersion::from_json(&json!(4.5)), None);
            assert_eq!(IpVersion::from_json(&json!("4")), None);
            assert_eq!(IpVersion::from_json(&Value::Null), None);
        }

        #[test]
        fn rejects_negative_and_out_of_range_numbers() {
            assert_eq!(IpVersion::from_json(&json!(-4)), None);
            assert_eq!(IpVersion::from_json(&json!(-4.0)), None);
            assert_eq!(IpVersion::from_json(&json!(260.0)), None);
            assert_eq!(IpVersion::from_json(&json!(u64::MAX)), None);
        }

        #[test]
        fn accepts_float_with_exponent_notation() {
            let value: Value = serde_json::from_str("6e0").unwrap();
            assert_eq!(IpVersion::from_json(&value), Some(IpVersion::V6));
        }

        #[test]
        fn display_formats_correctly() {
            assert_eq!(IpVersion::V4.to_string(), "IPv4");
            assert_eq!(IpVersion::V6.to_string(), "IPv6");
        }
    }

    mod address_kind {
        use super::*;

        #[test]
        fn only_floating_hint_is_floating() {
            assert_eq!(AddressKind::from_hint(Some("floating")), AddressKind::Floating);
            assert_eq!(AddressKind::from_hint(Some("fixed")), AddressKind::Fixed);
            assert_eq!(AddressKind::from_hint(None), AddressKind::Fixed);
            assert_eq!(AddressKind::from_hint(Some("Floating")), AddressKind::Fixed);
        }
    }

    mod extraction {
        use super::*;

        #[test]
        fn access_addresses_come_first() {
            let mut server = server_with(json!({
                "private": [{ "addr": "10.0.0.5", "version": 4 }]
            }));
            server.access_ipv4 = "203.0.113.1".into();
            server.access_ipv6 = "2001:db8::1".into();

            let addresses = extract(&server).unwrap();

            assert_eq!(literals(&addresses), ["203.0.113.1", "2001:db8::1", "10.0.0.5"]);
            assert!(addresses[0].is_access());
            assert_eq!(addresses[1].version, IpVersion::V6);
            assert_eq!(addresses[2].network(), Some("private"));
        }

        #[test]
        fn empty_access_fields_are_not_synthesized() {
            let server = server_with(json!({}));

            assert!(extract(&server).unwrap().is_empty());
        }

        #[test]
        fn preserves_list_order_within_network() {
            let server = server_with(json!({
                "private": [
                    { "addr": "10.0.0.32", "version": 4 },
                    { "addr": "10.0.0.2", "version": 4 },
                    { "addr": "10.0.0.100", "version": 4 }
                ]
            }));

            let addresses = extract(&server).unwrap();

            assert_eq!(literals(&addresses), ["10.0.0.32", "10.0.0.2", "10.0.0.100"]);
        }

        #[test]
        fn visits_networks_in_name_order() {
            let server = server_with(json!({
                "public": [{ "addr": "198.51.100.1", "version": 4 }],
                "private": [{ "addr": "10.0.0.1", "version": 4 }]
            }));

            let addresses = extract(&server).unwrap();

            assert_eq!(literals(&addresses), ["10.0.0.1", "198.51.100.1"]);
        }

        #[test]
        fn reads_type_hint_and_mac() {
            let server = server_with(json!({
                "private": [
                    {
                        "addr": "10.0.0.32",
                        "version": 4,
                        "OS-EXT-IPS:type": "fixed",
                        "OS-EXT-IPS-MAC:mac_addr": "fa:16:3e:7c:1b:2b"
                    },
                    { "addr": "50.56.176.36", "version": 4, "OS-EXT-IPS:type": "floating" },
                    { "addr": "10.0.0.31", "version": 4 }
                ]
            }));

            let addresses = extract(&server).unwrap();

            assert_eq!(addresses[0].kind, AddressKind::Fixed);
            assert_eq!(addresses[0].mac.as_deref(), Some("fa:16:3e:7c:1b:2b"));
            assert_eq!(addresses[1].kind, AddressKind::Floating);
            assert_eq!(addresses[1].mac, None);
            assert_eq!(addresses[2].kind, AddressKind::Fixed);
        }

        #[test]
        fn skips_entries_with_bad_version_or_missing_addr() {
            let server = server_with(json!({
                "private": [
                    { "addr": "10.0.0.1", "version": 5 },
                    { "addr": "10.0.0.2" },
                    { "version": 4 },
                    { "addr": "", "version": 4 },
                    { "addr": 42, "version": 4 },
                    { "addr": "10.0.0.3", "version": 4 }
                ]
            }));

            let addresses = extract(&server).unwrap();

            assert_eq!(literals(&addresses), ["10.0.0.3"]);
        }

        #[test]
        fn non_mapping_entry_is_structural_error() {
            let server = server_with(json!({
                "private": [{ "addr": "10.0.0.1", "version": 4 }, "10.0.0.2"]
            }));

            let result = extract(&server);

            assert!(matches!(
                result,
                Err(AddressError::MalformedEntry { ref network, index: 1, found: "a string" })
                    if network == "private"
            ));
        }

        #[test]
        fn non_list_network_is_structural_error() {
            let server = server_with(json!({
                "private": { "addr": "10.0.0.1", "version": 4 }
            }));

            let result = extract(&server);

            assert!(matches!(
                result,
                Err(AddressError::MalformedNetwork { found: "a mapping", .. })
            ));
        }

        #[test]
        fn structural_error_discards_earlier_networks() {
            let server = server_with(json!({
                "alpha": [{ "addr": "10.0.0.1", "version": 4 }],
                "beta": [null]
            }));

            assert!(extract(&server).is_err());
        }
    }
}
