//! Default values for configuration options.
//!
//! Centralized constants to avoid magic strings scattered across the codebase.

/// Default network name whose addresses are external.
pub const PUBLIC_NETWORK_NAME: &str = "public";

/// Default preferred address order.
pub const ADDRESS_ORDER: &str = "internal-v4, internal-v6, external-v4, external-v6";

/// Default metadata key holding the node's hostname.
pub const HOSTNAME_KEY: &str = "hostname";

/// Default output format name.
pub const OUTPUT_FORMAT: &str = "text";
