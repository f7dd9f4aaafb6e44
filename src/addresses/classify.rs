//! Bucket classification of extracted addresses.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::extract::{AddressKind, IpVersion, Origin, RawAddress};

/// One of the four address classifications used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    /// Internal IPv4 (`internal-v4`).
    InternalV4,
    /// Internal IPv6 (`internal-v6`).
    InternalV6,
    /// External IPv4 (`external-v4`).
    ExternalV4,
    /// External IPv6 (`external-v6`).
    ExternalV6,
}

impl Bucket {
    /// Order used for buckets not named by a preference specification.
    pub const DEFAULT_ORDER: [Self; 4] = [
        Self::InternalV4,
        Self::InternalV6,
        Self::ExternalV4,
        Self::ExternalV6,
    ];

    /// Returns the bucket for the given reachability scope and version.
    #[must_use]
    pub const fn new(external: bool, version: IpVersion) -> Self {
        match (external, version) {
            (false, IpVersion::V4) => Self::InternalV4,
            (false, IpVersion::V6) => Self::InternalV6,
            (true, IpVersion::V4) => Self::ExternalV4,
            (true, IpVersion::V6) => Self::ExternalV6,
        }
    }

    /// Returns the identifier used in preference specifications.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::InternalV4 => "internal-v4",
            Self::InternalV6 => "internal-v6",
            Self::ExternalV4 => "external-v4",
            Self::ExternalV6 => "external-v6",
        }
    }

    /// Returns true for the two external buckets.
    #[must_use]
    pub const fn is_external(self) -> bool {
        matches!(self, Self::ExternalV4 | Self::ExternalV6)
    }

    const fn index(self) -> usize {
        match self {
            Self::InternalV4 => 0,
            Self::InternalV6 => 1,
            Self::ExternalV4 => 2,
            Self::ExternalV6 => 3,
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when a token is not a bucket identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown address bucket '{0}'")]
pub struct UnknownBucket(pub String);

impl FromStr for Bucket {
    type Err = UnknownBucket;

    /// Matches the identifier exactly; case is significant.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::DEFAULT_ORDER
            .into_iter()
            .find(|bucket| bucket.id() == s)
            .ok_or_else(|| UnknownBucket(s.to_string()))
    }
}

/// Assigns an address to its bucket.
///
/// An address is external when it is a synthetic access address, when it
/// is tagged floating, or when its network is one of `public_networks`.
/// The floating hint wins over the network name. Everything else, including
/// networks nobody configured, is internal.
#[must_use]
pub fn classify(address: &RawAddress, public_networks: &BTreeSet<String>) -> Bucket {
    let external = match &address.origin {
        Origin::Access => true,
        Origin::Network(name) => {
            address.kind == AddressKind::Floating || public_networks.contains(name)
        }
    };

    Bucket::new(external, address.version)
}

/// Address literals grouped by bucket, each group in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buckets {
    slots: [Vec<String>; 4],
}

impl Buckets {
    /// Appends a literal to the end of its bucket.
    pub fn push(&mut self, bucket: Bucket, addr: impl Into<String>) {
        self.slots[bucket.index()].push(addr.into());
    }

    /// Returns the literals in `bucket`, in insertion order.
    #[must_use]
    pub fn get(&self, bucket: Bucket) -> &[String] {
        &self.slots[bucket.index()]
    }

    /// Returns the total number of literals across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().map(Vec::len).sum()
    }

    /// Returns true if every bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Vec::is_empty)
    }
}
