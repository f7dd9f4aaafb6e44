//! Preference ordering of classified addresses.
//!
//! A preference specification is a comma or whitespace separated list of
//! bucket identifiers, e.g. `"external-v4, internal-v4"`. Parsing and
//! completion are separate steps:
//!
//! - [`AddressOrder::parse`] keeps the recognized identifiers, first
//!   occurrence wins, and drops everything else.
//! - [`AddressOrder::complete`] appends the buckets the specification did
//!   not name, in [`Bucket::DEFAULT_ORDER`].

use std::collections::HashSet;
use std::fmt;

use super::classify::{Bucket, Buckets};
use super::{NodeAddress, NodeAddressType};

/// The buckets an operator explicitly ranked, in rank order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressOrder {
    explicit: Vec<Bucket>,
}

impl AddressOrder {
    /// Creates an order from explicit buckets, dropping repeats.
    #[must_use]
    pub fn new(buckets: impl IntoIterator<Item = Bucket>) -> Self {
        let mut explicit = Vec::new();
        for bucket in buckets {
            if !explicit.contains(&bucket) {
                explicit.push(bucket);
            }
        }
        Self { explicit }
    }

    /// Parses a preference specification.
    ///
    /// Never fails: unknown tokens are logged and ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use node_addrs::addresses::{AddressOrder, Bucket};
    ///
    /// let order = AddressOrder::parse("external-v6, bogus, external-v6 ,internal-v4");
    /// assert_eq!(order.explicit(), [Bucket::ExternalV6, Bucket::InternalV4]);
    /// ```
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let buckets = spec
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .filter_map(|token| match token.parse::<Bucket>() {
                Ok(bucket) => Some(bucket),
                Err(e) => {
                    tracing::debug!("Ignoring address order token: {e}");
                    None
                }
            });

        Self::new(buckets)
    }

    /// Returns the explicitly ranked buckets.
    #[must_use]
    pub fn explicit(&self) -> &[Bucket] {
        &self.explicit
    }

    /// Returns all four buckets: explicit ones first, then the rest in default order.
    #[must_use]
    pub fn complete(&self) -> Vec<Bucket> {
        let mut buckets = self.explicit.clone();
        buckets.extend(
            Bucket::DEFAULT_ORDER
                .into_iter()
                .filter(|bucket| !self.explicit.contains(bucket)),
        );
        buckets
    }
}

impl fmt::Display for AddressOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.complete().into_iter().map(Bucket::id).collect();
        f.write_str(&ids.join(", "))
    }
}

/// Emits the final address list.
///
/// Buckets are emitted in `order`'s completed sequence, each in insertion
/// order. A repeated (type, literal) pair is emitted once, at its first
/// position. The hostname, when present, is always last.
#[must_use]
pub fn emit(buckets: &Buckets, order: &AddressOrder, hostname: Option<&str>) -> Vec<NodeAddress> {
    let mut seen = HashSet::new();
    let mut addresses = Vec::with_capacity(buckets.len() + 1);

    for bucket in order.complete() {
        let kind = if bucket.is_external() {
            NodeAddressType::ExternalIp
        } else {
            NodeAddressType::InternalIp
        };

        for addr in buckets.get(bucket) {
            if seen.insert((kind, addr.as_str())) {
                addresses.push(NodeAddress::new(kind, addr.as_str()));
            } else {
                tracing::debug!("Dropping duplicate {kind} {addr}");
            }
        }
    }

    if let Some(hostname) = hostname {
        addresses.push(NodeAddress::new(NodeAddressType::Hostname, hostname));
    }

    addresses
}
