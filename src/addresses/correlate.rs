//! Reachability of fixed addresses, judged from attached interfaces.
//!
//! # Policy
//!
//! - Access and floating addresses are always reachable.
//! - With no interface records at all, every fixed address is reachable.
//! - Otherwise a fixed address is reachable if any `ACTIVE` interface binds
//!   it, or if no interface binds it at all.
//! - A fixed address bound only to non-active interfaces is unreachable.

use std::collections::HashSet;

use crate::server::InterfaceRecord;

use super::extract::{AddressKind, RawAddress};

/// Fixed-IP lookup tables built once from the interface list.
#[derive(Debug, Clone, Default)]
pub struct Reachability<'a> {
    active: HashSet<&'a str>,
    bound: HashSet<&'a str>,
    enforced: bool,
}

impl<'a> Reachability<'a> {
    /// Builds the lookup from the attached interfaces.
    #[must_use]
    pub fn new(interfaces: &'a [InterfaceRecord]) -> Self {
        let mut active = HashSet::new();
        let mut bound = HashSet::new();

        for interface in interfaces {
            for ip in interface.ip_addresses() {
                bound.insert(ip);
                if interface.is_active() {
                    active.insert(ip);
                }
            }
        }

        Self {
            active,
            bound,
            enforced: !interfaces.is_empty(),
        }
    }

    /// A lookup that reports every address reachable.
    #[must_use]
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Returns true if the address should be kept.
    #[must_use]
    pub fn is_reachable(&self, address: &RawAddress) -> bool {
        if address.is_access() || address.kind == AddressKind::Floating || !self.enforced {
            return true;
        }

        let addr = address.addr.as_str();
        self.active.contains(addr) || !self.bound.contains(addr)
    }
}
