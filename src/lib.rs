//! node-addrs: Node Address Resolver
//!
//! A library for deriving a node's canonical, policy-ordered address list
//! from a compute server record and its attached network interfaces.

pub mod addresses;
pub mod config;
pub mod server;
