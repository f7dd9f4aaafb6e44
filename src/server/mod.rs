//! Input records supplied by the compute API.
//!
//! This module provides:
//! - The server record with its raw per-network address map ([`ServerRecord`])
//! - Attached interface records ([`InterfaceRecord`], [`FixedIp`])
//! - Loading both from an external provider ([`ServerSource`])
//!
//! Records are treated as already fetched. Nothing here talks to the
//! network; the address map is kept loosely typed and is validated later
//! by the address extractor.

mod record;
mod source;

pub use record::{FixedIp, InterfaceRecord, PORT_STATE_ACTIVE, ServerRecord};
pub use source::{JsonFileSource, ServerSource, SourceError};
