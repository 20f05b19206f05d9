#![deny(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::perf, clippy::suspicious)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

//! Type-forwarding directive generator for .NET assemblies.
//!
//! Reads the public type surface of two assemblies and writes one
//! `TypeForwardedTo` directive for every type the second declares and the
//! first does not.

pub mod canonical;
pub mod cli;
pub mod error;
pub mod forwarders;
pub mod inventory;
pub mod logging;
pub mod metadata;

pub use canonical::{CanonicalTypeName, canonicalize};
pub use error::{Error, Result};
pub use forwarders::ForwardingEntry;
pub use inventory::TypeInventory;
pub use metadata::{Assembly, MetadataLoader};
