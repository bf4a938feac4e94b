//! Parser and writer for Debian-style `/etc/network/interfaces` files.
//!
//! The interfaces(5) grammar is context-sensitive: the meaning of a detail
//! line such as `address 192.168.1.10` depends on the `iface` line that
//! preceded it, and one adapter may be declared in several places (`auto`,
//! `allow-hotplug`, and `iface` lines in any order). [`InterfaceSet`] parses
//! that text into a mutable model, merging repeated declarations by name,
//! and renders the model back to canonical text. Round-tripping is
//! guaranteed to be semantically equivalent, not byte-identical: comments
//! are dropped and field order is normalized, while unrecognized directives
//! are preserved verbatim.
//!
//! ```no_run
//! use eni::InterfaceSet;
//!
//! let mut set = InterfaceSet::parse()?;
//! if let Some(eth0) = set.adapter_mut("eth0") {
//!     eth0.stanzas[0].set_gateway("192.168.1.1")?;
//! }
//! set.write_to("/etc/network/interfaces.new")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod adapter;
mod error;
mod reader;
mod writer;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use crate::adapter::{AddrFamily, AddrSource, AddressStanza, Netmask, NetworkAdapter};
pub use crate::error::{Error, ValueError};

/// Default read path.
pub const DEFAULT_INTERFACES_PATH: &str = "/etc/network/interfaces";
/// Default write path.
pub const DEFAULT_OUTPUT_PATH: &str = "output";

/// A parsed interfaces file: top-level passthrough lines (`mapping`,
/// `rename`, `source`, `source-directory`) kept verbatim in file order, and
/// the adapters in first-seen order.
///
/// The model is plain data with no internal synchronization; concurrent
/// mutation requires external locking. Each parse builds a fresh model and
/// each write is a full regeneration from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct InterfaceSet {
    /// Source file, when parsed from disk.
    pub path: Option<PathBuf>,
    pub others: Vec<String>,
    pub adapters: Vec<NetworkAdapter>,
}

impl InterfaceSet {
    /// An empty set, for building a configuration programmatically.
    #[must_use]
    pub fn new() -> Self {
        InterfaceSet::default()
    }

    /// Parses [`DEFAULT_INTERFACES_PATH`].
    ///
    /// # Errors
    ///
    /// * `Error::Io` if the file cannot be read.
    /// * Any parse error described in [`Error`]; the first error aborts the
    ///   parse and no partial model is returned.
    pub fn parse() -> Result<Self, Error> {
        Self::parse_from(DEFAULT_INTERFACES_PATH)
    }

    /// Parses the interfaces file at `path`.
    ///
    /// # Errors
    ///
    /// Same as [`InterfaceSet::parse`].
    pub fn parse_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = fs::read_to_string(&path)?;
        let mut set = text.parse::<Self>()?;
        set.path = Some(path.as_ref().to_path_buf());
        Ok(set)
    }

    /// Returns the adapter with the given name, if declared.
    #[must_use]
    pub fn adapter(&self, name: &str) -> Option<&NetworkAdapter> {
        self.adapters.iter().find(|a| a.name == name)
    }

    /// Returns the adapter with the given name for mutation.
    pub fn adapter_mut(&mut self, name: &str) -> Option<&mut NetworkAdapter> {
        self.adapters.iter_mut().find(|a| a.name == name)
    }

    /// Renders to [`DEFAULT_OUTPUT_PATH`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if staging or renaming the output file fails.
    pub fn write(&self) -> Result<(), Error> {
        self.write_to(DEFAULT_OUTPUT_PATH)
    }

    /// Renders the full canonical text and replaces `path` atomically
    /// (staged to a sibling temp file, then renamed into place).
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if staging or renaming the output file fails.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        writer::write_atomic(self, path.as_ref())
    }

    /// Renders into a caller-owned handle. Opening, permission bits, and
    /// closing are the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the write fails; the destination may then
    /// hold partial output.
    pub fn write_to_writer<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_all(self.to_string().as_bytes())?;
        Ok(())
    }
}

impl FromStr for InterfaceSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (others, adapters) = reader::Parser::new().parse(s)?;
        Ok(InterfaceSet {
            path: None,
            others,
            adapters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_lookup_by_name() {
        let set: InterfaceSet = "auto eth0\niface eth1 inet dhcp\n"
            .parse()
            .expect("text should parse");
        assert_eq!(set.adapter("eth0").map(|a| a.auto), Some(true));
        assert!(set.adapter("eth1").is_some());
        assert!(set.adapter("eth2").is_none());
    }

    #[test]
    fn model_can_be_built_and_rendered_without_parsing() {
        let mut set = InterfaceSet::new();
        let mut lo = NetworkAdapter::new("lo");
        lo.auto = true;
        lo.stanzas
            .push(AddressStanza::new(AddrFamily::Inet, AddrSource::Loopback));
        set.adapters.push(lo);

        let rendered = set.to_string();
        assert!(rendered.contains("auto lo\niface lo inet loopback\n"));
    }

    #[test]
    fn write_to_writer_emits_full_render() {
        let set: InterfaceSet = "iface eth0 inet dhcp\n"
            .parse()
            .expect("text should parse");
        let mut buf = Vec::new();
        set.write_to_writer(&mut buf).expect("write should succeed");
        assert_eq!(buf, set.to_string().into_bytes());
    }

    #[test]
    fn set_serializes_to_json() {
        let set: InterfaceSet = "auto eth0\niface eth0 inet dhcp\n"
            .parse()
            .expect("text should parse");
        let json = serde_json::to_string(&set).expect("set should serialize");
        let back: InterfaceSet = serde_json::from_str(&json).expect("set should deserialize");
        assert_eq!(back, set);
    }
}
