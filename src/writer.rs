use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::InterfaceSet;
use crate::adapter::{AddressStanza, NetworkAdapter};
use crate::error::Error;

const HEADER: &str = "# interfaces(5) file used by ifup(8) and ifdown(8)\n\
                      # Include files from /etc/network/interfaces.d:\n";

impl fmt::Display for InterfaceSet {
    /// Renders the canonical text form: the fixed header, top-level
    /// passthrough lines in captured order, then one block per adapter in
    /// first-seen order. Field order and whitespace are normalized, so the
    /// output is semantically, not byte, equivalent to the parsed input.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(HEADER)?;
        for line in &self.others {
            writeln!(f, "{line}")?;
        }
        writeln!(f)?;
        for adapter in &self.adapters {
            writeln!(f, "{adapter}")?;
        }
        Ok(())
    }
}

impl fmt::Display for NetworkAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.auto {
            writeln!(f, "auto {}", self.name)?;
        }
        if self.hotplug {
            writeln!(f, "allow-hotplug {}", self.name)?;
        }
        for stanza in &self.stanzas {
            writeln!(f, "iface {} {} {}", self.name, stanza.family, stanza.source)?;
            stanza.fmt_details(f)?;
        }
        Ok(())
    }
}

impl AddressStanza {
    // Detail lines are emitted only for populated fields, in a fixed order.
    fn fmt_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(address) = &self.address {
            writeln!(f, "  address {address}")?;
        }
        if let Some(netmask) = &self.netmask {
            writeln!(f, "  netmask {netmask}")?;
        }
        if let Some(broadcast) = &self.broadcast {
            writeln!(f, "  broadcast {broadcast}")?;
        }
        if let Some(network) = &self.network {
            writeln!(f, "  network {network}")?;
        }
        if let Some(metric) = &self.metric {
            writeln!(f, "  metric {metric}")?;
        }
        if let Some(gateway) = &self.gateway {
            writeln!(f, "  gateway {gateway}")?;
        }
        if !self.dns_nameservers.is_empty() {
            let joined = self
                .dns_nameservers
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "  dns-nameservers {joined}")?;
        }
        if let Some(name) = &self.wifi_name {
            writeln!(f, "  wpa-ssid {name}")?;
        }
        if let Some(password) = &self.wifi_password {
            writeln!(f, "  wpa-psk {password}")?;
        }
        for line in &self.others {
            writeln!(f, "  {line}")?;
        }
        Ok(())
    }
}

/// Buffers the full render and replaces `path` atomically: the text is
/// staged to a sibling `<path>.tmp` and renamed into place, so a mid-write
/// failure never leaves a truncated destination behind.
pub(crate) fn write_atomic(set: &InterfaceSet, path: &Path) -> Result<(), Error> {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    let staged = PathBuf::from(staged);

    fs::write(&staged, set.to_string())?;
    fs::rename(&staged, path)?;
    tracing::debug!(path = %path.display(), "wrote interfaces file");
    Ok(())
}
