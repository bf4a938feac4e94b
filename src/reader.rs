use std::collections::HashMap;

use crate::adapter::{AddrFamily, AddrSource, AddressStanza, NetworkAdapter};
use crate::error::{Error, ValueError};

/// Single-pass line classifier over an interfaces file.
///
/// `context` tracks the adapter named by the most recent `iface` line;
/// detail directives apply to that adapter's newest stanza. The name index
/// merges repeated references (`auto eth0` and `iface eth0 ...` in any
/// order) onto one adapter and is discarded once parsing completes.
pub(crate) struct Parser {
    others: Vec<String>,
    adapters: Vec<NetworkAdapter>,
    index: HashMap<String, usize>,
    context: Option<usize>,
}

impl Parser {
    pub(crate) fn new() -> Self {
        Parser {
            others: Vec::new(),
            adapters: Vec::new(),
            index: HashMap::new(),
            context: None,
        }
    }

    /// Parses the whole text, consuming the parser. The first error aborts
    /// the parse; the partially built model is dropped with `self`.
    pub(crate) fn parse(mut self, text: &str) -> Result<(Vec<String>, Vec<NetworkAdapter>), Error> {
        for (n, raw) in text.lines().enumerate() {
            self.handle_line(n + 1, raw)?;
        }
        tracing::debug!(
            adapters = self.adapters.len(),
            passthrough = self.others.len(),
            "parsed interfaces text"
        );
        Ok((self.others, self.adapters))
    }

    fn ensure_adapter(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            idx
        } else {
            self.adapters.push(NetworkAdapter::new(name));
            let idx = self.adapters.len() - 1;
            self.index.insert(name.to_string(), idx);
            idx
        }
    }

    fn handle_line(&mut self, line_no: usize, raw: &str) -> Result<(), Error> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&keyword) = tokens.first() else {
            return Ok(());
        };
        let syntax = |source| Error::Syntax {
            line: line_no,
            source,
        };

        match keyword {
            "mapping" | "rename" | "source" | "source-directory" => {
                self.context = None;
                self.others.push(line.to_string());
            }
            "auto" | "allow-auto" | "allow-hotplug" => {
                self.context = None;
                if tokens.len() < 2 {
                    return Err(syntax(ValueError::Missing(keyword.to_string())));
                }
                // interfaces(5) allows several names on one flag line.
                for name in &tokens[1..] {
                    let idx = self.ensure_adapter(name);
                    if keyword == "allow-hotplug" {
                        self.adapters[idx].hotplug = true;
                    } else {
                        self.adapters[idx].auto = true;
                    }
                }
            }
            "iface" => {
                if tokens.len() < 4 {
                    return Err(syntax(ValueError::Missing(keyword.to_string())));
                }
                let family: AddrFamily = tokens[2].parse().map_err(syntax)?;
                let source: AddrSource = tokens[3].parse().map_err(syntax)?;
                let idx = self.ensure_adapter(tokens[1]);
                self.adapters[idx]
                    .stanzas
                    .push(AddressStanza::new(family, source));
                self.context = Some(idx);
            }
            "address" | "netmask" | "broadcast" | "network" | "metric" | "gateway"
            | "dns-nameservers" | "wpa-ssid" | "wpa-psk" => {
                let stanza = self
                    .context
                    .and_then(|idx| self.adapters[idx].stanzas.last_mut())
                    .ok_or_else(|| Error::Context {
                        line: line_no,
                        text: line.to_string(),
                    })?;
                if keyword == "dns-nameservers" {
                    for value in &tokens[1..] {
                        stanza.push_dns(value).map_err(syntax)?;
                    }
                    return Ok(());
                }
                let value = tokens
                    .get(1)
                    .ok_or_else(|| syntax(ValueError::Missing(keyword.to_string())))?;
                match keyword {
                    "address" => stanza.set_address(value).map_err(syntax)?,
                    "netmask" => stanza.set_netmask(value).map_err(syntax)?,
                    "broadcast" => stanza.set_broadcast(value).map_err(syntax)?,
                    "network" => stanza.set_network(value).map_err(syntax)?,
                    "metric" => stanza.set_metric(value).map_err(syntax)?,
                    "gateway" => stanza.set_gateway(value).map_err(syntax)?,
                    "wpa-ssid" => stanza.set_wifi_name(value),
                    _ => stanza.set_wifi_password(value),
                }
            }
            _ => {
                if let Some(stanza) = self
                    .context
                    .and_then(|idx| self.adapters[idx].stanzas.last_mut())
                {
                    stanza.push_other(line);
                } else {
                    tracing::debug!(line = line_no, "skipping line outside any block: {line}");
                }
            }
        }
        Ok(())
    }
}
