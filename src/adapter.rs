use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use ipnet::{IpNet, Ipv4Net};
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// How an interface obtains its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AddrSource {
    Dhcp,
    Static,
    Loopback,
    Manual,
}

impl AddrSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AddrSource::Dhcp => "dhcp",
            AddrSource::Static => "static",
            AddrSource::Loopback => "loopback",
            AddrSource::Manual => "manual",
        }
    }
}

impl FromStr for AddrSource {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dhcp" => Ok(AddrSource::Dhcp),
            "static" => Ok(AddrSource::Static),
            "loopback" => Ok(AddrSource::Loopback),
            "manual" => Ok(AddrSource::Manual),
            _ => Err(ValueError::Source(s.to_string())),
        }
    }
}

impl fmt::Display for AddrSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The address family of one `iface` stanza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AddrFamily {
    Inet,
    Inet6,
}

impl AddrFamily {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AddrFamily::Inet => "inet",
            AddrFamily::Inet6 => "inet6",
        }
    }
}

impl FromStr for AddrFamily {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inet" => Ok(AddrFamily::Inet),
            "inet6" => Ok(AddrFamily::Inet6),
            _ => Err(ValueError::Family(s.to_string())),
        }
    }
}

impl fmt::Display for AddrFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A netmask in its family-dependent encoding: inet stanzas keep the dotted
/// mask, inet6 stanzas keep the prefix length. The asymmetry follows the
/// interfaces(5) convention (`netmask 255.255.255.0` vs `netmask 64`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Netmask {
    Dotted(Ipv4Addr),
    Prefix(u8),
}

impl fmt::Display for Netmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Netmask::Dotted(mask) => write!(f, "{mask}"),
            Netmask::Prefix(len) => write!(f, "{len}"),
        }
    }
}

/// One `iface` block: an address family, an address source, and the detail
/// directives that followed it. Unrecognized directives are kept verbatim in
/// `others` so a rewrite never loses them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddressStanza {
    pub source: AddrSource,
    pub family: AddrFamily,
    pub address: Option<IpAddr>,
    pub netmask: Option<Netmask>,
    pub broadcast: Option<IpAddr>,
    pub network: Option<IpAddr>,
    pub metric: Option<u32>,
    pub gateway: Option<IpAddr>,
    pub dns_nameservers: Vec<IpAddr>,
    pub wifi_name: Option<String>,
    pub wifi_password: Option<String>,
    pub others: Vec<String>,
}

impl AddressStanza {
    #[must_use]
    pub fn new(family: AddrFamily, source: AddrSource) -> Self {
        AddressStanza {
            source,
            family,
            address: None,
            netmask: None,
            broadcast: None,
            network: None,
            metric: None,
            gateway: None,
            dns_nameservers: Vec::new(),
            wifi_name: None,
            wifi_password: None,
            others: Vec::new(),
        }
    }

    fn parse_ip(value: &str) -> Result<IpAddr, ValueError> {
        value
            .parse::<IpAddr>()
            .map_err(|_| ValueError::Ip(value.to_string()))
    }

    /// Sets the address from a bare IP literal or CIDR notation. CIDR form
    /// also derives the netmask from the prefix.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Ip` if the value is neither a network nor an
    /// address literal.
    pub fn set_address(&mut self, value: &str) -> Result<(), ValueError> {
        if let Ok(net) = value.parse::<IpNet>() {
            self.address = Some(net.addr());
            self.netmask = Some(match net {
                IpNet::V4(n) => Netmask::Dotted(n.netmask()),
                IpNet::V6(n) => Netmask::Prefix(n.prefix_len()),
            });
        } else {
            self.address = Some(Self::parse_ip(value)?);
        }
        Ok(())
    }

    /// Sets the netmask from a dotted mask or a bare prefix length. A bare
    /// integer is interpreted against the stanza family (`/32` base for
    /// inet, `/128` for inet6); a dotted mask on an inet6 stanza is reduced
    /// to its prefix length.
    ///
    /// # Errors
    ///
    /// * `ValueError::Ip` for a non-contiguous dotted mask or a mask whose
    ///   family cannot apply to this stanza.
    /// * `ValueError::Number` if the value is neither a mask nor a valid
    ///   in-range prefix length.
    pub fn set_netmask(&mut self, value: &str) -> Result<(), ValueError> {
        if let Ok(addr) = value.parse::<IpAddr>() {
            self.netmask = Some(match (self.family, addr) {
                (AddrFamily::Inet, IpAddr::V4(mask)) => Netmask::Dotted(mask),
                (AddrFamily::Inet, IpAddr::V6(_)) => {
                    return Err(ValueError::Ip(value.to_string()));
                }
                (AddrFamily::Inet6, IpAddr::V4(mask)) => {
                    Netmask::Prefix(mask_to_prefix(u128::from(u32::from(mask)) << 96, value)?)
                }
                (AddrFamily::Inet6, IpAddr::V6(mask)) => {
                    Netmask::Prefix(mask_to_prefix(u128::from(mask), value)?)
                }
            });
            return Ok(());
        }

        let prefix = value
            .parse::<u8>()
            .map_err(|_| ValueError::Number(value.to_string()))?;
        self.netmask = Some(match self.family {
            AddrFamily::Inet => {
                let net = Ipv4Net::new(Ipv4Addr::UNSPECIFIED, prefix)
                    .map_err(|_| ValueError::Number(value.to_string()))?;
                Netmask::Dotted(net.netmask())
            }
            AddrFamily::Inet6 => {
                if prefix > 128 {
                    return Err(ValueError::Number(value.to_string()));
                }
                Netmask::Prefix(prefix)
            }
        });
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ValueError::Ip` if the value is not an IP literal.
    pub fn set_broadcast(&mut self, value: &str) -> Result<(), ValueError> {
        self.broadcast = Some(Self::parse_ip(value)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ValueError::Ip` if the value is not an IP literal.
    pub fn set_network(&mut self, value: &str) -> Result<(), ValueError> {
        self.network = Some(Self::parse_ip(value)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ValueError::Ip` if the value is not an IP literal.
    pub fn set_gateway(&mut self, value: &str) -> Result<(), ValueError> {
        self.gateway = Some(Self::parse_ip(value)?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ValueError::Number` if the value is not a valid integer.
    pub fn set_metric(&mut self, value: &str) -> Result<(), ValueError> {
        self.metric = Some(
            value
                .parse::<u32>()
                .map_err(|_| ValueError::Number(value.to_string()))?,
        );
        Ok(())
    }

    /// Appends one name server, keeping declaration order.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Ip` if the value is not an IP literal.
    pub fn push_dns(&mut self, value: &str) -> Result<(), ValueError> {
        self.dns_nameservers.push(Self::parse_ip(value)?);
        Ok(())
    }

    pub fn set_wifi_name(&mut self, name: &str) {
        self.wifi_name = Some(name.to_string());
    }

    pub fn set_wifi_password(&mut self, password: &str) {
        self.wifi_password = Some(password.to_string());
    }

    /// Keeps an unrecognized directive line verbatim.
    pub fn push_other(&mut self, line: &str) {
        self.others.push(line.to_string());
    }
}

/// A named network interface: its start-up flags and address stanzas in
/// file order. An adapter may carry several stanzas (dual-stack, multiple
/// static blocks).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkAdapter {
    pub name: String,
    pub auto: bool,
    pub hotplug: bool,
    pub stanzas: Vec<AddressStanza>,
}

impl NetworkAdapter {
    #[must_use]
    pub fn new(name: &str) -> Self {
        NetworkAdapter {
            name: name.to_string(),
            auto: false,
            hotplug: false,
            stanzas: Vec::new(),
        }
    }
}

fn mask_to_prefix(bits: u128, value: &str) -> Result<u8, ValueError> {
    if bits.count_ones() != bits.leading_ones() {
        return Err(ValueError::Ip(value.to_string()));
    }
    u8::try_from(bits.leading_ones()).map_err(|_| ValueError::Ip(value.to_string()))
}
