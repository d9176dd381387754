//! Network identities and access-point parameters.
//!
//! Value types handed into the connectivity manager. Both validate at
//! construction, so an instance in hand is always usable; the manager and
//! the adapters never re-check.
//!
//! Radio constraints: SSIDs are 1–32 bytes of printable ASCII; WPA2
//! passwords are 8–64 bytes, with the empty string meaning an open network.
//! AP subnet masks are contiguous, /1 through /30.

use core::fmt;
use core::net::Ipv4Addr;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityError {
    InvalidSsid,
    InvalidPassword,
    InvalidGateway,
    InvalidSubnetMask,
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::InvalidGateway => write!(f, "gateway address invalid"),
            Self::InvalidSubnetMask => {
                write!(f, "subnet mask invalid (must be contiguous, /1 through /30)")
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), IdentityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(IdentityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), IdentityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(IdentityError::InvalidPassword);
    }
    Ok(())
}

/// Prefix length of a contiguous IPv4 netmask, or `None` when the set bits
/// are not left-aligned (e.g. 255.0.255.0).
fn mask_prefix_len(mask: Ipv4Addr) -> Option<u8> {
    let bits = u32::from(mask);
    if bits.leading_ones() + bits.trailing_zeros() == 32 {
        Some(bits.leading_ones() as u8)
    } else {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// NetworkIdentity
// ───────────────────────────────────────────────────────────────

/// Credentials for joining an existing network. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkIdentity {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl NetworkIdentity {
    /// Build a validated identity. An empty `password` means an open network.
    pub fn new(ssid: &str, password: &str) -> Result<Self, IdentityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|_| IdentityError::InvalidSsid)?;
        let mut p = heapless::String::new();
        p.push_str(password)
            .map_err(|_| IdentityError::InvalidPassword)?;
        Ok(Self { ssid: s, password: p })
    }

    /// Identity for an open (passwordless) network.
    pub fn open(ssid: &str) -> Result<Self, IdentityError> {
        Self::new(ssid, "")
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// True when no password is set (open network).
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// ApConfiguration
// ───────────────────────────────────────────────────────────────

/// Parameters for the device's own access point: the gateway address it
/// presents, its subnet mask, and the advertised SSID. The AP is always
/// open; the contract carries no password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApConfiguration {
    gateway: Ipv4Addr,
    subnet_mask: Ipv4Addr,
    prefix_len: u8,
    ssid: heapless::String<32>,
}

impl ApConfiguration {
    pub fn new(gateway: Ipv4Addr, subnet_mask: Ipv4Addr, ssid: &str) -> Result<Self, IdentityError> {
        validate_ssid(ssid)?;
        if gateway.is_unspecified() || gateway.is_broadcast() {
            return Err(IdentityError::InvalidGateway);
        }
        let prefix_len = mask_prefix_len(subnet_mask).ok_or(IdentityError::InvalidSubnetMask)?;
        if prefix_len == 0 || prefix_len > 30 {
            // Contiguous is not enough: /0 hosts no subnet at all, and /31
            // or /32 leaves no addresses for joining stations.
            return Err(IdentityError::InvalidSubnetMask);
        }
        let mut s = heapless::String::new();
        s.push_str(ssid).map_err(|_| IdentityError::InvalidSsid)?;
        Ok(Self {
            gateway,
            subnet_mask,
            prefix_len,
            ssid: s,
        })
    }

    pub fn gateway(&self) -> Ipv4Addr {
        self.gateway
    }

    pub fn subnet_mask(&self) -> Ipv4Addr {
        self.subnet_mask
    }

    /// CIDR prefix length equivalent of the subnet mask.
    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
