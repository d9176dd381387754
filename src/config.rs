//! Network configuration parameters
//!
//! All tunable parameters for fan-controller connectivity.
//! Today these come from built-in defaults; a provisioning surface
//! (serial console or captive portal) can overwrite them later.

use core::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::app::identity::{ApConfiguration, IdentityError, NetworkIdentity};

/// Connectivity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    // --- Station (join an existing network) ---
    /// Target network SSID; empty means station mode is not attempted
    pub sta_ssid: heapless::String<32>,
    /// Target network password; empty means open network
    pub sta_password: heapless::String<64>,
    /// How long to wait for association (milliseconds)
    pub sta_timeout_ms: u32,

    // --- Access point (device hosts its own network) ---
    /// SSID the device broadcasts in AP mode
    pub ap_ssid: heapless::String<32>,
    /// Address the device presents as gateway on its own subnet
    pub ap_gateway: Ipv4Addr,
    /// Subnet mask for the device-hosted network
    pub ap_subnet_mask: Ipv4Addr,
}

impl NetworkConfig {
    /// True when a station SSID has been provisioned.
    pub fn has_sta_credentials(&self) -> bool {
        !self.sta_ssid.is_empty()
    }

    /// Validated station credentials, ready for the connectivity manager.
    pub fn station_identity(&self) -> Result<NetworkIdentity, IdentityError> {
        NetworkIdentity::new(self.sta_ssid.as_str(), self.sta_password.as_str())
    }

    /// Validated AP parameters, ready for the connectivity manager.
    pub fn ap_configuration(&self) -> Result<ApConfiguration, IdentityError> {
        ApConfiguration::new(self.ap_gateway, self.ap_subnet_mask, self.ap_ssid.as_str())
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let mut ap_ssid = heapless::String::new();
        // Factory AP name; fits well inside the 32-byte SSID bound.
        let _ = ap_ssid.push_str("fanctl-setup");

        Self {
            // Station: unprovisioned out of the box
            sta_ssid: heapless::String::new(),
            sta_password: heapless::String::new(),
            sta_timeout_ms: 15_000, // 15 s covers slow DHCP servers

            // Access point: the classic ESP32 softap subnet
            ap_ssid,
            ap_gateway: Ipv4Addr::new(192, 168, 4, 1),
            ap_subnet_mask: Ipv4Addr::new(255, 255, 255, 0),
        }
    }
}
