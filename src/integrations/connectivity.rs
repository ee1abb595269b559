// src/integrations/connectivity.rs
//
// Network reachability probe
//
// Answers "is any cellular, WiFi or wired transport usable right now"
// from the platform's interface snapshot. Never issues a network call.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

pub trait ConnectivityProbe: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Transport class of a network interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Cellular,
    Wifi,
    Ethernet,
}

/// Reads `/sys/class/net`. A missing or unreadable snapshot counts as offline.
pub struct SystemConnectivityProbe {
    sysfs_root: PathBuf,
}

impl SystemConnectivityProbe {
    pub fn new() -> Self {
        Self::with_root("/sys/class/net")
    }

    pub fn with_root(sysfs_root: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: sysfs_root.into(),
        }
    }

    /// Classify an interface from its sysfs entry
    fn transport_of(iface: &Path) -> Option<Transport> {
        let name = iface.file_name()?.to_str()?;

        if iface.join("wireless").exists() || iface.join("phy80211").exists() {
            return Some(Transport::Wifi);
        }

        // ARPHRD_ETHER; loopback is 772, tunnels and bridges are skipped below
        let arp_type = fs::read_to_string(iface.join("type")).ok()?;
        if arp_type.trim() != "1" {
            return match name {
                n if n.starts_with("wwan") || n.starts_with("rmnet") => Some(Transport::Cellular),
                _ => None,
            };
        }

        match name {
            n if n.starts_with("wl") => Some(Transport::Wifi),
            n if n.starts_with("wwan") || n.starts_with("rmnet") => Some(Transport::Cellular),
            n if n.starts_with("docker") || n.starts_with("veth") || n.starts_with("br-") => None,
            _ => Some(Transport::Ethernet),
        }
    }

    fn is_up(iface: &Path) -> bool {
        fs::read_to_string(iface.join("operstate"))
            .map(|state| state.trim() == "up")
            .unwrap_or(false)
    }

    /// Transports whose interface is currently up
    pub fn active_transports(&self) -> Vec<Transport> {
        let entries = match fs::read_dir(&self.sysfs_root) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("no interface snapshot at {}: {}", self.sysfs_root.display(), e);
                return Vec::new();
            }
        };

        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|iface| Self::is_up(iface))
            .filter_map(|iface| Self::transport_of(&iface))
            .collect()
    }
}

impl Default for SystemConnectivityProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityProbe for SystemConnectivityProbe {
    fn is_online(&self) -> bool {
        !self.active_transports().is_empty()
    }
}

/// Fixed answer that can be flipped at runtime
pub struct StaticConnectivity {
    online: AtomicBool,
}

impl StaticConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl ConnectivityProbe for StaticConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
