//! Configuration file support
//!
//! Loads the locations of the VRF backing sources from a TOML file.
//! Default location: /etc/sonic/vrfmgr.conf
//!
//! ```toml
//! route_domain_conf = "/run/route-domain.conf"
//! net_class_dir = "/sys/class/net"
//! name_style = "prefixed"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{VrfMgrError, VrfMgrResult};
use crate::types::{ListNameStyle, ROUTE_DOMAIN_CONF, SYS_CLASS_NET};

/// Default configuration file location
pub const VRFMGR_CONF: &str = "/etc/sonic/vrfmgr.conf";

/// VRF resolution configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfMgrConfig {
    /// Route domain mapping file
    #[serde(default = "default_route_domain_conf")]
    pub route_domain_conf: PathBuf,

    /// Kernel network class directory
    #[serde(default = "default_net_class_dir")]
    pub net_class_dir: PathBuf,

    /// How names are presented by the mapping list
    #[serde(default)]
    pub name_style: ListNameStyle,
}

fn default_route_domain_conf() -> PathBuf {
    PathBuf::from(ROUTE_DOMAIN_CONF)
}

fn default_net_class_dir() -> PathBuf {
    PathBuf::from(SYS_CLASS_NET)
}

impl Default for VrfMgrConfig {
    fn default() -> Self {
        Self {
            route_domain_conf: default_route_domain_conf(),
            net_class_dir: default_net_class_dir(),
            name_style: ListNameStyle::default(),
        }
    }
}

impl VrfMgrConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> VrfMgrResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content)
                    .map_err(|e| VrfMgrError::config(path, e.to_string()))?;
                config.validate(path)?;
                info!("Loaded VRF configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    "Config file {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(VrfMgrError::io(path, e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> VrfMgrResult<Self> {
        Self::load_or_default(VRFMGR_CONF)
    }

    /// Validate configuration loaded from `origin`
    pub fn validate(&self, origin: &Path) -> VrfMgrResult<()> {
        if self.route_domain_conf.as_os_str().is_empty() {
            return Err(VrfMgrError::config(origin, "route_domain_conf must not be empty"));
        }

        if self.net_class_dir.as_os_str().is_empty() {
            return Err(VrfMgrError::config(origin, "net_class_dir must not be empty"));
        }

        Ok(())
    }
}
