//! Type definitions for VRF identifier resolution

use serde::{Deserialize, Serialize};

/// VRF master device name prefix (`vrf<name>`)
pub const VRF_MASTER_PREFIX: &str = "vrf";

/// Reserved name of the default routing domain
pub const VRF_NAME_DEFAULT: &str = "default";

/// Name reported when no VRF matches
pub const VRF_NAME_NONE: &str = "";

/// VRF name buffer size including the terminator; stored names hold at most
/// `VRF_NAME_SIZE - 1` bytes
pub const VRF_NAME_SIZE: usize = 65;

/// Default location of the route domain mapping file
pub const ROUTE_DOMAIN_CONF: &str = "/run/route-domain.conf";

/// Default location of the kernel network class directory
pub const SYS_CLASS_NET: &str = "/sys/class/net";

/// VRF identifier (kernel ifindex of the VRF master device)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VrfId(u32);

impl VrfId {
    /// Sentinel for "not found" or bad input
    pub const INVALID: VrfId = VrfId(0);

    /// The always-present default routing domain
    pub const DEFAULT: VrfId = VrfId(1);

    /// Largest usable VRF ID
    pub const MAX: VrfId = VrfId(4095);

    /// Create a new VRF ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw VRF ID value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// True unless this is [`VrfId::INVALID`]
    pub const fn is_valid(&self) -> bool {
        self.0 != Self::INVALID.0
    }

    /// True if the ID lies in the usable range `(INVALID, MAX]`
    pub const fn in_range(&self) -> bool {
        self.0 > Self::INVALID.0 && self.0 <= Self::MAX.0
    }
}

impl Default for VrfId {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<u32> for VrfId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for VrfId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for VrfId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse::<u32>()?;
        Ok(Self(id))
    }
}

/// Kernel routing table identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(u32);

impl TableId {
    /// `RT_TABLE_UNSPEC`, reported when no table matches
    pub const UNSPEC: TableId = TableId(0);

    /// `RT_TABLE_MAIN`
    pub const MAIN: TableId = TableId(254);

    /// Create a new table ID
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw table ID value
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// True for [`TableId::UNSPEC`]
    pub const fn is_unspec(&self) -> bool {
        self.0 == Self::UNSPEC.0
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::UNSPEC
    }
}

impl From<u32> for TableId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TableId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse::<u32>()?;
        Ok(Self(id))
    }
}

/// One VRF name to VRF ID mapping from the route domain file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfMap {
    /// VRF name, bounded to `VRF_NAME_SIZE - 1` bytes
    pub vrf_name: String,
    /// VRF ID
    pub vrf_id: VrfId,
}

impl VrfMap {
    /// Create a new mapping, truncating the name to the name size bound
    pub fn new(vrf_name: &str, vrf_id: VrfId) -> Self {
        Self {
            vrf_name: bounded_name(vrf_name),
            vrf_id,
        }
    }
}

/// How mapping list names are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListNameStyle {
    /// Names carry the master device prefix (`vrfblue`), for platforms
    /// without native routing domains
    Prefixed,
    /// Names are reported exactly as configured (`blue`)
    Native,
}

impl Default for ListNameStyle {
    fn default() -> Self {
        if cfg!(feature = "native-rtdomain") {
            ListNameStyle::Native
        } else {
            ListNameStyle::Prefixed
        }
    }
}

impl ListNameStyle {
    /// Render a configured name in this style, bounded to the name size
    pub fn render(&self, name: &str) -> String {
        match self {
            ListNameStyle::Prefixed => bounded_name(&master_interface_name(name)),
            ListNameStyle::Native => bounded_name(name),
        }
    }
}

/// Name of the VRF master device for a VRF (`vrf<name>`)
pub fn master_interface_name(vrf_name: &str) -> String {
    format!("{}{}", VRF_MASTER_PREFIX, vrf_name)
}

/// Truncate a name to `VRF_NAME_SIZE - 1` bytes on a character boundary
pub fn bounded_name(name: &str) -> String {
    let limit = VRF_NAME_SIZE - 1;
    if name.len() <= limit {
        return name.to_string();
    }

    let mut end = limit;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}
