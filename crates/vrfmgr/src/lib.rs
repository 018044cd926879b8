//! VRF identifier resolution for SONiC
//!
//! Translates between VRF names and the numeric identifiers used by the
//! kernel and the routing stack:
//!
//! - [`VrfMgr::get_vrf_id`] / [`VrfMgr::get_vrf_name`]: name and ID of a VRF,
//!   backed by the `vrf<name>` master devices under `/sys/class/net`
//! - [`VrfMgr::get_vrf_list`]: every mapping in `/run/route-domain.conf`
//! - [`VrfMgr::get_vrf_kernel_table_id`]: kernel table behind a VRF's PBR table
//! - [`VrfMgr::get_vrfs`]: configured VRFs with their bound devices
//!
//! Lookups never fail loudly. A missing VRF, a missing file and an unreadable
//! file all produce the same sentinel: [`VrfId::INVALID`], `None`, an empty
//! list or [`TableId::UNSPEC`].
//!
//! # Example
//!
//! ```no_run
//! use sonic_vrfmgr::{TableId, VrfId, VrfMgr};
//!
//! let mgr = VrfMgr::new();
//! let id = mgr.get_vrf_id("blue");
//! if id != VrfId::INVALID {
//!     println!("blue is VRF {}", id);
//! }
//! let tid = mgr.get_vrf_kernel_table_id("blue", TableId::MAIN);
//! ```

pub mod config;
pub mod error;
pub mod netclass;
pub mod route_domain;
pub mod tokenize;
mod types;
mod vrf;
mod vrf_mgr;

pub use config::VrfMgrConfig;
pub use error::{VrfMgrError, VrfMgrResult};
pub use netclass::{NetClass, SysfsNetClass};
pub use route_domain::RouteDomainConf;
pub use types::*;
pub use vrf::{Vrf, VrfIndex};
pub use vrf_mgr::{get_vrf_id, get_vrf_kernel_table_id, get_vrf_list, get_vrf_name, VrfMgr};
