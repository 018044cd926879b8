//! VRF Manager - name, ID and kernel table resolution

use std::collections::HashMap;
use std::ffi::OsStr;

use tracing::{debug, instrument};

use crate::config::VrfMgrConfig;
use crate::error::{VrfMgrError, VrfMgrResult};
use crate::netclass::{NetClass, SysfsNetClass};
use crate::route_domain::RouteDomainConf;
use crate::types::*;
use crate::vrf::{Vrf, VrfIndex};

/// VRF Manager
///
/// Resolves VRF names to IDs and back through the kernel's VRF master devices,
/// and reads VRF mappings and kernel table IDs from the route domain file.
/// Holds no VRF state of its own: every call reads its sources afresh.
#[derive(Debug, Clone)]
pub struct VrfMgr<N = SysfsNetClass> {
    net: N,
    conf: RouteDomainConf,
    name_style: ListNameStyle,
}

impl VrfMgr<SysfsNetClass> {
    /// Create a VrfMgr reading the system default locations
    pub fn new() -> Self {
        Self::from_config(&VrfMgrConfig::default())
    }

    /// Create a VrfMgr reading the locations named in `config`
    pub fn from_config(config: &VrfMgrConfig) -> Self {
        Self::with_sources(
            SysfsNetClass::new(&config.net_class_dir),
            RouteDomainConf::new(&config.route_domain_conf),
        )
        .with_name_style(config.name_style)
    }
}

impl Default for VrfMgr<SysfsNetClass> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: NetClass> VrfMgr<N> {
    /// Create a VrfMgr over explicit sources
    pub fn with_sources(net: N, conf: RouteDomainConf) -> Self {
        Self {
            net,
            conf,
            name_style: ListNameStyle::default(),
        }
    }

    /// Override how [`VrfMgr::get_vrf_list`] presents names
    pub fn with_name_style(mut self, name_style: ListNameStyle) -> Self {
        self.name_style = name_style;
        self
    }

    pub fn net_class(&self) -> &N {
        &self.net
    }

    pub fn route_domain_conf(&self) -> &RouteDomainConf {
        &self.conf
    }

    pub fn name_style(&self) -> ListNameStyle {
        self.name_style
    }

    /// Get the VRF ID of `vrf_name`.
    ///
    /// Returns [`VrfId::INVALID`] for an absent or empty name and when the
    /// VRF master device does not exist or its index cannot be read.
    /// `"default"` resolves to [`VrfId::DEFAULT`] without touching the
    /// system.
    #[instrument(skip(self, vrf_name), level = "debug")]
    pub fn get_vrf_id<'a>(&self, vrf_name: impl Into<Option<&'a str>>) -> VrfId {
        let vrf_name = match vrf_name.into() {
            None => return VrfId::INVALID,
            Some(name) if name == VRF_NAME_NONE => return VrfId::INVALID,
            Some(name) if name == VRF_NAME_DEFAULT => return VrfId::DEFAULT,
            Some(name) => name,
        };

        match self.net.ifindex(OsStr::new(&master_interface_name(vrf_name))) {
            Ok(ifindex) => VrfId::new(ifindex),
            Err(e) => {
                debug!("No VRF ID for {}: {}", vrf_name, e);
                VrfId::INVALID
            }
        }
    }

    /// Get the name of the VRF with ID `vrf_id`.
    ///
    /// Scans the VRF master devices in directory order and returns the first
    /// whose index equals `vrf_id`, truncated to `VRF_NAME_SIZE - 1` bytes.
    /// A device named `vrf` alone yields the empty name, and bytes that are
    /// not UTF-8 are replaced with U+FFFD. `vrfdefault` never matches since
    /// `"default"` always resolves to [`VrfId::DEFAULT`].
    /// [`VrfId::DEFAULT`] resolves to `"default"` without touching the system.
    #[instrument(skip(self), level = "debug")]
    pub fn get_vrf_name(&self, vrf_id: VrfId) -> Option<String> {
        if vrf_id == VrfId::INVALID {
            return None;
        }
        if vrf_id == VrfId::DEFAULT {
            return Some(VRF_NAME_DEFAULT.to_string());
        }

        let interfaces = match self.net.interfaces() {
            Ok(interfaces) => interfaces,
            Err(e) => {
                debug!("Unable to list VRF master devices: {}", e);
                return None;
            }
        };

        let name = interfaces
            .iter()
            .filter_map(|ifname| {
                let suffix = ifname
                    .as_encoded_bytes()
                    .strip_prefix(VRF_MASTER_PREFIX.as_bytes())?;
                Some((ifname, suffix))
            })
            .filter(|(_, suffix)| *suffix != VRF_NAME_DEFAULT.as_bytes())
            .find(|(ifname, _)| {
                matches!(self.net.ifindex(ifname), Ok(ifindex) if VrfId::new(ifindex) == vrf_id)
            })
            .map(|(_, suffix)| bounded_name(&String::from_utf8_lossy(suffix)));

        if name.is_none() {
            debug!("No VRF with ID {}", vrf_id);
        }
        name
    }

    /// Get every VRF name to VRF ID mapping in the route domain file.
    ///
    /// Returns an empty list if the file is missing or unreadable.
    #[instrument(skip(self), level = "debug")]
    pub fn get_vrf_list(&self) -> Vec<VrfMap> {
        self.conf
            .load_vrf_list(self.name_style)
            .unwrap_or_else(|e| {
                debug!("No VRF mappings: {}", e);
                Vec::new()
            })
    }

    /// Get the kernel table ID of PBR table `pbr_tid` in VRF `vrf_name`.
    ///
    /// Returns [`TableId::UNSPEC`] for an absent or empty name without reading
    /// the route domain file, and for a missing file or when no entry matches.
    #[instrument(skip(self, vrf_name), level = "debug")]
    pub fn get_vrf_kernel_table_id<'a>(
        &self,
        vrf_name: impl Into<Option<&'a str>>,
        pbr_tid: TableId,
    ) -> TableId {
        let vrf_name = match vrf_name.into() {
            None => return TableId::UNSPEC,
            Some(name) if name == VRF_NAME_NONE => return TableId::UNSPEC,
            Some(name) => name,
        };

        match self.conf.kernel_table_id(vrf_name, pbr_tid) {
            Ok(Some(tid)) => tid,
            Ok(None) => {
                debug!("No kernel table for VRF {} PBR table {}", vrf_name, pbr_tid);
                TableId::UNSPEC
            }
            Err(e) => {
                debug!("No kernel table for VRF {}: {}", vrf_name, e);
                TableId::UNSPEC
            }
        }
    }

    /// Get every configured VRF with the devices bound to its master device.
    ///
    /// Names are reported as configured. When a name appears more than once
    /// the last ID wins and the VRF keeps its first position.
    #[instrument(skip(self), level = "debug")]
    pub fn get_vrfs(&self) -> VrfMgrResult<Vec<Vrf>> {
        let mappings = self.conf.load_vrf_list(ListNameStyle::Native)?;

        let mut order: Vec<String> = Vec::new();
        let mut ids: HashMap<String, VrfId> = HashMap::new();
        for map in mappings {
            if ids.insert(map.vrf_name.clone(), map.vrf_id).is_none() {
                order.push(map.vrf_name);
            }
        }

        let mut vrfs = Vec::with_capacity(order.len());
        for name in order {
            let id = ids[&name];
            let interfaces = self.bound_interfaces(&name)?;
            vrfs.push(Vrf::with_interfaces(id, name, interfaces));
        }
        Ok(vrfs)
    }

    /// Get every configured VRF, addressable by ID and by name.
    ///
    /// Fails with [`VrfMgrError::DuplicateVrf`] if two VRFs share an ID.
    pub fn get_vrfs_index(&self) -> VrfMgrResult<VrfIndex> {
        VrfIndex::from_vrfs(self.get_vrfs()?)
    }

    fn bound_interfaces(&self, vrf_name: &str) -> VrfMgrResult<Vec<String>> {
        match self.net.lower_interfaces(&master_interface_name(vrf_name)) {
            Ok(interfaces) => Ok(interfaces),
            Err(e) if e.is_not_found() || matches!(e, VrfMgrError::InvalidName { .. }) => {
                debug!("VRF {} has no master device: {}", vrf_name, e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}

/// Get the VRF ID of `vrf_name` from the system default locations.
pub fn get_vrf_id<'a>(vrf_name: impl Into<Option<&'a str>>) -> VrfId {
    VrfMgr::new().get_vrf_id(vrf_name)
}

/// Get the name of the VRF with ID `vrf_id` from the system default locations.
pub fn get_vrf_name(vrf_id: VrfId) -> Option<String> {
    VrfMgr::new().get_vrf_name(vrf_id)
}

/// Get every VRF mapping from the system default route domain file.
pub fn get_vrf_list() -> Vec<VrfMap> {
    VrfMgr::new().get_vrf_list()
}

/// Get the kernel table ID of a VRF's PBR table from the system default route
/// domain file.
pub fn get_vrf_kernel_table_id<'a>(
    vrf_name: impl Into<Option<&'a str>>,
    pbr_tid: TableId,
) -> TableId {
    VrfMgr::new().get_vrf_kernel_table_id(vrf_name, pbr_tid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::ffi::OsString;

    /// In-memory NetClass counting how often it is consulted
    #[derive(Default)]
    struct MockNetClass {
        devices: Vec<(String, u32, Vec<String>)>,
        calls: Cell<usize>,
    }

    impl MockNetClass {
        fn with_device(mut self, ifname: &str, ifindex: u32, lower: &[&str]) -> Self {
            self.devices.push((
                ifname.to_string(),
                ifindex,
                lower.iter().map(|s| s.to_string()).collect(),
            ));
            self
        }
    }

    impl NetClass for MockNetClass {
        fn ifindex(&self, ifname: &OsStr) -> VrfMgrResult<u32> {
            self.calls.set(self.calls.get() + 1);
            self.devices
                .iter()
                .find(|(name, _, _)| OsStr::new(name) == ifname)
                .map(|(_, ifindex, _)| *ifindex)
                .ok_or_else(|| VrfMgrError::not_found(ifname.to_string_lossy()))
        }

        fn interfaces(&self) -> VrfMgrResult<Vec<OsString>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self
                .devices
                .iter()
                .map(|(name, _, _)| OsString::from(name))
                .collect())
        }

        fn lower_interfaces(&self, ifname: &str) -> VrfMgrResult<Vec<String>> {
            self.calls.set(self.calls.get() + 1);
            self.devices
                .iter()
                .find(|(name, _, _)| name == ifname)
                .map(|(_, _, lower)| lower.clone())
                .ok_or_else(|| VrfMgrError::not_found(ifname))
        }
    }

    fn mgr(net: MockNetClass) -> VrfMgr<MockNetClass> {
        VrfMgr::with_sources(net, RouteDomainConf::new("/nonexistent/route-domain.conf"))
    }

    fn sample_net() -> MockNetClass {
        MockNetClass::default()
            .with_device("lo", 1, &[])
            .with_device("vrfred", 9, &["eth1"])
            .with_device("vrfblue", 10, &[])
            .with_device("vrf100", 11, &[])
    }

    #[test]
    fn test_get_vrf_id() {
        let mgr = mgr(sample_net());
        assert_eq!(mgr.get_vrf_id("blue"), VrfId::new(10));
        assert_eq!(mgr.get_vrf_id("red"), VrfId::new(9));
        assert_eq!(mgr.get_vrf_id("100"), VrfId::new(11));
    }

    #[test]
    fn test_get_vrf_id_sentinels() {
        let mgr = mgr(sample_net());
        assert_eq!(mgr.get_vrf_id(None), VrfId::INVALID);
        assert_eq!(mgr.get_vrf_id(""), VrfId::INVALID);
        assert_eq!(mgr.get_vrf_id("test3"), VrfId::INVALID);
        assert_eq!(mgr.get_vrf_id("default"), VrfId::DEFAULT);
    }

    #[test]
    fn test_default_resolution_skips_io() {
        let mgr = mgr(sample_net());
        assert_eq!(mgr.get_vrf_id("default"), VrfId::DEFAULT);
        assert_eq!(mgr.get_vrf_name(VrfId::DEFAULT).as_deref(), Some("default"));
        assert_eq!(mgr.get_vrf_name(VrfId::INVALID), None);
        assert_eq!(mgr.get_vrf_id(None), VrfId::INVALID);
        assert_eq!(mgr.net_class().calls.get(), 0);
    }

    #[test]
    fn test_get_vrf_name() {
        let mgr = mgr(sample_net());
        assert_eq!(mgr.get_vrf_name(VrfId::new(10)).as_deref(), Some("blue"));
        assert_eq!(mgr.get_vrf_name(VrfId::new(9)).as_deref(), Some("red"));
        assert_eq!(mgr.get_vrf_name(VrfId::new(11)).as_deref(), Some("100"));
    }

    #[test]
    fn test_get_vrf_name_unregistered() {
        let mgr = mgr(sample_net());
        // lo has ifindex 1 but is not a VRF master; 3 matches nothing
        assert_eq!(mgr.get_vrf_name(VrfId::new(3)), None);
    }

    #[test]
    fn test_get_vrf_name_first_match_wins() {
        let net = MockNetClass::default()
            .with_device("vrfgreen", 12, &[])
            .with_device("vrfgreen2", 12, &[]);
        let mgr = mgr(net);
        assert_eq!(mgr.get_vrf_name(VrfId::new(12)).as_deref(), Some("green"));
    }

    #[test]
    fn test_get_vrf_name_truncates() {
        let long = "q".repeat(90);
        let net = MockNetClass::default().with_device(&master_interface_name(&long), 20, &[]);
        let mgr = mgr(net);

        let name = mgr.get_vrf_name(VrfId::new(20)).unwrap();
        assert_eq!(name.len(), VRF_NAME_SIZE - 1);
    }

    #[test]
    fn test_round_trip() {
        let mgr = mgr(sample_net());
        for name in ["red", "blue", "100", "default"] {
            let id = mgr.get_vrf_id(name);
            assert_eq!(mgr.get_vrf_name(id).as_deref(), Some(name));
        }
    }

    #[test]
    fn test_missing_route_domain_conf() {
        let mgr = mgr(sample_net());
        assert!(mgr.get_vrf_list().is_empty());
        assert_eq!(mgr.get_vrf_kernel_table_id("red", TableId::MAIN), TableId::UNSPEC);
        assert!(mgr.get_vrfs().unwrap_err().is_not_found());
    }

    #[test]
    fn test_kernel_table_id_absent_name() {
        let mgr = mgr(sample_net());
        assert_eq!(mgr.get_vrf_kernel_table_id(None, TableId::MAIN), TableId::UNSPEC);
    }

    #[test]
    fn test_kernel_table_id_empty_name() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("route-domain.conf");
        std::fs::write(&path, "red 254 257\n").unwrap();
        let mgr = VrfMgr::with_sources(MockNetClass::default(), RouteDomainConf::new(&path));

        assert_eq!(mgr.get_vrf_kernel_table_id("", TableId::MAIN), TableId::UNSPEC);
        assert_eq!(mgr.get_vrf_kernel_table_id("red", TableId::MAIN), TableId::new(257));
    }

    #[test]
    fn test_get_vrf_name_bare_master_device() {
        let net = MockNetClass::default()
            .with_device("vrf", 7, &[])
            .with_device("vrfred", 9, &[]);
        let mgr = mgr(net);
        assert_eq!(mgr.get_vrf_name(VrfId::new(7)).as_deref(), Some(""));
        assert_eq!(mgr.get_vrf_name(VrfId::new(9)).as_deref(), Some("red"));
    }

    #[test]
    fn test_get_vrf_name_skips_vrfdefault() {
        let net = MockNetClass::default()
            .with_device("vrfdefault", 5, &[])
            .with_device("vrfother", 5, &[]);
        let mgr = mgr(net);
        assert_eq!(mgr.get_vrf_name(VrfId::new(5)).as_deref(), Some("other"));
    }

    #[test]
    fn test_vrf_mgr_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VrfMgr>();
        assert_send_sync::<VrfMgr<SysfsNetClass>>();
    }

    #[test]
    fn test_name_style_builder() {
        let mgr = mgr(sample_net()).with_name_style(ListNameStyle::Native);
        assert_eq!(mgr.name_style(), ListNameStyle::Native);
    }

    #[test]
    fn test_from_config() {
        let config = VrfMgrConfig {
            route_domain_conf: "/tmp/rd.conf".into(),
            net_class_dir: "/tmp/net".into(),
            name_style: ListNameStyle::Native,
        };
        let mgr = VrfMgr::from_config(&config);
        assert_eq!(mgr.net_class().root(), std::path::Path::new("/tmp/net"));
        assert_eq!(
            mgr.route_domain_conf().path(),
            std::path::Path::new("/tmp/rd.conf")
        );
        assert_eq!(mgr.name_style(), ListNameStyle::Native);
    }
}
