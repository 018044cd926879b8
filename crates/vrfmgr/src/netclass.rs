//! Read-only view of the kernel network class directory.
//!
//! VRF IDs are the interface indexes of the `vrf<name>` master devices, so
//! name/ID resolution only needs two things from the kernel: the `ifindex`
//! attribute of a device and the list of devices. [`NetClass`] is that
//! capability; [`SysfsNetClass`] serves it from `/sys/class/net` or from any
//! directory laid out the same way.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{VrfMgrError, VrfMgrResult};
use crate::tokenize::parse_leading_u32;
use crate::types::SYS_CLASS_NET;

/// Prefix of the sysfs entries linking a master device to its enslaved
/// devices (`lower_<dev>`)
const LOWER_PREFIX: &str = "lower_";

/// Source of network interface state.
pub trait NetClass {
    /// Interface index of device `ifname`.
    fn ifindex(&self, ifname: &OsStr) -> VrfMgrResult<u32>;

    /// Names of all devices, in directory order.
    ///
    /// Names are returned as the kernel reports them, UTF-8 or not, so each
    /// one can be passed back to [`NetClass::ifindex`].
    fn interfaces(&self) -> VrfMgrResult<Vec<OsString>>;

    /// Names of the devices enslaved to master device `ifname`, sorted.
    fn lower_interfaces(&self, ifname: &str) -> VrfMgrResult<Vec<String>>;
}

/// Reject names that would escape the device's own directory.
pub fn validate_ifname(ifname: impl AsRef<OsStr>) -> VrfMgrResult<()> {
    let ifname = ifname.as_ref();
    let bytes = ifname.as_encoded_bytes();

    if bytes.is_empty() {
        return Err(VrfMgrError::invalid_name("", "empty name"));
    }

    if bytes.contains(&b'/') || bytes.contains(&0) {
        return Err(VrfMgrError::invalid_name(
            ifname.to_string_lossy(),
            "name contains invalid characters",
        ));
    }

    if bytes == b"." || bytes == b".." {
        return Err(VrfMgrError::invalid_name(
            ifname.to_string_lossy(),
            "name is a path component",
        ));
    }

    Ok(())
}

/// [`NetClass`] backed by a sysfs style directory tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsNetClass {
    root: PathBuf,
}

impl SysfsNetClass {
    /// Serve interface state from `root` (normally `/sys/class/net`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this instance reads.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn device_dir(&self, ifname: &OsStr) -> VrfMgrResult<PathBuf> {
        validate_ifname(ifname)?;
        Ok(self.root.join(ifname))
    }
}

impl Default for SysfsNetClass {
    fn default() -> Self {
        Self::new(SYS_CLASS_NET)
    }
}

impl NetClass for SysfsNetClass {
    fn ifindex(&self, ifname: &OsStr) -> VrfMgrResult<u32> {
        let path = self.device_dir(ifname)?.join("ifindex");
        let content = fs::read(&path).map_err(|e| VrfMgrError::io(&path, e))?;

        parse_leading_u32(&String::from_utf8_lossy(&content)).ok_or_else(|| {
            VrfMgrError::not_found(format!("ifindex of {}", ifname.to_string_lossy()))
        })
    }

    fn interfaces(&self) -> VrfMgrResult<Vec<OsString>> {
        let entries = fs::read_dir(&self.root).map_err(|e| VrfMgrError::io(&self.root, e))?;

        let names: Vec<OsString> = entries.flatten().map(|entry| entry.file_name()).collect();
        debug!("Found {} devices under {}", names.len(), self.root.display());
        Ok(names)
    }

    fn lower_interfaces(&self, ifname: &str) -> VrfMgrResult<Vec<String>> {
        let dir = self.device_dir(OsStr::new(ifname))?;
        let entries = fs::read_dir(&dir).map_err(|e| VrfMgrError::io(&dir, e))?;

        let mut names: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                name.strip_prefix(LOWER_PREFIX).map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn add_device(root: &Path, name: &str, ifindex: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("ifindex"), ifindex).unwrap();
    }

    #[test]
    fn test_validate_ifname() {
        assert!(validate_ifname("vrfblue").is_ok());
        assert!(validate_ifname("").is_err());
        assert!(validate_ifname("vrf/../etc").is_err());
        assert!(validate_ifname("..").is_err());
        assert!(validate_ifname("a\0b").is_err());
    }

    #[test]
    fn test_ifindex() {
        let dir = TempDir::new().unwrap();
        add_device(dir.path(), "vrfblue", "10\n");

        let net = SysfsNetClass::new(dir.path());
        assert_eq!(net.ifindex(OsStr::new("vrfblue")).unwrap(), 10);
    }

    #[test]
    fn test_ifindex_missing_device() {
        let dir = TempDir::new().unwrap();
        let net = SysfsNetClass::new(dir.path());

        let err = net.ifindex(OsStr::new("vrfnone")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_ifindex_garbage() {
        let dir = TempDir::new().unwrap();
        add_device(dir.path(), "vrfbad", "not-a-number\n");

        let net = SysfsNetClass::new(dir.path());
        assert!(net.ifindex(OsStr::new("vrfbad")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_ifindex_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let net = SysfsNetClass::new(dir.path());

        assert!(matches!(
            net.ifindex(OsStr::new("../x")),
            Err(VrfMgrError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_interfaces() {
        let dir = TempDir::new().unwrap();
        add_device(dir.path(), "lo", "1");
        add_device(dir.path(), "vrfred", "9");

        let net = SysfsNetClass::new(dir.path());
        let mut names = net.interfaces().unwrap();
        names.sort();
        assert_eq!(names, vec![OsString::from("lo"), OsString::from("vrfred")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_interfaces_keeps_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let ifname = OsStr::from_bytes(b"vrfbl\xe9u");
        fs::create_dir(dir.path().join(ifname)).unwrap();
        fs::write(dir.path().join(ifname).join("ifindex"), "14\n").unwrap();

        let net = SysfsNetClass::new(dir.path());
        let names = net.interfaces().unwrap();
        assert_eq!(names, vec![ifname.to_os_string()]);
        assert_eq!(net.ifindex(ifname).unwrap(), 14);
    }

    #[test]
    fn test_interfaces_missing_root() {
        let net = SysfsNetClass::new("/nonexistent/sys/class/net");
        assert!(net.interfaces().unwrap_err().is_not_found());
    }

    #[test]
    fn test_lower_interfaces() {
        let dir = TempDir::new().unwrap();
        add_device(dir.path(), "vrfblue", "10");
        let master = dir.path().join("vrfblue");
        fs::create_dir(master.join("lower_eth2")).unwrap();
        fs::create_dir(master.join("lower_eth1")).unwrap();
        fs::write(master.join("mtu"), "65575").unwrap();

        let net = SysfsNetClass::new(dir.path());
        assert_eq!(
            net.lower_interfaces("vrfblue").unwrap(),
            vec!["eth1".to_string(), "eth2".to_string()]
        );
    }

    #[test]
    fn test_default_root() {
        assert_eq!(SysfsNetClass::default().root(), Path::new("/sys/class/net"));
    }
}
