//! Test fixtures for VRF resolution
//!
//! Builds throwaway copies of the two external inputs: a sysfs-like network
//! class directory and the route domain mapping file.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::{NamedTempFile, TempDir};
use tracing::debug;

/// Temporary directory laid out like `/sys/class/net`
#[derive(Debug)]
pub struct NetClassFixture {
    dir: TempDir,
}

impl NetClassFixture {
    /// Create an empty network class directory
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Path to pass as the network class directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add device `ifname` with interface index `ifindex`
    pub fn with_device(self, ifname: &str, ifindex: u32) -> io::Result<Self> {
        self.with_raw_ifindex(ifname, &format!("{}\n", ifindex))
    }

    /// Add device `ifname` whose `ifindex` attribute holds `content` verbatim
    pub fn with_raw_ifindex(self, ifname: &str, content: &str) -> io::Result<Self> {
        let dev = self.dir.path().join(ifname);
        fs::create_dir_all(&dev)?;
        fs::write(dev.join("ifindex"), content)?;
        debug!("fixture device {} ifindex {:?}", ifname, content);
        Ok(self)
    }

    /// Add VRF master device `vrf<vrf_name>` with index `vrf_id`
    pub fn with_vrf(self, vrf_name: &str, vrf_id: u32) -> io::Result<Self> {
        self.with_device(&format!("vrf{}", vrf_name), vrf_id)
    }

    /// Enslave `ifname` to the master device of VRF `vrf_name`
    pub fn with_bound_interface(self, vrf_name: &str, ifname: &str) -> io::Result<Self> {
        let link = self
            .dir
            .path()
            .join(format!("vrf{}", vrf_name))
            .join(format!("lower_{}", ifname));
        fs::create_dir_all(link)?;
        Ok(self)
    }
}

/// Temporary route domain mapping file
#[derive(Debug)]
pub struct RouteDomainFixture {
    file: NamedTempFile,
}

impl RouteDomainFixture {
    /// Create a mapping file holding exactly `content`
    pub fn new(content: &str) -> io::Result<Self> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    /// Create a mapping file with one newline-terminated line per entry
    pub fn from_lines<I, S>(lines: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut content = String::new();
        for line in lines {
            content.push_str(line.as_ref());
            content.push('\n');
        }
        Self::new(&content)
    }

    /// Path to pass as the route domain file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Append raw text to the file
    pub fn append(&mut self, content: &str) -> io::Result<()> {
        self.append_bytes(content.as_bytes())
    }

    /// Append raw bytes to the file, UTF-8 or not
    pub fn append_bytes(&mut self, content: &[u8]) -> io::Result<()> {
        self.file.write_all(content)?;
        self.file.flush()
    }
}

/// Canned VRF layouts
pub mod vrf_fixtures {
    use super::*;

    /// VRF name to ID pairs present on the fixture system
    pub const VRFS: &[(&str, u32)] = &[("red", 9), ("blue", 10), ("100", 11), ("green", 12)];

    /// Route domain lines matching [`VRFS`]
    pub const ROUTE_DOMAIN_LINES: &[&str] = &["red 9", "blue 10", "100 11", "green 12"];

    /// Three column route domain lines
    pub const KERNEL_TABLE_LINES: &[&str] = &["red 254 257", "blue 254 258", "red 10 300"];

    /// Network class tree holding `lo`, `eth1`, `eth2` and a master device
    /// for every entry of [`VRFS`]; `eth1` is bound to `red`
    pub fn standard_net_class() -> io::Result<NetClassFixture> {
        let mut net = NetClassFixture::new()?
            .with_device("lo", 1)?
            .with_device("eth1", 2)?
            .with_device("eth2", 3)?;
        for (name, id) in VRFS {
            net = net.with_vrf(name, *id)?;
        }
        net.with_bound_interface("red", "eth1")
    }

    /// Route domain file holding [`ROUTE_DOMAIN_LINES`]
    pub fn standard_route_domain() -> io::Result<RouteDomainFixture> {
        RouteDomainFixture::from_lines(ROUTE_DOMAIN_LINES)
    }

    /// Route domain file holding [`KERNEL_TABLE_LINES`]
    pub fn kernel_table_route_domain() -> io::Result<RouteDomainFixture> {
        RouteDomainFixture::from_lines(KERNEL_TABLE_LINES)
    }
}
