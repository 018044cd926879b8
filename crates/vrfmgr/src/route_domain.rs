//! Route domain mapping file parser
//!
//! File format, one VRF per line:
//! ```text
//! # name  pbr_table_id  kernel_table_id
//! red     254           257
//! blue    254           258
//! ```
//!
//! The mapping list reads the first two columns as `<name> <id>`; the kernel
//! table lookup needs all three. Lines that do not split into enough words
//! are skipped without error.

use std::fs::File;
use std::io::{BufReader, Seek};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{VrfMgrError, VrfMgrResult};
use crate::tokenize::{count_lines, parse_u32_lenient, Records};
use crate::types::{ListNameStyle, TableId, VrfId, VrfMap, ROUTE_DOMAIN_CONF};

/// Handle on the route domain mapping file.
///
/// Holds only the path: every call opens, scans and closes the file, so
/// results always reflect the file as it is now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDomainConf {
    path: PathBuf,
}

impl RouteDomainConf {
    /// Read mappings from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The mapping file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> VrfMgrResult<File> {
        File::open(&self.path).map_err(|e| VrfMgrError::io(&self.path, e))
    }

    /// Load every `<name> <id>` mapping in file order.
    ///
    /// The number of newline-terminated lines is counted first and no more
    /// mappings than that are accepted, so lines appended while the file is
    /// being read are ignored. Duplicates are kept. Non-numeric IDs load as
    /// [`VrfId::INVALID`].
    pub fn load_vrf_list(&self, style: ListNameStyle) -> VrfMgrResult<Vec<VrfMap>> {
        let mut file = self.open()?;

        let nvrf = count_lines(BufReader::new(&file)).map_err(|e| VrfMgrError::io(&self.path, e))?;
        file.rewind().map_err(|e| VrfMgrError::io(&self.path, e))?;

        let mut list = Vec::new();
        if list.try_reserve_exact(nvrf).is_err() {
            warn!("Unable to allocate VRF list for {} lines", nvrf);
            return Err(VrfMgrError::CapacityExhausted { requested: nvrf });
        }

        for record in Records::<_, 2>::new(BufReader::new(file)).take(nvrf) {
            let vrf_id = VrfId::new(parse_u32_lenient(&record[1]));
            list.push(VrfMap {
                vrf_name: style.render(&record[0]),
                vrf_id,
            });
        }

        debug!(
            "Loaded {} VRF mappings from {} ({} lines)",
            list.len(),
            self.path.display(),
            nvrf
        );
        Ok(list)
    }

    /// Find the kernel table backing PBR table `pbr_tid` of VRF `vrf_name`.
    ///
    /// Returns `Ok(None)` when no line matches. The first matching line wins.
    pub fn kernel_table_id(&self, vrf_name: &str, pbr_tid: TableId) -> VrfMgrResult<Option<TableId>> {
        let file = self.open()?;

        let found = Records::<_, 3>::new(BufReader::new(file))
            .find(|record| {
                TableId::new(parse_u32_lenient(&record[1])) == pbr_tid && &record[0] == vrf_name
            })
            .map(|record| TableId::new(parse_u32_lenient(&record[2])));

        Ok(found)
    }
}

impl Default for RouteDomainConf {
    fn default() -> Self {
        Self::new(ROUTE_DOMAIN_CONF)
    }
}
