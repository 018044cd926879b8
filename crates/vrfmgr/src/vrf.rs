//! VRF inventory: configured VRFs with the devices bound to them

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::error::{VrfMgrError, VrfMgrResult};
use crate::types::VrfId;

/// A running VRF and its enslaved devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vrf {
    id: VrfId,
    name: String,
    interfaces: BTreeSet<String>,
}

impl Vrf {
    /// Create a VRF with no bound devices
    pub fn new(id: VrfId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            interfaces: BTreeSet::new(),
        }
    }

    /// Create a VRF with the given bound devices
    pub fn with_interfaces<I, S>(id: VrfId, name: impl Into<String>, interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            interfaces: interfaces.into_iter().map(Into::into).collect(),
        }
    }

    pub fn id(&self) -> VrfId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interfaces(&self) -> &BTreeSet<String> {
        &self.interfaces
    }

    /// Replace the set of bound devices
    pub fn set_interfaces(&mut self, interfaces: BTreeSet<String>) {
        self.interfaces = interfaces;
    }

    /// Number of devices bound to this VRF
    pub fn bound_interface_num(&self) -> usize {
        self.interfaces.len()
    }

    /// True if `ifname` is bound to this VRF
    pub fn interface_is_bound(&self, ifname: &str) -> bool {
        self.interfaces.contains(ifname)
    }
}

/// VRFs addressable by both ID and name
#[derive(Debug, Clone, Default)]
pub struct VrfIndex {
    vrfs: Vec<Vrf>,
    by_id: HashMap<VrfId, usize>,
    by_name: HashMap<String, usize>,
}

impl VrfIndex {
    /// Index `vrfs`, failing if any two share an ID or a name.
    pub fn from_vrfs(vrfs: impl IntoIterator<Item = Vrf>) -> VrfMgrResult<Self> {
        let mut index = Self::default();
        for vrf in vrfs {
            index.insert(vrf)?;
        }
        Ok(index)
    }

    fn insert(&mut self, vrf: Vrf) -> VrfMgrResult<()> {
        if self.by_id.contains_key(&vrf.id) {
            return Err(VrfMgrError::DuplicateVrf {
                key: vrf.id.to_string(),
            });
        }
        if self.by_name.contains_key(&vrf.name) {
            return Err(VrfMgrError::DuplicateVrf { key: vrf.name });
        }

        let pos = self.vrfs.len();
        self.by_id.insert(vrf.id, pos);
        self.by_name.insert(vrf.name.clone(), pos);
        self.vrfs.push(vrf);
        Ok(())
    }

    pub fn get_by_id(&self, id: VrfId) -> Option<&Vrf> {
        self.by_id.get(&id).map(|&pos| &self.vrfs[pos])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Vrf> {
        self.by_name.get(name).map(|&pos| &self.vrfs[pos])
    }

    pub fn len(&self) -> usize {
        self.vrfs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vrfs.is_empty()
    }

    /// VRFs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Vrf> {
        self.vrfs.iter()
    }
}
