//! Locate an OSD's volumes by tag and bring it up.
//!
//! The orchestration here is backend-agnostic: it checks privileges,
//! discovers volumes, narrows them to the requested OSD and hands the result
//! to an [`ObjectStore`] implementation which performs the actual steps.

use anyhow::Result;
use tracing as log;

use crate::{
    config::Config,
    error::ActivateError,
    osd::Backend,
    tooling::Toolbox,
    volume::{TAG_OSD_FSID, TAG_OSD_ID, TagFilter, VolumeSet},
};

mod bluestore;
mod filestore;
mod journal;

#[cfg(test)]
pub(crate) mod fakes;

use bluestore::Bluestore;
use filestore::Filestore;

/// Identifiers supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivateRequest {
    pub osd_id: Option<String>,
    pub osd_fsid: Option<String>,
}

impl ActivateRequest {
    pub fn new(osd_id: Option<String>, osd_fsid: Option<String>) -> Self {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            osd_id: clean(osd_id),
            osd_fsid: clean(osd_fsid),
        }
    }

    /// Tag predicate that selects this OSD's volumes.
    pub fn filter(&self) -> TagFilter {
        let by_id = self
            .osd_id
            .as_ref()
            .map(|id| TagFilter::new().tag(TAG_OSD_ID, id.as_str()))
            .unwrap_or_default();
        let by_fsid = self
            .osd_fsid
            .as_ref()
            .map(|fsid| TagFilter::new().tag(TAG_OSD_FSID, fsid.as_str()))
            .unwrap_or_default();
        by_id.and(&by_fsid)
    }

    fn describe(&self) -> String {
        format!(
            "osd.{} with fsid {}",
            self.osd_id.as_deref().unwrap_or("None"),
            self.osd_fsid.as_deref().unwrap_or("None")
        )
    }
}

/// Narrows `all` to the volumes of the requested OSD.
pub fn locate(all: &VolumeSet, req: &ActivateRequest) -> Result<VolumeSet, ActivateError> {
    if req.osd_fsid.is_none() && req.osd_id.is_some() {
        log::warn!(
            "[activate] no fsid given, selecting volumes by osd id {} alone",
            req.osd_id.as_deref().unwrap_or_default()
        );
    }
    let found = all.filter(&req.filter());
    if found.is_empty() {
        return Err(ActivateError::NotFound {
            what: req.describe(),
        });
    }
    log::debug!(
        "[activate] {} of {} volumes belong to {}",
        found.len(),
        all.len(),
        req.describe()
    );
    Ok(found)
}

/// One way of turning located volumes into a running OSD.
pub trait ObjectStore {
    fn name(&self) -> &'static str;
    fn activate(&self, volumes: &VolumeSet) -> Result<()>;
}

pub struct Activation<'a> {
    cfg: &'a Config,
    tools: &'a Toolbox,
}

impl<'a> Activation<'a> {
    pub fn new(cfg: &'a Config, tools: &'a Toolbox) -> Self {
        Self { cfg, tools }
    }

    pub fn store(&self, backend: Backend) -> Box<dyn ObjectStore + 'a> {
        match backend {
            Backend::Filestore => Box::new(Filestore::new(self.cfg, self.tools)),
            Backend::Bluestore => Box::new(Bluestore),
        }
    }

    pub fn run(&self, req: &ActivateRequest, backend: Backend) -> Result<()> {
        self.tools.host().require_root()?;

        let all = VolumeSet::new(self.tools.lvm().list_volumes()?);
        let volumes = locate(&all, req)?;

        let store = self.store(backend);
        log::info!(
            "[activate] {} -> backend={}, volumes={}",
            req.describe(),
            store.name(),
            volumes.len()
        );
        store.activate(&volumes)
    }
}
