use anyhow::{Context, Result};
use tracing as log;

use super::{ObjectStore, journal::resolve_journal};
use crate::{
    config::Config,
    osd::{OsdPaths, OsdVolume},
    tooling::Toolbox,
    volume::{TAG_TYPE, TagFilter, VolumeSet},
};

/// Unit kind registered with systemd for LVM-backed OSDs.
const VOLUME_KIND: &str = "lvm";

/// Data volume mounted as a directory plus a separate journal device.
pub struct Filestore<'a> {
    cfg: &'a Config,
    tools: &'a Toolbox,
}

impl<'a> Filestore<'a> {
    pub fn new(cfg: &'a Config, tools: &'a Toolbox) -> Self {
        Self { cfg, tools }
    }
}

impl ObjectStore for Filestore<'_> {
    fn name(&self) -> &'static str {
        "filestore"
    }

    fn activate(&self, volumes: &VolumeSet) -> Result<()> {
        let data_lv = volumes.get(&TagFilter::new().tag(TAG_TYPE, "data"))?;
        let osd = OsdVolume::try_from(data_lv)?;
        let id = osd.osd_id.as_str();

        let journal = resolve_journal(&osd, volumes, self.tools.partitions().as_ref())
            .with_context(|| format!("[activate] osd.{id}: resolve journal"))?;

        let paths = OsdPaths::new(&self.cfg.paths.osd_data, &self.cfg.cluster.name, id);

        let mount = self.tools.mount();
        let mounted = mount
            .is_mounted(&osd.path, &paths.data_dir)
            .with_context(|| format!("[activate] osd.{id}: check mount state"))?;
        if mounted {
            log::info!(
                "[activate] osd.{id}: {} already mounted on {}",
                osd.path.display(),
                paths.data_dir.display()
            );
        } else {
            log::info!(
                "[activate] osd.{id}: mount {} -> {}",
                osd.path.display(),
                paths.data_dir.display()
            );
            mount
                .mount(&osd.path, &paths.data_dir)
                .with_context(|| format!("[activate] osd.{id}: mount data volume"))?;
        }

        // the journal device node may have moved since the last boot
        log::info!(
            "[activate] osd.{id}: link {} -> {}",
            paths.journal_link.display(),
            journal.display()
        );
        let fs = self.tools.fs();
        fs.replace_symlink(&journal, &paths.journal_link)
            .with_context(|| format!("[activate] osd.{id}: link journal"))?;

        let svc = &self.cfg.service;
        log::info!(
            "[activate] osd.{id}: chown {}:{} {}",
            svc.user,
            svc.group,
            journal.display()
        );
        fs.chown(&journal, &svc.user, &svc.group)
            .with_context(|| format!("[activate] osd.{id}: fix journal ownership"))?;

        let systemd = self.tools.systemd();
        log::info!("[activate] osd.{id}: enable {VOLUME_KIND} unit for fsid {}", osd.osd_fsid);
        systemd
            .enable_volume(id, &osd.osd_fsid, VOLUME_KIND)
            .with_context(|| format!("[activate] osd.{id}: enable unit"))?;

        log::info!("[activate] osd.{id}: start");
        systemd
            .start_osd(id)
            .with_context(|| format!("[activate] osd.{id}: start service"))?;

        Ok(())
    }
}
