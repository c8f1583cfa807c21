use std::path::PathBuf;

use anyhow::Result;
use tracing as log;

use crate::{
    error::ActivateError,
    osd::OsdVolume,
    tooling::PartitionPort,
    volume::{TAG_OSD_FSID, TAG_TYPE, TagFilter, VolumeSet},
};

/// Device path of the journal belonging to `data`.
///
/// A journal logical volume tagged for the same OSD wins and its own path is
/// used. Without one the journal is a raw partition and is looked up by the
/// data volume's `ceph.journal_uuid`, so a renumbered disk still resolves.
/// Nothing is cached: the answer may differ from one boot to the next.
pub fn resolve_journal(
    data: &OsdVolume,
    volumes: &VolumeSet,
    partitions: &dyn PartitionPort,
) -> Result<PathBuf> {
    let journal_lv = volumes.find(
        &TagFilter::new()
            .tag(TAG_TYPE, "journal")
            .tag(TAG_OSD_FSID, data.osd_fsid.as_str()),
    )?;

    let device = match journal_lv {
        Some(lv) => {
            log::debug!(
                "[journal] osd.{}: journal lv {} (tagged device {})",
                data.osd_id,
                lv.path.display(),
                data.journal_device.as_deref().unwrap_or("<none>")
            );
            Some(lv.path.clone())
        }
        None => match data.journal_uuid.as_deref() {
            Some(uuid) => {
                let dev = partitions.device_from_partuuid(uuid)?;
                log::debug!(
                    "[journal] osd.{}: PARTUUID {uuid} -> {}",
                    data.osd_id,
                    dev.as_ref()
                        .map(|d| d.display().to_string())
                        .unwrap_or_else(|| "<none>".into())
                );
                dev
            }
            None => None,
        },
    };

    device
        .filter(|d| !d.as_os_str().is_empty())
        .ok_or_else(|| {
            ActivateError::JournalNotFound {
                osd_id: data.osd_id.clone(),
            }
            .into()
        })
}
