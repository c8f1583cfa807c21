use anyhow::Result;
use clap::Args;

use crate::{
    AppCtx,
    tooling::ensure_discovery_bins,
    ui,
    volume::{TAG_OSD_ID, TagFilter, Volume, VolumeSet},
};

/// Show logical volumes carrying ceph tags.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Only show volumes of this OSD id
    #[arg(long)]
    pub osd_id: Option<String>,
}

impl ListArgs {
    pub fn run(&self, ctx: &AppCtx) -> Result<()> {
        ensure_discovery_bins()?;
        let all = VolumeSet::new(ctx.tools.lvm().list_volumes()?);
        ui::log_volumes(&self.select(&all));
        Ok(())
    }

    fn select(&self, all: &VolumeSet) -> Vec<Volume> {
        let filter = match self.osd_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => TagFilter::new().tag(TAG_OSD_ID, id),
            _ => TagFilter::new(),
        };
        all.filter(&filter)
            .iter()
            .filter(|v| v.tags.has_ceph_tags())
            .cloned()
            .collect()
    }
}
