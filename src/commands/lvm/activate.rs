use anyhow::Result;
use clap::{Args, Command};

use crate::{
    AppCtx,
    activate::{ActivateRequest, Activation},
    osd::Backend,
    tooling::ensure_activation_bins,
};

pub const ACTIVATE_LONG_ABOUT: &str = "\
Activate OSDs by discovering them with LVM and mounting them in their
appropriate destination:

    osd-activate lvm activate {ID} {FSID}

The lvs associated with the OSD need to have been prepared previously, so
that all needed tags and metadata exist.

With only an ID the volumes are selected by ceph.osd_id alone, which is
ambiguous when ids were reused across clusters.";

#[derive(Args, Debug, Clone, Default)]
pub struct ActivateArgs {
    /// The ID of the OSD, usually an integer, like 0
    #[arg(value_name = "ID")]
    pub osd_id: Option<String>,

    /// The FSID of the OSD, similar to a SHA1
    #[arg(value_name = "FSID")]
    pub osd_fsid: Option<String>,

    /// bluestore objectstore (not yet implemented)
    #[arg(long, conflicts_with = "filestore")]
    pub bluestore: bool,

    /// filestore objectstore (the default)
    #[arg(long)]
    pub filestore: bool,
}

impl ActivateArgs {
    pub fn backend(&self) -> Backend {
        if self.bluestore {
            Backend::Bluestore
        } else {
            Backend::Filestore
        }
    }

    pub fn run(&self, ctx: &AppCtx) -> Result<()> {
        if self.osd_id.is_none() && self.osd_fsid.is_none() {
            let mut cmd = Self::augment_args(Command::new("activate"))
                .about("Discover and mount the LVM device associated with an OSD ID and start the Ceph OSD")
                .long_about(ACTIVATE_LONG_ABOUT);
            cmd.print_long_help()?;
            println!();
            return Ok(());
        }

        let req = ActivateRequest::new(self.osd_id.clone(), self.osd_fsid.clone());
        activate(ctx, &req, self.backend())
    }
}

/// Shared by `activate` and `trigger`.
pub(super) fn activate(ctx: &AppCtx, req: &ActivateRequest, backend: Backend) -> Result<()> {
    ensure_activation_bins()?;
    Activation::new(&ctx.cfg, &ctx.tools).run(req, backend)
}
