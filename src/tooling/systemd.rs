use std::sync::Arc;

use anyhow::{Context, Result};

use crate::utils::process::{CmdSpec, Runner, StdioSpec};

pub const REQ_BINS: &[&str] = &["systemctl"];

/// Template unit that runs `osd-activate lvm trigger <instance>` at boot.
pub const VOLUME_UNIT: &str = "ceph-volume";
pub const OSD_UNIT: &str = "ceph-osd";

pub trait SystemdPort: Send + Sync {
    /// Enables the boot-time activation unit for this OSD.
    fn enable_volume(&self, osd_id: &str, osd_fsid: &str, kind: &str) -> Result<()>;
    fn start_osd(&self, osd_id: &str) -> Result<()>;
}

/// Instance name of the activation unit: `<kind>-<id>-<fsid>`.
pub fn volume_instance(kind: &str, osd_id: &str, osd_fsid: &str) -> String {
    format!("{kind}-{osd_id}-{osd_fsid}")
}

type DynRunner = dyn Runner + Send + Sync;

pub struct SystemctlCli {
    runner: Arc<DynRunner>,
}

impl SystemctlCli {
    pub fn new(runner: Arc<DynRunner>) -> Self {
        Self { runner }
    }

    #[inline]
    fn systemctl(&self, verb: &str, unit: &str) -> CmdSpec {
        CmdSpec::new("systemctl")
            .args([verb, unit])
            .privileged()
            .stdout(StdioSpec::Inherit)
            .stderr(StdioSpec::Inherit)
    }
}

impl SystemdPort for SystemctlCli {
    fn enable_volume(&self, osd_id: &str, osd_fsid: &str, kind: &str) -> Result<()> {
        let unit = format!(
            "{VOLUME_UNIT}@{}",
            volume_instance(kind, osd_id, osd_fsid)
        );
        self.runner
            .run(&self.systemctl("enable", &unit))
            .with_context(|| format!("systemctl enable {unit}"))
    }

    fn start_osd(&self, osd_id: &str) -> Result<()> {
        let unit = format!("{OSD_UNIT}@{osd_id}");
        self.runner
            .run(&self.systemctl("start", &unit))
            .with_context(|| format!("systemctl start {unit}"))
    }
}
