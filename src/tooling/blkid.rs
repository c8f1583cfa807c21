use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use tracing as log;

use crate::utils::process::{CmdSpec, Runner, StdioSpec};

pub const REQ_BINS: &[&str] = &["blkid"];

/// blkid exits with 2 when no device matches the token.
const BLKID_NO_MATCH: i32 = 2;

pub trait PartitionPort: Send + Sync {
    /// Current device node of the partition carrying `partuuid`, if any.
    fn device_from_partuuid(&self, partuuid: &str) -> Result<Option<PathBuf>>;
}

type DynRunner = dyn Runner + Send + Sync;

pub struct BlkidCli {
    runner: Arc<DynRunner>,
}

impl BlkidCli {
    pub fn new(runner: Arc<DynRunner>) -> Self {
        Self { runner }
    }

    #[inline]
    fn by_partuuid(&self, partuuid: &str) -> CmdSpec {
        CmdSpec::new("blkid")
            .args(["-t", &format!("PARTUUID=\"{partuuid}\""), "-o", "device"])
            .stdout(StdioSpec::Pipe)
            .stderr(StdioSpec::Null)
    }
}

impl PartitionPort for BlkidCli {
    fn device_from_partuuid(&self, partuuid: &str) -> Result<Option<PathBuf>> {
        let cmd = self.by_partuuid(partuuid);
        let probe = self
            .runner
            .run_probe(&cmd)
            .with_context(|| format!("blkid lookup of PARTUUID {partuuid}"))?;

        match probe.code {
            Some(0) => {}
            Some(BLKID_NO_MATCH) => return Ok(None),
            _ => bail!(
                "command failed: {} (exit code {:?})",
                cmd.render(),
                probe.code
            ),
        }

        let mut devices = probe.stdout.lines().map(str::trim).filter(|l| !l.is_empty());
        let first = devices.next().map(PathBuf::from);
        if let Some(extra) = devices.next() {
            log::warn!("[blkid] PARTUUID {partuuid} matches several devices, also {extra}");
        }
        Ok(first)
    }
}
