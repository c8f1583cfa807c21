use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};

use crate::utils::{
    mounts::{canonical, parse_mounts},
    process::{CmdSpec, Runner, StdioSpec},
};

pub const REQ_BINS: &[&str] = &["mount"];

pub trait MountPort: Send + Sync {
    fn is_mounted(&self, source: &Path, dest: &Path) -> Result<bool>;
    fn mount(&self, source: &Path, dest: &Path) -> Result<()>;
}

type DynRunner = dyn Runner + Send + Sync;

pub struct MountCli {
    runner: Arc<DynRunner>,
    table: PathBuf,
}

impl MountCli {
    pub fn new(runner: Arc<DynRunner>, table: PathBuf) -> Self {
        Self { runner, table }
    }

    #[inline]
    fn mount_cmd(&self, source: &Path, dest: &Path) -> CmdSpec {
        CmdSpec::new("mount")
            .arg("-v")
            .arg(source.display().to_string())
            .arg(dest.display().to_string())
            .privileged()
            .stdout(StdioSpec::Inherit)
            .stderr(StdioSpec::Inherit)
    }
}

impl MountPort for MountCli {
    fn is_mounted(&self, source: &Path, dest: &Path) -> Result<bool> {
        let raw = fs::read_to_string(&self.table)
            .with_context(|| format!("read mount table {}", self.table.display()))?;

        let src = canonical(source);
        let dst = canonical(dest);
        Ok(parse_mounts(&raw).iter().any(|m| {
            let dev_ok = m.device == source || canonical(&m.device) == src;
            let dir_ok = m.mount_point == dest || canonical(&m.mount_point) == dst;
            dev_ok && dir_ok
        }))
    }

    fn mount(&self, source: &Path, dest: &Path) -> Result<()> {
        self.runner
            .run(&self.mount_cmd(source, dest))
            .with_context(|| format!("mount -v {} {}", source.display(), dest.display()))
    }
}
