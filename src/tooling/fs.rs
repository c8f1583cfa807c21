use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};

use crate::utils::process::{CmdSpec, Runner, StdioSpec};

pub const REQ_BINS: &[&str] = &["ln", "mv", "chown"];

type DynRunner = dyn Runner + Send + Sync;

pub trait FsPort: Send + Sync {
    /// Points `link` at `target`, replacing whatever `link` was before.
    fn replace_symlink(&self, target: &Path, link: &Path) -> Result<()>;
    fn chown(&self, path: &Path, user: &str, group: &str) -> Result<()>;
}

pub struct FsCli {
    runner: Arc<DynRunner>,
}

impl FsCli {
    pub fn new(runner: Arc<DynRunner>) -> Self {
        Self { runner }
    }

    #[inline]
    fn ln_snf(&self, target: &Path, link: &Path) -> CmdSpec {
        CmdSpec::new("ln")
            .arg("-snf")
            .arg(target.display().to_string())
            .arg(link.display().to_string())
            .privileged()
            .stdout(StdioSpec::Null)
            .stderr(StdioSpec::Inherit)
    }

    #[inline]
    fn mv_over(&self, from: &Path, to: &Path) -> CmdSpec {
        CmdSpec::new("mv")
            .arg("-Tf")
            .arg(from.display().to_string())
            .arg(to.display().to_string())
            .privileged()
            .stdout(StdioSpec::Null)
            .stderr(StdioSpec::Inherit)
    }

    #[inline]
    fn chown_cmd(&self, path: &Path, user: &str, group: &str) -> CmdSpec {
        CmdSpec::new("chown")
            .arg(format!("{user}:{group}"))
            .arg(path.display().to_string())
            .privileged()
            .stdout(StdioSpec::Null)
            .stderr(StdioSpec::Inherit)
    }
}

impl FsPort for FsCli {
    fn replace_symlink(&self, target: &Path, link: &Path) -> Result<()> {
        // build next to the link, then rename(2) over it
        let staging = staging_path(link);
        self.runner
            .run(&self.ln_snf(target, &staging))
            .with_context(|| format!("ln -snf {} {}", target.display(), staging.display()))?;
        self.runner
            .run(&self.mv_over(&staging, link))
            .with_context(|| format!("mv -Tf {} {}", staging.display(), link.display()))
    }

    fn chown(&self, path: &Path, user: &str, group: &str) -> Result<()> {
        self.runner
            .run(&self.chown_cmd(path, user, group))
            .with_context(|| format!("chown {user}:{group} {}", path.display()))
    }
}

fn staging_path(link: &Path) -> PathBuf {
    let mut name = link
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("link"));
    name.push(".tmp");
    link.with_file_name(name)
}
