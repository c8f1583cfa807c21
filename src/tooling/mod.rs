use std::{collections::BTreeSet, sync::Arc};

use anyhow::Result;

use crate::{
    config::Config,
    utils::{bins::ensure_bins, process::Runner},
};

pub mod blkid;
pub mod fs;
pub mod host;
pub mod lvm;
pub mod mount;
pub mod systemd;
#[cfg(test)]
pub mod testing;

pub use blkid::{BlkidCli, PartitionPort};
pub use fs::{FsCli, FsPort};
pub use host::{Host, HostPort};
pub use lvm::{LvmCli, LvmPort};
pub use mount::{MountCli, MountPort};
pub use systemd::{SystemctlCli, SystemdPort};

#[derive(Clone)]
pub struct Toolbox {
    lvm: Arc<dyn LvmPort>,
    partitions: Arc<dyn PartitionPort>,
    mount: Arc<dyn MountPort>,
    fs: Arc<dyn FsPort>,
    systemd: Arc<dyn SystemdPort>,
    host: Arc<dyn HostPort>,
}

impl Toolbox {
    pub fn new(cfg: &Config, runner: Arc<dyn Runner + Send + Sync>) -> Self {
        Self {
            lvm: Arc::new(LvmCli::new(runner.clone())),
            partitions: Arc::new(BlkidCli::new(runner.clone())),
            mount: Arc::new(MountCli::new(runner.clone(), cfg.paths.mounts.clone())),
            fs: Arc::new(FsCli::new(runner.clone())),
            systemd: Arc::new(SystemctlCli::new(runner)),
            host: Arc::new(Host),
        }
    }

    #[cfg(test)]
    pub fn from_ports(
        lvm: Arc<dyn LvmPort>,
        partitions: Arc<dyn PartitionPort>,
        mount: Arc<dyn MountPort>,
        fs: Arc<dyn FsPort>,
        systemd: Arc<dyn SystemdPort>,
        host: Arc<dyn HostPort>,
    ) -> Self {
        Self {
            lvm,
            partitions,
            mount,
            fs,
            systemd,
            host,
        }
    }

    #[inline]
    pub fn lvm(&self) -> Arc<dyn LvmPort> {
        self.lvm.clone()
    }
    #[inline]
    pub fn partitions(&self) -> Arc<dyn PartitionPort> {
        self.partitions.clone()
    }
    #[inline]
    pub fn mount(&self) -> Arc<dyn MountPort> {
        self.mount.clone()
    }
    #[inline]
    pub fn fs(&self) -> Arc<dyn FsPort> {
        self.fs.clone()
    }
    #[inline]
    pub fn systemd(&self) -> Arc<dyn SystemdPort> {
        self.systemd.clone()
    }
    #[inline]
    pub fn host(&self) -> Arc<dyn HostPort> {
        self.host.clone()
    }
}

/// Everything the activation workflow shells out to.
pub fn ensure_activation_bins() -> Result<()> {
    let all: BTreeSet<&'static str> = [
        lvm::REQ_BINS,
        blkid::REQ_BINS,
        mount::REQ_BINS,
        fs::REQ_BINS,
        systemd::REQ_BINS,
    ]
    .into_iter()
    .flatten()
    .copied()
    .collect();
    ensure_bins(all)
}

pub fn ensure_discovery_bins() -> Result<()> {
    ensure_bins(lvm::REQ_BINS.iter().copied())
}
