use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Result, bail};

use crate::{
    tooling::{FsPort, HostPort, LvmPort, MountPort, PartitionPort, SystemdPort, Toolbox},
    volume::Volume,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListVolumes,
    Partuuid(String),
    IsMounted(PathBuf, PathBuf),
    Mount(PathBuf, PathBuf),
    Symlink(PathBuf, PathBuf),
    Chown(PathBuf, String, String),
    Enable(String, String, String),
    Start(String),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    mounted: HashSet<(PathBuf, PathBuf)>,
    links: HashMap<PathBuf, PathBuf>,
}

/// In-memory host: volumes, partitions, mount table, symlinks and units.
/// Clones share the recorded state.
#[derive(Clone)]
pub struct FakeHost {
    volumes: Vec<Volume>,
    partuuids: HashMap<String, PathBuf>,
    euid: u32,
    failing: Option<&'static str>,
    state: Arc<Mutex<State>>,
}

impl FakeHost {
    pub fn new(volumes: Vec<Volume>) -> Self {
        Self {
            volumes,
            partuuids: HashMap::new(),
            euid: 0,
            failing: None,
            state: Arc::default(),
        }
    }

    #[must_use]
    pub fn partuuid(mut self, uuid: &str, device: &str) -> Self {
        self.partuuids.insert(uuid.into(), PathBuf::from(device));
        self
    }

    #[must_use]
    pub fn running_as(mut self, euid: u32) -> Self {
        self.euid = euid;
        self
    }

    /// Makes one operation ("mount", "symlink", "chown", "enable", "start",
    /// "lvs") fail.
    #[must_use]
    pub fn fail_on(mut self, op: &'static str) -> Self {
        self.failing = Some(op);
        self
    }

    #[must_use]
    pub fn already_mounted(self, source: &str, dest: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .mounted
            .insert((PathBuf::from(source), PathBuf::from(dest)));
        self
    }

    pub fn toolbox(&self) -> Toolbox {
        Toolbox::from_ports(
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
            Arc::new(self.clone()),
        )
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mount_count(&self) -> usize {
        self.state.lock().unwrap().mounted.len()
    }

    pub fn link_target(&self, link: &Path) -> Option<PathBuf> {
        self.state.lock().unwrap().links.get(link).cloned()
    }

    fn record(&self, op: &str, call: Call) -> Result<()> {
        self.state.lock().unwrap().calls.push(call);
        if self.failing == Some(op) {
            bail!("{op} failed");
        }
        Ok(())
    }
}

impl LvmPort for FakeHost {
    fn list_volumes(&self) -> Result<Vec<Volume>> {
        self.record("lvs", Call::ListVolumes)?;
        Ok(self.volumes.clone())
    }
}

impl PartitionPort for FakeHost {
    fn device_from_partuuid(&self, partuuid: &str) -> Result<Option<PathBuf>> {
        self.record("blkid", Call::Partuuid(partuuid.into()))?;
        Ok(self.partuuids.get(partuuid).cloned())
    }
}

impl MountPort for FakeHost {
    fn is_mounted(&self, source: &Path, dest: &Path) -> Result<bool> {
        self.record(
            "is_mounted",
            Call::IsMounted(source.to_path_buf(), dest.to_path_buf()),
        )?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .mounted
            .contains(&(source.to_path_buf(), dest.to_path_buf())))
    }

    fn mount(&self, source: &Path, dest: &Path) -> Result<()> {
        self.record("mount", Call::Mount(source.to_path_buf(), dest.to_path_buf()))?;
        let mut st = self.state.lock().unwrap();
        if !st
            .mounted
            .insert((source.to_path_buf(), dest.to_path_buf()))
        {
            bail!("mount: {} already mounted on {}", source.display(), dest.display());
        }
        Ok(())
    }
}

impl FsPort for FakeHost {
    fn replace_symlink(&self, target: &Path, link: &Path) -> Result<()> {
        self.record(
            "symlink",
            Call::Symlink(target.to_path_buf(), link.to_path_buf()),
        )?;
        self.state
            .lock()
            .unwrap()
            .links
            .insert(link.to_path_buf(), target.to_path_buf());
        Ok(())
    }

    fn chown(&self, path: &Path, user: &str, group: &str) -> Result<()> {
        self.record(
            "chown",
            Call::Chown(path.to_path_buf(), user.into(), group.into()),
        )
    }
}

impl SystemdPort for FakeHost {
    fn enable_volume(&self, osd_id: &str, osd_fsid: &str, kind: &str) -> Result<()> {
        self.record(
            "enable",
            Call::Enable(osd_id.into(), osd_fsid.into(), kind.into()),
        )
    }

    fn start_osd(&self, osd_id: &str) -> Result<()> {
        self.record("start", Call::Start(osd_id.into()))
    }
}

impl HostPort for FakeHost {
    fn euid(&self) -> u32 {
        self.euid
    }
}
