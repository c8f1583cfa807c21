use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use config as cfg;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG: &str = "/etc/ceph/osd-activate.toml";

#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub cluster: Cluster,
    pub paths: Paths,
    pub service: Service,
    pub exec: Exec,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cluster {
    /// Cluster name, the `<cluster>` in `<osd_data>/<cluster>-<id>`
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Paths {
    pub osd_data: PathBuf,
    pub mounts: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub user: String,
    pub group: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Exec {
    pub sudo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cluster: Cluster {
                name: "ceph".into(),
            },
            paths: Paths {
                osd_data: PathBuf::from("/var/lib/ceph/osd"),
                mounts: PathBuf::from("/proc/mounts"),
            },
            service: Service {
                user: "ceph".into(),
                group: "ceph".into(),
            },
            exec: Exec { sudo: false },
        }
    }
}

impl Config {
    /// Loads `path` on top of the defaults. A missing file is not an error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw: RawConfig = cfg::Config::builder()
            .add_source(cfg::File::from(path).required(false))
            .build()
            .with_context(|| format!("load {}", path.display()))?
            .try_deserialize()
            .with_context(|| format!("deserialize {}", path.display()))?;

        let d = Config::default();
        let name_re = Regex::new(r"^[A-Za-z0-9_.-]{1,64}$").context("compile name regex")?;
        let name = |section: &str, v: Option<String>, default: String| -> Result<String> {
            match trim_opt(v) {
                None => Ok(default),
                Some(s) if name_re.is_match(&s) => Ok(s),
                Some(s) => bail!("bad {section} '{s}': use [A-Za-z0-9_.-], length 1..64"),
            }
        };

        let cluster = Cluster {
            name: name("cluster.name", raw.cluster.name, d.cluster.name)?,
        };

        let osd_data = trim_opt(raw.paths.osd_data)
            .map(PathBuf::from)
            .unwrap_or(d.paths.osd_data);
        if !osd_data.is_absolute() {
            bail!("paths.osd_data must be absolute, got '{}'", osd_data.display());
        }
        let mounts = trim_opt(raw.paths.mounts)
            .map(PathBuf::from)
            .unwrap_or(d.paths.mounts);

        let service = Service {
            user: name("service.user", raw.service.user, d.service.user)?,
            group: name("service.group", raw.service.group, d.service.group)?,
        };

        Ok(Self {
            cluster,
            paths: Paths { osd_data, mounts },
            service,
            exec: Exec {
                sudo: raw.exec.sudo.unwrap_or(d.exec.sudo),
            },
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[inline]
fn trim_opt(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    cluster: RawCluster,
    #[serde(default)]
    paths: RawPaths,
    #[serde(default)]
    service: RawService,
    #[serde(default)]
    exec: RawExec,
}

#[derive(Debug, Deserialize, Default)]
struct RawCluster {
    name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawPaths {
    osd_data: Option<String>,
    mounts: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawService {
    user: Option<String>,
    group: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawExec {
    sudo: Option<bool>,
}
