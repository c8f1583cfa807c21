use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    error::ActivateError,
    volume::{TAG_JOURNAL_DEVICE, TAG_JOURNAL_UUID, TAG_OSD_FSID, TAG_OSD_ID, TAG_TYPE, Volume},
};

/// Role of a volume inside one OSD (`ceph.type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VolumeKind {
    Data,
    Journal,
    Block,
    Wal,
    Db,
    Other(String),
}

impl VolumeKind {
    pub fn from_tag(s: &str) -> Self {
        match s {
            "data" => Self::Data,
            "journal" => Self::Journal,
            "block" => Self::Block,
            "wal" => Self::Wal,
            "db" => Self::Db,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Data => "data",
            Self::Journal => "journal",
            Self::Block => "block",
            Self::Wal => "wal",
            Self::Db => "db",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for VolumeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A volume whose tags were validated as belonging to an OSD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsdVolume {
    pub osd_id: String,
    pub osd_fsid: String,
    pub kind: VolumeKind,
    /// PARTUUID of a raw journal partition
    pub journal_uuid: Option<String>,
    /// Journal device path recorded at prepare time (informational)
    pub journal_device: Option<String>,
    pub path: PathBuf,
}

impl TryFrom<&Volume> for OsdVolume {
    type Error = ActivateError;

    fn try_from(v: &Volume) -> Result<Self, Self::Error> {
        let required = |tag: &'static str| -> Result<String, ActivateError> {
            v.tag(tag)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| ActivateError::MissingTag {
                    path: v.path.display().to_string(),
                    tag,
                })
        };
        let optional = |tag: &str| {
            v.tag(tag)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            osd_id: required(TAG_OSD_ID)?,
            osd_fsid: required(TAG_OSD_FSID)?,
            kind: VolumeKind::from_tag(&required(TAG_TYPE)?),
            journal_uuid: optional(TAG_JOURNAL_UUID),
            journal_device: optional(TAG_JOURNAL_DEVICE),
            path: v.path.clone(),
        })
    }
}

/// Where an activated OSD lives on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsdPaths {
    pub data_dir: PathBuf,
    pub journal_link: PathBuf,
}

impl OsdPaths {
    pub fn new(base: &Path, cluster: &str, osd_id: &str) -> Self {
        let data_dir = base.join(format!("{cluster}-{osd_id}"));
        let journal_link = data_dir.join("journal");
        Self {
            data_dir,
            journal_link,
        }
    }
}

/// Object store flavour requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Filestore,
    Bluestore,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Filestore => f.write_str("filestore"),
            Backend::Bluestore => f.write_str("bluestore"),
        }
    }
}
