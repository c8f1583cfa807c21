use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use serde::Deserialize;
use tracing as log;

use crate::{
    error::ActivateError,
    utils::process::{CmdSpec, Runner, StdioSpec},
    volume::{Tags, Volume},
};

pub const REQ_BINS: &[&str] = &["lvs"];

#[derive(Deserialize)]
struct LvsJson {
    report: Vec<Report>,
}

#[derive(Deserialize)]
struct Report {
    #[serde(default)]
    lv: Vec<LvRow>,
}

#[derive(Deserialize)]
struct LvRow {
    #[serde(default)]
    lv_tags: String,
    #[serde(default)]
    lv_path: String,
    #[serde(default)]
    lv_name: String,
    #[serde(default)]
    vg_name: String,
}

pub trait LvmPort: Send + Sync {
    /// Every logical volume on the host with its full tag set.
    fn list_volumes(&self) -> Result<Vec<Volume>>;
}

type DynRunner = dyn Runner + Send + Sync;

pub struct LvmCli {
    runner: Arc<DynRunner>,
}

impl LvmCli {
    pub fn new(runner: Arc<DynRunner>) -> Self {
        Self { runner }
    }

    #[inline]
    fn lvs(&self) -> CmdSpec {
        CmdSpec::new("lvs")
            .args([
                "--reportformat",
                "json",
                "-o",
                "lv_tags,lv_path,lv_name,vg_name",
            ])
            .stdout(StdioSpec::Pipe)
            .stderr(StdioSpec::Inherit)
    }
}

impl LvmPort for LvmCli {
    fn list_volumes(&self) -> Result<Vec<Volume>> {
        let out = self
            .runner
            .run_capture(&self.lvs())
            .map_err(|e| ActivateError::Discovery {
                reason: format!("{e:#}"),
            })?;
        Ok(parse_lvs_json(&out)?)
    }
}

/// Malformed rows degrade to fewer tags or are dropped; only an unreadable
/// report fails.
pub fn parse_lvs_json(out: &str) -> Result<Vec<Volume>, ActivateError> {
    let json: LvsJson = serde_json::from_str(out).map_err(|e| ActivateError::Discovery {
        reason: format!("parse lvs json: {e}"),
    })?;

    let mut vols = Vec::new();
    for row in json.report.into_iter().flat_map(|r| r.lv) {
        if row.lv_path.trim().is_empty() {
            log::warn!(
                "[lvm] skip {}/{}: lvs reported no device path",
                row.vg_name,
                row.lv_name
            );
            continue;
        }
        let (tags, rejected) = Tags::parse(&row.lv_tags);
        if !rejected.is_empty() {
            log::warn!(
                "[lvm] {}: ignoring malformed tags {:?}",
                row.lv_path,
                rejected
            );
        }
        vols.push(Volume {
            name: row.lv_name,
            vg: row.vg_name,
            path: PathBuf::from(row.lv_path.trim()),
            tags,
        });
    }
    log::debug!("[lvm] discovered {} logical volumes", vols.len());
    Ok(vols)
}
