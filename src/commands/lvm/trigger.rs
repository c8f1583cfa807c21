use anyhow::{Context, Result, bail};
use clap::Args;
use regex::Regex;
use tracing as log;

use super::activate::activate;
use crate::{AppCtx, activate::ActivateRequest, osd::Backend};

const INSTANCE_RE: &str = r"^(?P<kind>[a-z]+)-(?P<id>[0-9]+)-(?P<fsid>.+)$";

/// Entry point for the `ceph-volume@<kind>-<id>-<fsid>` unit.
#[derive(Args, Debug, Clone)]
pub struct TriggerArgs {
    /// Unit instance name, e.g. lvm-0-8715beb4-15c5-49de-ba6f-401086ec7b41
    #[arg(value_name = "INSTANCE")]
    pub instance: String,
}

impl TriggerArgs {
    pub fn run(&self, ctx: &AppCtx) -> Result<()> {
        let req = parse_instance(&self.instance)?;
        log::info!(
            "[trigger] {} -> osd.{}",
            self.instance,
            req.osd_id.as_deref().unwrap_or_default()
        );
        activate(ctx, &req, Backend::Filestore)
    }
}

pub fn parse_instance(instance: &str) -> Result<ActivateRequest> {
    let re = Regex::new(INSTANCE_RE).context("compile instance regex")?;
    let Some(caps) = re.captures(instance.trim()) else {
        bail!("unable to parse unit instance {instance:?}, expected <kind>-<id>-<fsid>");
    };
    if &caps["kind"] != "lvm" {
        bail!("unsupported volume kind {:?} in {instance:?}", &caps["kind"]);
    }
    Ok(ActivateRequest::new(
        Some(caps["id"].to_string()),
        Some(caps["fsid"].to_string()),
    ))
}
