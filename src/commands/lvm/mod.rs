use anyhow::Result;
use clap::{Args, Subcommand};

use crate::AppCtx;

mod activate;
mod list;
mod trigger;

pub use activate::{ACTIVATE_LONG_ABOUT, ActivateArgs};
pub use list::ListArgs;
pub use trigger::TriggerArgs;

/// OSDs backed by LVM logical volumes.
#[derive(Debug, Args)]
pub struct LvmArgs {
    #[command(subcommand)]
    pub cmd: LvmCmd,
}

impl LvmArgs {
    pub fn run(&self, ctx: &AppCtx) -> Result<()> {
        self.cmd.run(ctx)
    }
}

#[derive(Debug, Subcommand)]
pub enum LvmCmd {
    /// Discover and mount the LVM device associated with an OSD ID and start the Ceph OSD
    #[command(long_about = ACTIVATE_LONG_ABOUT)]
    Activate(ActivateArgs),
    /// Activate the OSD named by a systemd unit instance
    Trigger(TriggerArgs),
    /// Show logical volumes carrying ceph tags
    List(ListArgs),
}

impl LvmCmd {
    pub fn run(&self, ctx: &AppCtx) -> Result<()> {
        match self {
            LvmCmd::Activate(args) => args.run(ctx),
            LvmCmd::Trigger(args) => args.run(ctx),
            LvmCmd::List(args) => args.run(ctx),
        }
    }
}
