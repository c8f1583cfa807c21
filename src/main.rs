use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tracing_subscriber::{EnvFilter, fmt};

mod activate;
mod commands;
mod config;
mod error;
mod osd;
mod tooling;
mod ui;
mod utils;
mod volume;

use commands::lvm;
use config::Config;
use tooling::Toolbox;
use utils::process::ProcessRunner;

pub struct AppCtx {
    pub cfg: Config,
    pub tools: Toolbox,
}

#[derive(Parser, Debug)]
#[command(
    name = "osd-activate",
    about = "Bring prepared Ceph OSDs online from their tagged LVM volumes",
    arg_required_else_help = false,
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    #[arg(long, default_value = config::DEFAULT_CONFIG, global = true)]
    config: PathBuf,

    #[arg(long, global = true)]
    debug: bool,

    #[arg(long, global = true)]
    check_config: bool,

    #[arg(long, global = true)]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Use LVM and LVM-based technologies to deploy OSDs
    Lvm(lvm::LvmArgs),
}

fn init_tracing(debug: bool) {
    let default = if debug { "trace" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(debug)
        .with_line_number(debug)
        .without_time()
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if cli.command.is_none() && !cli.check_config && !cli.print_config {
        let mut cmd = Cli::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    }
    let cfg = Config::load(&cli.config)?;

    if cli.check_config {
        tracing::info!("config OK");
        return Ok(());
    }
    if cli.print_config {
        println!("{}", cfg.to_toml()?);
        return Ok(());
    }

    let Some(cmd) = cli.command else {
        let mut cmd = Cli::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    let runner = Arc::new(ProcessRunner::new(cfg.exec.sudo));
    let tools = Toolbox::new(&cfg, runner);
    let ctx = AppCtx { cfg, tools };

    match cmd {
        Cmd::Lvm(args) => args.run(&ctx),
    }
}
