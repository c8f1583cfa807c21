use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use anyhow::{Result, bail};

use crate::utils::process::{CmdSpec, Probe, Runner};

/// Runner that answers from a script keyed by program name and records every
/// command line it was asked to run.
#[derive(Default)]
pub struct ScriptedRunner {
    captures: HashMap<String, String>,
    probes: HashMap<String, Probe>,
    failing: HashSet<String>,
    log: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn capture(mut self, program: &str, stdout: &str) -> Self {
        self.captures.insert(program.into(), stdout.into());
        self
    }

    #[must_use]
    pub fn probe(mut self, program: &str, code: i32, stdout: &str) -> Self {
        self.probes.insert(
            program.into(),
            Probe {
                code: Some(code),
                stdout: stdout.into(),
            },
        );
        self
    }

    #[must_use]
    pub fn fail(mut self, program: &str) -> Self {
        self.failing.insert(program.into());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, cmd: &CmdSpec) -> String {
        let line = cmd.render();
        self.log.lock().unwrap().push(line.clone());
        line.split(' ').next().unwrap_or_default().to_string()
    }
}

impl Runner for ScriptedRunner {
    fn run(&self, cmd: &CmdSpec) -> Result<()> {
        let program = self.record(cmd);
        if self.failing.contains(&program) {
            bail!("command failed: {}", cmd.render());
        }
        Ok(())
    }

    fn run_capture(&self, cmd: &CmdSpec) -> Result<String> {
        let program = self.record(cmd);
        match self.captures.get(&program) {
            Some(out) if !self.failing.contains(&program) => Ok(out.clone()),
            _ => bail!("command failed: {}", cmd.render()),
        }
    }

    fn run_probe(&self, cmd: &CmdSpec) -> Result<Probe> {
        let program = self.record(cmd);
        match self.probes.get(&program) {
            Some(p) => Ok(p.clone()),
            None => bail!("spawn {}", cmd.render()),
        }
    }
}
