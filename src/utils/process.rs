use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

#[derive(Clone, Debug)]
pub enum StdioSpec {
    Inherit,
    Null,
    Pipe,
}

impl StdioSpec {
    #[inline]
    fn to_stdio(&self) -> Stdio {
        match self {
            StdioSpec::Inherit => Stdio::inherit(),
            StdioSpec::Null => Stdio::null(),
            StdioSpec::Pipe => Stdio::piped(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CmdSpec {
    program: String,
    args: Vec<String>,
    privileged: bool,
    stdout: StdioSpec,
    stderr: StdioSpec,
}

impl CmdSpec {
    #[must_use]
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            privileged: false,
            stdout: StdioSpec::Inherit,
            stderr: StdioSpec::Inherit,
        }
    }

    #[must_use]
    pub fn arg(mut self, a: impl Into<String>) -> Self {
        self.args.push(a.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, it: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(it.into_iter().map(Into::into));
        self
    }

    /// Marks a command that needs root (mount, symlink, chown).
    #[must_use]
    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    #[must_use]
    pub fn stdout(mut self, s: StdioSpec) -> Self {
        self.stdout = s;
        self
    }

    #[must_use]
    pub fn stderr(mut self, s: StdioSpec) -> Self {
        self.stderr = s;
        self
    }

    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(sh_quote(&self.program));
        parts.extend(self.args.iter().map(|a| sh_quote(a)));
        parts.join(" ")
    }

    fn to_command(&self, sudo: bool) -> Command {
        if sudo && self.privileged {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.program).args(&self.args);
            cmd
        } else {
            let mut cmd = Command::new(&self.program);
            cmd.args(&self.args);
            cmd
        }
    }
}

/// Exit status and captured stdout of a command whose failure is an answer,
/// not an error (e.g. `blkid` reporting "no match").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Probe {
    pub code: Option<i32>,
    pub stdout: String,
}

impl Probe {
    #[inline]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

pub trait Runner: Send + Sync {
    fn run(&self, cmd: &CmdSpec) -> Result<()>;
    fn run_capture(&self, cmd: &CmdSpec) -> Result<String>;
    fn run_probe(&self, cmd: &CmdSpec) -> Result<Probe>;
}

#[derive(Default, Clone)]
pub struct ProcessRunner {
    sudo: bool,
}

impl ProcessRunner {
    pub fn new(sudo: bool) -> Self {
        Self { sudo }
    }

    #[inline]
    fn to_process(&self, cmd: &CmdSpec) -> Command {
        cmd.to_command(self.sudo)
    }

    fn label(&self, cmd: &CmdSpec) -> String {
        if self.sudo && cmd.privileged {
            format!("sudo {}", cmd.render())
        } else {
            cmd.render()
        }
    }
}

impl Runner for ProcessRunner {
    fn run(&self, cmd: &CmdSpec) -> Result<()> {
        let label = self.label(cmd);
        tracing::debug!("exec: {label}");

        let status = self
            .to_process(cmd)
            .stdin(Stdio::null())
            .stdout(cmd.stdout.to_stdio())
            .stderr(cmd.stderr.to_stdio())
            .status()
            .with_context(|| format!("spawn {label}"))?;
        if !status.success() {
            bail!("command failed: {label} with {status}");
        }
        Ok(())
    }

    fn run_capture(&self, cmd: &CmdSpec) -> Result<String> {
        let probe = self.run_probe(cmd)?;
        if probe.success() {
            Ok(probe.stdout)
        } else {
            bail!(
                "command failed: {} (exit code {})",
                self.label(cmd),
                probe
                    .code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".into())
            );
        }
    }

    fn run_probe(&self, cmd: &CmdSpec) -> Result<Probe> {
        let label = self.label(cmd);
        tracing::debug!("exec(capture): {label}");

        let out = self
            .to_process(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(cmd.stderr.to_stdio())
            .output()
            .with_context(|| format!("run {label}"))?;
        Ok(Probe {
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
        })
    }
}

fn sh_quote(s: &str) -> String {
    if s.is_empty() {
        return "''".into();
    }
    if !s
        .bytes()
        .any(|b| b == b' ' || b == b'\'' || b == b'"' || b == b'\\')
    {
        return s.to_string();
    }
    let mut out = String::from("'");
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}
