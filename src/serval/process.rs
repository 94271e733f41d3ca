//! servald process runner
//!
//! Spawns the `servald` CLI against a specific instance directory and
//! captures its output.

use anyhow::{bail, Context, Result};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

/// Environment variable servald reads its instance directory from
pub const INSTANCE_PATH_ENV: &str = "SERVALINSTANCE_PATH";

/// Output from a servald invocation
#[derive(Debug, Clone)]
pub struct ServalOutput {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub status: i32,
    /// Whether the process was killed due to timeout
    pub timed_out: bool,
}

impl ServalOutput {
    pub fn success(&self) -> bool {
        self.status == 0 && !self.timed_out
    }

    pub fn stdout_string(&self) -> String {
        self.stdout.join("\n")
    }

    pub fn stderr_string(&self) -> String {
        self.stderr.join("\n")
    }

    /// Values of a CLI table: the count and column-name lines are skipped,
    /// as are blank lines.
    pub fn table_values(&self) -> Vec<String> {
        self.stdout
            .iter()
            .skip(2)
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Runs servald commands for one instance
#[derive(Debug, Clone)]
pub struct ServalRunner {
    exe_path: PathBuf,
    instance_path: Option<PathBuf>,
    default_timeout: Option<Duration>,
}

impl ServalRunner {
    pub fn new(exe_path: impl AsRef<Path>) -> Self {
        Self {
            exe_path: exe_path.as_ref().to_path_buf(),
            instance_path: None,
            default_timeout: None,
        }
    }

    /// Set the instance directory passed through `SERVALINSTANCE_PATH`
    pub fn with_instance(mut self, instance_path: impl AsRef<Path>) -> Self {
        self.instance_path = Some(instance_path.as_ref().to_path_buf());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn run(&self, args: &[&str]) -> Result<ServalOutput> {
        self.run_with_timeout(args, self.default_timeout)
    }

    /// Run and fail unless servald exits successfully
    pub fn run_checked(&self, args: &[&str]) -> Result<ServalOutput> {
        let output = self.run(args)?;
        if !output.success() {
            let detail = if output.stderr.is_empty() {
                output.stdout_string()
            } else {
                output.stderr_string()
            };
            if output.timed_out {
                bail!("servald {} timed out", args.join(" "));
            }
            bail!(
                "servald {} failed (exit {}): {}",
                args.join(" "),
                output.status,
                detail.trim()
            );
        }
        Ok(output)
    }

    pub fn run_with_timeout(&self, args: &[&str], timeout: Option<Duration>) -> Result<ServalOutput> {
        let mut cmd = self.build_command(args);
        tracing::debug!("Running {:?} {}", self.exe_path, args.join(" "));

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn servald: {:?}", self.exe_path))?;

        let stdout = child.stdout.take().context("servald stdout not captured")?;
        let stderr = child.stderr.take().context("servald stderr not captured")?;

        let (stdout_tx, stdout_rx) = mpsc::channel();
        let (stderr_tx, stderr_rx) = mpsc::channel();

        let stdout_thread = thread::spawn(move || capture_output(stdout, stdout_tx));
        let stderr_thread = thread::spawn(move || capture_output(stderr, stderr_tx));

        let (status, timed_out) = match timeout {
            Some(duration) => wait_with_timeout(&mut child, duration)?,
            None => (child.wait()?, false),
        };

        // Reader threads end when the pipes close. A daemon forked by
        // `servald start` may hold them open, so don't block on the join
        // after a timeout.
        if !timed_out {
            let _ = stdout_thread.join();
            let _ = stderr_thread.join();
        }

        Ok(ServalOutput {
            stdout: stdout_rx.try_iter().collect(),
            stderr: stderr_rx.try_iter().collect(),
            status: status.code().unwrap_or(-1),
            timed_out,
        })
    }

    /// Run with output discarded. Used for `start`, whose forked daemon
    /// would otherwise inherit the capture pipes.
    pub fn run_quiet(&self, args: &[&str]) -> Result<ExitStatus> {
        let mut cmd = self.build_command(args);
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        tracing::debug!("Running {:?} {} (quiet)", self.exe_path, args.join(" "));

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn servald: {:?}", self.exe_path))?;
        let status = match self.default_timeout {
            Some(duration) => {
                let (status, timed_out) = wait_with_timeout(&mut child, duration)?;
                if timed_out {
                    bail!("servald {} timed out", args.join(" "));
                }
                status
            }
            None => child.wait()?,
        };
        Ok(status)
    }

    fn build_command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.exe_path);
        cmd.args(args);

        if let Some(ref instance) = self.instance_path {
            cmd.env(INSTANCE_PATH_ENV, instance);
        }

        cmd.stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null());

        cmd
    }

    pub fn exe_path(&self) -> &Path {
        &self.exe_path
    }

    pub fn instance_path(&self) -> Option<&Path> {
        self.instance_path.as_deref()
    }
}

fn capture_output<R: std::io::Read>(reader: R, tx: Sender<String>) {
    let reader = BufReader::new(reader);
    for line in reader.lines().map_while(Result::ok) {
        let _ = tx.send(line);
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<(ExitStatus, bool)> {
    let start = std::time::Instant::now();
    loop {
        match child.try_wait()? {
            Some(status) => return Ok((status, false)),
            None => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let status = child.wait()?;
                    return Ok((status, true));
                }
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}
