use std::{
    env, fs,
    os::unix::fs::PermissionsExt,
    path::Path,
    pin::Pin,
    process::Stdio,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use futures::Stream;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, BufReader},
    process::Command,
    sync::oneshot,
};
use tracing::{debug, instrument};

use super::MediaError;

/// Boxed line stream from a child process
pub type LineStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Result of a one-shot invocation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code, `None` if terminated by a signal
    pub exit_code: Option<i32>,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Executes the external control program.
///
/// No retry policy lives here; recovery belongs to the callers.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Whether the program can be found on the search path
    fn is_installed(&self) -> bool;

    /// Run to completion and capture output.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::ExecutionFailure` if the program cannot be spawned.
    async fn run_once(&self, args: &[String]) -> Result<CommandOutput, MediaError>;

    /// Start a long-running process whose output is consumed line by line.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::ExecutionFailure` if the program cannot be spawned.
    async fn start_streaming(&self, args: &[String]) -> Result<StreamingProcess, MediaError>;
}

/// Forcefully terminates a streaming process.
///
/// Clones share the same switch. Dropping every clone also kills the process.
#[derive(Clone, Debug)]
pub struct KillSwitch(Arc<Mutex<Option<oneshot::Sender<()>>>>);

impl KillSwitch {
    /// Create a switch and the receiver the process owner waits on
    pub fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self(Arc::new(Mutex::new(Some(tx)))), rx)
    }

    /// Request termination; later calls are no-ops
    pub fn trigger(&self) {
        let sender = self
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sender) = sender {
            let _ = sender.send(());
        }
    }
}

/// Handle to a live streaming child process
pub struct StreamingProcess {
    /// Stdout, one item per line
    pub stdout: LineStream,
    /// Stderr, one item per line
    pub stderr: LineStream,
    exit: oneshot::Receiver<Option<i32>>,
    kill: KillSwitch,
}

impl StreamingProcess {
    /// Assemble a handle from its parts
    pub fn new(
        stdout: LineStream,
        stderr: LineStream,
        exit: oneshot::Receiver<Option<i32>>,
        kill: KillSwitch,
    ) -> Self {
        Self {
            stdout,
            stderr,
            exit,
            kill,
        }
    }

    /// Wait for the exit code; `None` if killed or the code was lost
    pub async fn wait(&mut self) -> Option<i32> {
        (&mut self.exit).await.ok().flatten()
    }

    /// Shared switch that terminates this process
    pub fn kill_switch(&self) -> KillSwitch {
        self.kill.clone()
    }

    /// Force-kill the process
    pub fn kill(&self) {
        self.kill.trigger();
    }
}

impl Drop for StreamingProcess {
    fn drop(&mut self) {
        self.kill.trigger();
    }
}

/// Runs the control program with `tokio::process`
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    binary: String,
}

impl ProcessRunner {
    /// Runner for the given program name or path
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Program this runner invokes
    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn describe(&self, args: &[String]) -> String {
        let mut command = self.binary.clone();
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }

    fn execution_failure(&self, args: &[String], error: &std::io::Error) -> MediaError {
        MediaError::ExecutionFailure {
            command: self.describe(args),
            reason: error.to_string(),
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    fn is_installed(&self) -> bool {
        let candidate = Path::new(&self.binary);
        if candidate.components().count() > 1 {
            return is_executable(candidate);
        }

        env::var_os("PATH").is_some_and(|paths| {
            env::split_paths(&paths).any(|dir| is_executable(&dir.join(&self.binary)))
        })
    }

    #[instrument(skip(self), fields(binary = %self.binary))]
    async fn run_once(&self, args: &[String]) -> Result<CommandOutput, MediaError> {
        let output = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.execution_failure(args, &e))?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    #[instrument(skip(self), fields(binary = %self.binary))]
    async fn start_streaming(&self, args: &[String]) -> Result<StreamingProcess, MediaError> {
        let mut child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.execution_failure(args, &e))?;

        let missing_pipe = |name: &str| MediaError::ExecutionFailure {
            command: self.describe(args),
            reason: format!("{name} was not captured"),
        };
        let stdout = child.stdout.take().ok_or_else(|| missing_pipe("stdout"))?;
        let stderr = child.stderr.take().ok_or_else(|| missing_pipe("stderr"))?;

        let (exit_tx, exit_rx) = oneshot::channel();
        let (kill_switch, kill_rx) = KillSwitch::new();
        let pid = child.id();

        tokio::spawn(async move {
            let exit_code = tokio::select! {
                status = child.wait() => status.ok().and_then(|status| status.code()),
                _ = kill_rx => {
                    debug!(?pid, "Killing streaming process");
                    let _ = child.kill().await;
                    None
                }
            };
            let _ = exit_tx.send(exit_code);
        });

        Ok(StreamingProcess::new(
            line_stream(stdout),
            line_stream(stderr),
            exit_rx,
            kill_switch,
        ))
    }
}

fn line_stream<R>(reader: R) -> LineStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut lines = BufReader::new(reader).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            yield line;
        }
    })
}

fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
