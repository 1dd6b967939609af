//! Test doubles for the process and artwork seams.

use std::{
    collections::{HashMap, VecDeque},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    sync::{mpsc, oneshot},
    time::{self, Instant},
};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::Span;

use crate::services::mpris::{
    ArtServer, CommandOutput, CommandRunner, EngineSettings, KillSwitch, MediaError,
    MetadataStream, PlayerctlClient, StreamSettings, StreamingProcess, SyncEngine,
    protocol::FIELD_DELIMITER,
};

/// Formatted metadata line as the control program would print it
pub fn line(title: &str, status: &str, player: &str, position: u64) -> String {
    [
        title,
        "Artist",
        "Album",
        status,
        player,
        &position.to_string(),
        "180000000",
        "",
    ]
    .join(FIELD_DELIMITER)
}

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(0),
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

pub fn failed(stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(1),
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}

/// What a `start_streaming` call produces
#[derive(Debug, Clone)]
pub enum StreamScript {
    /// Stays open until the test finishes it or the stream kills it
    Live,
    /// Prints the given lines then exits
    Exit {
        stdout: Vec<String>,
        stderr: Vec<String>,
        code: Option<i32>,
    },
}

impl StreamScript {
    pub fn exit_silently() -> Self {
        Self::Exit {
            stdout: Vec::new(),
            stderr: Vec::new(),
            code: Some(1),
        }
    }

    pub fn print_then_exit(lines: &[String]) -> Self {
        Self::Exit {
            stdout: lines.to_vec(),
            stderr: Vec::new(),
            code: Some(0),
        }
    }
}

/// Handle on a `Live` process
pub struct LiveProcess {
    stdout: Option<mpsc::UnboundedSender<String>>,
    stderr: Option<mpsc::UnboundedSender<String>>,
    exit: Option<oneshot::Sender<Option<i32>>>,
    killed: Arc<AtomicBool>,
}

#[derive(Default)]
struct FakeState {
    responses: HashMap<String, CommandOutput>,
    calls: Vec<Vec<String>>,
    scripts: VecDeque<StreamScript>,
    default_script: Option<StreamScript>,
    live: Vec<LiveProcess>,
    spawn_times: Vec<Instant>,
    stream_args: Vec<Vec<String>>,
}

/// Scriptable [`CommandRunner`].
///
/// One-shot responses are keyed by verb, or by `player:verb` for
/// player-specific answers. Unknown keys succeed with empty output.
pub struct FakeRunner {
    installed: AtomicBool,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    state: Mutex<FakeState>,
}

impl Default for FakeRunner {
    fn default() -> Self {
        Self {
            installed: AtomicBool::new(true),
            delay: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            state: Mutex::new(FakeState::default()),
        }
    }
}

fn split_args(args: &[String]) -> (Option<String>, String) {
    let player = args
        .first()
        .and_then(|arg| arg.strip_prefix("--player="))
        .map(str::to_string);
    let verb = args
        .get(usize::from(player.is_some()))
        .cloned()
        .unwrap_or_default();
    (player, verb)
}

impl FakeRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_installed(&self, installed: bool) {
        self.installed.store(installed, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn respond(&self, verb: &str, output: CommandOutput) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(verb.to_string(), output);
    }

    pub fn respond_for(&self, player: &str, verb: &str, output: CommandOutput) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(format!("{player}:{verb}"), output);
    }

    pub fn roster(&self, players: &[&str]) {
        self.respond("--list-all", ok(&players.join("\n")));
    }

    pub fn queue_stream(&self, script: StreamScript) {
        self.state.lock().unwrap().scripts.push_back(script);
    }

    pub fn default_stream(&self, script: StreamScript) {
        self.state.lock().unwrap().default_script = Some(script);
    }

    /// Every one-shot invocation so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().calls.clone()
    }

    /// One-shot invocations whose verb is `verb`, as `(player, args)`
    pub fn calls_to(&self, verb: &str) -> Vec<(Option<String>, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|args| {
                let (player, found) = split_args(&args);
                (found == verb).then_some((player, args))
            })
            .collect()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn stream_spawns(&self) -> usize {
        self.state.lock().unwrap().spawn_times.len()
    }

    pub fn spawn_times(&self) -> Vec<Instant> {
        self.state.lock().unwrap().spawn_times.clone()
    }

    pub fn stream_args(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().stream_args.clone()
    }

    pub fn live_count(&self) -> usize {
        self.state.lock().unwrap().live.len()
    }

    pub fn emit(&self, process: usize, line: &str) {
        let state = self.state.lock().unwrap();
        if let Some(tx) = state.live[process].stdout.as_ref() {
            let _ = tx.send(line.to_string());
        }
    }

    pub fn emit_stderr(&self, process: usize, line: &str) {
        let state = self.state.lock().unwrap();
        if let Some(tx) = state.live[process].stderr.as_ref() {
            let _ = tx.send(line.to_string());
        }
    }

    /// Close a live process's output and report `code`
    pub fn finish(&self, process: usize, code: Option<i32>) {
        let mut state = self.state.lock().unwrap();
        let live = &mut state.live[process];
        live.stdout.take();
        live.stderr.take();
        if let Some(exit) = live.exit.take() {
            let _ = exit.send(code);
        }
    }

    pub fn was_killed(&self, process: usize) -> bool {
        self.state.lock().unwrap().live[process]
            .killed
            .load(Ordering::SeqCst)
    }

    fn response(&self, args: &[String]) -> CommandOutput {
        let (player, verb) = split_args(args);
        let state = self.state.lock().unwrap();

        player
            .and_then(|player| state.responses.get(&format!("{player}:{verb}")))
            .or_else(|| state.responses.get(&verb))
            .cloned()
            .unwrap_or_else(|| ok(""))
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    async fn run_once(&self, args: &[String]) -> Result<CommandOutput, MediaError> {
        self.state.lock().unwrap().calls.push(args.to_vec());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(self.response(args))
    }

    async fn start_streaming(&self, args: &[String]) -> Result<StreamingProcess, MediaError> {
        let mut state = self.state.lock().unwrap();
        state.spawn_times.push(Instant::now());
        state.stream_args.push(args.to_vec());

        let script = state
            .scripts
            .pop_front()
            .or_else(|| state.default_script.clone())
            .unwrap_or(StreamScript::Live);

        let (stdout_tx, stdout_rx) = mpsc::unbounded_channel();
        let (stderr_tx, stderr_rx) = mpsc::unbounded_channel();
        let (exit_tx, exit_rx) = oneshot::channel();
        let (kill, kill_rx) = KillSwitch::new();

        let process = StreamingProcess::new(
            Box::pin(UnboundedReceiverStream::new(stdout_rx)),
            Box::pin(UnboundedReceiverStream::new(stderr_rx)),
            exit_rx,
            kill,
        );

        match script {
            StreamScript::Live => {
                let killed = Arc::new(AtomicBool::new(false));
                let flag = Arc::clone(&killed);
                tokio::spawn(async move {
                    if kill_rx.await.is_ok() {
                        flag.store(true, Ordering::SeqCst);
                    }
                });
                state.live.push(LiveProcess {
                    stdout: Some(stdout_tx),
                    stderr: Some(stderr_tx),
                    exit: Some(exit_tx),
                    killed,
                });
            }
            StreamScript::Exit {
                stdout,
                stderr,
                code,
            } => {
                for line in stdout {
                    let _ = stdout_tx.send(line);
                }
                for line in stderr {
                    let _ = stderr_tx.send(line);
                }
                let _ = exit_tx.send(code);
            }
        }

        Ok(process)
    }
}

/// Records registrations instead of serving anything
#[derive(Default)]
pub struct FakeArtServer {
    registered: Mutex<Vec<PathBuf>>,
    stops: AtomicUsize,
}

impl FakeArtServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn registered(&self) -> Vec<PathBuf> {
        self.registered.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArtServer for FakeArtServer {
    async fn start(&self) -> Result<String, MediaError> {
        Ok("http://art.test".to_string())
    }

    async fn register_file(&self, path: &Path) -> Result<String, MediaError> {
        let mut registered = self.registered.lock().unwrap();
        let id = match registered.iter().position(|known| known == path) {
            Some(index) => index,
            None => {
                registered.push(path.to_path_buf());
                registered.len() - 1
            }
        };
        Ok(format!("http://art.test/art/{id}"))
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn stream_settings() -> StreamSettings {
    StreamSettings {
        max_restart_attempts: 5,
        restart_delay: Duration::from_secs(2),
    }
}

pub fn metadata_stream(runner: &Arc<FakeRunner>, art: &Arc<FakeArtServer>) -> MetadataStream {
    MetadataStream::new(
        runner.clone(),
        art.clone(),
        stream_settings(),
        Span::none(),
    )
}

/// Engine over fakes, with the default cadences
pub fn engine(runner: &Arc<FakeRunner>, art: &Arc<FakeArtServer>) -> SyncEngine {
    let backend = Arc::new(PlayerctlClient::new(
        runner.clone(),
        "playerctl",
        Vec::new(),
    ));
    let settings = EngineSettings::default();

    SyncEngine::new(
        backend,
        metadata_stream(runner, art),
        settings,
        Span::none(),
    )
}

/// Let spawned tasks run without moving the clock
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
