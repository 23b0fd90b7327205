use crate::commands::external::command_for;
use crate::commands::CommandTable;
use crate::errors::{ShellError, ShellResult};
use crate::tokenizer::tokenize;
use os_pipe::{PipeReader, PipeWriter};
use std::io::{self, Read, Write};
use std::process::{Child, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Split input into pipeline stages
///
/// Splitting is quote-blind: a `|` inside quotes still separates stages.
pub fn split_pipeline(input: &str) -> Vec<&str> {
    input.split('|').map(|s| s.trim()).collect()
}

/// Check if input contains a pipeline
pub fn is_pipeline(input: &str) -> bool {
    input.contains('|')
}

/// The pipe linking stage `i` to stage `i + 1`.
///
/// Each end is taken exactly once: either by the stage it is wired to, or
/// by the orchestrator's close sweep. Dropping an end closes it.
struct Connection {
    reader: Option<PipeReader>,
    writer: Option<PipeWriter>,
}

impl Connection {
    fn open() -> ShellResult<Self> {
        let (reader, writer) = os_pipe::pipe().map_err(ShellError::PipeCreation)?;
        Ok(Self {
            reader: Some(reader),
            writer: Some(writer),
        })
    }

    fn close_writer(&mut self) {
        drop(self.writer.take());
    }

    fn close_reader(&mut self) {
        drop(self.reader.take());
    }
}

enum StageInput {
    Terminal,
    Pipe(PipeReader),
}

impl StageInput {
    fn into_stdio(self) -> Stdio {
        match self {
            StageInput::Terminal => Stdio::inherit(),
            StageInput::Pipe(reader) => Stdio::from(reader),
        }
    }

    fn into_reader(self) -> Box<dyn Read + Send> {
        match self {
            StageInput::Terminal => Box::new(io::stdin()),
            StageInput::Pipe(reader) => Box::new(reader),
        }
    }
}

enum StageOutput {
    Terminal,
    Pipe(PipeWriter),
}

impl StageOutput {
    fn into_stdio(self) -> Stdio {
        match self {
            StageOutput::Terminal => Stdio::inherit(),
            StageOutput::Pipe(writer) => Stdio::from(writer),
        }
    }

    fn into_writer(self) -> Box<dyn Write + Send> {
        match self {
            StageOutput::Terminal => Box::new(io::stdout()),
            StageOutput::Pipe(writer) => Box::new(writer),
        }
    }
}

/// Execute a pipeline whose last stage writes to the terminal.
pub fn execute_pipeline(table: &Arc<CommandTable>, line: &str) -> ShellResult<()> {
    run_pipeline(table, line, None)
}

/// Execute a pipeline whose last stage writes into `sink` instead of the terminal.
pub fn execute_pipeline_into(
    table: &Arc<CommandTable>,
    line: &str,
    sink: PipeWriter,
) -> ShellResult<()> {
    run_pipeline(table, line, Some(sink))
}

fn run_pipeline(
    table: &Arc<CommandTable>,
    line: &str,
    mut sink: Option<PipeWriter>,
) -> ShellResult<()> {
    let stages: Vec<Vec<String>> = split_pipeline(line)
        .into_iter()
        .map(tokenize)
        .filter(|argv| !argv.is_empty())
        .collect();

    if stages.len() < 2 {
        log::warn!("ignoring incomplete pipeline: {:?}", line);
        return Ok(());
    }

    let mut connections = (0..stages.len() - 1)
        .map(|_| Connection::open())
        .collect::<ShellResult<Vec<_>>>()?;

    let mut launched = Launched::default();
    let result = launch_stages(table, &stages, &mut connections, &mut sink, &mut launched);
    if let Err(e) = &result {
        log::warn!("pipeline launch stopped early: {}", e);
    }

    // Whatever was started gets reaped, even after a failed launch
    launched.finish(&mut connections, sink);
    result
}

fn launch_stages(
    table: &Arc<CommandTable>,
    stages: &[Vec<String>],
    connections: &mut [Connection],
    sink: &mut Option<PipeWriter>,
    launched: &mut Launched,
) -> ShellResult<()> {
    let last = stages.len() - 1;

    for (i, argv) in stages.iter().enumerate() {
        let name = argv[0].clone();
        let args = argv[1..].to_vec();

        let is_builtin = table.is_builtin(&name);
        let path = if is_builtin {
            None
        } else {
            match table.resolver().resolve(&name) {
                Some(path) => Some(path),
                None => {
                    // Dropped stage; its pipe ends are closed by the sweep
                    log::warn!("pipeline stage {} skipped: {} not found", i, name);
                    continue;
                }
            }
        };

        let stdin = match i.checked_sub(1).and_then(|p| connections[p].reader.take()) {
            Some(reader) => StageInput::Pipe(reader),
            None => StageInput::Terminal,
        };
        let stdout = if i < last {
            connections[i].writer.take()
        } else {
            sink.take()
        };
        let stdout = match stdout {
            Some(writer) => StageOutput::Pipe(writer),
            None => StageOutput::Terminal,
        };

        match path {
            None => launched
                .tasks
                .push(spawn_builtin(table, name, args, stdin, stdout)?),
            Some(path) => {
                let mut cmd = command_for(&name, &path, &args);
                cmd.stdin(stdin.into_stdio())
                    .stdout(stdout.into_stdio())
                    .stderr(Stdio::inherit());

                match cmd.spawn() {
                    Ok(child) => {
                        log::debug!("pipeline stage {} started {} (pid {})", i, name, child.id());
                        launched.children.push(child);
                    }
                    Err(e) => eprintln!("{}: {}", name, e),
                }
                // Dropping the command releases the parent's copies of the pipe ends
                drop(cmd);
            }
        }
    }

    Ok(())
}

/// Stages that are running and must be waited for.
#[derive(Default)]
struct Launched {
    children: Vec<Child>,
    tasks: Vec<JoinHandle<()>>,
}

impl Launched {
    /// Close every pipe end still held here, reap every child and join every
    /// builtin thread. Returns how many children were reaped.
    fn finish(self, connections: &mut [Connection], sink: Option<PipeWriter>) -> usize {
        for connection in connections.iter_mut() {
            connection.close_writer();
        }
        drop(sink);

        let mut reaped = 0;
        for mut child in self.children {
            match child.wait() {
                Ok(status) => {
                    log::debug!("pipeline stage {} finished: {}", child.id(), status);
                    reaped += 1;
                }
                Err(e) => log::warn!("failed to wait for pipeline stage: {}", e),
            }
        }

        for connection in connections.iter_mut() {
            connection.close_reader();
        }

        // Every pipe end is closed by now, so no builtin can still be blocked on one
        for task in self.tasks {
            if task.join().is_err() {
                log::warn!("builtin pipeline stage panicked");
            }
        }

        reaped
    }
}

/// Run a builtin stage on its own thread. The thread owns its stream ends
/// and drops its output when done, signalling EOF downstream.
fn spawn_builtin(
    table: &Arc<CommandTable>,
    name: String,
    args: Vec<String>,
    stdin: StageInput,
    stdout: StageOutput,
) -> ShellResult<JoinHandle<()>> {
    let table = Arc::clone(table);
    let handle = thread::Builder::new()
        .name(format!("builtin-{}", name))
        .spawn(move || {
            let mut input = stdin.into_reader();
            let mut output = stdout.into_writer();
            if let Err(e) = table.invoke(&name, &args, &mut *input, &mut *output) {
                eprintln!("{}", e);
            }
            if let Err(e) = output.flush() {
                log::warn!("builtin {} failed to flush its output: {}", name, e);
            }
        })?;
    Ok(handle)
}
