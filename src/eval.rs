use std::io::{self, Write};
use std::os::unix::io::{AsRawFd, OwnedFd};

use nix::fcntl::OFlag;
use nix::unistd;
use tracing::{debug, warn};

use crate::builtin;
use crate::error::ShellError;
use crate::global::Session;
use crate::job::{self, Job, JobBuilder};
use crate::parser;
use crate::redirect;
use crate::search;
use crate::types::{Pipeline, Stage};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EvalResult {
	Done(i32),
	Exit,
}

type Pipe = (OwnedFd, OwnedFd);

fn build_pipes(count: usize) -> Result<Vec<Pipe>, ShellError> {
	let pipes = (0..count)
		.map(|_| unistd::pipe2(OFlag::O_CLOEXEC))
		.collect::<nix::Result<Vec<Pipe>>>()
		.map_err(ShellError::PipeCreation)?;
	debug!(count, "pipes created");
	Ok(pipes)
}

fn setup_stage(session: &Session, stage: &Stage, i: usize, pipes: Vec<Pipe>) -> Result<(), ShellError> {
	session.policy.restore_defaults().map_err(ShellError::SignalReset)?;
	if i > 0 {
		unistd::dup2(pipes[i - 1].0.as_raw_fd(), libc::STDIN_FILENO).map_err(ShellError::Plumbing)?;
	}
	if i < pipes.len() {
		unistd::dup2(pipes[i].1.as_raw_fd(), libc::STDOUT_FILENO).map_err(ShellError::Plumbing)?;
	}
	// Any extra write end left open keeps a reader from ever seeing EOF.
	drop(pipes);
	redirect::apply(&stage.redirects)
}

/// Child side of a fork. Never returns.
fn exec_stage(session: &Session, stage: &Stage, i: usize, pipes: Vec<Pipe>) -> ! {
	let err = match setup_stage(session, stage, i, pipes) {
		Ok(()) => search::exec(&session.search, &stage.argv),
		Err(e) => e,
	};
	let _ = writeln!(&mut io::stderr(), "ish: {}", err);
	unsafe { libc::_exit(err.exit_code()) }
}

/// Spawn one process per stage, wired with pipes, and wait for all of them.
pub fn run_pipeline(session: &mut Session, pipeline: &Pipeline) -> Result<Job, ShellError> {
	let pipes = build_pipes(pipeline.pipe_count())?;
	let _ = io::stdout().flush();

	let mut job_builder = JobBuilder::new(pipeline.stages.len());
	let mut spawn_error = None;
	for (i, stage) in pipeline.stages.iter().enumerate() {
		match job_builder.push_fork(i) {
			Ok(unistd::ForkResult::Parent { .. }) => {},
			Ok(unistd::ForkResult::Child) => exec_stage(session, stage, i, pipes),
			Err(e) => {
				spawn_error = Some(ShellError::Fork(e));
				break;
			},
		}
	}
	// The shell only plumbs; it never reads or writes these.
	drop(pipes);

	let mut job = match job_builder.build() {
		Some(job) => job,
		None => return Err(spawn_error.unwrap_or(ShellError::Fork(nix::Error::EAGAIN))),
	};
	let waited = {
		let _fg = job::Foreground::transfer(&*session.terminal, job.pgid, session.shell_pgid);
		job.wait()
	};
	if let Err(e) = waited {
		warn!(pgid = job.pgid.as_raw(), error = %e, "waiting for pipeline failed");
	}
	match (spawn_error, waited) {
		(Some(e), _) => Err(e),
		(None, Err(e)) => Err(ShellError::Wait(e)),
		(None, Ok(())) => Ok(job),
	}
}

/// Exit status of a finished pipeline; a stage never reaped has no status to report.
fn pipeline_status(job: &Job) -> Result<i32, ShellError> {
	job.code().ok_or(ShellError::Wait(nix::Error::ECHILD))
}

/// Run one tokenized line: a built-in in-process, anything else as a pipeline.
pub fn eval<S: AsRef<[u8]>>(session: &mut Session, tokens: &[S], out: &mut dyn Write) -> Result<EvalResult, ShellError> {
	let first = match tokens.first() {
		Some(first) => first.as_ref(),
		None => return Ok(EvalResult::Done(0)),
	};
	let is_pipeline = tokens.iter().any(|t| t.as_ref() == parser::PIPE_SEPARATOR);

	if let Some(b) = builtin::match_builtin(first) {
		if is_pipeline {
			return Err(ShellError::UnsupportedBuiltinInPipeline(b.name.to_string()));
		}
		let args: Vec<&[u8]> = tokens.iter().map(|t| t.as_ref()).collect();
		return (b.run)(session, &args, out);
	}

	let pipeline = parser::parse(tokens)?;
	if pipeline.stages.len() > 1 {
		if let Some(stage) = pipeline.stages.iter().find(|s| builtin::match_builtin(s.name()).is_some()) {
			return Err(ShellError::UnsupportedBuiltinInPipeline(String::from_utf8_lossy(stage.name()).into_owned()));
		}
	}
	let job = run_pipeline(session, &pipeline)?;
	Ok(EvalResult::Done(pipeline_status(&job)?))
}
