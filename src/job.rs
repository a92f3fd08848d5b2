use nix::errno::Errno;
use nix::sys::signal::{self, Signal};
use nix::sys::wait::{self, WaitPidFlag, WaitStatus};
use nix::unistd::{self, Pid};
use tracing::{debug, warn};

use crate::terminal::Terminal;

trait WaitStatusExt {
	fn get_pid(self) -> Option<Pid>;
	fn is_terminated(self) -> bool;
}

impl WaitStatusExt for WaitStatus {
	fn get_pid(self) -> Option<Pid> {
		match self {
			WaitStatus::StillAlive => None,
			_ => self.pid(),
		}
	}

	fn is_terminated(self) -> bool {
		match self {
			WaitStatus::Exited(..) | WaitStatus::Signaled(..) => true,
			_ => false,
		}
	}
}

/// Shell-style status: exit code, or 128 + signal number.
pub fn status_code(status: WaitStatus) -> Option<i32> {
	match status {
		WaitStatus::Exited(_, code) => Some(code),
		WaitStatus::Signaled(_, sig, _) => Some(128 + sig as i32),
		_ => None,
	}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Process {
	pub pid: Pid,
	pub stage: usize,
	pub status: Option<WaitStatus>,
}

#[derive(Debug)]
pub struct Job {
	pub pgid: Pid,
	pub processes: Vec<Process>,
}

impl Job {
	pub fn is_done(&self) -> bool {
		self.processes.iter().all(|pr| pr.status.is_some())
	}

	/// Status of the rightmost stage that was spawned.
	pub fn code(&self) -> Option<i32> {
		self.processes.last().and_then(|pr| pr.status).and_then(status_code)
	}

	fn record(&mut self, status: WaitStatus) -> bool {
		let pid = match status.get_pid() {
			Some(pid) => pid,
			None => return false,
		};
		match self.processes.iter_mut().find(|pr| pr.pid == pid) {
			Some(pr) => {
				debug!(pid = pid.as_raw(), stage = pr.stage, ?status, "stage reaped");
				pr.status = Some(status);
				true
			},
			None => false,
		}
	}

	/// Reap every stage, in whatever order they finish. Stopped stages are
	/// resumed, since a pipeline can't be parked in the background.
	pub fn wait(&mut self) -> nix::Result<()> {
		let group = Pid::from_raw(-self.pgid.as_raw());
		while !self.is_done() {
			let status = retry_eintr(|| wait::waitpid(group, Some(WaitPidFlag::WUNTRACED)))?;
			if status.is_terminated() {
				if !self.record(status) {
					warn!(?status, "reaped a process outside the pipeline");
				}
			} else if let WaitStatus::Stopped(pid, sig) = status {
				warn!(pid = pid.as_raw(), signal = ?sig, "stage stopped; resuming it");
				signal::killpg(self.pgid, Signal::SIGCONT)?;
			}
		}
		Ok(())
	}
}

/// Retry a syscall interrupted by a signal.
pub fn retry_eintr<F, T>(f: F) -> nix::Result<T> where F: Fn() -> nix::Result<T> {
	loop {
		match f() {
			Err(Errno::EINTR) => {},
			result => return result,
		}
	}
}

/// Forks the stages of one pipeline into a single process group led by the first.
#[derive(Debug)]
pub struct JobBuilder {
	pgid: Option<Pid>,
	processes: Vec<Process>,
}

impl JobBuilder {
	pub fn new(size_hint: usize) -> JobBuilder {
		JobBuilder { pgid: None, processes: Vec::with_capacity(size_hint) }
	}

	/// Both sides call setpgid so the group exists whichever runs first.
	pub fn push_fork(&mut self, stage: usize) -> nix::Result<unistd::ForkResult> {
		let r = unsafe { unistd::fork()? };
		match r {
			unistd::ForkResult::Parent { child } => {
				let pgid = *self.pgid.get_or_insert(child);
				if let Err(e) = unistd::setpgid(child, pgid) {
					// EACCES: the child already exec'd, having joined the group itself.
					if e != Errno::EACCES {
						warn!(pid = child.as_raw(), error = %e, "setpgid failed");
					}
				}
				debug!(pid = child.as_raw(), pgid = pgid.as_raw(), stage, "stage spawned");
				self.processes.push(Process { pid: child, stage: stage, status: None });
			},
			unistd::ForkResult::Child => {
				let pgid = self.pgid.unwrap_or(Pid::from_raw(0));
				let _ = unistd::setpgid(Pid::from_raw(0), pgid);
			},
		}
		Ok(r)
	}

	pub fn build(self) -> Option<Job> {
		let pgid = self.pgid?;
		Some(Job { pgid: pgid, processes: self.processes })
	}
}

/// Hands the terminal to a job; gives it back to the shell when dropped.
pub struct Foreground<'a> {
	terminal: &'a dyn Terminal,
	shell_pgid: Pid,
	active: bool,
}

impl<'a> Foreground<'a> {
	pub fn transfer(terminal: &'a dyn Terminal, pgid: Pid, shell_pgid: Pid) -> Foreground<'a> {
		let mut active = false;
		if terminal.is_interactive() {
			match terminal.set_foreground(pgid) {
				Ok(()) => {
					debug!(pgid = pgid.as_raw(), "terminal handed to job");
					active = true;
				},
				Err(e) => warn!(pgid = pgid.as_raw(), error = %e, "cannot hand terminal to job"),
			}
		}
		Foreground { terminal: terminal, shell_pgid: shell_pgid, active: active }
	}
}

impl<'a> Drop for Foreground<'a> {
	fn drop(&mut self) {
		if !self.active {
			return;
		}
		match self.terminal.set_foreground(self.shell_pgid) {
			Ok(()) => debug!(pgid = self.shell_pgid.as_raw(), "terminal returned to shell"),
			Err(e) => warn!(error = %e, "cannot take the terminal back"),
		}
	}
}
