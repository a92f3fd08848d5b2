use nix::sys::signal::{self, Signal};
use nix::unistd::{self, Pid};
use tracing::{debug, warn};

use crate::search::SearchPath;
use crate::signal::SignalPolicy;
use crate::terminal::{Detached, Terminal, Tty};

/// Everything the loop and the orchestrator share about this shell.
pub struct Session {
	pub terminal: Box<dyn Terminal>,
	pub shell_pgid: Pid,
	pub search: SearchPath,
	pub policy: SignalPolicy,
	pub line_num: usize,
}

impl Session {
	pub fn new(search: SearchPath) -> Session {
		match Tty::stdin() {
			Some(tty) => Session::with_terminal(Box::new(tty), search),
			None => Session::detached(search),
		}
	}

	pub fn detached(search: SearchPath) -> Session {
		Session::with_terminal(Box::new(Detached), search)
	}

	pub fn with_terminal(terminal: Box<dyn Terminal>, search: SearchPath) -> Session {
		Session {
			terminal: terminal,
			shell_pgid: unistd::getpgrp(),
			search: search,
			policy: SignalPolicy::shell(),
			line_num: 0,
		}
	}

	pub fn is_interactive(&self) -> bool {
		self.terminal.is_interactive()
	}

	/// Wait until we own the terminal, insulate the shell from keyboard
	/// signals, then claim the terminal for our own process group.
	pub fn init(&mut self) -> nix::Result<()> {
		if self.is_interactive() {
			loop {
				let pgrp = unistd::getpgrp();
				if self.terminal.foreground()? == pgrp {
					break;
				}
				signal::killpg(pgrp, Signal::SIGTTIN)?;
			}
		}

		self.policy.ignore()?;

		if self.is_interactive() {
			let pid = unistd::getpid();
			if unistd::getpgrp() != pid {
				if let Err(e) = unistd::setpgid(pid, pid) {
					warn!(error = %e, "cannot create own process group");
				}
			}
			self.shell_pgid = unistd::getpgrp();
			self.terminal.set_foreground(self.shell_pgid)?;
			debug!(pgid = self.shell_pgid.as_raw(), "shell owns the terminal");
		}
		Ok(())
	}
}
