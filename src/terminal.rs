use std::io::{self, IsTerminal};

use nix::errno::Errno;
use nix::unistd::{self, Pid};

/// The controlling terminal, as far as job control cares.
pub trait Terminal {
	fn is_interactive(&self) -> bool;
	fn foreground(&self) -> nix::Result<Pid>;
	fn set_foreground(&self, pgid: Pid) -> nix::Result<()>;
}

/// Standard input's terminal.
#[derive(Debug)]
pub struct Tty {
	stdin: io::Stdin,
}

impl Tty {
	pub fn stdin() -> Option<Tty> {
		let stdin = io::stdin();
		if stdin.is_terminal() {
			Some(Tty { stdin: stdin })
		} else {
			None
		}
	}
}

impl Terminal for Tty {
	fn is_interactive(&self) -> bool {
		true
	}

	fn foreground(&self) -> nix::Result<Pid> {
		unistd::tcgetpgrp(&self.stdin)
	}

	fn set_foreground(&self, pgid: Pid) -> nix::Result<()> {
		unistd::tcsetpgrp(&self.stdin, pgid)
	}
}

/// No controlling terminal: batch input, or a test.
#[derive(Debug, Default)]
pub struct Detached;

impl Terminal for Detached {
	fn is_interactive(&self) -> bool {
		false
	}

	fn foreground(&self) -> nix::Result<Pid> {
		Err(Errno::ENOTTY)
	}

	fn set_foreground(&self, _: Pid) -> nix::Result<()> {
		Err(Errno::ENOTTY)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detached_terminal_refuses_job_control() {
		let t = Detached;
		assert!(!t.is_interactive());
		assert_eq!(t.foreground(), Err(Errno::ENOTTY));
		assert_eq!(t.set_foreground(unistd::getpgrp()), Err(Errno::ENOTTY));
	}

	#[test]
	fn tty_exists_only_for_a_terminal_stdin() {
		assert_eq!(Tty::stdin().is_some(), io::stdin().is_terminal());
	}
}
