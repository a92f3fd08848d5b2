use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

/// Keyboard and terminal job-control signals. SIGSTOP cannot be ignored,
/// so SIGTSTP is the stop signal handled here.
pub const JOB_CONTROL: [Signal; 7] = [
	Signal::SIGINT,
	Signal::SIGQUIT,
	Signal::SIGTERM,
	Signal::SIGTSTP,
	Signal::SIGCONT,
	Signal::SIGTTIN,
	Signal::SIGTTOU,
];

/// Job-control signals plus SIGPIPE, which the Rust runtime starts out ignoring.
pub const CHILD_DEFAULTS: [Signal; 8] = [
	Signal::SIGINT,
	Signal::SIGQUIT,
	Signal::SIGTERM,
	Signal::SIGTSTP,
	Signal::SIGCONT,
	Signal::SIGTTIN,
	Signal::SIGTTOU,
	Signal::SIGPIPE,
];

/// Which signals the shell ignores, and which a fresh child puts back to default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPolicy {
	pub ignored: &'static [Signal],
	pub defaulted: &'static [Signal],
}

impl SignalPolicy {
	pub fn shell() -> SignalPolicy {
		SignalPolicy { ignored: &JOB_CONTROL, defaulted: &CHILD_DEFAULTS }
	}

	fn set_all(signals: &[Signal], handler: SigHandler) -> nix::Result<()> {
		let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
		for &sig in signals {
			unsafe { signal::sigaction(sig, &action)?; }
		}
		Ok(())
	}

	/// Shell side, once at startup.
	pub fn ignore(&self) -> nix::Result<()> {
		SignalPolicy::set_all(self.ignored, SigHandler::SigIgn)
	}

	/// Child side, right after fork.
	pub fn restore_defaults(&self) -> nix::Result<()> {
		SignalPolicy::set_all(self.defaulted, SigHandler::SigDfl)
	}
}

impl Default for SignalPolicy {
	fn default() -> SignalPolicy {
		SignalPolicy::shell()
	}
}
