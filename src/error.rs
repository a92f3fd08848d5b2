use std::io;

use thiserror::Error;

pub const EXIT_REDIRECT: i32 = 1;
pub const EXIT_PLUMBING: i32 = 125;
pub const EXIT_EXEC: i32 = 126;
pub const EXIT_NOT_FOUND: i32 = 127;

#[derive(Debug, Error)]
pub enum ShellError {
	#[error("syntax error: {0}")]
	Parse(String),
	#[error("pipe: {0}")]
	PipeCreation(#[source] nix::Error),
	#[error("fork: {0}")]
	Fork(#[source] nix::Error),
	#[error("dup2: {0}")]
	Plumbing(#[source] nix::Error),
	#[error("signal: {0}")]
	SignalReset(#[source] nix::Error),
	#[error("wait: {0}")]
	Wait(#[source] nix::Error),
	#[error("{path}: open for {op}: {source}")]
	Redirection { op: &'static str, path: String, source: io::Error },
	#[error("{0}: command not found")]
	CommandNotFound(String),
	#[error("{command}: {source}")]
	Exec { command: String, source: nix::Error },
	#[error("cd: {path}: {source}")]
	DirectoryNotFound { path: String, source: io::Error },
	#[error("{name}: {message}")]
	Builtin { name: &'static str, message: String },
	#[error("{0}: built-in commands cannot be used in a pipeline")]
	UnsupportedBuiltinInPipeline(String),
	#[error("input line exceeds {0} bytes")]
	LineTooLong(usize),
	#[error(transparent)]
	Io(#[from] io::Error),
}

impl ShellError {
	/// Status a child reports when it dies with this error before exec.
	pub fn exit_code(&self) -> i32 {
		match *self {
			ShellError::Redirection { .. } => EXIT_REDIRECT,
			ShellError::Exec { .. } => EXIT_EXEC,
			ShellError::CommandNotFound(_) => EXIT_NOT_FOUND,
			_ => EXIT_PLUMBING,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn child_failures_have_distinct_statuses() {
		let redirect = ShellError::Redirection {
			op: "reading",
			path: "in.txt".to_string(),
			source: io::Error::from(io::ErrorKind::NotFound),
		};
		let exec = ShellError::Exec { command: "./x".to_string(), source: nix::Error::EACCES };
		let missing = ShellError::CommandNotFound("nope".to_string());
		let plumbing = ShellError::Plumbing(nix::Error::EBADF);
		let codes = [redirect.exit_code(), exec.exit_code(), missing.exit_code(), plumbing.exit_code()];
		for (i, a) in codes.iter().enumerate() {
			assert!(*a != 0);
			for b in &codes[i + 1..] {
				assert_ne!(a, b);
			}
		}
	}

	#[test]
	fn messages_name_the_culprit() {
		let e = ShellError::CommandNotFound("frobnicate".to_string());
		assert_eq!(e.to_string(), "frobnicate: command not found");
		let e = ShellError::UnsupportedBuiltinInPipeline("cd".to_string());
		assert!(e.to_string().starts_with("cd: "));
		let e = ShellError::Redirection {
			op: "writing",
			path: "out.txt".to_string(),
			source: io::Error::from(io::ErrorKind::PermissionDenied),
		};
		assert!(e.to_string().starts_with("out.txt: open for writing: "));
	}

	#[test]
	fn signal_reset_failure_names_signals_not_dup2() {
		let e = ShellError::SignalReset(nix::Error::EINVAL);
		assert!(e.to_string().starts_with("signal: "));
		assert_eq!(e.exit_code(), EXIT_PLUMBING);
	}
}
