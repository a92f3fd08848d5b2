use std::ffi::OsStr;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

use nix::unistd;

use crate::error::ShellError;
use crate::types::{Redirect, RedirectType, Stage};

const INPUT_OPERATOR: &[u8] = b"<";
const OUTPUT_OPERATOR: &[u8] = b">";

/// Owner and group may read and write; nobody executes.
const OUTPUT_MODE: u32 = 0o660;

/// Pull `<`/`>` pairs out of a stage's words, leaving the program's argv.
pub fn extract<'a>(words: &[&'a [u8]]) -> Result<Stage<'a>, ShellError> {
	let mut argv = Vec::with_capacity(words.len());
	let mut redirects = Vec::new();
	let mut iter = words.iter();
	while let Some(&word) = iter.next() {
		let typ = match word {
			INPUT_OPERATOR => RedirectType::Input,
			OUTPUT_OPERATOR => RedirectType::Output,
			_ => {
				argv.push(word);
				continue;
			},
		};
		match iter.next() {
			Some(&target) if target != INPUT_OPERATOR && target != OUTPUT_OPERATOR => {
				redirects.push(Redirect { target, typ });
			},
			_ => return Err(ShellError::Parse(format!("'{}' requires a file name", String::from_utf8_lossy(word)))),
		}
	}
	if argv.is_empty() {
		return Err(ShellError::Parse("redirection without a command".to_string()));
	}
	Ok(Stage { argv: argv, redirects: redirects })
}

fn open(redirect: &Redirect) -> Result<fs::File, ShellError> {
	let mut oopt = fs::OpenOptions::new();
	let op = match redirect.typ {
		RedirectType::Input => {
			oopt.read(true);
			"reading"
		},
		RedirectType::Output => {
			oopt.write(true).create(true).truncate(true).mode(OUTPUT_MODE);
			"writing"
		},
	};
	oopt.open(OsStr::from_bytes(redirect.target)).map_err(|e| ShellError::Redirection {
		op: op,
		path: String::from_utf8_lossy(redirect.target).into_owned(),
		source: e,
	})
}

/// Runs in the child: point stdin/stdout at the named files, in order.
pub fn apply(redirects: &[Redirect]) -> Result<(), ShellError> {
	for redirect in redirects {
		let file = open(redirect)?;
		let to = match redirect.typ {
			RedirectType::Input => libc::STDIN_FILENO,
			RedirectType::Output => libc::STDOUT_FILENO,
		};
		unistd::dup2(file.as_raw_fd(), to).map_err(ShellError::Plumbing)?;
	}
	Ok(())
}
