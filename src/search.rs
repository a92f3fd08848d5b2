use std::convert::Infallible;
use std::env;
use std::ffi::{CString, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::unistd;

use crate::error::ShellError;

pub const PATH_KEY: &str = "PATH";
pub const DEFAULT_PATH: &str = "/usr/local/bin:/usr/bin:/bin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPath {
	dirs: Vec<PathBuf>,
}

impl SearchPath {
	pub fn new(path: &str) -> SearchPath {
		let dirs = env::split_paths(path)
			.map(|d| if d.as_os_str().is_empty() { PathBuf::from(".") } else { d })
			.collect();
		SearchPath { dirs: dirs }
	}

	/// Paths to try, in order, for a command name.
	pub fn candidates(&self, name: &[u8]) -> Vec<PathBuf> {
		let name = OsStr::from_bytes(name);
		if name.as_bytes().contains(&b'/') {
			vec![PathBuf::from(name)]
		} else {
			self.dirs.iter().map(|d| d.join(name)).collect()
		}
	}
}

fn to_cstring(path: &Path) -> Result<CString, Errno> {
	CString::new(path.as_os_str().as_bytes()).map_err(|_| Errno::EINVAL)
}

/// Replace the process image. Returns only when every candidate failed.
pub fn exec(search: &SearchPath, argv: &[&[u8]]) -> ShellError {
	let name = argv[0];
	let command = String::from_utf8_lossy(name).into_owned();
	let args: Result<Vec<CString>, _> = argv.iter().map(|&a| CString::new(a)).collect();
	let args = match args {
		Ok(args) => args,
		Err(_) => return ShellError::Exec { command: command, source: Errno::EINVAL },
	};

	let mut significant = None;
	for candidate in search.candidates(name) {
		let r: Result<Infallible, Errno> = to_cstring(&candidate).and_then(|path| unistd::execv(&path, &args));
		let errno = match r {
			Ok(never) => match never {},
			Err(errno) => errno,
		};
		if errno != Errno::ENOENT && errno != Errno::ENOTDIR && significant.is_none() {
			significant = Some(errno);
		}
	}
	match significant {
		Some(errno) => ShellError::Exec { command: command, source: errno },
		None => ShellError::CommandNotFound(command),
	}
}
