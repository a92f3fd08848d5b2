use std::env;
use std::ffi::OsStr;
use std::io::Write;
use std::os::unix::ffi::OsStrExt;

use crate::error::ShellError;
use crate::eval::EvalResult;
use crate::global::Session;

pub type Handler = fn(&mut Session, &[&[u8]], &mut dyn Write) -> Result<EvalResult, ShellError>;

pub struct Builtin {
	pub name: &'static str,
	pub run: Handler,
	pub doc: &'static str,
}

pub static BUILTINS: [Builtin; 4] = [
	Builtin { name: "?", run: builtin_help, doc: "show this help menu" },
	Builtin { name: "exit", run: builtin_exit, doc: "exit the command shell" },
	Builtin { name: "pwd", run: builtin_pwd, doc: "print the current working directory" },
	Builtin { name: "cd", run: builtin_cd, doc: "change the current directory" },
];

pub fn builtin_help(_: &mut Session, _: &[&[u8]], out: &mut dyn Write) -> Result<EvalResult, ShellError> {
	for b in BUILTINS.iter() {
		writeln!(out, "{} - {}", b.name, b.doc)?;
	}
	Ok(EvalResult::Done(0))
}

pub fn builtin_exit(_: &mut Session, _: &[&[u8]], _: &mut dyn Write) -> Result<EvalResult, ShellError> {
	Ok(EvalResult::Exit)
}

pub fn builtin_pwd(_: &mut Session, _: &[&[u8]], out: &mut dyn Write) -> Result<EvalResult, ShellError> {
	let cwd = env::current_dir().map_err(|e| ShellError::Builtin { name: "pwd", message: e.to_string() })?;
	writeln!(out, "{}", cwd.display())?;
	Ok(EvalResult::Done(0))
}

pub fn builtin_cd(_: &mut Session, args: &[&[u8]], _: &mut dyn Write) -> Result<EvalResult, ShellError> {
	let target = match args.get(1) {
		Some(&t) => t,
		None => return Err(ShellError::Builtin { name: "cd", message: "missing operand".to_string() }),
	};
	env::set_current_dir(OsStr::from_bytes(target)).map_err(|e| ShellError::DirectoryNotFound {
		path: String::from_utf8_lossy(target).into_owned(),
		source: e,
	})?;
	Ok(EvalResult::Done(0))
}

pub fn match_builtin(name: &[u8]) -> Option<&'static Builtin> {
	BUILTINS.iter().find(|b| b.name.as_bytes() == name)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::search::SearchPath;

	fn run(line: &[&str]) -> (Result<EvalResult, ShellError>, String) {
		let mut session = Session::detached(SearchPath::new("/bin"));
		let args: Vec<&[u8]> = line.iter().map(|s| s.as_bytes()).collect();
		let mut out = vec![];
		let builtin = match_builtin(args[0]).expect("not a builtin");
		let r = (builtin.run)(&mut session, &args, &mut out);
		(r, String::from_utf8(out).unwrap())
	}

	#[test]
	fn lookup_is_exact() {
		assert!(match_builtin(b"cd").is_some());
		assert!(match_builtin(b"?").is_some());
		assert!(match_builtin(b"CD").is_none());
		assert!(match_builtin(b"cd ").is_none());
		assert!(match_builtin(b"ls").is_none());
	}

	#[test]
	fn help_lists_every_builtin_with_its_doc() {
		let (r, out) = run(&["?"]);
		assert!(matches!(r, Ok(EvalResult::Done(0))));
		assert_eq!(out.lines().count(), BUILTINS.len());
		assert!(out.contains("cd - change the current directory\n"));
		assert!(out.starts_with("? - show this help menu\n"));
	}

	#[test]
	fn exit_asks_the_loop_to_stop() {
		assert!(matches!(run(&["exit"]).0, Ok(EvalResult::Exit)));
	}

	#[test]
	fn pwd_prints_working_directory() {
		let (r, out) = run(&["pwd"]);
		assert!(r.is_ok());
		assert_eq!(out, format!("{}\n", env::current_dir().unwrap().display()));
	}

	#[test]
	fn failed_cd_leaves_directory_alone() {
		let before = env::current_dir().unwrap();
		let (r, _) = run(&["cd", "/nonexistent/really/not/here"]);
		assert!(matches!(r, Err(ShellError::DirectoryNotFound { .. })));
		assert_eq!(env::current_dir().unwrap(), before);
	}

	#[test]
	fn cd_needs_an_operand() {
		assert!(matches!(run(&["cd"]).0, Err(ShellError::Builtin { name: "cd", .. })));
	}
}
