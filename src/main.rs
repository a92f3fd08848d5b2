mod builtin;
mod config;
mod error;
mod eval;
mod global;
mod input;
mod job;
mod lexer;
mod parser;
mod redirect;
mod search;
mod signal;
mod terminal;
mod types;

use std::io::{self, BufRead, Write};
use std::process;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use config::Config;
use eval::EvalResult;
use global::Session;
use input::LineReader;
use search::SearchPath;

fn init_logging(config: &Config) {
	let filter = EnvFilter::try_new(&config.log_filter)
		.unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(false)
		.init();
}

/// Numbered prompt, only for a human at a terminal.
fn prompt(session: &Session, stdout: &mut io::Stdout) {
	if session.is_interactive() {
		let _ = write!(stdout, "{}: ", session.line_num);
		let _ = stdout.flush();
	}
}

fn run<R: BufRead>(session: &mut Session, reader: &mut LineReader<R>) -> i32 {
	let mut stdout = io::stdout();
	prompt(session, &mut stdout);
	while let Some(line) = reader.next_line() {
		let result = line
			.and_then(|line| lexer::tokenize(&line))
			.and_then(|tokens| eval::eval(session, &tokens[..], &mut stdout));
		let _ = stdout.flush();
		match result {
			Ok(EvalResult::Exit) => return 0,
			Ok(EvalResult::Done(code)) => debug!(code, "line finished"),
			Err(e) => eprintln!("ish: {}", e),
		}
		session.line_num += 1;
		prompt(session, &mut stdout);
	}
	0
}

fn main() {
	let config = Config::from_env();
	init_logging(&config);

	let mut session = Session::new(SearchPath::new(&config.search_path));
	if let Err(e) = session.init() {
		eprintln!("ish: cannot set up job control: {}", e);
	}

	let stdin = io::stdin();
	let mut reader = LineReader::new(stdin.lock(), config.max_line);
	let code = run(&mut session, &mut reader);
	let _ = io::stdout().flush();
	process::exit(code);
}
