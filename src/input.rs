use std::io::{self, BufRead, Read};

use crate::error::ShellError;

pub const MAX_LINE: usize = 4096;

pub struct LineReader<R> {
	inner: R,
	max_line: usize,
}

impl<R: BufRead> LineReader<R> {
	pub fn new(inner: R, max_line: usize) -> LineReader<R> {
		LineReader { inner: inner, max_line: max_line }
	}

	fn discard_rest_of_line(&mut self) -> io::Result<()> {
		loop {
			let (done, used) = {
				let buf = self.inner.fill_buf()?;
				match buf.iter().position(|&c| c == b'\n') {
					Some(i) => (true, i + 1),
					None => (buf.is_empty(), buf.len()),
				}
			};
			self.inner.consume(used);
			if done {
				return Ok(());
			}
		}
	}

	/// `None` at end of input. Overlong lines are consumed and reported, never cut short.
	pub fn next_line(&mut self) -> Option<Result<Vec<u8>, ShellError>> {
		let mut line = vec![];
		let limit = self.max_line as u64 + 1;
		match (&mut self.inner).take(limit).read_until(b'\n', &mut line) {
			Ok(0) => return None,
			Ok(_) => {},
			Err(e) => return Some(Err(e.into())),
		}
		if line.last() == Some(&b'\n') {
			line.pop();
		} else if line.len() > self.max_line {
			if let Err(e) = self.discard_rest_of_line() {
				return Some(Err(e.into()));
			}
			return Some(Err(ShellError::LineTooLong(self.max_line)));
		}
		Some(Ok(line))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	fn raw_lines(input: &[u8], max: usize) -> Vec<Result<Vec<u8>, String>> {
		let mut reader = LineReader::new(Cursor::new(input.to_vec()), max);
		let mut out = vec![];
		while let Some(line) = reader.next_line() {
			out.push(line.map_err(|e| e.to_string()));
		}
		out
	}

	fn lines(input: &str, max: usize) -> Vec<Result<String, String>> {
		raw_lines(input.as_bytes(), max).into_iter()
			.map(|line| line.map(|l| String::from_utf8(l).unwrap()))
			.collect()
	}

	#[test]
	fn reads_lines_until_eof() {
		assert_eq!(lines("a b\nc\n", 16), vec![Ok("a b".to_string()), Ok("c".to_string())]);
		assert_eq!(lines("no newline", 16), vec![Ok("no newline".to_string())]);
		assert!(lines("", 16).is_empty());
	}

	#[test]
	fn exact_limit_is_accepted() {
		assert_eq!(lines("abcd\nef\n", 4), vec![Ok("abcd".to_string()), Ok("ef".to_string())]);
		assert_eq!(lines("abcd", 4), vec![Ok("abcd".to_string())]);
	}

	#[test]
	fn overlong_line_is_reported_and_skipped() {
		let got = lines("abcdefgh\nok\n", 4);
		assert_eq!(got.len(), 2);
		assert!(got[0].is_err());
		assert_eq!(got[1], Ok("ok".to_string()));
	}

	#[test]
	fn overlong_final_line_without_newline() {
		let got = lines("abcdefgh", 4);
		assert_eq!(got.len(), 1);
		assert!(got[0].is_err());
	}

	#[test]
	fn bytes_are_passed_through_untouched() {
		assert_eq!(raw_lines(b"cat < f\xff\n", 16), vec![Ok(b"cat < f\xff".to_vec())]);
	}
}
