use std::ops::Deref;

use crate::error::ShellError;

/// Words of one input line, as raw bytes. Dropping the value releases them.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tokens {
	words: Vec<Vec<u8>>,
}

impl Deref for Tokens {
	type Target = [Vec<u8>];
	fn deref(&self) -> &[Vec<u8>] {
		&self.words
	}
}

struct Lexer<'a> {
	line: &'a [u8],
	i: usize,
}

impl<'a> Lexer<'a> {
	fn peek(&self) -> Option<u8> {
		self.line.get(self.i).cloned()
	}

	fn bump(&mut self) -> Option<u8> {
		let c = self.peek();
		if c.is_some() {
			self.i += 1;
		}
		c
	}

	fn proceed_while<F>(&mut self, f: F) where F: Fn(u8) -> bool {
		while let Some(c) = self.peek() {
			if !f(c) { break; }
			self.i += 1;
		}
	}

	fn skip_whitespaces(&mut self) {
		self.proceed_while(|c| c.is_ascii_whitespace());
	}

	fn read_single_quoted(&mut self, word: &mut Vec<u8>) -> Result<(), ShellError> {
		loop {
			match self.bump() {
				Some(b'\'') => return Ok(()),
				Some(c) => word.push(c),
				None => return Err(ShellError::Parse("unterminated '''".to_string())),
			}
		}
	}

	fn read_double_quoted(&mut self, word: &mut Vec<u8>) -> Result<(), ShellError> {
		loop {
			match self.bump() {
				Some(b'"') => return Ok(()),
				Some(b'\\') => match self.peek() {
					Some(c @ b'"') | Some(c @ b'\\') => {
						self.i += 1;
						word.push(c);
					},
					_ => word.push(b'\\'),
				},
				Some(c) => word.push(c),
				None => return Err(ShellError::Parse("unterminated '\"'".to_string())),
			}
		}
	}

	fn read_word(&mut self) -> Result<Vec<u8>, ShellError> {
		let mut word = vec![];
		while let Some(c) = self.peek() {
			if c.is_ascii_whitespace() { break; }
			self.i += 1;
			match c {
				b'\'' => self.read_single_quoted(&mut word)?,
				b'"' => self.read_double_quoted(&mut word)?,
				b'\\' => if let Some(e) = self.bump() { word.push(e) },
				_ => word.push(c),
			}
		}
		Ok(word)
	}
}

/// Split a line into words, honoring quotes and backslash escapes.
pub fn tokenize(line: &[u8]) -> Result<Tokens, ShellError> {
	let mut lexer = Lexer { line: line, i: 0 };
	let mut words = vec![];
	loop {
		lexer.skip_whitespaces();
		if lexer.peek().is_none() {
			break;
		}
		words.push(lexer.read_word()?);
	}
	Ok(Tokens { words: words })
}
