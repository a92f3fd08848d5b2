use crate::error::ShellError;
use crate::redirect;
use crate::types::Pipeline;

pub const PIPE_SEPARATOR: &[u8] = b"|";

type ParseResult<T> = Result<T, ShellError>;

/// Split a token line into stages on standalone `|` tokens.
pub fn parse<'a, S: AsRef<[u8]>>(tokens: &'a [S]) -> ParseResult<Pipeline<'a>> {
	let mut stages = vec![];
	let mut words: Vec<&'a [u8]> = vec![];
	let mut push_stage = |words: &mut Vec<&'a [u8]>| -> ParseResult<()> {
		if words.is_empty() {
			return Err(ShellError::Parse("empty command around '|'".to_string()));
		}
		stages.push(redirect::extract(words)?);
		words.clear();
		Ok(())
	};

	for token in tokens {
		let token = token.as_ref();
		if token == PIPE_SEPARATOR {
			push_stage(&mut words)?;
		} else {
			words.push(token);
		}
	}
	push_stage(&mut words)?;
	Ok(Pipeline { stages: stages })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::RedirectType;

	fn parse_str(line: &str) -> ParseResult<Vec<Vec<String>>> {
		let tokens: Vec<&str> = line.split_whitespace().collect();
		let pipeline = parse(&tokens)?;
		Ok(pipeline.stages.iter()
			.map(|s| s.argv.iter().map(|w| String::from_utf8_lossy(w).into_owned()).collect())
			.collect())
	}

	#[test]
	fn single_stage() {
		assert_eq!(parse_str("ls -l /tmp").unwrap(), vec![vec!["ls", "-l", "/tmp"]]);
	}

	#[test]
	fn stages_keep_their_order() {
		let stages = parse_str("cat f | sort -r | uniq -c").unwrap();
		assert_eq!(stages, vec![vec!["cat", "f"], vec!["sort", "-r"], vec!["uniq", "-c"]]);
	}

	#[test]
	fn pipe_count_is_stages_minus_one() {
		let tokens = ["a", "|", "b", "|", "c"];
		assert_eq!(parse(&tokens).unwrap().pipe_count(), 2);
		assert_eq!(parse(&["a"]).unwrap().pipe_count(), 0);
	}

	#[test]
	fn empty_stages_are_rejected() {
		for line in &["| cat", "echo a |", "echo a | | cat", "|", ""] {
			match parse_str(line) {
				Err(ShellError::Parse(_)) => {},
				other => panic!("{:?} parsed as {:?}", line, other),
			}
		}
	}

	#[test]
	fn redirects_stay_with_their_stage() {
		let tokens = ["cat", "<", "in", "|", "wc", "-l", ">", "out"];
		let pipeline = parse(&tokens).unwrap();
		assert_eq!(pipeline.stages[0].argv, vec![&b"cat"[..]]);
		assert_eq!(pipeline.stages[0].redirects[0].typ, RedirectType::Input);
		assert_eq!(pipeline.stages[1].argv, vec![&b"wc"[..], b"-l"]);
		assert_eq!(pipeline.stages[1].redirects[0].target, b"out");
	}

	#[test]
	fn accepts_owned_tokens() {
		let tokens = vec!["echo".to_string(), "a".to_string()];
		assert_eq!(parse(&tokens).unwrap().stages[0].name(), b"echo");
	}

	#[test]
	fn accepts_raw_byte_tokens() {
		let tokens = vec![b"cat".to_vec(), b"<".to_vec(), b"f\xff".to_vec()];
		let pipeline = parse(&tokens).unwrap();
		assert_eq!(pipeline.stages[0].redirects[0].target, b"f\xff");
	}
}
