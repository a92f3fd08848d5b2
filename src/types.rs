#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RedirectType { Input, Output }

#[derive(Debug, PartialEq, Eq)]
pub struct Redirect<'a> {
	pub target: &'a [u8],
	pub typ: RedirectType,
}

/// One program invocation; borrows from the line's tokens.
#[derive(Debug, PartialEq, Eq)]
pub struct Stage<'a> {
	pub argv: Vec<&'a [u8]>,
	pub redirects: Vec<Redirect<'a>>,
}

impl<'a> Stage<'a> {
	pub fn name(&self) -> &'a [u8] {
		self.argv[0]
	}
}

#[derive(Debug, PartialEq, Eq)]
pub struct Pipeline<'a> {
	pub stages: Vec<Stage<'a>>,
}

impl<'a> Pipeline<'a> {
	pub fn pipe_count(&self) -> usize {
		self.stages.len() - 1
	}
}
