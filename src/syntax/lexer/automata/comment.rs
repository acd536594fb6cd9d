use super::{Operator, RegexpLiteral, Root, Scanner, State, Token, TokenKind, Transition};


/// The state after a single slash, which may open a comment, a regexp literal or an
/// operator, depending on the next character and on the scanner flags.
#[derive(Debug)]
pub(super) struct Slash;


impl Slash {
	pub fn visit(self, input: Option<char>, scanner: &mut Scanner) -> Transition {
		match input {
			Some('/') => Transition::step(LineComment::new()),

			Some('*') => {
				scanner.in_comment = true;
				Transition::step(BlockComment::opened())
			}

			None => Transition::resume_produce(
				Root,
				Token::new(TokenKind::Operator, "/".into()),
			),

			_ if scanner.regex_allowed => Transition::resume(RegexpLiteral::new()),

			_ => Transition::resume(Operator::slash()),
		}
	}
}


impl From<Slash> for State {
	fn from(state: Slash) -> State {
		State::Slash(state)
	}
}


/// The state for lexing a line comment.
#[derive(Debug)]
pub(super) struct LineComment {
	text: String,
}


impl LineComment {
	pub fn new() -> Self {
		Self { text: "//".into() }
	}


	pub fn visit(mut self, input: Option<char>) -> Transition {
		match input {
			// Newline marks the end of the comment.
			Some('\n') | None => {
				Transition::resume_produce(Root, Token::new(TokenKind::Comment, self.text))
			}

			Some(c) => {
				self.text.push(c);
				Transition::step(self)
			}
		}
	}
}


impl From<LineComment> for State {
	fn from(state: LineComment) -> State {
		State::LineComment(state)
	}
}


/// The state for lexing a block comment. Newlines split the comment into one token per
/// line; the scanner flag records that the comment is still open across lines.
#[derive(Debug)]
pub(super) struct BlockComment {
	text: String,
	star: bool,
}


impl BlockComment {
	/// A block comment freshly opened by `/*`.
	pub fn opened() -> Self {
		Self { text: "/*".into(), star: false }
	}


	/// A block comment continuing on a new line, or after a checkpoint restore.
	pub fn resumed() -> Self {
		Self { text: String::new(), star: false }
	}


	pub fn visit(mut self, input: Option<char>, scanner: &mut Scanner) -> Transition {
		match input {
			Some('/') if self.star => {
				scanner.in_comment = false;
				self.text.push('/');
				Transition::produce(Root, Token::new(TokenKind::Comment, self.text))
			}

			// The comment continues on the next line.
			Some('\n') | None => {
				Transition::resume_produce(Root, Token::new(TokenKind::Comment, self.text))
			}

			Some(c) => {
				self.star = c == '*';
				self.text.push(c);
				Transition::step(self)
			}
		}
	}
}


impl From<BlockComment> for State {
	fn from(state: BlockComment) -> State {
		State::BlockComment(state)
	}
}
