mod frame;
mod op;
mod scope;
#[cfg(test)]
mod tests;

use std::rc::Rc;

use crate::symbol::{Interner, Symbol};
use super::lexer::{Cursor, Keyword, Lexer, Scanner, Token, TokenKind};
use super::Style;
pub use frame::{Frame, FrameKind};
use op::Op;
pub use scope::Scope;


/// The resumable parser. Pulls tokens from the lexer, annotates them with rendering
/// styles and line indentation, and drives a permissive statement grammar that tracks
/// lexical scope and bracket nesting. The grammar never fails: a rule that does not
/// understand a token passes it along, degrading to unstyled output.
///
/// All grammar state can be captured at a line boundary with [`Parser::snapshot`] and
/// revived over a fresh character source, which is what makes highlighting restartable
/// from the middle of a document.
#[derive(Debug)]
pub struct Parser<'a, I> {
	lexer: Lexer<'a, I>,
	ops: Vec<Op>,
	scope: Option<Rc<Scope>>,
	frame: Rc<Frame>,
	column: u32,
	indented: u32,
	defining: bool,
}


impl<'a, I> Parser<'a, I>
where
	I: Iterator<Item = char>,
{
	pub fn new(chars: I, interner: &'a mut Interner) -> Self {
		Self {
			lexer: Lexer::new(Cursor::new(chars), interner),
			ops: vec![Op::Statements],
			scope: None,
			frame: Frame::root(),
			column: 0,
			indented: 0,
			defining: false,
		}
	}


	/// Capture all resumable state: the rule stack, the scope and frame chains, and
	/// the lexer's scanner flags.
	pub fn snapshot(&self) -> Checkpoint {
		Checkpoint {
			ops: self.ops.clone(),
			scope: self.scope.clone(),
			frame: self.frame.clone(),
			scanner: self.lexer.scanner(),
		}
	}


	fn push_ops(&mut self, ops: &[Op]) {
		for &op in ops.iter().rev() {
			self.ops.push(op);
		}
	}


	fn open_frame(&mut self, kind: FrameKind) {
		self.frame = Frame::open(&self.frame, kind, self.indented, self.column);
	}


	fn close_frame(&mut self) {
		if let Some(parent) = &self.frame.parent {
			self.frame = parent.clone();
		}
	}


	/// Bind a name in the innermost scope. Top level code has no scope, and top level
	/// declarations are deliberately not marked as definitions.
	fn bind(&mut self, name: Symbol) {
		if let Some(scope) = &self.scope {
			scope.bind(name);
			self.defining = true;
		}
	}


	fn in_scope(&self, name: Symbol) -> bool {
		self.scope
			.as_ref()
			.map_or(false, |scope| scope.resolves(name))
	}


	/// Apply a rule to a token, returning whether the token was consumed.
	fn apply(&mut self, op: Op, token: &Token) -> bool {
		match op {
			Op::Statements => {
				self.push_ops(&[Op::Statement, Op::Statements]);
				false
			}

			Op::Statement => match token.kind {
				TokenKind::Keyword(Keyword::Var) => {
					self.push_ops(&[
						Op::OpenFrame(FrameKind::Stat),
						Op::VarDef,
						Op::Expect(TokenKind::Semicolon),
						Op::CloseFrame,
					]);
					true
				}

				TokenKind::Keyword(Keyword::Conditional) => {
					self.push_ops(&[
						Op::OpenFrame(FrameKind::Stat),
						Op::Expression,
						Op::Statement,
						Op::CloseFrame,
					]);
					true
				}

				TokenKind::Keyword(Keyword::Connective) => {
					self.push_ops(&[
						Op::OpenFrame(FrameKind::Stat),
						Op::Statement,
						Op::CloseFrame,
					]);
					true
				}

				TokenKind::OpenBrace => {
					self.push_ops(&[
						Op::OpenFrame(FrameKind::Block),
						Op::Block,
						Op::CloseFrame,
					]);
					true
				}

				TokenKind::Keyword(Keyword::Function) => {
					self.push_ops(&[Op::FunctionDef]);
					true
				}

				// Anything else: an expression statement.
				_ => {
					self.push_ops(&[
						Op::OpenFrame(FrameKind::Stat),
						Op::Expression,
						Op::Expect(TokenKind::Semicolon),
						Op::CloseFrame,
					]);
					false
				}
			},

			Op::Expression => match token.kind {
				kind if kind.is_atomic() => {
					self.push_ops(&[Op::MaybeOperator]);
					true
				}

				TokenKind::Keyword(Keyword::Function) => {
					self.push_ops(&[Op::FunctionDef]);
					true
				}

				TokenKind::Keyword(Keyword::Prefix) => {
					self.push_ops(&[Op::Expression]);
					true
				}

				TokenKind::OpenParen => {
					self.push_ops(&[
						Op::OpenFrame(FrameKind::Block),
						Op::Expression,
						Op::Expect(TokenKind::CloseParen),
						Op::CloseFrame,
					]);
					true
				}

				// A prefix operator.
				TokenKind::Operator => {
					self.push_ops(&[Op::Expression]);
					true
				}

				_ => false,
			},

			Op::MaybeOperator => match token.kind {
				TokenKind::Operator => {
					self.push_ops(&[Op::Expression]);
					true
				}

				// A call: parenthesized, comma separated arguments.
				TokenKind::OpenParen => {
					self.push_ops(&[
						Op::OpenFrame(FrameKind::Block),
						Op::Expression,
						Op::CommaSeparated,
						Op::Expect(TokenKind::CloseParen),
						Op::CloseFrame,
					]);
					true
				}

				_ => false,
			},

			Op::CommaSeparated => match token.kind {
				TokenKind::Comma => {
					self.push_ops(&[Op::Expression, Op::CommaSeparated]);
					true
				}

				_ => false,
			},

			Op::Block => match token.kind {
				TokenKind::CloseBrace => true,

				_ => {
					self.push_ops(&[Op::Statement, Op::Block]);
					false
				}
			},

			Op::VarDef => match token.kind {
				TokenKind::Variable(name) => {
					self.bind(name);
					self.push_ops(&[Op::VarInit]);
					true
				}

				_ => true,
			},

			Op::VarInit => match token.kind {
				TokenKind::Operator if token.text == "=" => {
					self.push_ops(&[Op::Expression, Op::VarInit]);
					true
				}

				TokenKind::Comma => {
					self.push_ops(&[Op::VarDef]);
					true
				}

				_ => false,
			},

			Op::FunctionDef => match token.kind {
				// The function's own name binds in the enclosing scope.
				TokenKind::Variable(name) => {
					self.bind(name);
					self.push_ops(&[Op::FunctionDef]);
					true
				}

				TokenKind::OpenParen => {
					self.push_ops(&[
						Op::OpenScope,
						Op::ArgList,
						Op::Expect(TokenKind::CloseParen),
						Op::Statement,
						Op::CloseScope,
					]);
					true
				}

				_ => false,
			},

			Op::ArgList => match token.kind {
				TokenKind::Variable(name) => {
					self.bind(name);
					self.push_ops(&[Op::ArgSep]);
					true
				}

				_ => false,
			},

			Op::ArgSep => match token.kind {
				TokenKind::Comma => {
					self.push_ops(&[Op::ArgList]);
					true
				}

				_ => false,
			},

			// A missing token is tolerated: anything else is consumed while waiting.
			Op::Expect(wanted) => {
				if token.kind != wanted {
					self.push_ops(&[Op::Expect(wanted)]);
				}
				true
			}

			Op::OpenFrame(kind) => {
				self.open_frame(kind);
				false
			}

			Op::CloseFrame => {
				self.close_frame();
				false
			}

			Op::OpenScope => {
				self.scope = Some(Scope::nested(self.scope.take()));
				false
			}

			Op::CloseScope => {
				self.scope = self.scope.take().and_then(|scope| scope.parent().cloned());
				false
			}
		}
	}
}


impl<'a, I> Iterator for Parser<'a, I>
where
	I: Iterator<Item = char>,
{
	type Item = Token;

	fn next(&mut self) -> Option<Token> {
		let mut token = self.lexer.next()?;

		let width = token.text.chars().count() as u32;
		if token.kind == TokenKind::Whitespace && self.column == 0 {
			self.indented = width;
		}
		self.column += width;

		if token.kind == TokenKind::Newline {
			// Statements don't continue across lines unless a rule is still pending,
			// so pending frame ops are settled here.
			while self.ops.last().map_or(false, Op::is_frame_op) {
				match self.ops.pop() {
					Some(Op::OpenFrame(kind)) => self.open_frame(kind),
					Some(Op::CloseFrame) => self.close_frame(),
					_ => (),
				}
			}

			self.indented = 0;
			self.column = 0;

			if self.frame.align.is_none() {
				self.frame = self.frame.with_align(false);
			}

			token.indent = Some(self.frame.indentation());
			return Some(token);
		}

		if !token.kind.is_significant() {
			return Some(token);
		}

		if self.frame.align.is_none() {
			self.frame = self.frame.with_align(true);
		}

		loop {
			self.defining = false;

			let op = match self.ops.pop() {
				Some(op) => op,
				// The statement rule is self sustaining, so the stack only runs dry
				// if a snapshot was taken in a degenerate state. Reseed it.
				None => {
					self.ops.push(Op::Statements);
					continue;
				}
			};

			if self.apply(op, &token) {
				if let TokenKind::Variable(name) = token.kind {
					token.style =
						if self.defining {
							Style::VariableDef
						} else if self.in_scope(name) {
							Style::LocalVariable
						} else {
							Style::Variable
						};
				}

				return Some(token);
			}
		}
	}
}


/// A parser snapshot, stored on line break markers so that highlighting can restart
/// mid document. The rule stack is cloned; scope and frame chains share tails.
#[derive(Debug, Clone)]
pub struct Checkpoint {
	ops: Vec<Op>,
	scope: Option<Rc<Scope>>,
	frame: Rc<Frame>,
	scanner: Scanner,
}


impl Checkpoint {
	/// Rebuild a live parser from this checkpoint, over a character source positioned
	/// at the same logical point the snapshot was taken at.
	pub fn resume<'a, I>(&self, chars: I, interner: &'a mut Interner) -> Parser<'a, I>
	where
		I: Iterator<Item = char>,
	{
		Parser {
			lexer: Lexer::resume(Cursor::new(chars), self.scanner, interner),
			ops: self.ops.clone(),
			scope: self.scope.clone(),
			frame: self.frame.clone(),
			column: 0,
			indented: 0,
			defining: false,
		}
	}
}
