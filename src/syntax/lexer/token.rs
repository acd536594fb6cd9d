use crate::symbol::Symbol;
use crate::syntax::Style;


/// Keywords, grouped by grammatical role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
	/// `var`: opens a declaration list.
	Var,
	/// `function`: opens a function definition.
	Function,
	/// Followed by a parenthesized condition and a statement: if, for, while, with,
	/// switch.
	Conditional,
	/// Followed by a bare statement: else, do, try, finally.
	Connective,
	/// Followed by an expression: return, new, delete, throw.
	Prefix,
}


/// All kinds of token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
	Whitespace,
	Newline,
	Comment,
	Str,
	Regexp,
	Number,
	Atom,
	Keyword(Keyword),
	Variable(Symbol),
	Operator,

	OpenParen,    // (
	CloseParen,   // )
	OpenBrace,    // {
	CloseBrace,   // }
	OpenBracket,  // [
	CloseBracket, // ]
	Comma,        // ,
	Semicolon,    // ;
	Colon,        // :
}


impl TokenKind {
	/// Check if the token is an atomic operand: a literal, a variable or a regexp.
	pub fn is_atomic(&self) -> bool {
		matches!(
			self,
			Self::Atom | Self::Number | Self::Str | Self::Regexp | Self::Variable(_)
		)
	}


	/// Check if the token ends a value, which forbids a regexp literal from starting
	/// right after it.
	pub fn ends_value(&self) -> bool {
		matches!(
			self,
			Self::Atom | Self::Number | Self::Str | Self::Regexp | Self::Variable(_)
				| Self::CloseParen | Self::CloseBracket
		)
	}


	/// Check if the token takes part in the grammar. Whitespace, newlines and comments
	/// only do bookkeeping.
	pub fn is_significant(&self) -> bool {
		!matches!(self, Self::Whitespace | Self::Newline | Self::Comment)
	}


	/// The base rendering style for tokens of this kind. The parser overrides this for
	/// variables, according to scope.
	pub fn base_style(&self) -> Style {
		match self {
			Self::Whitespace | Self::Newline => Style::Whitespace,
			Self::Comment => Style::Comment,
			Self::Str => Style::String,
			Self::Regexp => Style::Regexp,
			Self::Number => Style::Number,
			Self::Atom => Style::Atom,
			Self::Keyword(_) => Style::Keyword,
			Self::Variable(_) => Style::Variable,
			Self::Operator => Style::Operator,
			_ => Style::Punctuation,
		}
	}
}


/// A lexical token.
#[derive(Debug, Clone)]
pub struct Token {
	pub kind: TokenKind,
	/// The exact source text of the token.
	pub text: String,
	/// The rendering style. Starts as the kind's base style; the parser may refine it.
	pub style: Style,
	/// The indentation computed for the following line. Only present on newline tokens,
	/// and only once the parser has annotated them.
	pub indent: Option<u32>,
}


impl Token {
	pub fn new(kind: TokenKind, text: String) -> Self {
		Self {
			style: kind.base_style(),
			kind,
			text,
			indent: None,
		}
	}


	pub fn newline() -> Self {
		Self::new(TokenKind::Newline, "\n".into())
	}
}
