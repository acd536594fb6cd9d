pub mod lexer;
pub mod parser;


/// The rendering class of a token or styled run. Stylesheet class names are exposed
/// through [`Style::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
	Whitespace,
	Comment,
	Keyword,
	Atom,
	Number,
	String,
	Regexp,
	Operator,
	Punctuation,
	/// A free or global variable use.
	Variable,
	/// A variable at its definition site.
	VariableDef,
	/// A use of a lexically bound variable.
	LocalVariable,
}


impl Style {
	/// The stylesheet class name for this style.
	pub fn name(self) -> &'static str {
		match self {
			Style::Whitespace => "whitespace",
			Style::Comment => "comment",
			Style::Keyword => "keyword",
			Style::Atom => "atom",
			Style::Number => "number",
			Style::String => "string",
			Style::Regexp => "regexp",
			Style::Operator => "operator",
			Style::Punctuation => "punctuation",
			Style::Variable => "variable",
			Style::VariableDef => "variabledef",
			Style::LocalVariable => "localvariable",
		}
	}
}
