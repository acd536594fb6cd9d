use std::fmt::{self, Display};

use termion::color as term;
pub use termion::color::Red;

use crate::syntax::Style;


/// Paint the foreground with a given color when formatting the value.
pub struct Fg<C, T>(pub C, pub T);


impl<C, T> Display for Fg<C, T>
where
	C: term::Color + Copy,
	T: Display,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}{}{}", term::Fg(self.0), self.1, term::Fg(term::Reset))
	}
}


/// A text span painted according to its rendering style. Unstyled content and plain
/// variables print in the default color.
pub struct Painted<'a>(pub Option<Style>, pub &'a str);


impl<'a> Display for Painted<'a> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let Painted(style, text) = self;

		match style {
			Some(Style::Keyword) => Fg(term::Blue, text).fmt(f),
			Some(Style::Atom) => Fg(term::Cyan, text).fmt(f),
			Some(Style::Number) => Fg(term::Magenta, text).fmt(f),
			Some(Style::String) => Fg(term::Green, text).fmt(f),
			Some(Style::Regexp) => Fg(term::Red, text).fmt(f),
			Some(Style::Comment) => Fg(term::LightBlack, text).fmt(f),
			Some(Style::Operator) => Fg(term::Yellow, text).fmt(f),
			Some(Style::VariableDef) => Fg(term::Cyan, text).fmt(f),
			Some(Style::LocalVariable) => Fg(term::LightCyan, text).fmt(f),
			_ => text.fmt(f),
		}
	}
}
