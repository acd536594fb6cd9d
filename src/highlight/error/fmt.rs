use std::fmt::{self, Display};

use super::Desync;


impl Display for Desync {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Desync::ExpectedBreak(id) => {
				write!(f, "expected a line break marker at {:?}", id)
			}

			Desync::ExpectedText(id) => {
				write!(f, "expected a text run at {:?}", id)
			}

			Desync::Truncated => {
				write!(f, "the run sequence ended before the token stream")
			}

			Desync::LostCursor => {
				write!(f, "the run cursor lost its anchor while patching")
			}
		}
	}
}
