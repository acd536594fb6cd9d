mod fmt;

use crate::document::RunId;


/// Internal consistency fault: the rendered run sequence disagrees with the token
/// stream during reconciliation. Never user facing; the driver logs the fault and
/// falls back to a full rescan instead of corrupting the rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Desync {
	/// A newline token lined up with a run that is not a line break marker.
	ExpectedBreak(RunId),
	/// A content token lined up with a run that is not a text run.
	ExpectedText(RunId),
	/// The run sequence ended while tokens remained.
	Truncated,
	/// The run cursor could not re-anchor after removing a run.
	LostCursor,
}


impl std::error::Error for Desync {}
