mod error;
#[cfg(test)]
mod tests;

use crate::document::{Chars, Document, Node, RunId, RunKind};
use crate::symbol::Interner;
use crate::syntax::lexer::TokenKind;
use crate::syntax::parser::Parser;
use crate::syntax::Style;
pub use error::Desync;


/// The result of a highlighting pass.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
	/// The unexhausted line budget.
	pub left: Option<u32>,
	/// The run the pass stopped on.
	pub node: Option<RunId>,
	/// Whether the last visited line still held dirty runs.
	pub dirty: bool,
}


/// A cursor over the run sequence that advances lazily: moving past a run is recorded
/// as intent and resolved on the next access. The token stream runs one token ahead of
/// this cursor and materializes pending content as it goes, so eager advancement could
/// land on a run that is about to be replaced.
struct RunCursor {
	/// The run right before the walked region. Never patched during the pass.
	after: Option<RunId>,
	current: Option<RunId>,
	forward: bool,
}


impl RunCursor {
	fn new(after: Option<RunId>) -> Self {
		Self { after, current: None, forward: false }
	}


	/// The run under the cursor.
	fn get(&mut self, doc: &Document) -> Option<RunId> {
		match self.current {
			None => {
				self.current = match self.after {
					Some(after) => doc.next(after),
					None => doc.head(),
				};
			}

			Some(current) if self.forward => {
				self.forward = false;
				self.current = doc.next(current);
			}

			_ => (),
		}

		self.current
	}


	/// Schedule an advance past the current run.
	fn advance(&mut self, doc: &Document) {
		if self.forward {
			self.get(doc);
		}

		self.forward = true;
	}


	/// Remove the run under the cursor, re-anchoring on its predecessor.
	fn remove(&mut self, doc: &Document) -> Result<(), Desync> {
		let current = match self.get(doc) {
			Some(current) => current,
			None => return Err(Desync::Truncated),
		};

		let prev = doc.prev(current);
		doc.remove(current);

		match prev {
			Some(prev) => {
				self.current = Some(prev);
				self.forward = true;
				Ok(())
			}

			None => Err(Desync::LostCursor),
		}
	}
}


/// Run one highlighting pass over the document.
///
/// Starting from the nearest line break at or before `from` that carries a stored
/// checkpoint (or the document start, with a fresh parser), tokens are re-produced and
/// walked in lockstep with the existing runs. Runs that already render their token are
/// left untouched; anything else is patched in place. Fresh checkpoints and computed
/// indentation are stored on every line break crossed.
///
/// The pass stops once `budget` lines have been crossed, or, when `only_dirty` is set,
/// at the end of the first line that contained no dirty run, at which point every
/// downstream line is provably unaffected. Returns `None` when there is nothing to do.
pub fn highlight(
	doc: &Document,
	interner: &mut Interner,
	from: Option<RunId>,
	only_dirty: bool,
	budget: Option<u32>,
) -> Result<Option<Outcome>, Desync> {
	if doc.is_empty() {
		return Ok(None);
	}

	// Walk back to the nearest stored checkpoint.
	let mut from = from;
	while let Some(id) = from {
		if doc.has_checkpoint(id) {
			break;
		}

		from = doc.prev(id);
	}

	if let Some(id) = from {
		// Content up to and including this break is vouched for by its checkpoint:
		// an upstream edit would have invalidated it.
		doc.clear_dirty(id);

		// A checkpoint with nothing after it has nothing to highlight.
		if doc.next(id).is_none() {
			return Ok(None);
		}
	}

	let start = match from {
		Some(id) => doc.next(id),
		None => doc.head(),
	};

	let chars = Chars::new(doc, start);
	let mut parser = match from.and_then(|id| doc.checkpoint(id)) {
		Some(checkpoint) => checkpoint.resume(chars, interner),
		None => Parser::new(chars, interner),
	};

	let mut cursor = RunCursor::new(from);
	let mut line_dirty = false;
	let mut left = budget;

	while let Some(token) = parser.next() {
		let part = match cursor.get(doc) {
			Some(part) => part,
			None => return Err(Desync::Truncated),
		};

		if token.kind == TokenKind::Newline {
			if doc.kind(part) != Some(RunKind::Newline) {
				return Err(Desync::ExpectedBreak(part));
			}

			doc.set_checkpoint(part, parser.snapshot(), token.indent.unwrap_or(0));

			if doc.dirty(part) {
				line_dirty = true;
			}
			doc.clear_dirty(part);

			let exhausted = match &mut left {
				Some(lines) => {
					*lines = lines.saturating_sub(1);
					*lines == 0
				}

				None => false,
			};

			// The line that absorbed the edit without carrying dirtiness forward is
			// the last one that needs scanning.
			if exhausted || (only_dirty && !line_dirty) {
				break;
			}

			line_dirty = false;
			cursor.advance(doc);
		} else {
			if doc.kind(part) != Some(RunKind::Text) {
				return Err(Desync::ExpectedText(part));
			}

			if doc.dirty(part) {
				line_dirty = true;
			}

			if doc.run_matches(part, &token.text, token.style) {
				doc.clear_dirty(part);
				cursor.advance(doc);
			} else {
				line_dirty = true;

				let total = token.text.chars().count();
				let fresh = doc.insert_text_before(part, token.text, token.style);

				// Consume old runs until the new token's length is covered.
				let mut owed = total;
				while owed > 0 {
					let part = match cursor.get(doc) {
						Some(part) => part,
						None => return Err(Desync::Truncated),
					};

					if doc.kind(part) != Some(RunKind::Text) {
						return Err(Desync::ExpectedText(part));
					}

					let available = doc.text_len(part);

					if available > owed {
						doc.remap_caret(part, owed, false, fresh, total - owed);
						doc.shorten(part, owed);
						owed = 0;
					} else {
						doc.remap_caret(part, available, true, fresh, total - owed);
						owed -= available;
						cursor.remove(doc)?;
					}
				}
			}
		}
	}

	Ok(Some(Outcome {
		left,
		node: cursor.get(doc),
		dirty: line_dirty,
	}))
}


/// Drives highlighting passes over a document: queues dirty entry points, enforces the
/// per pass line budget, and recovers from desynchronization by rescanning from the
/// top. The host calls [`Highlighter::run_pass`] from its scheduler until no work
/// remains, with at most one pass in flight at a time.
#[derive(Debug)]
pub struct Highlighter {
	doc: Document,
	interner: Interner,
	dirty: Vec<RunId>,
	lines_per_pass: u32,
}


impl Highlighter {
	/// Lines processed per pass unless configured otherwise.
	pub const DEFAULT_LINES_PER_PASS: u32 = 10;


	pub fn new() -> Self {
		Self::with_budget(Self::DEFAULT_LINES_PER_PASS)
	}


	pub fn with_budget(lines_per_pass: u32) -> Self {
		Self {
			doc: Document::new(),
			interner: Interner::new(),
			dirty: Vec::new(),
			lines_per_pass: lines_per_pass.max(1),
		}
	}


	pub fn document(&self) -> &Document {
		&self.doc
	}


	pub fn interner(&self) -> &Interner {
		&self.interner
	}


	/// Materialize raw text at the end of the document and queue it for highlighting.
	pub fn import(&mut self, code: &str) {
		let pending = self.doc.append(Node::text(code));
		let anchor = self.doc.prev(pending);

		Chars::new(&self.doc, Some(pending)).for_each(drop);

		let first = match anchor {
			Some(id) => self.doc.next(id),
			None => self.doc.head(),
		};

		if let Some(first) = first {
			self.mark_dirty(first);
		}
	}


	/// Record an edit at the given run and queue it for the next pass.
	pub fn mark_dirty(&mut self, id: RunId) {
		self.doc.mark_dirty(id);

		if !self.dirty.contains(&id) {
			self.dirty.push(id);
		}
	}


	/// Pop the next queued entry point that is still attached and still dirty.
	fn next_dirty(&mut self) -> Option<RunId> {
		while let Some(id) = self.dirty.pop() {
			if self.doc.contains(id) && self.doc.dirty(id) {
				return Some(id);
			}
		}

		None
	}


	fn has_work(&self) -> bool {
		self.dirty
			.iter()
			.any(|&id| self.doc.contains(id) && self.doc.dirty(id))
	}


	/// Run one budgeted pass over the queued dirty regions. Returns whether dirty
	/// content remains for another pass.
	pub fn run_pass(&mut self) -> bool {
		let mut lines = self.lines_per_pass;

		while lines > 0 {
			let start = match self.next_dirty() {
				Some(start) => start,
				None => break,
			};

			match highlight(&self.doc, &mut self.interner, Some(start), true, Some(lines)) {
				Ok(Some(outcome)) => {
					lines = outcome.left.unwrap_or(0);

					// A pass that ran out of budget on a still dirty line resumes
					// there next time.
					if let Some(node) = outcome.node {
						if outcome.dirty {
							self.mark_dirty(node);
						}
					}

					// The pass may have stopped before ever reaching the entry; it
					// stored checkpoints along the way, so retrying gets closer.
					if self.doc.contains(start) && self.doc.dirty(start) && !self.dirty.contains(&start) {
						self.dirty.push(start);
					}
				}

				Ok(None) => (),

				Err(fault) => {
					log::error!("highlighting desynchronized: {}", fault);
					self.recover();
					return self.has_work();
				}
			}
		}

		let more = self.has_work();

		log::debug!(
			"highlight pass used {} of {} lines, more work: {}",
			self.lines_per_pass - lines,
			self.lines_per_pass,
			more,
		);

		more
	}


	/// Run passes until no dirty content remains.
	pub fn run_to_completion(&mut self) {
		while self.run_pass() {}
	}


	/// Full rescan: discard all checkpoints and re-highlight the whole document in
	/// one unbudgeted sweep.
	fn recover(&mut self) {
		self.doc.invalidate();
		self.dirty.clear();

		if let Some(head) = self.doc.head() {
			if highlight(&self.doc, &mut self.interner, Some(head), false, None).is_err() {
				log::error!("full rescan failed; leaving the document unstyled until the next edit");
			}
		}
	}


	/// The stored indentation of a line break marker.
	pub fn indentation(&self, id: RunId) -> Option<u32> {
		self.doc.indent(id)
	}


	/// Rewrite the leading whitespace of the line following the given break to match
	/// its computed indentation. Returns whether anything changed.
	pub fn reindent(&mut self, id: RunId) -> bool {
		let indent = match self.doc.indent(id) {
			Some(indent) => indent as usize,
			None => return false,
		};

		let first = self.doc.next(id);
		let whitespace = first.filter(|&run| {
			self.doc.kind(run) == Some(RunKind::Text)
				&& self.doc.style(run) == Some(Style::Whitespace)
		});

		match whitespace {
			Some(run) => {
				if self.doc.text_len(run) == indent {
					return false;
				}

				self.doc.replace_text(run, " ".repeat(indent));
				self.mark_dirty(run);
				true
			}

			None => {
				if indent == 0 {
					return false;
				}

				let run = self.doc.insert_text_after(id, " ".repeat(indent), Style::Whitespace);
				self.mark_dirty(run);
				true
			}
		}
	}
}


impl Default for Highlighter {
	fn default() -> Self {
		Self::new()
	}
}
