use super::{Document, RunId, RunKind};


/// A lazy character source over the live document, starting at a given run. Pulling
/// characters materializes pending content in place as a side effect: not yet
/// finalized nodes are normalized and replaced by fresh dirty runs before their text
/// is yielded. Single pass: the sequence ends with the document, and a caller that
/// needs another pass builds a new stream.
pub struct Chars {
	doc: Document,
	next: Option<RunId>,
	buffer: std::vec::IntoIter<char>,
}


impl Chars {
	pub fn new(doc: &Document, start: Option<RunId>) -> Self {
		Self {
			doc: doc.clone(),
			next: start,
			buffer: Vec::new().into_iter(),
		}
	}
}


impl Iterator for Chars {
	type Item = char;

	fn next(&mut self) -> Option<char> {
		loop {
			if let Some(c) = self.buffer.next() {
				return Some(c);
			}

			let id = self.next?;

			match self.doc.kind(id)? {
				RunKind::Text => {
					// The successor is captured now, so later patches behind the read
					// position can't strand this cursor.
					self.next = self.doc.next(id);
					self.buffer = self
						.doc
						.with_text(id, |text| text.chars().collect::<Vec<char>>())
						.unwrap_or_default()
						.into_iter();
				}

				RunKind::Newline => {
					self.next = self.doc.next(id);
					return Some('\n');
				}

				RunKind::Pending => {
					self.next = self.doc.materialize(id);
				}
			}
		}
	}
}
