mod json;
mod node;
mod normalize;
mod stream;

use std::{cell::RefCell, fmt, rc::Rc};

use slab::Slab;

use crate::syntax::parser::Checkpoint;
use crate::syntax::Style;
pub use node::Node;
pub use normalize::{normalize, Piece};
pub use stream::Chars;


/// Stable handle to a run in a document. Ids survive insertions and removals of other
/// runs, which lets the content stream and the reconciler hold cursors into a sequence
/// that is being patched under them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunId(usize);


/// The kind of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
	/// A styled text span.
	Text,
	/// A line break marker.
	Newline,
	/// Raw content not yet materialized into runs.
	Pending,
}


/// A caret anchor: a character offset inside a run. The document remaps it when runs
/// are consumed or shortened, so the host can restore an equivalent position after a
/// highlighting pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
	pub run: RunId,
	pub offset: usize,
}


/// The rendering adapter. Model mutations are relayed here so a host can mirror them
/// onto its rendering surface; the engine itself has no rendering dependency.
pub trait Surface {
	/// A run was inserted.
	fn inserted(&mut self, id: RunId);
	/// A run was removed.
	fn removed(&mut self, id: RunId);
	/// A run's text changed in place.
	fn edited(&mut self, id: RunId);
}


/// A styled text span.
#[derive(Debug)]
struct TextRun {
	text: String,
	/// None for content that has not been highlighted yet.
	style: Option<Style>,
	dirty: bool,
	/// Shortened in place by an earlier patch; never considered correct again.
	reduced: bool,
}


/// A line break marker.
#[derive(Debug)]
struct NewlineRun {
	indent: Option<u32>,
	checkpoint: Option<Checkpoint>,
	dirty: bool,
}


/// One unit of rendered content.
#[derive(Debug)]
enum Run {
	Text(TextRun),
	Newline(NewlineRun),
	Pending(Node),
}


impl Run {
	fn kind(&self) -> RunKind {
		match self {
			Run::Text(_) => RunKind::Text,
			Run::Newline(_) => RunKind::Newline,
			Run::Pending(_) => RunKind::Pending,
		}
	}


	fn dirty(&self) -> bool {
		match self {
			Run::Text(run) => run.dirty,
			Run::Newline(run) => run.dirty,
			// Pending content is dirty by definition.
			Run::Pending(_) => true,
		}
	}


	fn set_dirty(&mut self, dirty: bool) {
		match self {
			Run::Text(run) => run.dirty = dirty,
			Run::Newline(run) => run.dirty = dirty,
			Run::Pending(_) => (),
		}
	}
}


#[derive(Debug)]
struct Entry {
	run: Run,
	prev: Option<usize>,
	next: Option<usize>,
}


#[derive(Debug, Default)]
struct Inner {
	arena: Slab<Entry>,
	head: Option<usize>,
	tail: Option<usize>,
	caret: Option<Caret>,
}


impl Inner {
	/// Link the already inserted arena entry after `prev`, or at the front.
	fn link_after(&mut self, prev: Option<usize>, index: usize) {
		let next = match prev {
			Some(prev) => self.arena[prev].next,
			None => self.head,
		};

		self.arena[index].prev = prev;
		self.arena[index].next = next;

		match prev {
			Some(prev) => self.arena[prev].next = Some(index),
			None => self.head = Some(index),
		}

		match next {
			Some(next) => self.arena[next].prev = Some(index),
			None => self.tail = Some(index),
		}
	}


	/// Unlink an entry, returning its former neighbors.
	fn unlink(&mut self, index: usize) -> (Option<usize>, Option<usize>) {
		let prev = self.arena[index].prev;
		let next = self.arena[index].next;

		match prev {
			Some(prev) => self.arena[prev].next = next,
			None => self.head = next,
		}

		match next {
			Some(next) => self.arena[next].prev = prev,
			None => self.tail = prev,
		}

		(prev, next)
	}
}


/// The rendered document: an ordered sequence of runs. Cheap to clone; clones share
/// the same sequence, which is how the content stream and the reconciler cooperate on
/// one document during a highlighting pass.
#[derive(Clone, Default)]
pub struct Document {
	inner: Rc<RefCell<Inner>>,
	surface: Rc<RefCell<Option<Box<dyn Surface>>>>,
}


impl Document {
	pub fn new() -> Self {
		Self::default()
	}


	/// Attach a rendering adapter. Subsequent mutations are relayed to it.
	pub fn set_surface(&self, surface: Box<dyn Surface>) {
		*self.surface.borrow_mut() = Some(surface);
	}


	fn notify<F>(&self, event: F)
	where
		F: FnOnce(&mut dyn Surface),
	{
		if let Some(surface) = self.surface.borrow_mut().as_mut() {
			event(surface.as_mut());
		}
	}


	pub fn is_empty(&self) -> bool {
		self.inner.borrow().head.is_none()
	}


	pub fn head(&self) -> Option<RunId> {
		self.inner.borrow().head.map(RunId)
	}


	pub fn next(&self, id: RunId) -> Option<RunId> {
		self.inner
			.borrow()
			.arena
			.get(id.0)
			.and_then(|entry| entry.next)
			.map(RunId)
	}


	pub fn prev(&self, id: RunId) -> Option<RunId> {
		self.inner
			.borrow()
			.arena
			.get(id.0)
			.and_then(|entry| entry.prev)
			.map(RunId)
	}


	pub fn contains(&self, id: RunId) -> bool {
		self.inner.borrow().arena.contains(id.0)
	}


	pub fn kind(&self, id: RunId) -> Option<RunKind> {
		self.inner
			.borrow()
			.arena
			.get(id.0)
			.map(|entry| entry.run.kind())
	}


	pub fn dirty(&self, id: RunId) -> bool {
		self.inner
			.borrow()
			.arena
			.get(id.0)
			.map_or(false, |entry| entry.run.dirty())
	}


	/// Mark a run dirty after an edit. Checkpoints stored downstream of the run are
	/// derived from content that just changed, so they are all invalidated.
	pub fn mark_dirty(&self, id: RunId) {
		let mut inner = self.inner.borrow_mut();

		if !inner.arena.contains(id.0) {
			return;
		}

		inner.arena[id.0].run.set_dirty(true);

		let mut cursor = inner.arena[id.0].next;
		while let Some(index) = cursor {
			if let Run::Newline(run) = &mut inner.arena[index].run {
				run.checkpoint = None;
			}

			cursor = inner.arena[index].next;
		}
	}


	pub(crate) fn clear_dirty(&self, id: RunId) {
		let mut inner = self.inner.borrow_mut();

		if let Some(entry) = inner.arena.get_mut(id.0) {
			entry.run.set_dirty(false);
		}
	}


	/// Inspect a text run's content.
	pub fn with_text<R, F>(&self, id: RunId, f: F) -> Option<R>
	where
		F: FnOnce(&str) -> R,
	{
		match &self.inner.borrow().arena.get(id.0)?.run {
			Run::Text(run) => Some(f(&run.text)),
			_ => None,
		}
	}


	/// The length of a text run, in characters.
	pub fn text_len(&self, id: RunId) -> usize {
		self.with_text(id, |text| text.chars().count())
			.unwrap_or(0)
	}


	pub fn style(&self, id: RunId) -> Option<Style> {
		match &self.inner.borrow().arena.get(id.0)?.run {
			Run::Text(run) => run.style,
			_ => None,
		}
	}


	pub fn indent(&self, id: RunId) -> Option<u32> {
		match &self.inner.borrow().arena.get(id.0)?.run {
			Run::Newline(run) => run.indent,
			_ => None,
		}
	}


	pub fn has_checkpoint(&self, id: RunId) -> bool {
		match self.inner.borrow().arena.get(id.0) {
			Some(Entry { run: Run::Newline(run), .. }) => run.checkpoint.is_some(),
			_ => false,
		}
	}


	pub(crate) fn checkpoint(&self, id: RunId) -> Option<Checkpoint> {
		match &self.inner.borrow().arena.get(id.0)?.run {
			Run::Newline(run) => run.checkpoint.clone(),
			_ => None,
		}
	}


	/// Store a fresh checkpoint and the computed indentation on a line break marker.
	pub(crate) fn set_checkpoint(&self, id: RunId, checkpoint: Checkpoint, indent: u32) {
		let mut inner = self.inner.borrow_mut();

		if let Some(Entry { run: Run::Newline(run), .. }) = inner.arena.get_mut(id.0) {
			run.checkpoint = Some(checkpoint);
			run.indent = Some(indent);
		}
	}


	/// Mark every run dirty and discard every checkpoint, forcing the next pass to
	/// rescan the whole document.
	pub(crate) fn invalidate(&self) {
		let mut inner = self.inner.borrow_mut();

		for (_, entry) in inner.arena.iter_mut() {
			entry.run.set_dirty(true);

			if let Run::Newline(run) = &mut entry.run {
				run.checkpoint = None;
			}
		}
	}


	pub fn caret(&self) -> Option<Caret> {
		self.inner.borrow().caret
	}


	pub fn set_caret(&self, caret: Option<Caret>) {
		self.inner.borrow_mut().caret = caret;
	}


	/// Check that a text run already renders the given token content: same text, same
	/// style, and not a leftover from a previous partial patch.
	pub(crate) fn run_matches(&self, id: RunId, text: &str, style: Style) -> bool {
		match self.inner.borrow().arena.get(id.0) {
			Some(Entry { run: Run::Text(run), .. }) => {
				!run.reduced && run.style == Some(style) && run.text == text
			}

			_ => false,
		}
	}


	/// Append raw content at the end of the document.
	pub fn append(&self, node: Node) -> RunId {
		let mut inner = self.inner.borrow_mut();

		let tail = inner.tail;
		let index = inner.arena.insert(Entry { run: Run::Pending(node), prev: None, next: None });
		inner.link_after(tail, index);

		drop(inner);
		self.notify(|surface| surface.inserted(RunId(index)));

		RunId(index)
	}


	/// Insert raw content after the given run, or at the front.
	pub fn insert_node_after(&self, after: Option<RunId>, node: Node) -> RunId {
		let mut inner = self.inner.borrow_mut();

		let after = after.map(|id| id.0).filter(|&index| inner.arena.contains(index));
		let index = inner.arena.insert(Entry { run: Run::Pending(node), prev: None, next: None });
		inner.link_after(after, index);

		drop(inner);
		self.notify(|surface| surface.inserted(RunId(index)));

		RunId(index)
	}


	/// Insert a fresh styled run right before the given one.
	pub(crate) fn insert_text_before(&self, at: RunId, text: String, style: Style) -> RunId {
		let mut inner = self.inner.borrow_mut();

		let prev = inner.arena.get(at.0).and_then(|entry| entry.prev);
		let run = Run::Text(TextRun { text, style: Some(style), dirty: false, reduced: false });
		let index = inner.arena.insert(Entry { run, prev: None, next: None });
		inner.link_after(prev, index);

		drop(inner);
		self.notify(|surface| surface.inserted(RunId(index)));

		RunId(index)
	}


	pub(crate) fn remove(&self, id: RunId) {
		let mut inner = self.inner.borrow_mut();

		if !inner.arena.contains(id.0) {
			return;
		}

		inner.unlink(id.0);
		inner.arena.remove(id.0);

		if inner.caret.map_or(false, |caret| caret.run == id) {
			inner.caret = None;
		}

		drop(inner);
		self.notify(|surface| surface.removed(id));
	}


	/// Insert a fresh styled run right after the given one.
	pub(crate) fn insert_text_after(&self, after: RunId, text: String, style: Style) -> RunId {
		let mut inner = self.inner.borrow_mut();

		let run = Run::Text(TextRun { text, style: Some(style), dirty: false, reduced: false });
		let index = inner.arena.insert(Entry { run, prev: None, next: None });
		inner.link_after(Some(after.0), index);

		drop(inner);
		self.notify(|surface| surface.inserted(RunId(index)));

		RunId(index)
	}


	/// Replace a text run's content in place, clamping the caret to the new length.
	pub(crate) fn replace_text(&self, id: RunId, text: String) {
		let mut inner = self.inner.borrow_mut();

		let length = text.chars().count();

		match inner.arena.get_mut(id.0) {
			Some(Entry { run: Run::Text(run), .. }) => run.text = text,
			_ => return,
		}

		if let Some(caret) = &mut inner.caret {
			if caret.run == id {
				caret.offset = caret.offset.min(length);
			}
		}

		drop(inner);
		self.notify(|surface| surface.edited(id));
	}


	/// Drop the first `prefix` characters of a text run, marking it reduced.
	pub(crate) fn shorten(&self, id: RunId, prefix: usize) {
		let mut inner = self.inner.borrow_mut();

		if let Some(Entry { run: Run::Text(run), .. }) = inner.arena.get_mut(id.0) {
			run.text = run.text.chars().skip(prefix).collect();
			run.reduced = true;
		}

		drop(inner);
		self.notify(|surface| surface.edited(id));
	}


	/// Remap the caret before `from` is consumed into a patch. The first `take`
	/// characters of `from` are covered by the replacement run `to`, starting at
	/// offset `base` there; when `full`, the whole run is about to be removed.
	pub(crate) fn remap_caret(&self, from: RunId, take: usize, full: bool, to: RunId, base: usize) {
		let mut inner = self.inner.borrow_mut();

		if let Some(caret) = &mut inner.caret {
			if caret.run != from {
				return;
			}

			if full || caret.offset < take {
				*caret = Caret { run: to, offset: base + caret.offset };
			} else {
				caret.offset -= take;
			}
		}
	}


	/// The document's whole text, with line breaks as `"\n"`. Pending content is
	/// included as it would materialize.
	pub fn text(&self) -> String {
		let mut text = String::new();

		let mut id = self.head();
		while let Some(run) = id {
			match self.kind(run) {
				Some(RunKind::Text) => {
					self.with_text(run, |t| text.push_str(t));
				}

				Some(RunKind::Newline) => text.push('\n'),

				Some(RunKind::Pending) => {
					let node = match self.inner.borrow().arena.get(run.0) {
						Some(Entry { run: Run::Pending(node), .. }) => Some(node.clone()),
						_ => None,
					};

					for piece in node.map(normalize).unwrap_or_default() {
						match piece {
							Piece::Fragment(fragment) => text.push_str(&fragment),
							Piece::Break => text.push('\n'),
						}
					}
				}

				None => (),
			}

			id = self.next(run);
		}

		text
	}


	/// Replace a pending run by its normalized content, in place. Returns the run now
	/// occupying the position: the first materialized run, or the old successor when
	/// the content was empty.
	fn materialize(&self, id: RunId) -> Option<RunId> {
		let mut inner = self.inner.borrow_mut();

		let is_pending = matches!(
			inner.arena.get(id.0),
			Some(Entry { run: Run::Pending(_), .. })
		);

		// Not pending: nothing to do.
		if !is_pending {
			return Some(id);
		}

		let (prev, next) = inner.unlink(id.0);

		let node = match inner.arena.remove(id.0).run {
			Run::Pending(node) => node,
			// Kind checked above.
			_ => return next.map(RunId),
		};

		let mut anchor = prev;

		let mut inserted = Vec::new();
		let mut first = None;

		for piece in normalize(node) {
			let run = match piece {
				Piece::Fragment(text) => Run::Text(
					TextRun { text, style: None, dirty: true, reduced: false }
				),

				Piece::Break => Run::Newline(
					NewlineRun { indent: None, checkpoint: None, dirty: true }
				),
			};

			let index = inner.arena.insert(Entry { run, prev: None, next: None });
			inner.link_after(anchor, index);

			anchor = Some(index);
			first = first.or(Some(index));
			inserted.push(RunId(index));
		}

		drop(inner);

		self.notify(|surface| surface.removed(id));
		for run in &inserted {
			self.notify(|surface| surface.inserted(*run));
		}

		first.map(RunId).or_else(|| next.map(RunId))
	}
}


impl fmt::Debug for Document {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let mut list = f.debug_list();

		let mut id = self.head();
		while let Some(run) = id {
			match self.kind(run) {
				Some(RunKind::Text) => {
					let text = self.with_text(run, str::to_owned).unwrap_or_default();
					list.entry(&(text, self.style(run)));
				}

				Some(RunKind::Newline) => {
					list.entry(&"\\n");
				}

				Some(RunKind::Pending) => {
					list.entry(&"<pending>");
				}

				None => (),
			}

			id = self.next(run);
		}

		list.finish()
	}
}
