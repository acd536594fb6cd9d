use std::rc::Rc;


/// The kind of a lexical frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
	/// A statement continuation.
	Stat,
	/// A braced or parenthesized group.
	Block,
}


/// One level of statement or bracket nesting, driving the indentation computed for
/// following lines. Frames form an immutable chain: closing one moves back to the
/// parent, and parser snapshots share chain tails.
#[derive(Debug)]
pub struct Frame {
	pub parent: Option<Rc<Frame>>,
	/// The indentation of the line on which the frame was opened.
	pub indented: i32,
	/// The column at which the frame was opened.
	pub column: u32,
	pub kind: FrameKind,
	/// Whether a token has appeared on the frame's opening line, establishing column
	/// alignment. None while undetermined.
	pub align: Option<bool>,
}


impl Frame {
	/// The root frame, enclosing the whole document.
	pub fn root() -> Rc<Self> {
		Rc::new(
			Frame {
				parent: None,
				indented: -2,
				column: 0,
				kind: FrameKind::Block,
				align: Some(false),
			}
		)
	}


	/// Open a new frame on top of the given one.
	pub fn open(parent: &Rc<Frame>, kind: FrameKind, indented: u32, column: u32) -> Rc<Self> {
		Rc::new(
			Frame {
				parent: Some(parent.clone()),
				indented: indented as i32,
				column,
				kind,
				align: None,
			}
		)
	}


	/// A copy of this frame with alignment determined. The parent chain is shared.
	pub fn with_align(&self, align: bool) -> Rc<Self> {
		Rc::new(
			Frame {
				parent: self.parent.clone(),
				indented: self.indented,
				column: self.column,
				kind: self.kind,
				align: Some(align),
			}
		)
	}


	/// The indentation for a line opening at this frame.
	pub fn indentation(&self) -> u32 {
		let columns = match self.kind {
			FrameKind::Stat => self.indented + 2,
			_ if self.align == Some(true) => self.column as i32 + 1,
			_ => self.indented + 2,
		};

		columns.max(0) as u32
	}
}
