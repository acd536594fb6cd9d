/// Raw content handed to the document by the editing surface: a tree of text, explicit
/// line breaks and container elements.
#[derive(Debug, Clone)]
pub enum Node {
	Text(String),
	Break,
	Element {
		/// Whether the element is block level, like a paragraph or list item. Block
		/// elements terminate their content with a line break when flattened.
		block: bool,
		children: Vec<Node>,
	},
}


impl Node {
	pub fn text<T: Into<String>>(text: T) -> Self {
		Node::Text(text.into())
	}


	/// A block element wrapping the given children.
	pub fn block(children: Vec<Node>) -> Self {
		Node::Element { block: true, children }
	}


	/// An inline element wrapping the given children.
	pub fn inline(children: Vec<Node>) -> Self {
		Node::Element { block: false, children }
	}
}
