use super::Node;


/// A flattened unit of document content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
	/// A text fragment, free of newlines and carriage returns.
	Fragment(String),
	/// An explicit line break.
	Break,
}


/// Flatten a content tree into text fragments and line break markers, in document
/// order. Concatenating the fragments, with breaks as `"\n"`, reproduces the tree's
/// text with all carriage returns removed. Zero length lines contribute only their
/// marker.
pub fn normalize(node: Node) -> Vec<Piece> {
	let mut pieces = Vec::new();
	collect(node, &mut pieces);
	pieces
}


fn collect(node: Node, pieces: &mut Vec<Piece>) {
	match node {
		Node::Text(text) => {
			let text = text.replace('\r', "");

			for (i, line) in text.split('\n').enumerate() {
				if i > 0 {
					pieces.push(Piece::Break);
				}

				if !line.is_empty() {
					pieces.push(Piece::Fragment(line.into()));
				}
			}
		}

		Node::Break => pieces.push(Piece::Break),

		Node::Element { block, children } => {
			let before = pieces.len();

			for child in children {
				collect(child, pieces);
			}

			let ends_with_break =
				pieces.len() > before && matches!(pieces.last(), Some(Piece::Break));

			// A block element ends its own line, unless its content already did.
			if block && !ends_with_break {
				pieces.push(Piece::Break);
			}
		}
	}
}
