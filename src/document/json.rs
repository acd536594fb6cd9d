use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::{Document, RunId, RunKind};
use crate::syntax::Style;


/// Documents serialize as a sequence of small maps, one per run: text and style for
/// text runs, the computed indentation for line breaks.
impl Serialize for Document {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(None)?;

		let mut id = self.head();
		while let Some(run) = id {
			seq.serialize_element(&RunView { doc: self, id: run })?;
			id = self.next(run);
		}

		seq.end()
	}
}


struct RunView<'a> {
	doc: &'a Document,
	id: RunId,
}


impl<'a> Serialize for RunView<'a> {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self.doc.kind(self.id) {
			Some(RunKind::Text) => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("text", &self.doc.with_text(self.id, str::to_owned))?;
				map.serialize_entry("style", &self.doc.style(self.id).map(Style::name))?;
				map.end()
			}

			Some(RunKind::Newline) => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("newline", &true)?;
				map.serialize_entry("indent", &self.doc.indent(self.id))?;
				map.end()
			}

			_ => {
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry("pending", &true)?;
				map.end()
			}
		}
	}
}
