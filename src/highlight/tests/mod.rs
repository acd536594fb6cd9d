use std::{cell::RefCell, io, io::Read, rc::Rc};

use assert_matches::assert_matches;

use crate::document::{Caret, Chars, Document, Node, RunId, RunKind, Surface};
use crate::symbol::Interner;
use crate::syntax::Style;
use super::*;


/// A recording surface adapter, used to observe exactly which mutations a pass makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
	Inserted(RunId),
	Removed(RunId),
	Edited(RunId),
}


impl Event {
	fn run(self) -> RunId {
		match self {
			Event::Inserted(id) | Event::Removed(id) | Event::Edited(id) => id,
		}
	}
}


#[derive(Clone, Default)]
struct Recorder(Rc<RefCell<Vec<Event>>>);


impl Recorder {
	fn events(&self) -> Vec<Event> {
		self.0.borrow().clone()
	}
}


impl Surface for Recorder {
	fn inserted(&mut self, id: RunId) {
		self.0.borrow_mut().push(Event::Inserted(id));
	}

	fn removed(&mut self, id: RunId) {
		self.0.borrow_mut().push(Event::Removed(id));
	}

	fn edited(&mut self, id: RunId) {
		self.0.borrow_mut().push(Event::Edited(id));
	}
}


fn highlighted(code: &str) -> Highlighter {
	let mut highlighter = Highlighter::new();
	highlighter.import(code);
	highlighter.run_to_completion();
	highlighter
}


fn runs(doc: &Document) -> Vec<RunId> {
	let mut ids = Vec::new();

	let mut id = doc.head();
	while let Some(run) = id {
		ids.push(run);
		id = doc.next(run);
	}

	ids
}


fn breaks(doc: &Document) -> Vec<RunId> {
	runs(doc)
		.into_iter()
		.filter(|&id| doc.kind(id) == Some(RunKind::Newline))
		.collect()
}


/// The styles of every text run whose content is exactly `text`.
fn styles_of(doc: &Document, text: &str) -> Vec<Option<Style>> {
	runs(doc)
		.into_iter()
		.filter(|&id| doc.with_text(id, |t| t == text).unwrap_or(false))
		.map(|id| doc.style(id))
		.collect()
}


fn all_clean(doc: &Document) -> bool {
	runs(doc).into_iter().all(|id| !doc.dirty(id))
}


#[test]
fn test_round_trip() {
	let source = "function f(x) {\r\n\tvar y = x + 1;\r\n\treturn y;\r\n}\n";
	let highlighter = highlighted(source);

	assert_eq!(highlighter.document().text(), source.replace('\r', ""));
	assert!(all_clean(highlighter.document()));
}


#[test]
fn test_second_pass_changes_nothing() {
	let doc = Document::new();
	doc.append(Node::text("var a = 1;\nvar b = a;\n"));

	let mut interner = Interner::new();
	highlight(&doc, &mut interner, doc.head(), false, None).expect("first pass failed");

	let recorder = Recorder::default();
	doc.set_surface(Box::new(recorder.clone()));

	highlight(&doc, &mut interner, doc.head(), false, None).expect("second pass failed");

	assert!(recorder.events().is_empty());
	assert!(all_clean(&doc));
}


#[test]
fn test_scope_styles() {
	let highlighter = highlighted("function f(x) { var y = x; return y; }\ny;\n");
	let doc = highlighter.document();

	assert_eq!(
		styles_of(doc, "x"),
		[Some(Style::VariableDef), Some(Style::LocalVariable)],
	);

	assert_eq!(
		styles_of(doc, "y"),
		[
			Some(Style::VariableDef),
			Some(Style::LocalVariable),
			Some(Style::Variable),
		],
	);

	assert_eq!(styles_of(doc, "function"), [Some(Style::Keyword)]);
	assert_eq!(styles_of(doc, "return"), [Some(Style::Keyword)]);
}


#[test]
fn test_indentation_stored_on_breaks() {
	let highlighter = highlighted("if (a) {\nb;\n}\n");

	let indents: Vec<Option<u32>> = breaks(highlighter.document())
		.into_iter()
		.map(|id| highlighter.indentation(id))
		.collect();

	assert_eq!(indents, [Some(2), Some(2), Some(0)]);
}


#[test]
fn test_budgeted_resumption() {
	let doc = Document::new();
	doc.append(Node::text("a;\nb;\nc;\nd;\ne;\n"));
	Chars::new(&doc, doc.head()).for_each(drop);

	let mut interner = Interner::new();

	let outcome = highlight(&doc, &mut interner, doc.head(), true, Some(2))
		.expect("pass failed")
		.expect("nothing to do");

	assert_eq!(outcome.left, Some(0));

	let stopped = outcome.node.expect("no stopping point");
	assert_eq!(doc.kind(stopped), Some(RunKind::Newline));

	// Only the first two lines are settled so far.
	let settled = breaks(&doc)
		.into_iter()
		.filter(|&id| doc.has_checkpoint(id))
		.count();
	assert_eq!(settled, 2);

	// A second pass starting at the stopping point finishes the rest.
	let outcome = highlight(&doc, &mut interner, Some(stopped), true, Some(3))
		.expect("pass failed")
		.expect("nothing to do");

	assert_eq!(outcome.left, Some(0));
	assert!(all_clean(&doc));

	// And a third finds nothing left to do.
	assert_matches!(
		highlight(&doc, &mut interner, outcome.node, true, Some(3)),
		Ok(None)
	);
}


#[test]
fn test_edit_stops_at_first_clean_line() {
	let mut highlighter = highlighted("var a = 1;\nvar b = 2;\nvar c = 3;\n");
	let doc = highlighter.document().clone();

	let line_breaks = breaks(&doc);

	// Everything after the second line break belongs to the third line.
	let third_line: Vec<RunId> = {
		let mut ids = Vec::new();
		let mut id = doc.next(line_breaks[1]);
		while let Some(run) = id {
			ids.push(run);
			id = doc.next(run);
		}
		ids
	};

	// Type a character at the start of the second line.
	let edit = doc.insert_node_after(Some(line_breaks[0]), Node::text("x"));
	highlighter.mark_dirty(edit);

	let recorder = Recorder::default();
	doc.set_surface(Box::new(recorder.clone()));

	let more = highlighter.run_pass();
	assert!(!more);
	assert!(all_clean(&doc));

	// The second line was repatched; the third was verified but never touched.
	assert!(!recorder.events().is_empty());
	for event in recorder.events() {
		assert!(!third_line.contains(&event.run()));
	}

	assert_eq!(doc.text(), "var a = 1;\nxvar b = 2;\nvar c = 3;\n");
}


#[test]
fn test_desync_recovery_preserves_text() {
	let mut highlighter = highlighted("a;\nb;\n");
	let doc = highlighter.document().clone();

	let head = doc.head().expect("document can't be empty");

	// Corrupt a text run with an embedded newline, which no materialized run can
	// legally contain. Reconciliation must fault, not panic or mangle the text.
	doc.replace_text(head, "a\nz".into());
	highlighter.mark_dirty(head);

	let more = highlighter.run_pass();

	assert!(!more);
	assert_eq!(doc.text(), "a\nz;\nb;\n");
}


#[test]
fn test_caret_survives_patching() {
	let mut highlighter = highlighted("var abc = 1;\n");
	let doc = highlighter.document().clone();

	let abc = runs(&doc)
		.into_iter()
		.find(|&id| doc.with_text(id, |t| t == "abc").unwrap_or(false))
		.expect("missing run");

	doc.set_caret(Some(Caret { run: abc, offset: 2 }));

	// Prepending a character reshapes the first token, but runs beyond the patch,
	// and the caret inside them, stay put.
	let edit = doc.insert_node_after(None, Node::text("x"));
	highlighter.mark_dirty(edit);
	highlighter.run_to_completion();

	assert_eq!(doc.text(), "xvar abc = 1;\n");
	assert!(doc.contains(abc));
	assert_eq!(doc.caret(), Some(Caret { run: abc, offset: 2 }));
}


#[test]
fn test_caret_remaps_into_merged_token() {
	let mut highlighter = highlighted("ab cd;\n");
	let doc = highlighter.document().clone();

	let cd = runs(&doc)
		.into_iter()
		.find(|&id| doc.with_text(id, |t| t == "cd").unwrap_or(false))
		.expect("missing run");

	doc.set_caret(Some(Caret { run: cd, offset: 1 }));

	// Joining the words consumes both old runs into one fresh token.
	let space = doc.prev(cd).expect("missing separator");
	doc.remove(space);
	highlighter.mark_dirty(doc.head().expect("document can't be empty"));

	highlighter.run_to_completion();

	assert_eq!(doc.text(), "abcd;\n");

	let caret = doc.caret().expect("caret was dropped");
	assert_eq!(doc.with_text(caret.run, str::to_owned), Some("abcd".into()));
	assert_eq!(caret.offset, 3);
}


#[test]
fn test_reindent() {
	let mut highlighter = highlighted("if (a) {\nb;\n}\n");
	let doc = highlighter.document().clone();

	let opening = breaks(&doc)[0];

	assert!(highlighter.reindent(opening));
	highlighter.run_to_completion();

	assert_eq!(doc.text(), "if (a) {\n  b;\n}\n");
	assert!(all_clean(&doc));

	// Already at the computed indentation: nothing to do.
	assert!(!highlighter.reindent(opening));
}


#[test]
fn test_distant_edits_both_converge() {
	let mut highlighter = Highlighter::with_budget(2);
	highlighter.import(&"x;\n".repeat(12));
	highlighter.run_to_completion();

	let doc = highlighter.document().clone();
	let line_breaks = breaks(&doc);

	// Edit the first and the tenth line.
	let near = doc.insert_node_after(None, Node::text("y"));
	highlighter.mark_dirty(near);

	let far = doc.insert_node_after(Some(line_breaks[8]), Node::text("z"));
	highlighter.mark_dirty(far);

	highlighter.run_to_completion();

	let mut expected: Vec<String> = std::iter::repeat("x;".to_owned()).take(12).collect();
	expected[0] = "yx;".into();
	expected[9] = "zx;".into();

	assert_eq!(doc.text(), expected.join("\n") + "\n");
	assert!(all_clean(&doc));
}


#[test]
fn test_import_into_nonempty_document() {
	let mut highlighter = highlighted("var a;\n");
	highlighter.import("var b;\n");
	highlighter.run_to_completion();

	let doc = highlighter.document();
	assert_eq!(doc.text(), "var a;\nvar b;\n");
	assert!(all_clean(doc));
}


#[test]
fn test_sample_files() -> io::Result<()> {
	crate::tests::util::test_dir(
		"src/highlight/tests/data",
		|path, mut file| {
			let mut source = String::new();
			file.read_to_string(&mut source)?;

			// A tight budget forces many resumptions.
			let mut highlighter = Highlighter::with_budget(3);
			highlighter.import(&source);
			highlighter.run_to_completion();

			let doc = highlighter.document();

			assert_eq!(
				doc.text(),
				source.replace('\r', ""),
				"text mangled for {}",
				path.display(),
			);

			assert!(all_clean(doc), "dirty runs left for {}", path.display());

			Ok(())
		}
	)
}
