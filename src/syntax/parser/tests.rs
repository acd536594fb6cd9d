use super::*;

use assert_matches::assert_matches;


fn parse(input: &str, interner: &mut Interner) -> Vec<Token> {
	Parser::new(input.chars(), interner).collect()
}


/// The styles assigned to every occurrence of the named variable.
fn styles_of(tokens: &[Token], name: &str, interner: &Interner) -> Vec<Style> {
	let symbol = interner.get(name);

	tokens
		.iter()
		.filter(|token| matches!(token.kind, TokenKind::Variable(s) if Some(s) == symbol))
		.map(|token| token.style)
		.collect()
}


fn line_indents(tokens: &[Token]) -> Vec<u32> {
	tokens
		.iter()
		.filter(|token| token.kind == TokenKind::Newline)
		.map(|token| token.indent.unwrap_or(u32::MAX))
		.collect()
}


#[test]
fn test_function_scope() {
	let mut interner = Interner::new();
	let tokens = parse(
		"function f(x) { var y = x; return y; }\ny;\n",
		&mut interner,
	);

	assert_eq!(
		styles_of(&tokens, "x", &interner),
		[Style::VariableDef, Style::LocalVariable],
	);

	// The last y is outside the function, and must not resolve.
	assert_eq!(
		styles_of(&tokens, "y", &interner),
		[Style::VariableDef, Style::LocalVariable, Style::Variable],
	);
}


#[test]
fn test_nested_scopes_shadow_outwards() {
	let mut interner = Interner::new();
	let tokens = parse(
		"function outer(a) { function inner(b) { return a + b; } }",
		&mut interner,
	);

	assert_eq!(
		styles_of(&tokens, "a", &interner),
		[Style::VariableDef, Style::LocalVariable],
	);

	assert_eq!(
		styles_of(&tokens, "b", &interner),
		[Style::VariableDef, Style::LocalVariable],
	);

	// inner is declared within outer's scope, and is therefore a definition.
	assert_eq!(styles_of(&tokens, "inner", &interner), [Style::VariableDef]);
}


#[test]
fn test_top_level_definitions_are_plain() {
	let mut interner = Interner::new();
	let tokens = parse("var x = 1; x;", &mut interner);

	// There is no top level scope, so neither occurrence is marked.
	assert_eq!(
		styles_of(&tokens, "x", &interner),
		[Style::Variable, Style::Variable],
	);
}


#[test]
fn test_block_indentation() {
	let mut interner = Interner::new();
	let tokens = parse("if (a) {\nb;\n}\n", &mut interner);

	// The body indents one level deeper; the closing line returns to the left edge
	// only after the brace is consumed.
	assert_eq!(line_indents(&tokens), [2, 2, 0]);
}


#[test]
fn test_call_alignment() {
	let mut interner = Interner::new();
	let tokens = parse("f(a,\nb);\n", &mut interner);

	// The argument list established column alignment on its opening line.
	assert_eq!(line_indents(&tokens)[0], 4);
}


#[test]
fn test_statement_continuation_indents() {
	let mut interner = Interner::new();
	let tokens = parse("var x =\n1;\n", &mut interner);

	// The declaration continues on the next line, indented below the statement.
	assert_eq!(line_indents(&tokens)[0], 2);
}


#[test]
fn test_grammar_never_fails() {
	let mut interner = Interner::new();
	let tokens = parse("} ) ; , { ( var = =\n", &mut interner);

	assert!(!tokens.is_empty());
}


#[test]
fn test_snapshot_resumes_equivalently() {
	let input = "function f(x) {\nvar y = x;\nreturn y;\n}\n";
	let split = input.find('\n').map(|at| at + 1).unwrap_or_default();

	let mut interner = Interner::new();
	let full: Vec<Token> = parse(input, &mut interner);

	let mut resumed: Vec<Token> = Vec::new();
	{
		let mut parser = Parser::new(input[.. split].chars(), &mut interner);
		for token in &mut parser {
			resumed.push(token);
		}

		let checkpoint = parser.snapshot();
		resumed.extend(checkpoint.resume(input[split ..].chars(), &mut interner));
	}

	assert_eq!(full.len(), resumed.len());

	for (expected, actual) in full.iter().zip(&resumed) {
		assert_eq!(expected.kind, actual.kind);
		assert_eq!(expected.text, actual.text);
		assert_eq!(expected.style, actual.style);
		assert_eq!(expected.indent, actual.indent);
	}
}


#[test]
fn test_snapshot_is_independent() {
	let mut interner = Interner::new();

	let checkpoint = {
		let mut parser = Parser::new("function f(".chars(), &mut interner);
		while parser.next().is_some() {}
		parser.snapshot()
	};

	// Two resumptions over different tails must not disturb each other.
	let first: Vec<Token> = checkpoint.resume("a) { a; }".chars(), &mut interner).collect();
	let second: Vec<Token> = checkpoint.resume("b) { b; }".chars(), &mut interner).collect();

	assert_matches!(
		first.iter().find(|token| token.text == "a"),
		Some(Token { style: Style::VariableDef, .. })
	);

	assert_matches!(
		second.iter().find(|token| token.text == "b"),
		Some(Token { style: Style::VariableDef, .. })
	);
}
