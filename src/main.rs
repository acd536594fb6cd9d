#![allow(dead_code)] // The editing surface API is wider than the demo front-end.

mod args;
mod document;
mod highlight;
mod symbol;
mod syntax;
mod term;
#[cfg(test)]
mod tests;

use std::io::{self, Read};

use term::color;

use args::{Args, Command, Output};
use document::{Document, RunKind};
use highlight::Highlighter;


fn main() -> ! {
	let command = match args::parse(std::env::args_os()) {
		Ok(command) => command,
		Err(error) => {
			eprint!("{}", error);
			std::process::exit(1)
		}
	};

	let result = match command {
		Command::Run(args) => run(args),
		Command::Help(msg) | Command::Version(msg) => {
			println!("{}", msg);
			std::process::exit(0)
		}
	};

	let exit_code = match result {
		Ok(()) => 0,
		Err(error) => {
			eprintln!("{}: {}", color::Fg(color::Red, "Error"), error);
			1
		}
	};

	std::process::exit(exit_code)
}


fn run(args: Args) -> io::Result<()> {
	let source = match &args.path {
		Some(path) => std::fs::read_to_string(path)?,

		None => {
			let mut source = String::new();
			io::stdin().lock().read_to_string(&mut source)?;
			source
		}
	};

	let mut highlighter = Highlighter::with_budget(args.lines_per_pass);
	highlighter.import(&source);

	// Budgeted passes, the way a host scheduler would drive them.
	while highlighter.run_pass() {}

	match args.output {
		Output::Ansi => print_ansi(highlighter.document()),
		Output::Json => print_json(highlighter.document())?,
		Output::Indent => print_indents(highlighter.document()),
	}

	Ok(())
}


fn print_ansi(doc: &Document) {
	let mut id = doc.head();

	while let Some(run) = id {
		match doc.kind(run) {
			Some(RunKind::Text) => {
				doc.with_text(
					run,
					|text| print!("{}", color::Painted(doc.style(run), text))
				);
			}

			Some(RunKind::Newline) => println!(),

			_ => (),
		}

		id = doc.next(run);
	}
}


fn print_json(doc: &Document) -> io::Result<()> {
	let json = serde_json::to_string_pretty(doc).map_err(io::Error::from)?;
	println!("{}", json);

	Ok(())
}


fn print_indents(doc: &Document) {
	let mut line = 1;

	let mut id = doc.head();
	while let Some(run) = id {
		if doc.kind(run) == Some(RunKind::Newline) {
			line += 1;

			match doc.indent(run) {
				Some(indent) => println!("{}: {}", line, indent),
				None => println!("{}: ?", line),
			}
		}

		id = doc.next(run);
	}
}
