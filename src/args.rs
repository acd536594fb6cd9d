use std::{ffi::OsString, path::PathBuf};

use clap::{clap_app, crate_authors, crate_description, crate_version};


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
	Help(Box<str>),
	Version(Box<str>),
	Run(Args),
}


/// What to print once highlighting finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
	/// ANSI colored source.
	Ansi,
	/// The run sequence as JSON.
	Json,
	/// The computed indentation of each line.
	Indent,
}


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Args {
	/// The file to highlight, stdin if absent.
	pub path: Option<PathBuf>,
	/// Lines to process per highlighting pass.
	pub lines_per_pass: u32,
	pub output: Output,
}


pub fn parse<A, T>(args: A) -> clap::Result<Command>
where
	A: IntoIterator<Item = T>,
	T: Into<OsString> + Clone,
{
	let app = clap_app!(
		Tint =>
			(version: crate_version!())
			(author: crate_authors!())
			(about: crate_description!())
			(@arg json: --json "Print the highlighted runs as JSON instead of ANSI colors.")
			(@arg indent: --indent conflicts_with[json] "Print the computed indentation of each line.")
			(@arg lines: --lines +takes_value "Lines to highlight per pass.")
			(@arg file: "The file to highlight. Reads from stdin if omitted.")
	);

	match app.get_matches_from_safe(args) {
		Ok(matches) => {
			let lines_per_pass = match matches.value_of("lines") {
				Some(lines) => lines
					.parse()
					.map_err(
						|_| clap::Error::value_validation_auto(
							format!("invalid line count: {}", lines)
						)
					)?,

				None => crate::highlight::Highlighter::DEFAULT_LINES_PER_PASS,
			};

			let output =
				if matches.is_present("json") {
					Output::Json
				} else if matches.is_present("indent") {
					Output::Indent
				} else {
					Output::Ansi
				};

			Ok(
				Command::Run(
					Args {
						path: matches.value_of_os("file").map(PathBuf::from),
						lines_per_pass,
						output,
					}
				)
			)
		}

		Err(error) => match error.kind {
			clap::ErrorKind::HelpDisplayed => Ok(
				Command::Help(error.message.into_boxed_str())
			),
			clap::ErrorKind::VersionDisplayed => Ok(
				Command::Version(error.message.into_boxed_str())
			),
			_ => Err(error)
		}
	}
}
