use std::{
	fs::{self, File},
	io,
	path::{Path, PathBuf},
};


/// Run a test against every file in a directory, recursively, in path order.
pub fn test_dir<P, F>(path: P, mut test: F) -> io::Result<()>
where
	P: AsRef<Path>,
	F: FnMut(&Path, File) -> io::Result<()>,
{
	let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	dir.push(path);

	fn run<F>(dir: &Path, test: &mut F) -> io::Result<()>
	where
		F: FnMut(&Path, File) -> io::Result<()>,
	{
		let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
			.map(|entry| entry.map(|entry| entry.path()))
			.collect::<io::Result<_>>()?;

		entries.sort();

		for path in entries {
			if path.is_dir() {
				run(&path, test)?;
			} else {
				test(&path, File::open(&path)?)?;
			}
		}

		Ok(())
	}

	run(&dir, &mut test)
}
