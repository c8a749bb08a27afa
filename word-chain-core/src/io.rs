use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::env;

/// Reads a corpus file and splits it into line chunks.
///
/// - Reads the entire file into memory
/// - Decodes it leniently: invalid UTF-8 becomes U+FFFD
/// - Trims leading and trailing whitespace of the whole text
/// - Splits on `\n`; a trailing `\r` is left to the tokenizer
///
/// Each chunk is meant to be built separately so that lines do not
/// chain into one another.
pub fn read_corpus<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let bytes = fs::read(filename)?;
	let contents = String::from_utf8_lossy(&bytes);
	Ok(contents.trim().split('\n').map(str::to_owned).collect())
}

/// Name of a corpus file: its stem, when it is valid UTF-8.
///
/// `data/mickens.txt` is the corpus `mickens`. Stems that are not
/// UTF-8 cannot be requested by name and yield `None`.
pub fn corpus_name<P: AsRef<Path>>(path: P) -> Option<String> {
	path.as_ref().file_stem()?.to_str().map(str::to_owned)
}

/// Directory holding the corpora.
///
/// An empty path or `.` means the current working directory, falling
/// back to `.` itself if it cannot be determined.
pub fn data_dir(input: &str) -> PathBuf {
	let trimmed = input.trim_end_matches(['/', '\\']);
	if input.is_empty() || trimmed == "." {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else if trimmed.is_empty() {
		PathBuf::from(input)
	} else {
		PathBuf::from(trimmed)
	}
}

/// Lists all files with a given extension in a directory.
///
/// Returns file names only (no paths), sorted.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
