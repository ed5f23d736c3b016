use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::vec;

/// A collaborator able to produce a finite, ordered sequence of text lines.
///
/// The chain model only requires:
/// - lines are produced lazily, in their original order
/// - a discrete failure is signalled when the backing resource cannot be
///   opened
/// - individual reads may fail mid-stream, reported per line
///
/// Storage medium and path syntax are up to the implementation; content
/// is UTF-8 text.
pub trait LineSource {
	/// Iterator over the produced lines.
	type Lines: Iterator<Item = io::Result<String>>;

	/// Opens the backing resource and returns its lines.
	///
	/// # Errors
	/// Returns an error if the resource cannot be opened. A source may be
	/// opened more than once; every open restarts from the first line.
	fn open(&mut self) -> io::Result<Self::Lines>;
}

/// Line source backed by a UTF-8 text file.
///
/// Lines are read lazily through a buffered reader rather than loading
/// the whole file up front, so arbitrarily large corpora can be ingested.
#[derive(Clone, Debug)]
pub struct FileSource {
	path: PathBuf,
}

impl FileSource {
	/// Creates a source for the given file path.
	///
	/// The file is not touched until [`LineSource::open`] is called.
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self { path: path.as_ref().to_path_buf() }
	}

	/// The path this source reads from.
	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl LineSource for FileSource {
	type Lines = io::Lines<BufReader<File>>;

	fn open(&mut self) -> io::Result<Self::Lines> {
		Ok(BufReader::new(File::open(&self.path)?).lines())
	}
}

/// Line source backed by lines held in memory.
///
/// Opening never fails and the source is reusable: each open yields the
/// same lines again. Mostly useful in tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
	lines: Vec<String>,
}

impl MemorySource {
	/// Creates a source over the given lines.
	pub fn new<I, S>(lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { lines: lines.into_iter().map(Into::into).collect() }
	}
}

/// Iterator over the lines of a [`MemorySource`].
pub struct MemoryLines {
	inner: vec::IntoIter<String>,
}

impl Iterator for MemoryLines {
	type Item = io::Result<String>;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(Ok)
	}
}

impl LineSource for MemorySource {
	type Lines = MemoryLines;

	fn open(&mut self) -> io::Result<Self::Lines> {
		Ok(MemoryLines { inner: self.lines.clone().into_iter() })
	}
}
