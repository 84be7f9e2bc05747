use crate::core::models::atom::Atom;
use flate2::read::GzDecoder;
use std::convert::Infallible;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::{Path, PathBuf};

/// A predicate over atom records.
///
/// Implemented by compiled selections and by any `Fn(&Atom) -> bool` closure.
pub trait AtomFilter {
    fn matches(&self, atom: &Atom) -> bool;
}

impl<F> AtomFilter for F
where
    F: Fn(&Atom) -> bool,
{
    fn matches(&self, atom: &Atom) -> bool {
        self(atom)
    }
}

/// Why a read finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every line of the input was consumed.
    EndOfInput,
    /// The configured maximum number of emitted atoms was reached.
    AtomLimit,
    /// Available memory dropped below the configured headroom; the atoms read so
    /// far are returned as a valid partial result.
    MemoryPressure,
}

/// The outcome of a structure read.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseReport {
    pub atoms: Vec<Atom>,
    pub stop: StopReason,
    /// Atom records decoded from the input, including those rejected by the filter.
    pub decoded: usize,
    pub lines_read: usize,
}

impl ParseReport {
    pub fn is_partial(&self) -> bool {
        self.stop == StopReason::MemoryPressure
    }
}

/// Supplies the bytes of a structure file.
///
/// This is the boundary to whatever fetched the file: a local path, an
/// in-memory download, or a decompressed stream.
pub trait ByteSource {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>>;

    /// A human-readable label for diagnostics.
    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

impl ByteSource for Path {
    /// Opens the file, decompressing it transparently when the name ends in `.gz`.
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        let file = File::open(self)?;
        let gzipped = self
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        if gzipped {
            Ok(Box::new(BufReader::new(GzDecoder::new(file))))
        } else {
            Ok(Box::new(BufReader::new(file)))
        }
    }

    fn describe(&self) -> String {
        self.display().to_string()
    }
}

impl ByteSource for PathBuf {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        self.as_path().open()
    }

    fn describe(&self) -> String {
        self.as_path().describe()
    }
}

impl ByteSource for [u8] {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        Ok(Box::new(Cursor::new(self)))
    }
}

impl ByteSource for Vec<u8> {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        self.as_slice().open()
    }
}

impl ByteSource for str {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        self.as_bytes().open()
    }
}

impl ByteSource for String {
    fn open(&self) -> io::Result<Box<dyn BufRead + '_>> {
        self.as_bytes().open()
    }
}

/// Reads atom records from a structure format.
pub trait StructureReader {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads atoms from a buffered reader, keeping only those accepted by `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails, I/O fails, or no atom is emitted.
    fn read_from(
        &self,
        reader: &mut dyn BufRead,
        filter: Option<&dyn AtomFilter>,
    ) -> Result<ParseReport, Self::Error>;

    /// Reads atoms from any [`ByteSource`].
    fn read_source<S: ByteSource + ?Sized>(
        &self,
        source: &S,
        filter: Option<&dyn AtomFilter>,
    ) -> Result<ParseReport, Self::Error> {
        let mut reader = source.open()?;
        self.read_from(&mut reader, filter)
    }

    /// Reads atoms from a file path (`.gz` files are decompressed).
    fn read_from_path<P: AsRef<Path>>(
        &self,
        path: P,
        filter: Option<&dyn AtomFilter>,
    ) -> Result<ParseReport, Self::Error> {
        self.read_source(path.as_ref(), filter)
    }
}

/// Consumes an atom sequence together with the predicate that selects which
/// atoms to keep, e.g. a file writer.
pub trait AtomSink {
    type Error: Error;

    fn write_atoms(
        &mut self,
        atoms: &[Atom],
        filter: &dyn AtomFilter,
    ) -> Result<usize, Self::Error>;
}

impl AtomSink for Vec<Atom> {
    type Error = Infallible;

    /// Appends clones of the accepted atoms and returns how many were appended.
    fn write_atoms(
        &mut self,
        atoms: &[Atom],
        filter: &dyn AtomFilter,
    ) -> Result<usize, Self::Error> {
        let before = self.len();
        self.extend(atoms.iter().filter(|a| filter.matches(a)).cloned());
        Ok(self.len() - before)
    }
}
