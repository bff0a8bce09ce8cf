//! Chunked line reader for very large delimited files
//!
//! `LineReader` reads its source `chunk_size` bytes at a time and yields one
//! decoded line per call, so memory stays bounded by the longest line rather
//! than the size of the file. The reader owns its source; the handle is
//! released by `close()` or when the reader is dropped, whichever comes first.

use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, trace};

use crate::error::{Result, ShowrateError};

/// Default number of bytes requested from the source per read
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Text encoding used for the delimiter and for decoding lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
}

impl Encoding {
    /// Encode `text` in this encoding, or `None` if it has no representation.
    fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            Encoding::Utf8 => Some(text.as_bytes().to_vec()),
            Encoding::Ascii if text.is_ascii() => Some(text.as_bytes().to_vec()),
            Encoding::Ascii => None,
        }
    }

    fn decode(self, bytes: Vec<u8>) -> std::result::Result<String, String> {
        if self == Encoding::Ascii {
            if let Some(offset) = bytes.iter().position(|b| !b.is_ascii()) {
                return Err(format!(
                    "byte 0x{:02x} at offset {} is outside ASCII",
                    bytes[offset], offset
                ));
            }
        }
        String::from_utf8(bytes).map_err(|e| e.utf8_error().to_string())
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::Utf8 => f.write_str("UTF-8"),
            Encoding::Ascii => f.write_str("ASCII"),
        }
    }
}

/// Options for opening a `LineReader`
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Line delimiter (default: "\n")
    pub delimiter: String,
    /// Encoding of the source (default: UTF-8)
    pub encoding: Encoding,
    /// Bytes requested per read (default: 4096)
    pub chunk_size: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: "\n".to_string(),
            encoding: Encoding::Utf8,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl ReaderOptions {
    /// Options with a custom delimiter and the default encoding and chunk size
    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            ..Self::default()
        }
    }
}

/// Lazy, single-pass reader of delimiter-separated lines.
///
/// Not meant to be shared: two callers pulling lines from the same reader see
/// an interleaving of one sequence. After `rewind()` the sequence restarts
/// from the first line.
///
/// # Example
/// ```no_run
/// use showrate_core::LineReader;
///
/// # fn example() -> showrate_core::Result<()> {
/// let mut reader = LineReader::open("title.ratings.tsv")?;
/// let header = reader.next_line()?;
/// for line in reader.by_ref() {
///     let line = line?;
///     println!("{}", line);
/// }
/// # Ok(())
/// # }
/// ```
pub struct LineReader<R> {
    /// `None` once closed
    source: Option<R>,
    delimiter: Vec<u8>,
    encoding: Encoding,
    chunk_size: usize,
    /// Bytes read ahead but not yet returned as a line
    buffer: Vec<u8>,
    /// Prefix of `buffer` already known not to start a delimiter
    scanned: usize,
    at_eof: bool,
    line_number: usize,
}

impl LineReader<File> {
    /// Open a file with default options (newline, UTF-8, 4096-byte chunks).
    ///
    /// # Errors
    /// - `ShowrateError::Open` if the file cannot be opened for reading or is
    ///   a directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ReaderOptions::default())
    }

    /// Open a file with custom options.
    ///
    /// # Errors
    /// - `ShowrateError::UnsupportedDelimiter` if the delimiter is empty or
    ///   cannot be encoded in the chosen encoding
    /// - `ShowrateError::InvalidOptions` if `chunk_size` is zero
    /// - `ShowrateError::Open` if the file cannot be opened for reading or is
    ///   a directory
    pub fn open_with(path: impl AsRef<Path>, options: ReaderOptions) -> Result<Self> {
        let path = path.as_ref();
        let delimiter = validate(&options)?;
        let open_error = |source| ShowrateError::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_error)?;
        // Opening a directory succeeds on Unix; only the first read fails.
        if file.metadata().map_err(open_error)?.is_dir() {
            return Err(open_error(std::io::Error::new(
                ErrorKind::Other,
                "is a directory",
            )));
        }
        debug!(path = %path.display(), chunk_size = options.chunk_size, "Opened line reader");
        Ok(Self::build(file, delimiter, &options))
    }
}

impl<R: Read + Seek> LineReader<R> {
    /// Wrap an already opened source.
    pub fn from_source(source: R, options: ReaderOptions) -> Result<Self> {
        let delimiter = validate(&options)?;
        Ok(Self::build(source, delimiter, &options))
    }

    /// Return the next line without its delimiter, or `None` at end of input.
    ///
    /// A final line without a trailing delimiter is returned once; a source
    /// that ends exactly on a delimiter yields no trailing empty line.
    ///
    /// # Errors
    /// - `ShowrateError::ReaderClosed` after `close()`
    /// - `ShowrateError::Decode` if the line is not valid in the encoding
    /// - `ShowrateError::Io` if the underlying read fails
    pub fn next_line(&mut self) -> Result<Option<String>> {
        if self.source.is_none() {
            return Err(ShowrateError::ReaderClosed);
        }

        loop {
            if let Some(start) = self.find_delimiter() {
                let end = start + self.delimiter.len();
                let mut line: Vec<u8> = self.buffer.drain(..end).collect();
                line.truncate(start);
                self.scanned = 0;
                return self.decode(line).map(Some);
            }

            if self.at_eof {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let line = std::mem::take(&mut self.buffer);
                self.scanned = 0;
                return self.decode(line).map(Some);
            }

            self.fill_buffer()?;
        }
    }

    /// Restart from the beginning of the source, discarding read-ahead bytes.
    ///
    /// # Errors
    /// - `ShowrateError::ReaderClosed` after `close()`
    /// - `ShowrateError::Io` if the seek fails
    pub fn rewind(&mut self) -> Result<()> {
        let source = self.source.as_mut().ok_or(ShowrateError::ReaderClosed)?;
        source.seek(SeekFrom::Start(0))?;
        self.buffer.clear();
        self.scanned = 0;
        self.at_eof = false;
        self.line_number = 0;
        Ok(())
    }

    /// Read up to one chunk into the buffer; a zero-byte read marks end of input.
    fn fill_buffer(&mut self) -> Result<()> {
        let source = self.source.as_mut().ok_or(ShowrateError::ReaderClosed)?;
        let filled = self.buffer.len();
        self.buffer.resize(filled + self.chunk_size, 0);

        let read = loop {
            match source.read(&mut self.buffer[filled..]) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.truncate(filled);
                    return Err(e.into());
                }
            }
        };

        self.buffer.truncate(filled + read);
        if read == 0 {
            trace!(line = self.line_number, "Reached end of input");
            self.at_eof = true;
        }
        Ok(())
    }
}

impl<R> LineReader<R> {
    fn build(source: R, delimiter: Vec<u8>, options: &ReaderOptions) -> Self {
        Self {
            source: Some(source),
            delimiter,
            encoding: options.encoding,
            chunk_size: options.chunk_size,
            buffer: Vec::with_capacity(options.chunk_size),
            scanned: 0,
            at_eof: false,
            line_number: 0,
        }
    }

    /// Release the underlying source. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            self.buffer = Vec::new();
            debug!(lines = self.line_number, "Closed line reader");
        }
    }

    /// Whether `close()` has been called
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Number of lines returned since opening or the last rewind
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Search the whole unscanned part of the buffer so a delimiter split
    /// across two reads is still found.
    fn find_delimiter(&mut self) -> Option<usize> {
        let width = self.delimiter.len();
        let found = self.buffer[self.scanned..]
            .windows(width)
            .position(|window| window == self.delimiter.as_slice())
            .map(|offset| self.scanned + offset);

        if found.is_none() {
            self.scanned = self.buffer.len().saturating_sub(width - 1);
        }
        found
    }

    fn decode(&mut self, bytes: Vec<u8>) -> Result<String> {
        self.line_number += 1;
        self.encoding
            .decode(bytes)
            .map_err(|reason| ShowrateError::Decode {
                line_number: self.line_number,
                encoding: self.encoding.to_string(),
                reason,
            })
    }
}

impl<R: Read + Seek> Iterator for LineReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

fn validate(options: &ReaderOptions) -> Result<Vec<u8>> {
    if options.chunk_size == 0 {
        return Err(ShowrateError::InvalidOptions(
            "chunk size must be greater than zero".to_string(),
        ));
    }

    match options.encoding.encode(&options.delimiter) {
        Some(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(ShowrateError::UnsupportedDelimiter {
            delimiter: options.delimiter.clone(),
            encoding: options.encoding.to_string(),
        }),
    }
}
