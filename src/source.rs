//! Line sources
//!
//! Opens files (or arbitrary readers) and yields their lines lazily.
//! Detects gzip (1F 8B 08) and zstd (28 B5 2F FD) compression using magic bytes
//! so compressed logs stream through without a separate step.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

use crate::error::SourceError;

/// Where lines come from: a file on disk or any other byte stream
pub struct LineSource {
    reader: Box<dyn BufRead + Send>,
    label: String,
}

impl std::fmt::Debug for LineSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSource")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl LineSource {
    /// Open a file, rejecting missing, unreadable, and zero-byte files
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let unreadable = |source: io::Error| SourceError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                SourceError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                unreadable(e)
            }
        })?;

        let metadata = file.metadata().map_err(unreadable)?;
        if metadata.is_dir() {
            return Err(unreadable(io::Error::other("is a directory")));
        }
        if metadata.len() == 0 {
            return Err(SourceError::Empty {
                path: path.to_path_buf(),
            });
        }

        let reader = maybe_decompress(file)
            .map_err(unreadable)?
            .ok_or_else(|| SourceError::Empty {
                path: path.to_path_buf(),
            })?;
        Ok(Self {
            reader,
            label: path.display().to_string(),
        })
    }

    /// Wrap an already open stream. A stream that ends before its first byte
    /// is rejected as empty, reported under `label`.
    pub fn from_reader<R: Read + Send + 'static>(
        reader: R,
        label: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let label = label.into();
        match maybe_decompress(reader) {
            Ok(Some(reader)) => Ok(Self { reader, label }),
            Ok(None) => Err(SourceError::Empty { path: label.into() }),
            Err(source) => Err(SourceError::Unreadable {
                path: label.into(),
                source,
            }),
        }
    }

    pub fn stdin() -> Result<Self, SourceError> {
        Self::from_reader(io::stdin(), "<stdin>")
    }

    /// Human readable name used in log messages
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Consume the source, yielding lines without their terminators
    pub fn lines(self) -> Lines {
        Lines {
            reader: self.reader,
            buffer: Vec::new(),
            done: false,
        }
    }
}

/// Lazy line iterator over a [`LineSource`].
///
/// Splits on `\n` and strips a trailing `\r`. Invalid UTF-8 is replaced rather
/// than treated as a read error. After the first error the iterator is fused.
pub struct Lines {
    reader: Box<dyn BufRead + Send>,
    buffer: Vec<u8>,
    done: bool,
}

impl Iterator for Lines {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buffer.clear();
        match self.reader.read_until(b'\n', &mut self.buffer) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buffer.last() == Some(&b'\n') {
                    self.buffer.pop();
                    if self.buffer.last() == Some(&b'\r') {
                        self.buffer.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buffer).into_owned()))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Peek at the first bytes of `reader` and wrap it in the matching decoder.
/// `None` means the stream had no bytes at all.
fn maybe_decompress<R: Read + Send + 'static>(
    mut reader: R,
) -> io::Result<Option<Box<dyn BufRead + Send>>> {
    let mut head = [0u8; 4];
    let n = read_head(&mut reader, &mut head)?;
    if n == 0 {
        return Ok(None);
    }

    // Replay the sniffed bytes ahead of the rest of the stream
    let chained = Cursor::new(head[..n].to_vec()).chain(reader);

    let is_gzip = n >= 3 && head[0] == 0x1F && head[1] == 0x8B && head[2] == 0x08;
    let is_zstd =
        n >= 4 && head[0] == 0x28 && head[1] == 0xB5 && head[2] == 0x2F && head[3] == 0xFD;

    let reader: Box<dyn BufRead + Send> = if is_gzip {
        Box::new(BufReader::new(MultiGzDecoder::new(chained)))
    } else if is_zstd {
        Box::new(BufReader::new(zstd::Decoder::new(chained)?))
    } else {
        Box::new(BufReader::new(chained))
    };
    Ok(Some(reader))
}

/// Fill `head` as far as the stream allows; short reads are not EOF
fn read_head<R: Read>(reader: &mut R, head: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < head.len() {
        match reader.read(&mut head[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
