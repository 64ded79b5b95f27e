use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use thiserror::Error;
use tracing::trace;

use crate::model::RangeScanRecord;

/// Bytes read from the scan channel per attempt.
pub const DEFAULT_CHUNK_SIZE: usize = 2500;

/// End-of-telegram byte (ETX) closing every scanner record.
pub const ETX: u8 = 0x03;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("scan channel I/O: {0}")]
    Io(#[from] io::Error),
    #[error("no record terminator within {chunk_size} bytes at offset {offset}")]
    Overflow { offset: u64, chunk_size: usize },
    #[error("record at offset {offset} is not valid UTF-8: {source}")]
    Utf8 {
        offset: u64,
        #[source]
        source: std::str::Utf8Error,
    },
}

/// Splits a delimiter-framed byte stream into complete records.
///
/// Each call reads one chunk starting at the cursor and keeps only the
/// bytes up to and including the first terminator. The cursor moves by
/// exactly that many bytes, so a record cut off at the end of a chunk is
/// read again, whole, on the next call.
pub struct RecordReader<R> {
    inner: R,
    cursor: u64,
    chunk: Vec<u8>,
    terminator: u8,
    failed: bool,
}

impl RecordReader<File> {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read + Seek> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_options(inner, DEFAULT_CHUNK_SIZE, ETX)
    }

    pub fn with_options(inner: R, chunk_size: usize, terminator: u8) -> Self {
        Self {
            inner,
            cursor: 0,
            chunk: vec![0; chunk_size],
            terminator,
            failed: false,
        }
    }

    /// Absolute offset of the first byte not yet consumed.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Read the next complete record.
    ///
    /// `Ok(None)` means no complete record is available: either the stream
    /// is exhausted or only a truncated tail remains. Neither moves the cursor.
    pub fn next_record(&mut self) -> Result<Option<RangeScanRecord>, RecordError> {
        self.inner.seek(SeekFrom::Start(self.cursor))?;
        let filled = read_up_to(&mut self.inner, &mut self.chunk)?;
        if filled == 0 {
            return Ok(None);
        }

        let Some(end) = self.chunk[..filled]
            .iter()
            .position(|&b| b == self.terminator)
        else {
            if filled == self.chunk.len() {
                return Err(RecordError::Overflow {
                    offset: self.cursor,
                    chunk_size: self.chunk.len(),
                });
            }
            trace!(offset = self.cursor, bytes = filled, "truncated scan record at end of stream");
            return Ok(None);
        };

        let text = std::str::from_utf8(&self.chunk[..=end]).map_err(|source| RecordError::Utf8 {
            offset: self.cursor,
            source,
        })?;
        let record = RangeScanRecord::new(text);
        self.cursor += record.byte_len() as u64;
        Ok(Some(record))
    }
}

/// Yields records until the stream runs out; stops after the first error.
impl<R: Read + Seek> Iterator for RecordReader<R> {
    type Item = Result<RangeScanRecord, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Fill `buf` as far as the reader allows; short only at end of stream.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn stream(records: &[&str]) -> Vec<u8> {
        records
            .iter()
            .flat_map(|r| r.bytes().chain(std::iter::once(ETX)))
            .collect()
    }

    #[test]
    fn cursor_advances_by_record_length_only() {
        let data = stream(&["first record", "second"]);
        let mut reader = RecordReader::new(Cursor::new(data));

        let first = reader.next_record().unwrap().unwrap();
        assert_eq!(first.as_str(), "first record\u{3}");
        assert_eq!(reader.cursor(), 13);

        let second = reader.next_record().unwrap().unwrap();
        assert_eq!(second.as_str(), "second\u{3}");
        assert_eq!(reader.cursor(), 20);

        assert!(reader.next_record().unwrap().is_none());
        assert_eq!(reader.cursor(), 20);
    }

    #[test]
    fn records_spanning_chunk_boundaries_are_reconstructed_in_order() {
        let records: Vec<String> = (0..50).map(|i| format!("rec {i} {}", "a".repeat(i % 7))).collect();
        let refs: Vec<&str> = records.iter().map(String::as_str).collect();
        let reader = RecordReader::with_options(Cursor::new(stream(&refs)), 16, ETX);

        let decoded: Vec<String> = reader
            .map(|r| r.unwrap().as_str().trim_end_matches('\u{3}').to_string())
            .collect();
        assert_eq!(decoded, records);
    }

    #[test]
    fn truncated_tail_is_left_unconsumed() {
        let mut data = stream(&["complete"]);
        data.extend_from_slice(b"partial");
        let mut reader = RecordReader::new(Cursor::new(data));

        assert!(reader.next_record().unwrap().is_some());
        assert!(reader.next_record().unwrap().is_none());
        assert_eq!(reader.cursor(), 9);
    }

    #[test]
    fn record_longer_than_a_chunk_overflows() {
        let data = stream(&["this record is far too long"]);
        let mut reader = RecordReader::with_options(Cursor::new(data), 8, ETX);
        let err = reader.next_record().unwrap_err();
        assert!(matches!(
            err,
            RecordError::Overflow {
                offset: 0,
                chunk_size: 8
            }
        ));
    }

    #[test]
    fn iterator_stops_after_first_error() {
        let mut data = stream(&["ok"]);
        data.extend_from_slice(&[0xff, 0xfe, ETX]);
        data.extend(stream(&["never reached"]));
        let results: Vec<_> = RecordReader::new(Cursor::new(data)).collect();

        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(RecordError::Utf8 { offset: 3, .. })));
    }
}
