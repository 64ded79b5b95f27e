pub mod record;
pub mod scan;

use std::io::{Read, Seek};

use thiserror::Error;

use crate::model::RangeScan;
pub use record::{RecordError, RecordReader};
pub use scan::{ScanDecodeError, ScanDecoder};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("record: {0}")]
    Record(#[from] RecordError),
    #[error("scan: {0}")]
    Scan(#[from] ScanDecodeError),
}

/// One framed record and the result of decoding it.
#[derive(Debug)]
pub struct DecodedRecord {
    /// Stream offset the record started at.
    pub offset: u64,
    pub scan: Result<RangeScan, ScanDecodeError>,
}

/// Frame and decode every record of a scan stream.
///
/// A record that fails to decode is reported and skipped; a framing error
/// ends the stream.
pub struct ScanStream<R> {
    reader: RecordReader<R>,
    decoder: ScanDecoder,
}

impl<R: Read + Seek> ScanStream<R> {
    pub fn new(reader: RecordReader<R>, decoder: ScanDecoder) -> Self {
        Self { reader, decoder }
    }
}

impl<R: Read + Seek> Iterator for ScanStream<R> {
    type Item = Result<DecodedRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.reader.cursor();
        let record = match self.reader.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        Some(Ok(DecodedRecord {
            offset,
            scan: self.decoder.decode(&record),
        }))
    }
}
