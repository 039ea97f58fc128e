//! Scan inputs: files on disk and in-memory buffers.

use std::io::{self, Cursor};
use std::path::PathBuf;
use std::sync::Arc;

use logscan_types::SourceId;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, BufReader};

use crate::reader::LineReader;

pub type BoxedLineReader = LineReader<Box<dyn AsyncBufRead + Unpin + Send>>;

/// A document to scan.
#[derive(Debug, Clone)]
pub enum LogSource {
    /// Streamed from disk.
    File { id: SourceId, path: PathBuf },
    /// Contents held by the host, for documents that are not plain files.
    Buffer { id: SourceId, bytes: Arc<[u8]> },
}

impl LogSource {
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::File {
            id: SourceId::from_path(&path),
            path,
        }
    }

    #[must_use]
    pub fn buffer(id: SourceId, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Buffer {
            id,
            bytes: bytes.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SourceId {
        match self {
            Self::File { id, .. } | Self::Buffer { id, .. } => id,
        }
    }

    /// Open the source for line reading.
    ///
    /// Files larger than `large_file_bytes` are logged before streaming.
    pub async fn open(&self, large_file_bytes: u64) -> io::Result<BoxedLineReader> {
        match self {
            Self::File { id, path } => {
                let file = File::open(path).await?;
                let len = file.metadata().await?.len();
                if len > large_file_bytes {
                    tracing::info!(source = %id, bytes = len, "Large log file detected");
                }
                let reader: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(BufReader::new(file));
                Ok(LineReader::new(reader))
            }
            Self::Buffer { bytes, .. } => {
                let reader: Box<dyn AsyncBufRead + Unpin + Send> =
                    Box::new(Cursor::new(Arc::clone(bytes)));
                Ok(LineReader::new(reader))
            }
        }
    }
}
