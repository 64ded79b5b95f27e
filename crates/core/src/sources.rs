//! Channel sources feeding the synchronizer.
//!
//! Camera channels implement [`FrameSource`]; the scan channel is any
//! seekable byte stream wrapped in a [`RecordReader`](crate::parsers::RecordReader).

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::ChannelDirs;
use crate::model::Frame;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("I/O on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// A camera channel producing one frame per call.
pub trait FrameSource: Send {
    /// `Ok(None)` once the channel is exhausted; `Err` only for genuine
    /// read or decode failures.
    fn read_frame(&mut self) -> Result<Option<Frame>, ChannelError>;
}

/// Still images in a directory, played back in file-name order.
pub struct ImageSequenceSource {
    files: VecDeque<PathBuf>,
}

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

impl ImageSequenceSource {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, ChannelError> {
        let dir = dir.as_ref();
        let io_err = |source| ChannelError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if is_image {
                files.push(path);
            }
        }
        files.sort();
        debug!(dir = %dir.display(), frames = files.len(), "opened image sequence");

        Ok(Self {
            files: files.into(),
        })
    }

    pub fn remaining(&self) -> usize {
        self.files.len()
    }
}

impl FrameSource for ImageSequenceSource {
    fn read_frame(&mut self) -> Result<Option<Frame>, ChannelError> {
        let Some(path) = self.files.pop_front() else {
            return Ok(None);
        };
        let image = image::open(&path).map_err(|source| ChannelError::Image { path, source })?;
        Ok(Some(image.to_rgb8()))
    }
}

/// Pre-decoded frames held in memory.
#[derive(Default)]
pub struct QueueSource {
    frames: VecDeque<Frame>,
}

impl QueueSource {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl FrameSource for QueueSource {
    fn read_frame(&mut self) -> Result<Option<Frame>, ChannelError> {
        Ok(self.frames.pop_front())
    }
}

/// Where the four channels of one recording live.
///
/// Every channel shares the recording's base name: camera frames under
/// `<root>/<camera dir>/<base>/`, the scan text at `<root>/<scan dir>/<base>.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingPaths {
    pub left: PathBuf,
    pub right: PathBuf,
    pub mid: PathBuf,
    pub scan: PathBuf,
}

impl RecordingPaths {
    pub fn new(root: &Path, base: &str, dirs: &ChannelDirs) -> Self {
        Self {
            left: root.join(&dirs.left).join(base),
            right: root.join(&dirs.right).join(base),
            mid: root.join(&dirs.mid).join(base),
            scan: root.join(&dirs.scan).join(format!("{base}.txt")),
        }
    }
}
