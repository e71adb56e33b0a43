//! Decoded-frame access for signature extraction

use crate::error::Result;
use image::RgbImage;
use std::path::PathBuf;

/// Random access to decoded video frames by index.
///
/// Returns `Ok(None)` once past the end of the stream. Signature
/// extraction over an archive longer than its video stops at the shorter
/// length, so running out of frames is not an error.
pub trait FrameSource {
    fn frame(&mut self, index: usize) -> Result<Option<RgbImage>>;
}

/// Frames held in memory, for tests and short clips.
#[derive(Debug, Clone, Default)]
pub struct MemoryFrames {
    frames: Vec<RgbImage>,
}

impl MemoryFrames {
    pub fn new(frames: Vec<RgbImage>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for MemoryFrames {
    fn frame(&mut self, index: usize) -> Result<Option<RgbImage>> {
        Ok(self.frames.get(index).cloned())
    }
}

/// Directory of zero-padded numbered frame images, e.g. `000042.png`.
///
/// The decode step that produces such a directory belongs to the external
/// video layer; this reader only maps indices to files. The first missing
/// index is treated as the end of the sequence.
#[derive(Debug, Clone)]
pub struct ImageSequence {
    dir: PathBuf,
    extension: String,
    pad: usize,
}

impl ImageSequence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_format(dir, "png", 6)
    }

    pub fn with_format(dir: impl Into<PathBuf>, extension: impl Into<String>, pad: usize) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
            pad,
        }
    }

    fn path_for(&self, index: usize) -> PathBuf {
        self.dir
            .join(format!("{:0pad$}.{}", index, self.extension, pad = self.pad))
    }
}

impl FrameSource for ImageSequence {
    fn frame(&mut self, index: usize) -> Result<Option<RgbImage>> {
        let path = self.path_for(index);
        if !path.exists() {
            return Ok(None);
        }
        let frame = image::open(&path)?.into_rgb8();
        Ok(Some(frame))
    }
}
