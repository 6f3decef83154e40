//! Frame sources: the decode side of the editor.
//!
//! Real container demuxing and decoding live outside this workspace. The
//! editor only needs the video's properties and a way to fetch one decoded
//! frame as RGBA.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use runtimer_common::error::{RuntimerError, RuntimerResult};
use runtimer_run_model::video::VideoProperties;

/// A decodable video.
///
/// `raw_frame` may block; the preview scheduler calls it on the blocking
/// thread pool.
pub trait FrameSource: Send + Sync {
    /// Properties of the video. The sole source of [`VideoProperties`].
    fn properties(&self) -> RuntimerResult<VideoProperties>;

    /// Decode frame `frame` as an RGBA image.
    fn raw_frame(&self, frame: u64) -> RuntimerResult<RgbaImage>;

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        "video"
    }
}

/// A video of identical solid-colored frames.
#[derive(Debug, Clone)]
pub struct SolidColorSource {
    properties: VideoProperties,
    color: Rgba<u8>,
}

impl SolidColorSource {
    pub fn new(properties: VideoProperties, color: Rgba<u8>) -> Self {
        Self { properties, color }
    }
}

impl FrameSource for SolidColorSource {
    fn properties(&self) -> RuntimerResult<VideoProperties> {
        Ok(self.properties)
    }

    fn raw_frame(&self, frame: u64) -> RuntimerResult<RgbaImage> {
        if frame >= self.properties.total_frames() {
            return Err(RuntimerError::decode_frame(frame, "frame out of range"));
        }
        Ok(RgbaImage::from_pixel(
            self.properties.width(),
            self.properties.height(),
            self.color,
        ))
    }

    fn name(&self) -> &str {
        "solid color"
    }
}

/// A directory of still images played back at a fixed frame rate.
#[derive(Debug, Clone)]
pub struct ImageSequenceSource {
    name: String,
    frames: Vec<PathBuf>,
    width: u32,
    height: u32,
    fps: f64,
}

const SEQUENCE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

impl ImageSequenceSource {
    /// Collect the images in `dir`, sorted by file name.
    ///
    /// The first image sets the video size. Later stills are decoded as they
    /// are; compositing scales them to that size.
    pub fn from_dir(dir: impl AsRef<Path>, fps: f64) -> RuntimerResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RuntimerError::FileNotFound {
                path: dir.to_path_buf(),
            });
        }

        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| {
                        SEQUENCE_EXTENSIONS
                            .iter()
                            .any(|known| ext.eq_ignore_ascii_case(known))
                    })
                    .unwrap_or(false)
            })
            .collect();
        frames.sort();

        let first = frames.first().ok_or_else(|| {
            RuntimerError::invalid_video(format!("no image frames in {}", dir.display()))
        })?;
        let (width, height) = image::image_dimensions(first)
            .map_err(|e| RuntimerError::invalid_video(format!("{}: {e}", first.display())))?;

        tracing::debug!(
            dir = %dir.display(),
            frames = frames.len(),
            width,
            height,
            "Opened image sequence"
        );

        Ok(Self {
            name: dir.display().to_string(),
            frames,
            width,
            height,
            fps,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ImageSequenceSource {
    fn properties(&self) -> RuntimerResult<VideoProperties> {
        let duration = self.frames.len() as f64 / self.fps;
        Ok(VideoProperties::resolve(
            self.width,
            self.height,
            duration,
            Some(self.fps),
            Some(self.frames.len() as u64),
        )?)
    }

    fn raw_frame(&self, frame: u64) -> RuntimerResult<RgbaImage> {
        let path = usize::try_from(frame)
            .ok()
            .and_then(|i| self.frames.get(i))
            .ok_or_else(|| RuntimerError::decode_frame(frame, "frame out of range"))?;
        let image = image::open(path)
            .map_err(|e| RuntimerError::decode_frame(frame, format!("{}: {e}", path.display())))?;
        Ok(image.to_rgba8())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "runtimer-source-{tag}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_solid_source_respects_length() {
        let props = VideoProperties::new(8, 4, 10.0, 1.0).unwrap();
        let source = SolidColorSource::new(props, Rgba([1, 2, 3, 255]));
        let frame = source.raw_frame(9).unwrap();
        assert_eq!(frame.dimensions(), (8, 4));
        assert_eq!(frame.get_pixel(0, 0).0, [1, 2, 3, 255]);
        assert!(matches!(
            source.raw_frame(10),
            Err(RuntimerError::DecodeFrame { frame: 10, .. })
        ));
    }

    #[test]
    fn test_image_sequence_orders_frames_by_name() {
        let dir = temp_dir("order");
        for (name, shade) in [("b.png", 20u8), ("a.png", 10), ("c.png", 30)] {
            RgbaImage::from_pixel(6, 3, Rgba([shade, 0, 0, 255]))
                .save(dir.join(name))
                .unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let source = ImageSequenceSource::from_dir(&dir, 10.0).unwrap();
        assert_eq!(source.len(), 3);

        let props = source.properties().unwrap();
        assert_eq!((props.width(), props.height()), (6, 3));
        assert_eq!(props.total_frames(), 3);

        assert_eq!(source.raw_frame(0).unwrap().get_pixel(0, 0)[0], 10);
        assert_eq!(source.raw_frame(2).unwrap().get_pixel(0, 0)[0], 30);
        assert!(source.raw_frame(3).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_directory_is_invalid_video() {
        let dir = temp_dir("empty");
        let err = ImageSequenceSource::from_dir(&dir, 30.0).unwrap_err();
        assert!(matches!(err, RuntimerError::InvalidVideo { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_directory() {
        let err = ImageSequenceSource::from_dir("/definitely/not/here", 30.0).unwrap_err();
        assert!(matches!(err, RuntimerError::FileNotFound { .. }));
    }
}
