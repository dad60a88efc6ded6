use crate::capture::{AbortSignal, Artifact, CaptureAdapter, DEFAULT_ARTIFACT_NAME, PendingArtifact};
use crate::config::WheelConfig;
use crate::foundation::error::{WheelError, WheelResult};
use crate::render::backend::FrameRGBA;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::sync::mpsc;

/// MIME type of the encoded artifact.
pub const GIF_MIME: &str = "image/gif";

/// Encoder settings for [`GifCapture`].
#[derive(Clone, Debug)]
pub struct GifCaptureConfig {
    /// NeuQuant speed, `1..=30`.
    pub speed: i32,
    /// Opaque color translucent pixels are flattened onto.
    pub bg_rgba: [u8; 4],
    /// File name attached to the artifact.
    pub file_name: String,
}

impl GifCaptureConfig {
    /// Encoder settings derived from a wheel config.
    pub fn from_config(cfg: &WheelConfig) -> Self {
        Self {
            speed: cfg.gif_speed,
            bg_rgba: cfg.background_rgba,
            file_name: DEFAULT_ARTIFACT_NAME.to_owned(),
        }
    }
}

impl Default for GifCaptureConfig {
    fn default() -> Self {
        Self::from_config(&WheelConfig::default())
    }
}

struct GifFrame {
    rgba: Vec<u8>,
    delay_ms: u32,
}

struct Session {
    width: u32,
    height: u32,
    abort: AbortSignal,
    frames: Vec<GifFrame>,
}

/// Records flattened frames and encodes them to a looping GIF on a worker thread.
pub struct GifCapture {
    cfg: GifCaptureConfig,
    session: Option<Session>,
}

impl GifCapture {
    /// Capture with explicit encoder settings.
    pub fn new(cfg: GifCaptureConfig) -> WheelResult<Self> {
        if !(1..=30).contains(&cfg.speed) {
            return Err(WheelError::validation("gif speed must be in 1..=30"));
        }
        Ok(Self { cfg, session: None })
    }

    /// Capture configured from a wheel config.
    pub fn from_config(cfg: &WheelConfig) -> WheelResult<Self> {
        Self::new(GifCaptureConfig::from_config(cfg))
    }

    /// Number of frames in the current recording.
    pub fn recorded_frames(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.frames.len())
    }
}

impl CaptureAdapter for GifCapture {
    fn begin(&mut self, width: u32, height: u32, abort: AbortSignal) -> WheelResult<()> {
        if width == 0 || height == 0 || width > u32::from(u16::MAX) || height > u32::from(u16::MAX)
        {
            return Err(WheelError::capture(format!(
                "gif dimensions {width}x{height} out of range"
            )));
        }
        self.session = Some(Session {
            width,
            height,
            abort,
            frames: Vec::new(),
        });
        Ok(())
    }

    fn add_frame(&mut self, frame: &FrameRGBA, delay_ms: u32) -> WheelResult<()> {
        let Some(session) = self.session.as_mut() else {
            return Err(WheelError::capture("add_frame without an active recording"));
        };
        if session.abort.is_aborted() {
            return Err(WheelError::capture("recording was aborted"));
        }
        if frame.width != session.width || frame.height != session.height {
            return Err(WheelError::capture(format!(
                "frame is {}x{}, recording is {}x{}",
                frame.width, frame.height, session.width, session.height
            )));
        }
        let rgba = frame.flattened_over(self.cfg.bg_rgba)?;
        session.frames.push(GifFrame { rgba, delay_ms });
        Ok(())
    }

    fn render(&mut self) -> WheelResult<PendingArtifact> {
        let Some(session) = self.session.take() else {
            return Err(WheelError::capture("render without an active recording"));
        };
        if session.frames.is_empty() {
            return Err(WheelError::capture("no frames were captured"));
        }

        let (tx, rx) = mpsc::channel();
        let speed = self.cfg.speed;
        let file_name = self.cfg.file_name.clone();
        std::thread::Builder::new()
            .name("spinwheel-gif".to_owned())
            .spawn(move || {
                let res = encode(session, speed, file_name);
                // The receiver is gone when the engine already gave up on the artifact.
                let _ = tx.send(res);
            })
            .map_err(|e| WheelError::capture(format!("spawn gif worker: {e}")))?;

        Ok(PendingArtifact::from_channel(rx))
    }

    fn abort(&mut self) {
        if let Some(session) = self.session.take() {
            session.abort.abort();
            tracing::debug!(frames = session.frames.len(), "gif recording dropped");
        }
    }
}

fn encode(session: Session, speed: i32, file_name: String) -> WheelResult<Artifact> {
    let Session {
        width,
        height,
        abort,
        frames,
    } = session;
    let total = frames.len();
    let mut bytes = Vec::new();
    {
        let mut enc = GifEncoder::new_with_speed(&mut bytes, speed);
        enc.set_repeat(Repeat::Infinite)
            .map_err(|e| WheelError::capture(format!("gif repeat: {e}")))?;

        for (i, f) in frames.into_iter().enumerate() {
            if abort.is_aborted() {
                return Err(WheelError::capture("gif assembly aborted"));
            }
            let img = RgbaImage::from_raw(width, height, f.rgba)
                .ok_or_else(|| WheelError::capture("frame buffer does not match dimensions"))?;
            let delay = Delay::from_numer_denom_ms(f.delay_ms, 1);
            enc.encode_frame(Frame::from_parts(img, 0, 0, delay))
                .map_err(|e| WheelError::capture(format!("encode gif frame {i}: {e}")))?;
            tracing::debug!(done = i + 1, total, "gif progress");
        }
    }

    tracing::debug!(bytes = bytes.len(), frames = total, "gif finished");
    Ok(Artifact {
        bytes,
        mime: GIF_MIME,
        frame_count: total,
        suggested_file_name: file_name,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/gif.rs"]
mod tests;
