//! spinwheel picks a random name by spinning a wheel.
//!
//! The crate is the core of a "spin the wheel" widget without any particular host:
//!
//! - Build colored segments from a list of names ([`build_segments`], [`parse_names`])
//! - Draw the wheel at any rotation ([`CpuRenderer`] behind the [`WheelRenderer`] trait)
//! - Run a randomized, eased spin as a timestamp-driven state machine ([`SpinEngine`])
//! - Record the spin and export it as a looping GIF ([`GifCapture`] behind [`CaptureAdapter`])
//!
//! The host supplies frame steps through a [`FrameScheduler`] and receives the outcome through
//! a [`ResultPresenter`]. [`run_spin`] drives a whole spin headlessly.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub mod capture;
pub mod config;
pub mod host;
pub mod present;
pub mod render;
/// Spin planning and the spin state machine.
pub mod spin;
pub(crate) mod wheel;

pub use crate::animation::ease::Ease;
pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgba8Premul, Vec2};
pub use crate::foundation::error::{WheelError, WheelResult};
pub use crate::foundation::math::normalize_degrees;
pub use crate::wheel::geometry::{segment_angle, spin_delta, winning_index};
pub use crate::wheel::segment::{Segment, build_segments, parse_names, segment_color};

pub use crate::capture::gif::{GifCapture, GifCaptureConfig};
pub use crate::capture::memory::InMemoryCapture;
pub use crate::capture::{AbortSignal, Artifact, CaptureAdapter, PendingArtifact};
pub use crate::config::WheelConfig;
pub use crate::host::{DriveClock, DriveOpts, FrameScheduler, ManualScheduler, SpinReport, run_spin};
pub use crate::present::{LogPresenter, ResultPresenter};
pub use crate::render::backend::{FrameRGBA, WheelRenderer};
pub use crate::render::cpu::{CpuRenderer, CpuRendererOpts};
pub use crate::spin::engine::{
    ArtifactStatus, EngineParts, FrameOutcome, SpinEngine, SpinResult, SpinStart, WheelState,
};
pub use crate::spin::plan::{SpinChoice, SpinPlan, SpinTuning};
