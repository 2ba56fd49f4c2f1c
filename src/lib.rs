//! Contact sheets for video files.
//!
//! A contact sheet is one or more pages of evenly spaced frames from a video, each with
//! its timestamp, under a header describing the file. Most of the crate resolves page
//! geometry from partially specified options; extraction and probing shell out to
//! `ffmpeg` and `ffprobe`.

pub mod component;
pub mod config;
pub mod error;
pub mod init;
pub mod signal;
pub mod tools;

pub use component::ContactSheetGenerator;
pub use error::{LayoutError, LayoutResult};
