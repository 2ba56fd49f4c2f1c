//! Error types for the layout and options-resolution core.
//!
//! Collaborators that shell out (`ffprobe`, `ffmpeg`) or touch the filesystem report
//! through `anyhow`; everything that decides geometry, samples or file names reports
//! through [`LayoutError`] so callers can tell a bad configuration from a broken tool.

use std::io::Error as IoError;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LayoutError {
    /// `thumbsCount` and `thumbsInterval` were both supplied.
    #[error("Cannot specify both a total number of thumbs and an interval")]
    ConflictingSampleOptions,

    #[error("Cannot determine output page width")]
    IndeterminateWidth,

    #[error("Cannot determine output page height")]
    IndeterminateHeight,

    /// Neither the declared options nor the measured sample produce a usable page.
    #[error("Cannot determine page dimensions")]
    IndeterminatePageSize,

    #[error("Cannot set header height smaller than computed minimum {computed}")]
    HeaderTooSmall { computed: u32 },

    /// A lazily initialised value was read before its initialisation step.
    #[error("Cannot use {what} before calling {call}")]
    NotInitialised {
        what: &'static str,
        call: &'static str,
    },

    #[error("fonts not loaded")]
    FontsNotLoaded,

    #[error("Invalid font name: {0}")]
    InvalidFont(String),

    #[error("can only specify up to 2 fonts in the simplified format")]
    TooManySimpleFonts,

    #[error("Invalid colour: {0}")]
    InvalidColour(String),

    #[error("Page count property ({0}) does not exist")]
    PageCountMissing(String),

    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

pub type LayoutResult<T> = Result<T, LayoutError>;
