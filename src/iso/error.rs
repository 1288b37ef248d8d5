use crate::cd::UnsupportedTrackModeError;
use crate::cue::error::CueError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsoError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    JoinError(#[from] tokio::task::JoinError),

    #[error(transparent)]
    TemplateError(#[from] indicatif::style::TemplateError),

    #[error(transparent)]
    CueError(#[from] CueError),

    #[error(transparent)]
    UnsupportedTrackMode(#[from] UnsupportedTrackModeError),

    #[error("No data track (MODE1 or MODE2) found in the CUE sheet")]
    NoDataTrack,

    #[error(
        "Invalid track size: data track spans {start}..{end}, check the CUE sheet or the integrity of the BIN file"
    )]
    InvalidTrackSize { start: u64, end: u64 },

    #[error(
        "BIN ended at byte {reached} while seeking to the data track start at byte {offset}"
    )]
    SeekPastEnd { offset: u64, reached: u64 },

    #[error("No known filesystem signature found, cannot determine the track mode")]
    NoSignatureFound,

    #[error("No files are referenced in the CUE sheet, pass the BIN with --bin")]
    NoFileReferencedInCueSheet,

    #[error("ISO file already exists, use --force to overwrite: {0}")]
    IsoFileAlreadyExists(PathBuf),

    #[error("Output path is the input image itself: {0}")]
    OutputIsInput(PathBuf),
}

impl IsoError {
    /// The sheet names no track the converter can read. A malformed range
    /// or an I/O failure is not one of these.
    pub fn is_mode_resolution_failure(&self) -> bool {
        matches!(
            self,
            IsoError::UnsupportedTrackMode(_) | IsoError::NoDataTrack
        )
    }
}

pub type IsoResult<T> = Result<T, IsoError>;
