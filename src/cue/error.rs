use thiserror::Error;

#[derive(Debug, Error)]
pub enum CueError {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("No usable track found in the CUE sheet (a TRACK line followed by INDEX 01)")]
    NoTracks,
}

pub type CueResult<T> = Result<T, CueError>;
