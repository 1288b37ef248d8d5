use crate::cd::RAW_SECTOR_SIZE;
use std::fmt::Display;

pub const FRAMES_PER_SECOND: u64 = 75;
pub const SECONDS_PER_MINUTE: u64 = 60;

/// A minutes:seconds:frames position on the raw sector grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msf {
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

impl Msf {
    pub fn new(minutes: u8, seconds: u8, frames: u8) -> Self {
        Self {
            minutes,
            seconds,
            frames,
        }
    }

    pub fn total_frames(&self) -> u64 {
        (self.minutes as u64 * SECONDS_PER_MINUTE + self.seconds as u64) * FRAMES_PER_SECOND
            + self.frames as u64
    }

    /// Byte position within the image. Always measured in raw 2352-byte
    /// sectors, whatever mode the track declares.
    pub fn byte_offset(&self) -> u64 {
        self.total_frames() * RAW_SECTOR_SIZE as u64
    }
}

impl Display for Msf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.minutes, self.seconds, self.frames
        )
    }
}
