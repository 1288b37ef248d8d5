use crate::cd::TrackMode;

/// Byte range of the data track inside the raw image, plus its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTrack {
    pub mode: TrackMode,
    pub start: u64,
    pub end: u64,
}

impl DataTrack {
    pub fn span(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Whole raw sectors inside the span.
    pub fn sector_count(&self) -> u64 {
        self.span() / self.mode.raw_sector_size() as u64
    }

    /// Output size when every whole sector can be read.
    pub fn expected_output_len(&self) -> u64 {
        self.sector_count() * self.mode.data_size() as u64
    }
}

/// How the copy loop ended. Every variant is a successful conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Drained,
    /// The span ended with fewer bytes than a raw sector; they were skipped.
    TrailingPartialSector { discarded: u64 },
    /// The source ran dry mid-sector, `missing` span bytes were never read.
    EndOfInput { missing: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSummary {
    pub sectors_written: u64,
    pub bytes_written: u64,
    pub completion: Completion,
}

impl ConversionSummary {
    pub fn is_complete(&self) -> bool {
        self.completion == Completion::Drained
    }
}
