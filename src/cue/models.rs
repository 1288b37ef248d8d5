use crate::cd::msf::Msf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheet {
    /// First `FILE "..." BINARY` directive, if any.
    pub file: Option<CueFile>,
    /// Every FILE directive seen, including ones after the first.
    pub file_count: usize,
    pub tracks: Vec<TrackDescriptor>,
}

impl CueSheet {
    pub fn referenced_bin(&self) -> Option<&str> {
        self.file.as_ref().map(|file| file.filename.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueFile {
    pub filename: String,
}

/// A track located by its first INDEX 01 mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDescriptor {
    pub number: u32,
    /// Mode label exactly as written in the sheet, e.g. `MODE2/2352` or `AUDIO`.
    pub mode_label: String,
    pub index01: Msf,
}

impl TrackDescriptor {
    pub fn start_byte_offset(&self) -> u64 {
        self.index01.byte_offset()
    }

    pub fn is_data(&self) -> bool {
        let upper = self.mode_label.to_ascii_uppercase();
        upper.starts_with("MODE1") || upper.starts_with("MODE2")
    }
}
