use bincue2iso::iso::ConvertJob;
use clap::Parser;
use std::path::PathBuf;

/// Converts the data track of a .cue/.bin pair (or a bare raw image) to an ISO.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
#[command(
    long_about = "Converts the data track of a .cue/.bin pair to an ISO image\n\nNote: Audio tracks are skipped. When INPUT is not a .cue file it is treated as a raw image and its sector layout is detected from the ISO 9660 volume descriptor"
)]
pub struct ConvertCommand {
    /// Input .cue sheet, or a raw image without one
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output ISO file path, defaults to INPUT with an .iso extension
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// BIN file to read instead of the one named in the CUE sheet
    #[arg(long, short = 'b', value_name = "BIN")]
    pub bin: Option<PathBuf>,

    /// Force overwrite of the output file if it already exists
    #[arg(long, short = 'f', default_value_t = false)]
    pub force: bool,

    #[arg(
        long,
        short = 'D',
        help = "detects the track mode from the image itself when the CUE sheet has no usable data track",
        default_value_t = false
    )]
    pub detect_fallback: bool,
}

impl From<ConvertCommand> for ConvertJob {
    fn from(cmd: ConvertCommand) -> Self {
        ConvertJob {
            input: cmd.input,
            bin: cmd.bin,
            output: cmd.output,
            force: cmd.force,
            detect_fallback: cmd.detect_fallback,
        }
    }
}

/// Detects the sector layout of a raw image and checks it for PlayStation boot markers.
#[derive(Parser, Debug, Clone, Eq, PartialEq)]
pub struct DetectCommand {
    /// Raw image (.bin, .img or .iso)
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,
}
