use crate::commands::iso::{ConvertCommand, DetectCommand};
use clap::{Parser, Subcommand};

pub mod iso;

/// CLI for turning BIN/CUE disc dumps into ISO images.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Convert(ConvertCommand),
    Detect(DetectCommand),
}
