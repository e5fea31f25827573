// Errors raised while loading or running a pixel program

use crate::data::{Color, Data};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // Stack //
    #[error("trying to push in a full stack")]
    StackFull,

    #[error("trying to pop an empty stack")]
    StackEmpty,

    #[error("invalid stack index {index} (size {size})")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("invalid max stack size {0}")]
    InvalidMaxSize(i64),

    #[error("not enough space in the stack to push a string of {needed} cells ({free} free)")]
    NoSpaceForString { needed: usize, free: usize },

    // Navigation //
    #[error("instruction size must be at least 1")]
    InvalidInstructionSize,

    #[error("out of bounds")]
    OutOfBounds,

    #[error("missing end loop")]
    MissingEndLoop,

    #[error("missing start loop")]
    MissingStartLoop,

    // I/O //
    #[error("problems reading input: {0}")]
    Input(String),

    #[error("unable to write to the console")]
    Output(#[source] io::Error),

    #[error("unable to open file {path:?}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to close the file")]
    CloseFile(#[source] io::Error),

    #[error("error reading the opened file")]
    ReadFile(#[source] io::Error),

    #[error("error writing to the opened file")]
    WriteFile(#[source] io::Error),

    #[error("trying to close a file but none is open")]
    NoOpenFile,

    // Semantic //
    #[error("trying to open multiple files")]
    FileAlreadyOpen,

    #[error("trying to generate a random number with n <= 0 (n = {0})")]
    RandomRange(Data),

    #[error("invalid string into the stack")]
    InvalidString,

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid shift amount {0}")]
    InvalidShift(Data),

    // Loading //
    #[error("target image must be .png: {0:?}")]
    ImageExtension(PathBuf),

    #[error("pixel buffer of {len} bytes does not hold a {width}x{height} RGB image")]
    PixelBuffer {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("unable to decode specified image")]
    Image(#[from] image::ImageError),

    #[error("unable to load config file {path:?}")]
    LoadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse config file")]
    ParseConfig(#[from] toml::de::Error),

    #[error("invalid hex format {0:?}")]
    InvalidHex(String),

    #[error("unknown operation {0:?}")]
    UnknownOperation(String),

    #[error("color {color} is assigned to both {first} and {second}")]
    DuplicateColor {
        color: Color,
        first: &'static str,
        second: &'static str,
    },
}
