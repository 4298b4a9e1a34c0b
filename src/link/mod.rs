//! Link module - serial communication with the MicDeck macropad

mod discovery;
mod line;
mod worker;

pub use discovery::{discover, enumerate_ports, pick_port, PortCandidate};
pub use line::LineAssembler;
pub use worker::{LinkReader, LinkWorker, LinkWriter, PortWriter};

use thiserror::Error;

/// Errors from the serial link layer.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("no serial port matching the macropad was found")]
    NoPortFound,

    #[error("link is not connected")]
    NotConnected,

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
