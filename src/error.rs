//! Error module for the Rusty Rate library.
use std::error::Error;
use std::fmt;

use crate::event::EventKind;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum SynapseError {
    /// Error for a source node that does not emit the event kind transmitted by the connection.
    UnsupportedEventKind { model: String, kind: EventKind },
    /// Error for a target receptor that exists but does not accept the event kind.
    IncompatibleEventKind {
        model: String,
        kind: EventKind,
        receptor: usize,
    },
    /// Error for a receptor that does not exist on the target node.
    UnknownReceptorType { model: String, receptor: usize },
    /// Error for a property that cannot be set on the connection variant, e.g., the weight of a diffusion connection.
    InvalidPropertyForVariant(String),
    /// Error for invalid parameters, e.g., a status value of the wrong type.
    InvalidParameter(String),
    /// Error for a delay rejected by the delay checker.
    InvalidDelay { delay: u64, min: u64, max: u64 },
    /// Error for a node locator that does not resolve to a live node.
    UnknownNode(usize),
    /// Error for an operation requiring a connection that has not been through the handshake.
    NotConnected,
    /// Error for a second handshake on an already connected connection.
    AlreadyConnected,
    /// Error for an unknown synapse model name.
    UnknownSynapseModel(String),
    /// Error for I/O operations.
    IOError(String),
}

impl fmt::Display for SynapseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SynapseError::UnsupportedEventKind { model, kind } => {
                write!(f, "Unsupported event kind: {} does not send {}", model, kind)
            }
            SynapseError::IncompatibleEventKind {
                model,
                kind,
                receptor,
            } => write!(
                f,
                "Incompatible event kind: receptor {} of {} does not handle {}",
                receptor, model, kind
            ),
            SynapseError::UnknownReceptorType { model, receptor } => {
                write!(f, "Unknown receptor type {} for {}", receptor, model)
            }
            SynapseError::InvalidPropertyForVariant(e) => write!(f, "Bad property: {}", e),
            SynapseError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            SynapseError::InvalidDelay { delay, min, max } => write!(
                f,
                "Invalid delay: {} steps is outside [{}, {}]",
                delay, min, max
            ),
            SynapseError::UnknownNode(id) => write!(f, "Unknown node: {}", id),
            SynapseError::NotConnected => {
                write!(f, "The connection has no target, run the handshake first")
            }
            SynapseError::AlreadyConnected => {
                write!(f, "The connection has already been through the handshake")
            }
            SynapseError::UnknownSynapseModel(name) => write!(f, "Unknown synapse model: {}", name),
            SynapseError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for SynapseError {}
