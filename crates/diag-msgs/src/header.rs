//! # Message Headers
//!
//! Diagnosed endpoints read the header stamp of every message. Message types
//! opt in by implementing `HasHeader`.

use crate::time::Time;
use serde::{Deserialize, Serialize};

/// Standard metadata carried by stamped messages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Header {
    /// Sequence number, set by the producer.
    pub seq: u32,
    /// Acquisition time of the data in this message.
    pub stamp: Time,
    /// Coordinate frame the data is associated with.
    pub frame_id: String,
}

impl Header {
    /// Header with the given stamp and no frame.
    #[must_use]
    pub fn stamped(stamp: Time) -> Self {
        Self {
            stamp,
            ..Default::default()
        }
    }
}

/// Messages that carry a `Header`.
pub trait HasHeader {
    /// The message header.
    fn header(&self) -> &Header;
}

/// Any payload plus a header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stamped<T> {
    /// Message header.
    pub header: Header,
    /// Payload.
    pub data: T,
}

impl<T> Stamped<T> {
    /// Wrap `data` with a header stamped at `stamp`.
    pub fn new(stamp: Time, data: T) -> Self {
        Self {
            header: Header::stamped(stamp),
            data,
        }
    }
}

impl<T> HasHeader for Stamped<T> {
    fn header(&self) -> &Header {
        &self.header
    }
}
