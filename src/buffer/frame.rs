//! Frame type shared between the producer and sessions

use bytes::Bytes;

/// One encoded JPEG frame plus its publication version
///
/// Cheap to clone: the payload is reference counted, so every session holding
/// a frame shares the same allocation.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Encoded JPEG bytes
    pub data: Bytes,
    /// Publication version; 0 means "nothing published yet" and is never
    /// handed to a session
    pub version: u64,
}

impl Frame {
    /// Placeholder for an empty buffer slot
    pub(crate) fn empty() -> Self {
        Self {
            data: Bytes::new(),
            version: 0,
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the frame carries no payload
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
