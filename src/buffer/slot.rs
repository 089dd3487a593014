//! Frame buffer implementation
//!
//! A `tokio::sync::watch` channel is the slot: it stores exactly one value,
//! replaces it on every publish, and wakes all waiters. Waiters re-check the
//! current value before sleeping, so a publish between "check" and "wait"
//! cannot be lost.

use bytes::Bytes;
use tokio::sync::watch;

use super::frame::Frame;

/// Single-slot, last-write-wins frame cell with broadcast wakeup
///
/// One writer (the frame producer) and any number of concurrent readers
/// (stream sessions). The frame and its version are replaced as one unit; a
/// reader can never observe a version paired with a different frame. Only
/// `publish` and `wait_for_next` touch the slot; the underlying lock is not
/// exposed.
pub struct FrameBuffer {
    tx: watch::Sender<Frame>,
}

impl FrameBuffer {
    /// Create an empty buffer (version 0, no frame)
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Frame::empty());
        Self { tx }
    }

    /// Publish a new frame, waking every waiting session
    ///
    /// Never blocks and never fails; if nobody read the previous frame it is
    /// silently superseded. Returns the version assigned to this frame.
    pub fn publish(&self, data: Bytes) -> u64 {
        let mut version = 0;
        self.tx.send_modify(|slot| {
            slot.version += 1;
            slot.data = data;
            version = slot.version;
        });
        version
    }

    /// Wait until a frame newer than `last_seen` is available and return it
    ///
    /// Suspends the calling session until the stored version exceeds
    /// `last_seen`. If several frames were published in the meantime, only the
    /// newest is returned; intermediate versions are skipped. Passing 0 waits
    /// for the first frame ever published.
    pub async fn wait_for_next(&self, last_seen: u64) -> Frame {
        let mut rx = self.tx.subscribe();
        let frame = match rx.wait_for(|frame| frame.version > last_seen).await {
            Ok(frame) => frame.clone(),
            // The sender lives inside `self`, which the caller borrows for the
            // duration of the wait, so the channel cannot close under us.
            Err(_) => unreachable!("frame buffer sender dropped while borrowed"),
        };
        frame
    }

    /// Snapshot of the most recent frame, if any was published
    pub fn latest(&self) -> Option<Frame> {
        let frame = self.tx.borrow();
        if frame.version == 0 {
            None
        } else {
            Some(frame.clone())
        }
    }

    /// Current version counter (0 until the first publish)
    pub fn version(&self) -> u64 {
        self.tx.borrow().version
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
