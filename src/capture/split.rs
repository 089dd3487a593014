//! Incremental MJPEG byte stream splitting
//!
//! An MJPEG stream is a plain concatenation of JPEG images. Each image is
//! delimited by the SOI (`FF D8`) and EOI (`FF D9`) markers; the splitter
//! scans for those across arbitrary read boundaries.

use bytes::{Buf, Bytes, BytesMut};

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Splits a growing byte stream into complete JPEG frames
///
/// Bytes before the first SOI marker are discarded, so the splitter can be
/// attached mid-stream. Incomplete frames stay buffered until the closing
/// marker arrives.
#[derive(Debug, Default)]
pub struct JpegSplitter {
    buf: BytesMut,
}

impl JpegSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly read bytes
    pub fn push(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Extract the next complete frame, if one is buffered
    ///
    /// Call repeatedly after each `push` until it returns `None`.
    pub fn next_frame(&mut self) -> Option<Bytes> {
        match find_marker(&self.buf, &SOI, 0) {
            Some(start) => {
                if start > 0 {
                    self.buf.advance(start);
                }
            }
            None => {
                // Nothing resembling a frame start; drop the garbage but keep
                // the last byte in case it is the first half of a split marker.
                let drop = self.buf.len().saturating_sub(1);
                self.buf.advance(drop);
                return None;
            }
        }

        let end = find_marker(&self.buf, &EOI, 2)?;
        Some(self.buf.split_to(end + 2).freeze())
    }

    /// Bytes buffered waiting for a complete frame
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}

fn find_marker(haystack: &[u8], marker: &[u8; 2], from: usize) -> Option<usize> {
    if haystack.len() < from + marker.len() {
        return None;
    }
    haystack[from..]
        .windows(marker.len())
        .position(|w| w == marker)
        .map(|i| i + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![0xFF, 0xD8];
        frame.extend_from_slice(payload);
        frame.extend_from_slice(&[0xFF, 0xD9]);
        frame
    }

    #[test]
    fn test_single_frame() {
        let mut splitter = JpegSplitter::new();
        splitter.push(&jpeg(b"payload"));

        let frame = splitter.next_frame().unwrap();
        assert_eq!(&frame[..2], &SOI);
        assert_eq!(&frame[frame.len() - 2..], &EOI);
        assert!(splitter.next_frame().is_none());
        assert_eq!(splitter.pending(), 0);
    }

    #[test]
    fn test_frame_split_across_reads() {
        let full = jpeg(b"split-me");
        let (a, b) = full.split_at(5);

        let mut splitter = JpegSplitter::new();
        splitter.push(a);
        assert!(splitter.next_frame().is_none());

        splitter.push(b);
        let frame = splitter.next_frame().unwrap();
        assert_eq!(&frame[..], &full[..]);
    }

    #[test]
    fn test_two_frames_in_one_read() {
        let mut data = jpeg(b"one");
        data.extend_from_slice(&jpeg(b"two"));

        let mut splitter = JpegSplitter::new();
        splitter.push(&data);

        let first = splitter.next_frame().unwrap();
        let second = splitter.next_frame().unwrap();
        assert_eq!(&first[..], &jpeg(b"one")[..]);
        assert_eq!(&second[..], &jpeg(b"two")[..]);
        assert!(splitter.next_frame().is_none());
    }

    #[test]
    fn test_garbage_before_frame_is_dropped() {
        let mut data = b"noise noise".to_vec();
        data.extend_from_slice(&jpeg(b"clean"));

        let mut splitter = JpegSplitter::new();
        splitter.push(&data);

        let frame = splitter.next_frame().unwrap();
        assert_eq!(&frame[..], &jpeg(b"clean")[..]);
    }

    #[test]
    fn test_pure_garbage_is_bounded() {
        let mut splitter = JpegSplitter::new();
        splitter.push(&[0u8; 4096]);

        assert!(splitter.next_frame().is_none());
        // At most one byte is retained while waiting for a marker.
        assert!(splitter.pending() <= 1);
    }

    #[test]
    fn test_soi_marker_split_across_reads() {
        let full = jpeg(b"boundary");

        let mut splitter = JpegSplitter::new();
        splitter.push(b"junk\xFF");
        assert!(splitter.next_frame().is_none());

        // The retained 0xFF pairs with the 0xD8 arriving in the next read.
        splitter.push(&full[1..]);
        let frame = splitter.next_frame().unwrap();
        assert_eq!(&frame[..], &full[..]);
    }
}
