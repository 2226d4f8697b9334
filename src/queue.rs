//! FIFO holding area for frames awaiting the decode/encode transform.

use std::collections::VecDeque;

use crate::{Error, Frame, Result};

/// Ordered queue of frames owned by a session.
///
/// Frames enter at the back and leave from the front, so the first frame
/// pushed is the first one transformed.
#[derive(Debug, Default)]
pub struct FrameQueue {
    frames: VecDeque<Frame>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an encoded frame.
    ///
    /// # Errors
    ///
    /// Returns `ExpectedEncodedFrame` for raw frames; the queue is unchanged.
    pub fn push(&mut self, frame: Frame) -> Result<()> {
        if !frame.is_encoded() {
            return Err(Error::ExpectedEncodedFrame);
        }
        self.frames.push_back(frame);
        Ok(())
    }

    /// Remove the oldest frame.
    ///
    /// # Errors
    ///
    /// Returns `QueueEmpty` if nothing is queued.
    pub fn pop(&mut self) -> Result<Frame> {
        self.frames.pop_front().ok_or(Error::QueueEmpty)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every queued frame, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.frames.len();
        self.frames.clear();
        n
    }

    /// Bypass the encoded-only check.
    #[cfg(test)]
    pub(crate) fn push_unchecked(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turnx_codec::{Geometry, Planes};

    #[test]
    fn test_fifo_order() {
        let mut queue = FrameQueue::new();
        queue.push(Frame::encoded(vec![1])).unwrap();
        queue.push(Frame::encoded(vec![2])).unwrap();
        queue.push(Frame::encoded(vec![3])).unwrap();
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.pop().unwrap().as_encoded(), Some(&[1][..]));
        assert_eq!(queue.pop().unwrap().as_encoded(), Some(&[2][..]));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_push_raw_is_rejected() {
        let mut queue = FrameQueue::new();
        queue.push(Frame::encoded(vec![1])).unwrap();

        let err = queue
            .push(Frame::raw(Planes::zeroed(Geometry::new(2, 2))))
            .unwrap_err();
        assert!(matches!(err, Error::ExpectedEncodedFrame));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_pop_empty() {
        let mut queue = FrameQueue::new();
        assert!(matches!(queue.pop(), Err(Error::QueueEmpty)));
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut queue = FrameQueue::new();
        queue.push(Frame::encoded(vec![1])).unwrap();
        queue.push(Frame::encoded(vec![2])).unwrap();
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }
}
