use anyhow::{anyhow, Result};

use super::FrameSource;
use crate::frame::Frame;

/// Stride sampler over any frame source.
///
/// Frames are counted from 1; the sampler yields `(frame_index, frame)`
/// for indices divisible by the stride, so an N-frame source yields
/// exactly `floor(N / stride)` samples. A mid-stream read error is logged
/// and treated as end-of-stream: frames already yielded stay valid.
pub struct FrameSampler<'a> {
    source: &'a mut dyn FrameSource,
    stride: u64,
    index: u64,
    done: bool,
}

impl<'a> FrameSampler<'a> {
    pub fn new(source: &'a mut dyn FrameSource, stride: u32) -> Result<Self> {
        if stride == 0 {
            return Err(anyhow!("frame stride must be >= 1"));
        }
        Ok(Self {
            source,
            stride: stride as u64,
            index: 0,
            done: false,
        })
    }

    /// Next sampled frame, or `None` when the source is exhausted.
    pub fn next_sample(&mut self) -> Option<(u64, Frame)> {
        while !self.done {
            match self.source.next_frame() {
                Ok(Some(frame)) => {
                    self.index += 1;
                    if self.index % self.stride == 0 {
                        return Some((self.index, frame));
                    }
                }
                Ok(None) => {
                    self.done = true;
                }
                Err(e) => {
                    // Partial results are meaningful; stop instead of
                    // propagating a mid-stream read failure.
                    log::warn!("frame read failed after {} frames: {:#}", self.index, e);
                    self.done = true;
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountedSource {
        remaining: u32,
        fail_after: Option<u32>,
        produced: u32,
    }

    impl CountedSource {
        fn new(frames: u32) -> Self {
            Self {
                remaining: frames,
                fail_after: None,
                produced: 0,
            }
        }
    }

    impl FrameSource for CountedSource {
        fn next_frame(&mut self) -> Result<Option<Frame>> {
            if let Some(limit) = self.fail_after {
                if self.produced >= limit {
                    return Err(anyhow!("simulated read failure"));
                }
            }
            if self.remaining == 0 {
                return Ok(None);
            }
            self.remaining -= 1;
            self.produced += 1;
            Ok(Some(Frame::filled(8, 8, [0, 0, 0])))
        }
    }

    fn sample_count(frames: u32, stride: u32) -> usize {
        let mut source = CountedSource::new(frames);
        let mut sampler = FrameSampler::new(&mut source, stride).unwrap();
        let mut count = 0;
        while sampler.next_sample().is_some() {
            count += 1;
        }
        count
    }

    #[test]
    fn stride_divides_evenly() {
        assert_eq!(sample_count(15, 5), 3);
    }

    #[test]
    fn stride_with_remainder_floors() {
        assert_eq!(sample_count(14, 5), 2);
        assert_eq!(sample_count(4, 5), 0);
    }

    #[test]
    fn stride_one_takes_every_frame() {
        assert_eq!(sample_count(7, 1), 7);
    }

    #[test]
    fn zero_stride_is_rejected() {
        let mut source = CountedSource::new(1);
        assert!(FrameSampler::new(&mut source, 0).is_err());
    }

    #[test]
    fn indices_are_multiples_of_stride() {
        let mut source = CountedSource::new(10);
        let mut sampler = FrameSampler::new(&mut source, 3).unwrap();
        let mut indices = Vec::new();
        while let Some((index, _)) = sampler.next_sample() {
            indices.push(index);
        }
        assert_eq!(indices, vec![3, 6, 9]);
    }

    #[test]
    fn read_failure_acts_as_end_of_stream() {
        let mut source = CountedSource::new(20);
        source.fail_after = Some(7);
        let mut sampler = FrameSampler::new(&mut source, 2).unwrap();
        let mut count = 0;
        while sampler.next_sample().is_some() {
            count += 1;
        }
        // 7 frames decoded before the failure, stride 2.
        assert_eq!(count, 3);
    }
}
