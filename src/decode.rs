//! Frame pump: the refill/resync/decode loop.
//!
//! Per-frame pipeline:
//! 1. Top up the compressed window when it runs low
//! 2. Locate the next sync word, dropping any garbage before it
//! 3. Hand the window to the codec, pulling more data on underflow
//! 4. Normalize the decoded frame to interleaved stereo

use std::io::Read;

use log::{debug, warn};

use crate::buffer::PcmBuffer;
use crate::codec::{CodecError, FrameCodec, FrameInfo, MAX_FRAME_BYTES, MAX_SAMPLES_PER_FRAME};
use crate::window::Window;

/// Refill threshold. With at least two worst-case frames buffered, a
/// located frame is never split across a refill boundary.
const MIN_BUFFERED_BYTES: usize = 2 * MAX_FRAME_BYTES;

/// Driver state behind the public reader.
#[derive(Debug)]
pub(crate) struct Decoder<R, C> {
    reader: R,
    codec: C,
    window: Window,
    pub pcm: PcmBuffer,
    pub sample_rate: u32,
    pub bitrate: u32,
    /// Set once the pump reports zero samples; later calls short-circuit.
    finished: bool,
}

impl<R: Read, C: FrameCodec> Decoder<R, C> {
    pub fn new(reader: R, codec: C) -> Self {
        Decoder {
            reader,
            codec,
            window: Window::new(),
            pcm: PcmBuffer::new(),
            sample_rate: 0,
            bitrate: 0,
            finished: false,
        }
    }

    /// Decode the next frame into the staging buffer.
    ///
    /// Returns the number of samples produced after normalization, or 0
    /// when the stream is exhausted or undecodable. Codec underflow is
    /// resolved internally by reading more data; callers never see it.
    pub fn decode_next_frame(&mut self) -> usize {
        if self.finished {
            return 0;
        }

        let mut force_refill = false;
        loop {
            let mut newly_read = None;
            if force_refill || self.window.bytes_remaining() < MIN_BUFFERED_BYTES {
                newly_read = Some(self.window.refill(&mut self.reader));
                force_refill = false;
            }

            let Some(offset) = self.codec.find_sync(self.window.remaining()) else {
                debug!("no sync word in buffered data, stream exhausted");
                self.finished = true;
                return 0;
            };
            if offset > self.window.bytes_remaining() {
                warn!("codec reported sync offset {offset} beyond buffered data");
                self.finished = true;
                return 0;
            }
            if offset > 0 {
                debug!("resync: skipped {offset} bytes of non-frame data");
                self.window.advance(offset);
            }

            match self
                .codec
                .decode_frame(self.window.remaining(), self.pcm.decode_target())
            {
                Ok(info) => {
                    if !self.apply_frame(&info) {
                        self.finished = true;
                        return 0;
                    }
                    return self.pcm.remaining();
                }
                Err(CodecError::Underflow) => {
                    // The window can no longer grow: the trailing frame
                    // is truncated and will never complete.
                    if self.window.is_full() || newly_read == Some(0) {
                        debug!("underflow with no more input, stream exhausted");
                        self.finished = true;
                        return 0;
                    }
                    force_refill = true;
                }
                Err(CodecError::Failed) => {
                    debug!("unrecoverable codec error, stopping decode");
                    self.finished = true;
                    return 0;
                }
            }
        }
    }

    /// Validate codec-reported frame metadata against buffer capacities,
    /// then record stream properties and normalize the new frame.
    fn apply_frame(&mut self, info: &FrameInfo) -> bool {
        if info.consumed > self.window.bytes_remaining() {
            warn!(
                "codec consumed {} bytes but only {} were buffered",
                info.consumed,
                self.window.bytes_remaining()
            );
            return false;
        }
        let valid = match info.channels {
            1 => info.samples <= MAX_SAMPLES_PER_FRAME / 2,
            2 => info.samples <= MAX_SAMPLES_PER_FRAME && info.samples % 2 == 0,
            _ => false,
        };
        if !valid {
            warn!(
                "codec reported invalid frame: {} samples, {} channels",
                info.samples, info.channels
            );
            return false;
        }

        self.window.advance(info.consumed);
        self.sample_rate = info.sample_rate;
        self.bitrate = info.bitrate;
        self.pcm.set_decoded(info.samples);
        if info.channels == 1 {
            // Output is always 2-channel interleaved
            self.pcm.expand_mono_to_stereo();
        }
        true
    }
}
