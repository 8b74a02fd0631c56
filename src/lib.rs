//! Streaming MP3-to-PCM decoding driver.
//!
//! Reads a compressed MP3 stream incrementally, keeps enough data
//! buffered to always locate the next frame boundary, hands frames to a
//! pluggable [`FrameCodec`], and serves the decoded audio through a
//! pull-based API. Callers consume arbitrary-sized chunks of interleaved
//! 16-bit PCM without knowing anything about MP3 framing; mono sources
//! are duplicated to stereo so the output layout is always two channels.
//!
//! The MP3 bitstream decoder itself (frame parsing, Huffman, synthesis)
//! is an external collaborator: anything implementing [`FrameCodec`]
//! plugs in behind the driver.
//!
//! # Example
//!
//! ```no_run
//! use mp3_rs::Mp3Reader;
//! # use mp3_rs::{CodecError, FrameCodec, FrameInfo};
//! # struct Codec;
//! # impl FrameCodec for Codec {
//! #     fn find_sync(&self, _: &[u8]) -> Option<usize> { None }
//! #     fn decode_frame(&mut self, _: &[u8], _: &mut [i16]) -> Result<FrameInfo, CodecError> {
//! #         Err(CodecError::Failed)
//! #     }
//! # }
//! # let codec = Codec;
//!
//! let mut reader = Mp3Reader::open("track.mp3", codec).unwrap();
//! println!("{} Hz, {} bps", reader.sample_rate(), reader.bitrate());
//!
//! let mut pcm = vec![0i16; 4096];
//! loop {
//!     let frames = reader.read_frames(&mut pcm);
//!     if frames == 0 {
//!         break;
//!     }
//!     // use pcm[..frames * 2]
//! }
//! ```

mod buffer;
mod codec;
mod decode;
pub mod error;
mod id3;
mod window;

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

pub use codec::{CodecError, FrameCodec, FrameInfo, MAX_FRAME_BYTES, MAX_SAMPLES_PER_FRAME};
pub use error::Mp3Error;

/// Interleaved samples per output frame. Output is always stereo.
const SAMPLES_PER_FRAME: usize = 2;

/// A reader that pumps an MP3 stream through a frame codec and serves
/// the decoded PCM in caller-sized chunks.
///
/// One output frame is one stereo sample pair. End of stream is a short
/// read, not an error: once [`read_frames`](Mp3Reader::read_frames)
/// returns fewer frames than requested, every later call returns 0 and
/// the reader stays valid for property queries.
#[derive(Debug)]
pub struct Mp3Reader<R: Read + Seek, C: FrameCodec> {
    decoder: decode::Decoder<R, C>,
    samples_delivered: u64,
}

impl<C: FrameCodec> Mp3Reader<BufReader<File>, C> {
    /// Open an MP3 file by path.
    pub fn open<P: AsRef<Path>>(path: P, codec: C) -> Result<Self, Mp3Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Mp3Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(BufReader::new(file), codec)
    }
}

impl<R: Read + Seek, C: FrameCodec> Mp3Reader<R, C> {
    /// Create a reader from any `Read + Seek` source.
    ///
    /// Skips a leading ID3v2 tag if present, then primes the pipeline by
    /// decoding the first frame, so stream properties are valid as soon
    /// as construction returns. Fails with [`Mp3Error::Unsupported`]
    /// when no decodable frame exists.
    pub fn new(mut reader: R, codec: C) -> Result<Self, Mp3Error> {
        id3::skip_tag(&mut reader)?;

        let mut decoder = decode::Decoder::new(reader, codec);
        if decoder.decode_next_frame() == 0 {
            return Err(Mp3Error::Unsupported);
        }

        Ok(Mp3Reader {
            decoder,
            samples_delivered: 0,
        })
    }

    /// Sample rate in Hz of the most recently decoded frame.
    pub fn sample_rate(&self) -> u32 {
        self.decoder.sample_rate
    }

    /// Bitrate in bits per second of the most recently decoded frame.
    /// May change between frames for variable-bitrate streams.
    pub fn bitrate(&self) -> u32 {
        self.decoder.bitrate
    }

    /// Total output frames (stereo sample pairs) delivered since the
    /// reader was created.
    pub fn frames_decoded(&self) -> u64 {
        self.samples_delivered / SAMPLES_PER_FRAME as u64
    }

    /// Fill `out` with decoded audio, returning the number of whole
    /// frames written.
    ///
    /// The request is `out.len() / 2` frames; an odd trailing slot is
    /// never written, so output is whole stereo pairs only. A return
    /// shorter than the request means the stream is exhausted or the
    /// codec gave up; repeated calls then return 0.
    pub fn read_frames(&mut self, out: &mut [i16]) -> usize {
        let frames_requested = out.len() / SAMPLES_PER_FRAME;
        if frames_requested == 0 {
            return 0;
        }

        let mut samples_to_read = frames_requested * SAMPLES_PER_FRAME;
        let mut samples_read = 0;

        loop {
            let n = self
                .decoder
                .pcm
                .drain_into(&mut out[samples_read..samples_read + samples_to_read]);
            samples_read += n;
            samples_to_read -= n;
            self.samples_delivered += n as u64;

            // Staging drained: decode the next frame now, even when the
            // request is already satisfied, so stream properties always
            // describe the audio a caller will receive next.
            if self.decoder.pcm.is_empty() && self.decoder.decode_next_frame() == 0 {
                break;
            }
            if samples_to_read == 0 {
                break;
            }
        }

        samples_read / SAMPLES_PER_FRAME
    }

    /// Returns an iterator over individual interleaved samples.
    ///
    /// Yields the same sample stream as
    /// [`read_frames`](Mp3Reader::read_frames) and shares its delivery
    /// accounting.
    pub fn samples(&mut self) -> Samples<'_, R, C> {
        Samples { reader: self }
    }
}

/// Iterator over decoded interleaved stereo samples.
///
/// Ends when the stream is exhausted or the codec reports an
/// unrecoverable error; steady-state failures are not surfaced.
pub struct Samples<'a, R: Read + Seek, C: FrameCodec> {
    reader: &'a mut Mp3Reader<R, C>,
}

impl<R: Read + Seek, C: FrameCodec> Iterator for Samples<'_, R, C> {
    type Item = i16;

    fn next(&mut self) -> Option<i16> {
        if self.reader.decoder.pcm.is_empty() && self.reader.decoder.decode_next_frame() == 0 {
            return None;
        }
        let s = self.reader.decoder.pcm.pop()?;
        self.reader.samples_delivered += 1;
        Some(s)
    }
}
