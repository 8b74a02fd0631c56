//! ID3v2 tag probe.
//!
//! An MP3 file may carry an ID3v2 metadata tag before the first frame.
//! The driver does not read tags; it only steps over one so the frame
//! pump starts at compressed data.

use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::error::Mp3Error;

const HEADER_LEN: usize = 10;
const MAGIC: &[u8] = b"ID3";

/// Position `reader` at the start of compressed MP3 data.
///
/// Always reads the first 10 bytes of the stream. If they carry the
/// ID3v2 magic, seeks past the tag and returns the total bytes skipped;
/// otherwise seeks back to the stream start and returns 0.
pub(crate) fn skip_tag<R: Read + Seek>(reader: &mut R) -> Result<u64, Mp3Error> {
    let mut header = [0u8; HEADER_LEN];
    reader.seek(SeekFrom::Start(0))?;
    reader.read_exact(&mut header)?;

    if &header[..MAGIC.len()] != MAGIC {
        reader.seek(SeekFrom::Start(0))?;
        return Ok(0);
    }

    // The tag size is four syncsafe bytes: bit 7 of each byte is masked
    // off and the remaining 28 bits concatenated big-endian. The header
    // itself is not included in the stored size.
    let size = u64::from(header[6] & 0x7F) << 21
        | u64::from(header[7] & 0x7F) << 14
        | u64::from(header[8] & 0x7F) << 7
        | u64::from(header[9] & 0x7F);
    let total = size + HEADER_LEN as u64;

    reader.seek(SeekFrom::Start(total))?;
    debug!("skipped {total}-byte ID3v2 tag");
    Ok(total)
}
