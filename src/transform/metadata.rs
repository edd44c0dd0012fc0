//! EXIF carry-over for resized images
//!
//! The `image` crate drops metadata on decode, so the raw TIFF block is read
//! from the source container up front and spliced back into the encoded
//! output: as an APP1 segment for JPEG and an `eXIf` chunk for PNG.

use std::io::Cursor;

use flate2::Crc;

use super::format::OutputFormat;

const EXIF_HEADER: &[u8] = b"Exif\0\0";
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
// signature (8) + IHDR length/type (8) + IHDR data (13) + CRC (4)
const PNG_IHDR_END: usize = 33;

/// Raw TIFF-structured EXIF block of a JPEG, PNG, TIFF, HEIF or WebP source
pub fn extract_exif(source: &[u8]) -> Option<Vec<u8>> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(source))
        .ok()?;
    Some(exif.buf().to_vec())
}

/// Insert `exif` into already-encoded image bytes
///
/// Output that cannot carry the block (WebP, an oversized JPEG segment, or
/// bytes not shaped like the expected container) is returned unchanged.
pub fn embed_exif(encoded: Vec<u8>, format: OutputFormat, exif: &[u8]) -> Vec<u8> {
    let embedded = match format {
        OutputFormat::Jpeg => embed_jpeg(&encoded, exif),
        OutputFormat::Png => embed_png(&encoded, exif),
        OutputFormat::WebP => None,
    };

    match embedded {
        Some(bytes) => bytes,
        None => {
            tracing::debug!(
                format = %format,
                exif_bytes = exif.len(),
                "EXIF block not embedded"
            );
            encoded
        }
    }
}

fn embed_jpeg(encoded: &[u8], exif: &[u8]) -> Option<Vec<u8>> {
    if encoded.len() < 4 || encoded[0..2] != [0xFF, 0xD8] {
        return None;
    }
    let segment_len = u16::try_from(2 + EXIF_HEADER.len() + exif.len()).ok()?;

    // Keep a JFIF APP0 segment first when the encoder wrote one
    let mut insert_at = 2;
    if encoded[2..4] == [0xFF, 0xE0] && encoded.len() >= 6 {
        let app0_len = u16::from_be_bytes([encoded[4], encoded[5]]) as usize;
        insert_at = (4 + app0_len).min(encoded.len());
    }

    let mut out = Vec::with_capacity(encoded.len() + segment_len as usize + 2);
    out.extend_from_slice(&encoded[..insert_at]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(EXIF_HEADER);
    out.extend_from_slice(exif);
    out.extend_from_slice(&encoded[insert_at..]);
    Some(out)
}

fn embed_png(encoded: &[u8], exif: &[u8]) -> Option<Vec<u8>> {
    if encoded.len() < PNG_IHDR_END
        || &encoded[..8] != PNG_SIGNATURE
        || &encoded[12..16] != b"IHDR"
    {
        return None;
    }
    let chunk_len = u32::try_from(exif.len()).ok()?;

    let mut crc = Crc::new();
    crc.update(b"eXIf");
    crc.update(exif);

    let mut out = Vec::with_capacity(encoded.len() + exif.len() + 12);
    out.extend_from_slice(&encoded[..PNG_IHDR_END]);
    out.extend_from_slice(&chunk_len.to_be_bytes());
    out.extend_from_slice(b"eXIf");
    out.extend_from_slice(exif);
    out.extend_from_slice(&crc.sum().to_be_bytes());
    out.extend_from_slice(&encoded[PNG_IHDR_END..]);
    Some(out)
}
