//! DPI/resolution metadata handling.
//!
//! The imaging library decodes pixels but does not surface print-density
//! metadata, so it is read from and re-applied to the encoded bytes
//! directly: the JFIF APP0 density fields for JPEG, the `pHYs` chunk for
//! PNG. Density is copied across a resize, never recalculated.

use flate2::Crc;
use std::fmt;

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// JFIF APP0 density fields. `unit`: 0 = pixel aspect ratio, 1 = dots per
/// inch, 2 = dots per centimeter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JfifDensity {
    pub unit: u8,
    pub x: u16,
    pub y: u16,
}

/// PNG `pHYs` fields. `unit`: 0 = unspecified aspect ratio, 1 = pixels per
/// metre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngPhys {
    pub x: u32,
    pub y: u32,
    pub unit: u8,
}

/// Resolution metadata of one source file, format-specific because it is
/// only ever re-applied to an output of the same format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Density {
    Jfif(JfifDensity),
    Phys(PngPhys),
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Density::Jfif(d) => match d.unit {
                1 => write!(f, "{}x{} dpi", d.x, d.y),
                2 => write!(f, "{}x{} dpcm", d.x, d.y),
                _ => write!(f, "aspect {}:{}", d.x, d.y),
            },
            Density::Phys(p) => match p.unit {
                1 => write!(f, "{}x{} px/m", p.x, p.y),
                _ => write!(f, "aspect {}:{}", p.x, p.y),
            },
        }
    }
}

/// Read resolution metadata from encoded image bytes, dispatching on the
/// magic bytes. Absent or unrecognized metadata is `None`.
pub fn read_density(bytes: &[u8]) -> Option<Density> {
    if is_jpeg(bytes) {
        read_jfif_density(bytes).map(Density::Jfif)
    } else if is_png(bytes) {
        read_png_phys(bytes).map(Density::Phys)
    } else {
        None
    }
}

/// Patch resolution metadata into encoded image bytes of the same format.
/// Returns false when there was nothing to patch (wrong format, or a JPEG
/// without a JFIF APP0 segment).
pub fn apply_density(bytes: &mut Vec<u8>, density: Density) -> bool {
    match density {
        Density::Jfif(d) if is_jpeg(bytes) => patch_jfif_density(bytes, d),
        Density::Phys(p) if is_png(bytes) => patch_png_phys(bytes, p),
        _ => false,
    }
}

fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xD8
}

fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&PNG_SIGNATURE)
}

/// Walk the marker segments before SOS and return the offset of the JFIF
/// units byte inside the APP0 payload.
fn find_jfif_units_offset(bytes: &[u8]) -> Option<usize> {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        // SOS starts entropy-coded data; density lives before it.
        if marker == 0xDA {
            return None;
        }
        let seg_len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        if seg_len < 2 || pos + 2 + seg_len > bytes.len() {
            return None;
        }
        // APP0 payload: "JFIF\0", version (2), units (1), Xdensity (2),
        // Ydensity (2), thumbnail dims (2).
        if marker == 0xE0 && seg_len >= 14 && &bytes[pos + 4..pos + 9] == b"JFIF\0" {
            return Some(pos + 11);
        }
        pos += 2 + seg_len;
    }
    None
}

fn read_jfif_density(bytes: &[u8]) -> Option<JfifDensity> {
    let units = find_jfif_units_offset(bytes)?;
    Some(JfifDensity {
        unit: bytes[units],
        x: u16::from_be_bytes([bytes[units + 1], bytes[units + 2]]),
        y: u16::from_be_bytes([bytes[units + 3], bytes[units + 4]]),
    })
}

fn patch_jfif_density(bytes: &mut [u8], density: JfifDensity) -> bool {
    let units = match find_jfif_units_offset(bytes) {
        Some(offset) => offset,
        None => return false,
    };
    bytes[units] = density.unit;
    bytes[units + 1..units + 3].copy_from_slice(&density.x.to_be_bytes());
    bytes[units + 3..units + 5].copy_from_slice(&density.y.to_be_bytes());
    true
}

/// Find a chunk by type, returning (chunk offset, data length). Stops at
/// IEND.
fn find_png_chunk(bytes: &[u8], chunk_type: &[u8; 4]) -> Option<(usize, usize)> {
    let mut pos = PNG_SIGNATURE.len();
    while pos + 8 <= bytes.len() {
        let len = u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]])
            as usize;
        let ctype = &bytes[pos + 4..pos + 8];
        if pos + 12 + len > bytes.len() {
            return None;
        }
        if ctype == chunk_type {
            return Some((pos, len));
        }
        if ctype == b"IEND" {
            return None;
        }
        pos += 12 + len;
    }
    None
}

fn read_png_phys(bytes: &[u8]) -> Option<PngPhys> {
    let (pos, len) = find_png_chunk(bytes, b"pHYs")?;
    if len != 9 {
        return None;
    }
    let data = &bytes[pos + 8..pos + 17];
    Some(PngPhys {
        x: u32::from_be_bytes([data[0], data[1], data[2], data[3]]),
        y: u32::from_be_bytes([data[4], data[5], data[6], data[7]]),
        unit: data[8],
    })
}

fn png_chunk_crc(chunk_type: &[u8], data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(chunk_type);
    crc.update(data);
    crc.sum()
}

fn phys_chunk_data(phys: PngPhys) -> [u8; 9] {
    let mut data = [0u8; 9];
    data[0..4].copy_from_slice(&phys.x.to_be_bytes());
    data[4..8].copy_from_slice(&phys.y.to_be_bytes());
    data[8] = phys.unit;
    data
}

/// Overwrite an existing `pHYs` chunk, or insert one right after `IHDR`
/// when the encoder did not emit any.
fn patch_png_phys(bytes: &mut Vec<u8>, phys: PngPhys) -> bool {
    let data = phys_chunk_data(phys);
    let crc = png_chunk_crc(b"pHYs", &data);

    if let Some((pos, 9)) = find_png_chunk(bytes, b"pHYs") {
        bytes[pos + 8..pos + 17].copy_from_slice(&data);
        bytes[pos + 17..pos + 21].copy_from_slice(&crc.to_be_bytes());
        return true;
    }

    let (ihdr_pos, ihdr_len) = match find_png_chunk(bytes, b"IHDR") {
        Some(found) => found,
        None => return false,
    };
    let insert_at = ihdr_pos + 12 + ihdr_len;

    let mut chunk = Vec::with_capacity(21);
    chunk.extend_from_slice(&9u32.to_be_bytes());
    chunk.extend_from_slice(b"pHYs");
    chunk.extend_from_slice(&data);
    chunk.extend_from_slice(&crc.to_be_bytes());

    drop(bytes.splice(insert_at..insert_at, chunk));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SOI + APP0 JFIF with the given density fields + EOI.
    fn jfif_bytes(unit: u8, x: u16, y: u16) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        bytes.extend_from_slice(b"JFIF\0");
        bytes.extend_from_slice(&[1, 2]);
        bytes.push(unit);
        bytes.extend_from_slice(&x.to_be_bytes());
        bytes.extend_from_slice(&y.to_be_bytes());
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    fn png_bytes(with_phys: Option<PngPhys>) -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();

        let ihdr_data = [0u8; 13];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&ihdr_data);
        bytes.extend_from_slice(&png_chunk_crc(b"IHDR", &ihdr_data).to_be_bytes());

        if let Some(phys) = with_phys {
            let data = phys_chunk_data(phys);
            bytes.extend_from_slice(&9u32.to_be_bytes());
            bytes.extend_from_slice(b"pHYs");
            bytes.extend_from_slice(&data);
            bytes.extend_from_slice(&png_chunk_crc(b"pHYs", &data).to_be_bytes());
        }

        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(b"IDAT");
        bytes.extend_from_slice(&png_chunk_crc(b"IDAT", &[]).to_be_bytes());

        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(b"IEND");
        bytes.extend_from_slice(&png_chunk_crc(b"IEND", &[]).to_be_bytes());

        bytes
    }

    #[test]
    fn test_read_jfif_density() {
        let bytes = jfif_bytes(1, 300, 300);
        assert_eq!(
            read_density(&bytes),
            Some(Density::Jfif(JfifDensity {
                unit: 1,
                x: 300,
                y: 300
            }))
        );
    }

    #[test]
    fn test_patch_jfif_density() {
        // Encoder default: 1:1 pixel aspect ratio.
        let mut bytes = jfif_bytes(0, 1, 1);
        let source = JfifDensity {
            unit: 1,
            x: 300,
            y: 150,
        };
        assert!(apply_density(&mut bytes, Density::Jfif(source)));
        assert_eq!(read_density(&bytes), Some(Density::Jfif(source)));
    }

    #[test]
    fn test_jpeg_without_jfif_app0() {
        // SOI followed by an APP1 segment only.
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1, 0x00, 0x08];
        bytes.extend_from_slice(b"Exif\0\0");
        bytes.extend_from_slice(&[0xFF, 0xD9]);

        assert_eq!(read_density(&bytes), None);
        let mut copy = bytes.clone();
        assert!(!apply_density(
            &mut copy,
            Density::Jfif(JfifDensity {
                unit: 1,
                x: 72,
                y: 72
            })
        ));
        assert_eq!(copy, bytes);
    }

    #[test]
    fn test_read_png_phys() {
        let phys = PngPhys {
            x: 11811,
            y: 11811,
            unit: 1,
        };
        let bytes = png_bytes(Some(phys));
        assert_eq!(read_density(&bytes), Some(Density::Phys(phys)));
    }

    #[test]
    fn test_png_without_phys_reads_none() {
        assert_eq!(read_density(&png_bytes(None)), None);
    }

    #[test]
    fn test_patch_png_inserts_phys_after_ihdr() {
        let mut bytes = png_bytes(None);
        let phys = PngPhys {
            x: 2835,
            y: 2835,
            unit: 1,
        };
        assert!(apply_density(&mut bytes, Density::Phys(phys)));
        assert_eq!(read_density(&bytes), Some(Density::Phys(phys)));

        // Inserted directly after IHDR, before IDAT.
        let (phys_pos, _) = find_png_chunk(&bytes, b"pHYs").unwrap();
        let (idat_pos, _) = find_png_chunk(&bytes, b"IDAT").unwrap();
        assert!(phys_pos < idat_pos);
    }

    #[test]
    fn test_patch_png_overwrites_existing_phys() {
        let mut bytes = png_bytes(Some(PngPhys {
            x: 1,
            y: 1,
            unit: 0,
        }));
        let len_before = bytes.len();

        let phys = PngPhys {
            x: 3780,
            y: 1890,
            unit: 1,
        };
        assert!(apply_density(&mut bytes, Density::Phys(phys)));
        assert_eq!(bytes.len(), len_before);
        assert_eq!(read_density(&bytes), Some(Density::Phys(phys)));
    }

    #[test]
    fn test_png_chunk_crc_known_value() {
        // CRC of an empty IEND chunk is a well-known constant.
        assert_eq!(png_chunk_crc(b"IEND", &[]), 0xAE42_6082);
    }

    #[test]
    fn test_garbage_bytes_are_handled() {
        assert_eq!(read_density(b"not an image"), None);
        assert_eq!(read_density(&[]), None);
        assert_eq!(read_density(&[0xFF, 0xD8]), None);
        assert_eq!(read_density(&PNG_SIGNATURE), None);

        let mut truncated = jfif_bytes(1, 300, 300);
        truncated.truncate(6);
        assert_eq!(read_density(&truncated), None);
    }

    #[test]
    fn test_density_display() {
        let dpi = Density::Jfif(JfifDensity {
            unit: 1,
            x: 300,
            y: 300,
        });
        assert_eq!(dpi.to_string(), "300x300 dpi");

        let metre = Density::Phys(PngPhys {
            x: 11811,
            y: 11811,
            unit: 1,
        });
        assert_eq!(metre.to_string(), "11811x11811 px/m");
    }
}
