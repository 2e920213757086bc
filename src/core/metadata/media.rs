//! Media type detection from file signatures.
//!
//! References:
//! https://www.garykessler.net/library/file_sigs.html

use serde::{Deserialize, Serialize};

/// Number of header bytes needed to recognise every supported signature
pub const HEADER_LEN: usize = 261;

/// Broad kind of a media file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// Signature anchored at the start of the file
struct Signature {
    bytes: &'static [u8],
    kind: MediaKind,
}

const fn image(bytes: &'static [u8]) -> Signature {
    Signature {
        bytes,
        kind: MediaKind::Image,
    }
}

const fn video(bytes: &'static [u8]) -> Signature {
    Signature {
        bytes,
        kind: MediaKind::Video,
    }
}

const SIGNATURES: &[Signature] = &[
    // JPEG
    image(&[0xFF, 0xD8, 0xFF]),
    // PNG
    image(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
    // GIF87a / GIF89a
    image(b"GIF87a"),
    image(b"GIF89a"),
    // BMP
    image(b"BM"),
    // TIFF and the TIFF-based raw formats (CR2, NEF, DNG, ARW)
    image(&[0x49, 0x49, 0x2A, 0x00]),
    image(&[0x4D, 0x4D, 0x00, 0x2A]),
    // Olympus ORF, Panasonic RW2
    image(b"IIRO"),
    image(&[0x49, 0x49, 0x55, 0x00]),
    // Fujifilm RAF
    image(b"FUJIFILMCCD-RAW"),
    // Photoshop
    image(b"8BPS"),
    // Matroska / WebM
    video(&[0x1A, 0x45, 0xDF, 0xA3]),
    // Flash video
    video(b"FLV"),
    // MPEG program stream / MPEG video
    video(&[0x00, 0x00, 0x01, 0xBA]),
    video(&[0x00, 0x00, 0x01, 0xB3]),
    // ASF / WMV
    video(&[
        0x30, 0x26, 0xB2, 0x75, 0x8E, 0x66, 0xCF, 0x11, 0xA6, 0xD9, 0x00, 0xAA, 0x00, 0x62, 0xCE,
        0x6C,
    ]),
];

/// ISO base media file brands that carry still images
const IMAGE_BRANDS: &[&[u8; 4]] = &[
    b"heic", b"heix", b"hevc", b"hevx", b"mif1", b"msf1", b"avif",
];

/// Detect the media kind from the first bytes of a file.
///
/// Returns `None` for anything that is neither an image nor a video,
/// including headers too short to carry a signature.
pub fn sniff(header: &[u8]) -> Option<MediaKind> {
    if let Some(kind) = sniff_riff(header) {
        return Some(kind);
    }
    if let Some(kind) = sniff_iso_bmff(header) {
        return Some(kind);
    }

    SIGNATURES
        .iter()
        .find(|sig| header.starts_with(sig.bytes))
        .map(|sig| sig.kind)
}

/// RIFF containers: WebP images and AVI videos
fn sniff_riff(header: &[u8]) -> Option<MediaKind> {
    if header.len() < 12 || &header[0..4] != b"RIFF" {
        return None;
    }
    match &header[8..12] {
        b"WEBP" => Some(MediaKind::Image),
        b"AVI " => Some(MediaKind::Video),
        _ => None,
    }
}

/// ISO base media files (MP4, MOV, 3GP, HEIC, AVIF) and bare QuickTime atoms
fn sniff_iso_bmff(header: &[u8]) -> Option<MediaKind> {
    if header.len() < 12 {
        return None;
    }
    match &header[4..8] {
        b"ftyp" => {
            let brand = &header[8..12];
            if IMAGE_BRANDS.iter().any(|b| &b[..] == brand) {
                Some(MediaKind::Image)
            } else {
                Some(MediaKind::Video)
            }
        }
        b"moov" | b"mdat" | b"wide" | b"free" | b"pnot" => Some(MediaKind::Video),
        _ => None,
    }
}
