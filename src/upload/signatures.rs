//! Magic-number table for accepted upload formats.

/// Offset and candidate signatures for one file extension.
#[derive(Debug, Clone, Copy)]
pub struct SignatureEntry {
    /// Tag that must open the stream when the signature sits inside a
    /// container (WebP inside RIFF). Empty for most formats.
    pub container: &'static [u8],
    /// Byte position where the signature check begins.
    pub offset: u64,
    /// Candidate magic numbers; matching any one of them is enough.
    pub signatures: &'static [&'static [u8]],
}

impl SignatureEntry {
    /// Length of the longest candidate signature.
    pub fn max_len(&self) -> usize {
        self.signatures.iter().map(|s| s.len()).max().unwrap_or(0)
    }

    /// True if the stream opened with the container tag, or none is required.
    pub fn matches_container(&self, prefix: &[u8]) -> bool {
        prefix.starts_with(self.container)
    }

    /// True if any candidate is fully present in `header` and equals its prefix.
    ///
    /// Candidates longer than `header` never match, so a truncated stream
    /// yields `false` rather than a partial comparison.
    pub fn matches(&self, header: &[u8]) -> bool {
        self.signatures
            .iter()
            .any(|sig| !sig.is_empty() && header.starts_with(sig))
    }
}

const JPEG: SignatureEntry = SignatureEntry {
    container: &[],
    offset: 0,
    signatures: &[
        &[0xFF, 0xD8, 0xFF, 0xE0],
        &[0xFF, 0xD8, 0xFF, 0xE1],
        &[0xFF, 0xD8, 0xFF, 0xE2],
        &[0xFF, 0xD8, 0xFF, 0xE3],
        &[0xFF, 0xD8, 0xFF, 0xE8],
        &[0xFF, 0xD8, 0xFF, 0xDB],
        &[0xFF, 0xD8, 0xFF, 0xEE],
    ],
};

// JPEG 2000: signature box, or a bare codestream (SOC + SIZ markers).
const JPEG_2000: SignatureEntry = SignatureEntry {
    container: &[],
    offset: 0,
    signatures: &[
        &[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20, 0x0D, 0x0A, 0x87, 0x0A],
        &[0xFF, 0x4F, 0xFF, 0x51],
    ],
};

const TIFF: SignatureEntry = SignatureEntry {
    container: &[],
    offset: 0,
    signatures: &[
        &[0x49, 0x49, 0x2A, 0x00],
        &[0x4D, 0x4D, 0x00, 0x2A],
        // BigTIFF
        &[0x49, 0x49, 0x2B, 0x00],
        &[0x4D, 0x4D, 0x00, 0x2B],
    ],
};

/// Every supported extension, keyed by its lowercase name.
///
/// ISO base media formats (heic, mp4, mov) are checked at offset 4, after the
/// 32-bit box size that precedes the `ftyp` marker. WebP must open with a
/// `RIFF` tag and carries its signature at offset 8, after the chunk size.
pub static SIGNATURES: &[(&str, SignatureEntry)] = &[
    (
        "gif",
        SignatureEntry {
            container: &[],
            offset: 0,
            signatures: &[b"GIF87a", b"GIF89a"],
        },
    ),
    (
        "png",
        SignatureEntry {
            container: &[],
            offset: 0,
            signatures: &[&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]],
        },
    ),
    ("jpg", JPEG),
    ("jpeg", JPEG),
    ("jp2", JPEG_2000),
    ("jpf", JPEG_2000),
    ("jpx", JPEG_2000),
    ("jpm", JPEG_2000),
    (
        "heic",
        SignatureEntry {
            container: &[],
            offset: 4,
            signatures: &[b"ftypheic", b"ftypheix", b"ftyphevc", b"ftypmif1", b"ftypmsf1"],
        },
    ),
    ("tif", TIFF),
    ("tiff", TIFF),
    (
        "webp",
        SignatureEntry {
            container: b"RIFF",
            offset: 8,
            signatures: &[b"WEBPVP8 ", b"WEBPVP8L", b"WEBPVP8X"],
        },
    ),
    (
        "mp4",
        SignatureEntry {
            container: &[],
            offset: 4,
            signatures: &[b"ftypmp41", b"ftypmp42", b"ftypM4V ", b"ftypavc1", b"ftypdash"],
        },
    ),
    (
        "mp4_iso",
        SignatureEntry {
            container: &[],
            offset: 4,
            signatures: &[b"ftypisom", b"ftypiso2"],
        },
    ),
    (
        "mov",
        SignatureEntry {
            container: &[],
            offset: 4,
            signatures: &[b"ftypqt  "],
        },
    ),
];

/// Find the table row for an extension (exact, case-sensitive key).
pub fn lookup(extension: &str) -> Option<&'static SignatureEntry> {
    SIGNATURES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, entry)| entry)
}

/// All extensions present in the table, in table order.
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    SIGNATURES.iter().map(|(ext, _)| *ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_entry_has_a_signature() {
        for (ext, entry) in SIGNATURES {
            assert!(!entry.signatures.is_empty(), "{} has no signatures", ext);
            for sig in entry.signatures {
                assert!(!sig.is_empty(), "{} has an empty signature", ext);
            }
        }
    }

    #[test]
    fn test_extensions_are_unique_and_lowercase() {
        let mut seen = std::collections::HashSet::new();
        for ext in supported_extensions() {
            assert_eq!(ext, ext.to_ascii_lowercase());
            assert!(seen.insert(ext), "duplicate extension {}", ext);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("mp4").unwrap().offset, 4);
        assert_eq!(lookup("png").unwrap().max_len(), 8);
        assert_eq!(lookup("jp2").unwrap().max_len(), 12);
        assert!(lookup("bmp").is_none());
        assert!(lookup("PNG").is_none());
    }

    #[test]
    fn test_webp_requires_riff() {
        let webp = lookup("webp").unwrap();
        assert!(webp.matches_container(b"RIFF"));
        assert!(!webp.matches_container(b"XXXX"));
        assert!(!webp.matches_container(b"RI"));
        assert!(lookup("png").unwrap().matches_container(b""));
    }

    #[test]
    fn test_matches_requires_full_candidate() {
        let png = lookup("png").unwrap();
        assert!(!png.matches(&[0x89, 0x50, 0x4E]));
        assert!(png.matches(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0xFF]));

        // The short codestream marker still matches when the long box signature cannot.
        let jp2 = lookup("jp2").unwrap();
        assert!(jp2.matches(&[0xFF, 0x4F, 0xFF, 0x51]));
        assert!(!jp2.matches(&[0x00, 0x00, 0x00, 0x0C]));
    }
}
