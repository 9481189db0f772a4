//! Stream verification against the signature table.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::config::schema::UploadConfig;
use crate::observability::metrics;
use crate::upload::signatures::{lookup, SignatureEntry};
use crate::upload::types::{SignatureError, SignatureResult};

/// Checks that an uploaded stream starts with a magic number for its claimed extension.
///
/// Stateless apart from its policy, so one instance can serve every request
/// concurrently; each call only moves the position of the stream it is given.
#[derive(Debug, Clone)]
pub struct Verifier {
    case_insensitive: bool,
    allowed_extensions: Vec<String>,
}

impl Default for Verifier {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            allowed_extensions: Vec::new(),
        }
    }
}

impl Verifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a verifier from the `[uploads]` config section.
    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            case_insensitive: config.case_insensitive,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Require the filename suffix and extension to match byte-for-byte.
    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    /// Validate `stream` as a file of type `extension`.
    ///
    /// Returns `Ok(false)` when no candidate matches, including when the
    /// stream ends before a full signature could be read.
    pub fn validate<R: Read + Seek>(
        &self,
        filename: &str,
        extension: &str,
        stream: &mut R,
    ) -> SignatureResult<bool> {
        let key = self.check_arguments(filename, extension)?;
        let entry = self.entry_for(&key)?;

        let valid = if entry.container.is_empty() {
            let header = read_header(stream, entry.offset, entry.max_len())?;
            entry.matches(&header)
        } else {
            let prefix = read_header(stream, 0, entry.container.len())?;
            let header = read_header(stream, entry.offset, entry.max_len())?;
            entry.matches_container(&prefix) && entry.matches(&header)
        };

        metrics::record_validation(&key, valid);
        if valid {
            tracing::debug!(filename, extension = %key, "Upload signature verified");
        } else {
            tracing::warn!(filename, extension = %key, "Upload signature mismatch");
        }

        Ok(valid)
    }

    /// Open `path` and validate it, deriving the extension from the file name
    /// when none is given.
    pub fn validate_path(&self, path: &Path, extension: Option<&str>) -> SignatureResult<bool> {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SignatureError::InvalidArgument(format!("{} has no usable file name", path.display()))
            })?;

        let extension = match extension {
            Some(ext) => ext,
            None => extension_of(filename).ok_or_else(|| {
                SignatureError::InvalidArgument(format!("{} has no extension", filename))
            })?,
        };

        // Reject bad arguments before touching the filesystem.
        let key = self.check_arguments(filename, extension)?;
        self.entry_for(&key)?;

        let mut reader = BufReader::new(File::open(path)?);
        self.validate(filename, extension, &mut reader)
    }

    /// Returns the normalised table key for `extension`.
    fn check_arguments(&self, filename: &str, extension: &str) -> SignatureResult<String> {
        if extension.is_empty() {
            return Err(SignatureError::InvalidArgument("extension is empty".into()));
        }

        let suffix = format!(".{}", extension);
        let matched = if self.case_insensitive {
            let (name, suffix) = (filename.as_bytes(), suffix.as_bytes());
            name.len() >= suffix.len() && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
        } else {
            filename.ends_with(&suffix)
        };

        if !matched {
            return Err(SignatureError::InvalidArgument(format!(
                "filename {:?} does not end with {:?}",
                filename, suffix
            )));
        }

        Ok(if self.case_insensitive {
            extension.to_ascii_lowercase()
        } else {
            extension.to_string()
        })
    }

    fn entry_for(&self, key: &str) -> SignatureResult<&'static SignatureEntry> {
        if !self.allowed_extensions.is_empty() && !self.allowed_extensions.iter().any(|ext| ext == key) {
            return Err(SignatureError::UnsupportedExtension(key.to_string()));
        }
        lookup(key).ok_or_else(|| SignatureError::UnsupportedExtension(key.to_string()))
    }
}

/// Validate with the default policy (case-insensitive suffix, full table).
pub fn validate<R: Read + Seek>(filename: &str, extension: &str, stream: &mut R) -> SignatureResult<bool> {
    Verifier::default().validate(filename, extension, stream)
}

/// The text after the last `.` of a file name, if non-empty.
pub fn extension_of(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Seek to `offset` and read at most `len` bytes, stopping early at EOF.
fn read_header<R: Read + Seek>(stream: &mut R, offset: u64, len: usize) -> std::io::Result<Vec<u8>> {
    stream.seek(SeekFrom::Start(offset))?;
    let mut header = Vec::with_capacity(len);
    stream.by_ref().take(len as u64).read_to_end(&mut header)?;
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn png_stream() -> Cursor<Vec<u8>> {
        let mut data = PNG.to_vec();
        data.extend_from_slice(&[0u8; 32]);
        Cursor::new(data)
    }

    #[test]
    fn test_valid_png() {
        assert!(validate("a.png", "png", &mut png_stream()).unwrap());
    }

    #[test]
    fn test_suffix_mismatch() {
        let err = validate("a.png", "jpg", &mut png_stream()).unwrap_err();
        assert!(matches!(err, SignatureError::InvalidArgument(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = validate("a.bmp", "bmp", &mut png_stream()).unwrap_err();
        assert!(matches!(err, SignatureError::UnsupportedExtension(ext) if ext == "bmp"));
    }

    #[test]
    fn test_empty_extension() {
        let err = validate("a.", "", &mut png_stream()).unwrap_err();
        assert!(matches!(err, SignatureError::InvalidArgument(_)));
    }

    #[test]
    fn test_case_policy() {
        assert!(validate("photo.PNG", "png", &mut png_stream()).unwrap());
        assert!(validate("photo.png", "PNG", &mut png_stream()).unwrap());

        let strict = Verifier::new().case_sensitive();
        let err = strict.validate("photo.PNG", "png", &mut png_stream()).unwrap_err();
        assert!(matches!(err, SignatureError::InvalidArgument(_)));
        // Strict mode looks the extension up verbatim.
        let err = strict.validate("photo.PNG", "PNG", &mut png_stream()).unwrap_err();
        assert!(matches!(err, SignatureError::UnsupportedExtension(_)));
    }

    #[test]
    fn test_non_ascii_filename_does_not_panic() {
        let err = validate("é", "png", &mut png_stream()).unwrap_err();
        assert!(matches!(err, SignatureError::InvalidArgument(_)));
        assert!(validate("фото.png", "png", &mut png_stream()).unwrap());
    }

    #[test]
    fn test_short_stream_is_false() {
        let mut stream = Cursor::new(PNG[..5].to_vec());
        assert!(!validate("a.png", "png", &mut stream).unwrap());

        let mut empty = Cursor::new(Vec::new());
        assert!(!validate("clip.mp4", "mp4", &mut empty).unwrap());
    }

    #[test]
    fn test_offset_signature() {
        let mut data = vec![0x00, 0x00, 0x00, 0x20];
        data.extend_from_slice(b"ftypisom");
        assert!(validate("clip.mp4_iso", "mp4_iso", &mut Cursor::new(data.clone())).unwrap());
        assert!(!validate("clip.mp4", "mp4", &mut Cursor::new(data)).unwrap());
    }

    #[test]
    fn test_webp_container_checked() {
        let mut riff = b"RIFF\x24\x00\x00\x00WEBPVP8 ".to_vec();
        riff.extend_from_slice(&[0u8; 8]);
        assert!(validate("a.webp", "webp", &mut Cursor::new(riff)).unwrap());

        let forged = b"XXXXXXXXWEBPVP8 ".to_vec();
        assert!(!validate("a.webp", "webp", &mut Cursor::new(forged)).unwrap());
    }

    #[test]
    fn test_allowed_extensions_narrow_table() {
        let config = UploadConfig {
            case_insensitive: true,
            allowed_extensions: vec!["JPG".into()],
        };
        let verifier = Verifier::from_config(&config);
        let err = verifier.validate("a.png", "png", &mut png_stream()).unwrap_err();
        assert!(matches!(err, SignatureError::UnsupportedExtension(_)));

        let mut jpg = Cursor::new(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00]);
        assert!(verifier.validate("a.jpg", "jpg", &mut jpg).unwrap());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("holiday.tar.png"), Some("png"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }
}
