//! Encoded photos and data-URL conversion.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// MIME type of booth snapshots and exports.
pub const JPEG_MIME: &str = "image/jpeg";

/// An encoded image (JPEG or PNG) held in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedPhoto {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Error returned for malformed data URLs or base64 payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataUrlError {
    #[error("Data URL is missing the ';base64,' marker")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    Decode(String),

    #[error("Empty image payload")]
    Empty,
}

impl EncodedPhoto {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }

    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self::new(bytes, JPEG_MIME)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `data:<mime>;base64,<payload>`
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// A bare base64 payload without the `data:` prefix is accepted as JPEG.
    pub fn from_data_url(url: &str) -> Result<Self, DataUrlError> {
        let url = url.trim();
        let (mime, payload) = match url.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest.split_once(',').ok_or(DataUrlError::NotBase64)?;
                let mime = header
                    .strip_suffix(";base64")
                    .ok_or(DataUrlError::NotBase64)?;
                let mime = if mime.is_empty() { JPEG_MIME } else { mime };
                (mime.to_string(), payload)
            }
            None => (JPEG_MIME.to_string(), url),
        };
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| DataUrlError::Decode(e.to_string()))?;
        if bytes.is_empty() {
            return Err(DataUrlError::Empty);
        }
        Ok(Self { bytes, mime })
    }

    /// File extension matching the MIME type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "jpg",
        }
    }
}

impl std::fmt::Debug for EncodedPhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedPhoto")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_round_trip() {
        let photo = EncodedPhoto::jpeg(vec![0xff, 0xd8, 0xff, 0xe0, 1, 2, 3]);
        let url = photo.to_data_url();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(EncodedPhoto::from_data_url(&url).unwrap(), photo);
    }

    #[test]
    fn test_png_data_url_keeps_mime() {
        let photo = EncodedPhoto::from_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(photo.mime, "image/png");
        assert_eq!(photo.extension(), "png");
        assert_eq!(&photo.bytes[1..4], b"PNG");
    }

    #[test]
    fn test_bare_payload_is_jpeg() {
        let photo = EncodedPhoto::from_data_url("AQID").unwrap();
        assert_eq!(photo.bytes, vec![1, 2, 3]);
        assert_eq!(photo.extension(), "jpg");
    }

    #[test]
    fn test_rejects_bad_payloads() {
        assert_eq!(
            EncodedPhoto::from_data_url("data:image/jpeg,AQID"),
            Err(DataUrlError::NotBase64)
        );
        assert!(matches!(
            EncodedPhoto::from_data_url("data:image/jpeg;base64,@@@"),
            Err(DataUrlError::Decode(_))
        ));
        assert_eq!(
            EncodedPhoto::from_data_url("data:image/jpeg;base64,"),
            Err(DataUrlError::Empty)
        );
    }

    #[test]
    fn test_debug_hides_bytes() {
        let photo = EncodedPhoto::jpeg(vec![0; 1024]);
        assert_eq!(
            format!("{photo:?}"),
            "EncodedPhoto { mime: \"image/jpeg\", len: 1024 }"
        );
    }
}
