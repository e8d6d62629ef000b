//! File signature checks for the accepted document types

use ap_shared::config::upload::{MIME_JPEG, MIME_PDF, MIME_PNG};

const PDF_SIGNATURE: &[u8] = b"%PDF-";
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Detect a known document type from the leading bytes
pub fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(PDF_SIGNATURE) {
        Some(MIME_PDF)
    } else if data.starts_with(PNG_SIGNATURE) {
        Some(MIME_PNG)
    } else if data.starts_with(JPEG_SIGNATURE) {
        Some(MIME_JPEG)
    } else {
        None
    }
}

/// Whether the content agrees with the declared type
///
/// Types without a known signature are accepted as declared.
pub fn content_matches(declared: &str, data: &[u8]) -> bool {
    match declared {
        MIME_PDF | MIME_PNG | MIME_JPEG => sniff_mime(data) == Some(declared),
        _ => true,
    }
}
