//! Charset-aware response body decoding.
//!
//! The lottery sites serve pages in a mix of encodings and advertise them
//! through the Content-Type `charset` parameter. A body whose declared
//! charset decodes cleanly becomes text; anything else is kept as the raw
//! bytes, unmodified. Decode trouble never fails a request.

use bytes::Bytes;
use encoding_rs::Encoding;
use sorte_core::PageContent;

/// Extract the `charset` parameter from a Content-Type header value.
pub fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Decode a response body using its declared charset.
///
/// Falls back to the raw bytes when no charset is declared, the label is
/// unrecognized, or the body does not decode under it.
pub fn decode_body(bytes: &Bytes, content_type: Option<&str>) -> PageContent {
    if let Some(label) = content_type.and_then(charset_param)
        && let Some(encoding) = Encoding::for_label(label.as_bytes())
    {
        let (text, _, had_errors) = encoding.decode(bytes);
        if !had_errors {
            return PageContent::Text(text.into_owned());
        }
        tracing::debug!("body does not decode as {label}, keeping raw bytes");
    }

    PageContent::from_bytes(bytes.to_vec())
}
