use std::io::Read;

use axum::http::{header, HeaderMap};
use flate2::read::GzDecoder;
use thiserror::Error;

use bagtrack_domain::ScanInput;

#[derive(Debug, Error)]
pub enum ScanBodyError {
    #[error("decoded body exceeds {0} bytes")]
    TooLarge(u64),
    #[error("{0}")]
    Invalid(#[from] anyhow::Error),
}

/// Decodes a scan submission, accepting gzip bodies from batching scanners.
/// `max_bytes` caps the decoded size so compressed bodies obey the same
/// limit as plain ones.
pub fn parse_scan(
    headers: &HeaderMap,
    body: &[u8],
    max_bytes: u64,
) -> Result<ScanInput, ScanBodyError> {
    let content = maybe_gunzip(headers, body, max_bytes)?;
    if content.trim().is_empty() {
        return Err(anyhow::anyhow!("empty request body").into());
    }
    let input: ScanInput = serde_json::from_str(&content).map_err(anyhow::Error::from)?;
    Ok(input)
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8], max_bytes: u64) -> Result<String, ScanBodyError> {
    let is_gzip = headers
        .get(header::CONTENT_ENCODING)
        .and_then(|encoding| encoding.to_str().ok())
        .is_some_and(|encoding| encoding.eq_ignore_ascii_case("gzip"));
    let bytes = if is_gzip {
        let mut decoder = GzDecoder::new(body).take(max_bytes.saturating_add(1));
        let mut out = Vec::new();
        decoder
            .read_to_end(&mut out)
            .map_err(anyhow::Error::from)?;
        out
    } else {
        body.to_vec()
    };
    if bytes.len() as u64 > max_bytes {
        return Err(ScanBodyError::TooLarge(max_bytes));
    }
    String::from_utf8(bytes).map_err(|err| ScanBodyError::Invalid(err.into()))
}
