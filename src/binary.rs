//! Binary or text classification by content inspection.

use crate::constants::BINARY_SAMPLE_LEN;
use std::path::Path;
use tokio::io::AsyncReadExt;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Classifies a content sample.
///
/// A sample is binary when it contains a NUL byte, or when more than 10% of
/// its bytes are suspicious: control characters other than the usual
/// whitespace and escape bytes, or bytes that are not valid UTF-8 (a sequence
/// cut off by the end of the sample is tolerated). An empty sample is text.
pub fn is_binary_content(sample: &[u8]) -> bool {
    let sample = sample.strip_prefix(UTF8_BOM).unwrap_or(sample);
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }

    let control = sample
        .iter()
        .filter(|&&b| b < 7 || (b > 13 && b < 32 && b != 27) || b == 127)
        .count();
    let suspicious = control + invalid_utf8_len(sample);
    suspicious * 10 > sample.len()
}

/// Counts bytes that do not belong to a valid UTF-8 sequence.
fn invalid_utf8_len(mut sample: &[u8]) -> usize {
    let mut invalid = 0;
    while let Err(e) = std::str::from_utf8(sample) {
        let Some(len) = e.error_len() else { break };
        invalid += len;
        sample = &sample[e.valid_up_to() + len..];
    }
    invalid
}

/// Reads the leading bytes of `path` and classifies them.
pub async fn is_binary_file<P: AsRef<Path>>(path: P) -> std::io::Result<bool> {
    let file = tokio::fs::File::open(path.as_ref()).await?;
    let mut sample = Vec::with_capacity(BINARY_SAMPLE_LEN);
    file.take(BINARY_SAMPLE_LEN as u64).read_to_end(&mut sample).await?;
    Ok(is_binary_content(&sample))
}
