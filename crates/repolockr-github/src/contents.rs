use crate::GitHubError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

/// The subset of `GET /repos/{owner}/{repo}/contents/{path}` repolockr reads.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentsResponse {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Decode a contents response into text.
///
/// Only single files with base64 content are accepted; directories, symlinks and submodules
/// come back as [`GitHubError::Decode`].
pub fn decode_contents(body: &serde_json::Value) -> Result<String, GitHubError> {
    let response: ContentsResponse = serde_json::from_value(body.clone())
        .map_err(|e| GitHubError::Decode(format!("contents response: {e}")))?;

    if response.kind != "file" || response.encoding.as_deref() != Some("base64") {
        return Err(GitHubError::Decode(format!(
            "expected a base64 file, got type={} encoding={}",
            response.kind,
            response.encoding.as_deref().unwrap_or("none")
        )));
    }

    // The API wraps base64 at 60 columns.
    let packed: String = response
        .content
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(packed)
        .map_err(|e| GitHubError::Decode(format!("invalid base64 content: {e}")))?;

    String::from_utf8(bytes).map_err(|e| GitHubError::Decode(format!("content is not UTF-8: {e}")))
}
