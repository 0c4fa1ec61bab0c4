use crate::{RenderableReport, RenderableStatus};
use repolockr_types::ids;

/// Render a report as GitHub Actions workflow command annotations.
///
/// Format:
/// `::{level} file={path}::{message}`
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    match report.status {
        RenderableStatus::Pass | RenderableStatus::Skip => Vec::new(),
        RenderableStatus::Fail => report
            .violating_files
            .iter()
            .map(|path| {
                let message = format!(
                    "[{}:{}] locked file was modified: {}",
                    ids::CHECK_RUN_NAME,
                    ids::CODE_LOCKED_FILE_MODIFIED,
                    path
                );
                format!("::error file={}::{}", escape_property(path), escape(&message))
            })
            .collect(),
    }
}

fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape(value).replace(':', "%3A").replace(',', "%2C")
}
