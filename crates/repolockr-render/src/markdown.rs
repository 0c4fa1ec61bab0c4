use crate::{RenderableReport, RenderableStatus};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# Repolockr report\n\n");
    let status = match report.status {
        RenderableStatus::Pass => "PASS",
        RenderableStatus::Fail => "FAIL",
        RenderableStatus::Skip => "SKIP",
    };
    out.push_str(&format!("- Verdict: **{}**\n", status));
    out.push_str(&format!("- Summary: {}\n", report.summary));
    if let Some(reason) = &report.reason {
        out.push_str(&format!("- Reason: {}\n", reason));
    }
    out.push('\n');

    if report.violating_files.is_empty() {
        out.push_str("No locked files were modified.\n");
        return out;
    }

    out.push_str("## Locked files modified\n\n");
    for path in &report.violating_files {
        out.push_str(&format!("- `{}`\n", path));
    }

    out
}
