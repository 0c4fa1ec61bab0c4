//! Verdict construction: outcome, violating files, and the fixed human-readable texts.

use repolockr_types::{ids, Outcome, Verdict};

pub fn pass() -> Verdict {
    Verdict {
        outcome: Outcome::Pass,
        violating_files: Vec::new(),
        summary: ids::SUMMARY_PASS.to_string(),
        detail: None,
    }
}

/// Verdict for a cycle whose lock list could not be determined.
pub fn indeterminate() -> Verdict {
    Verdict {
        outcome: Outcome::Indeterminate,
        violating_files: Vec::new(),
        summary: ids::SUMMARY_INDETERMINATE.to_string(),
        detail: None,
    }
}

/// `violating_files` must be non-empty; an empty list is a pass.
pub fn fail(violating_files: Vec<String>) -> Verdict {
    if violating_files.is_empty() {
        return pass();
    }

    Verdict {
        outcome: Outcome::Fail,
        summary: failure_summary(violating_files.len()),
        detail: Some(failure_detail(&violating_files)),
        violating_files,
    }
}

pub fn failure_summary(count: usize) -> String {
    if count == 1 {
        "There was 1 locked file that was modified".to_string()
    } else {
        format!("There were {count} locked files that were modified")
    }
}

fn failure_detail(files: &[String]) -> String {
    let mut text = ids::DETAIL_HEADER.to_string();
    for file in files {
        text.push_str("\n- ");
        text.push_str(file);
    }
    text
}
