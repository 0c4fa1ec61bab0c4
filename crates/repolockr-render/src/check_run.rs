use repolockr_types::{ids, CheckRunConclusion, CheckRunOutput, Outcome, Verdict};

/// Map a verdict outcome to the conclusion written on the check run.
pub fn conclusion_for(outcome: Outcome) -> CheckRunConclusion {
    match outcome {
        Outcome::Pass => CheckRunConclusion::Success,
        Outcome::Fail => CheckRunConclusion::Failure,
        Outcome::Indeterminate => CheckRunConclusion::Neutral,
    }
}

pub fn render_check_run_output(verdict: &Verdict) -> CheckRunOutput {
    CheckRunOutput {
        title: ids::REPORT_TITLE.to_string(),
        summary: verdict.summary.clone(),
        text: verdict.detail.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing() -> Verdict {
        Verdict {
            outcome: Outcome::Fail,
            violating_files: vec!["a.yml".to_string(), "b.yml".to_string()],
            summary: "There were 2 locked files that were modified".to_string(),
            detail: Some("The following locked files were modified:\n- a.yml\n- b.yml".to_string()),
        }
    }

    #[test]
    fn conclusions_map_one_to_one() {
        assert_eq!(conclusion_for(Outcome::Pass), CheckRunConclusion::Success);
        assert_eq!(conclusion_for(Outcome::Fail), CheckRunConclusion::Failure);
        assert_eq!(conclusion_for(Outcome::Indeterminate), CheckRunConclusion::Neutral);
    }

    #[test]
    fn failure_output_carries_detail_text() {
        let output = render_check_run_output(&failing());
        assert_eq!(output.title, "repolockr report");
        assert_eq!(output.summary, "There were 2 locked files that were modified");
        insta::assert_snapshot!(output.text.unwrap_or_default(), @r"
        The following locked files were modified:
        - a.yml
        - b.yml
        ");
    }

    #[test]
    fn pass_output_has_no_text() {
        let verdict = Verdict {
            outcome: Outcome::Pass,
            violating_files: Vec::new(),
            summary: "OK".to_string(),
            detail: None,
        };
        let output = render_check_run_output(&verdict);
        assert_eq!(output.summary, "OK");
        assert_eq!(output.text, None);
    }
}
