//! Human-readable AMP validation report

use crate::domain::task::{AmpMessage, AmpPageResult};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Format merged AMP findings, one block per page, errors before warnings
///
/// Returns an empty string when there are no findings.
pub fn format_amp_report(validations: &BTreeMap<String, AmpPageResult>) -> String {
    let mut output = String::new();
    if validations.is_empty() {
        return output;
    }

    output.push_str("AMP Validation\n");
    for (page, result) in validations {
        let _ = write!(output, "\n{}\n", page);
        for message in &result.errors {
            push_row(&mut output, "error", message);
        }
        for message in &result.warnings {
            push_row(&mut output, "warn", message);
        }
    }
    output
}

fn push_row(output: &mut String, level: &str, message: &AmpMessage) {
    let location = format!("{}:{}", message.line, message.col);
    let _ = write!(output, "  {:<8} {:<5}  {}", location, level, message.message);
    if let Some(url) = &message.spec_url {
        let _ = write!(output, "  {}", url);
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        assert!(format_amp_report(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_report_lists_errors_before_warnings() {
        let mut with_url = AmpMessage::new(3, 7, "The tag 'img' is disallowed");
        with_url.spec_url = Some("https://amp.dev/documentation/components/amp-img".to_string());

        let mut validations = BTreeMap::new();
        validations.insert(
            "/amp".to_string(),
            AmpPageResult {
                errors: vec![with_url],
                warnings: vec![AmpMessage::new(1, 1, "Missing viewport")],
            },
        );

        let report = format_amp_report(&validations);
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[0], "AMP Validation");
        assert_eq!(lines[2], "/amp");
        assert!(lines[3].contains("3:7") && lines[3].contains("error"));
        assert!(lines[3].ends_with("amp-img"));
        assert!(lines[4].contains("warn") && lines[4].contains("Missing viewport"));
    }
}
