//! Result aggregation
//!
//! Folds render results into run-wide state as they arrive: the render error
//! flag, merged AMP findings per page and, in build-export mode, the
//! revalidation hints. The merge is order independent.

use crate::domain::errors::PagexError;
use crate::domain::manifest::Revalidate;
use crate::domain::task::{AmpMessage, AmpPageResult, RenderResult};
use crate::domain::Result;
use std::collections::{BTreeMap, BTreeSet};

/// Accumulates render results for one export run
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    expected: usize,
    received: usize,
    track_revalidations: bool,
    failed_paths: BTreeSet<String>,
    amp_validations: BTreeMap<String, AmpPageResult>,
    revalidations: BTreeMap<String, Revalidate>,
}

impl ResultAggregator {
    /// Aggregator expecting `expected` results
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            ..Self::default()
        }
    }

    /// Also keep per-path revalidation hints
    pub fn track_revalidations(mut self, enabled: bool) -> Self {
        self.track_revalidations = enabled;
        self
    }

    /// Fold one result in
    pub fn record(&mut self, result: RenderResult) {
        self.received += 1;

        if let Some(error) = &result.error {
            tracing::error!(path = %result.path, error = %error, "Error occurred prerendering page");
            self.failed_paths.insert(result.path.clone());
        }

        for validation in result.amp_validations {
            let merged = self.amp_validations.entry(validation.page).or_default();
            merge_messages(&mut merged.errors, validation.result.errors);
            merge_messages(&mut merged.warnings, validation.result.warnings);
        }

        if self.track_revalidations {
            if let Some(revalidate) = result.from_build_export_revalidate {
                self.revalidations.insert(result.path, revalidate);
            }
        }
    }

    /// Results received so far
    pub fn received(&self) -> usize {
        self.received
    }

    /// Whether every expected result has arrived
    pub fn is_complete(&self) -> bool {
        self.received >= self.expected
    }

    /// Whether any render failed
    pub fn render_error(&self) -> bool {
        !self.failed_paths.is_empty()
    }

    /// Whether any merged page carries an AMP error
    pub fn had_validation_error(&self) -> bool {
        self.amp_validations.values().any(AmpPageResult::has_errors)
    }

    /// Paths whose render failed, sorted
    pub fn failed_paths(&self) -> impl Iterator<Item = &str> {
        self.failed_paths.iter().map(String::as_str)
    }

    /// Merged AMP findings per page
    pub fn amp_validations(&self) -> &BTreeMap<String, AmpPageResult> {
        &self.amp_validations
    }

    /// Revalidation hints per path (build-export mode only)
    pub fn revalidations(&self) -> &BTreeMap<String, Revalidate> {
        &self.revalidations
    }

    /// Final verdict: AMP validation errors take precedence over render errors
    ///
    /// # Errors
    ///
    /// Returns `PagexError::AmpValidation` if any page carries AMP errors,
    /// otherwise `PagexError::Render` if any render failed.
    pub fn verdict(&self) -> Result<()> {
        if self.had_validation_error() {
            let pages = self
                .amp_validations
                .iter()
                .filter(|(_, result)| result.has_errors())
                .map(|(page, _)| page.clone())
                .collect();
            return Err(PagexError::AmpValidation { pages });
        }
        if self.render_error() {
            return Err(PagexError::Render {
                paths: self.failed_paths.iter().cloned().collect(),
            });
        }
        Ok(())
    }
}

fn merge_messages(into: &mut Vec<AmpMessage>, incoming: Vec<AmpMessage>) {
    if incoming.is_empty() {
        return;
    }
    into.extend(incoming);
    into.sort();
    into.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::AmpValidation;

    fn amp(page: &str, errors: &[&str], warnings: &[&str]) -> AmpValidation {
        AmpValidation {
            page: page.to_string(),
            result: AmpPageResult {
                errors: errors.iter().map(|m| AmpMessage::new(1, 1, *m)).collect(),
                warnings: warnings.iter().map(|m| AmpMessage::new(1, 1, *m)).collect(),
            },
        }
    }

    #[test]
    fn test_render_error_is_sticky() {
        let mut agg = ResultAggregator::new(3);
        agg.record(RenderResult::success("/a"));
        agg.record(RenderResult::failed("/b", "boom"));
        agg.record(RenderResult::success("/c"));

        assert!(agg.is_complete());
        assert!(agg.render_error());
        assert_eq!(agg.failed_paths().collect::<Vec<_>>(), vec!["/b"]);
    }

    #[test]
    fn test_amp_merge_is_order_independent() {
        let first = RenderResult::success("/a").with_amp_validation(amp("/a", &["e1"], &["w1"]));
        let second = RenderResult::success("/a.amp").with_amp_validation(amp("/a", &["e2"], &[]));

        let mut forward = ResultAggregator::new(2);
        forward.record(first.clone());
        forward.record(second.clone());

        let mut backward = ResultAggregator::new(2);
        backward.record(second);
        backward.record(first);

        assert_eq!(forward.amp_validations(), backward.amp_validations());
        assert_eq!(forward.amp_validations()["/a"].errors.len(), 2);
    }

    #[test]
    fn test_duplicate_findings_collapse() {
        let mut agg = ResultAggregator::new(2);
        agg.record(RenderResult::success("/a").with_amp_validation(amp("/a", &[], &["w"])));
        agg.record(RenderResult::success("/a").with_amp_validation(amp("/a", &[], &["w"])));

        assert_eq!(agg.amp_validations()["/a"].warnings.len(), 1);
        assert!(!agg.had_validation_error());
        assert!(agg.verdict().is_ok());
    }

    #[test]
    fn test_amp_errors_take_precedence() {
        let mut agg = ResultAggregator::new(2);
        agg.record(RenderResult::failed("/x", "boom"));
        agg.record(RenderResult::success("/amp").with_amp_validation(amp("/amp", &["bad"], &[])));

        match agg.verdict() {
            Err(PagexError::AmpValidation { pages }) => assert_eq!(pages, vec!["/amp"]),
            other => panic!("expected AMP validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_revalidations_only_when_tracked() {
        let result = RenderResult::success("/blog").with_revalidate(Revalidate::Seconds(10));

        let mut plain = ResultAggregator::new(1);
        plain.record(result.clone());
        assert!(plain.revalidations().is_empty());

        let mut tracked = ResultAggregator::new(1).track_revalidations(true);
        tracked.record(result);
        assert_eq!(tracked.revalidations()["/blog"], Revalidate::Seconds(10));
    }
}
