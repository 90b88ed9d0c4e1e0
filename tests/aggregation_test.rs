//! Integration tests for result aggregation
//!
//! Every permutation of a fixed result set must produce the same verdict and
//! the same merged AMP findings.

use pagex::core::export::ResultAggregator;
use pagex::domain::{
    AmpMessage, AmpPageResult, AmpValidation, PagexError, RenderResult, Revalidate,
};
use test_case::test_case;

fn amp(page: &str, errors: &[&str], warnings: &[&str]) -> AmpValidation {
    AmpValidation {
        page: page.to_string(),
        result: AmpPageResult {
            errors: errors.iter().map(|m| AmpMessage::new(2, 4, *m)).collect(),
            warnings: warnings.iter().map(|m| AmpMessage::new(1, 1, *m)).collect(),
        },
    }
}

fn results() -> Vec<RenderResult> {
    vec![
        RenderResult::success("/"),
        RenderResult::failed("/broken", "TypeError: cannot read property"),
        RenderResult::success("/amp").with_amp_validation(amp("/amp", &[], &["viewport"])),
        RenderResult::success("/amp.amp").with_amp_validation(amp("/amp", &["img"], &[])),
        RenderResult::success("/blog").with_revalidate(Revalidate::Seconds(60)),
    ]
}

fn permutations(items: Vec<RenderResult>) -> Vec<Vec<RenderResult>> {
    if items.len() <= 1 {
        return vec![items];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.clone();
        let head = rest.remove(i);
        for mut tail in permutations(rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

fn aggregate(order: Vec<RenderResult>) -> ResultAggregator {
    let mut agg = ResultAggregator::new(order.len()).track_revalidations(true);
    for result in order {
        agg.record(result);
    }
    agg
}

#[test]
fn test_aggregation_is_order_independent() {
    let all = permutations(results());
    assert_eq!(all.len(), 120);

    let reference = aggregate(results());
    for order in all {
        let agg = aggregate(order);
        assert_eq!(agg.render_error(), reference.render_error());
        assert_eq!(agg.had_validation_error(), reference.had_validation_error());
        assert_eq!(agg.amp_validations(), reference.amp_validations());
        assert_eq!(agg.revalidations(), reference.revalidations());
        assert_eq!(
            agg.failed_paths().collect::<Vec<_>>(),
            reference.failed_paths().collect::<Vec<_>>()
        );
    }

    let merged = &reference.amp_validations()["/amp"];
    assert_eq!(merged.errors.len(), 1);
    assert_eq!(merged.warnings.len(), 1);
}

#[test]
fn test_scenario_one_failure_among_many() {
    let mut agg = ResultAggregator::new(3);
    agg.record(RenderResult::success("/a"));
    agg.record(RenderResult::failed("/b", "boom"));
    agg.record(RenderResult::success("/c"));

    assert!(agg.is_complete());
    match agg.verdict() {
        Err(PagexError::Render { paths }) => assert_eq!(paths, vec!["/b"]),
        other => panic!("expected render error, got {other:?}"),
    }
}

#[test]
fn test_warnings_alone_do_not_fail() {
    let mut agg = ResultAggregator::new(1);
    agg.record(RenderResult::success("/amp").with_amp_validation(amp("/amp", &[], &["w"])));

    assert!(!agg.had_validation_error());
    assert!(agg.verdict().is_ok());
    assert_eq!(agg.amp_validations().len(), 1);
}

#[test_case(0, true ; "no results expected")]
#[test_case(2, false ; "one result missing")]
fn test_completeness(expected: usize, complete_after_one: bool) {
    let mut agg = ResultAggregator::new(expected);
    if expected > 0 {
        agg.record(RenderResult::success("/a"));
    }
    assert_eq!(agg.is_complete(), complete_after_one);
}
