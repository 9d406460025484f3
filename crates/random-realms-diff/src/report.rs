use crate::model::{DiffOutcome, DiffReport};

/// Render a deterministic plain-text summary of an upgrade check.
pub fn render_report(report: &DiffReport, max_examples: usize) -> String {
    let mut lines = Vec::new();

    if let Some(path) = &report.realm_path {
        lines.push(format!("realm: {}", path.display()));
    }
    lines.push(format!("baseline: {}", report.baseline));
    let outcome = match report.outcome() {
        DiffOutcome::Pass => "pass",
        DiffOutcome::Fail => "fail",
    };
    lines.push(format!("outcome: {outcome}"));

    for comparison in &report.comparisons {
        lines.push(format!(
            "{} vs {}: {} difference(s)",
            report.baseline,
            comparison.version,
            comparison.differences.len()
        ));
        for difference in comparison.differences.iter().take(max_examples) {
            lines.push(format!(
                "  {}: {} -> {}",
                if difference.path.is_empty() { "/" } else { &difference.path },
                render_side(difference.expected.as_ref()),
                render_side(difference.actual.as_ref())
            ));
        }
        if comparison.differences.len() > max_examples {
            lines.push(format!(
                "  ... {} more",
                comparison.differences.len() - max_examples
            ));
        }
    }

    lines.join("\n")
}

fn render_side(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => "<missing>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::engine::check_dumps;

    #[test]
    fn truncates_long_difference_lists() {
        let old = json!({"Dog": [{"n": 1}, {"n": 2}, {"n": 3}]});
        let new = json!({"Dog": [{"n": 4}, {"n": 5}, {"n": 6}]});
        let report = check_dumps(vec![("a".to_string(), old), ("b".to_string(), new)])
            .expect("report");
        let rendered = render_report(&report, 2);
        assert_eq!(
            rendered,
            "baseline: a\noutcome: fail\na vs b: 3 difference(s)\n  /Dog/0/n: 1 -> 4\n  /Dog/1/n: 2 -> 5\n  ... 1 more"
        );
    }
}
