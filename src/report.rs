//! Plain-text output for `--print`.

use std::fmt::Write;

use anyhow::{bail, Result};

use crate::async_compare::{CompareRequest, CompareWorker};
use crate::selection::DateField;
use crate::state::comparison_state::OverallStatus;
use crate::view::ComparisonView;

/// Wait for the response to `request` and apply it to the view.
pub async fn await_comparison(
    view: &mut ComparisonView,
    worker: &mut CompareWorker,
    request: CompareRequest,
) -> Result<()> {
    let generation = request.generation;
    worker.request(request);
    while let Some(response) = worker.recv().await {
        let current = response.generation == generation;
        view.apply_response(response);
        if current {
            return Ok(());
        }
    }
    bail!("comparison worker stopped before answering")
}

/// Render the view as text: link, dates with commits, status, then one
/// block per resource.
pub fn render_report(view: &ComparisonView) -> String {
    let c = &view.comparison;
    let mut out = String::new();

    let _ = writeln!(out, "link:   {}", view.link().as_string());
    for (label, field, commit) in [
        ("from:  ", DateField::From, &c.from_commit),
        ("to:    ", DateField::To, &c.to_commit),
    ] {
        let input = view.field(field);
        let _ = write!(out, "{label} {}", input.value);
        if !commit.label.is_empty() {
            let _ = write!(out, "  {}", commit.href);
        }
        out.push('\n');
    }
    let _ = writeln!(out, "status: {}", c.status.text());

    for row in &c.rows {
        let _ = writeln!(out, "\n[{}] {}", row.status_label(), row.key);
        if row.matches {
            let _ = writeln!(out, "{}", indent(&row.lhs));
        } else {
            let _ = writeln!(out, "  previous:\n{}", indent(&row.lhs));
            let _ = writeln!(out, "  current:\n{}", indent(&row.rhs));
        }
    }
    out
}

/// Exit code for print mode: 0 full match, 1 mismatch, 2 failure.
pub fn exit_code(view: &ComparisonView) -> i32 {
    match view.comparison.status {
        OverallStatus::FullMatch => 0,
        OverallStatus::SomeMismatch => 1,
        OverallStatus::Failed(_) | OverallStatus::Pending => 2,
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
