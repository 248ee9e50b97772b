//! Plain-text end-of-run summary.
//!
//! Three count lines (features, scenario runs, steps), then failure details,
//! then one ready-to-paste registration skeleton per undefined step pattern.

use std::io::{self, Write};

use cress_patterns::SnippetProposal;

use crate::results::TotalResult;

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn breakdown(parts: &[(usize, &str)]) -> String {
    let listed: Vec<String> = parts
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{count} {label}"))
        .collect();
    if listed.is_empty() {
        String::new()
    } else {
        format!(" ({})", listed.join(", "))
    }
}

/// The three count lines.
///
/// # Examples
/// ```
/// use cress::{TotalResult, reporting::summary};
///
/// let lines = summary::count_lines(&TotalResult::default());
/// assert_eq!(lines, ["0 features", "0 scenarios", "0 steps"]);
/// ```
#[must_use]
pub fn count_lines(totals: &TotalResult) -> Vec<String> {
    let counts = totals.counts();
    vec![
        format!(
            "{}{}",
            plural(totals.features_ran(), "feature"),
            breakdown(&[(totals.features_passed(), "passed")])
        ),
        format!(
            "{}{}",
            plural(totals.scenarios_ran(), "scenario"),
            breakdown(&[
                (totals.scenarios_passed(), "passed"),
                (totals.scenarios_failed(), "failed"),
                (totals.scenarios_not_run(), "not run"),
            ])
        ),
        format!(
            "{}{}",
            plural(counts.total(), "step"),
            breakdown(&[
                (counts.passed, "passed"),
                (counts.failed, "failed"),
                (counts.skipped, "skipped"),
                (counts.undefined, "undefined"),
            ])
        ),
    ]
}

/// A registration skeleton for one proposal.
///
/// The pattern is written as a raw string literal with enough `#` marks
/// that no quote inside it closes the literal early.
#[must_use]
pub fn snippet(proposal: &SnippetProposal) -> String {
    let hashes = "#".repeat(raw_hashes(&proposal.pattern));
    format!(
        "// {}\nregistry.step(r{hashes}\"{}\"{hashes}, |world, call| {{\n    Err(\"This step must be implemented\".into())\n}})?;",
        proposal.signature(),
        proposal.pattern
    )
}

/// Smallest hash count, at least one, whose closing delimiter is absent from `text`.
fn raw_hashes(text: &str) -> usize {
    let mut count = 1;
    while text.contains(&format!("\"{}", "#".repeat(count))) {
        count += 1;
    }
    count
}

/// Write the whole summary.
///
/// # Errors
/// Returns any error raised by `writer`.
pub fn write<W: Write>(writer: &mut W, totals: &TotalResult) -> io::Result<()> {
    for line in count_lines(totals) {
        writeln!(writer, "{line}")?;
    }
    for result in totals.scenario_results() {
        for reason in result.failures() {
            writeln!(
                writer,
                "\nscenario {} \"{}\" ({}) failed:\n{}",
                result.id, result.scenario_name, result.location, reason.trace
            )?;
        }
    }
    let proposals = totals.proposed_definitions();
    if !proposals.is_empty() {
        writeln!(
            writer,
            "\nYou can implement step definitions for undefined steps with these snippets:\n"
        )?;
        for proposal in proposals {
            writeln!(writer, "{}\n", snippet(proposal))?;
        }
    }
    Ok(())
}

/// Render the whole summary as a string.
#[must_use]
pub fn render(totals: &TotalResult) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write(&mut buffer, totals);
    String::from_utf8_lossy(&buffer).into_owned()
}
