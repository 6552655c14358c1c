use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    let run_unit = !integration_only;
    let run_integration = !unit_only;

    // Test 1: Unit tests (#[cfg(test)] modules)
    if run_unit {
        println!("{}", "  Running unit tests...".cyan());
        let unit_start = Instant::now();

        let output = Command::new("cargo")
            .args(["test", "-p", "tas2505", "--lib", "--features", "std"])
            .output()
            .context("Failed to run unit tests")?;
        report("Unit tests", &output, unit_start)?;
    }

    // Test 2: Integration tests (crates/tas2505/tests/*.rs)
    if run_integration {
        println!("{}", "  Running integration tests...".cyan());
        let int_start = Instant::now();

        let output = Command::new("cargo")
            .args(["test", "-p", "tas2505", "--tests", "--features", "std"])
            .output()
            .context("Failed to run integration tests")?;
        report("Integration tests", &output, int_start)?;
    }

    // Test 3: Doc tests
    println!("{}", "  Running doc tests...".cyan());
    let doc_start = Instant::now();

    let doc_output = Command::new("cargo")
        .args(["test", "-p", "tas2505", "--doc"])
        .output()
        .context("Failed to run doc tests")?;

    if doc_output.status.success() {
        let output_str = String::from_utf8_lossy(&doc_output.stdout);
        let summary = extract_test_summary(&output_str);

        println!(
            "{}",
            format!(
                "  ✓ Doc tests passed {} in {:.2}s",
                summary,
                doc_start.elapsed().as_secs_f64()
            )
            .green()
        );
    } else {
        eprintln!("{}", "  ⚠ Doc tests failed".yellow().bold());
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All tests completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

/// Print the summary line for a finished test run, or its output on failure.
fn report(label: &str, output: &Output, start: Instant) -> Result<()> {
    let output_str = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
        eprintln!("{}", format!("  ✗ {label} failed").red().bold());
        eprintln!();
        for line in output_str.lines() {
            eprintln!("  {line}");
        }
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{label} failed");
    }

    println!(
        "{}",
        format!(
            "  ✓ {label} passed {} in {:.2}s",
            extract_test_summary(&output_str),
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
    Ok(())
}

fn extract_test_summary(output: &str) -> String {
    // Look for lines like "test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out"
    let mut passed = 0u32;
    let mut suites = 0u32;
    for line in output.lines() {
        if let Some(summary) = line.split("test result:").nth(1) {
            suites = suites.saturating_add(1);
            let count = summary
                .split(';')
                .find_map(|part| part.trim().strip_suffix(" passed"))
                .and_then(|part| part.rsplit(' ').next())
                .and_then(|n| n.parse::<u32>().ok())
                .unwrap_or(0);
            passed = passed.saturating_add(count);
        }
    }
    if suites == 0 {
        "(summary not available)".to_string()
    } else {
        format!("({passed} passed across {suites} suites)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_sums_all_suites() {
        let output = "\
test result: ok. 5 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out
running 3 tests
test result: ok. 3 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out";
        assert_eq!(
            extract_test_summary(output),
            "(8 passed across 2 suites)"
        );
    }

    #[test]
    fn summary_without_result_lines() {
        assert_eq!(extract_test_summary("error: could not compile"), "(summary not available)");
    }
}
