use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

use crate::check::EMBEDDED_TARGET;

/// One rustdoc pass over the driver.
struct DocBuild {
    label: &'static str,
    target: Option<&'static str>,
    features: &'static str,
}

/// Host docs carry the `std` error impls; the embedded pass documents the
/// `no_std` + `defmt` surface firmware actually links against.
const BUILDS: [DocBuild; 2] = [
    DocBuild {
        label: "embedded (no_std + defmt)",
        target: Some(EMBEDDED_TARGET),
        features: "defmt",
    },
    DocBuild {
        label: "host (std)",
        target: None,
        features: "std",
    },
];

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building tas2505 documentation...".cyan().bold());
    println!();

    let start = Instant::now();

    let last = BUILDS.len().saturating_sub(1);
    for (index, build) in BUILDS.iter().enumerate() {
        // Open the host pass only.
        build_docs(build, open && index == last)?;
    }

    println!(
        "{}",
        format!(
            "✓ Documentation built in {:.2}s",
            start.elapsed().as_secs_f64()
        )
        .green()
    );

    if !open {
        println!();
        for build in &BUILDS {
            println!(
                "   {}",
                format!("{}: {}", build.label, index_path(build.target)).dimmed()
            );
        }
    }

    println!();

    Ok(())
}

fn build_docs(build: &DocBuild, open: bool) -> Result<()> {
    println!("{}", format!("  Documenting {}...", build.label).cyan());

    let mut cmd = Command::new("cargo");
    cmd.args(doc_args(build, open))
        // Broken intra-doc links to registers or scripts fail the build.
        .env("RUSTDOCFLAGS", "-D warnings");

    let output = cmd
        .output()
        .with_context(|| format!("Failed to document {}", build.label))?;

    if !output.status.success() {
        eprintln!(
            "{}",
            format!("  ✗ {} documentation failed", build.label).red().bold()
        );
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("{} documentation failed", build.label);
    }

    println!("{}", format!("  ✓ {} documented", build.label).green());
    println!();
    Ok(())
}

fn doc_args(build: &DocBuild, open: bool) -> Vec<&'static str> {
    let mut args = vec!["doc", "-p", "tas2505", "--no-deps", "--features", build.features];
    if let Some(target) = build.target {
        args.extend(["--target", target]);
    }
    if open {
        args.push("--open");
    }
    args
}

fn index_path(target: Option<&str>) -> String {
    match target {
        Some(target) => format!("target/{target}/doc/tas2505/index.html"),
        None => "target/doc/tas2505/index.html".to_string(),
    }
}
