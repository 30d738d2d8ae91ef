//! One-shot similarity between two recordings or stored fingerprints.

use super::common::load_signature;
use clap::Args;
use sonic_sight_analysis::compare_detailed;
use sonic_sight_config::DEFAULT_THRESHOLD;
use std::path::PathBuf;

#[derive(Args)]
pub struct CompareArgs {
    /// Live/query side: WAV, sound JSON or signature JSON
    #[arg(value_name = "QUERY")]
    query: PathBuf,

    /// Reference side: WAV, sound JSON or signature JSON
    #[arg(value_name = "REFERENCE")]
    reference: PathBuf,

    /// Threshold used for the verdict line
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Write a JSON report
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn run(args: CompareArgs) -> anyhow::Result<()> {
    let query = load_signature(&args.query)?;
    let reference = load_signature(&args.reference)?;
    let result = compare_detailed(&query, &reference);
    let matched = result.score >= args.threshold;

    println!("Comparison");
    println!("==========");
    println!(
        "  Query:     {} ({} frames)",
        args.query.display(),
        query.frame_count()
    );
    println!(
        "  Reference: {} ({} frames)",
        args.reference.display(),
        reference.frame_count()
    );
    println!();
    println!("  Method:   {}", result.method.name());
    println!("  Distance: {:.4}", result.method.distance());
    println!("  Score:    {:.4}", result.score);
    println!(
        "  Verdict:  {} at threshold {:.2}",
        if matched { "match" } else { "no match" },
        args.threshold
    );

    if let Some(output_path) = args.output {
        let report = serde_json::json!({
            "query": args.query.to_string_lossy(),
            "reference": args.reference.to_string_lossy(),
            "queryFrames": query.frame_count(),
            "referenceFrames": reference.frame_count(),
            "comparison": result,
            "threshold": args.threshold,
            "match": matched,
        });

        std::fs::write(&output_path, serde_json::to_string_pretty(&report)?)?;
        println!("\nWrote report to {}", output_path.display());
    }

    Ok(())
}
