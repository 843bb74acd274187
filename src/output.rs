use crate::catalog::{Dimension, QuestionId};
use crate::models::{BatchStatistics, EvaluationResult};
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Console output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

/// File export format for evaluation results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Header row of the tabular export
pub fn csv_header() -> Vec<String> {
    let mut header = vec![
        "evaluation_id".to_string(),
        "overall_score".to_string(),
        "overall_consistency".to_string(),
    ];
    for dimension in Dimension::ALL {
        header.push(format!("dim_{}_score", dimension.slug()));
        header.push(format!("dim_{}_consistency", dimension.slug()));
    }
    header.extend(QuestionId::ALL.iter().map(|q| q.as_str().to_string()));
    header
}

/// One tabular row for the result at position `evaluation_id`
fn csv_row(evaluation_id: usize, result: &EvaluationResult) -> Vec<String> {
    let mut row = vec![
        evaluation_id.to_string(),
        format_float(result.overall_score),
        format_float(result.overall_consistency),
    ];
    for dimension in Dimension::ALL {
        match result.dimension(dimension) {
            Some(d) => {
                row.push(format_float(d.score));
                row.push(format_float(d.consistency));
            }
            None => row.extend([String::new(), String::new()]),
        }
    }
    row.extend(QuestionId::ALL.iter().map(|q| result.responses.get(*q).to_string()));
    row
}

// Keeps a trailing ".0" on whole numbers
fn format_float(value: f64) -> String {
    format!("{:?}", value)
}

/// Write results as a pretty-printed JSON array
pub fn write_results_json<W: Write>(writer: W, results: &[EvaluationResult]) -> Result<()> {
    serde_json::to_writer_pretty(writer, results).context("Failed to serialize results to JSON")
}

/// Write results as CSV, one row per result
pub fn write_results_csv<W: Write>(writer: W, results: &[EvaluationResult]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer
        .write_record(csv_header())
        .context("Failed to write CSV header")?;

    for (evaluation_id, result) in results.iter().enumerate() {
        writer
            .write_record(csv_row(evaluation_id, result))
            .with_context(|| format!("Failed to write CSV row {}", evaluation_id))?;
    }

    writer.flush().context("Failed to flush CSV output")
}

/// Write batch statistics as pretty-printed JSON
pub fn write_statistics_json<W: Write>(writer: W, stats: &BatchStatistics) -> Result<()> {
    serde_json::to_writer_pretty(writer, stats).context("Failed to serialize statistics to JSON")
}

/// Create the output file, including missing parent directories
fn create_output_file(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Export results to a file in the given format
pub fn export_results(results: &[EvaluationResult], path: &Path, format: ExportFormat) -> Result<()> {
    let mut writer = create_output_file(path)?;
    match format {
        ExportFormat::Json => write_results_json(&mut writer, results)?,
        ExportFormat::Csv => write_results_csv(&mut writer, results)?,
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write results to: {}", path.display()))?;

    info!(count = results.len(), path = %path.display(), "Exported results");
    Ok(())
}

/// Save statistics to a JSON file
pub fn export_statistics(stats: &BatchStatistics, path: &Path) -> Result<()> {
    let mut writer = create_output_file(path)?;
    write_statistics_json(&mut writer, stats)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write statistics to: {}", path.display()))?;

    info!(path = %path.display(), "Saved statistics");
    Ok(())
}

/// Print a single evaluation in the specified format
pub fn print_evaluation(result: &EvaluationResult, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print_evaluation_plain(result),
        OutputFormat::Json => print_json(result),
    }
}

/// Print batch statistics in the specified format
pub fn print_statistics(stats: &BatchStatistics, format: OutputFormat) {
    match format {
        OutputFormat::Plain => print_statistics_plain(stats),
        OutputFormat::Json => print_json(stats),
    }
}

fn print_evaluation_plain(result: &EvaluationResult) {
    println!("System Hallucination Scale (SHS) Results");
    println!("{}", "=".repeat(50));
    println!("Overall Score: {:.3} (range: -1.0 to +1.0)", result.overall_score);
    println!("Overall Consistency: {:.3}", result.overall_consistency);
    println!();
    println!("Dimension Breakdown:");
    println!("{}", "-".repeat(50));

    for dimension in &result.dimensions {
        println!("{}:", dimension.dimension_label);
        println!("  Score: {:.3}", dimension.score);
        println!(
            "  Consistency: {:.3} ({})",
            dimension.consistency,
            dimension.consistency_level.as_str()
        );
        println!(
            "  Responses: {} = {}, {} = {}",
            dimension.question_a, dimension.response_a, dimension.question_b, dimension.response_b
        );
        println!();
    }
}

fn print_statistics_plain(stats: &BatchStatistics) {
    println!("Statistical Summary:");
    println!("{}", "=".repeat(50));
    println!("Number of evaluations: {}", stats.n_evaluations);

    let (Some(score), Some(consistency)) = (&stats.overall_score, &stats.overall_consistency) else {
        println!("No statistics available.");
        return;
    };

    println!();
    println!("Overall Score:");
    println!("  Mean: {:.3}", score.mean);
    println!("  Min:  {:.3}", score.min);
    println!("  Max:  {:.3}", score.max);
    println!("  Std:  {:.3}", score.std);
    println!();
    println!("Overall Consistency:");
    println!("  Mean: {:.3}", consistency.mean);
    println!("  Min:  {:.3}", consistency.min);
    println!("  Max:  {:.3}", consistency.max);

    if !stats.dimensions.is_empty() {
        println!();
        println!("Dimension Statistics:");
        for (dimension, dim_stats) in &stats.dimensions {
            println!("  {}:", dimension);
            println!("    Mean Score: {:.3}", dim_stats.mean_score);
            println!("    Range: [{:.3}, {:.3}]", dim_stats.min_score, dim_stats.max_score);
            println!("    Mean Consistency: {:.3}", dim_stats.mean_consistency);
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing output to JSON: {}", e),
    }
}
