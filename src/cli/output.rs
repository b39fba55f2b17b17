//! Output formatting for CLI commands: styled text, or pretty JSON with
//! `--json`.

use console::style;
use serde::Serialize;
use serde_json::json;

use crate::error::Result;
use crate::learning::LearnedPatterns;
use crate::types::{
    EstimatedResults, HistoricalRecord, Intent, OptimizationResult, QualityBreakdown,
    QueryContext, Validation,
};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Ranked queries. Falls back to the trimmed originals when nothing
/// survived filtering.
pub fn print_optimization(
    result: &OptimizationResult,
    base_queries: &[String],
    json: bool,
) -> Result<()> {
    if result.queries.is_empty() {
        tracing::warn!("No candidate met the quality threshold; using the original queries");
    }
    if json {
        return print_json(&json!({
            "queries": result.query_strings_or(base_queries),
            "candidates": result.queries,
            "intent": result.intent,
            "analytics": result.analytics,
        }));
    }

    println!(
        "Intent: {} ({}% confidence)\n",
        style(result.intent.intent_type).cyan().bold(),
        result.intent.confidence
    );

    if result.queries.is_empty() {
        println!("{}", style("No optimized queries; using the originals:").yellow());
        for (i, q) in result.query_strings_or(base_queries).iter().enumerate() {
            println!("{:>3}. {}", i + 1, q);
        }
    } else {
        for (i, q) in result.queries.iter().enumerate() {
            println!(
                "{:>3}. {}  {}",
                i + 1,
                q.text(),
                style(format!(
                    "[quality {:.1}, priority {}, {}]",
                    q.quality_score,
                    q.priority(),
                    q.candidate.source
                ))
                .dim()
            );
        }
    }

    let a = &result.analytics;
    println!(
        "\n{} generated, {} after dedup, {} above quality, {} returned (avg quality {:.1}{})",
        a.generated,
        a.after_dedup,
        a.after_quality_filter,
        a.returned,
        a.average_quality,
        if a.learning_applied { ", learning applied" } else { "" }
    );
    Ok(())
}

pub fn print_context(context: &QueryContext, json: bool) -> Result<()> {
    if json {
        return print_json(context);
    }
    println!("Location:     {}", or_dash(context.location.as_deref()));
    println!("Field:        {}", or_dash(context.field_of_study.as_deref()));
    println!("Student only: {}", context.student_only);
    Ok(())
}

pub fn print_intent(intent: &Intent, json: bool) -> Result<()> {
    if json {
        return print_json(intent);
    }
    let e = &intent.entities;
    println!(
        "{} ({}% confidence)",
        style(intent.intent_type).cyan().bold(),
        intent.confidence
    );
    println!("  location:        {}", or_dash(e.location.as_deref()));
    println!("  field:           {}", or_dash(e.field.as_deref()));
    println!(
        "  education level: {}",
        e.education_level
            .map(|l| format!("{l:?}").to_lowercase())
            .unwrap_or_else(|| "-".into())
    );
    println!(
        "  entity type:     {}",
        e.entity_type
            .map(|t| format!("{t:?}").to_lowercase())
            .unwrap_or_else(|| "-".into())
    );
    Ok(())
}

pub fn print_validation(text: &str, validation: &Validation, json: bool) -> Result<()> {
    if json {
        return print_json(validation);
    }
    let verdict = if validation.is_valid {
        style("valid").green().bold()
    } else {
        style("needs work").red().bold()
    };
    let estimate = match validation.estimated_results {
        EstimatedResults::High => style(validation.estimated_results.as_str()).green(),
        EstimatedResults::Medium => style(validation.estimated_results.as_str()).yellow(),
        EstimatedResults::Low => style(validation.estimated_results.as_str()).red(),
    };
    println!("{text:?}: {verdict} (estimated results: {estimate})");
    for (issue, suggestion) in validation.issues.iter().zip(&validation.suggestions) {
        println!("  - {issue}: {suggestion}");
    }
    Ok(())
}

pub fn print_breakdown(text: &str, breakdown: &QualityBreakdown, json: bool) -> Result<()> {
    if json {
        return print_json(breakdown);
    }
    println!("{text:?}: {}", style(format!("{:.0}", breakdown.score)).bold());
    println!("  length       {:>5.1}", breakdown.length);
    println!("  specificity  {:>5.1}", breakdown.specificity);
    println!("  clarity      {:>5.1}", breakdown.clarity);
    println!("  platform fit {:>5.1}", breakdown.platform_fit);
    println!("  uniqueness   {:>5.1}", breakdown.uniqueness);
    Ok(())
}

pub fn print_recorded(
    record: &HistoricalRecord,
    total: usize,
    location: &str,
    json: bool,
) -> Result<()> {
    if json {
        return print_json(record);
    }
    println!(
        "{} {:?} ({} results); {} records in {}",
        style("Recorded").green(),
        record.query_text,
        record.results_count,
        total,
        location
    );
    Ok(())
}

pub fn print_patterns(patterns: &LearnedPatterns, records: usize, json: bool) -> Result<()> {
    if json {
        return print_json(patterns);
    }
    if patterns.is_empty() {
        println!("No patterns yet ({records} records, none above the minimum result count).");
        return Ok(());
    }
    println!("{}", style("Top keywords").bold());
    for (keyword, weight) in &patterns.top_keywords {
        println!("  {keyword:<20} {weight}");
    }
    println!("{}", style("Structures").bold());
    for tag in &patterns.structures {
        println!("  {tag}");
    }
    Ok(())
}

pub fn print_history(records: &[HistoricalRecord], limit: usize, json: bool) -> Result<()> {
    let newest: Vec<&HistoricalRecord> = records.iter().rev().take(limit).collect();
    if json {
        return print_json(&newest);
    }
    if newest.is_empty() {
        println!("No recorded outcomes.");
        return Ok(());
    }
    for r in newest {
        println!(
            "{}  {:>6}  {}  {}",
            style(r.timestamp.format("%Y-%m-%d %H:%M")).dim(),
            r.results_count,
            r.query_text,
            style(r.platforms.join(",")).dim()
        );
    }
    Ok(())
}

pub fn print_cleared(removed: usize, json: bool) -> Result<()> {
    if json {
        return print_json(&json!({ "cleared": removed }));
    }
    println!("Cleared {removed} records.");
    Ok(())
}
