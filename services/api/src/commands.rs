use appraisal::error::AppError;
use appraisal::publications::PublicationDataset;
use appraisal::scoring::{
    classify_index, compute_score, PublicationCounts, ScoreBreakdown, TeachingCell,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PublicationSearchArgs {
    /// Publication CSV export to search
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Text to look for; omit to list every publication
    pub(crate) query: Option<String>,
    /// Print at most this many matches
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Teaching score cell; repeat per row. Unparseable values count as 0
    #[arg(long = "teaching")]
    pub(crate) teaching: Vec<String>,
    /// Selected SCI publications
    #[arg(long, default_value_t = 0)]
    pub(crate) sci: u32,
    /// Selected Non-SCI (ESCI) publications
    #[arg(long, default_value_t = 0)]
    pub(crate) non_sci: u32,
    /// Selected Scopus publications
    #[arg(long, default_value_t = 0)]
    pub(crate) scopus: u32,
    /// Rows in the projects table
    #[arg(long, default_value_t = 0)]
    pub(crate) projects: u32,
    /// Emit the breakdown as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_publication_search(args: PublicationSearchArgs) -> Result<(), AppError> {
    let PublicationSearchArgs { csv, query, limit } = args;

    let dataset = PublicationDataset::from_path(&csv)?;
    let hits = dataset.search(query.as_deref());

    println!(
        "Publication search in {} ({} records)",
        csv.display(),
        dataset.len()
    );
    match query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => println!("Query: \"{q}\" -> {} match(es)", hits.len()),
        None => println!("No query: listing all {} record(s)", hits.len()),
    }

    for record in hits.iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "- [{}] {} | {} | {} ({:?}) | {}",
            record.row,
            record.title,
            record.authors,
            record.index_label,
            classify_index(&record.index_label),
            record.year
        );
    }

    Ok(())
}

pub(crate) fn score_from_args(args: &ScoreArgs) -> ScoreBreakdown {
    let teaching: Vec<TeachingCell> = args
        .teaching
        .iter()
        .map(|raw| TeachingCell::from_raw(raw))
        .collect();
    let counts = PublicationCounts {
        sci: args.sci,
        non_sci: args.non_sci,
        scopus: args.scopus,
    };
    compute_score(&teaching, counts, args.projects)
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let breakdown = score_from_args(&args);

    if args.json {
        match serde_json::to_string_pretty(&breakdown) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("Score breakdown unavailable: {err}"),
        }
        return Ok(());
    }

    render_breakdown(&breakdown);
    Ok(())
}

fn render_breakdown(breakdown: &ScoreBreakdown) {
    println!("Appraisal score");
    println!("- Teaching: {}", breakdown.teaching_score);
    println!(
        "- Publications: {} ({} SCI | {} Non-SCI | {} Scopus)",
        breakdown.publication_points(),
        breakdown.sci_count,
        breakdown.non_sci_count,
        breakdown.scopus_count
    );
    println!(
        "- Projects: {} ({} project(s))",
        breakdown.project_points(),
        breakdown.project_count
    );
    println!(
        "Total: {} -> {}",
        breakdown.total_score, breakdown.rating
    );
}
