use crate::infra::{build_service, parse_timestamp, read_answers};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use taiheki::config::AppConfig;
use taiheki::diagnosis::{
    BulkDiagnosisRequest, BulkDiagnosisResponse, CatalogueSummary, ProgressRequest,
    ProgressResult, Question, QuestionKind,
};
use taiheki::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// JSON file holding one answer per catalogue question
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Question catalogue JSON (defaults to TAIHEKI_CATALOGUE_PATH or the built-in set)
    #[arg(long)]
    pub(crate) catalogue: Option<PathBuf>,
    /// When the quiz was opened (RFC 3339), used to report completion time
    #[arg(long, value_parser = crate::infra::parse_timestamp)]
    pub(crate) started_at: Option<DateTime<Utc>>,
    /// Print the raw JSON response instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ProgressArgs {
    /// JSON file holding the answers given so far
    #[arg(long)]
    pub(crate) answers: PathBuf,
    #[arg(long)]
    pub(crate) catalogue: Option<PathBuf>,
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct QuestionsArgs {
    #[arg(long)]
    pub(crate) catalogue: Option<PathBuf>,
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.diagnosis, args.catalogue.as_deref())?;
    let answers = read_answers(&args.answers)?;

    let response = service.diagnose(BulkDiagnosisRequest {
        answers,
        start_time: args.started_at,
    })?;

    if args.json {
        return print_json(&response);
    }
    println!("{}", diagnosis_lines(&response).join("\n"));
    Ok(())
}

pub(crate) fn run_progress(args: ProgressArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.diagnosis, args.catalogue.as_deref())?;
    let answers = read_answers(&args.answers)?;

    let progress = service.progress(ProgressRequest { answers })?;

    if args.json {
        return print_json(&progress);
    }
    println!("{}", progress_lines(&progress).join("\n"));
    Ok(())
}

pub(crate) fn run_questions(args: QuestionsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let service = build_service(&config.diagnosis, args.catalogue.as_deref())?;

    if args.json {
        return print_json(&service.questions());
    }
    println!(
        "{}",
        question_lines(service.questions(), service.summary()).join("\n")
    );
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}

pub(crate) fn diagnosis_lines(response: &BulkDiagnosisResponse) -> Vec<String> {
    let result = &response.result;
    let mut lines = vec![
        "Taiheki diagnosis".to_string(),
        format!(
            "Primary: {} ({}) with {} points",
            result.primary_type.label(),
            result.primary_type.family().label(),
            result.primary_score
        ),
        format!(
            "Secondary: {} ({}) with {} points",
            result.secondary_type.label(),
            result.secondary_type.family().label(),
            result.secondary_score
        ),
        format!(
            "Confidence {:.2} | Reliability {} {}",
            result.confidence, result.reliability_text, result.reliability_stars
        ),
        format!("Questions answered: {}", result.total_questions),
    ];

    if let Some(seconds) = result.completion_time {
        lines.push(format!("Completion time: {}m {:02}s", seconds / 60, seconds % 60));
    }

    lines.push(String::new());
    lines.push("Scores".to_string());
    for (ty, score) in result.all_scores.ranked() {
        lines.push(format!("- {:<8} {:>4}", ty.label(), score));
    }

    lines.push(String::new());
    lines.push(format!("Answer pattern: {}", response.answer_pattern_hash));
    lines.push(format!("Processed in {} ms", response.processing_time_ms));
    lines
}

pub(crate) fn progress_lines(progress: &ProgressResult) -> Vec<String> {
    let mut lines = vec![
        format!(
            "Progress {:.0}% ({} questions remaining)",
            progress.completion_rate * 100.0,
            progress.questions_remaining
        ),
        format!("Overall confidence {:.2}", progress.overall_confidence),
        "Leading candidates".to_string(),
    ];

    for candidate in &progress.top_candidates {
        lines.push(format!(
            "- {}: {} points ({:.0}% of leader)",
            candidate.ty.label(),
            candidate.score,
            candidate.confidence * 100.0
        ));
    }
    lines
}

pub(crate) fn question_lines(questions: &[Question], summary: &CatalogueSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "{} questions | average weight {:.2}",
        summary.total_questions, summary.average_weight
    )];

    for (category, count) in &summary.category_counts {
        lines.push(format!("- {}: {}", category.label(), count));
    }

    lines.push(String::new());
    for question in questions {
        let kind = match &question.kind {
            QuestionKind::Single { .. } => "choice",
            QuestionKind::Scale { .. } => "scale",
        };
        lines.push(format!(
            "Q{} [{}, {}, weight {:.1}, up to {}] {}",
            question.id,
            question.category.label(),
            kind,
            question.weight,
            question.max_selections,
            question.text
        ));
    }
    lines
}
