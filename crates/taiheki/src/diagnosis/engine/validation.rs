use std::collections::{HashMap, HashSet};

use super::super::domain::{Answer, Question, QuestionKind, ScoreMap};
use super::super::error::DiagnosisError;
use super::config::EngineConfig;

pub(crate) const SCALE_POINTS: usize = 5;

/// Checks every catalogue invariant and returns a question-id to position index.
pub(crate) fn validate_catalogue(
    questions: &[Question],
    config: &EngineConfig,
) -> Result<HashMap<u32, usize>, DiagnosisError> {
    if questions.is_empty() {
        return Err(DiagnosisError::EmptyCatalogue);
    }

    let mut index = HashMap::with_capacity(questions.len());
    for (position, question) in questions.iter().enumerate() {
        if question.id == 0 {
            return Err(DiagnosisError::invalid_question(0, "id must be positive"));
        }
        if index.insert(question.id, position).is_some() {
            return Err(DiagnosisError::invalid_question(
                question.id,
                "duplicate question id",
            ));
        }
        if !question.weight.is_finite() || question.weight < 0.0 {
            return Err(DiagnosisError::invalid_question(
                question.id,
                format!("weight {} must be finite and non-negative", question.weight),
            ));
        }

        match &question.kind {
            QuestionKind::Single { options } => {
                if options.len() > config.max_options_per_question {
                    return Err(DiagnosisError::invalid_question(
                        question.id,
                        format!(
                            "too many options: {} (max {})",
                            options.len(),
                            config.max_options_per_question
                        ),
                    ));
                }
                for (option_index, option) in options.iter().enumerate() {
                    if let Some(level) = option.confidence_level {
                        if !(0.0..=1.0).contains(&level) {
                            return Err(DiagnosisError::invalid_question(
                                question.id,
                                format!(
                                    "option {option_index} confidence level {level} outside [0, 1]"
                                ),
                            ));
                        }
                    }
                    check_scores(question.id, option_index, &option.scores)?;
                }
            }
            QuestionKind::Scale { scale_options } => {
                if scale_options.len() != SCALE_POINTS {
                    return Err(DiagnosisError::invalid_question(
                        question.id,
                        format!(
                            "scale questions need exactly {SCALE_POINTS} options, found {}",
                            scale_options.len()
                        ),
                    ));
                }
                for (option_index, option) in scale_options.iter().enumerate() {
                    check_scores(question.id, option_index, &option.scores)?;
                }
            }
        }
    }

    Ok(index)
}

fn check_scores(
    question_id: u32,
    option_index: usize,
    scores: &ScoreMap,
) -> Result<(), DiagnosisError> {
    match scores.iter().find(|(_, points)| !points.is_finite()) {
        Some((ty, _)) => Err(DiagnosisError::invalid_question(
            question_id,
            format!("option {option_index} has a non-finite score for {ty:?}"),
        )),
        None => Ok(()),
    }
}

/// Structural checks shared by final and progressive scoring.
pub(crate) fn validate_answers(
    answers: &[Answer],
    questions: &[Question],
    index: &HashMap<u32, usize>,
) -> Result<(), DiagnosisError> {
    let mut answered = HashSet::with_capacity(answers.len());
    for answer in answers {
        let question = index
            .get(&answer.question_id)
            .and_then(|position| questions.get(*position))
            .ok_or(DiagnosisError::QuestionNotFound(answer.question_id))?;

        if !answered.insert(answer.question_id) {
            return Err(DiagnosisError::invalid_answer(
                answer.question_id,
                "question answered more than once",
            ));
        }

        let selected = answer.selected_options.len();
        if selected > question.max_selections {
            return Err(DiagnosisError::TooManySelections {
                question_id: answer.question_id,
                selected,
                max: question.max_selections,
            });
        }

        let option_count = question.option_count();
        let mut seen = HashSet::with_capacity(selected);
        for &option_index in &answer.selected_options {
            if option_index >= option_count {
                return Err(DiagnosisError::invalid_answer(
                    answer.question_id,
                    format!("option index {option_index} out of range (0..{option_count})"),
                ));
            }
            if !seen.insert(option_index) {
                return Err(DiagnosisError::invalid_answer(
                    answer.question_id,
                    format!("option index {option_index} selected twice"),
                ));
            }
        }

        if matches!(question.kind, QuestionKind::Scale { .. }) && selected == 0 {
            return Err(DiagnosisError::invalid_answer(
                answer.question_id,
                "scale question answered without a selection",
            ));
        }
    }

    Ok(())
}
