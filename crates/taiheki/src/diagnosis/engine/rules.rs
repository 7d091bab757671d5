use std::collections::HashMap;

use super::super::domain::{Answer, Question, QuestionCategory, QuestionKind, ScoreMap, TypeScores};
use super::super::error::ScoringFault;

/// Extra weight granted to every answer once the whole catalogue is answered.
const PROGRESS_BONUS: f64 = 0.2;
const SELECTION_DECAY: f64 = 0.15;
const SELECTION_FLOOR: f64 = 0.5;

pub(crate) fn category_multiplier(category: QuestionCategory) -> f64 {
    match category {
        QuestionCategory::Physical => 1.2,
        QuestionCategory::Behavioral => 1.1,
        QuestionCategory::Mental => 1.0,
        QuestionCategory::Social => 0.9,
        QuestionCategory::Other => 1.0,
    }
}

/// Multiplier applied to every option of a multi-select answer.
pub(crate) fn selection_penalty(selected: usize) -> f64 {
    if selected <= 1 {
        return 1.0;
    }
    (1.0 - (selected - 1) as f64 * SELECTION_DECAY).max(SELECTION_FLOOR)
}

/// Base weight scaled by category and by how much of the catalogue the batch covers.
///
/// Every answer in one batch shares the same progress multiplier.
pub(crate) fn dynamic_weight(question: &Question, answered: usize, total: usize) -> f64 {
    let progress = 1.0 + (answered as f64 / total as f64) * PROGRESS_BONUS;
    question.weight * category_multiplier(question.category) * progress
}

pub(crate) fn score_answers(
    answers: &[Answer],
    questions: &[Question],
    index: &HashMap<u32, usize>,
) -> Result<TypeScores, ScoringFault> {
    let total = questions.len();
    let answered = answers.len();
    let mut scores = TypeScores::default();

    for answer in answers {
        let question = index
            .get(&answer.question_id)
            .and_then(|slot| questions.get(*slot))
            .ok_or(ScoringFault::MissingQuestion(answer.question_id))?;
        let weight = dynamic_weight(question, answered, total);

        match &question.kind {
            QuestionKind::Single { options } => {
                let penalty = selection_penalty(answer.selected_options.len());
                for &option_index in &answer.selected_options {
                    let option = options.get(option_index).ok_or(ScoringFault::OptionOutOfRange {
                        question_id: question.id,
                        option_index,
                    })?;
                    let factor = weight * penalty * option.confidence();
                    accumulate(&mut scores, question.id, &option.scores, factor)?;
                }
            }
            QuestionKind::Scale { scale_options } => {
                let Some(&option_index) = answer.selected_options.first() else {
                    continue;
                };
                let option = scale_options.get(option_index).ok_or(ScoringFault::OptionOutOfRange {
                    question_id: question.id,
                    option_index,
                })?;
                accumulate(&mut scores, question.id, &option.scores, weight)?;
            }
        }
    }

    Ok(scores)
}

// Each term is floored on its own; flooring the sum instead shifts final scores.
fn accumulate(
    scores: &mut TypeScores,
    question_id: u32,
    points: &ScoreMap,
    factor: f64,
) -> Result<(), ScoringFault> {
    for (&ty, &raw) in points {
        let contribution = (raw * factor).floor();
        if !contribution.is_finite() {
            return Err(ScoringFault::NonFiniteContribution { question_id, ty });
        }
        scores.add(ty, contribution as i64);
    }
    Ok(())
}
