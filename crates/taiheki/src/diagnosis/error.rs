use super::domain::{Answer, TaihekiType};

/// Errors raised while building an engine or scoring a batch of answers.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error("no questions provided")]
    EmptyCatalogue,
    #[error("question {question_id} is invalid: {reason}")]
    InvalidQuestion { question_id: u32, reason: String },
    #[error("no answers provided")]
    NoAnswers,
    #[error("question not found: {0}")]
    QuestionNotFound(u32),
    #[error("too many selections for question {question_id}: {selected} (max {max})")]
    TooManySelections {
        question_id: u32,
        selected: usize,
        max: usize,
    },
    #[error("invalid answer for question {question_id}: {detail}")]
    InvalidAnswer { question_id: u32, detail: String },
    #[error("diagnosis calculation failed for {} answer(s): {source}", .answers.len())]
    CalculationFailed {
        #[source]
        source: ScoringFault,
        answers: Vec<Answer>,
    },
}

impl DiagnosisError {
    /// True for caller mistakes; false for internal faults.
    pub fn is_validation(&self) -> bool {
        !matches!(self, DiagnosisError::CalculationFailed { .. })
    }

    pub const fn code(&self) -> &'static str {
        match self {
            DiagnosisError::EmptyCatalogue => "EMPTY_CATALOGUE",
            DiagnosisError::InvalidQuestion { .. } => "INVALID_QUESTION",
            DiagnosisError::NoAnswers => "NO_ANSWERS",
            DiagnosisError::QuestionNotFound(_) => "QUESTION_NOT_FOUND",
            DiagnosisError::TooManySelections { .. } => "TOO_MANY_SELECTIONS",
            DiagnosisError::InvalidAnswer { .. } => "INVALID_ANSWER",
            DiagnosisError::CalculationFailed { .. } => "CALCULATION_ERROR",
        }
    }

    pub(crate) fn invalid_question(question_id: u32, reason: impl Into<String>) -> Self {
        DiagnosisError::InvalidQuestion {
            question_id,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_answer(question_id: u32, detail: impl Into<String>) -> Self {
        DiagnosisError::InvalidAnswer {
            question_id,
            detail: detail.into(),
        }
    }
}

/// Unexpected failure inside the scoring fold.
#[derive(Debug, thiserror::Error)]
pub enum ScoringFault {
    #[error("question {0} vanished from the engine index")]
    MissingQuestion(u32),
    #[error("question {question_id} has no option {option_index}")]
    OptionOutOfRange { question_id: u32, option_index: usize },
    #[error("question {question_id} produced a non-finite contribution for {ty:?}")]
    NonFiniteContribution { question_id: u32, ty: TaihekiType },
    #[error("score cache lock poisoned")]
    CachePoisoned,
}
