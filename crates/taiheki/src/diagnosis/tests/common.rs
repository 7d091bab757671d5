use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::diagnosis::{
    Answer, ChoiceOption, DiagnosisEngine, DiagnosisService, EngineConfig, Question,
    QuestionCategory, QuestionKind, QuestionCatalogue, ScaleOption, ScoreMap, StandardCatalogue,
    TaihekiType,
};

pub(super) fn option(scores: &[(TaihekiType, f64)]) -> ChoiceOption {
    ChoiceOption {
        text: "option".to_string(),
        scores: scores.iter().copied().collect(),
        confidence_level: None,
    }
}

pub(super) fn choice_question(
    id: u32,
    category: QuestionCategory,
    max_selections: usize,
    options: Vec<ChoiceOption>,
) -> Question {
    Question {
        id,
        text: format!("question {id}"),
        category,
        weight: 1.0,
        max_selections,
        kind: QuestionKind::Single { options },
    }
}

pub(super) fn scale_question(id: u32, points: usize) -> Question {
    let scale_options = (0..points)
        .map(|value| ScaleOption {
            value: value as u8 + 1,
            scores: ScoreMap::new(),
        })
        .collect();

    Question {
        id,
        text: format!("scale {id}"),
        category: QuestionCategory::Mental,
        weight: 1.0,
        max_selections: 1,
        kind: QuestionKind::Scale { scale_options },
    }
}

/// `count` mental questions whose first option scores `points` for `ty` only.
pub(super) fn uniform_catalogue(count: u32, ty: TaihekiType, points: f64) -> Vec<Question> {
    (1..=count)
        .map(|id| {
            choice_question(
                id,
                QuestionCategory::Mental,
                2,
                vec![
                    option(&[(ty, points)]),
                    option(&[]),
                    option(&[]),
                    option(&[]),
                ],
            )
        })
        .collect()
}

/// `count` mental questions whose first option favours type 1 over type 2 by 3:2.
pub(super) fn leaning_catalogue(count: u32) -> Vec<Question> {
    (1..=count)
        .map(|id| {
            choice_question(
                id,
                QuestionCategory::Mental,
                2,
                vec![
                    option(&[(TaihekiType::Type1, 3.0), (TaihekiType::Type2, 2.0)]),
                    option(&[(TaihekiType::Type3, 1.0)]),
                ],
            )
        })
        .collect()
}

pub(super) fn first_option_answers(count: u32) -> Vec<Answer> {
    (1..=count).map(|id| Answer::new(id, [0])).collect()
}

pub(super) fn engine(questions: Vec<Question>) -> DiagnosisEngine {
    DiagnosisEngine::new(questions, EngineConfig::default()).expect("catalogue is valid")
}

pub(super) fn standard_engine() -> DiagnosisEngine {
    let questions = StandardCatalogue.questions().expect("standard questions");
    engine(questions)
}

pub(super) fn build_service() -> DiagnosisService {
    DiagnosisService::from_catalogue(&StandardCatalogue, EngineConfig::default())
        .expect("standard service builds")
}

pub(super) fn diagnosis_router_with_service(service: DiagnosisService) -> axum::Router {
    crate::diagnosis::diagnosis_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
