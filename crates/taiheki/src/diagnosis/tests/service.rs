use super::common::*;
use crate::diagnosis::{
    Answer, BulkDiagnosisRequest, DiagnosisError, DiagnosisService, DiagnosisServiceError,
    EngineConfig, JsonCatalogue, ProgressRequest, QuestionCategory,
};

#[test]
fn diagnose_returns_hash_and_timing() {
    let service = build_service();
    let answers = first_option_answers(20);

    let response = service
        .diagnose(BulkDiagnosisRequest {
            answers: answers.clone(),
            start_time: None,
        })
        .expect("diagnosis succeeds");

    assert_eq!(
        response.answer_pattern_hash,
        crate::diagnosis::answer_pattern_hash(&answers)
    );
    assert_eq!(response.result.total_questions, 20);
    assert!(response.result.primary_score >= response.result.secondary_score);
}

#[test]
fn diagnose_requires_every_question() {
    let service = build_service();

    let error = service
        .diagnose(BulkDiagnosisRequest {
            answers: first_option_answers(19),
            start_time: None,
        })
        .expect_err("one answer is missing");

    assert!(matches!(
        error,
        DiagnosisServiceError::IncompleteAnswers {
            expected: 20,
            received: 19
        }
    ));
    assert!(error.is_client_error());
    assert_eq!(error.code(), "INCOMPLETE_ANSWERS");
}

#[test]
fn diagnose_rejects_repeated_question_in_full_length_batch() {
    let service = build_service();
    let mut answers = first_option_answers(19);
    answers.push(Answer::new(1, [1]));

    let error = service
        .diagnose(BulkDiagnosisRequest {
            answers,
            start_time: None,
        })
        .expect_err("question 1 answered twice, question 20 skipped");

    assert!(matches!(
        error,
        DiagnosisServiceError::Diagnosis(DiagnosisError::InvalidAnswer { question_id: 1, .. })
    ));
    assert!(error.is_client_error());
    assert_eq!(error.code(), "INVALID_ANSWER");
}

#[test]
fn diagnose_surfaces_engine_validation() {
    let service = build_service();
    let mut answers = first_option_answers(20);
    answers[4] = Answer::new(5, [0, 1, 2]);

    let error = service
        .diagnose(BulkDiagnosisRequest {
            answers,
            start_time: None,
        })
        .expect_err("too many selections");

    assert!(matches!(
        error,
        DiagnosisServiceError::Diagnosis(DiagnosisError::TooManySelections { .. })
    ));
    assert!(error.is_client_error());
}

#[test]
fn progress_delegates_to_engine() {
    let service = build_service();

    let progress = service
        .progress(ProgressRequest {
            answers: first_option_answers(10),
        })
        .expect("progress succeeds");

    assert_eq!(progress.completion_rate, 0.5);
    assert_eq!(progress.questions_remaining, 10);
}

#[test]
fn catalogue_lookups_and_summary() {
    let service = build_service();

    assert_eq!(service.questions().len(), 20);
    assert_eq!(
        service.question(13).map(|question| question.category),
        Some(QuestionCategory::Social)
    );
    assert!(service.question(21).is_none());
    assert_eq!(service.summary().total_questions, 20);
}

#[test]
fn missing_catalogue_file_is_a_server_error() {
    let catalogue = JsonCatalogue::new("/nonexistent/questions.json");

    let error = match DiagnosisService::from_catalogue(&catalogue, EngineConfig::default()) {
        Ok(_) => panic!("catalogue file does not exist"),
        Err(error) => error,
    };

    assert!(matches!(error, DiagnosisServiceError::Catalogue(_)));
    assert!(!error.is_client_error());
}

#[test]
fn json_catalogue_feeds_the_service() {
    let path = std::env::temp_dir().join(format!(
        "taiheki-catalogue-{}.json",
        std::process::id()
    ));
    let questions = leaning_catalogue(3);
    std::fs::write(&path, serde_json::to_vec(&questions).expect("serialize")).expect("write");

    let catalogue = JsonCatalogue::new(&path);
    let service = DiagnosisService::from_catalogue(&catalogue, EngineConfig::default());
    std::fs::remove_file(&path).ok();

    let service = match service {
        Ok(service) => service,
        Err(error) => panic!("catalogue should load: {error}"),
    };
    assert_eq!(service.questions(), questions.as_slice());
}
