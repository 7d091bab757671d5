use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::domain::{ChoiceOption, Question, QuestionCategory, QuestionKind, TaihekiType as T};

/// Source of the ordered question list an engine is built from.
pub trait QuestionCatalogue: Send + Sync {
    fn questions(&self) -> Result<Vec<Question>, CatalogueError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalogue {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads a JSON array of questions from disk on every call.
#[derive(Debug, Clone)]
pub struct JsonCatalogue {
    path: PathBuf,
}

impl JsonCatalogue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionCatalogue for JsonCatalogue {
    fn questions(&self) -> Result<Vec<Question>, CatalogueError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| CatalogueError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CatalogueError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

/// The built-in twenty-question quiz.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCatalogue;

impl QuestionCatalogue for StandardCatalogue {
    fn questions(&self) -> Result<Vec<Question>, CatalogueError> {
        Ok(standard_questions())
    }
}

/// Aggregate figures describing a catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueSummary {
    pub total_questions: usize,
    pub category_counts: BTreeMap<QuestionCategory, usize>,
    pub average_weight: f64,
    /// Number of questions allowing each `max_selections` value.
    pub max_selections: BTreeMap<usize, usize>,
}

impl CatalogueSummary {
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut category_counts = BTreeMap::new();
        let mut max_selections = BTreeMap::new();
        let mut total_weight = 0.0;

        for question in questions {
            *category_counts.entry(question.category).or_insert(0) += 1;
            *max_selections.entry(question.max_selections).or_insert(0) += 1;
            total_weight += question.weight;
        }

        let average_weight = if questions.is_empty() {
            0.0
        } else {
            total_weight / questions.len() as f64
        };

        Self {
            total_questions: questions.len(),
            category_counts,
            average_weight,
            max_selections,
        }
    }
}

const STANDARD_MAX_SELECTIONS: usize = 2;

fn choice(text: &str, confidence: f64, scores: &[(T, f64)]) -> ChoiceOption {
    ChoiceOption {
        text: text.to_string(),
        scores: scores.iter().copied().collect(),
        confidence_level: Some(confidence),
    }
}

fn question(
    id: u32,
    text: &str,
    category: QuestionCategory,
    weight: f64,
    options: [ChoiceOption; 4],
) -> Question {
    Question {
        id,
        text: text.to_string(),
        category,
        weight,
        max_selections: STANDARD_MAX_SELECTIONS,
        kind: QuestionKind::Single {
            options: options.into(),
        },
    }
}

fn standard_questions() -> Vec<Question> {
    use QuestionCategory::{Behavioral, Mental, Physical, Social};

    vec![
        question(
            1,
            "Which best describes your body shape?",
            Physical,
            1.2,
            [
                choice("Tall and slender", 0.9, &[(T::Type1, 3.0), (T::Type2, 2.5)]),
                choice("Broad and solid", 0.9, &[(T::Type9, 3.0), (T::Type10, 2.8)]),
                choice("Deep chest and back, three-dimensional", 0.85, &[(T::Type5, 3.2), (T::Type6, 2.5)]),
                choice("Noticeably twisting movements", 0.8, &[(T::Type7, 3.5), (T::Type8, 2.8)]),
            ],
        ),
        question(
            2,
            "What stands out about the way you walk or stand?",
            Physical,
            1.0,
            [
                choice("Straight back and tidy posture", 0.85, &[(T::Type1, 2.8), (T::Type2, 3.0)]),
                choice("A rhythmic, side-to-side sway", 0.9, &[(T::Type3, 3.2), (T::Type4, 2.2)]),
                choice("Leaning forward, always hurrying", 0.9, &[(T::Type5, 3.5), (T::Type6, 1.8)]),
                choice("Slow and steady", 0.8, &[(T::Type9, 2.5), (T::Type10, 3.0)]),
            ],
        ),
        question(
            3,
            "How do you tend to make decisions?",
            Behavioral,
            1.1,
            [
                choice("Analyse logically, then conclude", 0.9, &[(T::Type1, 3.5), (T::Type4, 2.0)]),
                choice("Go with intuition and the mood of the moment", 0.8, &[(T::Type3, 3.0), (T::Type7, 2.5)]),
                choice("Take time and weigh things carefully", 0.85, &[(T::Type2, 3.2), (T::Type6, 2.8)]),
                choice("Decide quickly, favouring efficiency", 0.9, &[(T::Type5, 3.8), (T::Type8, 2.2)]),
            ],
        ),
        question(
            4,
            "When do you feel stressed?",
            Behavioral,
            1.0,
            [
                choice("When something makes no logical sense", 0.85, &[(T::Type1, 3.0), (T::Type2, 2.5)]),
                choice("When relationships are not going well", 0.9, &[(T::Type3, 2.8), (T::Type4, 3.5)]),
                choice("When time is wasted on inefficiency", 0.8, &[(T::Type5, 3.2), (T::Type8, 2.0)]),
                choice(
                    "When things change too fast to settle",
                    0.75,
                    &[(T::Type6, 2.5), (T::Type9, 3.0), (T::Type10, 2.8)],
                ),
            ],
        ),
        question(
            5,
            "What is your style of working or studying?",
            Behavioral,
            1.15,
            [
                choice("Plan first, then proceed step by step", 0.9, &[(T::Type1, 2.8), (T::Type2, 3.5)]),
                choice("Value communication with others", 0.85, &[(T::Type3, 3.8), (T::Type10, 2.5)]),
                choice("Move fast and stay efficient", 0.95, &[(T::Type5, 4.0), (T::Type7, 2.2)]),
                choice("Focus deeply on one thing", 0.9, &[(T::Type6, 2.8), (T::Type9, 3.5)]),
            ],
        ),
        question(
            6,
            "How do you think things through?",
            Mental,
            1.0,
            [
                choice("Build a logical chain of reasoning", 0.95, &[(T::Type1, 3.8), (T::Type4, 1.8)]),
                choice("Trust feelings and intuition", 0.9, &[(T::Type3, 3.5), (T::Type6, 2.8)]),
                choice("Compare with past experience", 0.8, &[(T::Type2, 3.0), (T::Type8, 2.5)]),
                choice("Look at the whole picture at once", 0.85, &[(T::Type9, 2.5), (T::Type10, 3.2)]),
            ],
        ),
        question(
            7,
            "How do you approach new things?",
            Mental,
            1.0,
            [
                choice("Understand it before starting", 0.85, &[(T::Type1, 2.8), (T::Type2, 3.2)]),
                choice("Jump in if it looks fun", 0.9, &[(T::Type3, 3.5), (T::Type7, 2.8)]),
                choice("Judge whether it pays off, then act", 0.8, &[(T::Type5, 3.0), (T::Type8, 2.2)]),
                choice(
                    "Watch carefully before joining in",
                    0.75,
                    &[(T::Type4, 2.5), (T::Type6, 2.8), (T::Type9, 3.0)],
                ),
            ],
        ),
        question(
            8,
            "How do you relate to other people?",
            Social,
            0.9,
            [
                choice("Fair and consistent with everyone", 0.85, &[(T::Type1, 3.0), (T::Type4, 2.8)]),
                choice("Cheerful and sociable, the life of the party", 0.95, &[(T::Type3, 4.0), (T::Type10, 2.5)]),
                choice("Responsible and caring", 0.9, &[(T::Type2, 2.8), (T::Type8, 3.5)]),
                choice(
                    "Independent, keeping to your own pace",
                    0.8,
                    &[(T::Type5, 2.2), (T::Type6, 3.0), (T::Type9, 2.8)],
                ),
            ],
        ),
        question(
            9,
            "Which best describes how you express emotion?",
            Mental,
            1.1,
            [
                choice(
                    "Rarely show it and stay calm",
                    0.9,
                    &[(T::Type1, 2.5), (T::Type4, 3.5), (T::Type9, 2.0)],
                ),
                choice("Expressive, it shows on your face", 0.95, &[(T::Type3, 4.0), (T::Type7, 2.5)]),
                choice("Prone to worry and anxiety", 0.9, &[(T::Type2, 3.8), (T::Type6, 2.2)]),
                choice("Quick-tempered but warm-hearted", 0.85, &[(T::Type7, 3.2), (T::Type8, 3.0)]),
            ],
        ),
        question(
            10,
            "What stands out about your taste in food?",
            Physical,
            1.0,
            [
                choice("Light, refined flavours", 0.8, &[(T::Type1, 2.8), (T::Type4, 2.5)]),
                choice("Loves good food, eating is a joy", 0.9, &[(T::Type3, 3.5), (T::Type10, 3.0)]),
                choice("Nutritional balance and efficiency", 0.8, &[(T::Type2, 2.5), (T::Type5, 3.0)]),
                choice("Strong or spicy flavours", 0.85, &[(T::Type7, 3.2), (T::Type8, 2.8)]),
            ],
        ),
        question(
            11,
            "How do you recover when tired?",
            Behavioral,
            1.0,
            [
                choice(
                    "Rest quietly on your own",
                    0.8,
                    &[(T::Type1, 2.5), (T::Type4, 2.8), (T::Type6, 3.0), (T::Type9, 2.5)],
                ),
                choice("Talk with people or do something fun", 0.9, &[(T::Type3, 3.8), (T::Type7, 2.5)]),
                choice("Sleep early and keep a regular routine", 0.85, &[(T::Type2, 3.2), (T::Type5, 2.0)]),
                choice(
                    "Move your body and work up a sweat",
                    0.85,
                    &[(T::Type5, 2.8), (T::Type7, 3.0), (T::Type8, 2.5)],
                ),
            ],
        ),
        question(
            12,
            "What is your concentration like?",
            Mental,
            1.2,
            [
                choice(
                    "Once focused, it lasts for hours",
                    0.9,
                    &[(T::Type1, 2.8), (T::Type6, 3.0), (T::Type9, 3.8)],
                ),
                choice("Uneven, depends on interest", 0.8, &[(T::Type3, 3.0), (T::Type7, 2.5)]),
                choice("Intense even in short bursts", 0.9, &[(T::Type5, 3.5), (T::Type8, 2.2)]),
                choice(
                    "Easily swayed by surroundings",
                    0.85,
                    &[(T::Type2, 2.5), (T::Type4, 3.2), (T::Type10, 2.8)],
                ),
            ],
        ),
        question(
            13,
            "What kind of leader are you?",
            Social,
            1.1,
            [
                choice("Guides the team with fair, logical judgement", 0.9, &[(T::Type1, 3.5), (T::Type4, 2.0)]),
                choice("Pulls people along with charisma", 0.9, &[(T::Type3, 2.8), (T::Type7, 3.8)]),
                choice("Takes responsibility in a supporting role", 0.85, &[(T::Type2, 3.0), (T::Type8, 3.5)]),
                choice("Brings everyone together through acceptance", 0.95, &[(T::Type6, 2.5), (T::Type10, 4.0)]),
            ],
        ),
        question(
            14,
            "Which best describes how you use your time?",
            Behavioral,
            1.0,
            [
                choice("Plan properly and act on schedule", 0.9, &[(T::Type1, 2.8), (T::Type2, 3.5)]),
                choice("Stay flexible with mood and circumstance", 0.8, &[(T::Type3, 3.2), (T::Type6, 2.5)]),
                choice("Cut waste and prioritise efficiency", 0.95, &[(T::Type5, 4.0), (T::Type9, 2.2)]),
                choice(
                    "Leave plenty of slack and take it easy",
                    0.85,
                    &[(T::Type4, 2.0), (T::Type8, 2.8), (T::Type10, 3.2)],
                ),
            ],
        ),
        question(
            15,
            "How do you feel about competition?",
            Social,
            1.0,
            [
                choice("A fair process matters more than winning", 0.85, &[(T::Type1, 3.0), (T::Type2, 2.5)]),
                choice("Loves a contest and hates to lose", 0.95, &[(T::Type3, 2.8), (T::Type7, 4.0)]),
                choice(
                    "Prefers cooperation to competing",
                    0.85,
                    &[(T::Type4, 3.2), (T::Type6, 2.8), (T::Type10, 3.0)],
                ),
                choice(
                    "Works calmly to personal standards",
                    0.8,
                    &[(T::Type5, 2.5), (T::Type8, 2.8), (T::Type9, 3.2)],
                ),
            ],
        ),
        question(
            16,
            "What is your aesthetic or artistic taste?",
            Mental,
            1.1,
            [
                choice("Simple and refined", 0.85, &[(T::Type1, 3.0), (T::Type4, 2.8)]),
                choice("Bright and festive", 0.9, &[(T::Type3, 3.5), (T::Type10, 2.5)]),
                choice("Practical, beauty in function", 0.8, &[(T::Type2, 2.5), (T::Type5, 3.2)]),
                choice(
                    "Unusual and distinctive",
                    0.9,
                    &[(T::Type6, 3.8), (T::Type7, 2.2), (T::Type9, 3.0)],
                ),
            ],
        ),
        question(
            17,
            "How do you respond to difficulties?",
            Behavioral,
            1.0,
            [
                choice("Analyse calmly and find a solution", 0.9, &[(T::Type1, 3.5), (T::Type4, 2.5)]),
                choice("Ask people around you for help", 0.85, &[(T::Type3, 3.0), (T::Type10, 3.2)]),
                choice("Face it head-on and push through", 0.9, &[(T::Type5, 3.2), (T::Type7, 3.8)]),
                choice(
                    "Think it over and proceed carefully",
                    0.8,
                    &[(T::Type2, 3.0), (T::Type6, 2.8), (T::Type8, 2.5), (T::Type9, 2.8)],
                ),
            ],
        ),
        question(
            18,
            "How do you spend your home and private life?",
            Social,
            1.0,
            [
                choice("Tidy and regular", 0.85, &[(T::Type1, 2.8), (T::Type2, 3.2)]),
                choice("Lively, with family and friends", 0.9, &[(T::Type3, 3.5), (T::Type10, 3.8)]),
                choice("Efficient, without waste", 0.85, &[(T::Type5, 3.2), (T::Type9, 2.5)]),
                choice(
                    "Relaxed, protecting your own time",
                    0.85,
                    &[(T::Type4, 2.8), (T::Type6, 3.5), (T::Type8, 2.2)],
                ),
            ],
        ),
        question(
            19,
            "Which best describes how you look after your health?",
            Physical,
            1.0,
            [
                choice("A regular routine keeps you well", 0.9, &[(T::Type1, 2.5), (T::Type2, 3.5)]),
                choice("Eat well and exercise moderately", 0.8, &[(T::Type3, 3.0), (T::Type10, 2.8)]),
                choice("Efficient training to stay fit", 0.9, &[(T::Type5, 3.8), (T::Type7, 2.5)]),
                choice(
                    "Never push it, listen to your body",
                    0.8,
                    &[(T::Type4, 2.5), (T::Type6, 3.0), (T::Type8, 2.8), (T::Type9, 2.5)],
                ),
            ],
        ),
        question(
            20,
            "Which values matter most to you in life?",
            Mental,
            1.3,
            [
                choice("Justice, fairness and the pursuit of truth", 0.95, &[(T::Type1, 4.0), (T::Type4, 2.5)]),
                choice("Love and connection with people", 0.9, &[(T::Type3, 3.8), (T::Type10, 3.5)]),
                choice("Freedom, efficiency and achievement", 0.9, &[(T::Type5, 3.5), (T::Type7, 3.0)]),
                choice(
                    "Harmony, peace and a stable life",
                    0.85,
                    &[(T::Type2, 3.2), (T::Type6, 3.0), (T::Type8, 3.5), (T::Type9, 2.8)],
                ),
            ],
        ),
    ]
}
