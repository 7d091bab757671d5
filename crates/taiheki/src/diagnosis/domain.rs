use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The ten body-constitution types a diagnosis can resolve to.
///
/// Declaration order doubles as the tie-break order when two types score the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaihekiType {
    #[serde(rename = "type1")]
    Type1,
    #[serde(rename = "type2")]
    Type2,
    #[serde(rename = "type3")]
    Type3,
    #[serde(rename = "type4")]
    Type4,
    #[serde(rename = "type5")]
    Type5,
    #[serde(rename = "type6")]
    Type6,
    #[serde(rename = "type7")]
    Type7,
    #[serde(rename = "type8")]
    Type8,
    #[serde(rename = "type9")]
    Type9,
    #[serde(rename = "type10")]
    Type10,
}

impl TaihekiType {
    pub const COUNT: usize = 10;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Type1,
            Self::Type2,
            Self::Type3,
            Self::Type4,
            Self::Type5,
            Self::Type6,
            Self::Type7,
            Self::Type8,
            Self::Type9,
            Self::Type10,
        ]
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Type1 => 0,
            Self::Type2 => 1,
            Self::Type3 => 2,
            Self::Type4 => 3,
            Self::Type5 => 4,
            Self::Type6 => 5,
            Self::Type7 => 6,
            Self::Type8 => 7,
            Self::Type9 => 8,
            Self::Type10 => 9,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Type1 => "Type 1",
            Self::Type2 => "Type 2",
            Self::Type3 => "Type 3",
            Self::Type4 => "Type 4",
            Self::Type5 => "Type 5",
            Self::Type6 => "Type 6",
            Self::Type7 => "Type 7",
            Self::Type8 => "Type 8",
            Self::Type9 => "Type 9",
            Self::Type10 => "Type 10",
        }
    }

    pub const fn family(self) -> TypeFamily {
        match self {
            Self::Type1 | Self::Type2 => TypeFamily::Vertical,
            Self::Type3 | Self::Type4 => TypeFamily::Lateral,
            Self::Type5 | Self::Type6 => TypeFamily::FrontBack,
            Self::Type7 | Self::Type8 => TypeFamily::Twisted,
            Self::Type9 | Self::Type10 => TypeFamily::OpenClose,
        }
    }
}

/// Body-movement axis shared by each pair of types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFamily {
    Vertical,
    Lateral,
    FrontBack,
    Twisted,
    OpenClose,
}

impl TypeFamily {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vertical => "Vertical (up-down)",
            Self::Lateral => "Lateral (left-right)",
            Self::FrontBack => "Front-back",
            Self::Twisted => "Twisted",
            Self::OpenClose => "Open-close",
        }
    }
}

/// Question grouping used only to scale a question's importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Physical,
    Behavioral,
    Mental,
    Social,
    #[serde(other)]
    Other,
}

impl QuestionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Behavioral => "behavioral",
            Self::Mental => "mental",
            Self::Social => "social",
            Self::Other => "other",
        }
    }
}

/// Partial mapping from type to the raw points an option contributes.
pub type ScoreMap = BTreeMap<TaihekiType, f64>;

/// Immutable catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub category: QuestionCategory,
    pub weight: f64,
    pub max_selections: usize,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    /// Number of selectable entries, whichever kind of question this is.
    pub fn option_count(&self) -> usize {
        match &self.kind {
            QuestionKind::Single { options } => options.len(),
            QuestionKind::Scale { scale_options } => scale_options.len(),
        }
    }
}

/// Shape of a question's answer space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Choice question; an answer may select up to `max_selections` options.
    Single { options: Vec<ChoiceOption> },
    /// Five-point Likert question; only the first selection counts.
    Scale { scale_options: Vec<ScaleOption> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub text: String,
    pub scores: ScoreMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<f64>,
}

impl ChoiceOption {
    pub fn confidence(&self) -> f64 {
        self.confidence_level.unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleOption {
    pub value: u8,
    pub scores: ScoreMap,
}

/// One user response to a catalogue question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: u32,
    pub selected_options: Vec<usize>,
}

impl Answer {
    pub fn new(question_id: u32, selected_options: impl Into<Vec<usize>>) -> Self {
        Self {
            question_id,
            selected_options: selected_options.into(),
        }
    }
}

/// Accumulated integer score for every type. Never sparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<TaihekiType, i64>",
    into = "BTreeMap<TaihekiType, i64>"
)]
pub struct TypeScores([i64; TaihekiType::COUNT]);

impl TypeScores {
    pub fn get(&self, ty: TaihekiType) -> i64 {
        self.0[ty.index()]
    }

    pub(crate) fn add(&mut self, ty: TaihekiType, points: i64) {
        let slot = &mut self.0[ty.index()];
        *slot = slot.saturating_add(points);
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaihekiType, i64)> + '_ {
        TaihekiType::ordered()
            .into_iter()
            .map(move |ty| (ty, self.get(ty)))
    }

    pub fn max(&self) -> i64 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.0.iter().sum()
    }

    /// Types sorted by descending score; equal scores keep declaration order.
    pub fn ranked(&self) -> [(TaihekiType, i64); TaihekiType::COUNT] {
        let mut ranked = TaihekiType::ordered().map(|ty| (ty, self.get(ty)));
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

impl From<BTreeMap<TaihekiType, i64>> for TypeScores {
    fn from(map: BTreeMap<TaihekiType, i64>) -> Self {
        let mut scores = Self::default();
        for (ty, points) in map {
            scores.0[ty.index()] = points;
        }
        scores
    }
}

impl From<TypeScores> for BTreeMap<TaihekiType, i64> {
    fn from(scores: TypeScores) -> Self {
        scores.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_types_match_their_index() {
        for (position, ty) in TaihekiType::ordered().into_iter().enumerate() {
            assert_eq!(ty.index(), position);
        }
    }

    #[test]
    fn type_scores_serialize_every_type() {
        let mut scores = TypeScores::default();
        scores.add(TaihekiType::Type3, 7);

        let value = serde_json::to_value(scores).expect("scores serialize");
        let map = value.as_object().expect("object");

        assert_eq!(map.len(), TaihekiType::COUNT);
        assert_eq!(map["type3"], 7);
        assert_eq!(map["type10"], 0);
    }

    #[test]
    fn type_scores_fill_missing_types_on_deserialize() {
        let scores: TypeScores =
            serde_json::from_str(r#"{"type2": 4, "type9": 1}"#).expect("scores parse");

        assert_eq!(scores.get(TaihekiType::Type2), 4);
        assert_eq!(scores.get(TaihekiType::Type9), 1);
        assert_eq!(scores.get(TaihekiType::Type1), 0);
        assert_eq!(scores.iter().count(), TaihekiType::COUNT);
    }

    #[test]
    fn ranking_keeps_declaration_order_for_ties() {
        let mut scores = TypeScores::default();
        scores.add(TaihekiType::Type7, 5);
        scores.add(TaihekiType::Type2, 5);
        scores.add(TaihekiType::Type4, 9);

        let ranked = scores.ranked();

        assert_eq!(ranked[0], (TaihekiType::Type4, 9));
        assert_eq!(ranked[1], (TaihekiType::Type2, 5));
        assert_eq!(ranked[2], (TaihekiType::Type7, 5));
        assert_eq!(ranked[3], (TaihekiType::Type1, 0));
    }

    #[test]
    fn unknown_category_deserializes_as_other() {
        let category: QuestionCategory =
            serde_json::from_str(r#""spiritual""#).expect("category parses");
        assert_eq!(category, QuestionCategory::Other);
    }

    #[test]
    fn question_kind_is_tagged_inline() {
        let raw = r#"{
            "id": 3,
            "text": "Pick one",
            "category": "mental",
            "weight": 1.0,
            "max_selections": 1,
            "kind": "scale",
            "scale_options": [
                {"value": 1, "scores": {"type1": 1.0}},
                {"value": 2, "scores": {}},
                {"value": 3, "scores": {}},
                {"value": 4, "scores": {}},
                {"value": 5, "scores": {"type2": 2.0}}
            ]
        }"#;

        let question: Question = serde_json::from_str(raw).expect("question parses");

        assert_eq!(question.option_count(), 5);
        assert!(matches!(question.kind, QuestionKind::Scale { .. }));
    }
}
