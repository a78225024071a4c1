use serde::Serialize;

use crate::schema::Score;

/// Net promoter category of a satisfaction score.
///
/// | Score  | Category  |
/// |--------|-----------|
/// | 9–10   | Promoter  |
/// | 7–8    | Passive   |
/// | 1–6    | Detractor |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NpsCategory {
    Detractor,
    Passive,
    Promoter,
}

impl NpsCategory {
    pub fn classify(score: Score) -> Self {
        match score.get() {
            9..=10 => NpsCategory::Promoter,
            7..=8 => NpsCategory::Passive,
            _ => NpsCategory::Detractor,
        }
    }
}
