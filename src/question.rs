//! Quiz questions and the per-type option payloads stored with them.

use std::collections::HashSet;

use anyhow::{Context, bail, ensure};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Caller-chosen key, kept alongside the generated row id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub prompt: String,
    pub points: f64,
    pub options: QuestionOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

/// Where a draggable item belongs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub item: String,
    pub zone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionOptions {
    MultipleChoice { choices: Vec<String>, correct: usize },
    TrueFalse { answer: bool },
    Matching { pairs: Vec<MatchingPair> },
    DragAndDrop {
        items: Vec<String>,
        zones: Vec<String>,
        placements: Vec<Placement>,
    },
    ShortAnswer { accepted: Vec<String> },
}

impl Question {
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(id) = &self.id {
            ensure!(!id.trim().is_empty(), "question id is blank");
        }
        ensure!(!self.prompt.trim().is_empty(), "question prompt is empty");
        ensure!(
            self.points.is_finite() && self.points > 0.0,
            "question points must be positive"
        );
        self.options
            .validate()
            .with_context(|| format!("invalid options for \"{}\"", self.prompt))
    }
}

impl QuestionOptions {
    pub fn kind(&self) -> &'static str {
        match self {
            QuestionOptions::MultipleChoice { .. } => "multiple_choice",
            QuestionOptions::TrueFalse { .. } => "true_false",
            QuestionOptions::Matching { .. } => "matching",
            QuestionOptions::DragAndDrop { .. } => "drag_and_drop",
            QuestionOptions::ShortAnswer { .. } => "short_answer",
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            QuestionOptions::MultipleChoice { choices, correct } => {
                ensure!(choices.len() >= 2, "multiple choice needs at least two choices");
                ensure!(
                    choices.iter().all(|c| !c.trim().is_empty()),
                    "multiple choice has an empty choice"
                );
                ensure!(
                    *correct < choices.len(),
                    "correct choice {correct} is out of range"
                );
            }
            QuestionOptions::TrueFalse { .. } => {}
            QuestionOptions::Matching { pairs } => {
                ensure!(!pairs.is_empty(), "matching needs at least one pair");
                let mut lefts = HashSet::new();
                for pair in pairs {
                    if pair.left.trim().is_empty() || pair.right.trim().is_empty() {
                        bail!("matching pair has an empty side");
                    }
                    if !lefts.insert(pair.left.as_str()) {
                        bail!("matching term \"{}\" appears twice", pair.left);
                    }
                }
            }
            QuestionOptions::DragAndDrop {
                items,
                zones,
                placements,
            } => {
                ensure!(!items.is_empty(), "drag and drop needs at least one item");
                ensure!(!zones.is_empty(), "drag and drop needs at least one zone");
                for placement in placements {
                    ensure!(
                        items.contains(&placement.item),
                        "placement refers to unknown item \"{}\"",
                        placement.item
                    );
                    ensure!(
                        zones.contains(&placement.zone),
                        "placement refers to unknown zone \"{}\"",
                        placement.zone
                    );
                }
            }
            QuestionOptions::ShortAnswer { accepted } => {
                ensure!(
                    accepted.iter().any(|a| !a.trim().is_empty()),
                    "short answer needs an accepted answer"
                );
            }
        }

        Ok(())
    }
}
