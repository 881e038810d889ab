use crate::error::{ChanceError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix of every lottery key in the key-value store
pub const STORAGE_PREFIX: &str = "lottery_";

/// Key a lottery is stored under
pub fn storage_key(id: &str) -> String {
    format!("{}{}", STORAGE_PREFIX, id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LotteryMode {
    /// One shared task, the performer is picked by the wheel
    SingleTask,
    /// One distinct task per participant
    MultiOption,
    /// Participants are paired with each other, never with themselves
    Matching,
}

/// Which result screen a lottery is played on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView {
    Wheel,
    Reveal,
}

impl LotteryMode {
    pub fn view(&self) -> ResultView {
        match self {
            LotteryMode::SingleTask => ResultView::Wheel,
            LotteryMode::MultiOption | LotteryMode::Matching => ResultView::Reveal,
        }
    }

    pub fn min_participants(&self) -> usize {
        match self {
            LotteryMode::Matching => 2,
            _ => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LotteryMode::SingleTask => "single",
            LotteryMode::MultiOption => "multi",
            LotteryMode::Matching => "matching",
        }
    }
}

impl fmt::Display for LotteryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LotteryMode {
    type Err = ChanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "single" | "single-task" => Ok(LotteryMode::SingleTask),
            "multi" | "multi-option" => Ok(LotteryMode::MultiOption),
            "matching" | "match" => Ok(LotteryMode::Matching),
            _ => Err(ChanceError::config(format!(
                "Invalid mode: {}. Supported modes: single, multi, matching",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub participant: String,
    /// Task description, or the paired participant in matching mode
    pub task: String,
    #[serde(default)]
    pub is_revealed: bool,
}

impl Assignment {
    pub fn new(participant: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            task: task.into(),
            is_revealed: false,
        }
    }
}

/// A stored lottery, serialized as the camelCase JSON object kept under
/// `lottery_<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotteryRecord {
    pub id: String,
    pub participants: Vec<String>,
    pub tasks: Vec<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<LotteryMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_degree: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_assignments: Option<Vec<Assignment>>,
}

impl LotteryRecord {
    pub fn new(participants: Vec<String>, tasks: Vec<String>, mode: LotteryMode) -> Self {
        Self {
            id: Self::generate_id(),
            participants,
            tasks,
            created_at: Utc::now().timestamp_millis(),
            mode: Some(mode),
            winner: None,
            rotation_degree: None,
            final_assignments: None,
        }
    }

    /// Time-ordered identifier, unique on a best-effort basis
    pub fn generate_id() -> String {
        Uuid::now_v7().simple().to_string()
    }

    pub fn storage_key(&self) -> String {
        storage_key(&self.id)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    /// The explicit mode tag, or the mode inferred from the lists for
    /// records written before the tag existed.
    pub fn effective_mode(&self) -> LotteryMode {
        self.mode
            .unwrap_or_else(|| infer_mode(&self.participants, &self.tasks))
    }

    /// The shared task of a single-task lottery
    pub fn primary_task(&self) -> Option<&str> {
        self.tasks.first().map(String::as_str)
    }

    pub fn has_result(&self) -> bool {
        match self.effective_mode() {
            LotteryMode::SingleTask => self.winner.is_some() && self.rotation_degree.is_some(),
            LotteryMode::MultiOption | LotteryMode::Matching => self.final_assignments.is_some(),
        }
    }

    pub fn clear_result(&mut self) {
        self.winner = None;
        self.rotation_degree = None;
        self.final_assignments = None;
    }
}

/// Legacy inference: tasks that are a permutation of the participants mean
/// matching mode, a single task means the wheel, anything else is
/// multi-option.
pub fn infer_mode(participants: &[String], tasks: &[String]) -> LotteryMode {
    let mut sorted_participants = participants.to_vec();
    let mut sorted_tasks = tasks.to_vec();
    sorted_participants.sort();
    sorted_tasks.sort();

    if participants.len() >= 2 && sorted_participants == sorted_tasks {
        LotteryMode::Matching
    } else if tasks.len() == 1 {
        LotteryMode::SingleTask
    } else {
        LotteryMode::MultiOption
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_legacy_record_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "1718000000000",
            "participants": ["Alice", "Bob"],
            "tasks": ["Dishes"],
            "createdAt": 1718000000000
        }"#;

        let record: LotteryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "1718000000000");
        assert!(record.mode.is_none());
        assert!(record.winner.is_none());
        assert!(record.final_assignments.is_none());
        assert_eq!(record.effective_mode(), LotteryMode::SingleTask);
        assert!(!record.has_result());
    }

    #[test]
    fn test_record_uses_camel_case_keys() {
        let mut record = LotteryRecord::new(
            names(&["Alice", "Bob"]),
            names(&["Dishes"]),
            LotteryMode::SingleTask,
        );
        record.winner = Some("Bob".to_string());
        record.rotation_degree = Some(2000.5);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["rotationDegree"], 2000.5);
        assert_eq!(value["mode"], "singleTask");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("finalAssignments").is_none());

        let assignment = serde_json::to_value(Assignment::new("Alice", "Bob")).unwrap();
        assert_eq!(assignment["isRevealed"], false);
    }

    #[test]
    fn test_infer_mode() {
        let people = names(&["Alice", "Bob", "Carol"]);
        assert_eq!(
            infer_mode(&people, &names(&["Carol", "Alice", "Bob"])),
            LotteryMode::Matching
        );
        assert_eq!(infer_mode(&people, &names(&["Dishes"])), LotteryMode::SingleTask);
        assert_eq!(
            infer_mode(&people, &names(&["Dishes", "Laundry", "Trash"])),
            LotteryMode::MultiOption
        );
        // A lone participant whose name equals the task is still a wheel
        assert_eq!(
            infer_mode(&names(&["Alice"]), &names(&["Alice"])),
            LotteryMode::SingleTask
        );
    }

    #[test]
    fn test_explicit_mode_wins_over_inference() {
        let people = names(&["Alice", "Bob"]);
        let record = LotteryRecord::new(people.clone(), people, LotteryMode::MultiOption);
        assert_eq!(record.effective_mode(), LotteryMode::MultiOption);
    }

    #[test]
    fn test_clear_result() {
        let people = names(&["Alice", "Bob"]);
        let mut record = LotteryRecord::new(people.clone(), people, LotteryMode::Matching);
        record.final_assignments = Some(vec![
            Assignment::new("Alice", "Bob"),
            Assignment::new("Bob", "Alice"),
        ]);
        assert!(record.has_result());

        record.clear_result();
        assert!(!record.has_result());
        assert!(record.final_assignments.is_none());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("single".parse::<LotteryMode>().unwrap(), LotteryMode::SingleTask);
        assert_eq!("Matching".parse::<LotteryMode>().unwrap(), LotteryMode::Matching);
        assert!("teams".parse::<LotteryMode>().is_err());
        assert_eq!(LotteryMode::MultiOption.view(), ResultView::Reveal);
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(storage_key("42"), "lottery_42");
    }
}
