use crate::assignment::derangement_feasible;
use crate::{LotteryError, Result};
use chance_core::{LotteryMode, LotteryRecord};

/// A lottery being filled in, before anything is persisted.
///
/// In multi-option mode the task list follows the participant list so each
/// participant has exactly one option slot. Matching mode ignores the task
/// list; the participants themselves become the targets.
#[derive(Debug, Clone, PartialEq)]
pub struct LotteryDraft {
    participants: Vec<String>,
    tasks: Vec<String>,
    mode: LotteryMode,
}

impl Default for LotteryDraft {
    fn default() -> Self {
        Self {
            participants: vec![String::new()],
            tasks: vec![String::new()],
            mode: LotteryMode::SingleTask,
        }
    }
}

impl LotteryDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(participants: Vec<String>, tasks: Vec<String>, mode: LotteryMode) -> Self {
        Self {
            participants,
            tasks,
            mode,
        }
    }

    /// Draft holding a stored record's lists, used to re-check a loaded record
    pub fn from_record(record: &LotteryRecord) -> Self {
        Self::from_parts(
            record.participants.clone(),
            record.tasks.clone(),
            record.effective_mode(),
        )
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    pub fn mode(&self) -> LotteryMode {
        self.mode
    }

    pub fn add_participant(&mut self, name: impl Into<String>) {
        self.participants.push(name.into());

        if self.mode == LotteryMode::MultiOption {
            self.tasks.push(String::new());
        }
    }

    pub fn set_participant(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        let slot = self.participants.get_mut(index).ok_or_else(|| {
            LotteryError::InvalidState(format!("No participant at position {}", index + 1))
        })?;
        *slot = name.into();
        Ok(())
    }

    pub fn set_task(&mut self, index: usize, description: impl Into<String>) -> Result<()> {
        let slot = self.tasks.get_mut(index).ok_or_else(|| {
            LotteryError::InvalidState(format!("No task at position {}", index + 1))
        })?;
        *slot = description.into();
        Ok(())
    }

    pub fn remove_participant(&mut self, index: usize) -> Result<()> {
        if self.participants.len() <= 1 {
            return Err(LotteryError::InvalidState(
                "A lottery needs at least one participant".to_string(),
            ));
        }

        if index >= self.participants.len() {
            return Err(LotteryError::InvalidState(format!(
                "No participant at position {}",
                index + 1
            )));
        }

        self.participants.remove(index);

        if self.mode == LotteryMode::MultiOption {
            self.tasks.truncate(self.participants.len());
        }

        Ok(())
    }

    pub fn set_mode(&mut self, mode: LotteryMode) {
        if mode == self.mode {
            return;
        }

        // The first description survives toggling, unless it came from matching
        let first = if self.mode == LotteryMode::Matching {
            String::new()
        } else {
            self.tasks.first().cloned().unwrap_or_default()
        };

        match mode {
            LotteryMode::SingleTask => self.tasks = vec![first],
            LotteryMode::MultiOption => {
                let mut tasks = vec![String::new(); self.participants.len()];
                if let Some(slot) = tasks.first_mut() {
                    *slot = first;
                }
                self.tasks = tasks;
            }
            LotteryMode::Matching => {}
        }

        self.mode = mode;
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(index) = self.participants.iter().position(|p| p.trim().is_empty()) {
            return Err(LotteryError::EmptyParticipantName { index });
        }

        let need = self.mode.min_participants();
        if self.participants.len() < need {
            return Err(LotteryError::NotEnoughParticipants {
                need,
                have: self.participants.len(),
            });
        }

        match self.mode {
            LotteryMode::Matching => {
                let names: Vec<String> =
                    self.participants.iter().map(|p| p.trim().to_string()).collect();
                if !derangement_feasible(&names) {
                    return Err(LotteryError::DerangementInfeasible);
                }
                return Ok(());
            }
            LotteryMode::SingleTask if self.tasks.len() != 1 => {
                return Err(LotteryError::InvalidState(format!(
                    "A single-task lottery takes exactly one task, got {}",
                    self.tasks.len()
                )));
            }
            LotteryMode::MultiOption if self.tasks.len() != self.participants.len() => {
                return Err(LotteryError::TaskCountMismatch {
                    participants: self.participants.len(),
                    tasks: self.tasks.len(),
                });
            }
            _ => {}
        }

        if let Some(index) = self.tasks.iter().position(|t| t.trim().is_empty()) {
            return Err(LotteryError::EmptyTaskDescription { index });
        }

        Ok(())
    }

    /// Validate and turn the draft into a fresh record
    pub fn build(&self) -> Result<LotteryRecord> {
        self.validate()?;

        let participants: Vec<String> = self
            .participants
            .iter()
            .map(|p| p.trim().to_string())
            .collect();

        let tasks = match self.mode {
            LotteryMode::Matching => participants.clone(),
            _ => self.tasks.iter().map(|t| t.trim().to_string()).collect(),
        };

        Ok(LotteryRecord::new(participants, tasks, self.mode))
    }
}
