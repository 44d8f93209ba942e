use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::conflict::ConflictMap;
use crate::timetable::{split_label, Color};

/// Why a selection mutation was rejected. All of these are user-facing
/// notices, never fatal; a rejected operation leaves the state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// The named atomic slot is already claimed, or overlaps a claimed slot.
    #[error("Slot clash detected with '{0}'.")]
    ConflictDetected(String),
    /// A mutator was invoked with a blank course, slot or color.
    #[error("Please select a course, slot and color first.")]
    NothingSelected,
    /// delete/edit/update named a course that has not been applied.
    #[error("Course {0} has not been applied.")]
    CourseNotFound(String),
}

/// Outcome of a reset. Clearing an already-empty selection is informational,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Cleared,
    AlreadyEmpty,
}

/// One session's selection: which atomic slots are painted which hex color,
/// and which composite label each applied course was applied with. The two
/// maps move in lockstep; the mutator methods below are the only write path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    selected_slots: HashMap<String, String>,
    selected_courses: HashMap<String, String>,
    editing: Option<String>,
}

impl SelectionState {
    /// Atomic slot -> hex color, for grid painting.
    pub fn selected_slots(&self) -> &HashMap<String, String> {
        &self.selected_slots
    }

    /// Course code -> the composite label it was applied with.
    pub fn applied_courses(&self) -> &HashMap<String, String> {
        &self.selected_courses
    }

    /// The course currently being edited, if any.
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_slots.is_empty() && self.selected_courses.is_empty()
    }

    /// Applies a course: claims every atomic slot of `label` with `color` and
    /// records the course. Rejected with `ConflictDetected` if any atomic
    /// slot clashes with the selection as it stands, so a multi-slot label
    /// commits all-or-nothing. Reapplying an already-applied course clashes
    /// on its own slots.
    pub fn apply(
        &mut self,
        conflicts: &ConflictMap,
        course: &str,
        label: &str,
        color: Color,
    ) -> Result<(), SelectionError> {
        let course = course.trim();
        let label = label.trim();
        if course.is_empty() || label.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        let parts: Vec<&str> = split_label(label).collect();
        if parts.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        if let Some(slot) = conflicts.find_clash(parts.iter().copied(), &self.selected_slots) {
            return Err(SelectionError::ConflictDetected(slot));
        }
        for part in parts {
            self.selected_slots
                .insert(part.to_string(), color.hex().to_string());
        }
        self.selected_courses
            .insert(course.to_string(), label.to_string());
        Ok(())
    }

    /// Removes an applied course and frees every atomic slot of the label it
    /// was applied with.
    pub fn delete(&mut self, course: &str) -> Result<(), SelectionError> {
        let course = course.trim();
        if course.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        let label = self
            .selected_courses
            .remove(course)
            .ok_or_else(|| SelectionError::CourseNotFound(course.to_string()))?;
        for part in split_label(&label) {
            self.selected_slots.remove(part);
        }
        Ok(())
    }

    /// Marks an applied course as being edited. Flag only; the slot and
    /// course maps are untouched.
    pub fn edit(&mut self, course: &str) -> Result<(), SelectionError> {
        let course = course.trim();
        if course.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        if !self.selected_courses.contains_key(course) {
            return Err(SelectionError::CourseNotFound(course.to_string()));
        }
        self.editing = Some(course.to_string());
        Ok(())
    }

    /// Delete-then-reapply with a new label and color. The old slots are
    /// freed before the clash check runs, so a course may keep any of its own
    /// previous slots without a spurious self-conflict. Not transactional: if
    /// the reapply clashes, the course ends up unapplied. The editing flag is
    /// cleared whenever the delete+apply sequence ran, whatever the apply
    /// outcome.
    pub fn update(
        &mut self,
        conflicts: &ConflictMap,
        course: &str,
        label: &str,
        color: Color,
    ) -> Result<(), SelectionError> {
        if course.trim().is_empty() || label.trim().is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        self.delete(course)?;
        let applied = self.apply(conflicts, course, label, color);
        self.editing = None;
        applied
    }

    /// Unconditionally clears both maps. The editing flag is a separate
    /// concern and is left alone.
    pub fn reset(&mut self) -> ResetOutcome {
        if self.is_empty() {
            return ResetOutcome::AlreadyEmpty;
        }
        self.selected_slots.clear();
        self.selected_courses.clear();
        ResetOutcome::Cleared
    }
}
