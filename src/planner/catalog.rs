use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::selection::SelectionState;

/// Whether a course occupies theory or lab slots. Each kind comes from its
/// own upload and feeds its own dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseKind {
    Theory,
    Lab,
}

impl CourseKind {
    /// Parses the `{kind}` path segment of the upload endpoint.
    pub fn from_path(segment: &str) -> Option<CourseKind> {
        match segment.trim().to_lowercase().as_str() {
            "theory" => Some(CourseKind::Theory),
            "lab" => Some(CourseKind::Lab),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CourseKind::Theory => "Theory",
            CourseKind::Lab => "Lab",
        }
    }
}

/// Courses on offer, keyed by code, each with the slot labels it can be
/// taken in (in upload order). Read-only to the selection core; replaced
/// wholesale when a new document for that kind is uploaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseCatalog {
    theory: HashMap<String, Vec<String>>,
    lab: HashMap<String, Vec<String>>,
}

impl CourseCatalog {
    /// Swaps in a freshly parsed upload for one kind; the other kind keeps
    /// its data.
    pub fn replace(&mut self, kind: CourseKind, courses: HashMap<String, Vec<String>>) {
        match kind {
            CourseKind::Theory => self.theory = courses,
            CourseKind::Lab => self.lab = courses,
        }
    }

    fn courses(&self, kind: CourseKind) -> &HashMap<String, Vec<String>> {
        match kind {
            CourseKind::Theory => &self.theory,
            CourseKind::Lab => &self.lab,
        }
    }

    pub fn is_loaded(&self, kind: CourseKind) -> bool {
        !self.courses(kind).is_empty()
    }

    /// The slot labels a course is offered in, whichever kind it came from.
    /// Theory wins if a code somehow appears in both uploads.
    pub fn offered_slots(&self, course: &str) -> Option<&[String]> {
        self.theory
            .get(course)
            .or_else(|| self.lab.get(course))
            .map(Vec::as_slice)
    }

    /// Courses of `kind` still open for selection: everything uploaded minus
    /// the codes already applied. Sorted for stable dropdowns.
    pub fn selectable(&self, kind: CourseKind, selection: &SelectionState) -> Vec<String> {
        let mut open: Vec<String> = self
            .courses(kind)
            .keys()
            .filter(|code| !selection.applied_courses().contains_key(*code))
            .cloned()
            .collect();
        open.sort();
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ConflictMap;
    use crate::timetable::Color;

    fn catalog() -> CourseCatalog {
        let mut catalog = CourseCatalog::default();
        catalog.replace(
            CourseKind::Theory,
            HashMap::from([
                ("CSE101".to_string(), vec!["A1".to_string(), "B1".to_string()]),
                ("CSE102".to_string(), vec!["C1".to_string()]),
            ]),
        );
        catalog.replace(
            CourseKind::Lab,
            HashMap::from([("CSE101L".to_string(), vec!["L1+L2".to_string()])]),
        );
        catalog
    }

    #[test]
    fn selectable_excludes_applied_courses() {
        let catalog = catalog();
        let conflicts = ConflictMap::from_grid();
        let mut selection = SelectionState::default();

        assert_eq!(
            catalog.selectable(CourseKind::Theory, &selection),
            vec!["CSE101", "CSE102"]
        );

        selection
            .apply(&conflicts, "CSE101", "A1", Color::Red)
            .unwrap();
        assert_eq!(
            catalog.selectable(CourseKind::Theory, &selection),
            vec!["CSE102"]
        );
        // The lab dropdown is unaffected.
        assert_eq!(
            catalog.selectable(CourseKind::Lab, &selection),
            vec!["CSE101L"]
        );
    }

    #[test]
    fn offered_slots_looks_across_both_kinds() {
        let catalog = catalog();
        assert_eq!(
            catalog.offered_slots("CSE101"),
            Some(&["A1".to_string(), "B1".to_string()][..])
        );
        assert_eq!(
            catalog.offered_slots("CSE101L"),
            Some(&["L1+L2".to_string()][..])
        );
        assert_eq!(catalog.offered_slots("CSE999"), None);
    }

    #[test]
    fn replace_swaps_only_the_given_kind() {
        let mut catalog = catalog();
        catalog.replace(
            CourseKind::Theory,
            HashMap::from([("MAT201".to_string(), vec!["D1".to_string()])]),
        );
        assert_eq!(catalog.offered_slots("CSE101"), None);
        assert_eq!(
            catalog.selectable(CourseKind::Theory, &SelectionState::default()),
            vec!["MAT201"]
        );
        assert!(catalog.is_loaded(CourseKind::Lab));
    }

    #[test]
    fn kind_parses_from_path_segment() {
        assert_eq!(CourseKind::from_path("theory"), Some(CourseKind::Theory));
        assert_eq!(CourseKind::from_path("Lab"), Some(CourseKind::Lab));
        assert_eq!(CourseKind::from_path("elective"), None);
    }
}
