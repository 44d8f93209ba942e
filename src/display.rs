use csv::WriterBuilder;
use serde::Serialize;

use crate::planner::SelectionState;
use crate::timetable::{split_label, GRID, TIME_HEADERS};

/// Background used for cells none of whose slots are selected.
pub const UNSELECTED_BACKGROUND: &str = "transparent";

/// One grid cell ready for rendering: its composite label and the background
/// color it should be painted with.
#[derive(Debug, Clone, Serialize)]
pub struct GridCell {
    pub label: String,
    pub background: String,
}

/// One day row of the rendered grid.
#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub day: String,
    pub cells: Vec<GridCell>,
}

/// Paints the weekly grid from the current selection. A cell takes the color
/// of the first of its atomic slots that has been claimed; untouched cells
/// stay transparent.
pub fn render_grid(selection: &SelectionState) -> Vec<GridRow> {
    GRID.iter()
        .map(|(day, cells)| GridRow {
            day: day.to_string(),
            cells: cells
                .iter()
                .map(|label| {
                    let background = split_label(label)
                        .find_map(|part| selection.selected_slots().get(part))
                        .cloned()
                        .unwrap_or_else(|| UNSELECTED_BACKGROUND.to_string());
                    GridCell {
                        label: label.to_string(),
                        background,
                    }
                })
                .collect(),
        })
        .collect()
}

pub fn time_headers() -> Vec<String> {
    TIME_HEADERS.iter().map(|h| h.to_string()).collect()
}

/// Writes the applied selection as CSV (course code, slot label, color hex)
/// for download, courses in sorted order.
pub fn export_selection_csv(
    selection: &SelectionState,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut wtr = WriterBuilder::new().from_writer(vec![]);
    wtr.write_record(["COURSE CODE", "SLOT", "COLOR"])?;

    let mut rows: Vec<(&String, &String)> = selection.applied_courses().iter().collect();
    rows.sort();
    for (course, label) in rows {
        let color = split_label(label)
            .find_map(|part| selection.selected_slots().get(part))
            .map(String::as_str)
            .unwrap_or("");
        wtr.write_record([course.as_str(), label.as_str(), color])?;
    }

    let bytes = wtr.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ConflictMap;
    use crate::timetable::Color;

    fn selection() -> SelectionState {
        let conflicts = ConflictMap::from_grid();
        let mut selection = SelectionState::default();
        selection
            .apply(&conflicts, "CSE101", "TF1+L1", Color::Red)
            .unwrap();
        selection
    }

    #[test]
    fn selected_cells_take_the_slot_color() {
        let grid = render_grid(&selection());
        let tue = &grid[0];
        assert_eq!(tue.day, "Tue");
        assert_eq!(tue.cells[0].label, "TF1+L1");
        assert_eq!(tue.cells[0].background, "#FF0000");
    }

    #[test]
    fn untouched_cells_stay_transparent() {
        let grid = render_grid(&selection());
        assert_eq!(grid[0].cells[1].label, "TA1+L2");
        assert_eq!(grid[0].cells[1].background, UNSELECTED_BACKGROUND);
    }

    #[test]
    fn first_claimed_part_of_a_cell_wins() {
        let conflicts = ConflictMap::from_grid();
        let mut selection = SelectionState::default();
        // Claim only L3 out of the "E1+STC2+L3" cell.
        selection
            .apply(&conflicts, "CSE110", "L3", Color::Yellow)
            .unwrap();
        let grid = render_grid(&selection);
        assert_eq!(grid[0].cells[2].label, "E1+STC2+L3");
        assert_eq!(grid[0].cells[2].background, "#FFFF00");
    }

    #[test]
    fn grid_shape_matches_the_static_table() {
        let grid = render_grid(&SelectionState::default());
        assert_eq!(grid.len(), 5);
        for row in &grid {
            assert_eq!(row.cells.len(), time_headers().len());
        }
    }

    #[test]
    fn export_lists_courses_with_slot_and_color() {
        let conflicts = ConflictMap::from_grid();
        let mut selection = selection();
        selection
            .apply(&conflicts, "CSE102", "TA1+L2", Color::Green)
            .unwrap();

        let csv = export_selection_csv(&selection).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "COURSE CODE,SLOT,COLOR");
        assert_eq!(lines[1], "CSE101,TF1+L1,#FF0000");
        assert_eq!(lines[2], "CSE102,TA1+L2,#00FF00");
    }
}
