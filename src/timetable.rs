/// Separator joining atomic slots inside a composite cell label ("TF1+L1").
pub const SLOT_SEPARATOR: char = '+';

/// Column headers of the weekly grid (time ranges, left to right).
pub const TIME_HEADERS: [&str; 12] = [
    "8 - 9", "9 - 10", "10 - 11", "11 - 12", "12 - 1", "1 - 1:30",
    "2 - 3", "3 - 4", "4 - 5", "5 - 6", "6 - 7", "7 - 7:30",
];

/// The weekly slot grid: one row per day, one composite slot label per time
/// column. Constant for the process lifetime; the conflict map is derived
/// from it once at startup.
pub const GRID: [(&str, [&str; 12]); 5] = [
    (
        "Tue",
        [
            "TF1+L1", "TA1+L2", "E1+STC2+L3", "D1+L4", "B1+L5", "L6",
            "TA2+L31", "E2+STC1+L32", "D2+L33", "B2+L34", "TF2+L35", "L36",
        ],
    ),
    (
        "Wed",
        [
            "TCC1+L7", "E1+STA2+L8", "G1+TFF1+L9", "TBB1+L10", "TDD1+L11", "L12",
            "E2+STA1+L37", "G2+TFF2+L38", "TBB2+L39", "TDD2+L40", "TCC2+L41", "L42",
        ],
    ),
    (
        "Thu",
        [
            "TE1+L13", "C1+L14", "A1+L15", "F1+L16", "D1+L17", "L18",
            "C2+L43", "A2+L44", "F2+L45", "D2+L46", "TE2+L47", "L48",
        ],
    ),
    (
        "Fri",
        [
            "TAA1+L19", "TD1+L20", "B1+L21", "G1+TEE1+L22", "C1+L23", "L24",
            "TD2+L49", "B2+L50", "G2+TEE2+L51", "C2+L52", "TAA2+L53", "L54",
        ],
    ),
    (
        "Sat",
        [
            "TG1+L25", "TB1+L26", "TC1+L27", "A1+L28", "F1+L29", "L30",
            "TB2+L55", "TC2+L56", "A2+L57", "F2+L58", "TG2+L59", "L60",
        ],
    ),
];

/// Splits a composite cell label into its atomic slots, dropping empty parts.
pub fn split_label(label: &str) -> impl Iterator<Item = &str> {
    label
        .split(SLOT_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

/// Highlight colors offered in the selection form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Pink,
    Yellow,
    Purple,
    Orange,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::Red,
        Color::Green,
        Color::Pink,
        Color::Yellow,
        Color::Purple,
        Color::Orange,
    ];

    /// Display name, as shown in the color dropdown.
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Pink => "Pink",
            Color::Yellow => "Yellow",
            Color::Purple => "Purple",
            Color::Orange => "Orange",
        }
    }

    /// Hex value painted into grid cells.
    pub fn hex(self) -> &'static str {
        match self {
            Color::Red => "#FF0000",
            Color::Green => "#00FF00",
            Color::Pink => "#FF33F9",
            Color::Yellow => "#FFFF00",
            Color::Purple => "#800080",
            Color::Orange => "#FFA500",
        }
    }

    /// Parses a form-submitted color name back into a variant.
    pub fn from_name(name: &str) -> Option<Color> {
        let name = name.trim();
        Color::ALL.into_iter().find(|c| c.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_label_handles_single_and_composite() {
        assert_eq!(split_label("L6").collect::<Vec<_>>(), vec!["L6"]);
        assert_eq!(
            split_label("E1+STC2+L3").collect::<Vec<_>>(),
            vec!["E1", "STC2", "L3"]
        );
    }

    #[test]
    fn split_label_drops_blank_parts() {
        assert_eq!(split_label("+").count(), 0);
        assert_eq!(split_label(" TF1 + L1 ").collect::<Vec<_>>(), vec!["TF1", "L1"]);
    }

    #[test]
    fn color_names_round_trip() {
        for color in Color::ALL {
            assert_eq!(Color::from_name(color.name()), Some(color));
        }
        assert_eq!(Color::from_name(""), None);
        assert_eq!(Color::from_name("Mauve"), None);
    }

    #[test]
    fn every_grid_row_has_a_full_set_of_cells() {
        for (day, cells) in GRID {
            assert!(!day.is_empty());
            assert_eq!(cells.len(), TIME_HEADERS.len());
        }
    }
}
