//! Status code classification.
//!
//! A status is either a working time range (`09:00 - 18:00`) or a short
//! leave/off code. Everything here works on the raw string so unknown or
//! hand-typed codes still flow through the views.

use serde::Serialize;

pub const WEEK_OFF: &str = "WO";
pub const PLANNED_LEAVE: &str = "PL";
pub const SICK_LEAVE: &str = "SL";
pub const WORK_FROM_HOME: &str = "WFH";
/// Summary column that all time-range statuses collapse into.
pub const PRESENT: &str = "Present";

const NIGHT_PREFIX: &str = "18:00";

pub const MORNING_SHIFT: &str = "09:00 - 18:00";
pub const NIGHT_SHIFT: &str = "18:00 - 03:00";
pub const AFTERNOON_SHIFTS: [&str; 3] = ["11:00 - 20:00", "10:00 - 19:00", "06:00 - 15:00"];

/// `-` and `x` are grid placeholders, not real entries. Matched exactly:
/// a whitespace-only status is a real (custom) entry.
pub fn is_placeholder(status: &str) -> bool {
    matches!(status, "" | "-" | "x")
}

pub fn is_time_range(status: &str) -> bool {
    status.contains(':')
}

pub fn is_night_shift(status: &str) -> bool {
    status.starts_with(NIGHT_PREFIX)
}

pub fn is_week_off(status: &str) -> bool {
    status == WEEK_OFF
}

/// Column a status is counted under in the summary view.
pub fn summary_category(status: &str) -> &str {
    if is_time_range(status) {
        PRESENT
    } else {
        status
    }
}

/// Coarse shift band used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftBand {
    Morning,
    Afternoon,
    Night,
}

impl ShiftBand {
    /// First match wins, so `09:00 - 18:00` is Morning even though it
    /// contains `18:00`.
    pub fn classify(status: &str) -> Option<Self> {
        if status.contains("09:00") {
            Some(ShiftBand::Morning)
        } else if status.contains("10:00") || status.contains("11:00") {
            Some(ShiftBand::Afternoon)
        } else if status.contains(NIGHT_PREFIX) {
            Some(ShiftBand::Night)
        } else {
            None
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ShiftBand::Morning => "shift-morning",
            ShiftBand::Afternoon => "shift-afternoon",
            ShiftBand::Night => "shift-night",
        }
    }
}

/// Visual category of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Empty,
    Morning,
    Afternoon,
    Night,
    Leave,
    WeekOff,
    Wfh,
    Other,
}

impl CellClass {
    /// Only `""` and `-` render empty; `x` falls through to `Other`.
    pub fn classify(status: &str) -> Self {
        if matches!(status, "" | "-") {
            return CellClass::Empty;
        }
        match ShiftBand::classify(status) {
            Some(ShiftBand::Morning) => return CellClass::Morning,
            Some(ShiftBand::Afternoon) => return CellClass::Afternoon,
            Some(ShiftBand::Night) => return CellClass::Night,
            None => {}
        }
        match status {
            PLANNED_LEAVE | SICK_LEAVE => CellClass::Leave,
            WEEK_OFF => CellClass::WeekOff,
            WORK_FROM_HOME => CellClass::Wfh,
            _ => CellClass::Other,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            CellClass::Empty => "cell-empty",
            CellClass::Morning => "cell-morning",
            CellClass::Afternoon => "cell-afternoon",
            CellClass::Night => "cell-night",
            CellClass::Leave => "cell-leave",
            CellClass::WeekOff => "cell-wo",
            CellClass::Wfh => "cell-wfh",
            CellClass::Other => "cell-other",
        }
    }
}

/// A predefined choice offered by the cell editor.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Editor choices in display order. Any other string is a custom status.
pub const STATUS_OPTIONS: [StatusOption; 9] = [
    StatusOption { value: "PL", label: "PL (Planned Leave)" },
    StatusOption { value: "WO", label: "WO (Week Off)" },
    StatusOption { value: "10:00 - 19:00", label: "10:00 - 19:00" },
    StatusOption { value: "18:00 - 03:00", label: "18:00 - 03:00" },
    StatusOption { value: "09:00 - 18:00", label: "09:00 - 18:00" },
    StatusOption { value: "11:00 - 20:00", label: "11:00 - 20:00" },
    StatusOption { value: "WFH", label: "WFH" },
    StatusOption { value: "WL", label: "WL (Work Leave)" },
    StatusOption { value: "OH", label: "OH (Optional Holiday)" },
];

pub fn is_predefined(status: &str) -> bool {
    STATUS_OPTIONS.iter().any(|o| o.value == status)
}
