//! Pure per-sheet view state: selection flags and compare mode.
//!
//! None of this state is backend-authoritative; mutating it never triggers
//! a backend round trip.

use crate::error::SheetError;

/// How the sheet's current selection is presented for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    /// All selected items tiled at once.
    #[default]
    Grid,
    /// Two items toggled against each other.
    Ab,
    /// Items played one after another.
    Sequence,
    /// Split-screen wipe between two items.
    Wipe,
}

impl CompareMode {
    /// Maps an untyped UI index into the closed mode set.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(CompareMode::Grid),
            1 => Some(CompareMode::Ab),
            2 => Some(CompareMode::Sequence),
            3 => Some(CompareMode::Wipe),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            CompareMode::Grid => 0,
            CompareMode::Ab => 1,
            CompareMode::Sequence => 2,
            CompareMode::Wipe => 3,
        }
    }
}

/// Expanded/selected flags plus compare mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    expanded: bool,
    selected: bool,
    compare_mode: CompareMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            expanded: true,
            selected: false,
            compare_mode: CompareMode::Grid,
        }
    }
}

impl ViewState {
    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn compare_mode(&self) -> CompareMode {
        self.compare_mode
    }

    /// Returns whether the value actually changed; writing the current
    /// value is a no-op.
    pub fn set_expanded(&mut self, value: bool) -> bool {
        if self.expanded == value {
            return false;
        }
        self.expanded = value;
        true
    }

    /// Returns whether the value actually changed; writing the current
    /// value is a no-op.
    pub fn set_selected(&mut self, value: bool) -> bool {
        if self.selected == value {
            return false;
        }
        self.selected = value;
        true
    }

    /// Accepts an untyped mode index from the UI boundary. An index outside
    /// the closed mode set is rejected and the previous mode is kept.
    pub fn set_compare_mode(&mut self, index: i32) -> Result<bool, SheetError> {
        let mode = CompareMode::from_index(index).ok_or_else(|| {
            SheetError::InvalidArgument(format!("compare mode index {index} is out of range"))
        })?;
        if self.compare_mode == mode {
            return Ok(false);
        }
        self.compare_mode = mode;
        Ok(true)
    }
}
