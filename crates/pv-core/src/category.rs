use core::fmt;
use core::str::FromStr;

use crate::error::PvError;

/// The fixed set of table categories a PEtab problem is made of.
///
/// Declaration order is the display order of the registry tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableCategory {
    Measurement,
    Condition,
    Observable,
    Visualization,
    Simulation,
}

impl TableCategory {
    pub const ALL: [TableCategory; 5] = [
        TableCategory::Measurement,
        TableCategory::Condition,
        TableCategory::Observable,
        TableCategory::Visualization,
        TableCategory::Simulation,
    ];

    /// Key of this category in a manifest problem.
    pub fn manifest_key(self) -> &'static str {
        match self {
            TableCategory::Measurement => "measurement_files",
            TableCategory::Condition => "condition_files",
            TableCategory::Observable => "observable_files",
            TableCategory::Visualization => "visualization_files",
            TableCategory::Simulation => "simulation_files",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TableCategory::Measurement => "Measurement Tables",
            TableCategory::Condition => "Condition Tables",
            TableCategory::Observable => "Observable Tables",
            TableCategory::Visualization => "Visualization Tables",
            TableCategory::Simulation => "Simulation Tables",
        }
    }

    /// Categories whose active table feeds the plots and can be swapped from the tree.
    pub fn is_plotting_slot(self) -> bool {
        matches!(
            self,
            TableCategory::Measurement | TableCategory::Condition | TableCategory::Visualization
        )
    }
}

impl fmt::Display for TableCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableCategory::Measurement => "measurement",
            TableCategory::Condition => "condition",
            TableCategory::Observable => "observable",
            TableCategory::Visualization => "visualization",
            TableCategory::Simulation => "simulation",
        };
        f.write_str(name)
    }
}

impl FromStr for TableCategory {
    type Err = PvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        TableCategory::ALL
            .into_iter()
            .find(|c| c.to_string() == needle || c.manifest_key() == needle)
            .ok_or_else(|| PvError::UnknownCategory {
                name: s.to_string(),
            })
    }
}
