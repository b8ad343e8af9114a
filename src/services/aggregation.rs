//! Bottom-up assembly time aggregation over a unit tree.

use chrono::TimeDelta;

use crate::models::{Unit, UnitError};

/// Total assembly time of a unit and all of its components, recursively.
///
/// For a leaf this is exactly the unit's own time. Components are visited
/// depth-first in listed order. Any node's failure to produce its own time
/// aborts the whole computation.
pub fn total_duration(unit: &Unit) -> Result<TimeDelta, UnitError> {
    let mut total = unit.total_assembly_time()?;

    for component in &unit.components_units {
        total = total + total_duration(component)?;
    }

    Ok(total)
}
