//! Unit and ProductionStage models supplied by the production tracking side.

use chrono::{NaiveDateTime, TimeDelta};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp format used for stage session boundaries.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Errors raised while reading a unit's own recorded work.
#[derive(Error, Debug)]
pub enum UnitError {
    #[error("Stage '{stage}' of unit {unit} has no end time: session is still ongoing")]
    IncompleteStage { unit: String, stage: String },

    #[error("Invalid timestamp '{value}' in stage '{stage}': {source}")]
    InvalidTimestamp {
        stage: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// A manufactured or assembled item, possibly composed of other units.
///
/// Components are owned, so a unit tree is always finite and acyclic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Globally unique identifier.
    pub uuid: String,
    /// Display name of the unit's type.
    pub model_name: String,
    /// Externally assigned identifier, set for finished units only.
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Production stages in chronological order.
    #[serde(default)]
    pub biography: Vec<ProductionStage>,
    /// Units incorporated into this one, in assembly order.
    #[serde(default)]
    pub components_units: Vec<Unit>,
}

impl Unit {
    /// Creates a unit with no stages, components or serial number.
    pub fn new(uuid: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            model_name: model_name.into(),
            serial_number: None,
            biography: Vec::new(),
            components_units: Vec::new(),
        }
    }

    /// Duration of this unit's own stages, excluding components.
    ///
    /// Sums `end - start` over the biography. A unit without stages has
    /// zero own time.
    ///
    /// # Errors
    ///
    /// Fails if any stage is still ongoing or carries an unparsable timestamp.
    pub fn total_assembly_time(&self) -> Result<TimeDelta, UnitError> {
        let mut total = TimeDelta::zero();
        for stage in &self.biography {
            total = total + stage.duration(&self.uuid)?;
        }
        Ok(total)
    }

    /// Returns true when the unit has no components.
    pub fn is_leaf(&self) -> bool {
        self.components_units.is_empty()
    }
}

/// One recorded phase of work performed on a unit by an operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionStage {
    /// Stage label.
    pub name: String,
    /// Identifier of the operator who performed the stage.
    pub employee_name: String,
    /// Session start, formatted with [`TIMESTAMP_FORMAT`].
    pub session_start_time: String,
    /// Session end; `None` while the session is ongoing.
    #[serde(default)]
    pub session_end_time: Option<String>,
    /// IPFS content identifiers of the stage recordings.
    ///
    /// `None` means the stage was not recorded; an empty list means it was
    /// recorded without any segments.
    #[serde(default)]
    pub video_hashes: Option<Vec<String>>,
    /// Free-form supplementary notes.
    #[serde(default)]
    pub additional_info: Option<IndexMap<String, String>>,
}

impl ProductionStage {
    /// Creates a stage with the given session bounds and no recordings.
    pub fn new(
        name: impl Into<String>,
        employee_name: impl Into<String>,
        session_start_time: impl Into<String>,
        session_end_time: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            employee_name: employee_name.into(),
            session_start_time: session_start_time.into(),
            session_end_time,
            video_hashes: None,
            additional_info: None,
        }
    }

    fn duration(&self, unit: &str) -> Result<TimeDelta, UnitError> {
        let end = self
            .session_end_time
            .as_deref()
            .ok_or_else(|| UnitError::IncompleteStage {
                unit: unit.to_string(),
                stage: self.name.clone(),
            })?;

        let start = self.parse_timestamp(&self.session_start_time)?;
        let end = self.parse_timestamp(end)?;
        Ok(end - start)
    }

    fn parse_timestamp(&self, value: &str) -> Result<NaiveDateTime, UnitError> {
        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
            UnitError::InvalidTimestamp {
                stage: self.name.clone(),
                value: value.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(start: &str, end: Option<&str>) -> ProductionStage {
        ProductionStage::new("Сборка", "emp-1", start, end.map(str::to_string))
    }

    #[test]
    fn test_own_time_without_stages_is_zero() {
        let unit = Unit::new("A1", "Widget");
        assert_eq!(unit.total_assembly_time().unwrap(), TimeDelta::zero());
        assert!(unit.is_leaf());
    }

    #[test]
    fn test_own_time_sums_stage_sessions() {
        let mut unit = Unit::new("A1", "Widget");
        unit.biography
            .push(stage("01-02-2024 10:00:00", Some("01-02-2024 10:07:00")));
        unit.biography
            .push(stage("01-02-2024 11:00:00", Some("01-02-2024 11:03:00")));

        assert_eq!(
            unit.total_assembly_time().unwrap(),
            TimeDelta::minutes(10)
        );
    }

    #[test]
    fn test_own_time_fails_for_ongoing_stage() {
        let mut unit = Unit::new("A1", "Widget");
        unit.biography.push(stage("01-02-2024 10:00:00", None));

        let err = unit.total_assembly_time().unwrap_err();
        assert!(matches!(err, UnitError::IncompleteStage { .. }));
        assert!(err.to_string().contains("A1"));
    }

    #[test]
    fn test_own_time_fails_for_invalid_timestamp() {
        let mut unit = Unit::new("A1", "Widget");
        unit.biography
            .push(stage("2024-02-01T10:00:00", Some("01-02-2024 10:07:00")));

        let err = unit.total_assembly_time().unwrap_err();
        match err {
            UnitError::InvalidTimestamp { value, .. } => {
                assert_eq!(value, "2024-02-01T10:00:00")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unit_deserializes_with_defaults() {
        let unit: Unit = serde_json::from_str(
            r#"{
                "uuid": "A1",
                "model_name": "Widget",
                "biography": [{
                    "name": "Пайка",
                    "employee_name": "emp-1",
                    "session_start_time": "01-02-2024 10:00:00",
                    "video_hashes": []
                }]
            }"#,
        )
        .unwrap();

        assert!(unit.serial_number.is_none());
        assert!(unit.components_units.is_empty());
        let stage = &unit.biography[0];
        assert!(stage.session_end_time.is_none());
        assert_eq!(stage.video_hashes, Some(vec![]));
        assert!(stage.additional_info.is_none());
    }
}
