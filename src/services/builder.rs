//! Builds passport documents from unit trees.

use crate::config::PassportConfig;
use crate::models::{format_duration, ProductionStage, StageRecord, Unit, UnitError, UnitPassport};
use crate::reporter::PassportReporter;
use crate::services::aggregation::total_duration;

/// Recursive unit tree to passport transformation.
///
/// Failure handling is asymmetric. A unit's own assembly time is optional:
/// when it cannot be read, the failure goes to the reporter and the field is
/// left out. The combined time of a unit with components is not: its error
/// is returned and aborts the whole document.
pub struct DocumentBuilder<'a> {
    config: &'a PassportConfig,
    reporter: &'a dyn PassportReporter,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(config: &'a PassportConfig, reporter: &'a dyn PassportReporter) -> Self {
        Self { config, reporter }
    }

    /// Builds the passport for `unit` and, recursively, its components.
    pub fn build(&self, unit: &Unit) -> Result<UnitPassport, UnitError> {
        let assembly_time = match unit.total_assembly_time() {
            Ok(time) => Some(format_duration(time)),
            Err(e) => {
                self.reporter.report_error(&unit.uuid, &e);
                None
            }
        };

        let stages: Option<Vec<StageRecord>> = (!unit.biography.is_empty()).then(|| {
            unit.biography
                .iter()
                .map(|stage| self.stage_record(stage))
                .collect()
        });

        let (components, total_assembly_time) = if unit.is_leaf() {
            (None, None)
        } else {
            let components = unit
                .components_units
                .iter()
                .map(|component| self.build(component))
                .collect::<Result<Vec<_>, _>>()?;
            let total = format_duration(total_duration(unit)?);
            (Some(components), Some(total))
        };

        let serial_number = unit
            .serial_number
            .as_ref()
            .filter(|serial| !serial.is_empty())
            .cloned();

        Ok(UnitPassport {
            uuid: unit.uuid.clone(),
            model_name: unit.model_name.clone(),
            assembly_time,
            stages,
            components,
            total_assembly_time,
            serial_number,
        })
    }

    fn stage_record(&self, stage: &ProductionStage) -> StageRecord {
        StageRecord {
            name: stage.name.clone(),
            employee_name: stage.employee_name.clone(),
            session_start_time: stage.session_start_time.clone(),
            session_end_time: stage.session_end_time.clone(),
            video_urls: stage.video_hashes.as_ref().map(|hashes| {
                hashes
                    .iter()
                    .map(|cid| self.config.video_url(cid))
                    .collect()
            }),
            additional_info: stage
                .additional_info
                .as_ref()
                .filter(|info| !info.is_empty())
                .cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::labels;
    use crate::reporter::MemoryReporter;
    use indexmap::IndexMap;

    fn stage(name: &str, end: Option<&str>) -> ProductionStage {
        ProductionStage::new(
            name,
            "emp-1",
            "01-02-2024 10:00:00",
            end.map(str::to_string),
        )
    }

    fn unit_with_minutes(uuid: &str, minutes: u32) -> Unit {
        let mut unit = Unit::new(uuid, "Widget");
        unit.biography.push(stage(
            "Сборка",
            Some(format!("01-02-2024 10:{minutes:02}:00").as_str()),
        ));
        unit
    }

    fn build(unit: &Unit) -> (Result<UnitPassport, UnitError>, MemoryReporter) {
        let config = PassportConfig::default();
        let reporter = MemoryReporter::new();
        let result = DocumentBuilder::new(&config, &reporter).build(unit);
        (result, reporter)
    }

    #[test]
    fn test_leaf_unit_with_serial() {
        let mut unit = Unit::new("A1", "Widget");
        unit.serial_number = Some("SN-1".to_string());

        let (result, reporter) = build(&unit);
        let passport = result.unwrap();

        assert_eq!(passport.uuid, "A1");
        assert_eq!(passport.model_name, "Widget");
        assert_eq!(passport.assembly_time.as_deref(), Some("0:00:00"));
        assert!(passport.stages.is_none());
        assert!(passport.components.is_none());
        assert!(passport.total_assembly_time.is_none());
        assert_eq!(passport.serial_number.as_deref(), Some("SN-1"));
        assert!(reporter.events().is_empty());
    }

    #[test]
    fn test_leaf_document_keys() {
        let mut unit = unit_with_minutes("A1", 10);
        unit.biography.clear();
        unit.serial_number = Some("SN-1".to_string());

        let (result, _) = build(&unit);
        let value = serde_yaml::to_value(result.unwrap()).unwrap();
        let map = value.as_mapping().unwrap();

        assert_eq!(map.len(), 4);
        assert_eq!(map.get(labels::UUID).unwrap().as_str(), Some("A1"));
        assert_eq!(map.get(labels::MODEL).unwrap().as_str(), Some("Widget"));
        assert!(map.get(labels::ASSEMBLY_TIME).is_some());
        assert_eq!(map.get(labels::SERIAL_NUMBER).unwrap().as_str(), Some("SN-1"));
        assert!(map.get(labels::STAGES).is_none());
        assert!(map.get(labels::COMPONENTS).is_none());
    }

    #[test]
    fn test_empty_serial_is_omitted() {
        let mut unit = Unit::new("A1", "Widget");
        unit.serial_number = Some(String::new());

        let (result, _) = build(&unit);
        assert!(result.unwrap().serial_number.is_none());
    }

    #[test]
    fn test_components_and_combined_total_come_together() {
        let mut parent = unit_with_minutes("U2", 3);
        parent.components_units.push(unit_with_minutes("C1", 5));

        let (result, _) = build(&parent);
        let passport = result.unwrap();

        assert_eq!(passport.assembly_time.as_deref(), Some("0:03:00"));
        let components = passport.components.unwrap();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].uuid, "C1");
        assert_eq!(components[0].assembly_time.as_deref(), Some("0:05:00"));
        assert!(components[0].components.is_none());
        assert!(components[0].total_assembly_time.is_none());
        assert_eq!(passport.total_assembly_time.as_deref(), Some("0:08:00"));
    }

    #[test]
    fn test_component_order_is_preserved() {
        let mut parent = Unit::new("R", "Rack");
        for uuid in ["C3", "C1", "C2"] {
            parent.components_units.push(Unit::new(uuid, "Board"));
        }

        let (result, _) = build(&parent);
        let uuids: Vec<String> = result
            .unwrap()
            .components
            .unwrap()
            .into_iter()
            .map(|c| c.uuid)
            .collect();
        assert_eq!(uuids, vec!["C3", "C1", "C2"]);
    }

    #[test]
    fn test_stage_record_video_states() {
        let mut unit = Unit::new("A1", "Widget");
        let mut not_recorded = stage("Сборка", Some("01-02-2024 10:01:00"));
        not_recorded.video_hashes = None;
        let mut no_segments = stage("Пайка", Some("01-02-2024 10:01:00"));
        no_segments.video_hashes = Some(vec![]);
        let mut recorded = stage("Проверка", Some("01-02-2024 10:01:00"));
        recorded.video_hashes = Some(vec!["cidAAA".to_string(), "cidBBB".to_string()]);
        unit.biography = vec![not_recorded, no_segments, recorded];

        let (result, _) = build(&unit);
        let stages = result.unwrap().stages.unwrap();

        assert_eq!(stages.len(), 3);
        assert_eq!(stages[0].name, "Сборка");
        assert!(stages[0].video_urls.is_none());
        assert_eq!(stages[1].video_urls, Some(vec![]));
        assert_eq!(
            stages[2].video_urls,
            Some(vec![
                "https://gateway.ipfs.io/ipfs/cidAAA".to_string(),
                "https://gateway.ipfs.io/ipfs/cidBBB".to_string(),
            ])
        );
    }

    #[test]
    fn test_additional_info_only_when_non_empty() {
        let mut unit = Unit::new("A1", "Widget");
        let mut empty = stage("Сборка", Some("01-02-2024 10:01:00"));
        empty.additional_info = Some(IndexMap::new());
        let mut noted = stage("Пайка", Some("01-02-2024 10:01:00"));
        let mut info = IndexMap::new();
        info.insert("Партия".to_string(), "42".to_string());
        info.insert("Примечание".to_string(), "без замечаний".to_string());
        noted.additional_info = Some(info.clone());
        unit.biography = vec![empty, noted];

        let (result, _) = build(&unit);
        let stages = result.unwrap().stages.unwrap();

        assert!(stages[0].additional_info.is_none());
        assert_eq!(stages[1].additional_info, Some(info));
    }

    #[test]
    fn test_own_time_failure_omits_field_and_reports() {
        let mut unit = Unit::new("A1", "Widget");
        unit.biography.push(stage("Сборка", None));

        let (result, reporter) = build(&unit);
        let passport = result.unwrap();

        assert!(passport.assembly_time.is_none());
        let stages = passport.stages.unwrap();
        assert!(stages[0].session_end_time.is_none());
        assert_eq!(reporter.failed_units(), vec!["A1".to_string()]);
    }

    #[test]
    fn test_component_own_time_failure_is_fatal_for_parent_total() {
        let mut broken = Unit::new("C1", "Board");
        broken.biography.push(stage("Пайка", None));
        let mut parent = unit_with_minutes("U2", 3);
        parent.components_units.push(broken);

        let (result, reporter) = build(&parent);

        assert!(matches!(
            result,
            Err(UnitError::IncompleteStage { ref unit, .. }) if unit == "C1"
        ));
        // The component's own-time failure was reported before the total failed
        assert_eq!(reporter.failed_units(), vec!["C1".to_string()]);
    }
}
