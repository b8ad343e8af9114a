//! Passport document models.
//!
//! A passport is a nested, ordered document mirroring a unit tree. Optional
//! entries are `None` when their source data is absent and are skipped when
//! serialized, so the set of keys in the output is exactly the set of
//! populated fields.
//!
//! Keys are human-readable labels taken from [`labels`]. Downstream readers
//! depend on these strings, so they are fixed.

use chrono::TimeDelta;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Static label table for passport keys.
pub mod labels {
    pub const UUID: &str = "Уникальный номер паспорта изделия";
    pub const MODEL: &str = "Модель изделия";
    pub const ASSEMBLY_TIME: &str = "Общая продолжительность сборки";
    pub const STAGES: &str = "Этапы производства";
    pub const COMPONENTS: &str = "Компоненты в составе изделия";
    pub const TOTAL_ASSEMBLY_TIME: &str = "Общая продолжительность сборки (включая компоненты)";
    pub const SERIAL_NUMBER: &str = "Серийный номер изделия";

    pub const STAGE_NAME: &str = "Наименование";
    pub const EMPLOYEE: &str = "Код сотрудника";
    pub const START_TIME: &str = "Время начала";
    pub const END_TIME: &str = "Время окончания";
    pub const VIDEOS: &str = "Видеозаписи процесса сборки в IPFS";
    pub const ADDITIONAL_INFO: &str = "Дополнительная информация";
}

/// Passport section describing one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPassport {
    pub uuid: String,
    pub model_name: String,
    /// Own assembly time; `None` when it could not be computed.
    pub assembly_time: Option<String>,
    /// `None` when the unit has no recorded stages.
    pub stages: Option<Vec<StageRecord>>,
    /// `None` for leaf units.
    pub components: Option<Vec<UnitPassport>>,
    /// Own time plus all component times; set together with `components`.
    pub total_assembly_time: Option<String>,
    pub serial_number: Option<String>,
}

/// Display record for one production stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord {
    pub name: String,
    pub employee_name: String,
    pub session_start_time: String,
    /// `None` serializes as null: the key is always present.
    pub session_end_time: Option<String>,
    /// Gateway URLs of the stage recordings; `None` if not recorded.
    pub video_urls: Option<Vec<String>>,
    pub additional_info: Option<IndexMap<String, String>>,
}

impl Serialize for UnitPassport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(labels::UUID, &self.uuid)?;
        map.serialize_entry(labels::MODEL, &self.model_name)?;
        if let Some(time) = &self.assembly_time {
            map.serialize_entry(labels::ASSEMBLY_TIME, time)?;
        }
        if let Some(stages) = &self.stages {
            map.serialize_entry(labels::STAGES, stages)?;
        }
        if let Some(components) = &self.components {
            map.serialize_entry(labels::COMPONENTS, components)?;
        }
        if let Some(total) = &self.total_assembly_time {
            map.serialize_entry(labels::TOTAL_ASSEMBLY_TIME, total)?;
        }
        if let Some(serial) = &self.serial_number {
            map.serialize_entry(labels::SERIAL_NUMBER, serial)?;
        }
        map.end()
    }
}

impl Serialize for StageRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(labels::STAGE_NAME, &self.name)?;
        map.serialize_entry(labels::EMPLOYEE, &self.employee_name)?;
        map.serialize_entry(labels::START_TIME, &self.session_start_time)?;
        map.serialize_entry(labels::END_TIME, &self.session_end_time)?;
        if let Some(urls) = &self.video_urls {
            map.serialize_entry(labels::VIDEOS, urls)?;
        }
        if let Some(info) = &self.additional_info {
            map.serialize_entry(labels::ADDITIONAL_INFO, info)?;
        }
        map.end()
    }
}

/// Renders a duration as `[N day[s], ]H:MM:SS[.ffffff]`.
///
/// Examples: `0:10:00`, `1 day, 2:03:04`, `0:00:01.500000`. Only the day
/// count carries a sign; the clock part is always the non-negative remainder,
/// so five minutes before zero reads `-1 day, 23:55:00`.
pub fn format_duration(delta: TimeDelta) -> String {
    const MICROS_PER_DAY: i128 = 86_400 * 1_000_000;

    // subsec_nanos shares the sign of num_seconds
    let total_micros =
        i128::from(delta.num_seconds()) * 1_000_000 + i128::from(delta.subsec_nanos() / 1_000);
    let days = total_micros.div_euclid(MICROS_PER_DAY);
    let rest = total_micros.rem_euclid(MICROS_PER_DAY);

    let micros = rest % 1_000_000;
    let total_seconds = rest / 1_000_000;
    let hours = total_seconds / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    let mut out = String::new();
    if days != 0 {
        let suffix = if days.abs() == 1 { "" } else { "s" };
        out.push_str(&format!("{days} day{suffix}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{seconds:02}"));
    if micros > 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}
