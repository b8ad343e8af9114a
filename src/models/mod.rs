//! Domain models: the unit tree consumed by the generator and the passport
//! document it produces.

mod passport;
mod unit;

pub use passport::{format_duration, labels, StageRecord, UnitPassport};
pub use unit::{ProductionStage, Unit, UnitError, TIMESTAMP_FORMAT};
