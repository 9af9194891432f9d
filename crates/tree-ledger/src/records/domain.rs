use serde::{Deserialize, Serialize};

use crate::storage::{Row, StorageError};

/// Activity recorded when the submitter leaves the type blank.
pub const DEFAULT_ACTIVITY: &str = "Tree Planting";

/// Column holding the submitter's name (column H).
pub(crate) const NAME_COLUMN: usize = 7;

/// One logged planting activity, as stored in a sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantingRecord {
    pub num: u64,
    pub date: String,
    pub location: String,
    pub gps_coordinates: String,
    pub type_of_activity: String,
    pub species: String,
    pub remarks: String,
    pub name: String,
}

/// Search hits keep the sequence cell as text so odd sheet contents still display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub num: String,
    pub date: String,
    pub location: String,
    pub gps_coordinates: String,
    pub type_of_activity: String,
    pub species: String,
    pub remarks: String,
    pub name: String,
}

impl StoredRecord {
    /// Missing trailing cells read as empty strings.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
        Self {
            num: cell(0),
            date: cell(1),
            location: cell(2),
            gps_coordinates: cell(3),
            type_of_activity: cell(4),
            species: cell(5),
            remarks: cell(6),
            name: cell(NAME_COLUMN),
        }
    }
}

impl PlantingRecord {
    pub fn to_row(&self) -> Row {
        vec![
            self.num.to_string(),
            self.date.clone(),
            self.location.clone(),
            self.gps_coordinates.clone(),
            self.type_of_activity.clone(),
            self.species.clone(),
            self.remarks.clone(),
            self.name.clone(),
        ]
    }
}

/// Body of an add-record request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub gps_coordinates: Option<String>,
    #[serde(default)]
    pub type_of_activity: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Required fields absent from a request, in form order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl NewRecord {
    /// Check required fields and fill optional ones, producing the row to store under `num`.
    pub fn into_record(self, num: u64) -> Result<PlantingRecord, ValidationError> {
        let date = present(self.date);
        let location = present(self.location);
        let species = present(self.species);
        let name = present(self.name);

        let missing: Vec<&'static str> = [
            ("date", date.is_none()),
            ("location", location.is_none()),
            ("species", species.is_none()),
            ("name", name.is_none()),
        ]
        .into_iter()
        .filter_map(|(field, absent)| absent.then_some(field))
        .collect();

        match (date, location, species, name) {
            (Some(date), Some(location), Some(species), Some(name)) => Ok(PlantingRecord {
                num,
                date,
                location,
                gps_coordinates: self.gps_coordinates.unwrap_or_default(),
                type_of_activity: present(self.type_of_activity)
                    .unwrap_or_else(|| DEFAULT_ACTIVITY.to_string()),
                species,
                remarks: self.remarks.unwrap_or_default(),
                name,
            }),
            _ => Err(ValidationError { missing }),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.clone().into_record(0).map(|_| ())
    }
}

/// Body of a search request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: Option<String>,
}

/// Records whose submitter matches a searched name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub name: String,
    pub results: Vec<StoredRecord>,
}

/// Next sequence number after the rows currently in the sheet.
///
/// The first row is the header. Walking back from the end, the first row whose
/// leading cell parses as a number decides; with none, numbering starts at 1.
/// A last number of `u64::MAX` has no successor and is reported as an error.
pub fn next_sequence_number(rows: &[Row]) -> Result<u64, StorageError> {
    let last = rows
        .iter()
        .skip(1)
        .rev()
        .find_map(|row| row.first().and_then(|cell| cell.trim().parse::<u64>().ok()));

    match last {
        Some(last) => last
            .checked_add(1)
            .ok_or(StorageError::SequenceExhausted { last }),
        None => Ok(1),
    }
}
