//! Appointment records from the Medicover export JSON.

use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{MedcalError, MedcalResult};

/// One appointment as exported by the booking system.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    /// External appointment id; numeric in newer exports, string in older ones.
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: String,
    pub clinic_name: String,
    /// Naive date-time string, Warsaw wall-clock.
    pub appointment_date: String,
    /// Visit length in minutes.
    pub duration: i64,
    pub specialization_name: String,
    pub doctor_name: String,
}

fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

/// Read the appointment list from an export file.
pub fn load(path: &Path) -> MedcalResult<Vec<Appointment>> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|e| MedcalError::InputParse(format!("{}: {}", path.display(), e)))
}
