//! Combined-document file export.

use std::path::Path;

use icalendar::Calendar;

use crate::error::MedcalResult;

/// Serialize the combined calendar and write it in one shot.
pub fn write(calendar: &Calendar, path: &Path) -> MedcalResult<()> {
    std::fs::write(path, calendar.to_string())?;
    Ok(())
}
