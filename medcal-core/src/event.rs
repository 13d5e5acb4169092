//! Calendar-event construction from appointments.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::appointment::Appointment;
use crate::context::RunContext;
use crate::error::{MedcalError, MedcalResult};
use crate::resolver::ResolvedLocation;

/// UID namespace appended to every appointment id.
pub const UID_DOMAIN: &str = "medicover.pl";

/// All appointment times are treated as Warsaw wall-clock. The zone is
/// attached to the parsed time, never converted into.
pub const TZ: Tz = chrono_tz::Europe::Warsaw;

/// A single calendar event, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub uid: String,
    /// Wall-clock start in [`TZ`].
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub stamp: DateTime<Utc>,
    pub summary: String,
    pub description: String,
    pub location: String,
    pub geo: Option<(f64, f64)>,
}

/// Build one event from an appointment and its resolved location.
///
/// The uid is a pure function of the appointment id, so re-running the
/// builder over the same export always yields the same identities.
pub fn build(
    appointment: &Appointment,
    resolved: Option<&ResolvedLocation<'_>>,
    ctx: &RunContext,
) -> MedcalResult<CalendarEvent> {
    let start = parse_appointment_date(&appointment.appointment_date)?;
    let end = Duration::try_minutes(appointment.duration)
        .and_then(|duration| start.checked_add_signed(duration))
        .ok_or_else(|| {
            MedcalError::InputParse(format!(
                "appointment {}: duration {} minutes is out of range",
                appointment.id, appointment.duration
            ))
        })?;

    let mut summary = appointment.specialization_name.clone();
    if let Some(person) = &ctx.person_name {
        summary.push_str(" – ");
        summary.push_str(person);
    }

    let record = resolved.and_then(|r| r.record);
    let location = match record {
        Some(record) => format!(
            "{}, {}, {}",
            appointment.clinic_name, record.address, record.cityname
        ),
        None => appointment.clinic_name.clone(),
    };
    let geo = record
        .and_then(|r| r.geocode.as_ref())
        .map(|g| (g.geo[0], g.geo[1]));

    Ok(CalendarEvent {
        uid: format!("{}@{}", appointment.id, UID_DOMAIN),
        start,
        end,
        stamp: ctx.batch_stamp,
        summary,
        description: format!(
            "{}, {}",
            appointment.specialization_name, appointment.doctor_name
        ),
        location,
        geo,
    })
}

fn parse_appointment_date(raw: &str) -> MedcalResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| MedcalError::DateParse(raw.to_string()))
}
