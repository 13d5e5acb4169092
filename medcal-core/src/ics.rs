//! ICS document assembly.
//!
//! Two shapes come out of a run: one document per event for individual
//! CalDAV submission, and a single combined document for file export.

use icalendar::{Calendar, Component, EventLike, Property};

use crate::event::{CalendarEvent, TZ};

/// Add a wall-clock datetime property carrying the Warsaw TZID parameter.
fn add_zoned_property(ics_event: &mut icalendar::Event, name: &str, time: &chrono::NaiveDateTime) {
    let mut prop = Property::new(name, time.format("%Y%m%dT%H%M%S").to_string());
    prop.add_parameter("TZID", TZ.name());
    ics_event.append_property(prop);
}

fn vevent(event: &CalendarEvent) -> icalendar::Event {
    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.uid);
    ics_event.summary(&event.summary);
    ics_event.description(&event.description);
    ics_event.location(&event.location);

    ics_event.add_property("DTSTAMP", event.stamp.format("%Y%m%dT%H%M%SZ").to_string());
    add_zoned_property(&mut ics_event, "DTSTART", &event.start);
    add_zoned_property(&mut ics_event, "DTEND", &event.end);

    if let Some((lat, lon)) = event.geo {
        ics_event.add_property("GEO", format!("{lat};{lon}"));
    }

    // Medical appointments are always private
    ics_event.add_property("CLASS", "PRIVATE");

    ics_event.done()
}

/// One calendar document holding a single event.
pub fn event_calendar(event: &CalendarEvent) -> Calendar {
    let mut cal = Calendar::new();
    cal.push(vevent(event));
    cal.done()
}

/// Single document holding the whole batch.
pub fn combined_calendar(events: &[CalendarEvent]) -> Calendar {
    let mut cal = Calendar::new();
    for event in events {
        cal.push(vevent(event));
    }
    cal.done()
}
