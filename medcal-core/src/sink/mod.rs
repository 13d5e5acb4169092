//! Output sinks: ICS file export and CalDAV publishing.

pub mod caldav;
pub mod file;
