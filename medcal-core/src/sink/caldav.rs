//! CalDAV publishing sink.
//!
//! Speaks plain WebDAV over HTTP: a PROPFIND on the endpoint discovers the
//! calendar collections, then each per-event document is PUT into the
//! selected collection as its own `.ics` resource.

use icalendar::Calendar;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use url::Url;

use crate::error::{MedcalError, MedcalResult};

/// Certificate-validation policy for the CalDAV channel.
///
/// Skipping validation is opt-in only; some self-hosted CalDAV servers run
/// on self-signed certificates, but the default always verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsPolicy {
    #[default]
    VerifyCerts,
    AcceptInvalidCerts,
}

const PROPFIND_BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
  <d:prop>
    <d:displayname/>
    <d:resourcetype/>
  </d:prop>
</d:propfind>"#;

/// A calendar collection discovered on the server.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCalendar {
    pub display_name: String,
    pub url: Url,
}

pub struct CaldavSink {
    client: Client,
    base_url: Url,
}

impl CaldavSink {
    /// Build the HTTP client for an endpoint. No request is made yet.
    pub fn connect(base_url: Url, tls: TlsPolicy) -> MedcalResult<Self> {
        let mut builder = Client::builder().redirect(reqwest::redirect::Policy::limited(10));
        if tls == TlsPolicy::AcceptInvalidCerts {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .map_err(|e| MedcalError::RemoteConnection(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// PROPFIND the endpoint and return every calendar collection found.
    pub fn list_calendars(&self) -> MedcalResult<Vec<RemoteCalendar>> {
        let response = self
            .client
            .request(
                reqwest::Method::from_bytes(b"PROPFIND").unwrap(),
                self.base_url.clone(),
            )
            .header("Content-Type", "application/xml; charset=utf-8")
            .header("Depth", "1")
            .body(PROPFIND_BODY)
            .send()
            .map_err(|e| MedcalError::RemoteConnection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() && status.as_u16() != 207 {
            return Err(MedcalError::RemoteConnection(format!(
                "PROPFIND on {} returned {}",
                self.base_url, status
            )));
        }

        // Base for href resolution is the final URL, after any redirects
        let final_url = response.url().clone();
        let body = response
            .text()
            .map_err(|e| MedcalError::RemoteConnection(e.to_string()))?;

        parse_calendar_list(&body, &final_url)
    }

    /// Find the collection whose displayname matches exactly.
    pub fn find_calendar(&self, display_name: &str) -> MedcalResult<RemoteCalendar> {
        self.list_calendars()?
            .into_iter()
            .find(|calendar| calendar.display_name == display_name)
            .ok_or_else(|| MedcalError::CalendarNotFound(display_name.to_string()))
    }

    /// PUT one per-event document into the calendar collection.
    ///
    /// `If-None-Match: *` makes the create conditional: a 412 means an event
    /// with this uid already exists on the server and the submission is a
    /// no-op. Returns whether the event was actually created.
    pub fn publish_event(
        &self,
        calendar: &RemoteCalendar,
        uid: &str,
        document: &Calendar,
    ) -> MedcalResult<bool> {
        let url = event_url(&calendar.url, uid)?;
        let response = self
            .client
            .put(url)
            .header("Content-Type", "text/calendar; charset=utf-8")
            .header("If-None-Match", "*")
            .body(document.to_string())
            .send()
            .map_err(|e| MedcalError::RemoteSubmission {
                uid: uid.to_string(),
                reason: e.to_string(),
            })?;

        put_outcome(uid, response.status())
    }
}

/// Map the status of a conditional PUT to the publish outcome: created,
/// already present (412), or a submission error.
fn put_outcome(uid: &str, status: StatusCode) -> MedcalResult<bool> {
    match status {
        StatusCode::PRECONDITION_FAILED => Ok(false),
        status if status.is_success() => Ok(true),
        status => Err(MedcalError::RemoteSubmission {
            uid: uid.to_string(),
            reason: format!("server returned {status}"),
        }),
    }
}

/// Build the URL for an event resource inside a calendar collection.
fn event_url(calendar_url: &Url, uid: &str) -> MedcalResult<Url> {
    let base = calendar_url.as_str().trim_end_matches('/');
    format!("{base}/{uid}.ics")
        .parse()
        .map_err(|e: url::ParseError| MedcalError::RemoteSubmission {
            uid: uid.to_string(),
            reason: e.to_string(),
        })
}

/// Pull calendar collections out of a PROPFIND multistatus response.
///
/// Matches elements by local name so any namespace prefix works. Only
/// responses whose resourcetype carries a CalDAV `calendar` element are
/// kept; the principal and plain collections are skipped.
fn parse_calendar_list(xml: &str, base_url: &Url) -> MedcalResult<Vec<RemoteCalendar>> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| MedcalError::RemoteConnection(format!("bad multistatus response: {e}")))?;
    let root = doc.root_element();

    let mut calendars = Vec::new();
    for response in root
        .descendants()
        .filter(|n| n.tag_name().name() == "response")
    {
        let is_calendar = response
            .descendants()
            .find(|n| n.tag_name().name() == "resourcetype")
            .is_some_and(|rt| rt.children().any(|n| n.tag_name().name() == "calendar"));
        if !is_calendar {
            continue;
        }

        let href = response
            .descendants()
            .find(|n| n.tag_name().name() == "href")
            .and_then(|n| n.text());
        let Some(href) = href else { continue };

        let name = response
            .descendants()
            .find(|n| n.tag_name().name() == "displayname")
            .and_then(|n| n.text());
        let Some(name) = name else { continue };

        let url = base_url
            .join(href)
            .map_err(|e| MedcalError::RemoteConnection(format!("bad href '{href}': {e}")))?;

        calendars.push(RemoteCalendar {
            display_name: name.to_string(),
            url,
        });
    }

    Ok(calendars)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MULTISTATUS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<d:multistatus xmlns:d="DAV:" xmlns:cal="urn:ietf:params:xml:ns:caldav">
  <d:response>
    <d:href>/calendars/user/</d:href>
    <d:propstat>
      <d:prop>
        <d:displayname>user</d:displayname>
        <d:resourcetype><d:collection/></d:resourcetype>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/calendars/user/personal/</d:href>
    <d:propstat>
      <d:prop>
        <d:displayname>Personal</d:displayname>
        <d:resourcetype><d:collection/><cal:calendar/></d:resourcetype>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
  <d:response>
    <d:href>/calendars/user/medicover/</d:href>
    <d:propstat>
      <d:prop>
        <d:displayname>Medicover</d:displayname>
        <d:resourcetype><d:collection/><cal:calendar/></d:resourcetype>
      </d:prop>
      <d:status>HTTP/1.1 200 OK</d:status>
    </d:propstat>
  </d:response>
</d:multistatus>"#;

    fn base() -> Url {
        Url::parse("https://dav.example.com/calendars/user/").unwrap()
    }

    #[test]
    fn test_parse_keeps_only_calendar_collections() {
        let calendars = parse_calendar_list(MULTISTATUS, &base()).unwrap();
        let names: Vec<&str> = calendars.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["Personal", "Medicover"]);
    }

    #[test]
    fn test_parse_resolves_hrefs_against_base() {
        let calendars = parse_calendar_list(MULTISTATUS, &base()).unwrap();
        assert_eq!(
            calendars[1].url.as_str(),
            "https://dav.example.com/calendars/user/medicover/"
        );
    }

    #[test]
    fn test_parse_garbage_is_connection_error() {
        let err = parse_calendar_list("not xml at all", &base()).unwrap_err();
        assert!(matches!(err, MedcalError::RemoteConnection(_)));
    }

    #[test]
    fn test_put_created_is_true() {
        assert!(put_outcome("42@medicover.pl", StatusCode::CREATED).unwrap());
        assert!(put_outcome("42@medicover.pl", StatusCode::NO_CONTENT).unwrap());
    }

    #[test]
    fn test_put_precondition_failed_means_already_on_server() {
        assert!(!put_outcome("42@medicover.pl", StatusCode::PRECONDITION_FAILED).unwrap());
    }

    #[test]
    fn test_put_server_error_is_submission_error() {
        let err = put_outcome("42@medicover.pl", StatusCode::INTERNAL_SERVER_ERROR).unwrap_err();
        assert!(matches!(
            err,
            MedcalError::RemoteSubmission { ref uid, .. } if uid == "42@medicover.pl"
        ));
    }

    #[test]
    fn test_event_url_appends_uid_resource() {
        let calendar = Url::parse("https://dav.example.com/calendars/user/medicover/").unwrap();
        let url = event_url(&calendar, "42@medicover.pl").unwrap();
        assert_eq!(
            url.as_str(),
            "https://dav.example.com/calendars/user/medicover/42@medicover.pl.ics"
        );
    }
}
