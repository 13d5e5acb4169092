//! Run configuration resolved from command-line arguments.

use std::path::PathBuf;

use medcal_core::sink::caldav::TlsPolicy;
use medcal_core::{MedcalError, MedcalResult};
use url::Url;

use crate::Cli;

/// Fully resolved configuration. At least one output target is guaranteed.
#[derive(Debug)]
pub struct SyncConfig {
    pub input: PathBuf,
    pub locations: PathBuf,
    pub output: Option<PathBuf>,
    pub caldav_url: Option<Url>,
    pub person_name: Option<String>,
    pub tls: TlsPolicy,
}

impl SyncConfig {
    /// Validate the parsed arguments before any processing starts.
    pub fn resolve(cli: Cli) -> MedcalResult<Self> {
        if cli.output.is_none() && cli.caldav.is_none() {
            return Err(MedcalError::Config(
                "provide -o/--output for file export or --caldav/CALDAV_URL for CalDAV output"
                    .to_string(),
            ));
        }

        let caldav_url = cli
            .caldav
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| MedcalError::Config(format!("invalid CalDAV URL: {e}")))?;

        let tls = if cli.insecure {
            TlsPolicy::AcceptInvalidCerts
        } else {
            TlsPolicy::VerifyCerts
        };

        Ok(Self {
            input: cli.input,
            locations: cli.locations,
            output: cli.output,
            caldav_url,
            person_name: cli.person_name,
            tls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cli() -> Cli {
        Cli {
            input: PathBuf::from("appointments.json"),
            output: None,
            caldav: None,
            person_name: None,
            locations: PathBuf::from("locations.json"),
            insecure: false,
        }
    }

    #[test]
    fn test_no_target_at_all_is_config_error() {
        let err = SyncConfig::resolve(make_cli()).unwrap_err();
        assert!(matches!(err, MedcalError::Config(_)));
    }

    #[test]
    fn test_output_path_alone_is_enough() {
        let mut cli = make_cli();
        cli.output = Some(PathBuf::from("out.ics"));
        let config = SyncConfig::resolve(cli).unwrap();
        assert!(config.caldav_url.is_none());
    }

    #[test]
    fn test_caldav_endpoint_alone_is_enough() {
        let mut cli = make_cli();
        cli.caldav = Some("https://dav.example.com/".to_string());
        let config = SyncConfig::resolve(cli).unwrap();
        assert_eq!(
            config.caldav_url.unwrap().as_str(),
            "https://dav.example.com/"
        );
    }

    #[test]
    fn test_unparseable_endpoint_is_config_error() {
        let mut cli = make_cli();
        cli.caldav = Some("not a url".to_string());
        assert!(matches!(
            SyncConfig::resolve(cli).unwrap_err(),
            MedcalError::Config(_)
        ));
    }

    #[test]
    fn test_insecure_flag_maps_to_tls_policy() {
        let mut cli = make_cli();
        cli.output = Some(PathBuf::from("out.ics"));
        cli.insecure = true;
        let config = SyncConfig::resolve(cli).unwrap();
        assert_eq!(config.tls, TlsPolicy::AcceptInvalidCerts);
    }
}
