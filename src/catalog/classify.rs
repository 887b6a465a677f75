//! Channel kind classification
//!
//! TVHeadend does not send a channel type. It is derived from the `type` tag
//! of the first service in the channel's `services` list:
//!
//! ```text
//! radio                      -> Radio
//! sdtv | hdtv | fhdtv | uhdtv -> TV
//! other                      -> OtherTypePolicy (TV, Radio or ignored)
//! anything else / missing    -> not classified
//! ```
//!
//! Tags are compared case-insensitively; the backend sends e.g. "HDTV".

use std::fmt;
use std::str::FromStr;

use crate::error::FieldError;
use crate::htsmsg::HtsMessage;

use super::entry::ChannelKind;

/// How to treat services tagged `other`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtherTypePolicy {
    /// Leave the channel unclassified (it is dropped from the catalog)
    #[default]
    Ignore,
    /// Publish as a TV channel
    Tv,
    /// Publish as a radio channel
    Radio,
}

impl OtherTypePolicy {
    pub(crate) fn to_u8(self) -> u8 {
        match self {
            OtherTypePolicy::Ignore => 0,
            OtherTypePolicy::Tv => 1,
            OtherTypePolicy::Radio => 2,
        }
    }

    pub(crate) fn from_u8(v: u8) -> Self {
        match v {
            1 => OtherTypePolicy::Tv,
            2 => OtherTypePolicy::Radio,
            _ => OtherTypePolicy::Ignore,
        }
    }
}

impl fmt::Display for OtherTypePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtherTypePolicy::Ignore => write!(f, "Ignore"),
            OtherTypePolicy::Tv => write!(f, "TV"),
            OtherTypePolicy::Radio => write!(f, "Radio"),
        }
    }
}

/// Error for unrecognized policy names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePolicyError(pub String);

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown channel type policy '{}'", self.0)
    }
}

impl std::error::Error for ParsePolicyError {}

impl FromStr for OtherTypePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ignore" => Ok(OtherTypePolicy::Ignore),
            "tv" => Ok(OtherTypePolicy::Tv),
            "radio" => Ok(OtherTypePolicy::Radio),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Map a single service type tag to a channel kind
pub fn classify_service_type(tag: &str, policy: OtherTypePolicy) -> Option<ChannelKind> {
    match tag.to_lowercase().as_str() {
        "radio" => Some(ChannelKind::Radio),
        "sdtv" | "hdtv" | "fhdtv" | "uhdtv" => Some(ChannelKind::Tv),
        "other" => match policy {
            OtherTypePolicy::Tv => {
                tracing::debug!("Mapping service tag 'other' to TV");
                Some(ChannelKind::Tv)
            }
            OtherTypePolicy::Radio => {
                tracing::debug!("Mapping service tag 'other' to Radio");
                Some(ChannelKind::Radio)
            }
            OtherTypePolicy::Ignore => {
                tracing::debug!("Service tag 'other' not mapped, ignoring");
                None
            }
        },
        unknown => {
            tracing::debug!(tag = unknown, "Unknown service tag, ignoring");
            None
        }
    }
}

/// Derive the channel kind of a raw channel record
///
/// Returns `Ok(None)` when the record has no usable service tag. A
/// `services` field of the wrong shape is an error.
pub fn classify_record(
    record: &HtsMessage,
    policy: OtherTypePolicy,
) -> Result<Option<ChannelKind>, FieldError> {
    if !record.contains("services") {
        return Ok(None);
    }

    let services = record.get_list("services")?;
    let Some(first) = services.first() else {
        return Ok(None);
    };

    let service = first.as_map().ok_or_else(|| FieldError::TypeMismatch {
        field: "services".to_string(),
        expected: "list of map",
    })?;

    match service.opt_str("type")? {
        Some(tag) => Ok(classify_service_type(tag, policy)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_service_type(tag: &str) -> HtsMessage {
        HtsMessage::new()
            .with("channelId", 1)
            .with("services", vec![HtsMessage::new().with("type", tag)])
    }

    #[test]
    fn test_classification_table() {
        let cases = [
            ("radio", OtherTypePolicy::Ignore, Some(ChannelKind::Radio)),
            ("Radio", OtherTypePolicy::Ignore, Some(ChannelKind::Radio)),
            ("SDTV", OtherTypePolicy::Ignore, Some(ChannelKind::Tv)),
            ("hdtv", OtherTypePolicy::Ignore, Some(ChannelKind::Tv)),
            ("FHDTV", OtherTypePolicy::Ignore, Some(ChannelKind::Tv)),
            ("UHDTV", OtherTypePolicy::Ignore, Some(ChannelKind::Tv)),
            ("Other", OtherTypePolicy::Tv, Some(ChannelKind::Tv)),
            ("other", OtherTypePolicy::Radio, Some(ChannelKind::Radio)),
            ("other", OtherTypePolicy::Ignore, None),
            ("data", OtherTypePolicy::Tv, None),
            ("", OtherTypePolicy::Radio, None),
        ];

        for (tag, policy, expected) in cases {
            assert_eq!(
                classify_record(&with_service_type(tag), policy),
                Ok(expected),
                "tag {:?} with {:?}",
                tag,
                policy
            );
        }
    }

    #[test]
    fn test_only_first_service_counts() {
        let record = HtsMessage::new().with(
            "services",
            vec![
                HtsMessage::new().with("type", "data"),
                HtsMessage::new().with("type", "HDTV"),
            ],
        );
        assert_eq!(classify_record(&record, OtherTypePolicy::Tv), Ok(None));
    }

    #[test]
    fn test_missing_services() {
        let no_services = HtsMessage::new().with("channelId", 1);
        assert_eq!(classify_record(&no_services, OtherTypePolicy::Tv), Ok(None));

        let empty: Vec<HtsMessage> = Vec::new();
        let empty_services = HtsMessage::new().with("services", empty);
        assert_eq!(classify_record(&empty_services, OtherTypePolicy::Tv), Ok(None));

        let untyped = HtsMessage::new().with("services", vec![HtsMessage::new().with("id", 3)]);
        assert_eq!(classify_record(&untyped, OtherTypePolicy::Tv), Ok(None));
    }

    #[test]
    fn test_malformed_services() {
        let not_a_list = HtsMessage::new().with("services", "HDTV");
        assert!(classify_record(&not_a_list, OtherTypePolicy::Ignore).is_err());

        let not_a_map = HtsMessage::new().with("services", vec![1i64]);
        assert!(classify_record(&not_a_map, OtherTypePolicy::Ignore).is_err());

        let numeric_type = HtsMessage::new().with("services", vec![HtsMessage::new().with("type", 2)]);
        assert!(classify_record(&numeric_type, OtherTypePolicy::Ignore).is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Ignore".parse::<OtherTypePolicy>(), Ok(OtherTypePolicy::Ignore));
        assert_eq!("TV".parse::<OtherTypePolicy>(), Ok(OtherTypePolicy::Tv));
        assert_eq!(" radio ".parse::<OtherTypePolicy>(), Ok(OtherTypePolicy::Radio));
        assert!("cable".parse::<OtherTypePolicy>().is_err());
    }

    #[test]
    fn test_policy_u8_roundtrip() {
        for policy in [
            OtherTypePolicy::Ignore,
            OtherTypePolicy::Tv,
            OtherTypePolicy::Radio,
        ] {
            assert_eq!(OtherTypePolicy::from_u8(policy.to_u8()), policy);
        }
        assert_eq!(OtherTypePolicy::from_u8(99), OtherTypePolicy::Ignore);
    }
}
