use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }
    };
}

// UDISE code of the school.
id_newtype!(SchoolId);
id_newtype!(RequestId);

/// Lifecycle state of a resource request.
///
/// Transitions happen in the approval workflow on the server. Values this
/// client does not know are carried through verbatim in `Other` so a newer
/// server never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequestStatus {
    Pending,
    Moved,
    Allocated,
    Other(String),
}

impl RequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Moved => "moved",
            Self::Allocated => "allocated",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for RequestStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "moved" => Self::Moved,
            "allocated" => Self::Allocated,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for RequestStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<RequestStatus> for String {
    fn from(value: RequestStatus) -> Self {
        match value {
            RequestStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_decode_to_variants() {
        let statuses: Vec<RequestStatus> =
            serde_json::from_str(r#"["pending","moved","allocated"]"#).expect("decode");
        assert_eq!(
            statuses,
            vec![
                RequestStatus::Pending,
                RequestStatus::Moved,
                RequestStatus::Allocated
            ]
        );
        assert!(statuses.iter().all(RequestStatus::is_known));
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let status: RequestStatus = serde_json::from_str(r#""rejected""#).expect("decode");
        assert_eq!(status, RequestStatus::Other("rejected".to_string()));
        assert!(!status.is_known());
        assert_eq!(
            serde_json::to_string(&status).expect("encode"),
            r#""rejected""#
        );
    }

    #[test]
    fn status_matching_is_case_sensitive() {
        assert_eq!(
            RequestStatus::from("Pending"),
            RequestStatus::Other("Pending".to_string())
        );
    }
}
