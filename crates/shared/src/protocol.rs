use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{RequestId, RequestStatus, SchoolId};

/// A resource request as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequest {
    #[serde(alias = "_id")]
    pub id: RequestId,
    #[serde(rename = "UDISE_CODE")]
    pub school_id: SchoolId,
    #[serde(rename = "School_Name")]
    pub school_name: String,
    pub resource_type: String,
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
    pub status: RequestStatus,
    #[serde(rename = "requestDate", with = "calendar_date")]
    pub request_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<String>,
}

/// Body of `POST /api/resource-request/principal/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequestPayload {
    #[serde(rename = "UDISE_CODE")]
    pub school_id: SchoolId,
    #[serde(rename = "School_Name")]
    pub school_name: String,
    pub resource_type: String,
    pub quantity: u32,
    pub description: String,
    #[serde(rename = "adminId")]
    pub requester_role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolNameResponse {
    #[serde(rename = "School_Name", default)]
    pub school_name: Option<String>,
}

/// `yyyy-MM-dd` on the wire. Full RFC 3339 timestamps are accepted on input
/// and truncated to their date.
mod calendar_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|timestamp| timestamp.date_naive())
            .map_err(D::Error::custom)
    }
}
