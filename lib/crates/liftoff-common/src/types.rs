use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resource metadata common to every platform object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    pub guid: String,
}

/// A platform object: metadata plus its entity body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<T> {
    pub metadata: Metadata,
    pub entity: T,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub total_results: u64,
    #[serde(default = "Vec::new")]
    pub resources: Vec<Resource<T>>,
}

/// Application entity as returned by `GET /v2/spaces/:guid/apps`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEntity {
    pub name: String,
    /// Desired state: `STARTED`, `STOPPED` or `PENDING`.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub instances: u32,
    /// Present when the listing was requested with inline relations.
    #[serde(default)]
    pub routes: Vec<Resource<RouteEntity>>,
}

/// Route entity inlined into an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntity {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub domain: Option<Resource<DomainEntity>>,
}

/// Domain entity inlined into a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEntity {
    pub name: String,
}

/// Body of `PUT /v2/apps/:guid` when changing the desired state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppStateUpdate {
    pub state: String,
}

/// Value of one entry in the `GET /v2/apps/:guid/instances` map.
///
/// The map is keyed by the instance index rendered as a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceEntry {
    /// `STARTING`, `RUNNING`, `DOWN`, `FLAPPING`, `CRASHED` or `UNKNOWN`.
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<f64>,
}

/// Numeric or textual backend error code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Error body returned by the platform API on non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

/// Which output stream a log line was written to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    #[default]
    Out,
    Err,
}

/// One newline-delimited JSON record on the log tail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEnvelope {
    /// Emitting component, e.g. `STG`, `App`, `RTR`, `DEA`, `API`.
    pub source_name: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub message_type: MessageType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}
