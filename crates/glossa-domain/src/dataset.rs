//! Dataset module - registered uploads and their processing lifecycle

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a dataset based on UUIDv7
///
/// UUIDv7 provides:
/// - Chronological sortability for listing recent uploads first
/// - 128-bit uniqueness
/// - RFC 9562-standard format with broad ecosystem support
/// - No coordination required for distributed generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetId(u128);

impl DatasetId {
    /// Generate a new UUIDv7-based DatasetId
    ///
    /// # Examples
    ///
    /// ```
    /// use glossa_domain::DatasetId;
    ///
    /// let id = DatasetId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a DatasetId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a DatasetId from a UUID string
    ///
    /// # Examples
    ///
    /// ```
    /// use glossa_domain::DatasetId;
    ///
    /// let id = DatasetId::new();
    /// let parsed = DatasetId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUID string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }

    /// Get the timestamp component of the UUIDv7 (milliseconds since Unix epoch)
    pub fn timestamp(&self) -> u64 {
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        (self.0 >> 80) as u64
    }
}

impl Default for DatasetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl Serialize for DatasetId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DatasetId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_string(&s).map_err(serde::de::Error::custom)
    }
}

/// Processing lifecycle status of a dataset
///
/// A dataset starts `Pending` when registered, moves to `Processing` when a
/// run picks it up, and ends `Completed` or `Failed`. Processing is
/// fire-and-forget relative to the triggering caller, so this status field is
/// the only way to observe the outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    /// Registered but not yet picked up
    Pending,

    /// A processing run is in flight
    Processing,

    /// Extraction finished and results were persisted
    Completed,

    /// The run hit a fatal error; the message is stored alongside
    Failed,
}

impl ProcessingStatus {
    /// Get the status name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        }
    }

    /// Parse a status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(ProcessingStatus::Pending),
            "processing" => Some(ProcessingStatus::Processing),
            "completed" => Some(ProcessingStatus::Completed),
            "failed" => Some(ProcessingStatus::Failed),
            _ => None,
        }
    }

    /// Whether this status is terminal (no further transitions expected)
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Failed)
    }
}

impl std::str::FromStr for ProcessingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A registered dataset - one uploaded file plus its extraction context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Unique identifier
    pub id: DatasetId,

    /// Human-readable dataset name (shown verbatim in extraction prompts)
    pub name: String,

    /// Original filename of the upload
    pub filename: String,

    /// Declared media type of the upload
    pub media_type: String,

    /// Declared size in bytes
    pub size_bytes: u64,

    /// Path of the raw file in the object store
    pub storage_path: String,

    /// Optional business-context string supplied by the uploader
    pub business_context: Option<String>,

    /// Current processing status
    pub status: ProcessingStatus,

    /// Message attached to the status (error text for `Failed`)
    pub status_message: Option<String>,

    /// When this dataset was registered (Unix seconds)
    pub created_at: u64,
}

impl Dataset {
    /// Create a new dataset record in the `Pending` state
    pub fn new(
        id: DatasetId,
        name: String,
        filename: String,
        media_type: String,
        size_bytes: u64,
        storage_path: String,
        created_at: u64,
    ) -> Self {
        Self {
            id,
            name,
            filename,
            media_type,
            size_bytes,
            storage_path,
            business_context: None,
            status: ProcessingStatus::Pending,
            status_message: None,
            created_at,
        }
    }

    /// Attach a business-context string
    pub fn with_business_context(mut self, context: impl Into<String>) -> Self {
        self.business_context = Some(context.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_id_ordering() {
        let id1 = DatasetId::from_value(1000);
        let id2 = DatasetId::from_value(2000);

        assert!(id1 < id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_dataset_id_string_round_trip() {
        let id = DatasetId::new();
        let parsed = DatasetId::from_string(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_dataset_id_rejects_garbage() {
        assert!(DatasetId::from_string("not-a-uuid").is_err());
    }

    #[test]
    fn test_dataset_id_serde_as_string() {
        let id = DatasetId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert!(json.starts_with('"'));

        let back: DatasetId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            ProcessingStatus::Pending,
            ProcessingStatus::Processing,
            ProcessingStatus::Completed,
            ProcessingStatus::Failed,
        ] {
            assert_eq!(ProcessingStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(!ProcessingStatus::Pending.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(ProcessingStatus::Completed.is_terminal());
        assert!(ProcessingStatus::Failed.is_terminal());
    }

    #[test]
    fn test_dataset_starts_pending() {
        let dataset = Dataset::new(
            DatasetId::new(),
            "Orders".to_string(),
            "orders.csv".to_string(),
            "text/csv".to_string(),
            1024,
            "uploads/orders.csv".to_string(),
            1_700_000_000,
        );
        assert_eq!(dataset.status, ProcessingStatus::Pending);
        assert!(dataset.business_context.is_none());
    }
}
