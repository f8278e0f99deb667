//! File payload module - the transient in-memory form of an upload

/// Raw file bytes plus the metadata declared at upload time
///
/// A payload lives only for the duration of one processing call; the durable
/// copy is the object store's responsibility.
#[derive(Debug, Clone)]
pub struct FilePayload {
    /// Raw file content
    pub bytes: Vec<u8>,

    /// Original filename
    pub filename: String,

    /// Declared media type
    pub media_type: String,

    /// Declared byte size; checked against the size ceiling before any
    /// parsing is attempted
    pub size: u64,
}

impl FilePayload {
    /// Create a payload, deriving the size from the byte buffer
    pub fn new(bytes: Vec<u8>, filename: impl Into<String>, media_type: impl Into<String>) -> Self {
        let size = bytes.len() as u64;
        Self {
            bytes,
            filename: filename.into(),
            media_type: media_type.into(),
            size,
        }
    }

    /// Override the size with the value declared at upload time
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Lowercased filename extension, if any
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_lowercase())
        }
    }
}
