//! Storage service implementation using Apache OpenDAL.

use opendal::{ErrorKind, Operator, services};

use super::config::StorageBackend;
use super::error::StorageError;

/// Storage service for archived statement files.
pub struct StorageService {
    operator: Operator,
    backend: StorageBackend,
}

impl StorageService {
    /// Create a new storage service from a backend configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn from_backend(backend: StorageBackend) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&backend)?;
        Ok(Self { operator, backend })
    }

    fn create_operator(backend: &StorageBackend) -> Result<Operator, StorageError> {
        match backend {
            StorageBackend::S3 {
                endpoint,
                bucket,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .region(region);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageBackend::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Storage key for an archived statement file.
    ///
    /// Format: `reports/{client_id}/{report_id}/{sanitized_filename}`
    #[must_use]
    pub fn report_key(client_id: &str, report_id: &str, filename: &str) -> String {
        format!(
            "reports/{client_id}/{report_id}/{}",
            sanitize_filename(filename)
        )
    }

    /// Delete a file from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails. Callers on the report-deletion
    /// path treat this as best-effort and only log the failure.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }

    /// Backend name for logging.
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        self.backend.name()
    }
}

/// Sanitize filename for storage key.
///
/// Only ASCII alphanumeric characters, dots, hyphens, and underscores
/// survive; everything else becomes an underscore.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("statement.xlsx"), "statement.xlsx");
        assert_eq!(sanitize_filename("q2 report (1).xlsx"), "q2_report__1_.xlsx");
        assert_eq!(sanitize_filename("test@#$%.csv"), "test____.csv");
    }

    #[test]
    fn test_report_key_format() {
        let key = StorageService::report_key("client-1", "report-2", "june 2026.xlsx");
        assert_eq!(key, "reports/client-1/report-2/june_2026.xlsx");
    }

    #[test]
    fn test_local_fs_service_creation() {
        let service = StorageService::from_backend(StorageBackend::local_fs("./test"));
        assert!(service.is_ok());
        assert_eq!(service.unwrap().backend_name(), "local");
    }
}
