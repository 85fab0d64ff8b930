//! Simulation record stores
//!
//! Implementations of the [`SimulationStore`](survey_application::SimulationStore)
//! port. Record ids are random UUID v4 strings; neither store ever replaces
//! an existing record.

mod json_file;
mod memory;

pub use json_file::JsonFileSimulationStore;
pub use memory::InMemorySimulationStore;

use survey_application::{RecordId, StoreError};

/// Fresh random record id
pub(crate) fn new_record_id() -> RecordId {
    RecordId::new(uuid::Uuid::new_v4().to_string())
}

/// Ids become file names, so only UUID-like characters are accepted.
pub(crate) fn check_record_id(id: &RecordId) -> Result<(), StoreError> {
    let valid = !id.as_str().is_empty()
        && id
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_id_is_uuid() {
        let id = new_record_id();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());
        assert!(check_record_id(&id).is_ok());
    }

    #[test]
    fn test_check_record_id_rejects_paths() {
        for bad in ["", "../etc/passwd", "a/b", "id.json"] {
            assert!(matches!(
                check_record_id(&RecordId::from(bad)),
                Err(StoreError::InvalidId(_))
            ));
        }
    }
}
