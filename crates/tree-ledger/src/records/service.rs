use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::domain::{
    next_sequence_number, NewRecord, PlantingRecord, SearchResults, StoredRecord,
    ValidationError, NAME_COLUMN,
};
use crate::identity::{bearer_token, IdentityError, IdentityVerifier, VerifiedUser};
use crate::names::normalize;
use crate::storage::{RecordStore, StorageError};

/// Search and append over the record sheet, gated by identity verification.
pub struct RecordService<S, V> {
    store: Arc<S>,
    verifier: Arc<V>,
    append_lock: Mutex<()>,
}

impl<S, V> RecordService<S, V>
where
    S: RecordStore + 'static,
    V: IdentityVerifier + 'static,
{
    pub fn new(store: Arc<S>, verifier: Arc<V>) -> Self {
        Self {
            store,
            verifier,
            append_lock: Mutex::new(()),
        }
    }

    /// Verify the bearer token carried by a request.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<VerifiedUser, RecordServiceError> {
        let token = bearer_token(headers)?;
        let user = self.verifier.verify(token).await?;
        debug!(uid = %user.uid, "request authorized");
        Ok(user)
    }

    /// Every stored record whose submitter name normalizes to the same canonical form.
    pub async fn search(&self, name: &str) -> Result<SearchResults, RecordServiceError> {
        if name.trim().is_empty() {
            return Err(ValidationError {
                missing: vec!["name"],
            }
            .into());
        }

        let wanted = normalize(name);
        info!(query = %name, canonical = %wanted, "searching records");

        let rows = self.store.read_rows().await?;
        let results: Vec<StoredRecord> = rows
            .iter()
            .skip(1)
            .filter(|row| {
                let stored = row.get(NAME_COLUMN).map(String::as_str).unwrap_or("");
                if stored.trim().is_empty() {
                    warn!(?row, "row with missing name");
                    return false;
                }
                let canonical = normalize(stored);
                debug!(stored = %canonical, query = %wanted, "comparing names");
                canonical == wanted
            })
            .map(|row| StoredRecord::from_row(row))
            .collect();

        match results.first() {
            Some(first) => Ok(SearchResults {
                name: first.name.clone(),
                results,
            }),
            None => Err(RecordServiceError::NotFound { name: wanted }),
        }
    }

    /// Validate and append a record, assigning the next sequence number.
    ///
    /// Appends through one service are serialized, so concurrent calls never share a
    /// number. Separate processes writing the same sheet can still collide.
    pub async fn add(&self, request: NewRecord) -> Result<PlantingRecord, RecordServiceError> {
        request.validate()?;

        let _guard = self.append_lock.lock().await;
        let rows = self.store.read_rows().await?;
        let record = request.into_record(next_sequence_number(&rows)?)?;

        self.store.append_row(record.to_row()).await?;
        info!(num = record.num, name = %record.name, "planting record added");
        Ok(record)
    }

    /// Records for a name, or an empty list when nothing matches.
    pub async fn records_for(&self, name: &str) -> Result<Vec<StoredRecord>, RecordServiceError> {
        match self.search(name).await {
            Ok(found) => Ok(found.results),
            Err(RecordServiceError::NotFound { .. }) => Ok(Vec::new()),
            Err(other) => Err(other),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordServiceError {
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Name not found")]
    NotFound { name: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bearer_headers, header, sheet, AcceptingVerifier, MemoryStore};

    fn service(
        store: MemoryStore,
    ) -> (RecordService<MemoryStore, AcceptingVerifier>, Arc<MemoryStore>) {
        let store = Arc::new(store);
        let service = RecordService::new(store.clone(), Arc::new(AcceptingVerifier));
        (service, store)
    }

    fn request(name: &str) -> NewRecord {
        NewRecord {
            date: Some("2024-04-20".to_string()),
            location: Some("North Field".to_string()),
            species: Some("Oak".to_string()),
            name: Some(name.to_string()),
            ..NewRecord::default()
        }
    }

    #[tokio::test]
    async fn search_matches_regardless_of_format() {
        let (service, _) = service(MemoryStore::with_rows(sheet()));

        let found = service
            .search("TSERAKHAVA anastasiya class of 2026")
            .await
            .expect("match found");

        assert_eq!(found.name, "Tserakhava, Anastasiya - Class of 2026");
        assert_eq!(found.results.len(), 2);
        assert_eq!(found.results[0].num, "1");
        assert_eq!(found.results[1].num, "3");
    }

    #[tokio::test]
    async fn search_without_matches_is_not_found() {
        let (service, _) = service(MemoryStore::with_rows(sheet()));
        match service.search("Nobody Here").await {
            Err(RecordServiceError::NotFound { name }) => assert_eq!(name, "here nobody"),
            other => panic!("expected not found, got {other:?}"),
        }
        assert!(service
            .records_for("Nobody Here")
            .await
            .expect("empty list")
            .is_empty());
    }

    #[tokio::test]
    async fn header_and_blank_names_never_match() {
        let (service, _) = service(MemoryStore::with_rows(sheet()));
        assert!(matches!(
            service.search("Name").await,
            Err(RecordServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn blank_search_name_is_a_validation_error() {
        let (service, _) = service(MemoryStore::with_rows(sheet()));
        match service.search("  ").await {
            Err(RecordServiceError::Validation(error)) => assert_eq!(error.missing, vec!["name"]),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn add_assigns_next_number_and_appends() {
        let (service, store) = service(MemoryStore::with_rows(sheet()));

        let record = service.add(request("Smith, John")).await.expect("added");

        assert_eq!(record.num, 5);
        let rows = store.rows();
        assert_eq!(rows.last().expect("appended row"), &record.to_row());
    }

    #[tokio::test]
    async fn add_to_empty_sheet_starts_at_one() {
        let (service, _) = service(MemoryStore::default());
        let record = service.add(request("Smith, John")).await.expect("added");
        assert_eq!(record.num, 1);
    }

    #[tokio::test]
    async fn invalid_add_does_not_touch_storage() {
        let (service, store) = service(MemoryStore::with_rows(sheet()));
        let mut invalid = request("Smith, John");
        invalid.species = None;

        match service.add(invalid).await {
            Err(RecordServiceError::Validation(error)) => assert_eq!(error.missing, vec!["species"]),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.reads(), 0);
        assert_eq!(store.rows().len(), sheet().len());
    }

    #[tokio::test]
    async fn concurrent_adds_receive_distinct_numbers() {
        let (service, store) = service(MemoryStore::with_rows(vec![header()]).with_latency());
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|index| {
                let service = service.clone();
                tokio::spawn(async move { service.add(request(&format!("Planter {index}"))).await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            numbers.push(handle.await.expect("task joins").expect("added").num);
        }
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=8).collect::<Vec<u64>>());
        assert_eq!(store.rows().len(), 9);
    }

    #[tokio::test]
    async fn storage_failures_propagate() {
        let (service, _) = service(MemoryStore::offline());
        assert!(matches!(
            service.search("Smith John").await,
            Err(RecordServiceError::Storage(_))
        ));
        assert!(matches!(
            service.add(request("Smith John")).await,
            Err(RecordServiceError::Storage(_))
        ));
    }

    #[tokio::test]
    async fn exhausted_sequence_refuses_to_append() {
        let mut rows = sheet();
        rows.push(vec![u64::MAX.to_string(), "2024-05-01".to_string()]);
        let (service, store) = service(MemoryStore::with_rows(rows));

        assert!(matches!(
            service.add(request("Smith, John")).await,
            Err(RecordServiceError::Storage(StorageError::SequenceExhausted { .. }))
        ));
        assert_eq!(store.rows().len(), sheet().len() + 1);
    }

    #[tokio::test]
    async fn authorize_requires_bearer_token() {
        let (service, _) = service(MemoryStore::default());
        assert!(matches!(
            service.authorize(&HeaderMap::new()).await,
            Err(RecordServiceError::Identity(IdentityError::MissingToken))
        ));
        let user = service
            .authorize(&bearer_headers("valid-token"))
            .await
            .expect("authorized");
        assert_eq!(user.uid, "uid-valid-token");
    }
}
