//! MemoryStore - `RecordStore` over process memory

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use reel_core::{
    Clause, Collection, Document, ErrorCallback, Fields, Filter, RecordId, RecordStore, Snapshot,
    SnapshotCallback, StoreChange, StoreError, StoreResult, Subscription,
};
use tracing::instrument;

use super::listeners::{Listener, ListenerRegistry};
use super::seed::SeedData;

type Table = BTreeMap<RecordId, Fields>;

/// Thread-safe in-process record store.
///
/// Change notifications run synchronously on the writing task, after the
/// data lock has been released. Each table is ordered by id, so every
/// snapshot is too.
pub struct MemoryStore {
    tables: RwLock<HashMap<Collection, Table>>,
    listeners: Arc<ListenerRegistry>,
    /// Injected failures per collection
    failures: RwLock<HashMap<Collection, StoreError>>,
    /// Reads issued per collection (one-shot reads and subscriptions)
    queries: DashMap<Collection, u64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            listeners: Arc::new(ListenerRegistry::default()),
            failures: RwLock::new(HashMap::new()),
            queries: DashMap::new(),
        }
    }

    /// Create a store pre-populated with seed data. Seeding is not counted
    /// as a change.
    pub fn with_seed(seed: SeedData) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.write();
            for (collection, documents) in seed.into_collections() {
                let table = tables.entry(collection).or_default();
                for doc in documents {
                    table.insert(doc.id, doc.fields);
                }
            }
        }
        store
    }

    /// Create a store wrapped in Arc
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    // =========================================================================
    // Failure injection
    // =========================================================================

    /// Make every operation on `collection` fail with `error`. Open
    /// listeners on the collection receive the error immediately.
    pub fn fail_collection(&self, collection: Collection, error: StoreError) {
        self.failures.write().insert(collection, error.clone());
        tracing::warn!(collection = %collection, error = %error, "Failure injected");
        self.emit_error(collection, error);
    }

    /// Clear an injected failure
    pub fn restore_collection(&self, collection: Collection) {
        if self.failures.write().remove(&collection).is_some() {
            tracing::info!(collection = %collection, "Failure cleared");
        }
    }

    /// Deliver `error` to every open listener on `collection` without
    /// changing how later operations behave
    pub fn emit_error(&self, collection: Collection, error: StoreError) {
        for listener in self.listeners.for_collection(collection) {
            listener.fail(error.clone());
        }
    }

    fn check_available(&self, collection: Collection) -> StoreResult<()> {
        match self.failures.read().get(&collection) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Reads and subscriptions issued against a collection
    pub fn query_count(&self, collection: Collection) -> u64 {
        self.queries.get(&collection).map_or(0, |count| *count)
    }

    /// Open listeners on a collection
    pub fn listener_count(&self, collection: Collection) -> usize {
        self.listeners.count(collection)
    }

    /// Number of records in a collection
    pub fn len(&self, collection: Collection) -> usize {
        self.tables.read().get(&collection).map_or(0, BTreeMap::len)
    }

    pub fn reset_counters(&self) {
        self.queries.clear();
    }

    fn count_query(&self, collection: Collection) {
        *self.queries.entry(collection).or_insert(0) += 1;
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn validate(filter: &Filter) -> StoreResult<()> {
        if filter.is_nothing() {
            return Err(StoreError::InvalidQuery(
                "an empty predicate cannot be sent to the store".to_string(),
            ));
        }
        let empty_set = filter
            .clauses()
            .iter()
            .find(|c| matches!(c, Clause::In { values, .. } if values.is_empty()));
        if let Some(clause) = empty_set {
            return Err(StoreError::InvalidQuery(format!(
                "'{}' in [] matches nothing",
                clause.field()
            )));
        }
        Ok(())
    }

    fn select(&self, collection: Collection, filter: &Filter) -> Vec<Document> {
        let tables = self.tables.read();
        tables
            .get(&collection)
            .into_iter()
            .flat_map(|table| table.iter())
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .filter(|doc| filter.matches(doc))
            .collect()
    }

    /// Apply a mutation under the write lock, then notify affected listeners.
    /// A mutation that reports no change notifies nobody.
    fn commit<F>(&self, collection: Collection, id: &RecordId, mutate: F) -> StoreResult<()>
    where
        F: FnOnce(&mut Table) -> StoreResult<Option<StoreChange>>,
    {
        let (before, change) = {
            let mut tables = self.tables.write();
            let table = tables.entry(collection).or_default();
            let before = table
                .get(id)
                .map(|fields| Document::new(id.clone(), fields.clone()));
            (before, mutate(table)?)
        };

        let Some(change) = change else {
            return Ok(());
        };

        tracing::debug!(event = %change.event_name(), id = %change.id, "Store change");

        let after = self.tables.read().get(&collection).and_then(|table| {
            table
                .get(id)
                .map(|fields| Document::new(id.clone(), fields.clone()))
        });

        let affected: Vec<Arc<Listener>> = self
            .listeners
            .for_collection(collection)
            .into_iter()
            .filter(|l| {
                before.as_ref().is_some_and(|d| l.filter.matches(d))
                    || after.as_ref().is_some_and(|d| l.filter.matches(d))
            })
            .collect();

        for listener in affected {
            let snapshot = Snapshot::new(collection, self.select(collection, &listener.filter));
            listener.deliver(snapshot);
        }

        Ok(())
    }

    fn merge(target: &mut Fields, patch: Fields) {
        for (key, value) in patch {
            target.insert(key, value);
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    #[instrument(skip(self))]
    async fn read_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        self.read_filtered(collection, &Filter::All).await
    }

    #[instrument(skip(self, filter), fields(filter = %filter))]
    async fn read_filtered(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Vec<Document>> {
        if filter.is_nothing() {
            return Ok(Vec::new());
        }
        Self::validate(filter)?;
        self.check_available(collection)?;
        self.count_query(collection);

        Ok(self.select(collection, filter))
    }

    #[instrument(skip(self))]
    async fn read(&self, collection: Collection, id: &RecordId) -> StoreResult<Option<Document>> {
        self.check_available(collection)?;
        self.count_query(collection);

        Ok(self.tables.read().get(&collection).and_then(|table| {
            table
                .get(id)
                .map(|fields| Document::new(id.clone(), fields.clone()))
        }))
    }

    #[instrument(skip(self, fields))]
    async fn create(&self, collection: Collection, fields: Fields) -> StoreResult<RecordId> {
        self.check_available(collection)?;

        let mut id = RecordId::generate();
        while self
            .tables
            .read()
            .get(&collection)
            .is_some_and(|table| table.contains_key(&id))
        {
            id = RecordId::generate();
        }

        self.commit(collection, &id, |table| {
            table.insert(id.clone(), fields);
            Ok(Some(StoreChange::created(collection, id.clone())))
        })?;

        tracing::info!(collection = %collection, id = %id, "Record created");
        Ok(id)
    }

    #[instrument(skip(self, fields))]
    async fn update(
        &self,
        collection: Collection,
        id: &RecordId,
        fields: Fields,
    ) -> StoreResult<()> {
        self.check_available(collection)?;

        self.commit(collection, id, |table| match table.get_mut(id) {
            Some(existing) => {
                Self::merge(existing, fields);
                Ok(Some(StoreChange::updated(collection, id.clone())))
            }
            None => Err(StoreError::NotFound {
                collection,
                id: id.clone(),
            }),
        })
    }

    #[instrument(skip(self, fields))]
    async fn set(&self, collection: Collection, id: &RecordId, fields: Fields) -> StoreResult<()> {
        self.check_available(collection)?;

        self.commit(collection, id, |table| {
            let change = if let Some(existing) = table.get_mut(id) {
                Self::merge(existing, fields);
                StoreChange::updated(collection, id.clone())
            } else {
                table.insert(id.clone(), fields);
                StoreChange::created(collection, id.clone())
            };
            Ok(Some(change))
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: Collection, id: &RecordId) -> StoreResult<()> {
        self.check_available(collection)?;

        self.commit(collection, id, |table| {
            Ok(table
                .remove(id)
                .map(|_| StoreChange::deleted(collection, id.clone())))
        })
    }

    #[instrument(skip(self, filter, on_snapshot, on_error), fields(filter = %filter))]
    fn subscribe(
        &self,
        collection: Collection,
        filter: &Filter,
        on_snapshot: SnapshotCallback,
        on_error: ErrorCallback,
    ) -> StoreResult<Subscription> {
        Self::validate(filter)?;
        self.count_query(collection);

        let (listener, subscription) =
            self.listeners
                .register(collection, filter.clone(), on_snapshot, on_error);

        // A failing collection still opens the listener; the error arrives
        // through the callback like any other delivery
        match self.check_available(collection) {
            Ok(()) => listener.deliver(Snapshot::new(collection, self.select(collection, filter))),
            Err(error) => listener.fail(error),
        }

        Ok(subscription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use serde_json::{json, Value};

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(fields) => fields,
            _ => panic!("fixture must be an object"),
        }
    }

    #[derive(Default)]
    struct Recorder {
        snapshots: Mutex<Vec<Vec<String>>>,
        errors: Mutex<Vec<StoreError>>,
    }

    impl Recorder {
        fn subscribe(
            self: &Arc<Self>,
            store: &MemoryStore,
            collection: Collection,
            filter: &Filter,
        ) -> StoreResult<Subscription> {
            let snaps = self.clone();
            let errs = self.clone();
            store.subscribe(
                collection,
                filter,
                Arc::new(move |snapshot: Snapshot| {
                    let ids = snapshot
                        .documents
                        .iter()
                        .map(|d| d.id.to_string())
                        .collect();
                    snaps.snapshots.lock().push(ids);
                }),
                Arc::new(move |error| errs.errors.lock().push(error)),
            )
        }

        fn last(&self) -> Vec<String> {
            self.snapshots.lock().last().cloned().unwrap_or_default()
        }

        fn deliveries(&self) -> usize {
            self.snapshots.lock().len()
        }
    }

    #[tokio::test]
    async fn test_crud() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Campaigns, fields(json!({"title": "Brunch"})))
            .await
            .unwrap();

        let doc = store.read(Collection::Campaigns, &id).await.unwrap().unwrap();
        assert_eq!(doc.get_str("title"), Some("Brunch"));

        store
            .update(Collection::Campaigns, &id, fields(json!({"active_status": false})))
            .await
            .unwrap();
        let doc = store.read(Collection::Campaigns, &id).await.unwrap().unwrap();
        assert_eq!(doc.get_str("title"), Some("Brunch"));
        assert_eq!(doc.get_bool("active_status"), Some(false));

        store.delete(Collection::Campaigns, &id).await.unwrap();
        assert!(store.read(Collection::Campaigns, &id).await.unwrap().is_none());
        // Deleting again is not an error
        store.delete(Collection::Campaigns, &id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(Collection::Submissions, &RecordId::new("nope"), Fields::new())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_set_merges_or_creates() {
        let store = MemoryStore::new();
        let id = RecordId::new("s1");
        store
            .set(Collection::Metrics, &id, fields(json!({"views": 10, "likes": 1})))
            .await
            .unwrap();
        store
            .set(Collection::Metrics, &id, fields(json!({"views": 20})))
            .await
            .unwrap();

        let doc = store.read(Collection::Metrics, &id).await.unwrap().unwrap();
        assert_eq!(doc.get_count("views"), Some(20));
        assert_eq!(doc.get_count("likes"), Some(1));
        assert_eq!(store.len(Collection::Metrics), 1);
    }

    #[tokio::test]
    async fn test_read_filtered() {
        let store = MemoryStore::new();
        for (id, campaign) in [("s1", "c1"), ("s2", "c2"), ("s3", "c1")] {
            store
                .set(Collection::Submissions, &RecordId::new(id), fields(json!({"campaignId": campaign})))
                .await
                .unwrap();
        }

        let docs = store
            .read_filtered(Collection::Submissions, &Filter::eq("campaignId", "c1"))
            .await
            .unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["s1", "s3"]);

        store.reset_counters();
        let docs = store
            .read_filtered(Collection::Submissions, &Filter::nothing())
            .await
            .unwrap();
        assert!(docs.is_empty());
        assert_eq!(store.query_count(Collection::Submissions), 0);
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_and_changes() {
        let store = MemoryStore::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = recorder
            .subscribe(&store, Collection::Submissions, &Filter::eq("campaignId", "c1"))
            .unwrap();
        assert_eq!(recorder.deliveries(), 1);
        assert!(recorder.last().is_empty());

        let s1 = RecordId::new("s1");
        store
            .set(Collection::Submissions, &s1, fields(json!({"campaignId": "c1"})))
            .await
            .unwrap();
        assert_eq!(recorder.last(), ["s1"]);

        // A record outside the predicate triggers nothing
        store
            .set(Collection::Submissions, &RecordId::new("s2"), fields(json!({"campaignId": "c2"})))
            .await
            .unwrap();
        assert_eq!(recorder.deliveries(), 2);

        // Moving out of the predicate removes it
        store
            .update(Collection::Submissions, &s1, fields(json!({"campaignId": "c2"})))
            .await
            .unwrap();
        assert_eq!(recorder.deliveries(), 3);
        assert!(recorder.last().is_empty());
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_delivery() {
        let store = MemoryStore::new();
        let recorder = Arc::new(Recorder::default());
        let mut sub = recorder
            .subscribe(&store, Collection::Campaigns, &Filter::all())
            .unwrap();
        assert_eq!(store.listener_count(Collection::Campaigns), 1);

        sub.unsubscribe();
        sub.unsubscribe();
        assert_eq!(store.listener_count(Collection::Campaigns), 0);

        store
            .create(Collection::Campaigns, fields(json!({"title": "x"})))
            .await
            .unwrap();
        assert_eq!(recorder.deliveries(), 1);
    }

    #[tokio::test]
    async fn test_drop_unsubscribes() {
        let store = MemoryStore::new();
        let recorder = Arc::new(Recorder::default());
        {
            let _sub = recorder
                .subscribe(&store, Collection::Users, &Filter::all())
                .unwrap();
        }
        assert_eq!(store.listener_count(Collection::Users), 0);
    }

    #[test]
    fn test_subscribe_rejects_empty_predicates() {
        let store = MemoryStore::new();
        let recorder = Arc::new(Recorder::default());
        let err = recorder
            .subscribe(&store, Collection::Submissions, &Filter::nothing())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));

        let raw = Filter::Where(vec![Clause::In {
            field: "campaignId".into(),
            values: std::collections::BTreeSet::new(),
        }]);
        assert!(recorder
            .subscribe(&store, Collection::Submissions, &raw)
            .is_err());
        assert_eq!(store.query_count(Collection::Submissions), 0);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = recorder
            .subscribe(&store, Collection::Metrics, &Filter::all())
            .unwrap();

        store.fail_collection(
            Collection::Metrics,
            StoreError::PermissionDenied(Collection::Metrics),
        );
        assert_eq!(recorder.errors.lock().len(), 1);
        assert!(store.read_all(Collection::Metrics).await.is_err());

        store.restore_collection(Collection::Metrics);
        assert!(store.read_all(Collection::Metrics).await.is_ok());
        // The listener stays open after an error
        assert_eq!(store.listener_count(Collection::Metrics), 1);
    }

    #[tokio::test]
    async fn test_deleting_missing_record_notifies_nobody() {
        let store = MemoryStore::new();
        let recorder = Arc::new(Recorder::default());
        let _sub = recorder
            .subscribe(&store, Collection::Users, &Filter::all())
            .unwrap();
        assert_eq!(recorder.deliveries(), 1);

        store
            .delete(Collection::Users, &RecordId::new("ghost"))
            .await
            .unwrap();
        assert_eq!(recorder.deliveries(), 1);

        let id = store
            .create(Collection::Users, fields(json!({"role": "admin"})))
            .await
            .unwrap();
        assert_eq!(recorder.deliveries(), 2);
        assert_eq!(recorder.last(), [id.to_string()]);
    }

    #[test]
    fn test_seeded_snapshot_is_ordered_by_id() {
        let seed = SeedData::from_value(json!({
            "campaigns": { "c3": {}, "c1": {}, "c2": {} },
        }))
        .unwrap();
        let store = MemoryStore::with_seed(seed);
        let recorder = Arc::new(Recorder::default());
        let _sub = recorder
            .subscribe(&store, Collection::Campaigns, &Filter::all())
            .unwrap();
        assert_eq!(recorder.last(), ["c1", "c2", "c3"]);
    }
}
