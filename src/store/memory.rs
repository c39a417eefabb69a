//! MemoryRecordStore - record store in memoria, usato nei test e per il profilo `memory`

use super::{Filters, Query, RecordStore, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use tracing::{debug, instrument};
use uuid::Uuid;

pub struct MemoryRecordStore {
    tables: DashMap<String, Vec<Value>>,
    updates: AtomicUsize,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        MemoryRecordStore {
            tables: DashMap::new(),
            updates: AtomicUsize::new(0),
        }
    }

    /// Inserisce record già completi (con `id`) senza passare dal contratto del backend
    pub fn seed(&self, table: &str, records: impl IntoIterator<Item = Value>) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .extend(records);
    }

    /// Numero di chiamate `update` ricevute, comprese quelle fallite
    pub fn update_calls(&self) -> usize {
        self.updates.load(AtomicOrdering::SeqCst)
    }

    /// Copia di tutti i record di una tabella
    pub fn records(&self, table: &str) -> Vec<Value> {
        self.tables
            .get(table)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(record: &Value, filters: &Filters) -> bool {
    filters.iter().all(|(field, expected)| {
        let actual = record.get(field).unwrap_or(&Value::Null);
        actual == expected
    })
}

// null in coda, poi numeri, stringhe e booleani nel loro ordine naturale
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Greater,
        (_, Value::Null) => Ordering::Less,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    #[instrument(skip(self, query), fields(table = %table))]
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let mut rows: Vec<Value> = self
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| matches(r, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let a = a.get(&order.field).unwrap_or(&Value::Null);
                let b = b.get(&order.field).unwrap_or(&Value::Null);
                let ord = compare_values(a, b);
                if order.ascending { ord } else { ord.reverse() }
            });
        }

        let offset = query.offset.unwrap_or(0);
        let rows: Vec<Value> = match query.limit {
            Some(limit) => rows.into_iter().skip(offset).take(limit).collect(),
            None => rows.into_iter().skip(offset).collect(),
        };

        debug!("Selected {} records", rows.len());
        Ok(rows)
    }

    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.tables.get(table).and_then(|rows| {
            rows.iter()
                .find(|r| record_id(r) == Some(id))
                .cloned()
        }))
    }

    #[instrument(skip(self, record), fields(table = %table))]
    async fn insert(&self, table: &str, record: Value) -> Result<Value, StoreError> {
        let Value::Object(mut fields) = record else {
            return Err(StoreError::Rejected {
                status: 400,
                body: "record must be a JSON object".to_string(),
            });
        };

        if !fields.get("id").is_some_and(Value::is_string) {
            fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        if !fields.contains_key("created_at") {
            fields.insert("created_at".to_string(), serde_json::to_value(Utc::now())?);
        }

        let record = Value::Object(fields);
        let mut rows = self.tables.entry(table.to_string()).or_default();
        if let Some(id) = record_id(&record) {
            if rows.iter().any(|r| record_id(r) == Some(id)) {
                return Err(StoreError::Conflict(format!("duplicate id {}", id)));
            }
        }
        rows.push(record.clone());
        debug!("Inserted record, table now has {} rows", rows.len());
        Ok(record)
    }

    #[instrument(skip(self, patch), fields(table = %table, id = %id))]
    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<Value, StoreError> {
        self.updates.fetch_add(1, AtomicOrdering::SeqCst);

        let Value::Object(patch) = patch else {
            return Err(StoreError::Rejected {
                status: 400,
                body: "patch must be a JSON object".to_string(),
            });
        };

        let mut rows = self.tables.get_mut(table).ok_or(StoreError::NotFound)?;
        let record = rows
            .iter_mut()
            .find(|r| record_id(r) == Some(id))
            .ok_or(StoreError::NotFound)?;

        if let Value::Object(fields) = &mut *record {
            merge(fields, patch);
        }
        Ok(record.clone())
    }

    #[instrument(skip(self, filters, patch), fields(table = %table))]
    async fn update_matching(
        &self,
        table: &str,
        filters: &Filters,
        patch: Value,
    ) -> Result<Vec<Value>, StoreError> {
        self.updates.fetch_add(1, AtomicOrdering::SeqCst);

        let Value::Object(patch) = patch else {
            return Err(StoreError::Rejected {
                status: 400,
                body: "patch must be a JSON object".to_string(),
            });
        };

        // il lock della tabella resta preso tra verifica e scrittura
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(Vec::new());
        };
        let mut updated = Vec::new();
        for record in rows.iter_mut().filter(|r| matches(r, filters)) {
            if let Value::Object(fields) = &mut *record {
                merge(fields, patch.clone());
            }
            updated.push(record.clone());
        }
        debug!("Conditionally updated {} records", updated.len());
        Ok(updated)
    }

    #[instrument(skip(self, filters), fields(table = %table))]
    async fn delete(&self, table: &str, filters: &Filters) -> Result<u64, StoreError> {
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(0);
        };
        let before = rows.len();
        rows.retain(|r| !matches(r, filters));
        let removed = (before - rows.len()) as u64;
        debug!("Deleted {} records", removed);
        Ok(removed)
    }
}

fn merge(fields: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        if key == "id" {
            continue;
        }
        fields.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_id_and_created_at() {
        let store = MemoryRecordStore::new();
        let saved = store
            .insert("accounts", json!({ "name": "Acme" }))
            .await
            .unwrap();

        assert!(saved["id"].as_str().is_some_and(|id| !id.is_empty()));
        assert!(saved.get("created_at").is_some());
        assert_eq!(store.records("accounts").len(), 1);
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_id() {
        let store = MemoryRecordStore::new();
        store.insert("t", json!({ "id": "x" })).await.unwrap();
        let err = store.insert("t", json!({ "id": "x" })).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn select_filters_orders_and_paginates() {
        let store = MemoryRecordStore::new();
        store.seed(
            "messages",
            vec![
                json!({ "id": "1", "account_id": "acc", "n": 3 }),
                json!({ "id": "2", "account_id": "acc", "n": 1 }),
                json!({ "id": "3", "account_id": "other", "n": 2 }),
                json!({ "id": "4", "account_id": "acc", "n": 2 }),
            ],
        );

        let rows = store
            .select(
                "messages",
                &Query::new().eq("account_id", "acc").order_by("n", false).limit(2),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, vec!["1", "4"]);

        let rows = store
            .select(
                "messages",
                &Query::new().eq("account_id", "acc").order_by("n", true).offset(1),
            )
            .await
            .unwrap();
        let ids: Vec<&str> = rows.iter().filter_map(|r| r["id"].as_str()).collect();
        assert_eq!(ids, vec!["4", "1"]);
    }

    #[tokio::test]
    async fn null_filter_matches_missing_field() {
        let store = MemoryRecordStore::new();
        store.seed(
            "messages",
            vec![
                json!({ "id": "1", "category_id": null }),
                json!({ "id": "2" }),
                json!({ "id": "3", "category_id": "a" }),
            ],
        );
        let rows = store
            .select("messages", &Query::new().eq("category_id", Value::Null))
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn update_merges_patch_and_counts_calls() {
        let store = MemoryRecordStore::new();
        store.seed("accounts", vec![json!({ "id": "a1", "name": "Old", "logo_path": null })]);

        let updated = store
            .update("accounts", "a1", json!({ "name": "New", "id": "ignored" }))
            .await
            .unwrap();
        assert_eq!(updated["name"], "New");
        assert_eq!(updated["id"], "a1");

        let missing = store.update("accounts", "nope", json!({ "name": "x" })).await;
        assert!(matches!(missing, Err(StoreError::NotFound)));
        assert_eq!(store.update_calls(), 2);
    }

    #[tokio::test]
    async fn update_matching_applies_only_while_filters_hold() {
        let store = MemoryRecordStore::new();
        store.seed(
            "account_invites",
            vec![json!({ "id": "i1", "active": true, "accepted_at": null })],
        );
        let mut filters = Filters::new();
        filters.insert("id".to_string(), json!("i1"));
        filters.insert("active".to_string(), json!(true));

        let first = store
            .update_matching("account_invites", &filters, json!({ "active": false }))
            .await
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0]["active"], false);

        // la seconda richiesta trova l'invito già chiuso
        let second = store
            .update_matching("account_invites", &filters, json!({ "active": false }))
            .await
            .unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_only_matching() {
        let store = MemoryRecordStore::new();
        store.seed(
            "account_memberships",
            vec![
                json!({ "id": "m1", "account_id": "a", "user_id": "u1" }),
                json!({ "id": "m2", "account_id": "a", "user_id": "u2" }),
            ],
        );
        let mut filters = Filters::new();
        filters.insert("user_id".to_string(), json!("u2"));
        let removed = store.delete("account_memberships", &filters).await.unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.records("account_memberships").len(), 1);
    }
}
