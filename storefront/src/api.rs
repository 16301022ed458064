//! Data collaborator: record fetch and create against a backend
//!
//! Effects only see the [`DataSource`] trait. [`RestDataSource`] talks to a
//! PostgREST-style HTTP backend; [`MemoryDataSource`] serves the bundled demo
//! catalogue and test fixtures.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// A backend row
pub type Record = serde_json::Map<String, Value>;

/// Backend resource (table) names
pub mod resources {
    pub const HERO_SLIDES: &str = "hero_slides";
    pub const FOOTER_LINKS: &str = "footer_links";
    pub const OFFERS: &str = "offers";
    pub const PRODUCTS: &str = "products";
    pub const SUSTAINABILITY_PILLARS: &str = "sustainability_pillars";
    pub const NEWSLETTER_SUBSCRIBERS: &str = "newsletter_subscribers";
}

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("request to '{resource}' failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("'{resource}' responded with status {status}: {message}")]
    Status {
        resource: String,
        status: u16,
        message: String,
    },

    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    #[error("a record with this {field} already exists in '{resource}'")]
    Conflict { resource: String, field: String },

    #[error("failed to decode '{resource}' records: {source}")]
    Decode {
        resource: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{0}' returned no record")]
    Empty(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// Row filters: equality conditions, ordering and a row limit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters {
    pub eq: Vec<(String, Value)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.eq.push((column.into(), value.into()));
        self
    }

    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending: true,
        });
        self
    }

    pub fn order_by_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending: false,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.eq
            .iter()
            .all(|(column, value)| record.get(column) == Some(value))
    }

    /// PostgREST query string pairs (`col=eq.value`, `order=col.asc`, `limit=n`)
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        for (column, value) in &self.eq {
            let value = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            pairs.push((column.clone(), format!("eq.{value}")));
        }
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            pairs.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }

    fn apply(&self, rows: &[Record]) -> Vec<Record> {
        let mut selected: Vec<Record> = rows.iter().filter(|r| self.matches(r)).cloned().collect();
        if let Some(order) = &self.order {
            selected.sort_by(|a, b| {
                let (a, b) = (a.get(&order.column), b.get(&order.column));
                match (is_missing(a), is_missing(b)) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) if order.ascending => compare_values(a, b),
                    (false, false) => compare_values(a, b).reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

/// Missing values and nulls sort last in either direction.
fn is_missing(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Numbers before strings; other mixed types compare equal.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (Some(Value::Number(_)), _) => Ordering::Less,
        (_, Some(Value::Number(_))) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Record storage behind the effects.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_records(&self, resource: &str, filters: &Filters) -> Result<Vec<Record>, DataError>;

    /// Insert a record and return it as stored (with backend-assigned fields).
    async fn create_record(&self, resource: &str, fields: Record) -> Result<Record, DataError>;
}

/// Decode raw records into typed rows.
pub fn decode<T: DeserializeOwned>(resource: &str, records: Vec<Record>) -> Result<Vec<T>, DataError> {
    records
        .into_iter()
        .map(|record| {
            serde_json::from_value(Value::Object(record)).map_err(|source| DataError::Decode {
                resource: resource.to_string(),
                source,
            })
        })
        .collect()
}

/// Fetch and decode in one step.
pub async fn fetch_as<T: DeserializeOwned>(
    source: &dyn DataSource,
    resource: &str,
    filters: &Filters,
) -> Result<Vec<T>, DataError> {
    let records = source.fetch_records(resource, filters).await?;
    decode(resource, records)
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Record>,
    unique: Vec<String>,
    next_id: u64,
    failure: Option<String>,
}

/// In-memory backend.
///
/// Supports equality filters, ordering, limits, unique columns and id
/// assignment on insert. Resources must be registered with
/// [`MemoryDataSource::with_table`] before use.
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, resource: &str, rows: Vec<Record>) -> Self {
        {
            let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
            let next_id = rows
                .iter()
                .filter_map(|r| r.get("id").and_then(Value::as_u64))
                .max()
                .map_or(1, |max| max + 1);
            let table = tables.entry(resource.to_string()).or_default();
            table.rows = rows;
            table.next_id = next_id;
        }
        self
    }

    /// Reject inserts that repeat an existing value of `column`.
    pub fn with_unique(self, resource: &str, column: &str) -> Self {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(resource.to_string())
            .or_default()
            .unique
            .push(column.to_string());
        self
    }

    /// Make every request to `resource` fail with a 503 carrying `message`.
    pub fn fail_resource(&self, resource: &str, message: impl Into<String>) {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(resource.to_string())
            .or_default()
            .failure = Some(message.into());
    }

    pub fn recover_resource(&self, resource: &str) {
        if let Some(table) = self
            .tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(resource)
        {
            table.failure = None;
        }
    }

    /// Snapshot of a table's rows
    pub fn rows(&self, resource: &str) -> Vec<Record> {
        self.tables
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(resource)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }
}

fn check_failure(resource: &str, table: &Table) -> Result<(), DataError> {
    match &table.failure {
        Some(message) => Err(DataError::Status {
            resource: resource.to_string(),
            status: 503,
            message: message.clone(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn fetch_records(&self, resource: &str, filters: &Filters) -> Result<Vec<Record>, DataError> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let table = tables
            .get(resource)
            .ok_or_else(|| DataError::UnknownResource(resource.to_string()))?;
        check_failure(resource, table)?;
        Ok(filters.apply(&table.rows))
    }

    async fn create_record(&self, resource: &str, mut fields: Record) -> Result<Record, DataError> {
        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        let table = tables
            .get_mut(resource)
            .ok_or_else(|| DataError::UnknownResource(resource.to_string()))?;
        check_failure(resource, table)?;

        for column in &table.unique {
            let Some(value) = fields.get(column) else {
                continue;
            };
            if table.rows.iter().any(|row| row.get(column) == Some(value)) {
                return Err(DataError::Conflict {
                    resource: resource.to_string(),
                    field: column.clone(),
                });
            }
        }

        if !fields.contains_key("id") {
            fields.insert("id".to_string(), Value::from(table.next_id));
            table.next_id += 1;
        }
        table.rows.push(fields.clone());
        Ok(fields)
    }
}

/// PostgREST-style HTTP backend (`{base}/rest/v1/{resource}`).
#[derive(Debug, Clone)]
pub struct RestDataSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestDataSource {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), resource)
    }

    fn request(&self, method: reqwest::Method, resource: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .request(method, self.resource_url(resource))
            .header(reqwest::header::ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => request.header("apikey", key).bearer_auth(key),
            None => request,
        }
    }

    async fn send(&self, resource: &str, request: reqwest::RequestBuilder) -> Result<Vec<Record>, DataError> {
        let transport = |source| DataError::Transport {
            resource: resource.to_string(),
            source,
        };

        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DataError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
                message,
            });
        }
        response.json::<Vec<Record>>().await.map_err(transport)
    }
}

#[async_trait]
impl DataSource for RestDataSource {
    async fn fetch_records(&self, resource: &str, filters: &Filters) -> Result<Vec<Record>, DataError> {
        tracing::debug!(resource, filters = ?filters.eq, "fetching records");
        let request = self
            .request(reqwest::Method::GET, resource)
            .query(&filters.query_pairs());
        self.send(resource, request).await
    }

    async fn create_record(&self, resource: &str, fields: Record) -> Result<Record, DataError> {
        tracing::debug!(resource, "creating record");
        let request = self
            .request(reqwest::Method::POST, resource)
            .header("Prefer", "return=representation")
            .json(&fields);
        self.send(resource, request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DataError::Empty(resource.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn catalogue() -> MemoryDataSource {
        MemoryDataSource::new().with_table(
            "products",
            vec![
                record(json!({"id": 1, "name": "Shell", "category": "outerwear", "price": 149.0})),
                record(json!({"id": 2, "name": "Boot", "category": "footwear", "price": 189.0})),
                record(json!({"id": 3, "name": "Vest", "category": "outerwear", "price": 119.0})),
                record(json!({"id": 4, "name": "Cap", "category": "accessories"})),
            ],
        )
    }

    fn names(rows: &[Record]) -> Vec<&str> {
        rows.iter().filter_map(|r| r.get("name").and_then(Value::as_str)).collect()
    }

    #[tokio::test]
    async fn test_eq_filter_and_order() {
        let source = catalogue();
        let rows = source
            .fetch_records("products", &Filters::new().eq("category", "outerwear").order_by("price"))
            .await
            .unwrap();
        assert_eq!(names(&rows), vec!["Vest", "Shell"]);
    }

    #[tokio::test]
    async fn test_order_desc_puts_missing_last_and_limits() {
        let source = catalogue();
        let all = source
            .fetch_records("products", &Filters::new().order_by("price"))
            .await
            .unwrap();
        assert_eq!(names(&all).last(), Some(&"Cap"));

        let top = source
            .fetch_records("products", &Filters::new().order_by_desc("price").limit(2))
            .await
            .unwrap();
        assert_eq!(names(&top), vec!["Boot", "Shell"]);
    }

    #[tokio::test]
    async fn test_unknown_resource() {
        let err = catalogue()
            .fetch_records("coupons", &Filters::new())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::UnknownResource(ref r) if r == "coupons"));
        assert_eq!(err.to_string(), "unknown resource 'coupons'");
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_enforces_unique() {
        let source = MemoryDataSource::new()
            .with_table("newsletter_subscribers", Vec::new())
            .with_unique("newsletter_subscribers", "email");

        let created = source
            .create_record("newsletter_subscribers", record(json!({"email": "a@example.com"})))
            .await
            .unwrap();
        assert_eq!(created.get("id"), Some(&json!(1)));

        let err = source
            .create_record("newsletter_subscribers", record(json!({"email": "a@example.com"})))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Conflict { ref field, .. } if field == "email"));
        assert_eq!(source.rows("newsletter_subscribers").len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_and_recovery() {
        let source = catalogue();
        source.fail_resource("products", "maintenance");

        let err = source.fetch_records("products", &Filters::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "'products' responded with status 503: maintenance");

        source.recover_resource("products");
        assert_eq!(source.fetch_records("products", &Filters::new()).await.unwrap().len(), 4);
    }

    #[test]
    fn test_query_pairs() {
        let filters = Filters::new().eq("category", "footwear").eq("featured", true).order_by("position").limit(5);
        let pairs = filters.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                ("category".to_string(), "eq.footwear".to_string()),
                ("featured".to_string(), "eq.true".to_string()),
                ("order".to_string(), "position.asc".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_resource_url() {
        let source = RestDataSource::new("https://shop.example.com/", Some("anon".into()));
        assert_eq!(source.resource_url("offers"), "https://shop.example.com/rest/v1/offers");
    }

    #[test]
    fn test_decode_error_names_resource() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Row {
            price: f64,
        }

        let err = decode::<Row>("products", vec![record(json!({"price": "free"}))]).unwrap_err();
        assert!(err.to_string().starts_with("failed to decode 'products' records"));
    }
}
