//! MongoDB integration for the heart-failure records collection.

use mongodb::bson::{Bson, Document, doc};
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::sync::{Client, Database};
use tracing::{debug, info, warn};

use crate::constants::MONGODB_URL_KEY;
use crate::data::CollectionSource;
use crate::domain::{Record, Table, Value};
use crate::error::{ErrorKind, PipelineError, ResultExt};

/// URI options that would turn certificate validation off.
const INSECURE_TLS_OPTIONS: [&str; 3] = [
    "tlsinsecure=true",
    "tlsallowinvalidcertificates=true",
    "tlsallowinvalidhostnames=true",
];

/// A connected handle to one database.
///
/// Built once by the composition root and lent by reference to whoever needs
/// it; there is no process-wide instance.
pub struct MongoClient {
    database: Database,
}

impl MongoClient {
    /// Connect using the URL in `MONGODB_URL` (a `.env` file is honoured).
    pub fn from_env(database_name: &str) -> Result<Self, PipelineError> {
        dotenvy::dotenv().ok();
        Self::from_env_key(MONGODB_URL_KEY, database_name)
    }

    /// Connect using the URL stored in the environment variable `key`.
    ///
    /// Fails with a configuration error before any network activity when the
    /// variable is unset or blank.
    pub fn from_env_key(key: &str, database_name: &str) -> Result<Self, PipelineError> {
        let url = connection_url_from_env(key)?;
        Self::connect(&url, database_name)
    }

    /// Connect over TLS and ping `database_name`.
    pub fn connect(url: &str, database_name: &str) -> Result<Self, PipelineError> {
        let options = secure_client_options(url)?;

        let client = Client::with_options(options).context("Failed to create MongoDB client")?;
        let database = client.database(database_name);
        database
            .run_command(doc! { "ping": 1 })
            .run()
            .context(format!("Failed to reach MongoDB database '{database_name}'"))?;

        info!(database = database_name, "MongoDB connection successful");
        Ok(Self { database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

fn connection_url_from_env(key: &str) -> Result<String, PipelineError> {
    match std::env::var(key) {
        Ok(url) if !url.trim().is_empty() => Ok(url),
        _ => Err(PipelineError::new(
            ErrorKind::Configuration,
            format!("Environment key `{key}` is not set."),
        )),
    }
}

/// Parse `url` into client options that always use certificate-validated TLS.
///
/// TLS is switched on when the URL does not mention it. URLs that turn TLS or
/// certificate validation off are refused.
fn secure_client_options(url: &str) -> Result<ClientOptions, PipelineError> {
    ensure_certificate_validation(url)?;

    let mut options = ClientOptions::parse(url)
        .run()
        .context("Failed to parse MongoDB URL")?;

    match &options.tls {
        None => {}
        Some(Tls::Disabled) => {
            return Err(PipelineError::new(
                ErrorKind::Configuration,
                "MongoDB URL disables TLS; only encrypted connections are allowed.",
            ));
        }
        Some(Tls::Enabled(tls)) if tls.allow_invalid_certificates == Some(true) => {
            return Err(PipelineError::new(
                ErrorKind::Configuration,
                "MongoDB URL disables certificate validation.",
            ));
        }
        Some(Tls::Enabled(_)) => {}
    }
    options
        .tls
        .get_or_insert_with(|| Tls::Enabled(TlsOptions::default()));
    Ok(options)
}

fn ensure_certificate_validation(url: &str) -> Result<(), PipelineError> {
    let lowered = url.to_ascii_lowercase();
    if let Some(option) = INSECURE_TLS_OPTIONS.iter().find(|o| lowered.contains(*o)) {
        return Err(PipelineError::new(
            ErrorKind::Configuration,
            format!("MongoDB URL disables certificate validation (`{option}`)."),
        ));
    }
    Ok(())
}

/// Collection exporter backed by a borrowed `MongoClient`.
pub struct HeartFailureData<'a> {
    client: &'a MongoClient,
}

impl<'a> HeartFailureData<'a> {
    pub fn new(client: &'a MongoClient) -> Self {
        Self { client }
    }
}

impl CollectionSource for HeartFailureData<'_> {
    fn export_collection(&self, collection_name: &str) -> Result<Table, PipelineError> {
        let collection = self.client.database().collection::<Document>(collection_name);
        let cursor = collection
            .find(doc! {})
            .run()
            .context(format!("Failed to query collection '{collection_name}'"))?;

        let mut records = Vec::new();
        let mut rejected = 0usize;
        for (position, result) in cursor.enumerate() {
            let document = result.context(format!("Failed to read from collection '{collection_name}'"))?;
            match document_to_record(&document) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    rejected += 1;
                    warn!(collection = collection_name, position, %reason, "Rejected document");
                }
            }
        }

        debug!(
            collection = collection_name,
            accepted = records.len(),
            rejected,
            "Exported collection"
        );
        Ok(Table::from_records(records))
    }
}

/// Flatten one document into a record.
///
/// `_id` is dropped and `"na"` strings become missing values. Documents with
/// nested documents or arrays do not fit a flat table and are rejected.
pub fn document_to_record(document: &Document) -> Result<Record, String> {
    let mut record = Vec::with_capacity(document.len());
    for (key, value) in document {
        if key == "_id" {
            continue;
        }
        record.push((key.clone(), bson_to_value(key, value)?));
    }
    Ok(record)
}

fn bson_to_value(key: &str, value: &Bson) -> Result<Value, String> {
    let value = match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(*b),
        Bson::Int32(i) => Value::Int(i64::from(*i)),
        Bson::Int64(i) => Value::Int(*i),
        Bson::Double(f) if f.is_finite() => Value::Float(*f),
        Bson::Double(_) => Value::Null,
        Bson::String(s) if s.trim().eq_ignore_ascii_case("na") => Value::Null,
        Bson::String(s) => Value::Text(s.clone()),
        Bson::Decimal128(d) => match d.to_string().parse::<f64>() {
            Ok(f) if f.is_finite() => Value::Float(f),
            _ => Value::Text(d.to_string()),
        },
        Bson::ObjectId(oid) => Value::Text(oid.to_hex()),
        Bson::DateTime(dt) => Value::Text(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        Bson::Document(_) | Bson::Array(_) => {
            return Err(format!("field `{key}` holds a nested value"));
        }
        other => Value::Text(other.to_string()),
    };
    Ok(value)
}
