//! Database related things.

use async_trait::async_trait;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, Credential, ServerAddress},
    Client, Collection, Database,
};
use secrecy::{ExposeSecret, SecretString};
use std::{fmt, time::Duration};

use crate::prelude::*;


pub(crate) mod cmd;
pub(crate) mod types;

#[cfg(test)]
pub(crate) mod test_util;


#[derive(Debug, confique::Config)]
pub(crate) struct DbConfig {
    /// The host the MongoDB server is running on.
    #[config(default = "localhost")]
    pub(crate) host: String,

    /// The port the MongoDB server is listening on.
    #[config(default = 27017)]
    pub(crate) port: u16,

    /// The name of the database that contains the `user` and `post`
    /// collections.
    #[config(default = "graphql1")]
    pub(crate) database: String,

    /// Username to authenticate with. If not set, no authentication is
    /// performed.
    pub(crate) user: Option<String>,

    /// Password to authenticate with. Only used if `user` is set.
    pub(crate) password: Option<SecretString>,

    /// Maximum time to wait for a connection to the server to be established.
    /// Also bounds how long a query waits for a reachable server, so requests
    /// fail in roughly this time if MongoDB is down.
    #[config(default = "5s", deserialize_with = crate::config::deserialize_duration)]
    pub(crate) connect_timeout: Duration,

    /// Maximum number of connections the server keeps open to MongoDB.
    #[config(default = 10)]
    pub(crate) max_pool_size: u32,
}


/// A single `field == value` lookup criterion.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EqFilter<'a> {
    pub(crate) field: &'a str,
    pub(crate) value: &'a str,
}

impl<'a> EqFilter<'a> {
    pub(crate) fn new(field: &'a str, value: &'a str) -> Self {
        Self { field, value }
    }

    pub(crate) fn to_document(self) -> Document {
        let mut doc = Document::new();
        doc.insert(self.field, self.value);
        doc
    }
}

/// Failure to talk to the document store: the server could not be reached,
/// the connection broke or the server refused the command.
#[derive(Debug)]
pub(crate) struct StoreError(anyhow::Error);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(src: mongodb::error::Error) -> Self {
        Self(src.into())
    }
}

impl From<anyhow::Error> for StoreError {
    fn from(src: anyhow::Error) -> Self {
        Self(src)
    }
}

/// Read access to documents, as needed by the API. Each call is independent
/// and holds whatever connection it needs only for its own duration.
#[async_trait]
pub(crate) trait DocumentStore: Send + Sync {
    /// Returns the first document in `collection` matching `filter`, or `None`
    /// if there is no such document.
    async fn find_one(
        &self,
        collection: &str,
        filter: EqFilter<'_>,
    ) -> Result<Option<Document>, StoreError>;
}


/// Handle to the configured MongoDB database.
///
/// Created once per process. The driver keeps a pool of connections
/// internally; every operation checks one out and returns it when done.
#[derive(Clone)]
pub(crate) struct Store {
    db: Database,
}

impl Store {
    /// Creates the client. This does not connect yet: connections are
    /// established lazily by the first operation.
    pub(crate) fn new(config: &DbConfig) -> Result<Self> {
        let address = ServerAddress::parse(format!("{}:{}", config.host, config.port))
            .context("invalid MongoDB host/port")?;

        let mut options = ClientOptions::builder().hosts(vec![address]).build();
        options.app_name = Some("docql".into());
        options.connect_timeout = Some(config.connect_timeout);
        options.server_selection_timeout = Some(config.connect_timeout);
        options.max_pool_size = Some(config.max_pool_size);
        if let Some(user) = &config.user {
            let mut credential = Credential::default();
            credential.username = Some(user.clone());
            credential.password = config.password.as_ref().map(|p| p.expose_secret().to_owned());
            options.credential = Some(credential);
        }

        debug!(
            "Using MongoDB at 'mongodb://{}{}:{}/{}' (connect timeout {:?})",
            config.user.as_ref().map(|u| format!("{u}:*****@")).unwrap_or_default(),
            config.host,
            config.port,
            config.database,
            config.connect_timeout,
        );

        let client = Client::with_options(options).context("failed to create MongoDB client")?;
        Ok(Self { db: client.database(&config.database) })
    }

    /// Selects a collection of the configured database.
    pub(crate) fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    /// Sends a `ping` command to check that the server is reachable.
    pub(crate) async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await
            .with_context(|| format!("failed to ping MongoDB database '{}'", self.db.name()))?;
        debug!("Successfully pinged MongoDB");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for Store {
    async fn find_one(
        &self,
        collection: &str,
        filter: EqFilter<'_>,
    ) -> Result<Option<Document>, StoreError> {
        trace!(collection, field = filter.field, value = filter.value, "Executing lookup");
        let out = self.collection(collection).find_one(filter.to_document()).await?;
        Ok(out)
    }
}
