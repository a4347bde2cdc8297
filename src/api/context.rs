use std::sync::Arc;

use crate::db::DocumentStore;


/// The context that is accessible to every resolver in our API.
pub(crate) struct Context {
    pub(crate) store: Arc<dyn DocumentStore>,
}

impl juniper::Context for Context {}
