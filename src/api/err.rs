//! API error handling.
//!
//! Resolvers return `ApiResult`. The error has `From` impls for the errors
//! that can occur while loading documents, and is turned into a GraphQL field
//! error with a coarse machine readable "kind" in its extensions.

use juniper::{FieldError, IntoFieldError, ScalarValue, graphql_value};
use mongodb::bson;

use crate::{db::StoreError, prelude::*};


pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug)]
pub(crate) struct ApiError {
    pub(crate) msg: String,
    pub(crate) kind: ApiErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// The database could not be reached or failed to execute the lookup.
    DatabaseUnavailable,

    /// Some server error out of control of the API user, e.g. a stored
    /// document that does not have the expected shape.
    InternalServerError,
}

impl ApiErrorKind {
    fn kind_str(&self) -> &'static str {
        match self {
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    fn message_prefix(&self) -> &'static str {
        match self {
            Self::DatabaseUnavailable => "Database unavailable",
            Self::InternalServerError => "Internal server error",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(src: StoreError) -> Self {
        // This is the last point where we have the full error, and it's very
        // likely sent to the user right after.
        error!("DB error when executing lookup: {src}");

        Self {
            msg: src.to_string(),
            kind: ApiErrorKind::DatabaseUnavailable,
        }
    }
}

impl From<bson::de::Error> for ApiError {
    fn from(src: bson::de::Error) -> Self {
        error!("Stored document has unexpected shape: {src}");
        debug!("Detailed error: {src:#?}");

        Self {
            msg: format!("invalid document in database: {src}"),
            kind: ApiErrorKind::InternalServerError,
        }
    }
}

impl<S: ScalarValue> IntoFieldError<S> for ApiError {
    fn into_field_error(self) -> FieldError<S> {
        let msg = format!("{}: {}", self.kind.message_prefix(), self.msg);
        FieldError::new(msg, graphql_value!({ "kind": (self.kind.kind_str()) }))
    }
}
