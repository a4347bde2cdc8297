use juniper::graphql_object;
use serde::Deserialize;

use crate::{
    api::{Context, err::ApiResult},
    db::{EqFilter, types::deserialize_i32},
    prelude::*,
};


/// A user as stored in the `user` collection.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct User {
    name: String,
    #[serde(deserialize_with = "deserialize_i32")]
    age: i32,
    city: String,
}

impl User {
    pub(crate) const COLLECTION: &'static str = "user";

    /// Loads one user living in `city`. If several do, any one of them is
    /// returned.
    pub(crate) async fn load_by_city(city: &str, context: &Context) -> ApiResult<Option<Self>> {
        let filter = EqFilter::new("city", city);
        let Some(doc) = context.store.find_one(Self::COLLECTION, filter).await? else {
            debug!("No user with city '{city}'");
            return Ok(None);
        };

        Ok(Some(mongodb::bson::from_document(doc)?))
    }
}

#[graphql_object(Context = Context)]
impl User {
    fn name(&self) -> &str {
        &self.name
    }

    fn age(&self) -> i32 {
        self.age
    }

    fn city(&self) -> &str {
        &self.city
    }
}
