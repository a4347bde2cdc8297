use juniper::{graphql_object, ID};
use serde::Deserialize;

use crate::{
    api::{Context, err::ApiResult},
    db::{EqFilter, types::DocumentId},
    prelude::*,
};


/// A post as stored in the `post` collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "StoredPost")]
pub(crate) struct Post {
    id: String,
    slug: String,
    title: String,
}

/// Raw document shape. The identifier is taken from `id` if the document has
/// one, and from MongoDB's own `_id` otherwise.
#[derive(Deserialize)]
struct StoredPost {
    id: Option<DocumentId>,
    #[serde(rename = "_id")]
    object_id: Option<DocumentId>,
    slug: String,
    title: String,
}

impl TryFrom<StoredPost> for Post {
    type Error = &'static str;

    fn try_from(src: StoredPost) -> Result<Self, Self::Error> {
        let id = src.id.or(src.object_id).ok_or("post document has neither 'id' nor '_id'")?;
        Ok(Self { id: id.0, slug: src.slug, title: src.title })
    }
}

impl Post {
    pub(crate) const COLLECTION: &'static str = "post";

    /// Loads the post with the given slug.
    pub(crate) async fn load_by_slug(slug: &str, context: &Context) -> ApiResult<Option<Self>> {
        let filter = EqFilter::new("slug", slug);
        let Some(doc) = context.store.find_one(Self::COLLECTION, filter).await? else {
            debug!("No post with slug '{slug}'");
            return Ok(None);
        };

        Ok(Some(mongodb::bson::from_document(doc)?))
    }
}

#[graphql_object(Context = Context)]
impl Post {
    fn id(&self) -> ID {
        ID::new(&self.id)
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }
}
