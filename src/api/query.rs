use juniper::graphql_object;

use super::{
    Context,
    err::ApiResult,
    model::{post::Post, user::User},
};


/// The root query object.
pub(crate) struct Query;

#[graphql_object(Context = Context)]
impl Query {
    /// Returns a user living in the given city, or `null` if there is none.
    async fn user(city: String, context: &Context) -> ApiResult<Option<User>> {
        User::load_by_city(&city, context).await
    }

    /// Returns the post with the given slug, or `null` if there is none.
    async fn post(slug: String, context: &Context) -> ApiResult<Option<Post>> {
        Post::load_by_slug(&slug, context).await
    }
}
