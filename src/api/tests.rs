use juniper::{DefaultScalarValue, ExecutionError, Value, Variables};
use mongodb::bson::{doc, oid::ObjectId};
use serde_json::json;
use std::sync::Arc;

use crate::db::test_util::MemoryStore;
use super::{Context, model::{post::Post, user::User}, root_node};


fn sample_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store
        .insert(User::COLLECTION, doc! { "name": "Alice", "age": 30, "city": "Berlin" })
        .insert(User::COLLECTION, doc! { "name": "Bob", "age": 41.0, "city": "Paris" })
        .insert(Post::COLLECTION, doc! { "id": "p1", "slug": "hello", "title": "Hello World" })
        .insert(Post::COLLECTION, doc! {
            "_id": ObjectId::parse_str("64b7f0c2a1b2c3d4e5f60718").unwrap(),
            "slug": "no-id-field",
            "title": "Uses the ObjectId",
        })
        .insert(Post::COLLECTION, doc! { "id": "p3", "slug": "broken" });
    store
}

async fn run(
    store: MemoryStore,
    query: &str,
) -> (serde_json::Value, Vec<ExecutionError<DefaultScalarValue>>) {
    let context = Context { store: Arc::new(store) };
    let (value, errors) = juniper::execute(query, None, &root_node(), &Variables::new(), &context)
        .await
        .expect("query failed validation");
    (to_json(value), errors)
}

fn to_json(value: Value) -> serde_json::Value {
    serde_json::to_value(value).unwrap()
}


#[tokio::test]
async fn user_by_existing_city() {
    let (data, errors) = run(sample_store(), r#"{ user(city: "Berlin") { name age city } }"#).await;
    assert!(errors.is_empty());
    assert_eq!(data, json!({ "user": { "name": "Alice", "age": 30, "city": "Berlin" } }));
}

#[tokio::test]
async fn user_age_stored_as_double() {
    let (data, errors) = run(sample_store(), r#"{ user(city: "Paris") { name age } }"#).await;
    assert!(errors.is_empty());
    assert_eq!(data, json!({ "user": { "name": "Bob", "age": 41 } }));
}

#[tokio::test]
async fn unknown_city_is_null() {
    let (data, errors) = run(sample_store(), r#"{ user(city: "Atlantis") { name } }"#).await;
    assert!(errors.is_empty());
    assert_eq!(data, json!({ "user": null }));
}

#[tokio::test]
async fn post_by_slug() {
    let (data, errors) = run(sample_store(), r#"{ post(slug: "hello") { id slug title } }"#).await;
    assert!(errors.is_empty());
    assert_eq!(data, json!({ "post": { "id": "p1", "slug": "hello", "title": "Hello World" } }));
}

#[tokio::test]
async fn post_id_falls_back_to_object_id() {
    let (data, errors) = run(sample_store(), r#"{ post(slug: "no-id-field") { id } }"#).await;
    assert!(errors.is_empty());
    assert_eq!(data, json!({ "post": { "id": "64b7f0c2a1b2c3d4e5f60718" } }));
}

#[tokio::test]
async fn unknown_slug_is_null() {
    let (data, errors) = run(sample_store(), r#"{ post(slug: "nope") { title } }"#).await;
    assert!(errors.is_empty());
    assert_eq!(data, json!({ "post": null }));
}

#[tokio::test]
async fn inserted_post_round_trip() {
    let mut store = MemoryStore::new();
    store.insert(Post::COLLECTION, doc! { "id": "42", "slug": "hello", "title": "Hello World" });

    let (data, _) = run(store, r#"{ post(slug: "hello") { title } }"#).await;
    assert_eq!(data["post"]["title"], "Hello World");
}

#[tokio::test]
async fn malformed_document_is_field_error() {
    let (data, errors) = run(sample_store(), r#"{
        post(slug: "broken") { title }
        user(city: "Berlin") { name }
    }"#).await;

    assert_eq!(data, json!({ "post": null, "user": { "name": "Alice" } }));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].path(), ["post"]);
    assert!(errors[0].error().message().starts_with("Internal server error"));
}

#[tokio::test]
async fn unreachable_store_is_field_error() {
    let (data, errors) = run(
        MemoryStore::unavailable(),
        r#"{ user(city: "Berlin") { name } post(slug: "hello") { title } }"#,
    ).await;

    assert_eq!(data, json!({ "user": null, "post": null }));
    assert_eq!(errors.len(), 2);
    for e in &errors {
        assert!(e.error().message().starts_with("Database unavailable"));
        let ext = to_json(e.error().extensions().clone());
        assert_eq!(ext, json!({ "kind": "DATABASE_UNAVAILABLE" }));
    }
}

#[tokio::test]
async fn missing_argument_fails_validation() {
    let context = Context { store: Arc::new(sample_store()) };
    let result = juniper::execute(
        "{ user { name } }",
        None,
        &root_node(),
        &Variables::new(),
        &context,
    ).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn concurrent_queries_do_not_interfere() {
    let context = Context { store: Arc::new(sample_store()) };
    let root = root_node();
    let cases = [("Berlin", "Alice"), ("Paris", "Bob"), ("Atlantis", "")];

    let queries = (0..30).map(|i| {
        let (city, _) = cases[i % cases.len()];
        format!(r#"{{ user(city: "{city}") {{ name city }} }}"#)
    }).collect::<Vec<_>>();

    let vars = Variables::new();
    let results = futures::future::join_all(queries.iter().map(|q| {
        juniper::execute(q, None, &root, &vars, &context)
    })).await;

    for (i, result) in results.into_iter().enumerate() {
        let (city, name) = cases[i % cases.len()];
        let (value, errors) = result.unwrap();
        assert!(errors.is_empty());
        let data = to_json(value);
        if name.is_empty() {
            assert_eq!(data["user"], serde_json::Value::Null);
        } else {
            assert_eq!(data["user"], json!({ "name": name, "city": city }));
        }
    }
}

#[test]
fn schema_matches_contract() {
    let sdl = root_node().as_sdl();
    assert!(sdl.contains("user(city: String!): User"));
    assert!(sdl.contains("post(slug: String!): Post"));
    assert!(sdl.contains("age: Int!"));
    assert!(sdl.contains("id: ID!"));
}
