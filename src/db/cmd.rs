use std::{fs::File, path::{Path, PathBuf}};
use mongodb::bson::{doc, Document};
use serde::Deserialize;

use crate::{
    api::model::{post::Post, user::User},
    config::Config,
    prelude::*,
};
use super::Store;


#[derive(Debug, clap::Subcommand)]
pub(crate) enum DbCommand {
    /// Checks whether the database server is reachable.
    Ping,

    /// Inserts users and posts from a YAML file. Format:
    ///
    /// users:
    ///   - { name: Alice, age: 30, city: Berlin }
    /// posts:
    ///   - { id: "1", slug: hello, title: Hello World }
    Import {
        /// Path to the YAML file.
        file: PathBuf,
    },

    /// Removes all documents from the `user` and `post` collections.
    Clear {
        /// If specified, skips the "Are you sure?" question.
        #[clap(long)]
        yes_absolutely_clear: bool,
    },
}

/// Entry point for `db` commands.
pub(crate) async fn run(cmd: &DbCommand, config: &Config) -> Result<()> {
    let store = Store::new(&config.db)?;

    match cmd {
        DbCommand::Ping => store.ping().await?,
        DbCommand::Import { file } => import(&store, file).await?,
        DbCommand::Clear { yes_absolutely_clear } => {
            clear(&store, config, *yes_absolutely_clear).await?
        }
    }

    Ok(())
}


#[derive(Debug, Deserialize)]
struct ImportData {
    #[serde(default)]
    users: Vec<ImportUser>,

    #[serde(default)]
    posts: Vec<ImportPost>,
}

#[derive(Debug, Deserialize)]
struct ImportUser {
    name: String,
    age: i32,
    city: String,
}

#[derive(Debug, Deserialize)]
struct ImportPost {
    id: String,
    slug: String,
    title: String,
}

impl ImportData {
    fn user_documents(&self) -> Vec<Document> {
        self.users.iter()
            .map(|u| doc! { "name": u.name.as_str(), "age": u.age, "city": u.city.as_str() })
            .collect()
    }

    fn post_documents(&self) -> Vec<Document> {
        self.posts.iter()
            .map(|p| doc! {
                "id": p.id.as_str(),
                "slug": p.slug.as_str(),
                "title": p.title.as_str(),
            })
            .collect()
    }
}

async fn import(store: &Store, path: &Path) -> Result<()> {
    let file = File::open(path)
        .with_context(|| format!("failed to open '{}'", path.display()))?;
    let data: ImportData = serde_yaml::from_reader(file)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    info!("Read {} users and {} posts from YAML file", data.users.len(), data.posts.len());

    for (collection, docs) in [
        (User::COLLECTION, data.user_documents()),
        (Post::COLLECTION, data.post_documents()),
    ] {
        if docs.is_empty() {
            continue;
        }

        let result = store.collection(collection).insert_many(docs).await
            .with_context(|| format!("failed to insert into collection '{collection}'"))?;
        info!("Inserted {} documents into '{collection}'", result.inserted_ids.len());
    }

    Ok(())
}

async fn clear(store: &Store, config: &Config, skip_confirmation: bool) -> Result<()> {
    let collections = [User::COLLECTION, Post::COLLECTION];

    if !skip_confirmation {
        warn!("You are about to delete all users and posts!");

        println!();
        println!("Database: {}:{}/{}", config.db.host, config.db.port, config.db.database);
        println!("The collections currently hold:");
        for name in collections {
            let count = store.collection(name).count_documents(doc! {}).await
                .with_context(|| format!("failed to count documents in '{name}'"))?;
            println!(" - {name} ({count} documents)");
        }

        println!();
        println!("Are you sure you want to remove all these documents? \
            Please double-check the server you are running this on!\n\
            Type 'yes' to proceed to delete the data.");
        crate::cmd::prompt_for_yes()?;
    }

    for name in collections {
        let result = store.collection(name).delete_many(doc! {}).await
            .with_context(|| format!("failed to clear collection '{name}'"))?;
        info!("Deleted {} documents from '{name}'", result.deleted_count);
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::ImportData;

    #[test]
    fn parse_import_file() {
        let yaml = "
users:
  - { name: Alice, age: 30, city: Berlin }
  - name: Bob
    age: 41
    city: Paris
posts:
  - { id: '1', slug: hello, title: Hello World }
";
        let data: ImportData = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(data.user_documents(), vec![
            doc! { "name": "Alice", "age": 30, "city": "Berlin" },
            doc! { "name": "Bob", "age": 41, "city": "Paris" },
        ]);
        assert_eq!(data.post_documents(), vec![
            doc! { "id": "1", "slug": "hello", "title": "Hello World" },
        ]);
    }

    #[test]
    fn sections_are_optional() {
        let data: ImportData = serde_yaml::from_str("posts: []").unwrap();
        assert!(data.users.is_empty());
        assert!(data.post_documents().is_empty());
    }
}
