//! MongoDB menu store.
//!
//! Items live in the `menuitems` collection with camelCase fields, so a
//! catalog written by earlier deployments of the service is read as-is.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use diner_core::RepoError;
use diner_core::domain::{
    Category, CustomizationOption, MenuItem, MenuItemPatch, NewMenuItem, NutritionalInfo,
};
use diner_core::ports::MenuRepository;

use super::MongoConfig;

const COLLECTION: &str = "menuitems";

/// Stored shape of a menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MenuDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    name: String,
    description: String,
    price: f64,
    category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(default = "available_by_default")]
    is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nutritional_info: Option<NutritionalInfo>,
    #[serde(default)]
    customization_options: Vec<CustomizationOption>,
    #[serde(default = "epoch")]
    created_at: bson::DateTime,
    #[serde(default = "epoch")]
    updated_at: bson::DateTime,
}

fn available_by_default() -> bool {
    true
}

fn epoch() -> bson::DateTime {
    bson::DateTime::from_millis(0)
}

fn to_bson_time(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_time(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

impl MenuDocument {
    fn from_new(item: NewMenuItem, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            name: item.name,
            description: item.description,
            price: item.price,
            category: item.category,
            image_url: item.image_url,
            is_available: item.is_available,
            nutritional_info: item.nutritional_info,
            customization_options: item.customization_options,
            created_at: to_bson_time(now),
            updated_at: to_bson_time(now),
        }
    }

    fn into_item(self, id: ObjectId) -> MenuItem {
        MenuItem {
            id: id.to_hex(),
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            is_available: self.is_available,
            nutritional_info: self.nutritional_info,
            customization_options: self.customization_options,
            created_at: from_bson_time(self.created_at),
            updated_at: from_bson_time(self.updated_at),
        }
    }
}

impl TryFrom<MenuDocument> for MenuItem {
    type Error = RepoError;

    fn try_from(document: MenuDocument) -> Result<Self, Self::Error> {
        let id = document
            .id
            .ok_or_else(|| RepoError::Query("Menu document without _id".to_string()))?;
        Ok(document.into_item(id))
    }
}

fn query_error(e: mongodb::error::Error) -> RepoError {
    RepoError::Query(e.to_string())
}

/// Unparseable ids cannot match any document.
fn parse_id(id: &str) -> Result<ObjectId, RepoError> {
    ObjectId::parse_str(id).map_err(|_| RepoError::NotFound)
}

/// Menu catalog on MongoDB.
pub struct MongoMenuRepository {
    collection: Collection<MenuDocument>,
}

impl MongoMenuRepository {
    /// Connect, verify the server answers, and make sure listing indexes exist.
    pub async fn connect(config: &MongoConfig) -> Result<Self, RepoError> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;
        let database = client.database(&config.database);

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))?;

        let repo = Self {
            collection: database.collection(COLLECTION),
        };
        repo.ensure_indexes().await?;

        tracing::info!(database = %config.database, "Menu store connected");
        Ok(repo)
    }

    async fn ensure_indexes(&self) -> Result<(), RepoError> {
        let indexes = [
            IndexModel::builder().keys(doc! { "category": 1 }).build(),
            IndexModel::builder().keys(doc! { "isAvailable": 1 }).build(),
        ];
        self.collection
            .create_indexes(indexes)
            .await
            .map_err(query_error)?;
        Ok(())
    }
}

#[async_trait]
impl MenuRepository for MongoMenuRepository {
    async fn list_available(&self) -> Result<Vec<MenuItem>, RepoError> {
        let documents: Vec<MenuDocument> = self
            .collection
            .find(doc! { "isAvailable": true })
            .await
            .map_err(query_error)?
            .try_collect()
            .await
            .map_err(query_error)?;

        documents.into_iter().map(MenuItem::try_from).collect()
    }

    async fn create(&self, item: NewMenuItem) -> Result<MenuItem, RepoError> {
        let document = MenuDocument::from_new(item, Utc::now());
        let inserted = self
            .collection
            .insert_one(&document)
            .await
            .map_err(query_error)?;

        let id = match inserted.inserted_id {
            Bson::ObjectId(id) => id,
            other => {
                return Err(RepoError::Query(format!(
                    "Unexpected inserted id type: {other}"
                )));
            }
        };

        tracing::info!(menu_item_id = %id, "Menu item created");
        Ok(document.into_item(id))
    }

    async fn update(&self, id: &str, patch: MenuItemPatch) -> Result<MenuItem, RepoError> {
        let oid = parse_id(id)?;

        let mut changes = bson::to_document(&patch)
            .map_err(|e| RepoError::Query(format!("Unencodable menu patch: {e}")))?;
        changes.insert("updatedAt", to_bson_time(Utc::now()));

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": oid }, doc! { "$set": changes })
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error)?
            .ok_or(RepoError::NotFound)?;

        MenuItem::try_from(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let oid = parse_id(id)?;
        let result = self
            .collection
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(query_error)?;

        if result.deleted_count == 0 {
            return Err(RepoError::NotFound);
        }
        tracing::info!(menu_item_id = %oid, "Menu item deleted");
        Ok(())
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(query_error)?;
        Ok(result.deleted_count)
    }
}
