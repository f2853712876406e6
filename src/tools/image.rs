//! Stored images (`db_image`).
//!
//! Image content travels base64 encoded in the `image` column. Reads leave
//! it out unless `include_data` is set.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::table::{self, Page, TableSpec};
use super::{default_limit, default_true};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Images, without their content.
pub const IMAGES: TableSpec = TableSpec {
    table: "db_image",
    label: "image",
    plural: "images",
    collection: "images",
    fields: &[
        "sys_id",
        "name",
        "content_type",
        "table_name",
        "table_sys_id",
        "image_type",
        "size_bytes",
        "size_compressed",
        "width",
        "height",
        "format",
        "category",
        "active",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "name",
    alternate_key: None,
};

/// Images including the base64 `image` column.
const IMAGES_WITH_DATA: TableSpec = TableSpec {
    fields: &[
        "sys_id",
        "name",
        "content_type",
        "table_name",
        "table_sys_id",
        "image_type",
        "size_bytes",
        "size_compressed",
        "width",
        "height",
        "format",
        "category",
        "active",
        "sys_created_on",
        "sys_updated_on",
        "image",
    ],
    ..IMAGES
};

fn default_image_type() -> String {
    "attachment".to_string()
}

/// Descriptive metadata shared by create and update.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ImageMetadata {
    /// MIME type (e.g. "image/png").
    #[serde(default)]
    pub content_type: Option<String>,

    /// Table the image belongs to.
    #[serde(default)]
    pub table_name: Option<String>,

    /// Record the image belongs to.
    #[serde(default)]
    pub table_sys_id: Option<String>,

    /// Width in pixels.
    #[serde(default)]
    pub width: Option<i64>,

    /// Height in pixels.
    #[serde(default)]
    pub height: Option<i64>,

    /// Format (e.g. "PNG").
    #[serde(default)]
    pub format: Option<String>,

    /// Image category.
    #[serde(default)]
    pub category: Option<String>,
}

impl ImageMetadata {
    fn apply(&self, body: RecordBody) -> RecordBody {
        body.set_opt("content_type", self.content_type.clone())
            .set_opt("table_name", self.table_name.clone())
            .set_opt("table_sys_id", self.table_sys_id.clone())
            .set_opt("width", self.width)
            .set_opt("height", self.height)
            .set_opt("format", self.format.clone())
            .set_opt("category", self.category.clone())
    }
}

/// Input parameters for the create_image tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreateImageInput {
    /// Image name.
    pub name: String,

    /// Base64 encoded image content.
    pub image_data: String,

    /// Image type (default: "attachment"); e.g. "logo" or "icon".
    #[serde(default = "default_image_type")]
    pub image_type: String,

    /// Size in bytes.
    #[serde(default)]
    pub size_bytes: Option<i64>,

    /// Compressed size in bytes.
    #[serde(default)]
    pub size_compressed: Option<i64>,

    /// Whether the image is active (default: true).
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(flatten)]
    pub metadata: ImageMetadata,
}

impl CreateImageInput {
    /// Request body.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set("name", self.name.as_str())
            .set("image", self.image_data.as_str())
            .set("image_type", self.image_type.as_str())
            .set("active", self.active)
            .set_opt("size_bytes", self.size_bytes)
            .set_opt("size_compressed", self.size_compressed);
        self.metadata.apply(body)
    }
}

/// Input parameters for the update_image tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdateImageInput {
    /// Image sys_id.
    pub image_id: String,

    /// New name.
    #[serde(default)]
    pub name: Option<String>,

    /// New base64 encoded content.
    #[serde(default)]
    pub image_data: Option<String>,

    /// New image type.
    #[serde(default)]
    pub image_type: Option<String>,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    #[serde(flatten)]
    pub metadata: ImageMetadata,
}

impl UpdateImageInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        let body = RecordBody::new()
            .set_opt("name", self.name.clone())
            .set_opt("image", self.image_data.clone())
            .set_opt("image_type", self.image_type.clone())
            .set_opt("active", self.active);
        self.metadata.apply(body)
    }
}

/// Input parameters for the list_images tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListImagesInput {
    /// Maximum number of images to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by owning table.
    #[serde(default)]
    pub table_name: Option<String>,

    /// Filter by owning record.
    #[serde(default)]
    pub table_sys_id: Option<String>,

    /// Filter by image type.
    #[serde(default)]
    pub image_type: Option<String>,

    /// Filter by MIME type.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Filter by category.
    #[serde(default)]
    pub category: Option<String>,

    /// Filter by active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// Search text matched against the name.
    #[serde(default)]
    pub query: Option<String>,
}

impl ListImagesInput {
    fn filter(&self) -> EncodedQuery {
        EncodedQuery::new()
            .equals_opt("table_name", self.table_name.as_deref())
            .equals_opt("table_sys_id", self.table_sys_id.as_deref())
            .equals_opt("image_type", self.image_type.as_deref())
            .equals_opt("content_type", self.content_type.as_deref())
            .equals_opt("category", self.category.as_deref())
            .flag("active", self.active)
            .contains("name", self.query.as_deref())
    }
}

/// Input parameters for the get_image tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetImageInput {
    /// Image sys_id.
    pub image_id: String,

    /// Include the base64 content (default: false).
    #[serde(default)]
    pub include_data: bool,
}

/// Input parameters for the delete_image tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteImageInput {
    /// Image sys_id.
    pub image_id: String,
}

/// Stores an image.
pub async fn create_image(client: &SnowClient, input: CreateImageInput) -> ToolResponse {
    table::create(client, &IMAGES, input.to_body()).await
}

/// Updates an image.
pub async fn update_image(client: &SnowClient, input: UpdateImageInput) -> ToolResponse {
    table::update(client, &IMAGES, &input.image_id, input.to_body()).await
}

/// Lists image metadata.
pub async fn list_images(client: &SnowClient, input: ListImagesInput) -> ToolResponse {
    let page = Page::new(input.limit, input.offset);
    table::list(client, &IMAGES, page, input.filter()).await
}

/// Gets one image, with its content when asked.
pub async fn get_image(client: &SnowClient, input: GetImageInput) -> ToolResponse {
    let spec = if input.include_data {
        &IMAGES_WITH_DATA
    } else {
        &IMAGES
    };
    table::get(client, spec, &input.image_id).await
}

/// Deletes an image.
pub async fn delete_image(client: &SnowClient, input: DeleteImageInput) -> ToolResponse {
    table::delete(client, &IMAGES, &input.image_id).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("image")
        .operation(
            "create_image",
            "Store an image (logo, icon...) from base64 content.",
        )
        .undocumented("update_image")
        .operation(
            "list_images",
            "List stored images without their content, filtered by owner, type, category or name.",
        )
        .operation(
            "get_image",
            "Get a stored image; set include_data to also return its base64 content.",
        )
        .undocumented("delete_image")
        .params::<CreateImageInput>()
        .params::<UpdateImageInput>()
        .params::<ListImagesInput>()
        .params::<GetImageInput>()
        .params::<DeleteImageInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_image_data_is_sent_as_image() {
        let input: CreateImageInput = serde_json::from_value(json!({
            "name": "logo.png",
            "image_data": "iVBORw0KGgo=",
            "content_type": "image/png",
            "width": 64
        }))
        .unwrap();
        let body = input.to_body();
        assert_eq!(body.get("image"), Some(&json!("iVBORw0KGgo=")));
        assert_eq!(body.get("image_type"), Some(&json!("attachment")));
        assert_eq!(body.get("width"), Some(&json!(64)));
        assert!(body.get("image_data").is_none());
    }

    #[test]
    fn test_content_is_read_only_on_request() {
        assert!(!IMAGES.fields.contains(&"image"));
        assert!(IMAGES_WITH_DATA.fields.contains(&"image"));
        assert_eq!(IMAGES_WITH_DATA.table, IMAGES.table);
    }
}
