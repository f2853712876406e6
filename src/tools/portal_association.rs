//! Catalogs (`m2m_sp_portal_catalog`) and taxonomies
//! (`m2m_sp_portal_taxonomy`) published on a portal.

use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;

use super::default_limit;
use super::table::{self, Page, TableSpec};
use crate::models::{EncodedQuery, RecordBody, ToolResponse};
use crate::registry::ModuleListing;
use crate::snow_client::SnowClient;

/// Portal to catalog links.
pub const PORTAL_CATALOGS: TableSpec = TableSpec {
    table: "m2m_sp_portal_catalog",
    label: "portal catalog association",
    plural: "portal catalog associations",
    collection: "associations",
    fields: &[
        "sys_id",
        "sp_portal",
        "sc_catalog",
        "order",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "sc_catalog",
    alternate_key: None,
};

/// Portal to taxonomy links.
pub const PORTAL_TAXONOMIES: TableSpec = TableSpec {
    table: "m2m_sp_portal_taxonomy",
    label: "portal taxonomy association",
    plural: "portal taxonomy associations",
    collection: "associations",
    fields: &[
        "sys_id",
        "sp_portal",
        "taxonomy",
        "active",
        "order",
        "sys_created_on",
        "sys_updated_on",
    ],
    name_field: "taxonomy",
    alternate_key: None,
};

fn catalog_body(portal_id: &str, catalog_id: &str) -> RecordBody {
    RecordBody::new()
        .set("sp_portal", portal_id.trim())
        .set("sc_catalog", catalog_id.trim())
}

fn taxonomy_body(portal_id: &str, taxonomy_id: &str) -> RecordBody {
    RecordBody::new()
        .set("sp_portal", portal_id.trim())
        .set("taxonomy", taxonomy_id.trim())
}

/// Input parameters for the create_portal_catalog_association tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePortalCatalogAssociationInput {
    /// Portal sys_id.
    pub portal_id: String,

    /// Catalog sys_id.
    pub catalog_id: String,
}

/// Input parameters for the list_portal_catalog_associations tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPortalCatalogAssociationsInput {
    /// Maximum number of associations to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by portal sys_id.
    #[serde(default)]
    pub portal_id: Option<String>,

    /// Filter by catalog sys_id.
    #[serde(default)]
    pub catalog_id: Option<String>,
}

/// Input parameters for the get_portal_catalog_association tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPortalCatalogAssociationInput {
    /// Association sys_id.
    pub association_id: String,
}

/// Input parameters for the delete_portal_catalog_association tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePortalCatalogAssociationInput {
    /// Association sys_id.
    pub association_id: String,
}

/// Input parameters for the bulk_create_portal_catalog_associations tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkCreatePortalCatalogAssociationsInput {
    /// Portal sys_id.
    pub portal_id: String,

    /// Catalog sys_ids to publish on the portal.
    pub catalog_ids: Vec<String>,
}

/// Input parameters for the create_portal_taxonomy_association tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePortalTaxonomyAssociationInput {
    /// Portal sys_id.
    pub portal_id: String,

    /// Taxonomy sys_id.
    pub taxonomy_id: String,
}

/// Input parameters for the update_portal_taxonomy_association tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct UpdatePortalTaxonomyAssociationInput {
    /// Association sys_id.
    pub association_id: String,

    /// New active status.
    #[serde(default)]
    pub active: Option<bool>,

    /// New display order.
    #[serde(default)]
    pub order: Option<i64>,
}

impl UpdatePortalTaxonomyAssociationInput {
    /// Request body with only the fields provided.
    pub fn to_body(&self) -> RecordBody {
        RecordBody::new()
            .set_opt("active", self.active)
            .set_opt("order", self.order)
    }
}

/// Input parameters for the list_portal_taxonomy_associations tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListPortalTaxonomyAssociationsInput {
    /// Maximum number of associations to return (default: 10).
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: u32,

    /// Filter by portal sys_id.
    #[serde(default)]
    pub portal_id: Option<String>,

    /// Filter by taxonomy sys_id.
    #[serde(default)]
    pub taxonomy_id: Option<String>,
}

/// Input parameters for the get_portal_taxonomy_association tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPortalTaxonomyAssociationInput {
    /// Association sys_id.
    pub association_id: String,
}

/// Input parameters for the delete_portal_taxonomy_association tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePortalTaxonomyAssociationInput {
    /// Association sys_id.
    pub association_id: String,
}

/// Input parameters for the bulk_create_portal_taxonomy_associations tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct BulkCreatePortalTaxonomyAssociationsInput {
    /// Portal sys_id.
    pub portal_id: String,

    /// Taxonomy sys_ids to publish on the portal.
    pub taxonomy_ids: Vec<String>,
}

/// Publishes a catalog on a portal.
pub async fn create_portal_catalog_association(
    client: &SnowClient,
    input: CreatePortalCatalogAssociationInput,
) -> ToolResponse {
    let body = catalog_body(&input.portal_id, &input.catalog_id);
    table::create(client, &PORTAL_CATALOGS, body).await
}

/// Lists portal catalog associations.
pub async fn list_portal_catalog_associations(
    client: &SnowClient,
    input: ListPortalCatalogAssociationsInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("sp_portal", input.portal_id.as_deref())
        .equals_opt("sc_catalog", input.catalog_id.as_deref());
    let page = Page::new(input.limit, input.offset);
    table::list(client, &PORTAL_CATALOGS, page, filter).await
}

/// Gets one portal catalog association.
pub async fn get_portal_catalog_association(
    client: &SnowClient,
    input: GetPortalCatalogAssociationInput,
) -> ToolResponse {
    table::get(client, &PORTAL_CATALOGS, &input.association_id).await
}

/// Removes a catalog from a portal.
pub async fn delete_portal_catalog_association(
    client: &SnowClient,
    input: DeletePortalCatalogAssociationInput,
) -> ToolResponse {
    table::delete(client, &PORTAL_CATALOGS, &input.association_id).await
}

/// Publishes several catalogs on a portal, continuing past failures.
pub async fn bulk_create_portal_catalog_associations(
    client: &SnowClient,
    input: BulkCreatePortalCatalogAssociationsInput,
) -> ToolResponse {
    let bodies = input
        .catalog_ids
        .iter()
        .map(|catalog_id| catalog_body(&input.portal_id, catalog_id))
        .collect();
    table::create_each(client, &PORTAL_CATALOGS, bodies).await
}

/// Publishes a taxonomy on a portal.
pub async fn create_portal_taxonomy_association(
    client: &SnowClient,
    input: CreatePortalTaxonomyAssociationInput,
) -> ToolResponse {
    let body = taxonomy_body(&input.portal_id, &input.taxonomy_id);
    table::create(client, &PORTAL_TAXONOMIES, body).await
}

/// Updates a portal taxonomy association.
pub async fn update_portal_taxonomy_association(
    client: &SnowClient,
    input: UpdatePortalTaxonomyAssociationInput,
) -> ToolResponse {
    table::update(
        client,
        &PORTAL_TAXONOMIES,
        &input.association_id,
        input.to_body(),
    )
    .await
}

/// Lists portal taxonomy associations.
pub async fn list_portal_taxonomy_associations(
    client: &SnowClient,
    input: ListPortalTaxonomyAssociationsInput,
) -> ToolResponse {
    let filter = EncodedQuery::new()
        .equals_opt("sp_portal", input.portal_id.as_deref())
        .equals_opt("taxonomy", input.taxonomy_id.as_deref());
    let page = Page::new(input.limit, input.offset);
    table::list(client, &PORTAL_TAXONOMIES, page, filter).await
}

/// Gets one portal taxonomy association.
pub async fn get_portal_taxonomy_association(
    client: &SnowClient,
    input: GetPortalTaxonomyAssociationInput,
) -> ToolResponse {
    table::get(client, &PORTAL_TAXONOMIES, &input.association_id).await
}

/// Removes a taxonomy from a portal.
pub async fn delete_portal_taxonomy_association(
    client: &SnowClient,
    input: DeletePortalTaxonomyAssociationInput,
) -> ToolResponse {
    table::delete(client, &PORTAL_TAXONOMIES, &input.association_id).await
}

/// Publishes several taxonomies on a portal, continuing past failures.
pub async fn bulk_create_portal_taxonomy_associations(
    client: &SnowClient,
    input: BulkCreatePortalTaxonomyAssociationsInput,
) -> ToolResponse {
    let bodies = input
        .taxonomy_ids
        .iter()
        .map(|taxonomy_id| taxonomy_body(&input.portal_id, taxonomy_id))
        .collect();
    table::create_each(client, &PORTAL_TAXONOMIES, bodies).await
}

/// Operations and input types of this module.
pub fn listing() -> ModuleListing {
    ModuleListing::new("portal_association")
        .operation(
            "create_portal_catalog_association",
            "Publish a service catalog on a portal.",
        )
        .operation(
            "list_portal_catalog_associations",
            "List the catalogs published on portals, filtered by portal or catalog.",
        )
        .undocumented("get_portal_catalog_association")
        .operation(
            "delete_portal_catalog_association",
            "Remove a catalog from a portal by association sys_id.",
        )
        .operation(
            "bulk_create_portal_catalog_associations",
            "Publish several catalogs on one portal. Every catalog is attempted; failures are reported per entry.",
        )
        .operation(
            "create_portal_taxonomy_association",
            "Publish a knowledge taxonomy on a portal.",
        )
        .undocumented("update_portal_taxonomy_association")
        .operation(
            "list_portal_taxonomy_associations",
            "List the taxonomies published on portals, filtered by portal or taxonomy.",
        )
        .undocumented("get_portal_taxonomy_association")
        .operation(
            "delete_portal_taxonomy_association",
            "Remove a taxonomy from a portal by association sys_id.",
        )
        .operation(
            "bulk_create_portal_taxonomy_associations",
            "Publish several taxonomies on one portal. Every taxonomy is attempted; failures are reported per entry.",
        )
        .params::<CreatePortalCatalogAssociationInput>()
        .params::<ListPortalCatalogAssociationsInput>()
        .params::<GetPortalCatalogAssociationInput>()
        .params::<DeletePortalCatalogAssociationInput>()
        .params::<BulkCreatePortalCatalogAssociationsInput>()
        .params::<CreatePortalTaxonomyAssociationInput>()
        .params::<UpdatePortalTaxonomyAssociationInput>()
        .params::<ListPortalTaxonomyAssociationsInput>()
        .params::<GetPortalTaxonomyAssociationInput>()
        .params::<DeletePortalTaxonomyAssociationInput>()
        .params::<BulkCreatePortalTaxonomyAssociationsInput>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    #[test]
    fn test_association_bodies_trim_ids() {
        assert_eq!(
            Value::Object(catalog_body(" p1", "c1 ").into_record()),
            json!({"sp_portal": "p1", "sc_catalog": "c1"})
        );
        assert_eq!(
            Value::Object(taxonomy_body("p1", "t1").into_record()),
            json!({"sp_portal": "p1", "taxonomy": "t1"})
        );
    }
}
