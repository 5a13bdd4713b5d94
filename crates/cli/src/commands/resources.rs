//! Store management forms.
//!
//! # Usage
//!
//! ```bash
//! shopdeck store create --name "Summer Shop"
//! shopdeck billboard create --store <STORE_ID> --label "Sale" --image-url https://...
//! shopdeck color create --store <STORE_ID> --name Red --value "#f00"
//! shopdeck product list --store <STORE_ID> --featured
//! shopdeck size delete --store <STORE_ID> <SIZE_ID>
//! ```
//!
//! Mutations need `--token` (or `SHOPDECK_TOKEN`); listings are public
//! except for stores.

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use uuid::Uuid;

use shopdeck_client::MutationRequest;
use shopdeck_core::{
    Billboard, BillboardId, BillboardInput, CategoryId, CategoryInput, CategoryWithBillboard,
    ColorId, ColorInput, ImageInput, ProductId, ProductInput, ProductQuery, ResourceKind, SizeId,
    SizeInput, StoreId, StoreInput,
};

use super::{CommandError, Context, print_json, validated};

#[derive(Subcommand)]
pub enum StoreAction {
    /// Create a store
    Create {
        #[arg(short, long)]
        name: String,
    },
    /// Rename a store
    Update {
        store: StoreId,
        #[arg(short, long)]
        name: String,
    },
    /// Delete a store and everything in it
    Delete { store: StoreId },
    /// List your stores
    List,
}

#[derive(Args)]
pub struct BillboardFields {
    #[arg(short, long, default_value = "")]
    label: String,
    #[arg(short, long, default_value = "")]
    image_url: String,
}

#[derive(Subcommand)]
pub enum BillboardAction {
    /// Create a billboard
    Create {
        #[arg(short, long)]
        store: StoreId,
        #[command(flatten)]
        fields: BillboardFields,
    },
    /// Update a billboard
    Update {
        #[arg(short, long)]
        store: StoreId,
        id: BillboardId,
        #[command(flatten)]
        fields: BillboardFields,
    },
    /// Delete a billboard
    Delete {
        #[arg(short, long)]
        store: StoreId,
        id: BillboardId,
    },
    /// List billboards
    List {
        #[arg(short, long)]
        store: StoreId,
    },
}

#[derive(Args)]
pub struct CategoryFields {
    #[arg(short, long, default_value = "")]
    name: String,
    #[arg(short, long)]
    billboard_id: Option<BillboardId>,
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Create a category
    Create {
        #[arg(short, long)]
        store: StoreId,
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Update a category
    Update {
        #[arg(short, long)]
        store: StoreId,
        id: CategoryId,
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Delete a category
    Delete {
        #[arg(short, long)]
        store: StoreId,
        id: CategoryId,
    },
    /// List categories with their billboards
    List {
        #[arg(short, long)]
        store: StoreId,
    },
}

/// Name and value, shared by colors and sizes.
#[derive(Args)]
pub struct SwatchFields {
    #[arg(short, long, default_value = "")]
    name: String,
    #[arg(short, long, default_value = "")]
    value: String,
}

/// Color and size forms have the same shape.
#[derive(Subcommand)]
pub enum SwatchAction {
    /// Create
    Create {
        #[arg(short, long)]
        store: StoreId,
        #[command(flatten)]
        fields: SwatchFields,
    },
    /// Update
    Update {
        #[arg(short, long)]
        store: StoreId,
        id: Uuid,
        #[command(flatten)]
        fields: SwatchFields,
    },
    /// Delete
    Delete {
        #[arg(short, long)]
        store: StoreId,
        id: Uuid,
    },
    /// List
    List {
        #[arg(short, long)]
        store: StoreId,
    },
}

#[derive(Args)]
pub struct ProductFields {
    #[arg(short, long, default_value = "")]
    name: String,
    /// Unit price in dollars, e.g. 19.99
    #[arg(short, long)]
    price: Option<Decimal>,
    #[arg(long)]
    category_id: Option<CategoryId>,
    #[arg(long)]
    size_id: Option<SizeId>,
    #[arg(long)]
    color_id: Option<ColorId>,
    /// Image URL (repeat for several)
    #[arg(short, long = "image")]
    images: Vec<String>,
    /// Show on the storefront home page
    #[arg(long)]
    featured: bool,
    /// Hide from the storefront
    #[arg(long)]
    archived: bool,
}

impl From<ProductFields> for ProductInput {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            price: fields.price,
            category_id: fields.category_id,
            size_id: fields.size_id,
            color_id: fields.color_id,
            images: fields
                .images
                .into_iter()
                .map(|url| ImageInput { url })
                .collect(),
            is_featured: fields.featured,
            is_archived: fields.archived,
        }
    }
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// Create a product
    Create {
        #[arg(short, long)]
        store: StoreId,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Update a product (replaces its images)
    Update {
        #[arg(short, long)]
        store: StoreId,
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        #[arg(short, long)]
        store: StoreId,
        id: ProductId,
    },
    /// List products (archived ones are never shown)
    List {
        #[arg(short, long)]
        store: StoreId,
        #[arg(long)]
        category_id: Option<CategoryId>,
        #[arg(long)]
        color_id: Option<ColorId>,
        #[arg(long)]
        size_id: Option<SizeId>,
        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
}

/// Run a store subcommand.
///
/// # Errors
///
/// Returns an error if validation fails, the token is missing, or the
/// request fails.
pub async fn store(ctx: &Context, action: StoreAction) -> Result<(), CommandError> {
    match action {
        StoreAction::Create { name } => {
            let body = validated(&StoreInput { name })?;
            ctx.submit(MutationRequest::create_store(body)).await
        }
        StoreAction::Update { store, name } => {
            let body = validated(&StoreInput { name })?;
            ctx.submit(MutationRequest::update_store(store, body)).await
        }
        StoreAction::Delete { store } => ctx.submit(MutationRequest::delete_store(store)).await,
        StoreAction::List => {
            let token = ctx.token.as_ref().ok_or(CommandError::MissingToken)?;
            print_json(&ctx.api.list_stores(token).await?)
        }
    }
}

/// Run a billboard subcommand.
///
/// # Errors
///
/// Returns an error if validation fails or the request fails.
pub async fn billboard(ctx: &Context, action: BillboardAction) -> Result<(), CommandError> {
    let kind = ResourceKind::Billboard;
    match action {
        BillboardAction::Create { store, fields } => {
            let body = validated(&BillboardInput::from(fields))?;
            ctx.submit(MutationRequest::create(kind, store, body)).await
        }
        BillboardAction::Update { store, id, fields } => {
            let body = validated(&BillboardInput::from(fields))?;
            ctx.submit(MutationRequest::update(kind, store, id.into(), body))
                .await
        }
        BillboardAction::Delete { store, id } => {
            ctx.submit(MutationRequest::delete(kind, store, id.into()))
                .await
        }
        BillboardAction::List { store } => {
            print_json(&ctx.api.list::<Billboard>(store, kind).await?)
        }
    }
}

impl From<BillboardFields> for BillboardInput {
    fn from(fields: BillboardFields) -> Self {
        Self {
            label: fields.label,
            image_url: fields.image_url,
        }
    }
}

/// Run a category subcommand.
///
/// # Errors
///
/// Returns an error if validation fails or the request fails.
pub async fn category(ctx: &Context, action: CategoryAction) -> Result<(), CommandError> {
    let kind = ResourceKind::Category;
    match action {
        CategoryAction::Create { store, fields } => {
            let body = validated(&CategoryInput::from(fields))?;
            ctx.submit(MutationRequest::create(kind, store, body)).await
        }
        CategoryAction::Update { store, id, fields } => {
            let body = validated(&CategoryInput::from(fields))?;
            ctx.submit(MutationRequest::update(kind, store, id.into(), body))
                .await
        }
        CategoryAction::Delete { store, id } => {
            ctx.submit(MutationRequest::delete(kind, store, id.into()))
                .await
        }
        CategoryAction::List { store } => {
            print_json(&ctx.api.list::<CategoryWithBillboard>(store, kind).await?)
        }
    }
}

impl From<CategoryFields> for CategoryInput {
    fn from(fields: CategoryFields) -> Self {
        Self {
            name: fields.name,
            billboard_id: fields.billboard_id,
        }
    }
}

/// Run a color subcommand.
///
/// # Errors
///
/// Returns an error if the value is not a hex code or the request fails.
pub async fn color(ctx: &Context, action: SwatchAction) -> Result<(), CommandError> {
    swatch(ctx, ResourceKind::Color, action, |fields| {
        validated(&ColorInput {
            name: fields.name,
            value: fields.value,
        })
    })
    .await
}

/// Run a size subcommand.
///
/// # Errors
///
/// Returns an error if validation fails or the request fails.
pub async fn size(ctx: &Context, action: SwatchAction) -> Result<(), CommandError> {
    swatch(ctx, ResourceKind::Size, action, |fields| {
        validated(&SizeInput {
            name: fields.name,
            value: fields.value,
        })
    })
    .await
}

async fn swatch(
    ctx: &Context,
    kind: ResourceKind,
    action: SwatchAction,
    encode: impl Fn(SwatchFields) -> Result<serde_json::Value, CommandError>,
) -> Result<(), CommandError> {
    match action {
        SwatchAction::Create { store, fields } => {
            ctx.submit(MutationRequest::create(kind, store, encode(fields)?))
                .await
        }
        SwatchAction::Update { store, id, fields } => {
            ctx.submit(MutationRequest::update(kind, store, id, encode(fields)?))
                .await
        }
        SwatchAction::Delete { store, id } => {
            ctx.submit(MutationRequest::delete(kind, store, id)).await
        }
        SwatchAction::List { store } => {
            print_json(&ctx.api.list::<serde_json::Value>(store, kind).await?)
        }
    }
}

/// Run a product subcommand.
///
/// # Errors
///
/// Returns an error if validation fails or the request fails.
pub async fn product(ctx: &Context, action: ProductAction) -> Result<(), CommandError> {
    let kind = ResourceKind::Product;
    match action {
        ProductAction::Create { store, fields } => {
            let body = validated(&ProductInput::from(fields))?;
            ctx.submit(MutationRequest::create(kind, store, body)).await
        }
        ProductAction::Update { store, id, fields } => {
            let body = validated(&ProductInput::from(fields))?;
            ctx.submit(MutationRequest::update(kind, store, id.into(), body))
                .await
        }
        ProductAction::Delete { store, id } => {
            ctx.submit(MutationRequest::delete(kind, store, id.into()))
                .await
        }
        ProductAction::List {
            store,
            category_id,
            color_id,
            size_id,
            featured,
        } => {
            let query = ProductQuery {
                category_id,
                color_id,
                size_id,
                is_featured: featured.then_some(true),
            };
            print_json(&ctx.api.list_products(store, &query).await?)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopdeck_core::Validate;

    #[test]
    fn test_product_fields_map_to_input() {
        let input = ProductInput::from(ProductFields {
            name: "Tee".to_owned(),
            price: Some(Decimal::new(1500, 2)),
            category_id: Some(CategoryId::generate()),
            size_id: Some(SizeId::generate()),
            color_id: Some(ColorId::generate()),
            images: vec!["https://img/1.png".to_owned()],
            featured: true,
            archived: false,
        });
        assert!(input.validate().is_ok());
        assert!(input.is_featured);
        assert_eq!(input.images.len(), 1);
    }

    #[test]
    fn test_product_without_images_is_rejected() {
        let input = ProductInput::from(ProductFields {
            name: "Tee".to_owned(),
            price: Some(Decimal::new(1500, 2)),
            category_id: Some(CategoryId::generate()),
            size_id: Some(SizeId::generate()),
            color_id: Some(ColorId::generate()),
            images: Vec::new(),
            featured: false,
            archived: false,
        });
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.get("images"), Some("Images are required"));
    }
}
