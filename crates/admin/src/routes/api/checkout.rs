//! Checkout handler.
//!
//! Called by the storefront from a different origin, so the route carries
//! permissive CORS headers and answers preflight requests.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use tower_http::cors::CorsLayer;
use tracing::instrument;
use url::Url;

use shopdeck_core::{CheckoutInput, CheckoutResponse, Product, ProductId, StoreId, Validate};

use crate::{
    error::{AppError, RouteTag},
    middleware::{AppJson, AppPath},
    services::{CheckoutSessionRequest, LineItem},
    state::AppState,
};

const TAG: &str = "CHECKOUT_POST";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/{store_id}/checkout", post(checkout).options(preflight))
        .layer(CorsLayer::permissive())
}

async fn preflight() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

/// Create an unpaid order for the requested products and open a hosted
/// checkout session for it.
///
/// Ids that are not products of this store are ignored.
///
/// # Errors
///
/// 400 when no product ids are given, 404 when none of them match,
/// 502 when the payment gateway fails.
#[instrument(skip_all, fields(store_id = %store_id))]
async fn checkout(
    State(state): State<AppState>,
    AppPath(store_id): AppPath<StoreId>,
    AppJson(input): AppJson<CheckoutInput>,
) -> Result<Json<CheckoutResponse>, AppError> {
    input.validate()?;

    let products = state
        .datastore()
        .find_products(store_id, &input.product_ids)
        .await
        .tag(TAG)?;
    if products.is_empty() {
        return Err(AppError::NotFound);
    }

    let line_items = products
        .iter()
        .map(line_item)
        .collect::<Result<Vec<_>, _>>()
        .tag(TAG)?;
    let product_ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();

    let order = state
        .datastore()
        .create_order(store_id, &product_ids)
        .await
        .tag(TAG)?;

    let request = CheckoutSessionRequest {
        line_items,
        success_url: cart_url(state.frontend_store_url(), "success=1"),
        cancel_url: cart_url(state.frontend_store_url(), "canceled=1"),
        order_id: order.id,
    };
    let session = state
        .payments()
        .create_checkout_session(&request)
        .await
        .tag(TAG)?;

    tracing::info!(
        order_id = %order.id,
        items = product_ids.len(),
        session_id = %session.id,
        "Checkout session created"
    );
    Ok(Json(CheckoutResponse { url: session.url }))
}

/// One unit of the product at its stored price.
fn line_item(product: &Product) -> Result<LineItem, AppError> {
    let price = product.unit_price();
    let unit_amount = price.minor_units().ok_or_else(|| {
        AppError::Internal(format!("price of product {} out of range", product.id))
    })?;

    Ok(LineItem {
        name: product.name.clone(),
        unit_amount,
        currency: price.currency_code,
        quantity: 1,
    })
}

fn cart_url(base: &Url, query: &str) -> String {
    format!("{}/cart?{query}", base.as_str().trim_end_matches('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use shopdeck_core::{CategoryId, ColorId, CurrencyCode, SizeId};

    fn product(price: Decimal) -> Product {
        Product {
            id: ProductId::generate(),
            store_id: StoreId::generate(),
            category_id: CategoryId::generate(),
            size_id: SizeId::generate(),
            color_id: ColorId::generate(),
            name: "Linen shirt".to_string(),
            price,
            is_featured: false,
            is_archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_line_item_uses_minor_units() {
        let item = line_item(&product(Decimal::new(1999, 2))).unwrap();
        assert_eq!(item.unit_amount, 1999);
        assert_eq!(item.currency, CurrencyCode::USD);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.name, "Linen shirt");
    }

    #[test]
    fn test_line_item_rejects_unrepresentable_price() {
        let err = line_item(&product(Decimal::MAX)).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_cart_url_handles_trailing_slash() {
        let with = Url::parse("https://shop.example.com/").unwrap();
        let without = Url::parse("https://shop.example.com").unwrap();
        assert_eq!(
            cart_url(&with, "success=1"),
            "https://shop.example.com/cart?success=1"
        );
        assert_eq!(
            cart_url(&without, "canceled=1"),
            "https://shop.example.com/cart?canceled=1"
        );
    }
}
