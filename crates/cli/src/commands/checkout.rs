//! Checkout command.
//!
//! Opens a hosted checkout the way the storefront cart does and prints the
//! payment page URL.

use shopdeck_core::{CheckoutInput, ProductId, StoreId};

use super::{CommandError, Context, print_json, validated};

/// Start a checkout for the given products.
///
/// # Errors
///
/// Returns an error if no product is given or the request fails.
pub async fn run(
    ctx: &Context,
    store: StoreId,
    product_ids: Vec<ProductId>,
) -> Result<(), CommandError> {
    let input = CheckoutInput { product_ids };
    validated(&input)?;

    let response = ctx.api.checkout(store, &input).await?;
    print_json(&response)
}
