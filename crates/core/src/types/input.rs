//! Request payloads for create and update.
//!
//! Every field is `#[serde(default)]` so that a missing field reaches
//! [`Validate`] and produces a field message instead of a deserialization
//! rejection. The same holds for `null` text and for the blank strings an
//! HTML form sends for an unset select or number input.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::color::HexColor;
use super::id::{BillboardId, CategoryId, ColorId, ProductId, SizeId};
use super::validation::{FieldErrors, Validate};

/// Reads `null` as an empty string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Reads `null` and blank strings as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field<T> {
        Value(T),
        Text(String),
    }

    match Option::<Field<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Field::Value(value)) => Ok(Some(value)),
        Some(Field::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Field::Text(text)) => Err(serde::de::Error::custom(format!(
            "invalid value `{text}`"
        ))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
}

impl Validate for StoreInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BillboardInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub label: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub image_url: String,
}

impl Validate for BillboardInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("label", &self.label, "Label is required");
        errors.require("imageUrl", &self.image_url, "Image URL is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub billboard_id: Option<BillboardId>,
}

impl Validate for CategoryInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required");
        errors.require_some(
            "billboardId",
            self.billboard_id.as_ref(),
            "Billboard id is required",
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    /// Hex value; see [`HexColor`] for the accepted shape.
    #[serde(deserialize_with = "null_as_empty")]
    pub value: String,
}

impl Validate for ColorInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required");
        if let Err(e) = HexColor::parse(&self.value) {
            errors.push("value", e.to_string());
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SizeInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub value: String,
}

impl Validate for SizeInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required");
        errors.require("value", &self.value, "Value is required");
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageInput {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "blank_as_none")]
    pub price: Option<Decimal>,
    #[serde(deserialize_with = "blank_as_none")]
    pub category_id: Option<CategoryId>,
    #[serde(deserialize_with = "blank_as_none")]
    pub size_id: Option<SizeId>,
    #[serde(deserialize_with = "blank_as_none")]
    pub color_id: Option<ColorId>,
    pub images: Vec<ImageInput>,
    pub is_featured: bool,
    pub is_archived: bool,
}

impl Validate for ProductInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name, "Name is required");
        match self.price {
            None => errors.push("price", "Price is required"),
            Some(price) if price <= Decimal::ZERO => {
                errors.push("price", "Price must be greater than zero");
            }
            Some(_) => {}
        }
        errors.require_some(
            "categoryId",
            self.category_id.as_ref(),
            "Category id is required",
        );
        errors.require_some("sizeId", self.size_id.as_ref(), "Size id is required");
        errors.require_some("colorId", self.color_id.as_ref(), "Color id is required");
        if self.images.iter().all(|image| image.url.trim().is_empty()) {
            errors.push("images", "Images are required");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutInput {
    pub product_ids: Vec<ProductId>,
}

impl Validate for CheckoutInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.product_ids.is_empty() {
            errors.push("productIds", "Product ids are required");
        }
        errors.into_result()
    }
}

/// A [`CategoryInput`] that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub billboard_id: BillboardId,
}

impl TryFrom<CategoryInput> for NewCategory {
    type Error = FieldErrors;

    fn try_from(input: CategoryInput) -> Result<Self, Self::Error> {
        input.validate()?;
        match input.billboard_id {
            Some(billboard_id) => Ok(Self {
                name: input.name,
                billboard_id,
            }),
            None => Err(FieldErrors::single("billboardId", "Billboard id is required")),
        }
    }
}

/// A [`ProductInput`] that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub size_id: SizeId,
    pub color_id: ColorId,
    /// Image URLs in display order.
    pub images: Vec<String>,
    pub is_featured: bool,
    pub is_archived: bool,
}

impl TryFrom<ProductInput> for NewProduct {
    type Error = FieldErrors;

    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        input.validate()?;
        let (Some(price), Some(category_id), Some(size_id), Some(color_id)) =
            (input.price, input.category_id, input.size_id, input.color_id)
        else {
            return Err(FieldErrors::single("price", "Price is required"));
        };

        Ok(Self {
            name: input.name,
            price,
            category_id,
            size_id,
            color_id,
            images: input
                .images
                .into_iter()
                .map(|image| image.url)
                .filter(|url| !url.trim().is_empty())
                .collect(),
            is_featured: input.is_featured,
            is_archived: input.is_archived,
        })
    }
}

/// Query filters accepted by the product listing.
///
/// Archived products are always excluded; every other filter is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<ColorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_id: Option<SizeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_product() -> ProductInput {
        ProductInput {
            name: "Tee".to_owned(),
            price: Some(Decimal::new(1999, 2)),
            category_id: Some(CategoryId::generate()),
            size_id: Some(SizeId::generate()),
            color_id: Some(ColorId::generate()),
            images: vec![ImageInput {
                url: "https://cdn.example.com/tee.png".to_owned(),
            }],
            is_featured: false,
            is_archived: false,
        }
    }

    #[test]
    fn test_store_requires_name() {
        let errors = StoreInput::default().validate().unwrap_err();
        assert_eq!(errors.first_message(), Some("Name is required"));
        assert!(
            StoreInput {
                name: "Main".to_owned()
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn test_billboard_reports_every_missing_field() {
        let errors = BillboardInput::default().validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("imageUrl"), Some("Image URL is required"));
    }

    #[test]
    fn test_category_requires_billboard() {
        let input = CategoryInput {
            name: "Shirts".to_owned(),
            billboard_id: None,
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.first_message(), Some("Billboard id is required"));
    }

    #[test]
    fn test_color_value_must_be_hex() {
        let input = ColorInput {
            name: "Red".to_owned(),
            value: "red".to_owned(),
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.get("value"), Some("Value must be a valid hex code"));

        let input = ColorInput {
            name: "White".to_owned(),
            value: "#fff".to_owned(),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_product_valid() {
        assert!(valid_product().validate().is_ok());
    }

    #[test]
    fn test_product_price_must_be_positive() {
        let mut input = valid_product();
        input.price = Some(Decimal::ZERO);
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.get("price"), Some("Price must be greater than zero"));

        input.price = None;
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.get("price"), Some("Price is required"));
    }

    #[test]
    fn test_product_requires_images() {
        let mut input = valid_product();
        input.images.clear();
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.first_message(), Some("Images are required"));
    }

    #[test]
    fn test_product_flags_default_to_false() {
        let input: ProductInput = serde_json::from_str(r#"{"name":"Tee"}"#).unwrap();
        assert!(!input.is_featured);
        assert!(!input.is_archived);
    }

    #[test]
    fn test_product_price_accepts_number_or_string() {
        let input: ProductInput = serde_json::from_str(r#"{"price":12.5}"#).unwrap();
        assert_eq!(input.price, Some(Decimal::new(125, 1)));
        let input: ProductInput = serde_json::from_str(r#"{"price":"12.50"}"#).unwrap();
        assert_eq!(input.price, Some(Decimal::new(1250, 2)));
    }

    #[test]
    fn test_blank_ids_read_as_missing() {
        let input: CategoryInput =
            serde_json::from_str(r#"{"name":"Shirts","billboardId":""}"#).unwrap();
        assert!(input.billboard_id.is_none());
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.first_message(), Some("Billboard id is required"));

        let input: ProductInput =
            serde_json::from_str(r#"{"price":"","categoryId":"","sizeId":null,"colorId":" "}"#)
                .unwrap();
        assert!(input.price.is_none());
        assert!(input.category_id.is_none());
        assert!(input.size_id.is_none());
        assert!(input.color_id.is_none());
    }

    #[test]
    fn test_null_text_reads_as_empty() {
        let input: StoreInput = serde_json::from_str(r#"{"name":null}"#).unwrap();
        assert_eq!(input.validate().unwrap_err().first_message(), Some("Name is required"));
    }

    #[test]
    fn test_malformed_id_is_rejected() {
        let result = serde_json::from_str::<CategoryInput>(r#"{"billboardId":"not-a-uuid"}"#);
        assert!(result.is_err());
        let input: CategoryInput = serde_json::from_str(&format!(
            r#"{{"name":"Shirts","billboardId":"{}"}}"#,
            BillboardId::generate()
        ))
        .unwrap();
        assert!(input.billboard_id.is_some());
    }

    #[test]
    fn test_checkout_requires_products() {
        let errors = CheckoutInput::default().validate().unwrap_err();
        assert_eq!(errors.first_message(), Some("Product ids are required"));
    }

    #[test]
    fn test_new_product_drops_blank_images() {
        let mut input = valid_product();
        input.images.push(ImageInput { url: "  ".to_owned() });
        let product = NewProduct::try_from(input).unwrap();
        assert_eq!(product.images, vec!["https://cdn.example.com/tee.png"]);
    }

    #[test]
    fn test_new_category_rejects_missing_billboard() {
        let input = CategoryInput {
            name: "Shirts".to_owned(),
            billboard_id: None,
        };
        assert!(NewCategory::try_from(input).is_err());
    }

    #[test]
    fn test_product_query_from_query_string_shape() {
        let query: ProductQuery = serde_json::from_str(r#"{"isFeatured":true}"#).unwrap();
        assert_eq!(query.is_featured, Some(true));
        assert!(query.category_id.is_none());
        assert_eq!(serde_json::to_string(&ProductQuery::default()).unwrap(), "{}");
    }
}
