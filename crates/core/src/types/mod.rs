//! Core types for Shopdeck.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod color;
pub mod entity;
pub mod id;
pub mod input;
pub mod price;
pub mod resource;
pub mod validation;

pub use color::{HexColor, HexColorError};
pub use entity::*;
pub use id::*;
pub use input::*;
pub use price::{CurrencyCode, Price};
pub use resource::ResourceKind;
pub use validation::{FieldError, FieldErrors, Validate};
