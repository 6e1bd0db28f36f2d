//! Domain types for the storefront.
//!
//! These are validated domain objects, separate from the database row types
//! that live inside the repositories.

pub mod address;
pub mod cart;
pub mod order;
pub mod payment_method;
pub mod product;
pub mod user;
pub mod wallet;

pub use address::Address;
pub use cart::{Cart, CartLine};
pub use order::{Order, OrderItem, PaymentInfo, ShippingInfo};
pub use payment_method::PaymentMethod;
pub use product::{Product, Variant, VariantOption};
pub use user::User;
pub use wallet::{Wallet, WalletEntry};
