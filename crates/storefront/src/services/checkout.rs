//! Checkout and order lifecycle service.
//!
//! The core flow of the shop: cart -> order at checkout, and order ->
//! wallet credit on return. Steps are sequential single-entity writes; the
//! only multi-statement transactions are the order+items insert and the
//! wallet balance+ledger update, each owned by its repository.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use furnspace_core::{OrderCode, OrderId, OrderStatus, PaymentStatus, UserId};

use crate::db::{
    CartRepository, NewOrder, NewOrderItem, OrderRepository, ProductRepository, RepositoryError,
    WalletRepository,
};
use crate::models::{Order, PaymentInfo, ShippingInfo, WalletEntry};

/// How many fresh order codes to try before giving up. The code space is
/// 90 000 values, so consecutive collisions this deep mean something is
/// wrong beyond bad luck.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Payment details submitted at checkout.
///
/// The card number is used only to derive the stored last-four digits.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentInput {
    pub payment_method: String,
    pub cardholder_name: Option<String>,
    pub card_number: Option<String>,
}

/// Shipping details submitted at checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingInput {
    pub address: String,
    pub apartment: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: String,
}

/// Everything a checkout request carries.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutInput {
    pub payment_info: PaymentInput,
    pub shipping_info: ShippingInput,
}

/// Result of a return: the updated order, and the refund when one was paid
/// out.
#[derive(Debug)]
pub struct ReturnOutcome {
    pub order: Order,
    pub refund: Option<Refund>,
}

/// A wallet credit issued for a returned order.
#[derive(Debug)]
pub struct Refund {
    /// Wallet balance after the credit.
    pub balance: Decimal,
    /// The appended ledger entry.
    pub entry: WalletEntry,
}

/// Errors that can occur during checkout and order transitions.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// Checkout with an empty (or absent) cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line references a product that no longer exists or was
    /// deactivated since it was added.
    #[error("product is no longer available: {0}")]
    ProductUnavailable(String),

    /// Payment details failed validation.
    #[error("invalid payment details: {0}")]
    InvalidPayment(String),

    /// Shipping details failed validation.
    #[error("invalid shipping details: {0}")]
    InvalidShipping(String),

    /// Cancel/return without a reason.
    #[error("{0} reason is required")]
    ReasonRequired(&'static str),

    /// The order does not exist or belongs to another user.
    #[error("order not found")]
    OrderNotFound,

    /// The order's status does not allow cancellation.
    #[error("order cannot be cancelled as it is {0}")]
    CannotCancel(OrderStatus),

    /// The order's status does not allow a return.
    #[error("order cannot be returned as it is {0}")]
    CannotReturn(OrderStatus),

    /// Could not find a free order code within the retry budget.
    #[error("could not allocate a unique order code")]
    CodeCollision,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Checkout and order lifecycle service.
pub struct CheckoutService<'a> {
    pool: &'a PgPool,
    tax_rate: Decimal,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tax_rate: Decimal) -> Self {
        Self { pool, tax_rate }
    }

    /// Place an order from the user's current cart.
    ///
    /// Line items are copied by value from the live catalog (name, price,
    /// image at this instant), totals are computed server-side, and the
    /// cart is cleared once the order is persisted.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` when there is nothing to buy,
    /// validation errors for bad payment/shipping details, and
    /// `CheckoutError::CodeCollision` if the order-code retry budget runs
    /// out.
    pub async fn place_order(
        &self,
        user_id: UserId,
        input: CheckoutInput,
    ) -> Result<Order, CheckoutError> {
        let (payment, payment_status) = validate_payment(&input.payment_info)?;
        let shipping = validate_shipping(input.shipping_info)?;

        let carts = CartRepository::new(self.pool);
        let products = ProductRepository::new(self.pool);
        let orders = OrderRepository::new(self.pool);

        let cart = carts
            .get_for_user(user_id)
            .await?
            .filter(|cart| !cart.items.is_empty())
            .ok_or(CheckoutError::EmptyCart)?;

        // Snapshot the lines against the live catalog, not the cart's
        // cached display fields.
        let mut items = Vec::with_capacity(cart.items.len());
        for line in &cart.items {
            let product = products
                .get_active(line.product_id)
                .await?
                .ok_or_else(|| CheckoutError::ProductUnavailable(line.name.clone()))?;

            items.push(NewOrderItem {
                product_id: product.id,
                name: product.name.clone(),
                unit_price: product.effective_price(),
                quantity: line.quantity,
                color: line.color.clone(),
                size: line.size.clone(),
                image: product.primary_image().map(ToOwned::to_owned),
            });
        }

        let (subtotal, tax, total) = compute_totals(&items, self.tax_rate);

        // The five-digit code space collides; regenerate until the unique
        // index accepts one.
        let mut order = None;
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = OrderCode::generate(&mut rand::rng());
            let attempt = orders
                .create(NewOrder {
                    user_id,
                    code,
                    payment_status,
                    payment: payment.clone(),
                    shipping: shipping.clone(),
                    items: items.clone(),
                    subtotal,
                    tax,
                    total,
                })
                .await;

            match attempt {
                Ok(created) => {
                    order = Some(created);
                    break;
                }
                Err(RepositoryError::Conflict(_)) => {
                    tracing::warn!("order code collision, regenerating");
                }
                Err(other) => return Err(other.into()),
            }
        }
        let order = order.ok_or(CheckoutError::CodeCollision)?;

        carts.clear(cart.id).await?;

        tracing::info!(order_code = %order.code, user_id = %user_id, total = %order.total, "order placed");
        Ok(order)
    }

    /// Cancel an order, guarded by ownership and status.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::CannotCancel` unless the order is still
    /// Pending or Processing.
    pub async fn cancel_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
        reason: &str,
    ) -> Result<Order, CheckoutError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CheckoutError::ReasonRequired("cancellation"));
        }

        let orders = OrderRepository::new(self.pool);
        let order = orders
            .get_for_user(order_id, user_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        if !order.status.can_cancel() {
            return Err(CheckoutError::CannotCancel(order.status));
        }

        orders.mark_cancelled(order.id, reason).await?;

        let order = orders
            .get_for_user(order_id, user_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        tracing::info!(order_code = %order.code, "order cancelled");
        Ok(order)
    }

    /// Return a delivered order and, when it was paid, credit the refund to
    /// the user's wallet.
    ///
    /// The status guard makes this idempotent: a second return attempt hits
    /// `CannotReturn(Returned)` before any wallet write, so the refund can
    /// never be credited twice.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::CannotReturn` unless the order is Delivered.
    pub async fn return_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
        reason: &str,
    ) -> Result<ReturnOutcome, CheckoutError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CheckoutError::ReasonRequired("return"));
        }

        let orders = OrderRepository::new(self.pool);
        let wallets = WalletRepository::new(self.pool);

        let order = orders
            .get_for_user(order_id, user_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        if !order.status.can_return() {
            return Err(CheckoutError::CannotReturn(order.status));
        }

        orders.mark_returned(order.id, reason).await?;

        let refund = if order.payment_status == PaymentStatus::Paid {
            let description = format!("Refund for returned order {}", order.code);
            let (balance, entry) = wallets
                .credit(user_id, order.total, &description, Some(order.code.as_str()))
                .await?;
            orders
                .set_payment_status(order.id, PaymentStatus::Refunded)
                .await?;

            tracing::info!(order_code = %order.code, amount = %order.total, "refund credited to wallet");
            Some(Refund { balance, entry })
        } else {
            None
        };

        let order = orders
            .get_for_user(order_id, user_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        Ok(ReturnOutcome { order, refund })
    }
}

// =============================================================================
// Validation and totals
// =============================================================================

/// Validate payment input, masking the card number down to its last four
/// digits. Card payments are recorded Paid; anything else (e.g. cash on
/// delivery) starts Unpaid.
fn validate_payment(input: &PaymentInput) -> Result<(PaymentInfo, PaymentStatus), CheckoutError> {
    let method = input.payment_method.trim().to_lowercase();
    if method.is_empty() {
        return Err(CheckoutError::InvalidPayment(
            "payment_method is required".to_owned(),
        ));
    }

    if method == "card" {
        let cardholder = input
            .cardholder_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                CheckoutError::InvalidPayment("cardholder_name is required for card payments".to_owned())
            })?;
        let number = input.card_number.as_deref().ok_or_else(|| {
            CheckoutError::InvalidPayment("card_number is required for card payments".to_owned())
        })?;
        let last4 = mask_card_number(number)?;

        Ok((
            PaymentInfo {
                payment_method: method,
                cardholder_name: Some(cardholder.to_owned()),
                card_last4: Some(last4),
            },
            PaymentStatus::Paid,
        ))
    } else {
        Ok((
            PaymentInfo {
                payment_method: method,
                cardholder_name: None,
                card_last4: None,
            },
            PaymentStatus::Unpaid,
        ))
    }
}

/// Validate shipping input, rejecting blank required fields.
fn validate_shipping(input: ShippingInput) -> Result<ShippingInfo, CheckoutError> {
    let require = |value: String, name: &str| -> Result<String, CheckoutError> {
        let trimmed = value.trim().to_owned();
        if trimmed.is_empty() {
            return Err(CheckoutError::InvalidShipping(format!("{name} is required")));
        }
        Ok(trimmed)
    };

    Ok(ShippingInfo {
        address: require(input.address, "address")?,
        apartment: input.apartment.map(|a| a.trim().to_owned()).filter(|a| !a.is_empty()),
        city: require(input.city, "city")?,
        state: require(input.state, "state")?,
        country: require(input.country, "country")?,
        zip_code: require(input.zip_code, "zip_code")?,
    })
}

/// Reduce a card number to its last four digits, validating shape.
///
/// Also used when saving payment methods on the account; masking is the
/// single point where full card numbers are allowed to exist.
pub(crate) fn mask_card_number(number: &str) -> Result<String, CheckoutError> {
    let digits: String = number.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();

    if digits.len() < 12 || digits.len() > 19 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CheckoutError::InvalidPayment(
            "card_number must be 12-19 digits".to_owned(),
        ));
    }

    let split = digits.len() - 4;
    Ok(digits.get(split..).unwrap_or_default().to_owned())
}

/// Compute (subtotal, tax, total) from snapshot line items.
fn compute_totals(items: &[NewOrderItem], tax_rate: Decimal) -> (Decimal, Decimal, Decimal) {
    let subtotal: Decimal = items
        .iter()
        .map(|item| item.unit_price * Decimal::from(item.quantity))
        .sum();
    let tax = (subtotal * tax_rate).round_dp(2);
    let total = subtotal + tax;
    (subtotal, tax, total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use furnspace_core::ProductId;

    fn item(price: &str, quantity: i32) -> NewOrderItem {
        NewOrderItem {
            product_id: ProductId::new(1),
            name: "Oak Side Table".to_owned(),
            unit_price: price.parse().unwrap(),
            quantity,
            color: None,
            size: None,
            image: None,
        }
    }

    #[test]
    fn test_compute_totals() {
        let items = vec![item("100.00", 2), item("49.50", 1)];
        let (subtotal, tax, total) = compute_totals(&items, "0.08".parse().unwrap());

        assert_eq!(subtotal, "249.50".parse().unwrap());
        assert_eq!(tax, "19.96".parse().unwrap());
        assert_eq!(total, "269.46".parse().unwrap());
    }

    #[test]
    fn test_compute_totals_zero_rate() {
        let items = vec![item("10.00", 1)];
        let (subtotal, tax, total) = compute_totals(&items, Decimal::ZERO);

        assert_eq!(subtotal, total);
        assert_eq!(tax, Decimal::ZERO);
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("4242 4242 4242 4242").unwrap(), "4242");
        assert_eq!(mask_card_number("4000-0566-5566-5556").unwrap(), "5556");
        assert!(mask_card_number("42").is_err());
        assert!(mask_card_number("4242424242424a42").is_err());
    }

    #[test]
    fn test_validate_payment_card_requires_details() {
        let input = PaymentInput {
            payment_method: "card".to_owned(),
            cardholder_name: Some("Ada Lovelace".to_owned()),
            card_number: Some("4242424242424242".to_owned()),
        };
        let (payment, status) = validate_payment(&input).unwrap();
        assert_eq!(status, PaymentStatus::Paid);
        assert_eq!(payment.card_last4.as_deref(), Some("4242"));

        let missing = PaymentInput {
            payment_method: "card".to_owned(),
            cardholder_name: None,
            card_number: Some("4242424242424242".to_owned()),
        };
        assert!(matches!(
            validate_payment(&missing),
            Err(CheckoutError::InvalidPayment(_))
        ));
    }

    #[test]
    fn test_validate_payment_cod_is_unpaid() {
        let input = PaymentInput {
            payment_method: "COD".to_owned(),
            cardholder_name: None,
            card_number: None,
        };
        let (payment, status) = validate_payment(&input).unwrap();
        assert_eq!(status, PaymentStatus::Unpaid);
        assert_eq!(payment.payment_method, "cod");
        assert!(payment.card_last4.is_none());
    }

    #[test]
    fn test_validate_shipping_rejects_blanks() {
        let input = ShippingInput {
            address: "12 Elm St".to_owned(),
            apartment: Some("  ".to_owned()),
            city: "".to_owned(),
            state: "CA".to_owned(),
            country: "US".to_owned(),
            zip_code: "94016".to_owned(),
        };
        assert!(matches!(
            validate_shipping(input),
            Err(CheckoutError::InvalidShipping(_))
        ));
    }

    #[test]
    fn test_validate_shipping_drops_blank_apartment() {
        let input = ShippingInput {
            address: "12 Elm St".to_owned(),
            apartment: Some("  ".to_owned()),
            city: "Oakland".to_owned(),
            state: "CA".to_owned(),
            country: "US".to_owned(),
            zip_code: "94016".to_owned(),
        };
        let shipping = validate_shipping(input).unwrap();
        assert!(shipping.apartment.is_none());
    }
}
