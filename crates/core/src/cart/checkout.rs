//! Checkout: server validation followed by replacing the local cart.

use std::future::Future;

use thiserror::Error;
use tracing::{info, warn};

use super::storage::CartStorage;
use super::store::CartStore;
use crate::types::{CartValidationRequest, CartValidationResponse};

/// Why a checkout did not go through. The cart is unchanged in every case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,
    /// The server refused the cart, e.g. a product is out of stock.
    #[error("Checkout failed: {0}")]
    Rejected(String),
    /// The server could not be reached or answered with something unusable.
    #[error("Checkout failed. Please try again.")]
    Transport(String),
}

/// Something that can validate a cart with the server.
pub trait CheckoutGateway {
    /// Submit the cart for validation.
    ///
    /// A refusal the server explains (`success: false` with an error) is an
    /// `Ok` response; network failures and unexpected statuses are
    /// [`CheckoutError::Transport`].
    fn validate_cart(
        &self,
        request: &CartValidationRequest,
    ) -> impl Future<Output = Result<CartValidationResponse, CheckoutError>>;
}

/// A completed checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutReceipt {
    pub lines: usize,
    pub item_count: u64,
    pub total: i64,
    pub formatted_total: String,
}

impl<S: CartStorage> CartStore<S> {
    /// Validate the cart with the server and adopt the server's version.
    ///
    /// On success the whole cart is replaced by the validated lines, which
    /// persists it and notifies subscribers. Payment is not taken here.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` when the cart is empty, the server refuses it,
    /// or the server cannot be reached. The cart is left untouched.
    pub async fn checkout<G: CheckoutGateway>(
        &mut self,
        gateway: &G,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if self.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let response = gateway
            .validate_cart(&self.validation_request())
            .await
            .inspect_err(|e| warn!(error = %e, "Checkout validation failed"))?;

        if !response.success {
            let reason = response
                .error
                .unwrap_or_else(|| "Cart could not be validated".to_string());
            warn!(reason = %reason, "Checkout rejected by server");
            return Err(CheckoutError::Rejected(reason));
        }

        let Some(lines) = response.items else {
            return Err(CheckoutError::Transport(
                "validation response carried no items".to_string(),
            ));
        };

        self.replace_with_validated(lines);

        let receipt = CheckoutReceipt {
            lines: self.items().len(),
            item_count: self.total_items(),
            total: self.total(),
            formatted_total: self.formatted_total(),
        };
        info!(total = receipt.total, lines = receipt.lines, "Cart validated for checkout");
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::cart::{CartEvent, MemoryStorage};
    use crate::sanitize::CartProductInput;
    use crate::types::ValidatedCartLine;

    struct StubGateway {
        reply: Result<CartValidationResponse, CheckoutError>,
        seen: RefCell<Vec<CartValidationRequest>>,
    }

    impl StubGateway {
        fn new(reply: Result<CartValidationResponse, CheckoutError>) -> Self {
            Self {
                reply,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CheckoutGateway for StubGateway {
        async fn validate_cart(
            &self,
            request: &CartValidationRequest,
        ) -> Result<CartValidationResponse, CheckoutError> {
            self.seen.borrow_mut().push(request.clone());
            self.reply.clone()
        }
    }

    fn cart_with_ring() -> CartStore<MemoryStorage> {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(&CartProductInput {
            id: "kal-001".to_string(),
            name: "Persian Turquoise Ring".to_string(),
            price: 1,
            image: "/images/kal-001.jpg".to_string(),
            collection: "kaleidoscope".to_string(),
        });
        cart
    }

    fn validated_ring(quantity: u32) -> ValidatedCartLine {
        ValidatedCartLine {
            id: "kal-001".to_string(),
            name: "Persian Turquoise Ring".to_string(),
            price: 285_000,
            quantity,
            image: "/images/kal-001.jpg".to_string(),
            collection: "kaleidoscope".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_cart_never_calls_server() {
        let gateway = StubGateway::new(Err(CheckoutError::Transport("unused".to_string())));
        let mut cart = CartStore::open(MemoryStorage::new());

        let err = cart.checkout(&gateway).await.unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        assert!(gateway.seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_success_replaces_cart_with_server_prices() {
        let gateway = StubGateway::new(Ok(CartValidationResponse::accepted(
            vec![validated_ring(1)],
            285_000,
        )));
        let mut cart = cart_with_ring();
        let added_at = cart.items()[0].added_at;

        let updates = std::rc::Rc::new(RefCell::new(0));
        let counter = std::rc::Rc::clone(&updates);
        cart.subscribe(move |event| {
            if matches!(event, CartEvent::Updated(_)) {
                *counter.borrow_mut() += 1;
            }
        });

        let receipt = cart.checkout(&gateway).await.unwrap();
        assert_eq!(receipt.total, 285_000);
        assert_eq!(receipt.formatted_total, "£2850.00");
        assert_eq!(cart.items()[0].price, 285_000);
        assert_eq!(cart.items()[0].added_at, added_at);
        assert_eq!(*updates.borrow(), 1);
        assert_eq!(gateway.seen.borrow()[0].items[0].price, 1);
    }

    #[tokio::test]
    async fn test_rejection_leaves_cart_unchanged() {
        let gateway = StubGateway::new(Ok(CartValidationResponse::rejected(
            "Product \"Persian Turquoise Ring\" is not available in requested quantity",
        )));
        let mut cart = cart_with_ring();
        let before = cart.items().to_vec();

        let err = cart.checkout(&gateway).await.unwrap_err();
        assert!(matches!(&err, CheckoutError::Rejected(reason) if reason.contains("Persian Turquoise Ring")));
        assert_eq!(cart.items(), before.as_slice());
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_cart_unchanged() {
        let gateway = StubGateway::new(Err(CheckoutError::Transport("connection refused".to_string())));
        let mut cart = cart_with_ring();
        let before = cart.items().to_vec();

        let err = cart.checkout(&gateway).await.unwrap_err();
        assert_eq!(err.to_string(), "Checkout failed. Please try again.");
        assert_eq!(cart.items(), before.as_slice());
    }
}
