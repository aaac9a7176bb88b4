//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! parisa cart add kal-ring-001
//! parisa cart update kal-ring-001 3
//! parisa cart show
//! parisa cart checkout
//! ```
//!
//! The cart lives in `$PARISA_CART_DIR/parisa-cart.json`.

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use parisa_core::cart::{CartEvent, CartStorage, CartStore, CheckoutError};
use parisa_core::format_minor_units;
use parisa_core::sanitize::CartProductInput;
use thiserror::Error;

use crate::client::StorefrontClient;

/// Errors from cart commands.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("No product with id {0}")]
    UnknownProduct(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

/// Open the cart and collect the notices it sends while a command runs.
pub fn open_with_notices<S: CartStorage>(storage: S) -> (CartStore<S>, Rc<RefCell<Vec<String>>>) {
    let mut cart = CartStore::open(storage);
    let notices = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notices);
    cart.subscribe(move |event| {
        if let CartEvent::Notice(message) = event {
            sink.borrow_mut().push(message.clone());
        }
    });
    (cart, notices)
}

fn flush_notices(notices: &RefCell<Vec<String>>, out: &mut impl Write) -> io::Result<()> {
    for notice in notices.borrow_mut().drain(..) {
        writeln!(out, "{notice}")?;
    }
    Ok(())
}

/// Print every line and the total.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn show<S: CartStorage>(cart: &CartStore<S>, out: &mut impl Write) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty");
    }

    for item in cart.items() {
        writeln!(
            out,
            "  {:<16} {:<40} x{:<3} {:>12}",
            item.id,
            item.name,
            item.quantity,
            format_minor_units(item.line_total()),
        )?;
    }
    let count = cart.total_items();
    writeln!(
        out,
        "Total: {} ({count} item{})",
        cart.formatted_total(),
        if count == 1 { "" } else { "s" }
    )
}

/// Add one unit of a catalog product.
///
/// # Errors
///
/// Returns an error if the product is not in the catalog or output fails.
pub async fn add<S: CartStorage>(
    storage: S,
    client: &StorefrontClient,
    id: &str,
    out: &mut impl Write,
) -> Result<(), CartCommandError> {
    let catalog = client.catalog_or_fallback().await;
    let product = catalog
        .find(id)
        .ok_or_else(|| CartCommandError::UnknownProduct(id.to_string()))?;

    let (mut cart, notices) = open_with_notices(storage);
    cart.add_item(&CartProductInput::from(product));
    flush_notices(&notices, out)?;
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn remove<S: CartStorage>(storage: S, id: &str, out: &mut impl Write) -> io::Result<()> {
    let (mut cart, _) = open_with_notices(storage);
    cart.remove_item(id);
    show(&cart, out)
}

/// Set a line's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn update<S: CartStorage>(
    storage: S,
    id: &str,
    quantity: i64,
    out: &mut impl Write,
) -> io::Result<()> {
    let (mut cart, _) = open_with_notices(storage);
    cart.update_quantity(id, quantity);
    show(&cart, out)
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn clear<S: CartStorage>(storage: S, out: &mut impl Write) -> io::Result<()> {
    let (mut cart, _) = open_with_notices(storage);
    cart.clear();
    writeln!(out, "Cart cleared")
}

/// Validate the cart with the storefront and report the checkout total.
///
/// A refused or failed checkout is reported to the shopper, not returned as
/// an error; the cart stays as it was.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub async fn checkout<S: CartStorage>(
    storage: S,
    client: &StorefrontClient,
    out: &mut impl Write,
) -> io::Result<()> {
    let (mut cart, _) = open_with_notices(storage);

    match cart.checkout(client).await {
        Ok(receipt) => {
            show(&cart, out)?;
            writeln!(out)?;
            writeln!(out, "Checkout: {}", receipt.formatted_total)?;
            writeln!(out, "Cart validated. Payment is not taken by this tool.")
        }
        Err(e @ (CheckoutError::EmptyCart | CheckoutError::Rejected(_))) => writeln!(out, "{e}"),
        Err(e @ CheckoutError::Transport(_)) => {
            tracing::error!(error = ?e, "Checkout validation error");
            writeln!(out, "{e}")
        }
    }
}
