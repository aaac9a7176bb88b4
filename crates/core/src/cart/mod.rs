//! Client-side shopping cart.
//!
//! [`CartStore`] owns the ordered line items, persists them through a
//! [`CartStorage`] after every mutation and notifies subscribers with a
//! [`CartEvent`]. It never talks to the network itself: checkout goes through
//! a [`CheckoutGateway`] and feeds the server's answer back through
//! [`CartStore::replace_with_validated`].

mod checkout;
mod events;
mod storage;
mod store;

pub use checkout::{CheckoutError, CheckoutGateway, CheckoutReceipt};
pub use events::{CartEvent, CartSnapshot, SubscriptionId};
pub use storage::{CART_STORAGE_KEY, CartStorage, MemoryStorage, StorageError};
pub use store::{AddOutcome, CartStore, MAX_LINE_QUANTITY};
