//! The cart store.

use chrono::Utc;
use tracing::{error, warn};

use super::events::{CartEvent, CartSnapshot, SubscriptionId};
use super::storage::{CART_STORAGE_KEY, CartStorage};
use crate::sanitize::CartProductInput;
use crate::types::{CartLineItem, CartValidationRequest, ValidatedCartLine, format_minor_units};

/// Highest quantity reachable by repeatedly adding the same product.
pub const MAX_LINE_QUANTITY: u32 = 10;

const MAX_QUANTITY_NOTICE: &str = "Maximum quantity reached for this item";

/// What [`CartStore::add_item`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended with quantity 1.
    Added,
    /// An existing line's quantity went up by one.
    Incremented,
    /// The line was already at [`MAX_LINE_QUANTITY`]; nothing changed.
    AtLimit,
    /// The product failed sanitization; nothing changed.
    Rejected,
}

type Listener = Box<dyn FnMut(&CartEvent)>;

/// Ordered cart lines with persistence and change notifications.
///
/// Invariants: at most one line per product id, and no line with quantity 0.
/// Every mutation persists the full list and then emits
/// [`CartEvent::Updated`] to all subscribers, synchronously.
pub struct CartStore<S> {
    items: Vec<CartLineItem>,
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: CartStorage> CartStore<S> {
    /// Load the cart from `storage`.
    ///
    /// Missing or unreadable data gives an empty cart.
    pub fn open(storage: S) -> Self {
        let items = load_items(&storage);
        Self {
            items,
            storage,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Register a callback invoked after every change and for every notice.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&CartEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Add one unit of a product.
    ///
    /// Invalid products are logged and ignored. A line already at
    /// [`MAX_LINE_QUANTITY`] is left alone and a notice is sent instead.
    pub fn add_item(&mut self, product: &CartProductInput) -> AddOutcome {
        let product = match product.sanitize() {
            Ok(product) => product,
            Err(e) => {
                warn!(error = %e, "Invalid product data");
                return AddOutcome::Rejected;
            }
        };

        let outcome = match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(existing) if existing.quantity >= MAX_LINE_QUANTITY => AddOutcome::AtLimit,
            Some(existing) => {
                existing.quantity += 1;
                AddOutcome::Incremented
            }
            None => {
                self.items.push(CartLineItem {
                    id: product.id,
                    name: product.name.clone(),
                    price: product.price,
                    quantity: 1,
                    image: product.image,
                    collection: product.collection,
                    added_at: Utc::now().timestamp_millis(),
                });
                AddOutcome::Added
            }
        };

        if outcome == AddOutcome::AtLimit {
            self.notify(MAX_QUANTITY_NOTICE.to_string());
            return outcome;
        }

        self.persist();
        self.notify(format!("{} added to cart", product.name));
        self.emit_update();
        outcome
    }

    /// Remove the line for `id`, if any.
    pub fn remove_item(&mut self, id: &str) {
        self.items.retain(|item| item.id != id);
        self.commit();
    }

    /// Set the quantity of an existing line.
    ///
    /// Negative values count as zero and zero removes the line. No upper cap
    /// is applied here. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) {
        if !self.items.iter().any(|item| item.id == id) {
            return;
        }

        let quantity = quantity.max(0);
        if quantity == 0 {
            self.remove_item(id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        self.commit();
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit();
    }

    /// Replace the whole cart with server-validated lines.
    ///
    /// Lines that survive validation keep their original `added_at`.
    pub fn replace_with_validated(&mut self, lines: Vec<ValidatedCartLine>) {
        let now = Utc::now().timestamp_millis();
        let items = lines
            .into_iter()
            .map(|line| {
                let added_at = self
                    .items
                    .iter()
                    .find(|item| item.id == line.id)
                    .map_or(now, |item| item.added_at);
                CartLineItem {
                    id: line.id,
                    name: line.name,
                    price: line.price,
                    quantity: line.quantity,
                    image: line.image,
                    collection: line.collection,
                    added_at,
                }
            })
            .collect();
        self.items = items;
        self.commit();
    }

    /// Sum of price × quantity in minor units, saturating at `i64::MAX`.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .map(CartLineItem::line_total)
            .fold(0, i64::saturating_add)
    }

    /// Sum of quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Total rendered with two decimals and the currency symbol.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_minor_units(self.total())
    }

    /// Current state as broadcast to subscribers.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            total: self.total(),
            count: self.total_items(),
            formatted_total: self.formatted_total(),
        }
    }

    /// Body for the cart validation endpoint.
    #[must_use]
    pub fn validation_request(&self) -> CartValidationRequest {
        CartValidationRequest {
            items: self.items.clone(),
        }
    }

    fn commit(&mut self) {
        self.persist();
        self.emit_update();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => {
                if let Err(e) = self.storage.set(CART_STORAGE_KEY, &json) {
                    error!(error = %e, "Failed to persist cart");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize cart"),
        }
    }

    fn notify(&mut self, message: String) {
        self.emit(&CartEvent::Notice(message));
    }

    fn emit_update(&mut self) {
        let event = CartEvent::Updated(self.snapshot());
        self.emit(&event);
    }

    fn emit(&mut self, event: &CartEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}

fn load_items<S: CartStorage>(storage: &S) -> Vec<CartLineItem> {
    let Some(raw) = storage.get(CART_STORAGE_KEY) else {
        return Vec::new();
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "Discarding unreadable stored cart");
        Vec::new()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::cart::MemoryStorage;

    fn ring() -> CartProductInput {
        CartProductInput {
            id: "kal-001".to_string(),
            name: "Persian Turquoise Ring".to_string(),
            price: 285_000,
            image: "/images/kal-001.jpg".to_string(),
            collection: "kaleidoscope".to_string(),
        }
    }

    fn earrings() -> CartProductInput {
        CartProductInput {
            id: "kal-002".to_string(),
            name: "Kaleidoscope Earrings".to_string(),
            price: 195_000,
            image: String::new(),
            collection: "kaleidoscope".to_string(),
        }
    }

    fn recorder<S: CartStorage>(cart: &mut CartStore<S>) -> Rc<RefCell<Vec<CartEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        cart.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_adding_same_product_twice_increments() {
        let mut cart = CartStore::open(MemoryStorage::new());
        assert_eq!(cart.add_item(&ring()), AddOutcome::Added);
        assert_eq!(cart.add_item(&ring()), AddOutcome::Incremented);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.total(), 570_000);
    }

    #[test]
    fn test_add_stops_at_max_quantity() {
        let mut cart = CartStore::open(MemoryStorage::new());
        for _ in 0..MAX_LINE_QUANTITY {
            cart.add_item(&ring());
        }
        let events = recorder(&mut cart);

        assert_eq!(cart.add_item(&ring()), AddOutcome::AtLimit);
        assert_eq!(cart.items()[0].quantity, MAX_LINE_QUANTITY);
        assert_eq!(
            *events.borrow(),
            vec![CartEvent::Notice(MAX_QUANTITY_NOTICE.to_string())]
        );
    }

    #[test]
    fn test_invalid_product_is_ignored() {
        let mut cart = CartStore::open(MemoryStorage::new());
        let events = recorder(&mut cart);
        let mut bad = ring();
        bad.price = -5;

        assert_eq!(cart.add_item(&bad), AddOutcome::Rejected);
        assert!(cart.is_empty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(&ring());
        cart.add_item(&earrings());

        cart.update_quantity("kal-001", 0);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.total_items(), 1);

        cart.update_quantity("kal-002", -3);
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn test_update_quantity_sets_without_cap() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(&ring());
        cart.update_quantity("kal-001", 25);
        assert_eq!(cart.items()[0].quantity, 25);

        cart.update_quantity("missing", 4);
        assert_eq!(cart.total_items(), 25);
    }

    #[test]
    fn test_huge_quantities_do_not_overflow_count() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(&ring());
        cart.add_item(&earrings());

        cart.update_quantity("kal-001", 3_000_000_000);
        cart.update_quantity("kal-002", 3_000_000_000);

        assert_eq!(cart.total_items(), 6_000_000_000);
        assert_eq!(cart.snapshot().count, 6_000_000_000);
        assert_eq!(cart.total(), 1_440_000_000_000_000);
    }

    #[test]
    fn test_extreme_prices_saturate_total() {
        let mut cart = CartStore::open(MemoryStorage::new());
        let mut priceless = ring();
        priceless.price = i64::MAX;

        assert_eq!(cart.add_item(&priceless), AddOutcome::Added);
        assert_eq!(cart.add_item(&priceless), AddOutcome::Incremented);
        assert_eq!(cart.add_item(&earrings()), AddOutcome::Added);

        assert_eq!(cart.items()[0].line_total(), i64::MAX);
        assert_eq!(cart.total(), i64::MAX);
        assert!(cart.formatted_total().starts_with('£'));
    }

    #[test]
    fn test_every_mutation_emits_snapshot() {
        let mut cart = CartStore::open(MemoryStorage::new());
        let events = recorder(&mut cart);

        cart.add_item(&ring());
        cart.update_quantity("kal-001", 3);
        cart.remove_item("kal-001");
        cart.clear();

        let updates: Vec<CartSnapshot> = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                CartEvent::Updated(snapshot) => Some(snapshot.clone()),
                CartEvent::Notice(_) => None,
            })
            .collect();
        assert_eq!(updates.len(), 4);
        assert_eq!(updates[1].count, 3);
        assert_eq!(updates[1].total, 855_000);
        assert_eq!(updates[1].formatted_total, "£8550.00");
        assert!(updates[3].items.is_empty());
    }

    #[test]
    fn test_add_sends_notice_before_update() {
        let mut cart = CartStore::open(MemoryStorage::new());
        let events = recorder(&mut cart);
        cart.add_item(&ring());

        let events = events.borrow();
        assert_eq!(
            events[0],
            CartEvent::Notice("Persian Turquoise Ring added to cart".to_string())
        );
        assert!(matches!(events[1], CartEvent::Updated(_)));
    }

    #[test]
    fn test_unsubscribe_stops_events() {
        let mut cart = CartStore::open(MemoryStorage::new());
        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        let id = cart.subscribe(move |_| *sink.borrow_mut() += 1);

        cart.clear();
        assert!(cart.unsubscribe(id));
        cart.clear();
        assert!(!cart.unsubscribe(id));
        assert_eq!(*events.borrow(), 1);
    }

    #[test]
    fn test_cart_survives_reopen() {
        let storage = MemoryStorage::new();
        let mut cart = CartStore::open(storage.clone());
        cart.add_item(&ring());
        cart.add_item(&ring());

        let reopened = CartStore::open(storage);
        assert_eq!(reopened.items(), cart.items());
    }

    #[test]
    fn test_corrupt_storage_gives_empty_cart() {
        let storage = MemoryStorage::with_entry(CART_STORAGE_KEY, "{not json");
        let cart = CartStore::open(storage);
        assert!(cart.is_empty());
        assert_eq!(cart.formatted_total(), "£0.00");
    }

    #[test]
    fn test_replace_with_validated_overwrites_prices() {
        let mut cart = CartStore::open(MemoryStorage::new());
        let mut cheap = ring();
        cheap.price = 1;
        cart.add_item(&cheap);
        cart.add_item(&earrings());
        let added_at = cart.items()[0].added_at;

        cart.replace_with_validated(vec![ValidatedCartLine {
            id: "kal-001".to_string(),
            name: "Persian Turquoise Ring".to_string(),
            price: 285_000,
            quantity: 1,
            image: "/images/kal-001.jpg".to_string(),
            collection: "kaleidoscope".to_string(),
        }]);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].price, 285_000);
        assert_eq!(cart.items()[0].added_at, added_at);
        assert_eq!(cart.total(), 285_000);
    }
}
