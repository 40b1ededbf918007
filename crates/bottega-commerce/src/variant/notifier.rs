//! Selection change propagation.
//!
//! [`VariantSelector`] owns the selection for one product view. Every
//! customer action goes through [`VariantSelector::apply`], which prices the
//! new selection, re-encodes the `variant` parameter, asks the navigator to
//! update the URL, and hands one [`SelectionSnapshot`] to every registered
//! observer before returning. Observers all see the same snapshot, so price
//! and validity never disagree about which values they describe.

use crate::catalog::{OptionCatalog, ProductDetail};
use crate::error::CommerceError;
use crate::variant::codec::{decode_variant, encode_variant, variant_query};
use crate::variant::pricing::{price_selection, VariantPrice};
use crate::variant::state::{SelectionChange, SelectionState};
use crate::variant::validation::{all_mandatory_satisfied, is_option_satisfied};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

/// Everything downstream consumers need after a change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionSnapshot {
    pub selected_values: SelectionState,
    pub variant_delta: Decimal,
    pub final_price: Option<Decimal>,
    pub base_price: Option<Decimal>,
    /// The option this snapshot was produced for, `None` after
    /// (re)initialization.
    pub changed_option: Option<String>,
    /// Whether `changed_option` now satisfies its mandatory constraint.
    pub changed_option_satisfied: bool,
    /// Whether every mandatory option is satisfied.
    pub mandatory_satisfied: bool,
    /// The `name:value,...` string of the selection.
    pub variant: String,
}

impl SelectionSnapshot {
    /// Add-to-cart needs every mandatory option and a price.
    pub fn can_add_to_cart(&self) -> bool {
        self.mandatory_satisfied && self.final_price.is_some()
    }

    pub fn price(&self) -> VariantPrice {
        VariantPrice {
            variant_delta: self.variant_delta,
            final_price: self.final_price,
        }
    }
}

/// A downstream consumer of selection snapshots (price display, cart button,
/// cart payload, share link).
pub trait SelectionObserver {
    fn on_selection(&mut self, snapshot: &SelectionSnapshot);
}

impl<F> SelectionObserver for F
where
    F: FnMut(&SelectionSnapshot),
{
    fn on_selection(&mut self, snapshot: &SelectionSnapshot) {
        self(snapshot)
    }
}

/// URL/history sink for the product page.
pub trait Navigator {
    /// Replace the page URL with `url` without resetting scroll position.
    fn replace_url(&mut self, url: &str);
}

/// A navigator that drops every request; for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn replace_url(&mut self, _url: &str) {}
}

/// Raised by the catalog loader when a product's option set changes.
#[derive(Debug, Clone)]
pub struct CatalogChanged {
    pub catalog: OptionCatalog,
    pub base_price: Option<Decimal>,
    /// Decoded `variant` parameter to seed string-typed options with.
    pub variant: Option<String>,
}

impl CatalogChanged {
    pub fn from_detail(detail: &ProductDetail, variant: Option<String>) -> Self {
        Self {
            catalog: detail.options.clone(),
            base_price: detail.product.base_price,
            variant,
        }
    }
}

/// Loads product details and raises [`CatalogChanged`] only when the option
/// set actually differs from the one already shown.
///
/// Identity is the catalog signature (`name:type:id` per option), so
/// re-delivering the same product does not reset the customer's choices.
#[derive(Debug, Default)]
pub struct ProductLoader {
    signature: Option<String>,
}

impl ProductLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a freshly loaded product. Returns the event to raise, if any.
    pub fn offer(&mut self, detail: &ProductDetail, variant: Option<String>) -> Option<CatalogChanged> {
        let signature = detail.options.signature();
        if self.signature.as_deref() == Some(signature.as_str()) {
            debug!(product = %detail.product.id, "option set unchanged; keeping selection");
            return None;
        }
        self.signature = Some(signature);
        Some(CatalogChanged::from_detail(detail, variant))
    }
}

/// Selection state machine for one product view.
pub struct VariantSelector {
    path: String,
    catalog: OptionCatalog,
    base_price: Option<Decimal>,
    state: SelectionState,
    navigator: Box<dyn Navigator>,
    observers: Vec<Box<dyn SelectionObserver>>,
}

impl std::fmt::Debug for VariantSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariantSelector")
            .field("path", &self.path)
            .field("catalog", &self.catalog)
            .field("base_price", &self.base_price)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl VariantSelector {
    /// Create a selector for the product page at `path` (e.g.
    /// `/product/tazza`). It has no options until the first
    /// [`CatalogChanged`].
    pub fn new(path: impl Into<String>, navigator: impl Navigator + 'static) -> Self {
        Self {
            path: path.into(),
            catalog: OptionCatalog::empty(),
            base_price: None,
            state: SelectionState::new(),
            navigator: Box::new(navigator),
            observers: Vec::new(),
        }
    }

    /// Register a consumer. It receives every snapshot from now on.
    pub fn subscribe(&mut self, observer: impl SelectionObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn catalog(&self) -> &OptionCatalog {
        &self.catalog
    }

    pub fn base_price(&self) -> Option<Decimal> {
        self.base_price
    }

    /// Reset the selection for a new option set and notify observers.
    ///
    /// The URL is left alone: it either already carries the variant that
    /// seeded the state, or nothing has been chosen yet.
    pub fn on_catalog_changed(&mut self, event: CatalogChanged) -> SelectionSnapshot {
        self.catalog = event.catalog;
        self.base_price = event.base_price;
        self.state = match event.variant.as_deref() {
            Some(raw) if !raw.is_empty() => {
                SelectionState::seeded(&self.catalog, decode_variant(raw))
            }
            _ => SelectionState::initial(&self.catalog),
        };
        debug!(
            options = self.catalog.len(),
            signature = %self.catalog.signature(),
            "selection initialized"
        );

        let snapshot = self.snapshot(None);
        self.emit(&snapshot);
        snapshot
    }

    /// Apply one customer action and propagate the result.
    ///
    /// A rejected change leaves the state untouched and notifies no one.
    pub fn apply(&mut self, change: SelectionChange) -> Result<SelectionSnapshot, CommerceError> {
        let changed = match self.state.apply(&self.catalog, change) {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "selection change rejected");
                return Err(e);
            }
        };

        let snapshot = self.snapshot(Some(changed));
        debug!(
            option = snapshot.changed_option.as_deref().unwrap_or_default(),
            delta = %snapshot.variant_delta,
            satisfied = snapshot.changed_option_satisfied,
            "selection changed"
        );

        if let Some(query) = variant_query(&self.state) {
            let url = format!("{}?{}", self.path, query);
            self.navigator.replace_url(&url);
        }

        self.emit(&snapshot);
        Ok(snapshot)
    }

    /// The snapshot for the current state, without notifying anyone.
    pub fn current(&self) -> SelectionSnapshot {
        self.snapshot(None)
    }

    fn snapshot(&self, changed_option: Option<String>) -> SelectionSnapshot {
        let price = price_selection(&self.state, &self.catalog, self.base_price);
        let changed_option_satisfied = changed_option
            .as_deref()
            .and_then(|name| self.catalog.get(name))
            .map(|option| is_option_satisfied(option, &self.state))
            .unwrap_or(true);

        SelectionSnapshot {
            selected_values: self.state.clone(),
            variant_delta: price.variant_delta,
            final_price: price.final_price,
            base_price: self.base_price,
            changed_option,
            changed_option_satisfied,
            mandatory_satisfied: all_mandatory_satisfied(&self.catalog, &self.state),
            variant: encode_variant(&self.state),
        }
    }

    fn emit(&mut self, snapshot: &SelectionSnapshot) {
        for observer in &mut self.observers {
            observer.on_selection(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{OptionType, OptionValue, Product, ProductOption};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingNavigator(Rc<RefCell<Vec<String>>>);

    impl Navigator for RecordingNavigator {
        fn replace_url(&mut self, url: &str) {
            self.0.borrow_mut().push(url.to_string());
        }
    }

    fn detail() -> ProductDetail {
        ProductDetail::new(Product::new("p1", "Tazza", "tazza").with_price(Decimal::from(10)))
            .with_options(vec![
                ProductOption::new("o1", "colore", OptionType::SingleChoice)
                    .mandatory()
                    .with_value(OptionValue::new("v1", "rosso").with_price_delta(Decimal::from(2)))
                    .with_value(OptionValue::new("v2", "blu").with_price_delta(Decimal::ZERO)),
                ProductOption::new("o2", "regalo", OptionType::BooleanFlag),
            ])
    }

    fn selector() -> (VariantSelector, Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<SelectionSnapshot>>>) {
        let nav = RecordingNavigator::default();
        let urls = nav.0.clone();
        let mut selector = VariantSelector::new("/product/tazza", nav);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        selector.subscribe(move |s: &SelectionSnapshot| sink.borrow_mut().push(s.clone()));
        (selector, urls, seen)
    }

    #[test]
    fn test_catalog_changed_initializes_and_notifies() {
        let (mut selector, urls, seen) = selector();
        let snapshot = selector.on_catalog_changed(CatalogChanged::from_detail(&detail(), None));
        assert_eq!(snapshot.final_price, Some(Decimal::from(12)));
        assert!(snapshot.mandatory_satisfied);
        assert_eq!(seen.borrow().len(), 1);
        assert!(urls.borrow().is_empty());
    }

    #[test]
    fn test_apply_updates_url_and_observers() {
        let (mut selector, urls, seen) = selector();
        selector.on_catalog_changed(CatalogChanged::from_detail(&detail(), None));
        let snapshot = selector.apply(SelectionChange::select("colore", "blu")).unwrap();

        assert_eq!(snapshot.final_price, Some(Decimal::from(10)));
        assert_eq!(snapshot.changed_option.as_deref(), Some("colore"));
        assert!(snapshot.changed_option_satisfied);
        assert_eq!(
            urls.borrow().as_slice(),
            ["/product/tazza?variant=colore%3Ablu".to_string()]
        );
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1], snapshot);
    }

    #[test]
    fn test_rejected_change_notifies_no_one() {
        let (mut selector, urls, seen) = selector();
        selector.on_catalog_changed(CatalogChanged::from_detail(&detail(), None));
        assert!(selector.apply(SelectionChange::text("colore", "x")).is_err());
        assert_eq!(seen.borrow().len(), 1);
        assert!(urls.borrow().is_empty());
    }

    #[test]
    fn test_every_observer_sees_the_same_snapshot() {
        let (mut selector, _urls, first) = selector();
        let second = Rc::new(RefCell::new(Vec::new()));
        let sink = second.clone();
        selector.subscribe(move |s: &SelectionSnapshot| sink.borrow_mut().push(s.clone()));
        selector.on_catalog_changed(CatalogChanged::from_detail(&detail(), None));
        selector.apply(SelectionChange::flag("regalo", true)).unwrap();
        assert_eq!(*first.borrow(), *second.borrow());
    }

    #[test]
    fn test_seeded_from_variant() {
        let (mut selector, _urls, _seen) = selector();
        let snapshot = selector.on_catalog_changed(CatalogChanged::from_detail(
            &detail(),
            Some("colore:blu,regalo:true".to_string()),
        ));
        assert_eq!(snapshot.variant, "colore:blu");
        assert_eq!(snapshot.final_price, Some(Decimal::from(10)));
    }

    #[test]
    fn test_loader_raises_only_on_signature_change() {
        let mut loader = ProductLoader::new();
        let d = detail();
        assert!(loader.offer(&d, None).is_some());
        assert!(loader.offer(&d, None).is_none());

        let mut changed = d.clone();
        changed.options = OptionCatalog::new(vec![ProductOption::new(
            "o9",
            "nota",
            OptionType::FreeText,
        )]);
        assert!(loader.offer(&changed, None).is_some());
    }

    #[test]
    fn test_repeated_load_keeps_user_choices() {
        let (mut selector, _urls, _seen) = selector();
        let mut loader = ProductLoader::new();
        let d = detail();
        if let Some(event) = loader.offer(&d, None) {
            selector.on_catalog_changed(event);
        }
        selector.apply(SelectionChange::select("colore", "blu")).unwrap();
        if let Some(event) = loader.offer(&d, None) {
            selector.on_catalog_changed(event);
        }
        assert_eq!(selector.current().variant, "colore:blu");
    }
}
