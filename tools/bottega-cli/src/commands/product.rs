//! Configure a product the way the product page does.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Context as _, Result};
use bottega_commerce::cart::CartItem;
use bottega_commerce::catalog::{CatalogStore, OptionCatalog, OptionType};
use bottega_commerce::share::build_product_share_url;
use bottega_commerce::variant::{
    is_option_satisfied, preview_image, price_text, FileRef, Navigator, ProductLoader,
    SelectionChange, SelectionValue, VariantSelector,
};
use bottega_commerce::{format_optional, StorefrontConfig};
use serde_json::json;

use super::ProductArgs;
use crate::context::Context;
use crate::output::{cart_badge, requirement_badge};

/// Remembers the last URL the page would show.
#[derive(Clone, Default)]
struct AddressBar {
    url: Rc<RefCell<Option<String>>>,
}

impl Navigator for AddressBar {
    fn replace_url(&mut self, url: &str) {
        *self.url.borrow_mut() = Some(url.to_string());
    }
}

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    let store = ctx.catalog()?;
    let detail = store
        .product_detail(&args.slug)
        .await
        .with_context(|| format!("Failed to load product '{}'", args.slug))?;

    let address_bar = AddressBar::default();
    let mut selector = VariantSelector::new(detail.product.path(), address_bar.clone());
    let mut loader = ProductLoader::new();
    if let Some(event) = loader.offer(&detail, args.variant.clone()) {
        selector.on_catalog_changed(event);
    }

    for change in changes(&args, &detail.options)? {
        let option = change.option_name().to_string();
        selector
            .apply(change)
            .with_context(|| format!("Cannot change option '{}'", option))?;
    }

    let snapshot = selector.current();
    let cart = CartItem::build(&detail, &snapshot, &ctx.config);
    let variant = (!snapshot.variant.is_empty()).then_some(snapshot.variant.as_str());
    let share_url = build_product_share_url(ctx.config.origin(), &detail.product.slug, variant);
    let heading = price_text(snapshot.base_price, snapshot.variant_delta);
    let image = preview_image(&detail, &snapshot).unwrap_or(&ctx.config.placeholder_image);

    if ctx.output.is_json() {
        let options: Vec<_> = detail
            .options
            .iter()
            .map(|o| {
                json!({
                    "name": o.name,
                    "type": o.option_type,
                    "mandatory": o.is_mandatory,
                    "satisfied": is_option_satisfied(o, &snapshot.selected_values),
                    "value": snapshot.selected_values.get(&o.name),
                    "placeholder": o.placeholder_or_default(),
                })
            })
            .collect();
        ctx.output.json(&json!({
            "product": detail.product,
            "price_text": heading,
            "variant_delta": snapshot.variant_delta,
            "final_price": snapshot.final_price,
            "variant": snapshot.variant,
            "options": options,
            "can_add_to_cart": snapshot.can_add_to_cart(),
            "page_url": address_bar.url.borrow().clone(),
            "share_url": share_url,
            "preview_image": image,
            "cart_item": cart,
            "cart_attributes": cart.data_attributes(),
        }));
        return Ok(());
    }

    ctx.output.header(&detail.product.title);
    ctx.output.kv("price", &heading);
    ctx.output.kv("base price", &format_optional(snapshot.base_price));
    ctx.output.kv("final price", &format_optional(snapshot.final_price));
    if let Some(category) = &detail.category_name {
        ctx.output.kv("category", category);
    }
    ctx.output.kv("image", image);

    if !detail.options.is_empty() {
        ctx.output.header("Options");
        let widths = [16, 14, 10, 30];
        ctx.output
            .table_row(&["NAME", "TYPE", "STATUS", "VALUE"], &widths);
        for option in detail.options.iter() {
            let badge = requirement_badge(
                option.is_mandatory,
                is_option_satisfied(option, &snapshot.selected_values),
            );
            let value = snapshot
                .selected_values
                .get(&option.name)
                .map(|v| describe(v, &ctx.config))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| format!("({})", option.placeholder_or_default()));
            ctx.output.table_row(
                &[
                    option.name.as_str(),
                    option.option_type.as_str(),
                    badge.as_str(),
                    value.as_str(),
                ],
                &widths,
            );
            if let Some(hint) = option.effective_rules().and_then(|r| r.hint()) {
                ctx.output.list_item(&hint);
            }
        }
    }

    ctx.output.header("Cart");
    ctx.output.kv("add to cart", &cart_badge(cart.enabled));
    for (name, value) in cart.data_attributes() {
        ctx.output.kv(&name, &value);
    }

    ctx.output.header("Links");
    if let Some(url) = address_bar.url.borrow().as_deref() {
        ctx.output.kv("page", url);
    }
    ctx.output.kv("share", &share_url);

    Ok(())
}

/// Turn command-line flags into selection changes: every `--set`, then
/// `--toggle`, `--upload` and `--flag`, each in the order given.
fn changes(args: &ProductArgs, catalog: &OptionCatalog) -> Result<Vec<SelectionChange>> {
    let mut changes = Vec::new();

    for (name, value) in &args.set {
        let option_type = catalog.get(name).map(|o| o.option_type);
        changes.push(match option_type {
            Some(OptionType::LetterChoice) => {
                let mut chars = value.chars();
                let letter = chars.next();
                if chars.next().is_some() {
                    bail!("Option '{}' takes a single letter, got {:?}", name, value);
                }
                SelectionChange::Letter {
                    option: name.clone(),
                    letter,
                }
            }
            Some(OptionType::FreeText) => SelectionChange::text(name, value),
            _ if value.is_empty() => SelectionChange::Select {
                option: name.clone(),
                value: None,
            },
            _ => SelectionChange::select(name, value),
        });
    }
    for (name, value) in &args.toggle {
        changes.push(SelectionChange::toggle(name, value));
    }
    for (name, filename) in &args.upload {
        changes.push(SelectionChange::upload(name, FileRef::new(filename, filename)));
    }
    for (name, checked) in &args.flag {
        changes.push(SelectionChange::flag(name, *checked));
    }

    Ok(changes)
}

fn describe(value: &SelectionValue, config: &StorefrontConfig) -> String {
    match value {
        SelectionValue::SingleChoice(v) | SelectionValue::ImageChoice(v) => {
            v.clone().unwrap_or_default()
        }
        SelectionValue::MultiChoice(values) => values.join(", "),
        SelectionValue::LetterChoice(s) | SelectionValue::FreeText(s) => s.clone(),
        SelectionValue::ImageUpload(file) => file
            .as_ref()
            .map(|f| f.filename.clone())
            .unwrap_or_default(),
        SelectionValue::BooleanFlag(checked) => config.bool_label(*checked).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bottega_commerce::catalog::{OptionValue, ProductOption};

    fn args(set: &[(&str, &str)]) -> ProductArgs {
        ProductArgs {
            slug: "tazza".to_string(),
            variant: None,
            set: set
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            toggle: vec![("extra".to_string(), "nastro".to_string())],
            upload: Vec::new(),
            flag: vec![("regalo".to_string(), true)],
        }
    }

    #[test]
    fn test_set_follows_option_type() {
        let catalog = OptionCatalog::new(vec![
            ProductOption::new("o1", "colore", OptionType::SingleChoice)
                .with_value(OptionValue::new("v1", "rosso")),
            ProductOption::new("o2", "iniziale", OptionType::LetterChoice),
            ProductOption::new("o3", "nota", OptionType::FreeText),
        ]);
        let changes = changes(
            &args(&[("colore", "rosso"), ("iniziale", "m"), ("nota", "ciao"), ("colore", "")]),
            &catalog,
        )
        .unwrap();
        assert_eq!(
            changes,
            vec![
                SelectionChange::select("colore", "rosso"),
                SelectionChange::letter("iniziale", 'm'),
                SelectionChange::text("nota", "ciao"),
                SelectionChange::Select {
                    option: "colore".to_string(),
                    value: None
                },
                SelectionChange::toggle("extra", "nastro"),
                SelectionChange::flag("regalo", true),
            ]
        );
    }

    #[test]
    fn test_letter_takes_one_character() {
        let catalog = OptionCatalog::new(vec![ProductOption::new(
            "o2",
            "iniziale",
            OptionType::LetterChoice,
        )]);
        let err = changes(&args(&[("iniziale", "mr")]), &catalog).unwrap_err();
        assert!(err.to_string().contains("single letter"));

        let cleared = changes(&args(&[("iniziale", "")]), &catalog).unwrap();
        assert_eq!(
            cleared[0],
            SelectionChange::Letter {
                option: "iniziale".to_string(),
                letter: None
            }
        );
    }

    #[test]
    fn test_describe_values() {
        let config = StorefrontConfig::default();
        assert_eq!(describe(&SelectionValue::BooleanFlag(false), &config), "No");
        assert_eq!(
            describe(
                &SelectionValue::MultiChoice(vec!["a".into(), "b".into()]),
                &config
            ),
            "a, b"
        );
        assert_eq!(describe(&SelectionValue::ImageUpload(None), &config), "");
    }
}
