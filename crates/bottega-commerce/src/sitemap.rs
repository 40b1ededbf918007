//! Sitemap of the public storefront.

use crate::catalog::Product;
use crate::error::{CommerceError, CommerceResult};
use quick_xml::events::{BytesDecl, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};

/// At most this many product pages are listed.
pub const SITEMAP_PRODUCT_LIMIT: usize = 1000;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

/// One `<url>` of the sitemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub url: String,
    pub priority: f32,
    pub change_frequency: ChangeFrequency,
}

const STATIC_ROUTES: [(&str, f32, ChangeFrequency); 3] = [
    ("/", 1.0, ChangeFrequency::Weekly),
    ("/catalog", 0.8, ChangeFrequency::Weekly),
    ("/contact", 0.5, ChangeFrequency::Monthly),
];

/// Home, catalog and contact pages, then one page per product.
pub fn build_sitemap(site_url: &str, products: &[Product]) -> Vec<SitemapEntry> {
    let origin = site_url.trim_end_matches('/');

    let static_routes = STATIC_ROUTES
        .iter()
        .map(|(path, priority, change_frequency)| SitemapEntry {
            url: format!("{}{}", origin, path),
            priority: *priority,
            change_frequency: *change_frequency,
        });
    let product_routes = products
        .iter()
        .take(SITEMAP_PRODUCT_LIMIT)
        .map(|product| SitemapEntry {
            url: format!("{}{}", origin, product.path()),
            priority: 0.7,
            change_frequency: ChangeFrequency::Weekly,
        });

    static_routes.chain(product_routes).collect()
}

/// Render entries as a sitemaps.org `urlset` document.
pub fn render_sitemap_xml(entries: &[SitemapEntry]) -> CommerceResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;
    writer
        .create_element("urlset")
        .with_attribute(("xmlns", SITEMAP_NS))
        .write_inner_content(|w| {
            for entry in entries {
                let priority = format!("{:.1}", entry.priority);
                w.create_element("url").write_inner_content(|w| {
                    w.create_element("loc")
                        .write_text_content(BytesText::new(&entry.url))?;
                    w.create_element("changefreq")
                        .write_text_content(BytesText::new(entry.change_frequency.as_str()))?;
                    w.create_element("priority")
                        .write_text_content(BytesText::new(&priority))?;
                    Ok::<(), std::io::Error>(())
                })?;
            }
            Ok::<(), std::io::Error>(())
        })
        .map_err(xml_error)?;

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn xml_error(e: impl std::fmt::Display) -> CommerceError {
    CommerceError::Serialization(format!("sitemap: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    fn products(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| Product::new(format!("p{i}"), format!("Prodotto {i}"), format!("prodotto-{i}")))
            .collect()
    }

    #[test]
    fn test_static_routes_then_products() {
        let entries = build_sitemap("https://bottega.example/", &products(2));
        let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://bottega.example/",
                "https://bottega.example/catalog",
                "https://bottega.example/contact",
                "https://bottega.example/product/prodotto-0",
                "https://bottega.example/product/prodotto-1",
            ]
        );
        assert_eq!(entries[2].change_frequency, ChangeFrequency::Monthly);
        assert_eq!(entries[3].priority, 0.7);
    }

    #[test]
    fn test_product_pages_are_capped() {
        let entries = build_sitemap("http://localhost:3000", &products(SITEMAP_PRODUCT_LIMIT + 5));
        assert_eq!(entries.len(), STATIC_ROUTES.len() + SITEMAP_PRODUCT_LIMIT);
    }

    #[test]
    fn test_render_xml_lists_every_location() {
        let mut catalog = products(1);
        catalog[0].slug = "tazza&piattino".to_string();
        let entries = build_sitemap("http://localhost:3000", &catalog);
        let xml = render_sitemap_xml(&entries).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(SITEMAP_NS));
        assert!(xml.contains("<priority>0.5</priority>"));

        let mut reader = Reader::from_str(&xml);
        reader.config_mut().trim_text(true);
        let mut in_loc = false;
        let mut locs = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => in_loc = e.name().as_ref() == b"loc",
                Event::Text(t) if in_loc => locs.push(t.unescape().unwrap().into_owned()),
                Event::End(_) => in_loc = false,
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(locs.len(), 4);
        assert_eq!(locs[3], "http://localhost:3000/product/tazza&piattino");
    }
}
