//! Seed content and the bundled demo catalogue
//!
//! Static sections (hero, footer, sustainability) are seeded so the first
//! render is never empty. The demo catalogue backs [`MemoryDataSource`] when
//! no backend is configured.

use serde_json::{json, Value};

use crate::api::{resources, MemoryDataSource, Record};
use crate::slices::footer::{FooterContent, FooterLink};
use crate::slices::hero::HeroSlide;
use crate::slices::sustainability::{SustainabilityContent, SustainabilityPillar};

pub fn seed_slides() -> Vec<HeroSlide> {
    vec![HeroSlide {
        id: 0,
        title: "Gear for every trail".into(),
        subtitle: "Responsibly made outdoor essentials".into(),
        image_url: "/img/hero-default.jpg".into(),
        cta_label: Some("Shop now".into()),
        cta_href: Some("/products".into()),
        position: 0,
    }]
}

pub fn seed_footer() -> FooterContent {
    let link = |label: &str, href: &str, group: &str, position: i32| FooterLink {
        label: label.into(),
        href: href.into(),
        group: group.into(),
        position,
    };
    FooterContent {
        tagline: "Made to last, built to be repaired.".into(),
        links: vec![
            link("About us", "/about", "company", 1),
            link("Contact", "/contact", "company", 2),
            link("Shipping", "/help/shipping", "help", 1),
            link("Returns", "/help/returns", "help", 2),
        ],
    }
}

pub fn seed_sustainability() -> SustainabilityContent {
    let pillar = |title: &str, description: &str, icon: &str, position: i32| SustainabilityPillar {
        title: title.into(),
        description: description.into(),
        icon: icon.into(),
        position,
    };
    SustainabilityContent {
        headline: "Our commitment".into(),
        pillars: vec![
            pillar("Recycled materials", "Over 70% of our fabrics are recycled.", "recycle", 1),
            pillar("Fair production", "Audited partner factories only.", "handshake", 2),
            pillar("Lifetime repairs", "We fix what we make.", "wrench", 3),
        ],
    }
}

fn records(rows: Value) -> Vec<Record> {
    match rows {
        Value::Array(rows) => rows
            .into_iter()
            .filter_map(|row| match row {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

pub fn demo_hero_slides() -> Vec<Record> {
    records(json!([
        {
            "id": 1,
            "title": "Spring trail collection",
            "subtitle": "Lightweight layers for changing weather",
            "image_url": "/img/hero-spring.jpg",
            "cta_label": "Explore",
            "cta_href": "/products?category=outerwear",
            "position": 1
        },
        {
            "id": 2,
            "title": "Repair, don't replace",
            "subtitle": "Free repairs on everything we sell",
            "image_url": "/img/hero-repair.jpg",
            "cta_label": "Learn more",
            "cta_href": "/sustainability",
            "position": 2
        },
        {
            "id": 3,
            "title": "Flash sale weekend",
            "subtitle": "Up to 40% off selected footwear",
            "image_url": "/img/hero-sale.jpg",
            "cta_label": "See offers",
            "cta_href": "/offers",
            "position": 3
        }
    ]))
}

pub fn demo_footer_links() -> Vec<Record> {
    records(json!([
        { "label": "About us", "href": "/about", "group": "company", "position": 1 },
        { "label": "Careers", "href": "/careers", "group": "company", "position": 2 },
        { "label": "Contact", "href": "/contact", "group": "company", "position": 3 },
        { "label": "Shipping", "href": "/help/shipping", "group": "help", "position": 1 },
        { "label": "Returns", "href": "/help/returns", "group": "help", "position": 2 },
        { "label": "Repairs", "href": "/help/repairs", "group": "help", "position": 3 }
    ]))
}

pub fn demo_offers() -> Vec<Record> {
    records(json!([
        {
            "id": 1,
            "title": "Spring layering",
            "description": "20% off all seasonal outerwear",
            "discount_type": "percentage",
            "discount_value": 20,
            "category": "seasonal",
            "featured": true,
            "valid_until": "2026-06-30"
        },
        {
            "id": 2,
            "title": "Trail runner deal",
            "description": "$30 off flash sale footwear",
            "discount_type": "fixed_amount",
            "discount_value": 30,
            "category": "flash_sale"
        },
        {
            "id": 3,
            "title": "Free shipping",
            "description": "On every order this month",
            "discount_type": "free_shipping",
            "discount_value": 0,
            "category": "generic"
        }
    ]))
}

pub fn demo_products() -> Vec<Record> {
    records(json!([
        { "id": 1, "name": "Recycled rain shell", "category": "outerwear", "price": 149.0, "sustainable": true },
        { "id": 2, "name": "Down vest", "category": "outerwear", "price": 119.0, "sustainable": false },
        { "id": 3, "name": "Trail runner", "category": "footwear", "price": 129.0, "sustainable": true },
        { "id": 4, "name": "Hiking boot", "category": "footwear", "price": 189.0, "sustainable": false },
        { "id": 5, "name": "Merino beanie", "category": "accessories", "price": 29.0, "sustainable": true }
    ]))
}

pub fn demo_sustainability_pillars() -> Vec<Record> {
    records(json!([
        { "title": "Recycled materials", "description": "Over 70% of our fabrics are recycled.", "icon": "recycle", "position": 1 },
        { "title": "Fair production", "description": "Audited partner factories only.", "icon": "handshake", "position": 2 },
        { "title": "Lifetime repairs", "description": "We fix what we make.", "icon": "wrench", "position": 3 },
        { "title": "Take-back program", "description": "Return worn gear for store credit.", "icon": "loop", "position": 4 }
    ]))
}

/// In-memory backend with every demo table loaded.
pub fn demo_catalogue() -> MemoryDataSource {
    MemoryDataSource::new()
        .with_table(resources::HERO_SLIDES, demo_hero_slides())
        .with_table(resources::FOOTER_LINKS, demo_footer_links())
        .with_table(resources::OFFERS, demo_offers())
        .with_table(resources::PRODUCTS, demo_products())
        .with_table(resources::SUSTAINABILITY_PILLARS, demo_sustainability_pillars())
        .with_table(resources::NEWSLETTER_SUBSCRIBERS, Vec::new())
        .with_unique(resources::NEWSLETTER_SUBSCRIBERS, "email")
}
