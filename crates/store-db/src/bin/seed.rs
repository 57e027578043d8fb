//! # Seed Data Generator
//!
//! Populates the database with demo categories and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./store.db with 50 products (default)
//! cargo run -p store-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p store-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p store-db --bin seed -- --db ./data/store.db
//! ```
//!
//! Product data is deterministic: the same `--count` always produces the
//! same names, prices and stock levels.

use anyhow::Context;
use std::env;
use store_core::validation::{validate_category_input, validate_product_input};
use store_core::{CategoryInput, Money, ProductInput};
use store_db::{Database, DbConfig};
use tracing::{info, warn};

/// Default categories.
const CATEGORIES: &[(&str, &str)] = &[
    ("Animal", "Multicellular organisms that consume organic material"),
    ("Plant", "Multicellular organisms that photosynthesize"),
    ("Bacteria", "Single-celled prokaryotic microorganisms"),
];

/// Product names combined with size variants below.
const PRODUCTS: &[&str] = &[
    "Kopi Susu",
    "Kopi Hitam",
    "Teh Manis",
    "Teh Tawar",
    "Air Mineral",
    "Jus Jeruk",
    "Roti Bakar",
    "Nasi Goreng",
    "Mie Goreng",
    "Pisang Goreng",
];

/// Size variants with their price addon.
const SIZES: &[(&str, i64)] = &[("Small", 0), ("Medium", 2000), ("Large", 4000), ("Jumbo", 7500)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,store_db=debug".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = 50;
    let mut db_path = String::from("./store.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if let Some(value) = args.get(i + 1) {
                    count = value
                        .parse()
                        .with_context(|| format!("invalid --count value: {value}"))?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    db_path = value.clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Store API Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 50)");
                println!("  -d, --db <PATH>    Database file path (default: ./store.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => warn!(arg = %other, "Ignoring unknown argument"),
        }
        i += 1;
    }

    info!(db = %db_path, count, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("failed to open database at {db_path}"))?;

    if db.categories().count().await? == 0 {
        for (name, description) in CATEGORIES {
            let input = CategoryInput {
                name: name.to_string(),
                description: description.to_string(),
            };
            validate_category_input(&input)?;
            db.categories().insert(&input).await?;
        }
        info!(count = CATEGORIES.len(), "Inserted categories");
    } else {
        info!("Categories already present, skipping");
    }

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products; delete the file to regenerate");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let input = generate_product(seed);
        validate_product_input(&input)?;

        if let Err(e) = db.products().insert(&input).await {
            warn!(name = %input.name, error = %e, "Failed to insert product");
            continue;
        }
        generated += 1;
    }

    info!(
        generated,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Generates the `seed`-th demo product.
fn generate_product(seed: usize) -> ProductInput {
    let name = PRODUCTS[seed % PRODUCTS.len()];
    let (size, price_addon) = SIZES[(seed / PRODUCTS.len()) % SIZES.len()];
    let batch = seed / (PRODUCTS.len() * SIZES.len());

    let full_name = if batch == 0 {
        format!("{name} {size}")
    } else {
        format!("{name} {size} #{}", batch + 1)
    };

    // 5,000 - 19,900 in steps of 100, plus the size addon
    let base_price = 5000 + ((seed * 17) % 150) as i64 * 100;

    ProductInput {
        name: full_name,
        price: Money::from_cents(base_price + price_addon),
        stock: (seed % 101) as i64,
    }
}
