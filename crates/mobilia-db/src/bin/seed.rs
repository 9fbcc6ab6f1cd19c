//! # Seed Data Generator
//!
//! Populates the database with a furniture catalog for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p mobilia-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p mobilia-db --bin seed -- --count 1000
//!
//! # Specify database path
//! cargo run -p mobilia-db --bin seed -- --db ./data/mobilia.db
//! ```
//!
//! ## Generated Data
//! One demo manufacturer (`seed-manufacturer@mobilia.dev`, no usable
//! password) owning products across categories: sofa, table, chair, bed,
//! storage, lighting. Prices are $49.00 - $1,499.00, stock 0 - 50.

use std::env;

use chrono::Utc;
use mobilia_core::{NewProduct, Role, User};
use mobilia_db::{Database, DbConfig};
use uuid::Uuid;

const SEED_EMAIL: &str = "seed-manufacturer@mobilia.dev";

/// Product lines per category.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("sofa", &["Oslo", "Bergen", "Lund", "Malmo", "Aarhus", "Tromso"]),
    ("table", &["Fjord", "Birch", "Harbor", "Linden", "Atlas", "Nova"]),
    ("chair", &["Pine", "Alder", "Willow", "Cedar", "Rowan", "Elm"]),
    ("bed", &["Dune", "Haven", "Nordic", "Cove", "Summit", "Drift"]),
    ("storage", &["Cube", "Vault", "Ledger", "Archive", "Nest", "Crate"]),
    ("lighting", &["Halo", "Beam", "Lumen", "Ember", "Glow", "Arc"]),
];

/// Finish variants with their surcharge in cents.
const FINISHES: &[(&str, i64)] = &[
    ("Oak", 0),
    ("Walnut", 8_000),
    ("White Ash", 4_000),
    ("Black Steel", 6_000),
    ("Linen", 2_500),
    ("Velvet", 12_000),
];

/// Base prices per category in cents.
fn base_price(category: &str) -> i64 {
    match category {
        "sofa" => 89_900,
        "bed" => 69_900,
        "table" => 34_900,
        "storage" => 19_900,
        "chair" => 12_900,
        _ => 4_900,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./mobilia_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Mobilia Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./mobilia_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Mobilia Seed Data Generator");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let maker = match db.users().get_by_email(SEED_EMAIL).await? {
        Some(user) => user,
        None => {
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4().to_string(),
                email: SEED_EMAIL.to_string(),
                // Not a valid PHC string, so nobody can log in as this account.
                password_hash: "!".to_string(),
                role: Role::Manufacturer,
                active: true,
                confirmation_token: None,
                company_name: Some("Mobilia Demo Works".to_string()),
                created_at: now,
                updated_at: now,
            };
            db.users().insert(&user).await?;
            user
        }
    };
    let company = maker.company_name.clone().unwrap_or_default();
    println!("✓ Manufacturer {}", maker.email);

    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: for (category_idx, (category, lines)) in CATEGORIES.iter().enumerate() {
        for (line_idx, line) in lines.iter().enumerate() {
            for (finish_idx, (finish, surcharge)) in FINISHES.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let product = generate_product(
                    category,
                    line,
                    finish,
                    *surcharge,
                    category_idx * 100 + line_idx * 10 + finish_idx,
                );

                if let Err(e) = db.products().create(&maker.id, &company, &product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 50 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds one catalog entry, e.g. "Oslo Sofa - Walnut".
fn generate_product(category: &str, line: &str, finish: &str, surcharge: i64, seed: usize) -> NewProduct {
    let mut kind = category.to_string();
    if let Some(first) = kind.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    NewProduct {
        name: format!("{} {} - {}", line, kind, finish),
        description: format!("{} {} in a {} finish.", line, category, finish.to_lowercase()),
        price_cents: base_price(category) + surcharge + ((seed * 37) % 50) as i64 * 100,
        stock: (seed % 51) as i64,
        image: format!("/images/{}/{}.jpg", category, line.to_lowercase()),
        category: category.to_string(),
        company_name: None,
    }
}
