//! # Seed Data
//!
//! Creates the starter manager account and a small menu.
//!
//! ## Usage
//! ```bash
//! cargo run -p tavola-api --bin seed
//!
//! # Specify database path
//! cargo run -p tavola-api --bin seed -- --db ./data/tavola.db
//! ```
//!
//! Safe to run repeatedly: each table is only filled when it is empty.

use std::env;

use tavola_api::auth::hash_password;
use tavola_core::{Money, NewMenuItem, Role};
use tavola_db::{Database, DbConfig};

/// Menu sections, in display order.
const CATEGORIES: &[&str] = &["Main", "Sides", "Drinks"];

/// (name, price in cents, index into CATEGORIES)
const ITEMS: &[(&str, i64, usize)] = &[
    ("Veg Burger", 9_900, 0),
    ("Paneer Roll", 12_900, 0),
    ("Fries", 6_900, 1),
];

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().collect();
    let mut db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./tavola.db".to_string());

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Tavola seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file, overrides DATABASE_PATH");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Tavola seed");
    println!("===========");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.users().count().await? > 0 {
        println!("⚠ Users already exist, skipping admin account");
    } else {
        let hash = hash_password(ADMIN_PASSWORD)?;
        db.users()
            .insert("Admin", ADMIN_USERNAME, &hash, Role::Manager)
            .await?;
        println!("✓ Created manager '{}' (password '{}')", ADMIN_USERNAME, ADMIN_PASSWORD);
    }

    if db.catalog().count_categories().await? > 0 {
        println!("⚠ Menu already exists, skipping categories and items");
    } else {
        let mut category_ids = Vec::with_capacity(CATEGORIES.len());
        for (position, name) in CATEGORIES.iter().enumerate() {
            category_ids.push(db.catalog().insert_category(name, position as i64).await?);
        }
        println!("✓ Created {} categories", category_ids.len());

        for (name, cents, category) in ITEMS {
            let item = NewMenuItem {
                name: name.to_string(),
                description: None,
                price: Money::from_cents(*cents),
                category_id: category_ids.get(*category).copied(),
            };
            let created = db.catalog().create_item(&item).await?;
            println!("  {} #{} @ {}", created.name, created.id, created.price);
        }
        println!("✓ Created {} items", ITEMS.len());
    }

    db.close().await;

    println!();
    println!("✓ Seed complete!");
    Ok(())
}
