//! # Seed Data Generator
//!
//! Populates the database with development fixtures.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults (7 days of slots)
//! cargo run -p parlor-db --bin seed
//!
//! # Custom day count
//! cargo run -p parlor-db --bin seed -- --days 14
//!
//! # Specify database path
//! cargo run -p parlor-db --bin seed -- --db ./data/parlor.db
//! ```
//!
//! ## Generated Data
//! - One admin, two artists, three members
//! - Hourly slot grids (10:00-18:00, capacity 2) for the coming days
//! - A handful of offerings: appointments, a class, listings, one free event
//! - Two unclaimed staff tasks

use chrono::{Duration, NaiveTime, Utc};
use std::env;
use uuid::Uuid;

use parlor_core::slots::build_slot_grid;
use parlor_core::{
    Offering, OfferingKind, OfferingStatus, Profile, Role, Slot, Task, DEFAULT_CURRENCY,
};
use parlor_db::{Database, DbConfig};

const ADMIN_ID: &str = "seed-admin";
const ARTISTS: &[(&str, &str)] = &[("seed-artist-mira", "Mira"), ("seed-artist-dev", "Dev")];
const MEMBERS: &[(&str, &str)] = &[
    ("seed-member-asha", "Asha"),
    ("seed-member-rohan", "Rohan"),
    ("seed-member-tara", "Tara"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 7;
    let mut db_path = String::from("./parlor_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(7);
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
                println!("Parlor Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of slots to generate (default: 7)");
                println!("  -d, --db <PATH>    Database file path (default: ./parlor_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Parlor Seed Data Generator");
    println!("==========================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    // Refuse to double-seed
    let existing = db.slots().list(None).await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} slots", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    // Profiles
    let mut profiles = vec![Profile {
        id: ADMIN_ID.to_string(),
        display_name: "Studio Admin".to_string(),
        role: Role::Admin,
        wallet_balance_paise: 0,
        created_at: now,
    }];
    for (id, name) in ARTISTS.iter().chain(MEMBERS.iter()) {
        profiles.push(Profile {
            id: id.to_string(),
            display_name: name.to_string(),
            role: Role::Member,
            wallet_balance_paise: 0,
            created_at: now,
        });
    }
    for profile in &profiles {
        db.profiles().insert(profile).await?;
    }
    println!("✓ Seeded {} profiles", profiles.len());

    // Slot grids: hourly 10:00-18:00, capacity 2
    let open = NaiveTime::from_hms_opt(10, 0, 0).ok_or("bad open time")?;
    let close = NaiveTime::from_hms_opt(18, 0, 0).ok_or("bad close time")?;
    let mut total_slots = 0usize;
    for day in 0..days {
        let date = (now + Duration::days(day)).date_naive();
        let intervals = build_slot_grid(open, close, 60)?;
        let slots: Vec<Slot> = intervals
            .into_iter()
            .map(|interval| Slot {
                id: Uuid::new_v4().to_string(),
                date,
                start_time: interval.start_time,
                end_time: interval.end_time,
                max_bookings: 2,
                current_bookings: 0,
                is_available: true,
                created_by: ADMIN_ID.to_string(),
                created_at: now,
                updated_at: now,
            })
            .collect();
        total_slots += slots.len();
        db.slots().insert_batch(&slots).await?;
    }
    println!("✓ Seeded {} slots over {} days", total_slots, days);

    // Offerings
    let offerings = [
        offering(
            OfferingKind::Appointment,
            "Custom sleeve consultation",
            150_000,
            "seed-artist-mira",
            None,
            None,
        ),
        offering(
            OfferingKind::Appointment,
            "Flash piece session",
            80_000,
            "seed-artist-dev",
            None,
            None,
        ),
        offering(
            OfferingKind::Class,
            "Figure drawing (8 seats)",
            50_000,
            "seed-artist-mira",
            Some(8),
            None,
        ),
        offering(
            OfferingKind::Class,
            "Open studio membership (30 days)",
            120_000,
            ADMIN_ID,
            None,
            Some(30),
        ),
        offering(
            OfferingKind::Class,
            "Community crit night",
            0,
            ADMIN_ID,
            Some(20),
            None,
        ),
        offering(
            OfferingKind::Listing,
            "Original ink drawing 'Koi'",
            450_000,
            "seed-artist-dev",
            None,
            None,
        ),
    ];
    for o in &offerings {
        db.offerings().insert(o).await?;
    }
    println!("✓ Seeded {} offerings", offerings.len());

    // Tasks
    for title in ["Restock aftercare kits", "Call supplier about ink order"] {
        db.tasks()
            .insert(&Task {
                id: Uuid::new_v4().to_string(),
                title: title.to_string(),
                notes: None,
                created_by: ADMIN_ID.to_string(),
                assigned_to: None,
                claimed_at: None,
                created_at: now,
            })
            .await?;
    }
    println!("✓ Seeded 2 tasks");

    println!();
    println!("✓ Seed complete!");
    Ok(())
}

fn offering(
    kind: OfferingKind,
    title: &str,
    price_paise: i64,
    beneficiary: &str,
    max_capacity: Option<i64>,
    subscription_days: Option<i64>,
) -> Offering {
    let now = Utc::now();
    Offering {
        id: Uuid::new_v4().to_string(),
        kind,
        title: title.to_string(),
        description: None,
        price_paise,
        currency: DEFAULT_CURRENCY.to_string(),
        beneficiary_id: beneficiary.to_string(),
        max_capacity,
        subscription_days,
        status: OfferingStatus::Active,
        created_at: now,
        updated_at: now,
    }
}
