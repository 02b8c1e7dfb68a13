//! Database seeder for Soundledger development and testing.
//!
//! Seeds an admin, a client with a label, revenue reports with expanded
//! ledger rows, and a pending withdrawal for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, Local, NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use soundledger_db::entities::{
    labels, revenue_reports, royalty_entries,
    sea_orm_active_enums::{UserRole, WithdrawalStatus},
    users, withdrawals,
};

/// Admin user ID (consistent for all seeds)
const ADMIN_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Client user ID (consistent for all seeds)
const CLIENT_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = soundledger_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding label...");
    seed_label(&db).await;

    println!("Seeding revenue reports...");
    seed_reports(&db).await;

    println!("Seeding withdrawal...");
    seed_withdrawal(&db).await;

    println!("Seeding complete!");
}

fn admin_id() -> Uuid {
    Uuid::parse_str(ADMIN_ID).unwrap()
}

fn client_id() -> Uuid {
    Uuid::parse_str(CLIENT_ID).unwrap()
}

/// Seeds the admin and client accounts.
async fn seed_users(db: &DatabaseConnection) {
    if users::Entity::find_by_id(admin_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Users already exist, skipping...");
        return;
    }

    let admin = users::ActiveModel {
        id: Set(admin_id()),
        email: Set("ops@soundledger.dev".to_string()),
        display_name: Set("Label Ops".to_string()),
        role: Set(UserRole::Admin),
        currency: Set("USD".to_string()),
        can_manage_accounts: Set(true),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    let client = users::ActiveModel {
        id: Set(client_id()),
        email: Set("artist@soundledger.dev".to_string()),
        display_name: Set("Demo Artist".to_string()),
        role: Set(UserRole::Client),
        currency: Set("USD".to_string()),
        can_manage_accounts: Set(false),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    for (name, model) in [("admin", admin), ("client", client)] {
        if let Err(e) = model.insert(db).await {
            eprintln!("Failed to insert {name}: {e}");
        } else {
            println!("  Created {name} user");
        }
    }
}

/// Seeds a label for the demo client with a 20% share.
async fn seed_label(db: &DatabaseConnection) {
    let label = labels::ActiveModel {
        id: Set(Uuid::new_v4()),
        owner_id: Set(client_id()),
        contact_email: Set(Some("artist@soundledger.dev".to_string())),
        name: Set("Demo Records".to_string()),
        revenue_share: Set(dec!(20.00)),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = label.insert(db).await {
        eprintln!("Failed to insert label: {e}");
    } else {
        println!("  Created label: Demo Records (20%)");
    }
}

/// Seeds two monthly reports with expanded ledger rows.
async fn seed_reports(db: &DatabaseConnection) {
    let today = Local::now().date_naive();
    let months = [month_start(today, 2), month_start(today, 1)];
    let grosses = [dec!(10000.00), dec!(12500.00)];

    for (start, gross) in months.into_iter().zip(grosses) {
        let end = month_end(start);
        let report_id = Uuid::new_v4();

        let report = revenue_reports::ActiveModel {
            id: Set(report_id),
            client_id: Set(client_id()),
            period_start: Set(start),
            period_end: Set(end),
            gross_revenue: Set(gross),
            file_key: Set(format!("reports/{}/{report_id}/statement.csv", client_id())),
            filename: Set("statement.csv".to_string()),
            ledger_expanded: Set(true),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = report.insert(db).await {
            eprintln!("Failed to insert report: {e}");
            continue;
        }

        let entry = royalty_entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(client_id()),
            amount: Set(gross),
            entry_date: Set(end),
            source: Set("Streaming".to_string()),
            description: Set("Monthly Report".to_string()),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = entry.insert(db).await {
            eprintln!("Failed to insert ledger entry: {e}");
        } else {
            println!("  Created report for {start} ({gross})");
        }
    }
}

/// Seeds one pending withdrawal.
async fn seed_withdrawal(db: &DatabaseConnection) {
    let withdrawal = withdrawals::ActiveModel {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id()),
        amount: Set(dec!(500.00)),
        status: Set(WithdrawalStatus::Pending),
        requested_at: Set(Utc::now().into()),
        processed_at: Set(None),
    };

    if let Err(e) = withdrawal.insert(db).await {
        eprintln!("Failed to insert withdrawal: {e}");
    } else {
        println!("  Created pending withdrawal: 500.00");
    }
}

/// First day of the month `back` months before `today`.
fn month_start(today: NaiveDate, back: u32) -> NaiveDate {
    let idx = i64::from(today.year()) * 12 + i64::from(today.month0()) - i64::from(back);
    let year = i32::try_from(idx.div_euclid(12)).unwrap_or(today.year());
    let month = u32::try_from(idx.rem_euclid(12)).unwrap_or(0) + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}

/// Last day of the month containing `start`.
fn month_end(start: NaiveDate) -> NaiveDate {
    let next = month_start(start, 0)
        .checked_add_months(chrono::Months::new(1))
        .unwrap_or(start);
    next.pred_opt().unwrap_or(start)
}
