//! Initial schema: users, labels, revenue reports, royalty ledger,
//! withdrawals, notifications.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r"
            CREATE TYPE user_role AS ENUM ('admin', 'client');
            CREATE TYPE withdrawal_status AS ENUM ('pending', 'approved', 'rejected');

            CREATE TABLE users (
                id UUID PRIMARY KEY,
                email VARCHAR(255) NOT NULL UNIQUE,
                display_name VARCHAR(255) NOT NULL,
                role user_role NOT NULL DEFAULT 'client',
                currency VARCHAR(3) NOT NULL DEFAULT 'USD',
                can_manage_accounts BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE TABLE labels (
                id UUID PRIMARY KEY,
                owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                contact_email VARCHAR(255),
                name VARCHAR(255) NOT NULL,
                revenue_share NUMERIC(5, 2) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT labels_share_range CHECK (revenue_share >= 0 AND revenue_share <= 100)
            );

            CREATE INDEX idx_labels_owner ON labels(owner_id);
            CREATE INDEX idx_labels_contact_email_lower ON labels(LOWER(contact_email));

            CREATE TABLE revenue_reports (
                id UUID PRIMARY KEY,
                client_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                period_start DATE NOT NULL,
                period_end DATE NOT NULL,
                gross_revenue NUMERIC(15, 2) NOT NULL,
                file_key VARCHAR(512) NOT NULL,
                filename VARCHAR(255) NOT NULL,
                ledger_expanded BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                CONSTRAINT revenue_reports_period CHECK (period_end >= period_start),
                CONSTRAINT revenue_reports_gross_nonnegative CHECK (gross_revenue >= 0)
            );

            CREATE INDEX idx_revenue_reports_client ON revenue_reports(client_id);
            CREATE INDEX idx_revenue_reports_period ON revenue_reports(client_id, period_end);

            CREATE TABLE royalty_entries (
                id UUID PRIMARY KEY,
                client_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                amount NUMERIC(15, 2) NOT NULL,
                entry_date DATE NOT NULL,
                source VARCHAR(255) NOT NULL,
                description VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX idx_royalty_entries_client ON royalty_entries(client_id);
            CREATE INDEX idx_royalty_entries_date ON royalty_entries(client_id, entry_date);

            CREATE TABLE withdrawals (
                id UUID PRIMARY KEY,
                client_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                amount NUMERIC(15, 2) NOT NULL,
                status withdrawal_status NOT NULL DEFAULT 'pending',
                requested_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                processed_at TIMESTAMPTZ,
                CONSTRAINT withdrawals_amount_positive CHECK (amount > 0)
            );

            CREATE INDEX idx_withdrawals_client ON withdrawals(client_id);
            CREATE INDEX idx_withdrawals_status ON withdrawals(client_id, status);

            CREATE TABLE notifications (
                id UUID PRIMARY KEY,
                user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                message TEXT NOT NULL,
                kind VARCHAR(32) NOT NULL,
                is_read BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );

            CREATE INDEX idx_notifications_user ON notifications(user_id, created_at DESC);
            ",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS notifications;
            DROP TABLE IF EXISTS withdrawals;
            DROP TABLE IF EXISTS royalty_entries;
            DROP TABLE IF EXISTS revenue_reports;
            DROP TABLE IF EXISTS labels;
            DROP TABLE IF EXISTS users;
            DROP TYPE IF EXISTS withdrawal_status;
            DROP TYPE IF EXISTS user_role;
            ",
        )
        .await?;

        Ok(())
    }
}
