//! Initial database migration.
//!
//! Creates the enums, the stock ledger tables, and the contracts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(STOCK_POOLS_SQL).await?;
        db.execute_unprepared(ASSIGNMENTS_SQL).await?;
        db.execute_unprepared(CONTRACTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Assignment lifecycle
CREATE TYPE assignment_status AS ENUM (
    'assigned',
    'partially_returned',
    'sold_out',
    'returned'
);

-- Contract lifecycle (overdue is derived, never stored)
CREATE TYPE contract_status AS ENUM (
    'active',
    'completed',
    'cancelled'
);
";

const STOCK_POOLS_SQL: &str = r"
CREATE TABLE stock_pools (
    id UUID PRIMARY KEY,
    product_id UUID NOT NULL,
    shop_id UUID NOT NULL,
    total_quantity INTEGER NOT NULL CHECK (total_quantity >= 0),
    version BIGINT NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_stock_pools_product_shop UNIQUE (product_id, shop_id)
);

CREATE INDEX idx_stock_pools_shop ON stock_pools(shop_id);
";

const ASSIGNMENTS_SQL: &str = r"
CREATE TABLE assignments (
    id UUID PRIMARY KEY,
    product_id UUID NOT NULL,
    shop_id UUID NOT NULL,
    agent_id UUID NOT NULL,
    assigned_by UUID NOT NULL,
    assigned_quantity INTEGER NOT NULL CHECK (assigned_quantity > 0),
    sold_quantity INTEGER NOT NULL DEFAULT 0 CHECK (sold_quantity >= 0),
    returned_quantity INTEGER NOT NULL DEFAULT 0 CHECK (returned_quantity >= 0),
    remaining_quantity INTEGER NOT NULL CHECK (remaining_quantity >= 0),
    status assignment_status NOT NULL DEFAULT 'assigned',
    version BIGINT NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Conservation of quantity, enforced at the database as a backstop
    CONSTRAINT chk_assignments_conserved
        CHECK (assigned_quantity = sold_quantity + returned_quantity + remaining_quantity)
);

CREATE INDEX idx_assignments_agent ON assignments(agent_id);
CREATE INDEX idx_assignments_product_shop ON assignments(product_id, shop_id);
CREATE INDEX idx_assignments_open
    ON assignments(product_id, shop_id)
    WHERE remaining_quantity > 0;
";

const CONTRACTS_SQL: &str = r"
CREATE TABLE contracts (
    id UUID PRIMARY KEY,
    shop_id UUID NOT NULL,
    customer_ref UUID NOT NULL,
    product_ref UUID NOT NULL,
    currency VARCHAR(3) NOT NULL DEFAULT 'UZS',
    total_amount NUMERIC(19, 4) NOT NULL CHECK (total_amount >= 0),
    down_payment NUMERIC(19, 4) NOT NULL CHECK (down_payment >= 0),
    duration_months INTEGER NOT NULL CHECK (duration_months BETWEEN 1 AND 24),
    monthly_payment NUMERIC(19, 4) NOT NULL,
    paid_months INTEGER NOT NULL DEFAULT 0 CHECK (paid_months >= 0),
    remaining_amount NUMERIC(19, 4) NOT NULL CHECK (remaining_amount >= 0),
    next_payment_date DATE NOT NULL,
    status contract_status NOT NULL DEFAULT 'active',
    cancel_reason TEXT,
    cancelled_at TIMESTAMPTZ,
    created_by UUID NOT NULL,
    version BIGINT NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_contracts_down_payment CHECK (down_payment <= total_amount)
);

CREATE INDEX idx_contracts_shop ON contracts(shop_id);
CREATE INDEX idx_contracts_customer ON contracts(customer_ref);
CREATE INDEX idx_contracts_due
    ON contracts(next_payment_date)
    WHERE status = 'active';
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS contracts CASCADE;
DROP TABLE IF EXISTS assignments CASCADE;
DROP TABLE IF EXISTS stock_pools CASCADE;

DROP TYPE IF EXISTS contract_status;
DROP TYPE IF EXISTS assignment_status;
";
