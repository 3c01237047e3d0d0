//! PostgreSQL store for finance-service.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use super::metrics::DB_QUERY_DURATION;
use super::store::{
    already_paid, balance_out_of_range, duplicate_category, unknown_account, unknown_category,
    unknown_prospect, FinanceStore,
};
use crate::models::{
    balance_effect, Account, Budget, Category, CreateAccount, CreateCategory, CreateInvoice,
    CreateProspect, CreateTransaction, Invoice, InvoiceStatus, ListInvoicesFilter,
    ListTransactionsFilter, Month, Preferences, Prospect, ProspectStatus, Transaction,
    UpdateAccount, UpdateProspect, UpsertBudget,
};

/// Tables reported by [`Database::table_counts`].
pub const TABLES: [&str; 7] = [
    "accounts",
    "categories",
    "transactions",
    "invoices",
    "budgets",
    "prospects",
    "user_preferences",
];

/// The balance update tripped `accounts_balance_range`.
fn is_balance_out_of_range(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("accounts_balance_range")
    )
}

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "finance-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Maintenance (finance-admin)
    // -------------------------------------------------------------------------

    /// Row count per table, in [`TABLES`] order.
    #[instrument(skip(self))]
    pub async fn table_counts(&self) -> Result<Vec<(&'static str, i64)>, AppError> {
        let mut counts = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            // Table names come from the constant list above.
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to count {}: {}", table, e))
                })?;
            counts.push((table, count));
        }
        Ok(counts)
    }

    /// Every account of every user.
    #[instrument(skip(self))]
    pub async fn list_all_accounts(&self) -> Result<Vec<Account>, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, user_id, name, account_type, currency, opening_balance, balance, is_active, created_utc
            FROM accounts
            ORDER BY user_id, created_utc
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list accounts: {}", e)))
    }

    /// Every transaction linked to an account.
    #[instrument(skip(self))]
    pub async fn list_account_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT transaction_id, user_id, account_id, category_id, amount, transaction_type, transaction_date, description, created_utc
            FROM transactions
            WHERE account_id IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list transactions: {}", e))
        })
    }

    /// Overwrite an account's stored balance.
    #[instrument(skip(self), fields(account_id = %account_id, balance = %balance))]
    pub async fn set_account_balance(
        &self,
        account_id: Uuid,
        balance: Decimal,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE accounts SET balance = $2 WHERE account_id = $1")
            .bind(account_id)
            .bind(balance)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to set balance: {}", e))
            })?;
        Ok(())
    }

    async fn category_exists(&self, user_id: Uuid, category_id: Uuid) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE user_id = $1 AND category_id = $2)",
        )
        .bind(user_id)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to check category: {}", e)))
    }
}

#[async_trait]
impl FinanceStore for Database {
    /// Check database health.
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Account Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(user_id = %input.user_id, account_type = %input.account_type))]
    async fn create_account(&self, input: &CreateAccount) -> Result<Account, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_account"])
            .start_timer();

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (account_id, user_id, name, account_type, currency, opening_balance, balance)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING account_id, user_id, name, account_type, currency, opening_balance, balance, is_active, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(&input.name)
        .bind(input.account_type.as_str())
        .bind(&input.currency)
        .bind(input.opening_balance)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create account: {}", e)))?;

        timer.observe_duration();

        info!(account_id = %account.account_id, "Account created");

        Ok(account)
    }

    #[instrument(skip(self), fields(user_id = %user_id, account_id = %account_id))]
    async fn get_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> Result<Option<Account>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_account"])
            .start_timer();

        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, user_id, name, account_type, currency, opening_balance, balance, is_active, created_utc
            FROM accounts
            WHERE user_id = $1 AND account_id = $2
            "#,
        )
        .bind(user_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get account: {}", e)))?;

        timer.observe_duration();

        Ok(account)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_accounts(
        &self,
        user_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Account>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_accounts"])
            .start_timer();

        let accounts = sqlx::query_as::<_, Account>(
            r#"
            SELECT account_id, user_id, name, account_type, currency, opening_balance, balance, is_active, created_utc
            FROM accounts
            WHERE user_id = $1 AND (NOT $2 OR is_active)
            ORDER BY created_utc, account_id
            "#,
        )
        .bind(user_id)
        .bind(active_only)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list accounts: {}", e)))?;

        timer.observe_duration();

        Ok(accounts)
    }

    #[instrument(skip(self, update), fields(user_id = %user_id, account_id = %account_id))]
    async fn update_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        update: &UpdateAccount,
    ) -> Result<Option<Account>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_account"])
            .start_timer();

        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET name = COALESCE($3, name),
                is_active = COALESCE($4, is_active)
            WHERE user_id = $1 AND account_id = $2
            RETURNING account_id, user_id, name, account_type, currency, opening_balance, balance, is_active, created_utc
            "#,
        )
        .bind(user_id)
        .bind(account_id)
        .bind(update.name.as_deref())
        .bind(update.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update account: {}", e)))?;

        timer.observe_duration();

        Ok(account)
    }

    // -------------------------------------------------------------------------
    // Category Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(user_id = %input.user_id, name = %input.name))]
    async fn create_category(&self, input: &CreateCategory) -> Result<Category, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_category"])
            .start_timer();

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (category_id, user_id, name, kind, keywords, color)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING category_id, user_id, name, kind, keywords, color, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(&input.name)
        .bind(input.kind.as_str())
        .bind(&input.keywords)
        .bind(input.color.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                duplicate_category(&input.name)
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create category: {}", e)),
        })?;

        timer.observe_duration();

        Ok(category)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<Category>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_categories"])
            .start_timer();

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT category_id, user_id, name, kind, keywords, color, created_utc
            FROM categories
            WHERE user_id = $1
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list categories: {}", e))
        })?;

        timer.observe_duration();

        Ok(categories)
    }

    #[instrument(skip(self), fields(user_id = %user_id, category_id = %category_id))]
    async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> Result<bool, AppError> {
        // Transactions are detached and budgets dropped by the foreign keys.
        let result = sqlx::query("DELETE FROM categories WHERE user_id = $1 AND category_id = $2")
            .bind(user_id)
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete category: {}", e))
            })?;
        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Transaction Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(user_id = %input.user_id, transaction_type = %input.transaction_type))]
    async fn create_transaction(
        &self,
        input: &CreateTransaction,
    ) -> Result<Transaction, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_transaction"])
            .start_timer();

        if let Some(category_id) = input.category_id {
            if !self.category_exists(input.user_id, category_id).await? {
                return Err(unknown_category(category_id));
            }
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        if let Some(account_id) = input.account_id {
            let effect = balance_effect(Some(input.transaction_type), input.amount);
            let updated = sqlx::query(
                "UPDATE accounts SET balance = balance + $3 WHERE user_id = $1 AND account_id = $2",
            )
            .bind(input.user_id)
            .bind(account_id)
            .bind(effect)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_balance_out_of_range(&e) {
                    return balance_out_of_range(account_id);
                }
                AppError::DatabaseError(anyhow::anyhow!("Failed to update balance: {}", e))
            })?;
            if updated.rows_affected() == 0 {
                tx.rollback().await.ok();
                return Err(unknown_account(account_id));
            }
        }

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (transaction_id, user_id, account_id, category_id, amount, transaction_type, transaction_date, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING transaction_id, user_id, account_id, category_id, amount, transaction_type, transaction_date, description, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(input.account_id)
        .bind(input.category_id)
        .bind(input.amount)
        .bind(input.transaction_type.as_str())
        .bind(input.transaction_date)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to insert transaction: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            transaction_id = %transaction.transaction_id,
            amount = %transaction.amount,
            "Transaction recorded"
        );

        Ok(transaction)
    }

    #[instrument(skip(self), fields(user_id = %user_id, transaction_id = %transaction_id))]
    async fn get_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT transaction_id, user_id, account_id, category_id, amount, transaction_type, transaction_date, description, created_utc
            FROM transactions
            WHERE user_id = $1 AND transaction_id = $2
            "#,
        )
        .bind(user_id)
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get transaction: {}", e)))
    }

    #[instrument(skip(self, filter), fields(user_id = %user_id))]
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &ListTransactionsFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_transactions"])
            .start_timer();

        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT transaction_id, user_id, account_id, category_id, amount, transaction_type, transaction_date, description, created_utc
            FROM transactions
            WHERE user_id = $1
              AND ($2::date IS NULL OR transaction_date >= $2)
              AND ($3::date IS NULL OR transaction_date <= $3)
              AND ($4::varchar IS NULL OR transaction_type = $4)
              AND ($5::uuid IS NULL OR category_id = $5)
              AND ($6::uuid IS NULL OR account_id = $6)
            ORDER BY transaction_date DESC, created_utc DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.transaction_type.map(|t| t.as_str()))
        .bind(filter.category_id)
        .bind(filter.account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list transactions: {}", e))
        })?;

        timer.observe_duration();

        Ok(transactions)
    }

    #[instrument(skip(self), fields(user_id = %user_id, transaction_id = %transaction_id))]
    async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_transaction"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let removed = sqlx::query_as::<_, Transaction>(
            r#"
            DELETE FROM transactions
            WHERE user_id = $1 AND transaction_id = $2
            RETURNING transaction_id, user_id, account_id, category_id, amount, transaction_type, transaction_date, description, created_utc
            "#,
        )
        .bind(user_id)
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to delete transaction: {}", e))
        })?;

        let Some(removed) = removed else {
            tx.rollback().await.ok();
            return Ok(false);
        };

        if let Some(account_id) = removed.account_id {
            sqlx::query(
                "UPDATE accounts SET balance = balance - $3 WHERE user_id = $1 AND account_id = $2",
            )
            .bind(user_id)
            .bind(account_id)
            .bind(removed.balance_effect())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if is_balance_out_of_range(&e) {
                    return balance_out_of_range(account_id);
                }
                AppError::DatabaseError(anyhow::anyhow!("Failed to restore balance: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        if let Some(prospect_id) = input.prospect_id {
            if self.get_prospect(input.user_id, prospect_id).await?.is_none() {
                return Err(unknown_prospect(prospect_id));
            }
        }

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (invoice_id, user_id, prospect_id, client_name, invoice_number, amount, status, issue_date, due_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING invoice_id, user_id, prospect_id, client_name, invoice_number, amount, status, issue_date, due_date, paid_date, notes, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(input.prospect_id)
        .bind(&input.client_name)
        .bind(input.invoice_number.as_deref())
        .bind(input.amount)
        .bind(InvoiceStatus::Pending.as_str())
        .bind(input.issue_date)
        .bind(input.due_date)
        .bind(input.notes.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)))?;

        timer.observe_duration();

        Ok(invoice)
    }

    #[instrument(skip(self), fields(user_id = %user_id, invoice_id = %invoice_id))]
    async fn get_invoice(
        &self,
        user_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, user_id, prospect_id, client_name, invoice_number, amount, status, issue_date, due_date, paid_date, notes, created_utc
            FROM invoices
            WHERE user_id = $1 AND invoice_id = $2
            "#,
        )
        .bind(user_id)
        .bind(invoice_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice: {}", e)))
    }

    #[instrument(skip(self, filter), fields(user_id = %user_id))]
    async fn list_invoices(
        &self,
        user_id: Uuid,
        filter: &ListInvoicesFilter,
    ) -> Result<Vec<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let paid_bounds = filter.paid_from.is_some() || filter.paid_to.is_some();
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT invoice_id, user_id, prospect_id, client_name, invoice_number, amount, status, issue_date, due_date, paid_date, notes, created_utc
            FROM invoices
            WHERE user_id = $1
              AND ($2::varchar IS NULL OR status = $2)
              AND (NOT $3 OR paid_date IS NOT NULL)
              AND ($4::date IS NULL OR paid_date >= $4)
              AND ($5::date IS NULL OR paid_date <= $5)
            ORDER BY issue_date DESC, created_utc DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(paid_bounds)
        .bind(filter.paid_from)
        .bind(filter.paid_to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    #[instrument(skip(self), fields(user_id = %user_id, invoice_id = %invoice_id))]
    async fn mark_invoice_paid(
        &self,
        user_id: Uuid,
        invoice_id: Uuid,
        paid_date: NaiveDate,
    ) -> Result<Option<Invoice>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["mark_invoice_paid"])
            .start_timer();

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET status = 'paid', paid_date = $3
            WHERE user_id = $1 AND invoice_id = $2 AND status <> 'paid'
            RETURNING invoice_id, user_id, prospect_id, client_name, invoice_number, amount, status, issue_date, due_date, paid_date, notes, created_utc
            "#,
        )
        .bind(user_id)
        .bind(invoice_id)
        .bind(paid_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to pay invoice: {}", e)))?;

        timer.observe_duration();

        match invoice {
            Some(invoice) => Ok(Some(invoice)),
            None => match self.get_invoice(user_id, invoice_id).await? {
                Some(_) => Err(already_paid(invoice_id)),
                None => Ok(None),
            },
        }
    }

    // -------------------------------------------------------------------------
    // Budget Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(user_id = %input.user_id, month = %input.month))]
    async fn upsert_budget(&self, input: &UpsertBudget) -> Result<Budget, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["upsert_budget"])
            .start_timer();

        if !self.category_exists(input.user_id, input.category_id).await? {
            return Err(unknown_category(input.category_id));
        }

        let budget = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (budget_id, user_id, category_id, month, amount)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, category_id, month) DO UPDATE SET amount = EXCLUDED.amount
            RETURNING budget_id, user_id, category_id, month, amount, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(input.category_id)
        .bind(input.month.to_string())
        .bind(input.amount)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to save budget: {}", e)))?;

        timer.observe_duration();

        Ok(budget)
    }

    #[instrument(skip(self), fields(user_id = %user_id, month = %month))]
    async fn list_budgets(&self, user_id: Uuid, month: Month) -> Result<Vec<Budget>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_budgets"])
            .start_timer();

        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT budget_id, user_id, category_id, month, amount, created_utc
            FROM budgets
            WHERE user_id = $1 AND month = $2
            ORDER BY created_utc
            "#,
        )
        .bind(user_id)
        .bind(month.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list budgets: {}", e)))?;

        timer.observe_duration();

        Ok(budgets)
    }

    #[instrument(skip(self), fields(user_id = %user_id, budget_id = %budget_id))]
    async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM budgets WHERE user_id = $1 AND budget_id = $2")
            .bind(user_id)
            .bind(budget_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete budget: {}", e))
            })?;
        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Prospect Operations
    // -------------------------------------------------------------------------

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    async fn create_prospect(&self, input: &CreateProspect) -> Result<Prospect, AppError> {
        sqlx::query_as::<_, Prospect>(
            r#"
            INSERT INTO prospects (prospect_id, user_id, name, company, email, phone, status, estimated_value, next_follow_up, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING prospect_id, user_id, name, company, email, phone, status, estimated_value, next_follow_up, notes, created_utc, updated_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.user_id)
        .bind(&input.name)
        .bind(input.company.as_deref())
        .bind(input.email.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.status.as_str())
        .bind(input.estimated_value)
        .bind(input.next_follow_up)
        .bind(input.notes.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create prospect: {}", e)))
    }

    #[instrument(skip(self), fields(user_id = %user_id, prospect_id = %prospect_id))]
    async fn get_prospect(
        &self,
        user_id: Uuid,
        prospect_id: Uuid,
    ) -> Result<Option<Prospect>, AppError> {
        sqlx::query_as::<_, Prospect>(
            r#"
            SELECT prospect_id, user_id, name, company, email, phone, status, estimated_value, next_follow_up, notes, created_utc, updated_utc
            FROM prospects
            WHERE user_id = $1 AND prospect_id = $2
            "#,
        )
        .bind(user_id)
        .bind(prospect_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get prospect: {}", e)))
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_prospects(
        &self,
        user_id: Uuid,
        status: Option<ProspectStatus>,
    ) -> Result<Vec<Prospect>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_prospects"])
            .start_timer();

        let prospects = sqlx::query_as::<_, Prospect>(
            r#"
            SELECT prospect_id, user_id, name, company, email, phone, status, estimated_value, next_follow_up, notes, created_utc, updated_utc
            FROM prospects
            WHERE user_id = $1 AND ($2::varchar IS NULL OR status = $2)
            ORDER BY name
            "#,
        )
        .bind(user_id)
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list prospects: {}", e)))?;

        timer.observe_duration();

        Ok(prospects)
    }

    #[instrument(skip(self, update), fields(user_id = %user_id, prospect_id = %prospect_id))]
    async fn update_prospect(
        &self,
        user_id: Uuid,
        prospect_id: Uuid,
        update: &UpdateProspect,
    ) -> Result<Option<Prospect>, AppError> {
        sqlx::query_as::<_, Prospect>(
            r#"
            UPDATE prospects
            SET name = COALESCE($3, name),
                company = COALESCE($4, company),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                status = COALESCE($7, status),
                estimated_value = COALESCE($8, estimated_value),
                next_follow_up = COALESCE($9, next_follow_up),
                notes = COALESCE($10, notes),
                updated_utc = NOW()
            WHERE user_id = $1 AND prospect_id = $2
            RETURNING prospect_id, user_id, name, company, email, phone, status, estimated_value, next_follow_up, notes, created_utc, updated_utc
            "#,
        )
        .bind(user_id)
        .bind(prospect_id)
        .bind(update.name.as_deref())
        .bind(update.company.as_deref())
        .bind(update.email.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.status.map(|s| s.as_str()))
        .bind(update.estimated_value)
        .bind(update.next_follow_up)
        .bind(update.notes.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update prospect: {}", e)))
    }

    #[instrument(skip(self), fields(user_id = %user_id, prospect_id = %prospect_id))]
    async fn delete_prospect(&self, user_id: Uuid, prospect_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM prospects WHERE user_id = $1 AND prospect_id = $2")
            .bind(user_id)
            .bind(prospect_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete prospect: {}", e))
            })?;
        Ok(result.rows_affected() > 0)
    }

    // -------------------------------------------------------------------------
    // Preferences
    // -------------------------------------------------------------------------

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_preferences(&self, user_id: Uuid) -> Result<Option<Preferences>, AppError> {
        sqlx::query_as::<_, Preferences>(
            r#"
            SELECT user_id, sidebar_color, sidebar_collapsed, currency, updated_utc
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get preferences: {}", e))
        })
    }

    #[instrument(skip(self, preferences), fields(user_id = %preferences.user_id))]
    async fn save_preferences(&self, preferences: &Preferences) -> Result<Preferences, AppError> {
        sqlx::query_as::<_, Preferences>(
            r#"
            INSERT INTO user_preferences (user_id, sidebar_color, sidebar_collapsed, currency, updated_utc)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET sidebar_color = EXCLUDED.sidebar_color,
                sidebar_collapsed = EXCLUDED.sidebar_collapsed,
                currency = EXCLUDED.currency,
                updated_utc = NOW()
            RETURNING user_id, sidebar_color, sidebar_collapsed, currency, updated_utc
            "#,
        )
        .bind(preferences.user_id)
        .bind(&preferences.sidebar_color)
        .bind(preferences.sidebar_collapsed)
        .bind(&preferences.currency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to save preferences: {}", e))
        })
    }
}
