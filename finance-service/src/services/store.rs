//! Storage seam for finance rows.
//!
//! Every method is scoped to a user; rows belonging to someone else behave
//! exactly like rows that do not exist.

use async_trait::async_trait;
use chrono::NaiveDate;
use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{
    Account, Budget, Category, CreateAccount, CreateCategory, CreateInvoice, CreateProspect,
    CreateTransaction, Invoice, ListInvoicesFilter, ListTransactionsFilter, Month, Preferences,
    Prospect, ProspectStatus, Transaction, UpdateAccount, UpdateProspect, UpsertBudget,
};

#[async_trait]
pub trait FinanceStore: Send + Sync {
    async fn health_check(&self) -> Result<(), AppError>;

    // Accounts

    async fn create_account(&self, input: &CreateAccount) -> Result<Account, AppError>;
    async fn get_account(&self, user_id: Uuid, account_id: Uuid)
        -> Result<Option<Account>, AppError>;
    async fn list_accounts(&self, user_id: Uuid, active_only: bool)
        -> Result<Vec<Account>, AppError>;
    async fn update_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        update: &UpdateAccount,
    ) -> Result<Option<Account>, AppError>;

    // Categories

    /// Fails with `Conflict` when the user already has a category of that name.
    async fn create_category(&self, input: &CreateCategory) -> Result<Category, AppError>;
    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<Category>, AppError>;
    /// Transactions keep existing but lose their category; the category's
    /// budgets are removed.
    async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> Result<bool, AppError>;

    // Transactions

    /// Records the transaction and applies its balance effect to the linked
    /// account atomically. Unknown account or category is a `BadRequest`.
    async fn create_transaction(&self, input: &CreateTransaction)
        -> Result<Transaction, AppError>;
    async fn get_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, AppError>;
    /// Newest first.
    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &ListTransactionsFilter,
    ) -> Result<Vec<Transaction>, AppError>;
    /// Removes the transaction and reverses its balance effect.
    async fn delete_transaction(&self, user_id: Uuid, transaction_id: Uuid)
        -> Result<bool, AppError>;

    // Invoices

    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError>;
    async fn get_invoice(&self, user_id: Uuid, invoice_id: Uuid)
        -> Result<Option<Invoice>, AppError>;
    async fn list_invoices(
        &self,
        user_id: Uuid,
        filter: &ListInvoicesFilter,
    ) -> Result<Vec<Invoice>, AppError>;
    /// `Conflict` if the invoice is already paid.
    async fn mark_invoice_paid(
        &self,
        user_id: Uuid,
        invoice_id: Uuid,
        paid_date: NaiveDate,
    ) -> Result<Option<Invoice>, AppError>;

    // Budgets

    async fn upsert_budget(&self, input: &UpsertBudget) -> Result<Budget, AppError>;
    async fn list_budgets(&self, user_id: Uuid, month: Month) -> Result<Vec<Budget>, AppError>;
    async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> Result<bool, AppError>;

    // Prospects

    async fn create_prospect(&self, input: &CreateProspect) -> Result<Prospect, AppError>;
    async fn get_prospect(&self, user_id: Uuid, prospect_id: Uuid)
        -> Result<Option<Prospect>, AppError>;
    async fn list_prospects(
        &self,
        user_id: Uuid,
        status: Option<ProspectStatus>,
    ) -> Result<Vec<Prospect>, AppError>;
    async fn update_prospect(
        &self,
        user_id: Uuid,
        prospect_id: Uuid,
        update: &UpdateProspect,
    ) -> Result<Option<Prospect>, AppError>;
    async fn delete_prospect(&self, user_id: Uuid, prospect_id: Uuid) -> Result<bool, AppError>;

    // Preferences

    async fn get_preferences(&self, user_id: Uuid) -> Result<Option<Preferences>, AppError>;
    async fn save_preferences(&self, preferences: &Preferences) -> Result<Preferences, AppError>;
}

pub(crate) fn unknown_account(account_id: Uuid) -> AppError {
    AppError::BadRequest(anyhow::anyhow!("Account {} does not exist", account_id))
}

pub(crate) fn balance_out_of_range(account_id: Uuid) -> AppError {
    AppError::BadRequest(anyhow::anyhow!(
        "Transaction would move the balance of account {} out of range",
        account_id
    ))
}

pub(crate) fn unknown_category(category_id: Uuid) -> AppError {
    AppError::BadRequest(anyhow::anyhow!("Category {} does not exist", category_id))
}

pub(crate) fn unknown_prospect(prospect_id: Uuid) -> AppError {
    AppError::BadRequest(anyhow::anyhow!("Prospect {} does not exist", prospect_id))
}

pub(crate) fn already_paid(invoice_id: Uuid) -> AppError {
    AppError::Conflict(anyhow::anyhow!("Invoice {} is already paid", invoice_id))
}

pub(crate) fn duplicate_category(name: &str) -> AppError {
    AppError::Conflict(anyhow::anyhow!("Category '{}' already exists", name))
}
