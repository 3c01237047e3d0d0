//! Process-local store for development and tests.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use service_core::error::AppError;
use std::cmp::Reverse;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{
    already_paid, balance_out_of_range, duplicate_category, unknown_account, unknown_category,
    unknown_prospect, FinanceStore,
};
use crate::models::money::adjust_balance;
use crate::models::{
    Account, Budget, Category, CreateAccount, CreateCategory, CreateInvoice, CreateProspect,
    CreateTransaction, Invoice, InvoiceStatus, ListInvoicesFilter, ListTransactionsFilter, Month,
    Preferences, Prospect, ProspectStatus, Transaction, UpdateAccount, UpdateProspect,
    UpsertBudget,
};

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    categories: Vec<Category>,
    transactions: Vec<Transaction>,
    invoices: Vec<Invoice>,
    budgets: Vec<Budget>,
    prospects: Vec<Prospect>,
    preferences: Vec<Preferences>,
}

impl Tables {
    fn account_mut(&mut self, user_id: Uuid, account_id: Uuid) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.user_id == user_id && a.account_id == account_id)
    }

    fn has_category(&self, user_id: Uuid, category_id: Uuid) -> bool {
        self.categories
            .iter()
            .any(|c| c.user_id == user_id && c.category_id == category_id)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FinanceStore for MemoryStore {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn create_account(&self, input: &CreateAccount) -> Result<Account, AppError> {
        let account = Account {
            account_id: Uuid::new_v4(),
            user_id: input.user_id,
            name: input.name.clone(),
            account_type: input.account_type.as_str().to_string(),
            currency: input.currency.clone(),
            opening_balance: input.opening_balance,
            balance: input.opening_balance,
            is_active: true,
            created_utc: Utc::now(),
        };
        self.tables.write().await.accounts.push(account.clone());
        Ok(account)
    }

    async fn get_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
    ) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.user_id == user_id && a.account_id == account_id)
            .cloned())
    }

    async fn list_accounts(
        &self,
        user_id: Uuid,
        active_only: bool,
    ) -> Result<Vec<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id && (!active_only || a.is_active))
            .cloned()
            .collect())
    }

    async fn update_account(
        &self,
        user_id: Uuid,
        account_id: Uuid,
        update: &UpdateAccount,
    ) -> Result<Option<Account>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(account) = tables.account_mut(user_id, account_id) else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            account.name = name.clone();
        }
        if let Some(is_active) = update.is_active {
            account.is_active = is_active;
        }
        Ok(Some(account.clone()))
    }

    async fn create_category(&self, input: &CreateCategory) -> Result<Category, AppError> {
        let mut tables = self.tables.write().await;
        if tables
            .categories
            .iter()
            .any(|c| c.user_id == input.user_id && c.name == input.name)
        {
            return Err(duplicate_category(&input.name));
        }
        let category = Category {
            category_id: Uuid::new_v4(),
            user_id: input.user_id,
            name: input.name.clone(),
            kind: input.kind.as_str().to_string(),
            keywords: input.keywords.clone(),
            color: input.color.clone(),
            created_utc: Utc::now(),
        };
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn list_categories(&self, user_id: Uuid) -> Result<Vec<Category>, AppError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn delete_category(&self, user_id: Uuid, category_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.has_category(user_id, category_id) {
            return Ok(false);
        }
        tables
            .categories
            .retain(|c| !(c.user_id == user_id && c.category_id == category_id));
        tables.budgets.retain(|b| b.category_id != category_id);
        for t in tables
            .transactions
            .iter_mut()
            .filter(|t| t.category_id == Some(category_id))
        {
            t.category_id = None;
        }
        Ok(true)
    }

    async fn create_transaction(
        &self,
        input: &CreateTransaction,
    ) -> Result<Transaction, AppError> {
        let mut tables = self.tables.write().await;
        if let Some(category_id) = input.category_id {
            if !tables.has_category(input.user_id, category_id) {
                return Err(unknown_category(category_id));
            }
        }
        let transaction = Transaction {
            transaction_id: Uuid::new_v4(),
            user_id: input.user_id,
            account_id: input.account_id,
            category_id: input.category_id,
            amount: input.amount,
            transaction_type: input.transaction_type.as_str().to_string(),
            transaction_date: input.transaction_date,
            description: input.description.clone(),
            created_utc: Utc::now(),
        };
        if let Some(account_id) = input.account_id {
            let account = tables
                .account_mut(input.user_id, account_id)
                .ok_or_else(|| unknown_account(account_id))?;
            account.balance = adjust_balance(account.balance, transaction.balance_effect())
                .map_err(|_| balance_out_of_range(account_id))?;
        }
        tables.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn get_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Option<Transaction>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .transactions
            .iter()
            .find(|t| t.user_id == user_id && t.transaction_id == transaction_id)
            .cloned())
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        filter: &ListTransactionsFilter,
    ) -> Result<Vec<Transaction>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Transaction> = tables
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && filter.matches(t))
            .cloned()
            .collect();
        rows.sort_by_key(|t| Reverse((t.transaction_date, t.created_utc)));
        Ok(rows)
    }

    async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let Some(index) = tables
            .transactions
            .iter()
            .position(|t| t.user_id == user_id && t.transaction_id == transaction_id)
        else {
            return Ok(false);
        };
        let (account_id, effect) = {
            let t = &tables.transactions[index];
            (t.account_id, t.balance_effect())
        };
        if let Some(account_id) = account_id {
            if let Some(account) = tables.account_mut(user_id, account_id) {
                account.balance = adjust_balance(account.balance, -effect)
                    .map_err(|_| balance_out_of_range(account_id))?;
            }
        }
        tables.transactions.remove(index);
        Ok(true)
    }

    async fn create_invoice(&self, input: &CreateInvoice) -> Result<Invoice, AppError> {
        let mut tables = self.tables.write().await;
        if let Some(prospect_id) = input.prospect_id {
            if !tables
                .prospects
                .iter()
                .any(|p| p.user_id == input.user_id && p.prospect_id == prospect_id)
            {
                return Err(unknown_prospect(prospect_id));
            }
        }
        let invoice = Invoice {
            invoice_id: Uuid::new_v4(),
            user_id: input.user_id,
            prospect_id: input.prospect_id,
            client_name: input.client_name.clone(),
            invoice_number: input.invoice_number.clone(),
            amount: input.amount,
            status: InvoiceStatus::Pending.as_str().to_string(),
            issue_date: input.issue_date,
            due_date: input.due_date,
            paid_date: None,
            notes: input.notes.clone(),
            created_utc: Utc::now(),
        };
        tables.invoices.push(invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(
        &self,
        user_id: Uuid,
        invoice_id: Uuid,
    ) -> Result<Option<Invoice>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .invoices
            .iter()
            .find(|i| i.user_id == user_id && i.invoice_id == invoice_id)
            .cloned())
    }

    async fn list_invoices(
        &self,
        user_id: Uuid,
        filter: &ListInvoicesFilter,
    ) -> Result<Vec<Invoice>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Invoice> = tables
            .invoices
            .iter()
            .filter(|i| i.user_id == user_id && filter.matches(i))
            .cloned()
            .collect();
        rows.sort_by_key(|i| Reverse((i.issue_date, i.created_utc)));
        Ok(rows)
    }

    async fn mark_invoice_paid(
        &self,
        user_id: Uuid,
        invoice_id: Uuid,
        paid_date: NaiveDate,
    ) -> Result<Option<Invoice>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(invoice) = tables
            .invoices
            .iter_mut()
            .find(|i| i.user_id == user_id && i.invoice_id == invoice_id)
        else {
            return Ok(None);
        };
        if invoice.parsed_status() == InvoiceStatus::Paid {
            return Err(already_paid(invoice_id));
        }
        invoice.status = InvoiceStatus::Paid.as_str().to_string();
        invoice.paid_date = Some(paid_date);
        Ok(Some(invoice.clone()))
    }

    async fn upsert_budget(&self, input: &UpsertBudget) -> Result<Budget, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.has_category(input.user_id, input.category_id) {
            return Err(unknown_category(input.category_id));
        }
        let month = input.month.to_string();
        if let Some(existing) = tables.budgets.iter_mut().find(|b| {
            b.user_id == input.user_id && b.category_id == input.category_id && b.month == month
        }) {
            existing.amount = input.amount;
            return Ok(existing.clone());
        }
        let budget = Budget {
            budget_id: Uuid::new_v4(),
            user_id: input.user_id,
            category_id: input.category_id,
            month,
            amount: input.amount,
            created_utc: Utc::now(),
        };
        tables.budgets.push(budget.clone());
        Ok(budget)
    }

    async fn list_budgets(&self, user_id: Uuid, month: Month) -> Result<Vec<Budget>, AppError> {
        let month = month.to_string();
        let tables = self.tables.read().await;
        Ok(tables
            .budgets
            .iter()
            .filter(|b| b.user_id == user_id && b.month == month)
            .cloned()
            .collect())
    }

    async fn delete_budget(&self, user_id: Uuid, budget_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.budgets.len();
        tables
            .budgets
            .retain(|b| !(b.user_id == user_id && b.budget_id == budget_id));
        Ok(tables.budgets.len() != before)
    }

    async fn create_prospect(&self, input: &CreateProspect) -> Result<Prospect, AppError> {
        let now = Utc::now();
        let prospect = Prospect {
            prospect_id: Uuid::new_v4(),
            user_id: input.user_id,
            name: input.name.clone(),
            company: input.company.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            status: input.status.as_str().to_string(),
            estimated_value: input.estimated_value,
            next_follow_up: input.next_follow_up,
            notes: input.notes.clone(),
            created_utc: now,
            updated_utc: now,
        };
        self.tables.write().await.prospects.push(prospect.clone());
        Ok(prospect)
    }

    async fn get_prospect(
        &self,
        user_id: Uuid,
        prospect_id: Uuid,
    ) -> Result<Option<Prospect>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .prospects
            .iter()
            .find(|p| p.user_id == user_id && p.prospect_id == prospect_id)
            .cloned())
    }

    async fn list_prospects(
        &self,
        user_id: Uuid,
        status: Option<ProspectStatus>,
    ) -> Result<Vec<Prospect>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Prospect> = tables
            .prospects
            .iter()
            .filter(|p| p.user_id == user_id)
            .filter(|p| status.map_or(true, |s| p.status == s.as_str()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_prospect(
        &self,
        user_id: Uuid,
        prospect_id: Uuid,
        update: &UpdateProspect,
    ) -> Result<Option<Prospect>, AppError> {
        let mut tables = self.tables.write().await;
        let Some(prospect) = tables
            .prospects
            .iter_mut()
            .find(|p| p.user_id == user_id && p.prospect_id == prospect_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &update.name {
            prospect.name = name.clone();
        }
        if update.company.is_some() {
            prospect.company = update.company.clone();
        }
        if update.email.is_some() {
            prospect.email = update.email.clone();
        }
        if update.phone.is_some() {
            prospect.phone = update.phone.clone();
        }
        if let Some(status) = update.status {
            prospect.status = status.as_str().to_string();
        }
        if update.estimated_value.is_some() {
            prospect.estimated_value = update.estimated_value;
        }
        if update.next_follow_up.is_some() {
            prospect.next_follow_up = update.next_follow_up;
        }
        if update.notes.is_some() {
            prospect.notes = update.notes.clone();
        }
        prospect.updated_utc = Utc::now();
        Ok(Some(prospect.clone()))
    }

    async fn delete_prospect(&self, user_id: Uuid, prospect_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.prospects.len();
        tables
            .prospects
            .retain(|p| !(p.user_id == user_id && p.prospect_id == prospect_id));
        if tables.prospects.len() == before {
            return Ok(false);
        }
        for invoice in tables
            .invoices
            .iter_mut()
            .filter(|i| i.prospect_id == Some(prospect_id))
        {
            invoice.prospect_id = None;
        }
        Ok(true)
    }

    async fn get_preferences(&self, user_id: Uuid) -> Result<Option<Preferences>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .preferences
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned())
    }

    async fn save_preferences(&self, preferences: &Preferences) -> Result<Preferences, AppError> {
        let mut tables = self.tables.write().await;
        let saved = Preferences {
            updated_utc: Utc::now(),
            ..preferences.clone()
        };
        match tables
            .preferences
            .iter_mut()
            .find(|p| p.user_id == preferences.user_id)
        {
            Some(existing) => *existing = saved.clone(),
            None => tables.preferences.push(saved.clone()),
        }
        Ok(saved)
    }
}
