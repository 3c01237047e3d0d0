//! finance-service: accounts, transactions, budgets, invoices, prospects and
//! monthly dashboards for personal and small-business finances.

pub mod analytics;
pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
