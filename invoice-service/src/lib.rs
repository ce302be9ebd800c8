//! Invoice administration service.
//!
//! Composes invoices from line items, persists them in SQLite, renders
//! each one as a self-contained RTL HTML document, and delivers it by
//! email on request. An optional bridge to the shop's product catalog
//! feeds line-item prefill.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
