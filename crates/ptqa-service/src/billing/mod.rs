//! Guardian messaging for student bills.

pub mod whatsapp;

pub use whatsapp::{BillingMessenger, WhatsAppMessage, normalize_phone, wa_link};
