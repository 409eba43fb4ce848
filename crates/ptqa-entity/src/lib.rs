//! # ptqa-entity
//!
//! Domain entity models for the PTQA finance dashboard. Every struct in
//! this crate represents a row of a remote collection or a domain value
//! object. All entities derive `Debug`, `Clone`, `Serialize` and
//! `Deserialize`; the row shapes tolerate the loosely-typed JSON the
//! hosted backend returns (string amounts, numeric ids, missing columns).

pub mod audit;
pub mod budget;
pub mod finance;
pub mod money;
pub mod notification;
pub mod student;
pub mod user;
