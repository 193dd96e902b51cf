//! Account-management backend: user records in Postgres and password
//! verification at login.

pub mod accounts;
pub mod app;
pub mod config;
pub mod state;
