// handlers/public/mod.rs - Public handlers (no authentication required)
pub mod dev_login;
pub mod health;
