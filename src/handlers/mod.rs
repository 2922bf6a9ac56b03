// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT bearer auth under /api/*)
pub mod protected;
pub mod public;
