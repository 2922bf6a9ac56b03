// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs behind `jwt_auth_middleware` and receives the
// caller's `Principal` and request `Breadcrumb` as extensions.
pub mod config;
pub mod consume;
pub mod control;
pub mod create;
pub mod grade;
pub mod testrun;
pub mod utils;
