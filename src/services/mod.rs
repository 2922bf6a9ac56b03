pub mod collection;
pub mod consume_service;
pub mod control_service;
pub mod create_service;
pub mod error;
pub mod grade_service;
pub mod policy;
pub mod testrun_service;

pub use consume_service::ConsumeService;
pub use control_service::ControlService;
pub use create_service::CreateService;
pub use error::ServiceError;
pub use grade_service::GradeService;
pub use policy::{AccessPolicy, RoleRule, RoleSet};
pub use testrun_service::TestRunService;
