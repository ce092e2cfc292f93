//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command lives in its own submodule and returns whether it passed;
//! the binary turns `false` into a non-zero exit code.

pub mod audit;
pub mod export;
pub mod generate;
pub mod output;
pub mod post;
pub mod publish;
pub mod qa;

pub use audit::{execute_audit, AuditOptions};
pub use export::{execute_export, ExportOptions};
pub use generate::{execute_generate, GenerateOptions};
pub use post::{execute_post, PostOptions};
pub use publish::{execute_publish, PublishOptions};
pub use qa::{execute_qa, QaOptions};
