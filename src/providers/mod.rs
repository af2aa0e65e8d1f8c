//! Third-party recipe providers
//!
//! Two providers feed the importer:
//!
//! - [`SearchClient`]: paginated recipe search. Failures surface to the caller.
//! - [`StepClient`]: cooking-step extraction behind a quota-limited credential
//!   pool. Failures never surface; they degrade to an empty step list.
//!
//! The importer only sees step extraction through the [`StepSource`] trait, so
//! tests and credential-less deployments can plug in [`NoOpStepSource`].

mod credentials;
mod noop;
pub mod search;
mod steps;
mod traits;

pub use credentials::CredentialPool;
pub use noop::NoOpStepSource;
pub use search::SearchClient;
pub use steps::StepClient;
pub use traits::StepSource;
