pub mod error;
pub mod pipeline;
pub mod rebuild;
pub mod sources;
pub mod traits;
pub mod validate;

pub use error::{IngestError, Result};
pub use pipeline::Pipeline;
pub use traits::{RawResult, ResultsProvider};
pub use validate::{Issue, IssueKind};

// Re-export the HTTP provider implementation.
pub use sources::jolpica::JolpicaClient;
