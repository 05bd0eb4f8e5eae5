pub mod inventory;
pub mod prompt;
pub mod reconcile;
pub mod search;
pub mod validator;

pub use crate::domain::model::{MatchClaim, ModelResponse, PackageRecord, SearchResponse, SearchResult};
pub use crate::domain::ports::{ConfigProvider, ModelClient};
pub use crate::utils::error::Result;
