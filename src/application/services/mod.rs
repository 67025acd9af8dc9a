//! Pipeline Services
//!
//! 客户端缓存、音色目录、文本合成

mod provider_client;
mod synthesis;
mod voice_catalog;

pub use provider_client::{ProviderClientService, DEFAULT_REGION};
pub use synthesis::SynthesisService;
pub use voice_catalog::{build_catalog, VoiceCatalogService};
