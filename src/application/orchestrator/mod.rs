//! Orchestrator - 会话交互编排
//!
//! 串联 ProviderClient → VoiceCatalog → SynthesisService → ResultStore

#[allow(clippy::module_inception)]
mod orchestrator;
mod state;

pub use orchestrator::{Orchestrator, CLIENT_INIT_WARNING, NO_VOICES_ERROR, SYNTHESIS_SUCCESS};
pub use state::{
    ArtifactInfo, FailureKind, InteractionState, Notice, NoticeLevel, SessionView, VoiceOption,
};
