//! Orchestrator - 每次用户交互的完整处理流程
//!
//! 一次交互持有会话锁直到返回，同一会话的请求排队执行。
//! 流水线错误在这里转为提示和状态迁移，只有调用方输入错误才返回 ApplicationError

use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use super::state::{FailureKind, InteractionState, Notice, SessionView, VoiceOption};
use crate::application::commands::{
    ChangeRegion, ClearArtifact, CloseSession, DismissWelcome, OpenSession, RenderSession, RetrySession,
    SelectVoice, SubmitSynthesis,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    ClientHandle, ProviderError, SessionState, SessionStorePort, SpeechClientFactoryPort,
};
use crate::application::queries::{GetArtifact, ListVoices};
use crate::application::services::{ProviderClientService, SynthesisService, VoiceCatalogService};
use crate::domain::synthesis::{AudioArtifact, SynthesisTextError};
use crate::domain::voice::{VoiceError, VoiceId};

pub const CLIENT_INIT_WARNING: &str =
    "AWS Configuration missing or invalid. Please check your .env file or AWS credentials.";
pub const NO_VOICES_ERROR: &str = "No voices found. Check your AWS connection and Region.";
pub const SYNTHESIS_SUCCESS: &str = "Audio generated successfully!";

fn catalog_error_message(error: &ProviderError) -> String {
    match error {
        ProviderError::Unexpected(_) => format!("Unexpected error while fetching voices: {}", error),
        _ => format!("Error fetching voices from AWS: {}", error),
    }
}

fn synthesis_error_message(error: &ProviderError) -> String {
    match error {
        ProviderError::Unexpected(_) => {
            format!("An unexpected error occurred during synthesis: {}", error)
        }
        _ => format!("AWS Polly Synthesis Error: {}", error),
    }
}

pub struct Orchestrator {
    sessions: Arc<dyn SessionStorePort>,
    clients: ProviderClientService,
    catalog: VoiceCatalogService,
    synthesis: SynthesisService,
}

impl Orchestrator {
    pub fn new(
        sessions: Arc<dyn SessionStorePort>,
        factory: Arc<dyn SpeechClientFactoryPort>,
        default_region: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            clients: ProviderClientService::new(factory, default_region),
            catalog: VoiceCatalogService::new(),
            synthesis: SynthesisService::new(),
        }
    }

    pub fn default_region(&self) -> &str {
        self.clients.default_region()
    }

    /// 获取会话并加锁，同时刷新活动时间
    async fn lock(&self, session_id: &str) -> Result<OwnedMutexGuard<SessionState>, ApplicationError> {
        let handle = self.sessions.get(session_id)?;
        self.sessions.touch(session_id);
        Ok(handle.lock_owned().await)
    }

    /// 进入 Failed，原因在之后每次渲染时重复展示
    fn fail(state: &mut SessionState, kind: FailureKind, message: &str) {
        state.interaction = InteractionState::Failed(kind);
        state.failure_message = Some(message.to_string());
        state.notices.push(Self::failure_notice(kind, message));
    }

    fn failure_notice(kind: FailureKind, message: &str) -> Notice {
        match kind {
            FailureKind::Client => Notice::warning(message),
            FailureKind::Catalog => Notice::error(message),
        }
    }

    /// 确保客户端和音色目录就绪
    ///
    /// 返回 None 表示会话处于 Failed，本次交互只能渲染
    async fn prepare(&self, state: &mut SessionState) -> Option<ClientHandle> {
        if let InteractionState::Failed(kind) = state.interaction {
            if let Some(message) = &state.failure_message {
                let notice = Self::failure_notice(kind, message);
                state.notices.push(notice);
            }
            return None;
        }

        let region = state.region.clone();
        let client = match self.clients.get_client(state, region.as_deref()).await {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(session_id = %state.id, error = %e, "Provider client unavailable");
                state.notices.push(Notice::error(e.to_string()));
                Self::fail(state, FailureKind::Client, CLIENT_INIT_WARNING);
                return None;
            }
        };

        if state.interaction == InteractionState::Idle {
            state.interaction = InteractionState::VoicesLoading;
        }

        match self.catalog.list_voices(state, &client).await {
            Ok(voices) => {
                let Some(first) = voices.first() else {
                    tracing::warn!(session_id = %state.id, "Voice catalog is empty");
                    Self::fail(state, FailureKind::Catalog, NO_VOICES_ERROR);
                    return None;
                };

                let selection_valid = state
                    .selected_voice
                    .as_ref()
                    .is_some_and(|id| voices.iter().any(|v| v.id() == id));
                if !selection_valid {
                    state.selected_voice = Some(first.id().clone());
                }

                if !state.interaction.is_ready() {
                    state.interaction = if state.results.is_empty() {
                        InteractionState::VoicesReady
                    } else {
                        InteractionState::ArtifactReady
                    };
                }
                Some(client)
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %state.id,
                    error = %e,
                    kind = e.kind(),
                    "Failed to fetch voice catalog"
                );
                state.notices.push(Notice::error(catalog_error_message(&e)));
                Self::fail(state, FailureKind::Catalog, NO_VOICES_ERROR);
                None
            }
        }
    }

    /// 校验音色在当前目录中
    fn resolve_voice(state: &SessionState, voice_id: &str) -> Result<VoiceId, ApplicationError> {
        let voice_id = VoiceId::new(voice_id).map_err(|e| ApplicationError::validation(e.to_string()))?;
        let in_catalog = state
            .voice_catalog
            .as_ref()
            .is_some_and(|catalog| catalog.contains(&voice_id));
        if !in_catalog {
            return Err(ApplicationError::validation(
                VoiceError::NotInCatalog(voice_id.as_str().to_string()).to_string(),
            ));
        }
        Ok(voice_id)
    }

    pub async fn open_session(&self, cmd: OpenSession) -> Result<SessionView, ApplicationError> {
        let mut state = SessionState::new();
        state.region = cmd.region.filter(|r| !r.trim().is_empty());
        let session_id = self.sessions.create(state)?;

        tracing::info!(session_id = %session_id, "Session opened");

        self.render(RenderSession { session_id }).await
    }

    pub async fn render(&self, cmd: RenderSession) -> Result<SessionView, ApplicationError> {
        let mut state = self.lock(&cmd.session_id).await?;
        state.notices.clear();
        self.prepare(&mut state).await;
        Ok(SessionView::from_state(&state))
    }

    pub async fn dismiss_welcome(&self, cmd: DismissWelcome) -> Result<SessionView, ApplicationError> {
        let mut state = self.lock(&cmd.session_id).await?;
        state.notices.clear();
        state.has_shown_welcome = true;
        self.prepare(&mut state).await;
        Ok(SessionView::from_state(&state))
    }

    /// 手动重试：丢弃客户端和目录缓存，从 Idle 重新走一遍
    pub async fn retry(&self, cmd: RetrySession) -> Result<SessionView, ApplicationError> {
        let mut state = self.lock(&cmd.session_id).await?;
        state.notices.clear();

        let previous = state.interaction;
        state.drop_client();
        state.failure_message = None;
        state.interaction = InteractionState::Idle;

        tracing::info!(session_id = %state.id, previous_state = ?previous, "Session retry requested");

        self.prepare(&mut state).await;
        Ok(SessionView::from_state(&state))
    }

    /// 切换区域
    ///
    /// 下一次 prepare 时旧客户端和目录被丢弃；Failed 状态一并清除，新区域可能已修复失败原因
    pub async fn change_region(&self, cmd: ChangeRegion) -> Result<SessionView, ApplicationError> {
        let mut state = self.lock(&cmd.session_id).await?;
        state.notices.clear();

        let region = cmd.region.filter(|r| !r.trim().is_empty());
        if region != state.region {
            tracing::info!(
                session_id = %state.id,
                old_region = ?state.region,
                new_region = ?region,
                "Session region changed"
            );
            state.region = region;
            if matches!(state.interaction, InteractionState::Failed(_)) {
                state.failure_message = None;
                state.interaction = InteractionState::Idle;
            }
        }

        self.prepare(&mut state).await;
        Ok(SessionView::from_state(&state))
    }

    pub async fn select_voice(&self, cmd: SelectVoice) -> Result<SessionView, ApplicationError> {
        let mut state = self.lock(&cmd.session_id).await?;
        state.notices.clear();

        if self.prepare(&mut state).await.is_none() {
            return Ok(SessionView::from_state(&state));
        }

        let voice_id = Self::resolve_voice(&state, &cmd.voice_id)?;
        tracing::debug!(session_id = %state.id, voice_id = %voice_id, "Voice selected");
        state.selected_voice = Some(voice_id);

        Ok(SessionView::from_state(&state))
    }

    /// 提交合成
    ///
    /// 失败时回到 VoicesReady，已有的音频产物保持不变
    pub async fn submit(&self, cmd: SubmitSynthesis) -> Result<SessionView, ApplicationError> {
        let mut state = self.lock(&cmd.session_id).await?;
        state.notices.clear();

        let Some(client) = self.prepare(&mut state).await else {
            return Ok(SessionView::from_state(&state));
        };

        if cmd.text.trim().is_empty() {
            state
                .notices
                .push(Notice::warning(SynthesisTextError::Empty.to_string()));
            return Ok(SessionView::from_state(&state));
        }

        let voice_id = match cmd.voice_id.as_deref().filter(|v| !v.trim().is_empty()) {
            Some(id) => {
                let voice_id = Self::resolve_voice(&state, id)?;
                state.selected_voice = Some(voice_id.clone());
                voice_id
            }
            None => state
                .selected_voice
                .clone()
                .ok_or_else(|| ApplicationError::invalid_state("No voice selected"))?,
        };

        let previous = state.interaction;
        state.interaction = InteractionState::Synthesizing;

        match self.synthesis.synthesize(&client, &cmd.text, &voice_id).await {
            Ok(artifact) => {
                tracing::info!(
                    session_id = %state.id,
                    voice_id = %voice_id,
                    audio_size = artifact.len(),
                    "Artifact stored"
                );
                state.results.set(artifact);
                state.interaction = InteractionState::ArtifactReady;
                state.notices.push(Notice::success(SYNTHESIS_SUCCESS));
            }
            Err(ApplicationError::ValidationError(message)) => {
                state.interaction = previous;
                state.notices.push(Notice::warning(message));
            }
            Err(ApplicationError::Provider(e)) => {
                tracing::warn!(
                    session_id = %state.id,
                    voice_id = %voice_id,
                    error = %e,
                    kind = e.kind(),
                    "Synthesis failed"
                );
                state.interaction = InteractionState::VoicesReady;
                state.notices.push(Notice::error(synthesis_error_message(&e)));
            }
            Err(other) => {
                state.interaction = previous;
                return Err(other);
            }
        }

        Ok(SessionView::from_state(&state))
    }

    pub async fn clear_artifact(&self, cmd: ClearArtifact) -> Result<SessionView, ApplicationError> {
        let mut state = self.lock(&cmd.session_id).await?;
        state.notices.clear();

        state.results.clear();
        if state.interaction == InteractionState::ArtifactReady {
            state.interaction = InteractionState::VoicesReady;
        }
        tracing::debug!(session_id = %state.id, "Artifact cleared");

        self.prepare(&mut state).await;
        Ok(SessionView::from_state(&state))
    }

    pub async fn list_voices(&self, query: ListVoices) -> Result<Vec<VoiceOption>, ApplicationError> {
        let mut state = self.lock(&query.session_id).await?;
        state.notices.clear();
        self.prepare(&mut state).await;

        Ok(state
            .voice_catalog
            .as_ref()
            .map(|catalog| catalog.voices.iter().map(VoiceOption::from).collect())
            .unwrap_or_default())
    }

    /// 读取当前音频产物，不修改任何状态
    pub async fn artifact(&self, query: GetArtifact) -> Result<AudioArtifact, ApplicationError> {
        let state = self.lock(&query.session_id).await?;
        state
            .results
            .get()
            .cloned()
            .ok_or_else(|| ApplicationError::not_found("Audio", &query.session_id))
    }

    pub async fn close_session(&self, cmd: CloseSession) -> Result<(), ApplicationError> {
        self.sessions.close(&cmd.session_id)?;
        tracing::info!(session_id = %cmd.session_id, "Session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::MAX_TEXT_CHARS;
    use crate::infrastructure::adapters::{
        provider_voice, FakeClientFactory, FakeProviderConfig, FakeSpeechProvider,
    };
    use crate::infrastructure::memory::InMemorySessionStore;
    use crate::application::orchestrator::NoticeLevel;

    struct Fixture {
        factory: Arc<FakeClientFactory>,
        provider: Arc<FakeSpeechProvider>,
        orchestrator: Orchestrator,
    }

    fn fixture_with(provider: FakeSpeechProvider) -> Fixture {
        let provider = Arc::new(provider);
        let factory = Arc::new(FakeClientFactory::new(provider.clone()));
        let orchestrator = Orchestrator::new(
            Arc::new(InMemorySessionStore::new()),
            factory.clone(),
            "us-east-1",
        );
        Fixture {
            factory,
            provider,
            orchestrator,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(FakeSpeechProvider::with_defaults())
    }

    async fn open(f: &Fixture) -> SessionView {
        f.orchestrator
            .open_session(OpenSession::default())
            .await
            .unwrap()
    }

    async fn submit(f: &Fixture, session_id: &str, text: &str) -> SessionView {
        f.orchestrator
            .submit(SubmitSynthesis {
                session_id: session_id.to_string(),
                text: text.to_string(),
                voice_id: Some("Joanna".to_string()),
            })
            .await
            .unwrap()
    }

    fn messages(view: &SessionView) -> Vec<&str> {
        view.notices.iter().map(|n| n.message.as_str()).collect()
    }

    #[tokio::test]
    async fn test_open_session_loads_catalog() {
        let f = fixture();
        let view = open(&f).await;

        assert_eq!(view.state, InteractionState::VoicesReady);
        let ids: Vec<&str> = view.voices.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["Amy", "Brian", "Joanna", "Matthew"]);
        assert_eq!(view.selected_voice_id.as_deref(), Some("Amy"));
        assert!(view.show_welcome);
        assert!(view.can_submit);
        assert!(view.artifact.is_none());
    }

    #[tokio::test]
    async fn test_rerender_uses_cached_client_and_catalog() {
        let f = fixture();
        let view = open(&f).await;

        for _ in 0..3 {
            f.orchestrator
                .render(RenderSession {
                    session_id: view.session_id.clone(),
                })
                .await
                .unwrap();
        }

        assert_eq!(f.factory.connect_calls(), 1);
        assert_eq!(f.provider.describe_calls(), 1);
    }

    #[tokio::test]
    async fn test_scenario_two_voices_ordered() {
        let f = fixture_with(FakeSpeechProvider::with_voices(vec![
            provider_voice("Joanna", "en-US", "Female"),
            provider_voice("Brian", "en-GB", "Male"),
        ]));
        let view = open(&f).await;

        let labels: Vec<&str> = view.voices.iter().map(|v| v.label.as_str()).collect();
        assert_eq!(labels, vec!["Brian (en-GB - Male)", "Joanna (en-US - Female)"]);
    }

    #[tokio::test]
    async fn test_empty_text_does_not_synthesize() {
        let f = fixture();
        let session = open(&f).await.session_id;

        for text in ["", "   \n\t"] {
            let view = submit(&f, &session, text).await;
            assert_eq!(view.state, InteractionState::VoicesReady);
            assert_eq!(messages(&view), vec!["Please enter some text."]);
            assert_eq!(view.notices[0].level, NoticeLevel::Warning);
        }
        assert_eq!(f.provider.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn test_overlong_text_does_not_synthesize() {
        let f = fixture();
        let session = open(&f).await.session_id;

        let view = submit(&f, &session, &"x".repeat(MAX_TEXT_CHARS + 1)).await;
        assert_eq!(view.state, InteractionState::VoicesReady);
        assert_eq!(view.notices[0].level, NoticeLevel::Warning);
        assert_eq!(f.provider.synthesize_calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_synthesis_persists_across_interactions() {
        let f = fixture();
        let session = open(&f).await.session_id;

        let view = submit(&f, &session, "Hello world").await;
        assert_eq!(view.state, InteractionState::ArtifactReady);
        assert_eq!(messages(&view), vec!["Audio generated successfully!"]);
        assert_eq!(view.selected_voice_id.as_deref(), Some("Joanna"));
        let artifact = view.artifact.unwrap();
        assert!(artifact.size_bytes > 0);
        assert_eq!(artifact.mime_type, "audio/mp3");

        let view = f
            .orchestrator
            .select_voice(SelectVoice {
                session_id: session.clone(),
                voice_id: "Matthew".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(view.state, InteractionState::ArtifactReady);
        assert_eq!(view.artifact.unwrap().voice_id, "Joanna");
        assert!(view.notices.is_empty());
        assert_eq!(f.provider.synthesize_calls(), 1);

        let first = f
            .orchestrator
            .artifact(GetArtifact {
                session_id: session.clone(),
            })
            .await
            .unwrap();
        let second = f
            .orchestrator
            .artifact(GetArtifact { session_id: session })
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_throttling_returns_to_voices_ready_and_keeps_artifact() {
        let f = fixture();
        let session = open(&f).await.session_id;
        let before = submit(&f, &session, "First").await.artifact.unwrap();

        f.provider.fail_synthesis(Some(ProviderError::Transport(
            "ThrottlingException: Rate exceeded".to_string(),
        )));
        let view = submit(&f, &session, "Second").await;

        assert_eq!(view.state, InteractionState::VoicesReady);
        assert_eq!(view.artifact.unwrap(), before);
        assert_eq!(view.notices[0].level, NoticeLevel::Error);
        assert_eq!(
            view.notices[0].message,
            "AWS Polly Synthesis Error: ThrottlingException: Rate exceeded"
        );

        f.provider.fail_synthesis(None);
        let view = submit(&f, &session, "Third").await;
        assert_eq!(view.state, InteractionState::ArtifactReady);
        assert_eq!(f.provider.synthesize_calls(), 3);
    }

    #[tokio::test]
    async fn test_unexpected_synthesis_error_message() {
        let f = fixture();
        let session = open(&f).await.session_id;
        f.provider
            .fail_synthesis(Some(ProviderError::Unexpected("bad payload".to_string())));

        let view = submit(&f, &session, "Hello").await;
        assert_eq!(view.state, InteractionState::VoicesReady);
        assert_eq!(
            messages(&view),
            vec!["An unexpected error occurred during synthesis: bad payload"]
        );
    }

    #[tokio::test]
    async fn test_client_init_failure_is_sticky_until_retry() {
        let f = fixture();
        f.factory.fail_connect(Some("invalid credentials"));

        let view = open(&f).await;
        assert_eq!(view.state, InteractionState::Failed(FailureKind::Client));
        assert!(messages(&view).contains(&CLIENT_INIT_WARNING));
        assert!(!view.can_submit);

        f.factory.fail_connect(None);
        let view = f
            .orchestrator
            .render(RenderSession {
                session_id: view.session_id.clone(),
            })
            .await
            .unwrap();
        assert_eq!(view.state, InteractionState::Failed(FailureKind::Client));
        assert_eq!(messages(&view), vec![CLIENT_INIT_WARNING]);
        assert_eq!(f.factory.connect_calls(), 1);

        let view = f
            .orchestrator
            .retry(RetrySession {
                session_id: view.session_id,
            })
            .await
            .unwrap();
        assert_eq!(view.state, InteractionState::VoicesReady);
        assert!(view.notices.is_empty());
        assert_eq!(f.factory.connect_calls(), 2);
    }

    #[tokio::test]
    async fn test_catalog_failure_reports_both_messages() {
        let f = fixture();
        f.provider.fail_describe(Some(ProviderError::Transport(
            "AccessDeniedException".to_string(),
        )));

        let view = open(&f).await;
        assert_eq!(view.state, InteractionState::Failed(FailureKind::Catalog));
        assert_eq!(
            messages(&view),
            vec![
                "Error fetching voices from AWS: AccessDeniedException",
                NO_VOICES_ERROR
            ]
        );

        let submitted = submit(&f, &view.session_id, "Hello").await;
        assert_eq!(submitted.state, InteractionState::Failed(FailureKind::Catalog));
        assert_eq!(f.provider.synthesize_calls(), 0);
        assert_eq!(f.provider.describe_calls(), 1);

        f.provider.fail_describe(None);
        let view = f
            .orchestrator
            .retry(RetrySession {
                session_id: view.session_id,
            })
            .await
            .unwrap();
        assert_eq!(view.state, InteractionState::VoicesReady);
        assert_eq!(view.voices.len(), 4);
    }

    #[tokio::test]
    async fn test_empty_catalog_fails() {
        let f = fixture_with(FakeSpeechProvider::with_voices(vec![provider_voice(
            "Lea", "fr-FR", "Female",
        )]));

        let view = open(&f).await;
        assert_eq!(view.state, InteractionState::Failed(FailureKind::Catalog));
        assert_eq!(messages(&view), vec![NO_VOICES_ERROR]);
    }

    #[tokio::test]
    async fn test_select_voice_outside_catalog_rejected() {
        let f = fixture();
        let session = open(&f).await.session_id;

        let result = f
            .orchestrator
            .select_voice(SelectVoice {
                session_id: session,
                voice_id: "Lea".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_dismiss_welcome() {
        let f = fixture();
        let session = open(&f).await.session_id;

        let view = f
            .orchestrator
            .dismiss_welcome(DismissWelcome {
                session_id: session.clone(),
            })
            .await
            .unwrap();
        assert!(!view.show_welcome);

        let view = f
            .orchestrator
            .render(RenderSession { session_id: session })
            .await
            .unwrap();
        assert!(!view.show_welcome);
    }

    #[tokio::test]
    async fn test_clear_artifact() {
        let f = fixture();
        let session = open(&f).await.session_id;
        submit(&f, &session, "Hello").await;

        let view = f
            .orchestrator
            .clear_artifact(ClearArtifact {
                session_id: session.clone(),
            })
            .await
            .unwrap();
        assert_eq!(view.state, InteractionState::VoicesReady);
        assert!(view.artifact.is_none());

        let result = f
            .orchestrator
            .artifact(GetArtifact { session_id: session })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_voices_returns_labels() {
        let f = fixture();
        let session = open(&f).await.session_id;

        let voices = f
            .orchestrator
            .list_voices(ListVoices { session_id: session })
            .await
            .unwrap();
        assert_eq!(voices[0].label, "Amy (en-GB - Female)");
        assert_eq!(voices.len(), 4);
    }

    #[tokio::test]
    async fn test_region_override_per_session() {
        let f = fixture();
        f.orchestrator
            .open_session(OpenSession {
                region: Some("eu-west-2".to_string()),
            })
            .await
            .unwrap();
        open(&f).await;

        assert_eq!(f.factory.connected_regions(), vec!["eu-west-2", "us-east-1"]);
    }

    #[tokio::test]
    async fn test_closed_session_not_found() {
        let f = fixture();
        let session = open(&f).await.session_id;

        f.orchestrator
            .close_session(CloseSession {
                session_id: session.clone(),
            })
            .await
            .unwrap();

        let result = f
            .orchestrator
            .render(RenderSession { session_id: session })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }

    fn slow_fixture(latency_ms: u64) -> (Arc<FakeSpeechProvider>, Arc<Orchestrator>) {
        let provider = Arc::new(FakeSpeechProvider::new(FakeProviderConfig {
            latency_ms,
            ..Default::default()
        }));
        let factory = Arc::new(FakeClientFactory::new(provider.clone()));
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(InMemorySessionStore::new()),
            factory,
            "us-east-1",
        ));
        (provider, orchestrator)
    }

    async fn spawn_submits(
        orchestrator: &Arc<Orchestrator>,
        session_ids: &[String],
    ) -> Vec<SessionView> {
        let handles: Vec<_> = session_ids
            .iter()
            .map(|session_id| {
                let orchestrator = orchestrator.clone();
                let cmd = SubmitSynthesis {
                    session_id: session_id.clone(),
                    text: "Hello".to_string(),
                    voice_id: None,
                };
                tokio::spawn(async move { orchestrator.submit(cmd).await })
            })
            .collect();

        let mut views = Vec::new();
        for handle in handles {
            views.push(handle.await.unwrap().unwrap());
        }
        views
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_session_submits_run_one_at_a_time() {
        let (provider, orchestrator) = slow_fixture(100);
        let session = orchestrator
            .open_session(OpenSession::default())
            .await
            .unwrap()
            .session_id;

        let started = std::time::Instant::now();
        let sessions = [session.clone(), session.clone(), session];
        let views = spawn_submits(&orchestrator, &sessions).await;

        assert!(started.elapsed() >= std::time::Duration::from_millis(300));
        assert_eq!(provider.synthesize_calls(), 3);
        assert_eq!(provider.max_synthesis_in_flight(), 1);
        assert!(views
            .iter()
            .all(|v| v.state == InteractionState::ArtifactReady));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_different_sessions_submit_concurrently() {
        let (provider, orchestrator) = slow_fixture(200);
        let mut sessions = Vec::new();
        for _ in 0..2 {
            let view = orchestrator
                .open_session(OpenSession::default())
                .await
                .unwrap();
            sessions.push(view.session_id);
        }

        spawn_submits(&orchestrator, &sessions).await;

        assert_eq!(provider.synthesize_calls(), 2);
        assert_eq!(provider.max_synthesis_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_change_region_rebuilds_client_and_catalog() {
        let f = fixture();
        let session = open(&f).await.session_id;
        submit(&f, &session, "Hello").await;

        let view = f
            .orchestrator
            .change_region(ChangeRegion {
                session_id: session.clone(),
                region: Some("eu-west-2".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(f.factory.connected_regions(), vec!["us-east-1", "eu-west-2"]);
        assert_eq!(f.provider.describe_calls(), 2);
        assert_eq!(view.state, InteractionState::ArtifactReady);
        assert!(view.artifact.is_some());
        assert_eq!(view.selected_voice_id.as_deref(), Some("Joanna"));

        // 同一区域不重建
        f.orchestrator
            .change_region(ChangeRegion {
                session_id: session,
                region: Some("eu-west-2".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(f.factory.connect_calls(), 2);
    }

    #[tokio::test]
    async fn test_change_region_leaves_failed_state() {
        let f = fixture();
        f.provider.fail_describe(Some(ProviderError::Transport(
            "UnrecognizedClientException".to_string(),
        )));
        let view = open(&f).await;
        assert_eq!(view.state, InteractionState::Failed(FailureKind::Catalog));

        f.provider.fail_describe(None);
        let view = f
            .orchestrator
            .change_region(ChangeRegion {
                session_id: view.session_id,
                region: Some("eu-west-1".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(view.state, InteractionState::VoicesReady);
        assert_eq!(view.voices.len(), 4);
        assert_eq!(f.factory.connected_regions(), vec!["us-east-1", "eu-west-1"]);
    }
}
