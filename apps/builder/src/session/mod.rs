//! Session: the state behind one builder screen and the three request flows
//! that write into it.
//!
//! State sits behind `Arc<Mutex<_>>` and is never locked across an await.
//! Flows run on a `SessionHandle`, which only holds a weak reference: a
//! response that lands after the session was closed or dropped is discarded.

pub mod form;
pub mod loading;
pub mod view;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{error, info, warn};

use crate::backend_client::{ResumeBackend, UploadDocument};
use crate::errors::{BackendError, Notice, SessionError};
use crate::models::options::{Region, ResumeType, Tone};
use crate::models::resume::{AtsScore, ResumeResult};

use form::{FormStore, ProfileField};
use loading::LoadingGuard;
pub use loading::{Flow, Loading};
use view::{Entry, SubMode, ViewController};

/// Extensions the file picker offers. Content is never inspected client-side.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    view: ViewController,
    form: FormStore,
    selected_file: Option<PathBuf>,
    result: Option<ResumeResult>,
    ats_score: Option<AtsScore>,
    loading: Loading,
    closed: bool,
}

impl SessionState {
    pub fn view(&self) -> &ViewController {
        &self.view
    }

    pub fn form(&self) -> &FormStore {
        &self.form
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn result(&self) -> Option<&ResumeResult> {
        self.result.as_ref()
    }

    pub fn ats_score(&self) -> Option<AtsScore> {
        self.ats_score
    }

    pub fn loading(&self) -> Loading {
        self.loading
    }
}

/// What a flow did once it got past its preconditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// The response replaced the current result and score.
    Applied,
    /// Nothing to do: optimize without a result, or the session was already closed.
    Skipped,
    /// The response arrived after the session ended and was dropped.
    Discarded,
}

fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_accepted(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Owns the session state. Dropping it (or calling `close`) ends the session.
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    backend: Arc<dyn ResumeBackend>,
}

impl Session {
    pub fn new(backend: Arc<dyn ResumeBackend>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            backend,
        }
    }

    /// A cheap, `'static` handle for running flows on another task.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            state: Arc::downgrade(&self.state),
            backend: Arc::clone(&self.backend),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        lock(&self.state).clone()
    }

    fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut *lock(&self.state))
    }

    pub fn result(&self) -> Option<ResumeResult> {
        lock(&self.state).result.clone()
    }

    pub fn ats_score(&self) -> Option<AtsScore> {
        lock(&self.state).ats_score
    }

    pub fn loading(&self) -> Loading {
        lock(&self.state).loading
    }

    // ── view ──────────────────────────────────────────────────────────────

    pub fn start(&self, entry: Entry) {
        self.update(|s| s.view.start(entry));
    }

    pub fn select_sub_mode(&self, sub_mode: SubMode) {
        self.update(|s| s.view.select(sub_mode));
    }

    // ── form ──────────────────────────────────────────────────────────────

    pub fn set_field(&self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        self.update(|s| s.form.set_field(field, value));
    }

    pub fn set_skill_input(&self, value: impl Into<String>) {
        let value = value.into();
        self.update(|s| s.form.set_skill_input(value));
    }

    pub fn add_skill(&self) -> bool {
        self.update(|s| s.form.add_skill())
    }

    pub fn set_region(&self, region: Region) {
        self.update(|s| s.form.set_region(region));
    }

    pub fn set_resume_type(&self, resume_type: ResumeType) {
        self.update(|s| s.form.set_resume_type(resume_type));
    }

    pub fn set_tone(&self, tone: Tone) {
        self.update(|s| s.form.set_tone(tone));
    }

    // ── upload selection ──────────────────────────────────────────────────

    /// Records the document to upload. Only PDF, DOCX and TXT names pass the
    /// picker; a rejected pick keeps the previous selection.
    pub fn select_file(&self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        let path = path.into();
        if !is_accepted(&path) {
            return Err(SessionError::Precondition(Notice::UnsupportedFile));
        }
        self.update(|s| s.selected_file = Some(path));
        Ok(())
    }

    // ── flows ─────────────────────────────────────────────────────────────

    pub async fn upload(&self) -> Result<FlowOutcome, SessionError> {
        self.handle().upload().await
    }

    pub async fn generate(&self) -> Result<FlowOutcome, SessionError> {
        self.handle().generate().await
    }

    pub async fn optimize(&self) -> Result<FlowOutcome, SessionError> {
        self.handle().optimize().await
    }

    /// Ends the session. Responses still in flight will be discarded.
    pub fn close(&self) {
        self.update(|s| s.closed = true);
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

#[derive(Clone)]
pub struct SessionHandle {
    state: Weak<Mutex<SessionState>>,
    backend: Arc<dyn ResumeBackend>,
}

impl SessionHandle {
    /// Marks `flow` as loading once the session is idle and `prepare` has
    /// produced the request input. `Ok(None)` means there is nothing to send,
    /// and takes precedence over a pending request.
    fn begin<T>(
        &self,
        flow: Flow,
        prepare: impl FnOnce(&SessionState) -> Result<Option<T>, SessionError>,
    ) -> Result<Option<(T, LoadingGuard)>, SessionError> {
        let Some(shared) = self.state.upgrade() else {
            return Ok(None);
        };
        let mut state = lock(&shared);
        if state.closed {
            return Ok(None);
        }
        let prepared = prepare(&*state);
        if matches!(prepared, Ok(None)) {
            return Ok(None);
        }
        if let Some(pending) = state.loading.pending() {
            return Err(SessionError::Busy { pending });
        }
        let Some(input) = prepared? else {
            return Ok(None);
        };
        state.loading = flow.into();
        Ok(Some((input, LoadingGuard::new(self.state.clone(), flow))))
    }

    /// Applies a successful response unless the session has gone away.
    fn complete(&self, flow: Flow, apply: impl FnOnce(&mut SessionState)) -> FlowOutcome {
        let Some(shared) = self.state.upgrade() else {
            warn!(%flow, "Session dropped before response arrived; discarding");
            return FlowOutcome::Discarded;
        };
        let mut state = lock(&shared);
        if state.closed {
            warn!(%flow, "Session closed before response arrived; discarding");
            return FlowOutcome::Discarded;
        }
        apply(&mut *state);
        FlowOutcome::Applied
    }

    fn failed(flow: Flow, source: BackendError) -> SessionError {
        error!(%flow, "Request failed: {source}");
        SessionError::Flow { flow, source }
    }

    /// Sends the selected document for extraction. The upload endpoint does
    /// not score, so the score becomes the flagged placeholder.
    pub async fn upload(&self) -> Result<FlowOutcome, SessionError> {
        let Some((path, _guard)) = self.begin(Flow::Upload, |state| {
            state
                .selected_file
                .clone()
                .map(Some)
                .ok_or(SessionError::Precondition(Notice::FileRequired))
        })?
        else {
            return Ok(FlowOutcome::Skipped);
        };

        info!(file = %path.display(), "Uploading resume for extraction");
        let extracted = self
            .extract(&path)
            .await
            .map_err(|e| Self::failed(Flow::Upload, e))?;

        Ok(self.complete(Flow::Upload, |state| {
            state.result = Some(extracted);
            state.ats_score = Some(AtsScore::upload_placeholder());
        }))
    }

    async fn extract(&self, path: &Path) -> Result<ResumeResult, BackendError> {
        let document = UploadDocument::read(path).await?;
        self.backend.parse_upload(document).await
    }

    /// Generates a resume from the basic profile. Name and email are required.
    pub async fn generate(&self) -> Result<FlowOutcome, SessionError> {
        let Some(((basic, options), _guard)) = self.begin(Flow::Generate, |state| {
            let basic = state.form.profile();
            if !basic.has_identity() {
                return Err(SessionError::Precondition(Notice::IdentityRequired));
            }
            Ok(Some((basic.clone(), *state.form.options())))
        })?
        else {
            return Ok(FlowOutcome::Skipped);
        };

        info!(options = ?options, "Generating resume from basic profile");
        let scored = self
            .backend
            .generate_from_basic(&basic, &options)
            .await
            .map_err(|e| Self::failed(Flow::Generate, e))?;

        Ok(self.complete(Flow::Generate, |state| {
            state.result = Some(scored.resume);
            state.ats_score = Some(scored.ats_score);
        }))
    }

    /// Asks the backend to improve the current result. Without a result
    /// there is nothing to optimize and no request is sent.
    pub async fn optimize(&self) -> Result<FlowOutcome, SessionError> {
        let Some(((resume, options), _guard)) = self.begin(Flow::Optimize, |state| {
            Ok(state
                .result
                .clone()
                .map(|resume| (resume, *state.form.options())))
        })?
        else {
            return Ok(FlowOutcome::Skipped);
        };

        info!(options = ?options, "Optimizing current resume");
        let scored = self
            .backend
            .optimize(&resume, &options)
            .await
            .map_err(|e| Self::failed(Flow::Optimize, e))?;

        Ok(self.complete(Flow::Optimize, |state| {
            state.result = Some(scored.resume);
            state.ats_score = Some(scored.ats_score);
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::backend_client::ScoredResume;
    use crate::models::options::ResumeOptions;
    use crate::models::profile::BasicProfile;

    /// Scripted backend: echoes inputs back, or fails with a 500, or parks
    /// until released.
    #[derive(Default)]
    struct FakeBackend {
        calls: AtomicUsize,
        fail: bool,
        gate: Option<Arc<Notify>>,
    }

    impl FakeBackend {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn gated(gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Default::default()
            }
        }

        async fn enter(&self) -> Result<(), BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if self.fail {
                return Err(BackendError::Status {
                    status: 500,
                    body: "boom".to_string(),
                });
            }
            Ok(())
        }
    }

    fn scored(name: &str, score: f64) -> ScoredResume {
        ScoredResume {
            resume: ResumeResult {
                name: name.to_string(),
                ..Default::default()
            },
            ats_score: AtsScore::from_server(score).unwrap(),
        }
    }

    #[async_trait]
    impl ResumeBackend for FakeBackend {
        async fn parse_upload(
            &self,
            document: UploadDocument,
        ) -> Result<ResumeResult, BackendError> {
            self.enter().await?;
            Ok(ResumeResult {
                name: document.file_name,
                ..Default::default()
            })
        }

        async fn generate_from_basic(
            &self,
            basic: &BasicProfile,
            _options: &ResumeOptions,
        ) -> Result<ScoredResume, BackendError> {
            self.enter().await?;
            Ok(scored(&basic.name, 85.0))
        }

        async fn optimize(
            &self,
            resume: &ResumeResult,
            options: &ResumeOptions,
        ) -> Result<ScoredResume, BackendError> {
            self.enter().await?;
            Ok(scored(&format!("{} ({})", resume.name, options.tone), 91.0))
        }
    }

    fn session_with(backend: FakeBackend) -> (Session, Arc<FakeBackend>) {
        let backend = Arc::new(backend);
        (Session::new(backend.clone()), backend)
    }

    fn fill_identity(session: &Session) {
        session.set_field(ProfileField::Name, "Ada");
        session.set_field(ProfileField::Email, "ada@example.com");
    }

    async fn wait_for_loading(session: &Session, loading: Loading) {
        while session.loading() != loading {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_generate_requires_name_and_email() {
        let (session, backend) = session_with(FakeBackend::default());

        for (name, email) in [("", ""), ("Ada", ""), ("", "ada@example.com")] {
            session.set_field(ProfileField::Name, name);
            session.set_field(ProfileField::Email, email);
            let err = session.generate().await.unwrap_err();
            assert_eq!(err.notice(), Some(Notice::IdentityRequired));
        }

        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(session.result().is_none());
        assert!(session.ats_score().is_none());
        assert!(session.loading().is_idle());
    }

    #[tokio::test]
    async fn test_generate_success_replaces_result_and_score() {
        let (session, _) = session_with(FakeBackend::default());
        fill_identity(&session);

        let outcome = session.generate().await.unwrap();

        assert_eq!(outcome, FlowOutcome::Applied);
        assert_eq!(session.result().unwrap().name, "Ada");
        assert_eq!(session.ats_score().unwrap().value(), 85.0);
        assert!(!session.ats_score().unwrap().is_placeholder());
        assert!(session.loading().is_idle());
    }

    #[tokio::test]
    async fn test_upload_without_file_sends_nothing() {
        let (session, backend) = session_with(FakeBackend::default());

        let err = session.upload().await.unwrap_err();

        assert_eq!(err.notice(), Some(Notice::FileRequired));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(session.loading().is_idle());
    }

    #[tokio::test]
    async fn test_upload_of_unreadable_file_fails_and_keeps_state() {
        let (session, backend) = session_with(FakeBackend::default());
        session.select_file("/no/such/dir/resume.pdf").unwrap();

        let err = session.upload().await.unwrap_err();

        assert_eq!(err.notice(), Some(Notice::UploadFailed));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(session.result().is_none());
        assert!(session.loading().is_idle());
    }

    #[tokio::test]
    async fn test_failed_generate_keeps_previous_result() {
        let (session, _) = session_with(FakeBackend::default());
        fill_identity(&session);
        session.generate().await.unwrap();
        let before = session.result();

        // Same state, failing backend.
        let failing = Session {
            state: Arc::clone(&session.state),
            backend: Arc::new(FakeBackend::failing()),
        };
        let err = failing.generate().await.unwrap_err();

        assert_eq!(err.notice(), Some(Notice::GenerationFailed));
        assert_eq!(session.result(), before);
        assert_eq!(session.ats_score().unwrap().value(), 85.0);
        assert!(session.loading().is_idle());
    }

    #[tokio::test]
    async fn test_optimize_without_result_is_silent_noop() {
        let (session, backend) = session_with(FakeBackend::default());

        let outcome = session.optimize().await.unwrap();

        assert_eq!(outcome, FlowOutcome::Skipped);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert!(session.loading().is_idle());
    }

    #[tokio::test]
    async fn test_optimize_sends_current_result_and_options() {
        let (session, _) = session_with(FakeBackend::default());
        fill_identity(&session);
        session.generate().await.unwrap();
        session.set_tone(Tone::Concise);

        session.optimize().await.unwrap();

        assert_eq!(session.result().unwrap().name, "Ada (Concise)");
        assert_eq!(session.ats_score().unwrap().value(), 91.0);
    }

    #[tokio::test]
    async fn test_sub_mode_switch_keeps_file_and_fields() {
        let (session, _) = session_with(FakeBackend::default());
        session.start(Entry::UploadResume);
        session.select_file("cv.docx").unwrap();
        session.select_sub_mode(SubMode::Basic);
        session.set_field(ProfileField::Phone, "555-0100");
        session.select_sub_mode(SubMode::Upload);
        session.select_sub_mode(SubMode::Basic);

        let state = session.snapshot();
        assert_eq!(state.selected_file(), Some(Path::new("cv.docx")));
        assert_eq!(state.form().profile().phone, "555-0100");
        assert_eq!(state.view().sub_mode(), SubMode::Basic);
    }

    #[test]
    fn test_picker_rejects_other_types() {
        let (session, _) = session_with(FakeBackend::default());
        session.select_file("cv.TXT").unwrap();

        let err = session.select_file("photo.png").unwrap_err();

        assert_eq!(err.notice(), Some(Notice::UnsupportedFile));
        assert_eq!(session.snapshot().selected_file(), Some(Path::new("cv.TXT")));
    }

    #[tokio::test]
    async fn test_second_flow_is_busy_while_first_pending() {
        let gate = Arc::new(Notify::new());
        let (session, _) = session_with(FakeBackend::gated(gate.clone()));
        fill_identity(&session);

        let handle = session.handle();
        let pending = tokio::spawn(async move { handle.generate().await });
        wait_for_loading(&session, Loading::Generate).await;

        session.select_file("cv.pdf").unwrap();
        let err = session.upload().await.unwrap_err();
        assert!(matches!(err, SessionError::Busy { pending: Flow::Generate }));

        // Editing stays available while a request is out.
        session.set_skill_input("Rust");
        assert!(session.add_skill());

        gate.notify_one();
        assert_eq!(pending.await.unwrap().unwrap(), FlowOutcome::Applied);
        assert!(session.loading().is_idle());
    }

    #[tokio::test]
    async fn test_optimize_without_result_is_silent_while_busy() {
        let gate = Arc::new(Notify::new());
        let (session, backend) = session_with(FakeBackend::gated(gate.clone()));
        fill_identity(&session);

        let handle = session.handle();
        let pending = tokio::spawn(async move { handle.generate().await });
        wait_for_loading(&session, Loading::Generate).await;

        assert_eq!(session.optimize().await.unwrap(), FlowOutcome::Skipped);
        assert_eq!(session.loading(), Loading::Generate);

        gate.notify_one();
        assert_eq!(pending.await.unwrap().unwrap(), FlowOutcome::Applied);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_response_after_close_is_discarded() {
        let gate = Arc::new(Notify::new());
        let (session, _) = session_with(FakeBackend::gated(gate.clone()));
        fill_identity(&session);

        let handle = session.handle();
        let pending = tokio::spawn(async move { handle.generate().await });
        wait_for_loading(&session, Loading::Generate).await;
        session.close();
        assert!(session.is_closed());
        gate.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), FlowOutcome::Discarded);
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_response_after_drop_is_discarded() {
        let gate = Arc::new(Notify::new());
        let (session, _) = session_with(FakeBackend::gated(gate.clone()));
        fill_identity(&session);

        let handle = session.handle();
        let pending = tokio::spawn(async move { handle.generate().await });
        wait_for_loading(&session, Loading::Generate).await;
        drop(session);
        gate.notify_one();

        assert_eq!(pending.await.unwrap().unwrap(), FlowOutcome::Discarded);
    }

    #[tokio::test]
    async fn test_cancelled_request_clears_loading() {
        let gate = Arc::new(Notify::new());
        let (session, _) = session_with(FakeBackend::gated(gate));
        fill_identity(&session);

        let handle = session.handle();
        let pending = tokio::spawn(async move { handle.generate().await });
        wait_for_loading(&session, Loading::Generate).await;
        pending.abort();
        assert!(pending.await.unwrap_err().is_cancelled());

        assert!(session.loading().is_idle());
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_closed_session_starts_nothing() {
        let (session, backend) = session_with(FakeBackend::default());
        fill_identity(&session);
        session.close();

        assert_eq!(session.generate().await.unwrap(), FlowOutcome::Skipped);
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }
}
