use bevy::log::{debug, info, warn};
use serde::Serialize;

use super::candidates::{AssetReference, CandidateLocation, CandidatePolicy, LocalOverride};
use super::error::ResolutionError;

/// Monotonic request number. Completions tagged with an older value are stale.
pub type Generation = u64;

/// What the viewer is currently drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderSource {
    Real,
    Fallback,
}

/// Lifecycle of one viewer session as seen by the host.
///
/// A failed override is reported through the error annotation while the
/// state is `Rendering(Fallback)`; it never blocks rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum ViewerState {
    #[default]
    Idle,
    Resolving,
    Rendering(RenderSource),
}

/// Outcome of one load attempt against one candidate.
#[derive(Debug)]
pub enum LoadResult<T> {
    Loaded(T),
    Failed(String),
}

/// A single load the driver should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub generation: Generation,
    pub location: CandidateLocation,
}

/// What the driver does after a request or a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    Attempt(Attempt),
    Synthesize { generation: Generation },
}

/// What the driver does with a finished attempt.
#[derive(Debug)]
pub enum Completion<T> {
    Install {
        generation: Generation,
        location: CandidateLocation,
        model: T,
    },
    Continue(Next),
    /// The attempt belonged to a superseded request; its result was dropped.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PassMode {
    Override,
    Reference,
}

#[derive(Debug)]
struct Pass {
    mode: PassMode,
    candidates: Vec<CandidateLocation>,
    cursor: usize,
}

impl Pass {
    fn current(&self) -> Option<&CandidateLocation> {
        self.candidates.get(self.cursor)
    }
}

/// Display snapshot of the resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolutionStatus {
    pub state: ViewerState,
    pub using_fallback: bool,
    pub trace: String,
    pub error: String,
}

/// Ordered, first-success-wins resolution of one model request at a time.
///
/// The resolver never performs IO. It hands out [`Attempt`]s one by one and
/// is fed their results through [`Resolver::complete`], so candidate loads
/// run strictly in sequence regardless of how the driver schedules them.
#[derive(Debug, Default)]
pub struct Resolver {
    policy: CandidatePolicy,
    generation: Generation,
    state: ViewerState,
    pass: Option<Pass>,
    using_fallback: bool,
    trace: String,
    error: Option<ResolutionError>,
}

impl Resolver {
    pub fn new(policy: CandidatePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub fn state(&self) -> ViewerState {
        self.state
    }

    pub fn using_fallback(&self) -> bool {
        self.using_fallback
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    pub fn error(&self) -> Option<&ResolutionError> {
        self.error.as_ref()
    }

    /// Start a new resolution pass, superseding any pass in flight.
    ///
    /// A local override is the only candidate when present. Without an
    /// override or a reference the procedural model is used straight away.
    pub fn request(
        &mut self,
        reference: Option<&AssetReference>,
        local_override: Option<&LocalOverride>,
    ) -> Next {
        self.generation += 1;
        self.error = None;
        let generation = self.generation;

        if let Some(local) = local_override {
            let location = local.location();
            self.begin_pass(PassMode::Override, vec![location.clone()]);
            self.trace = "Using manually selected file".to_string();
            info!("Resolving local override {} (generation {})", location, generation);
            return Next::Attempt(Attempt {
                generation,
                location,
            });
        }

        self.using_fallback = false;
        let Some(reference) = reference else {
            self.pass = None;
            self.settle_on_fallback("No model reference; showing procedural model");
            info!("No model reference supplied (generation {})", generation);
            return Next::Synthesize { generation };
        };

        let candidates = self.policy.candidates(reference);
        info!(
            "Resolving {} across {} candidate(s) (generation {})",
            reference,
            candidates.len(),
            generation
        );
        self.begin_pass(PassMode::Reference, candidates);
        self.attempt_current()
            .unwrap_or(Next::Synthesize { generation })
    }

    /// Feed back the result of an attempt handed out earlier.
    pub fn complete<T>(&mut self, generation: Generation, result: LoadResult<T>) -> Completion<T> {
        if !self.is_current(generation) {
            debug!(
                "Discarding completion from generation {} (current {})",
                generation, self.generation
            );
            return Completion::Discarded;
        }
        let Some(pass) = self.pass.as_mut() else {
            return Completion::Discarded;
        };
        let Some(location) = pass.current().cloned() else {
            return Completion::Discarded;
        };

        match result {
            LoadResult::Loaded(model) => {
                info!("Success loading model from: {}", location);
                self.pass = None;
                self.state = ViewerState::Rendering(RenderSource::Real);
                self.using_fallback = false;
                self.trace = format!("Loaded from: {location}");
                Completion::Install {
                    generation,
                    location,
                    model,
                }
            }
            LoadResult::Failed(reason) => match pass.mode {
                PassMode::Override => {
                    let error = ResolutionError::OverrideLoadFailed { location, reason };
                    warn!("{}", error);
                    self.pass = None;
                    self.error = Some(error);
                    self.settle_on_fallback("Local file failed; showing procedural model");
                    Completion::Continue(Next::Synthesize { generation })
                }
                PassMode::Reference => {
                    debug!(
                        "{}",
                        ResolutionError::CandidateNotFound {
                            location,
                            reason
                        }
                    );
                    pass.cursor += 1;
                    if let Some(next) = self.attempt_current() {
                        return Completion::Continue(next);
                    }

                    let attempted = self.pass.take().map_or(0, |pass| pass.candidates.len());
                    warn!(
                        "{}; switching to procedural model",
                        ResolutionError::AllCandidatesExhausted { attempted }
                    );
                    self.settle_on_fallback("All candidates failed; showing procedural model");
                    Completion::Continue(Next::Synthesize { generation })
                }
            },
        }
    }

    /// End the session. Safe to call repeatedly; any pass in flight becomes stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = ViewerState::Idle;
        self.pass = None;
        self.using_fallback = false;
        self.trace.clear();
        self.error = None;
    }

    pub fn status(&self) -> ResolutionStatus {
        ResolutionStatus {
            state: self.state,
            using_fallback: self.using_fallback,
            trace: self.trace.clone(),
            error: self
                .error
                .as_ref()
                .filter(|error| error.is_user_visible())
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }

    fn begin_pass(&mut self, mode: PassMode, candidates: Vec<CandidateLocation>) {
        self.state = ViewerState::Resolving;
        self.pass = Some(Pass {
            mode,
            candidates,
            cursor: 0,
        });
    }

    fn attempt_current(&mut self) -> Option<Next> {
        let location = self.pass.as_ref()?.current()?.clone();
        self.trace = format!("Attempting path: {location}");
        Some(Next::Attempt(Attempt {
            generation: self.generation,
            location,
        }))
    }

    fn settle_on_fallback(&mut self, trace: &str) {
        self.state = ViewerState::Rendering(RenderSource::Fallback);
        self.using_fallback = true;
        self.trace = trace.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(raw: &str) -> AssetReference {
        AssetReference::new(raw).unwrap()
    }

    fn expect_attempt(next: Next) -> Attempt {
        match next {
            Next::Attempt(attempt) => attempt,
            other => panic!("expected an attempt, got {other:?}"),
        }
    }

    #[test]
    fn missing_reference_goes_straight_to_fallback() {
        let mut resolver = Resolver::default();

        let next = resolver.request(None, None);

        assert_eq!(next, Next::Synthesize { generation: 1 });
        assert_eq!(
            resolver.state(),
            ViewerState::Rendering(RenderSource::Fallback)
        );
        assert!(resolver.using_fallback());
        assert!(resolver.status().error.is_empty());
    }

    #[test]
    fn exhausting_every_candidate_falls_back_without_an_error() {
        let mut resolver = Resolver::default();
        let mut attempted = Vec::new();

        let mut next = resolver.request(Some(&reference("drone.glb")), None);
        loop {
            match next {
                Next::Attempt(attempt) => {
                    assert_eq!(resolver.state(), ViewerState::Resolving);
                    attempted.push(attempt.location.to_string());
                    match resolver.complete::<()>(
                        attempt.generation,
                        LoadResult::Failed("not found".into()),
                    ) {
                        Completion::Continue(following) => next = following,
                        other => panic!("unexpected completion {other:?}"),
                    }
                }
                Next::Synthesize { generation } => {
                    assert_eq!(generation, resolver.generation());
                    break;
                }
            }
        }

        assert_eq!(attempted.len(), 5);
        assert_eq!(attempted[0], "drone.glb");
        let status = resolver.status();
        assert_eq!(
            status.state,
            ViewerState::Rendering(RenderSource::Fallback)
        );
        assert!(status.using_fallback);
        assert!(status.error.is_empty());
        assert!(status.trace.contains("All candidates failed"));
    }

    #[test]
    fn first_success_wins_and_stops_the_pass() {
        let mut resolver = Resolver::default();
        let first = expect_attempt(resolver.request(Some(&reference("T-001.glb")), None));

        let second = match resolver.complete::<&str>(first.generation, LoadResult::Failed("404".into())) {
            Completion::Continue(next) => expect_attempt(next),
            other => panic!("unexpected completion {other:?}"),
        };
        assert_eq!(second.location.as_str(), "/T-001.glb");
        assert_eq!(resolver.trace(), "Attempting path: /T-001.glb");

        match resolver.complete(second.generation, LoadResult::Loaded("scene")) {
            Completion::Install {
                location, model, ..
            } => {
                assert_eq!(location.as_str(), "/T-001.glb");
                assert_eq!(model, "scene");
            }
            other => panic!("unexpected completion {other:?}"),
        }
        assert_eq!(resolver.state(), ViewerState::Rendering(RenderSource::Real));
        assert!(!resolver.using_fallback());
        assert_eq!(resolver.trace(), "Loaded from: /T-001.glb");

        // The pass is over; late completions change nothing.
        assert!(matches!(
            resolver.complete(second.generation, LoadResult::Loaded("late")),
            Completion::Discarded
        ));
    }

    #[test]
    fn failed_override_never_consults_the_reference() {
        let mut resolver = Resolver::default();
        let local = LocalOverride::new("/tmp/upload.glb").unwrap();

        let attempt = expect_attempt(resolver.request(Some(&reference("T-002.glb")), Some(&local)));
        assert_eq!(attempt.location.as_str(), "/tmp/upload.glb");
        assert_eq!(resolver.trace(), "Using manually selected file");

        let completion =
            resolver.complete::<()>(attempt.generation, LoadResult::Failed("bad magic".into()));

        assert!(matches!(
            completion,
            Completion::Continue(Next::Synthesize { .. })
        ));
        let status = resolver.status();
        assert_eq!(
            status.state,
            ViewerState::Rendering(RenderSource::Fallback)
        );
        assert!(status.using_fallback);
        assert!(!status.error.is_empty());
        assert!(matches!(
            resolver.error(),
            Some(ResolutionError::OverrideLoadFailed { .. })
        ));
    }

    #[test]
    fn superseded_request_cannot_overwrite_the_newer_outcome() {
        let mut resolver = Resolver::default();
        let a = expect_attempt(resolver.request(Some(&reference("a.glb")), None));
        let b = expect_attempt(resolver.request(Some(&reference("b.glb")), None));

        // A finishes after B was issued, successfully.
        assert!(matches!(
            resolver.complete(a.generation, LoadResult::Loaded("a")),
            Completion::Discarded
        ));
        assert_eq!(resolver.state(), ViewerState::Resolving);
        assert_eq!(resolver.trace(), "Attempting path: b.glb");

        match resolver.complete(b.generation, LoadResult::Loaded("b")) {
            Completion::Install { model, .. } => assert_eq!(model, "b"),
            other => panic!("unexpected completion {other:?}"),
        }
        assert_eq!(resolver.state(), ViewerState::Rendering(RenderSource::Real));
    }

    #[test]
    fn superseded_failure_does_not_advance_the_newer_pass() {
        let mut resolver = Resolver::default();
        let a = expect_attempt(resolver.request(Some(&reference("a.glb")), None));
        let b = expect_attempt(resolver.request(None, Some(&LocalOverride::new("b.glb").unwrap())));

        assert!(matches!(
            resolver.complete::<()>(a.generation, LoadResult::Failed("gone".into())),
            Completion::Discarded
        ));
        assert_eq!(resolver.state(), ViewerState::Resolving);
        assert!(resolver.error().is_none());
        assert!(resolver.is_current(b.generation));
    }

    #[test]
    fn new_reference_pass_clears_the_fallback_flag() {
        let mut resolver = Resolver::default();
        resolver.request(None, None);
        assert!(resolver.using_fallback());

        let attempt = expect_attempt(resolver.request(Some(&reference("T-003.glb")), None));

        assert_eq!(attempt.location.as_str(), "T-003.glb");
        let status = resolver.status();
        assert_eq!(status.state, ViewerState::Resolving);
        assert!(!status.using_fallback);
    }

    #[test]
    fn close_is_idempotent_and_invalidates_in_flight_attempts() {
        let mut resolver = Resolver::default();
        let attempt = expect_attempt(resolver.request(Some(&reference("a.glb")), None));

        resolver.close();
        resolver.close();

        assert_eq!(resolver.state(), ViewerState::Idle);
        assert!(!resolver.using_fallback());
        assert!(resolver.trace().is_empty());
        assert!(matches!(
            resolver.complete(attempt.generation, LoadResult::Loaded(())),
            Completion::Discarded
        ));
        assert_eq!(resolver.state(), ViewerState::Idle);
    }

    #[test]
    fn base_dir_policy_limits_the_search() {
        let mut resolver = Resolver::new(CandidatePolicy::with_base_dir(Some("models".into())));
        let first = expect_attempt(resolver.request(Some(&reference("x.glb")), None));
        let second = match resolver.complete::<()>(first.generation, LoadResult::Failed("".into())) {
            Completion::Continue(next) => expect_attempt(next),
            other => panic!("unexpected completion {other:?}"),
        };

        assert_eq!(second.location.as_str(), "models/x.glb");
        assert!(matches!(
            resolver.complete::<()>(second.generation, LoadResult::Failed("".into())),
            Completion::Continue(Next::Synthesize { .. })
        ));
    }
}
