//! Scripted resolvers for inspector tests.

use crate::resolvers::{
    ManifestResolver, Resolution, ResolutionError, ResolveRequest, ResolverOutcome, Strategy,
};
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
pub enum Script {
    /// Resolved, with no packages
    Resolve,
    ResolveWithVersion(String),
    Decline,
    Fail,
}

/// Resolver that answers from a fixed script and counts its invocations.
pub struct RecordingResolver {
    strategy: Strategy,
    script: Script,
    calls: AtomicUsize,
}

impl RecordingResolver {
    pub fn new(strategy: Strategy, script: Script) -> Self {
        Self {
            strategy,
            script,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ManifestResolver for RecordingResolver {
    fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn resolve(&self, request: &ResolveRequest<'_>) -> Result<ResolverOutcome, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Resolve => Ok(ResolverOutcome::Resolved(Resolution::default())),
            Script::ResolveWithVersion(version) => Ok(ResolverOutcome::Resolved(Resolution {
                project_version: Some(version.clone()),
                ..Default::default()
            })),
            Script::Decline => Ok(ResolverOutcome::Unresolved {
                reason: "scripted decline".to_string(),
            }),
            Script::Fail => Err(request.malformed("scripted failure")),
        }
    }
}
