use bevy::gltf::Gltf;
use bevy::prelude::*;
use serde::Serialize;

use crate::engine::loading::candidates::{AssetReference, CandidatePolicy, LocalOverride};
use crate::engine::loading::driver::{InFlight, ModelInstall, advance, dispatch};
use crate::engine::loading::loader::ModelLoader;
use crate::engine::loading::resolver::{Next, Resolver, ViewerState};

/// Snapshot pushed to the host page and the status overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewerStatus {
    pub state: ViewerState,
    pub using_fallback: bool,
    pub trace: String,
    pub error: String,
    pub display_name: String,
    pub local_override_active: bool,
}

/// Everything one open viewer knows about what it is showing.
#[derive(Resource, Default)]
pub struct ViewerSession {
    pub(crate) display_name: String,
    pub(crate) reference: Option<AssetReference>,
    pub(crate) local_override: Option<LocalOverride>,
    pub(crate) resolver: Resolver,
    pub(crate) in_flight: Option<InFlight<Handle<Gltf>>>,
    pub(crate) pending_install: Option<ModelInstall<Handle<Scene>>>,
    teardowns: u32,
}

impl ViewerSession {
    pub fn new(policy: CandidatePolicy) -> Self {
        Self {
            resolver: Resolver::new(policy),
            ..Default::default()
        }
    }

    /// Show a new product. Any local override from the previous one is dropped.
    pub fn open(&mut self, display_name: impl Into<String>, reference: Option<&str>) -> Next {
        self.display_name = display_name.into();
        self.reference = reference.and_then(AssetReference::new);
        self.local_override = None;
        self.request()
    }

    pub fn set_local_override(&mut self, local_override: LocalOverride) -> Next {
        self.local_override = Some(local_override);
        self.request()
    }

    /// Back to the catalog reference.
    pub fn clear_local_override(&mut self) -> Next {
        self.local_override = None;
        self.request()
    }

    pub fn close(&mut self) {
        self.resolver.close();
        self.display_name.clear();
        self.reference = None;
        self.local_override = None;
        self.in_flight = None;
        self.pending_install = None;
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn local_override(&self) -> Option<&LocalOverride> {
        self.local_override.as_ref()
    }

    pub fn status(&self) -> ViewerStatus {
        let resolution = self.resolver.status();
        ViewerStatus {
            state: resolution.state,
            using_fallback: resolution.using_fallback,
            trace: resolution.trace,
            error: resolution.error,
            display_name: self.display_name.clone(),
            local_override_active: self.local_override.is_some(),
        }
    }

    pub fn record_teardown(&mut self) {
        self.teardowns += 1;
    }

    /// Number of times the viewer's resources have been released.
    pub fn teardowns(&self) -> u32 {
        self.teardowns
    }

    /// Start loading per the resolver's decision.
    pub fn apply<L>(&mut self, next: Next, loader: &mut L)
    where
        L: ModelLoader<Ticket = Handle<Gltf>, Model = Handle<Scene>>,
    {
        if let Some(install) = dispatch(next, loader, &mut self.in_flight) {
            self.pending_install = Some(install);
        }
    }

    /// Poll the current attempt once.
    pub fn advance_with<L>(&mut self, loader: &mut L)
    where
        L: ModelLoader<Ticket = Handle<Gltf>, Model = Handle<Scene>>,
    {
        if let Some(install) = advance(&mut self.resolver, loader, &mut self.in_flight) {
            self.pending_install = Some(install);
        }
    }

    /// The waiting install, unless a newer request has superseded it.
    pub fn take_current_install(&mut self) -> Option<ModelInstall<Handle<Scene>>> {
        let install = self.pending_install.take()?;
        if self.resolver.is_current(install.generation()) {
            Some(install)
        } else {
            debug!("Dropping install for superseded generation {}", install.generation());
            None
        }
    }

    fn request(&mut self) -> Next {
        self.in_flight = None;
        self.pending_install = None;
        self.resolver
            .request(self.reference.as_ref(), self.local_override.as_ref())
    }
}
