use bevy::gltf::Gltf;
use bevy::prelude::*;

use super::candidates::CandidateLocation;
use super::loader::{AttemptStatus, GltfSceneLoader, ModelLoader};
use super::resolver::{Attempt, Completion, Generation, Next, Resolver};
use crate::engine::viewer::session::ViewerSession;

/// The one attempt currently owned by the asset loader.
#[derive(Debug)]
pub struct InFlight<T> {
    pub attempt: Attempt,
    pub ticket: T,
}

/// A model ready to be put on display, tagged with the request it answers.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelInstall<M> {
    Scene {
        generation: Generation,
        location: CandidateLocation,
        model: M,
    },
    Airframe {
        generation: Generation,
    },
}

impl<M> ModelInstall<M> {
    pub fn generation(&self) -> Generation {
        match self {
            Self::Scene { generation, .. } | Self::Airframe { generation } => *generation,
        }
    }
}

/// Act on a resolver decision: start the next load, or ask for the placeholder.
/// Any previous in-flight attempt is dropped.
pub fn dispatch<L: ModelLoader>(
    next: Next,
    loader: &mut L,
    in_flight: &mut Option<InFlight<L::Ticket>>,
) -> Option<ModelInstall<L::Model>> {
    match next {
        Next::Attempt(attempt) => {
            let ticket = loader.begin(&attempt.location);
            *in_flight = Some(InFlight { attempt, ticket });
            None
        }
        Next::Synthesize { generation } => {
            *in_flight = None;
            Some(ModelInstall::Airframe { generation })
        }
    }
}

/// Poll the in-flight attempt and feed a finished result to the resolver.
pub fn advance<L: ModelLoader>(
    resolver: &mut Resolver,
    loader: &mut L,
    in_flight: &mut Option<InFlight<L::Ticket>>,
) -> Option<ModelInstall<L::Model>> {
    let status = loader.poll(&in_flight.as_ref()?.ticket);
    let AttemptStatus::Finished(result) = status else {
        return None;
    };
    let finished = in_flight.take()?;

    match resolver.complete(finished.attempt.generation, result) {
        Completion::Install {
            generation,
            location,
            model,
        } => Some(ModelInstall::Scene {
            generation,
            location,
            model,
        }),
        Completion::Continue(next) => dispatch(next, loader, in_flight),
        Completion::Discarded => None,
    }
}

/// Per-frame driver: the render loop never waits on a load.
pub fn drive_model_resolution(
    mut session: ResMut<ViewerSession>,
    asset_server: Res<AssetServer>,
    gltfs: Res<Assets<Gltf>>,
) {
    let mut loader = GltfSceneLoader {
        asset_server: &asset_server,
        gltfs: &gltfs,
    };
    session.advance_with(&mut loader);
}
