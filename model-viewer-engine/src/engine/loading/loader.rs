use bevy::asset::{LoadState, RecursiveDependencyLoadState};
use bevy::gltf::Gltf;
use bevy::prelude::*;

use super::candidates::CandidateLocation;
use super::resolver::LoadResult;

/// Progress of one in-flight load.
#[derive(Debug)]
pub enum AttemptStatus<T> {
    Pending,
    Finished(LoadResult<T>),
}

/// A single non-blocking load attempt against one candidate location.
///
/// Implementations must collapse every failure mode into
/// [`LoadResult::Failed`] and must not touch scene entities; installing the
/// result is the session's job.
pub trait ModelLoader {
    type Ticket;
    type Model;

    fn begin(&mut self, location: &CandidateLocation) -> Self::Ticket;

    fn poll(&mut self, ticket: &Self::Ticket) -> AttemptStatus<Self::Model>;
}

/// Loads glTF containers through the asset server and yields their scene.
pub struct GltfSceneLoader<'a> {
    pub asset_server: &'a AssetServer,
    pub gltfs: &'a Assets<Gltf>,
}

impl ModelLoader for GltfSceneLoader<'_> {
    type Ticket = Handle<Gltf>;
    type Model = Handle<Scene>;

    fn begin(&mut self, location: &CandidateLocation) -> Handle<Gltf> {
        self.asset_server.load::<Gltf>(location.as_str().to_string())
    }

    fn poll(&mut self, ticket: &Handle<Gltf>) -> AttemptStatus<Handle<Scene>> {
        match self.asset_server.load_state(ticket) {
            LoadState::Loading => return AttemptStatus::Pending,
            LoadState::Failed(error) => {
                return AttemptStatus::Finished(LoadResult::Failed(error.to_string()));
            }
            // A rejected request never enters the loading state.
            LoadState::NotLoaded => {
                return AttemptStatus::Finished(LoadResult::Failed(
                    "load request rejected by asset server".to_string(),
                ));
            }
            LoadState::Loaded => {}
        }

        match self.asset_server.recursive_dependency_load_state(ticket) {
            RecursiveDependencyLoadState::Loaded => {}
            RecursiveDependencyLoadState::Failed(error) => {
                return AttemptStatus::Finished(LoadResult::Failed(format!(
                    "dependency failed: {error}"
                )));
            }
            _ => return AttemptStatus::Pending,
        }

        let Some(gltf) = self.gltfs.get(ticket) else {
            return AttemptStatus::Pending;
        };
        match first_scene(gltf) {
            Some(scene) => AttemptStatus::Finished(LoadResult::Loaded(scene)),
            None => AttemptStatus::Finished(LoadResult::Failed(
                "glTF contains no scenes".to_string(),
            )),
        }
    }
}

fn first_scene(gltf: &Gltf) -> Option<Handle<Scene>> {
    pick_scene(gltf.default_scene.as_ref(), &gltf.scenes)
}

/// The default scene, falling back to the first declared one.
fn pick_scene(
    default_scene: Option<&Handle<Scene>>,
    scenes: &[Handle<Scene>],
) -> Option<Handle<Scene>> {
    default_scene.or_else(|| scenes.first()).cloned()
}


#[cfg(test)]
pub(crate) mod fake {
    use std::collections::HashMap;

    use super::*;

    /// Scripted loader: each location resolves after a fixed number of polls.
    #[derive(Default)]
    pub struct ScriptedLoader {
        pub outcomes: HashMap<String, (u32, Result<&'static str, &'static str>)>,
        pub started: Vec<String>,
        polls: HashMap<usize, u32>,
    }

    impl ScriptedLoader {
        pub fn succeed(mut self, location: &str, after_polls: u32, model: &'static str) -> Self {
            self.outcomes
                .insert(location.to_string(), (after_polls, Ok(model)));
            self
        }
    }

    impl ModelLoader for ScriptedLoader {
        type Ticket = usize;
        type Model = &'static str;

        fn begin(&mut self, location: &CandidateLocation) -> usize {
            self.started.push(location.to_string());
            self.started.len() - 1
        }

        fn poll(&mut self, ticket: &usize) -> AttemptStatus<&'static str> {
            let location = &self.started[*ticket];
            let (after, outcome) = self
                .outcomes
                .get(location)
                .copied()
                .unwrap_or((0, Err("not found")));
            let polls = self.polls.entry(*ticket).or_default();
            *polls += 1;
            if *polls <= after {
                return AttemptStatus::Pending;
            }
            match outcome {
                Ok(model) => AttemptStatus::Finished(LoadResult::Loaded(model)),
                Err(reason) => AttemptStatus::Finished(LoadResult::Failed(reason.to_string())),
            }
        }
    }
}
