//! Game-time building on top of tiled levels
//!
//! Levels authored in the editor are flattened into [`GameData`] and handed to
//! a [`GametimeSystem`], which lets the player place and remove items under the
//! same overlap rules the editor uses, plus the build/remove rules of any
//! restriction zones painted into the level.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use tiled_level_runtime::{LoadGametimeLevels, TiledLevelRuntimePlugin};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TiledLevelRuntimePlugin)
//!         .add_systems(Startup, load_levels)
//!         .run();
//! }
//!
//! fn load_levels(asset_server: Res<AssetServer>, mut load: MessageWriter<LoadGametimeLevels>) {
//!     load.write(LoadGametimeLevels {
//!         levels: vec![(asset_server.load("levels/house.level.json"), Default::default())],
//!         unbound: false,
//!     });
//! }
//! ```
//!
//! Without the `bevy` feature the crate is plain data plus [`GametimeSystem`].

mod error;
mod game_data;
mod gametime;
mod restriction;

#[cfg(feature = "bevy")]
pub mod loader;

pub use error::{GametimeError, LevelLoadError};
pub use game_data::GameData;
pub use gametime::{
    BuildOutcome, BuildRejection, GametimeMode, GametimeSystem, ItemFilter, RemoveOutcome,
};
pub use restriction::{RestrictionZone, RestrictionZones};

pub use tiled_level_core;

#[cfg(feature = "bevy")]
pub use plugin::*;

#[cfg(feature = "bevy")]
mod plugin {
    use crate::gametime::{BuildOutcome, GametimeSystem, RemoveOutcome};
    use crate::loader::LevelProjectLoader;
    use bevy::app::{App, Plugin, Update};
    use bevy::asset::{AssetApp, Assets, Handle};
    use bevy::ecs::message::{Message, MessageReader, MessageWriter};
    use bevy::ecs::system::{Local, Res, ResMut};
    use bevy::prelude::IntoScheduleConfigs;
    use tiled_level_core::{IVec3, ItemId, LevelAsset, LevelProject, Placement, Vec3};
    use tracing::{info, warn};

    /// Plugin for game-time building
    ///
    /// This plugin provides:
    /// - Asset loading for `.level.json` files
    /// - A [`GametimeSystem`] resource, initialized through [`LoadGametimeLevels`]
    /// - Build and remove requests answered with outcome messages
    pub struct TiledLevelRuntimePlugin;

    impl Plugin for TiledLevelRuntimePlugin {
        fn build(&self, app: &mut App) {
            app.init_asset::<LevelProject>()
                .init_asset_loader::<LevelProjectLoader>()
                .init_resource::<GametimeSystem>()
                .add_message::<LoadGametimeLevels>()
                .add_message::<BuildItemRequest>()
                .add_message::<RemoveItemRequest>()
                .add_message::<ItemBuilt>()
                .add_message::<ItemRemoved>()
                .add_systems(
                    Update,
                    (
                        initialize_when_loaded,
                        handle_build_requests,
                        handle_remove_requests,
                    )
                        .chain(),
                );
        }
    }

    /// Initialize game time once every listed level has loaded
    ///
    /// The item set of the first level is used for all of them.
    #[derive(Message, Clone, Debug)]
    pub struct LoadGametimeLevels {
        pub levels: Vec<(Handle<LevelProject>, IVec3)>,
        pub unbound: bool,
    }

    /// Build `item` at the grid position under `world`
    #[derive(Message, Clone, Debug)]
    pub struct BuildItemRequest {
        pub item: ItemId,
        pub world: Vec3,
    }

    /// Remove `placement`, hit by the player at `hit`
    #[derive(Message, Clone, Debug)]
    pub struct RemoveItemRequest {
        pub placement: Placement,
        pub hit: Vec3,
    }

    #[derive(Message, Clone, Debug)]
    pub struct ItemBuilt(pub BuildOutcome);

    #[derive(Message, Clone, Debug)]
    pub struct ItemRemoved(pub RemoveOutcome);

    fn initialize_when_loaded(
        mut requests: MessageReader<LoadGametimeLevels>,
        mut pending: Local<Option<LoadGametimeLevels>>,
        projects: Res<Assets<LevelProject>>,
        mut system: ResMut<GametimeSystem>,
    ) {
        if let Some(request) = requests.read().last() {
            *pending = Some(request.clone());
        }
        let Some(request) = pending.as_ref() else {
            return;
        };
        let loaded: Option<Vec<&LevelProject>> = request
            .levels
            .iter()
            .map(|(handle, _)| projects.get(handle))
            .collect();
        let Some(loaded) = loaded else {
            return;
        };

        let item_set = loaded
            .first()
            .map(|p| p.item_set.clone())
            .unwrap_or_default();
        let levels: Vec<(LevelAsset, IVec3)> = loaded
            .iter()
            .zip(&request.levels)
            .map(|(project, (_, offset))| (project.level.clone(), *offset))
            .collect();
        match system.initialize(item_set, &levels, request.unbound) {
            Ok(mode) => info!("Game time initialized with {} levels ({:?})", levels.len(), mode),
            Err(e) => warn!("Game time initialization failed: {}", e),
        }
        *pending = None;
    }

    fn handle_build_requests(
        mut requests: MessageReader<BuildItemRequest>,
        mut system: ResMut<GametimeSystem>,
        mut built: MessageWriter<ItemBuilt>,
    ) {
        for request in requests.read() {
            if system.active_item().map(|i| i.id) != Some(request.item)
                && !system.activate_item(request.item)
            {
                warn!("Cannot build unknown item {}", request.item);
                continue;
            }
            system.move_preview_to(request.world);
            built.write(ItemBuilt(system.build()));
        }
    }

    fn handle_remove_requests(
        mut requests: MessageReader<RemoveItemRequest>,
        mut system: ResMut<GametimeSystem>,
        mut removed: MessageWriter<ItemRemoved>,
    ) {
        for request in requests.read() {
            removed.write(ItemRemoved(
                system.remove(&request.placement, request.hit),
            ));
        }
    }
}
