//! Asset loader for `.level.json` project files

use crate::error::LevelLoadError;
use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use tiled_level_core::LevelProject;
use tracing::debug;

#[derive(Default)]
pub struct LevelProjectLoader;

impl AssetLoader for LevelProjectLoader {
    type Asset = LevelProject;
    type Settings = ();
    type Error = LevelLoadError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext<'_>,
    ) -> impl std::future::Future<Output = Result<Self::Asset, Self::Error>> + Send {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            let json = String::from_utf8_lossy(&bytes);
            let project = LevelProject::from_json(&json)?;
            debug!(
                "Loaded level project {} ({} placements)",
                load_context.path().display(),
                project.level.placement_count()
            );
            Ok(project)
        }
    }

    fn extensions(&self) -> &[&str] {
        &["level.json"]
    }
}
