//! Export to a standalone TypeScript React component.
//!
//! The generated component restates the engine frame by frame, with the
//! configuration baked in as constants and only the enabled code paths
//! emitted. Particle data comes from the same [`Scene`] the preview runs,
//! with sizes drawn by the same seeded sampler.
//!
//! ```ignore
//! let bundle = generate(Some(&scene), &config, ExportVariant::ComponentWithData);
//! bundle.write_to_dir("out/")?;
//! ```

mod component;
mod data;
mod fragments;

use crate::config::ParticleConfig;
use crate::error::ExportError;
use crate::scene::Scene;
use crate::ConfigEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the component.
pub const COMPONENT_FILE: &str = "ParticleAnimation.tsx";
/// Module name of the separate particle data (without extension).
pub const DATA_MODULE: &str = "particleData";
/// File name of the separate particle data.
pub const DATA_FILE: &str = "particleData.ts";

/// How the export is split into files.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ConfigEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExportVariant {
    /// Component with the particle array inlined
    #[default]
    SingleFile,
    /// Component plus a separate particle data module
    ComponentWithData,
}

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub contents: String,
}

/// The files of one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportBundle {
    pub files: Vec<ExportFile>,
}

impl ExportBundle {
    /// True when there was nothing to export.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file(&self, name: &str) -> Option<&ExportFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.contents.len()).sum()
    }

    /// Write every file into `dir`, creating it if needed.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ExportError> {
        if self.is_empty() {
            return Err(ExportError::Empty);
        }
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dir.join(&file.name);
            std::fs::write(&path, &file.contents).map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
            written.push(path);
        }
        log::info!("exported {} files to {}", written.len(), dir.display());
        Ok(written)
    }
}

/// Generate the export for `scene`.
///
/// Without a scene (no image loaded) the bundle is empty.
pub fn generate(scene: Option<&Scene>, config: &ParticleConfig, variant: ExportVariant) -> ExportBundle {
    let Some(scene) = scene else {
        return ExportBundle::default();
    };

    let mut files = vec![ExportFile {
        name: COMPONENT_FILE.to_string(),
        contents: component::component(scene, config, variant),
    }];
    if variant == ExportVariant::ComponentWithData {
        files.push(ExportFile {
            name: DATA_FILE.to_string(),
            contents: data::particle_data(scene, config, true),
        });
    }

    let bundle = ExportBundle { files };
    log::debug!(
        "generated {} export: {} particles, {} bytes",
        variant,
        scene.len(),
        bundle.total_bytes()
    );
    bundle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::particle::ParticleData;

    fn scene() -> Scene {
        Scene::new(8, 8, vec![ParticleData::new(2.0, 2.0, Rgb::WHITE)])
    }

    #[test]
    fn test_no_scene_is_empty() {
        let bundle = generate(None, &ParticleConfig::default(), ExportVariant::SingleFile);
        assert!(bundle.is_empty());
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(bundle.write_to_dir(dir.path()), Err(ExportError::Empty)));
    }

    #[test]
    fn test_variants() {
        let config = ParticleConfig::default();
        let single = generate(Some(&scene()), &config, ExportVariant::SingleFile);
        assert_eq!(single.files.len(), 1);
        assert!(single.file(COMPONENT_FILE).is_some());

        let split = generate(Some(&scene()), &config, ExportVariant::ComponentWithData);
        assert_eq!(split.files.len(), 2);
        assert!(split.file(DATA_FILE).unwrap().contents.contains("export const PARTICLES"));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let bundle = generate(Some(&scene()), &ParticleConfig::default(), ExportVariant::ComponentWithData);
        let written = bundle.write_to_dir(&out).unwrap();
        assert_eq!(written.len(), 2);
        let text = std::fs::read_to_string(out.join(COMPONENT_FILE)).unwrap();
        assert_eq!(text, bundle.files[0].contents);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut config = ParticleConfig::default();
        config.size.size_variation = 0.5;
        let a = generate(Some(&scene()), &config, ExportVariant::SingleFile);
        let b = generate(Some(&scene()), &config, ExportVariant::SingleFile);
        assert_eq!(a, b);
    }
}
