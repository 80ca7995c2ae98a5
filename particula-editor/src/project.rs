//! The editing session shared by the runner and the egui shell.
//!
//! A [`Project`] owns everything that feeds an extraction (image, masks,
//! edits, config) plus the live [`Engine`]. Config changes are classified
//! so that only the work they need is redone.

use anyhow::{bail, Context, Result};
use glam::Vec2;
use particula::prelude::*;
use particula::{MaskHistory, ParticleEdit};
use std::path::Path;

/// How much work a config change caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    Unchanged,
    /// Applied to the running engine in place.
    Live,
    /// Particles rebuilt from the current scene (sizes, reveal).
    Reinitialized,
    /// Image sampled again.
    Resampled,
}

pub struct Project {
    config: ParticleConfig,
    pub load_options: LoadOptions,
    image: Option<ImageBuffer>,
    mask: Option<MaskBitmap>,
    mask_history: MaskHistory,
    optional_masks: Vec<OptionalMask>,
    edits: EditList,
    engine: Option<Engine>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(ParticleConfig::default())
    }
}

impl Project {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            load_options: LoadOptions::default(),
            image: None,
            mask: None,
            mask_history: MaskHistory::default(),
            optional_masks: Vec::new(),
            edits: EditList::new(),
            engine: None,
        }
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn image(&self) -> Option<&ImageBuffer> {
        self.image.as_ref()
    }

    pub fn mask(&self) -> Option<&MaskBitmap> {
        self.mask.as_ref()
    }

    pub fn optional_masks(&self) -> &[OptionalMask] {
        &self.optional_masks
    }

    pub fn edits(&self) -> &EditList {
        &self.edits
    }

    pub fn engine(&self) -> Option<&Engine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut Engine> {
        self.engine.as_mut()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.engine.as_ref().map(Engine::scene)
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    pub fn open_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let image = ImageBuffer::open(path, &self.load_options)
            .with_context(|| format!("cannot open image {}", path.display()))?;
        self.set_image(image);
        Ok(())
    }

    /// Replace the source image. Masks and edits are in the old image's
    /// coordinates, so they are dropped.
    pub fn set_image(&mut self, image: ImageBuffer) {
        log::info!("image loaded: {}x{}", image.width(), image.height());
        self.image = Some(image);
        self.mask = None;
        self.mask_history.clear();
        self.optional_masks.clear();
        self.edits.clear();
        self.rebuild();
    }

    fn require_image(&self) -> Result<&ImageBuffer> {
        match &self.image {
            Some(image) => Ok(image),
            None => bail!("no image loaded"),
        }
    }

    /// Load the interaction mask from a PNG the size of the image.
    pub fn load_mask(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let image = self.require_image()?;
        let mask = MaskBitmap::open(path.as_ref(), image.width(), image.height())?;
        self.mask = Some(mask);
        self.mask_history.clear();
        self.rebuild();
        Ok(())
    }

    /// Add a named mask loaded from a PNG. Returns its slug.
    pub fn load_optional_mask(&mut self, name: &str, path: impl AsRef<Path>) -> Result<String> {
        let image = self.require_image()?;
        let data = MaskBitmap::open(path.as_ref(), image.width(), image.height())?;
        Ok(self.add_optional_mask(name, Some(data)))
    }

    /// Add a named mask, painted or not. Returns its slug.
    pub fn add_optional_mask(&mut self, name: &str, data: Option<MaskBitmap>) -> String {
        let id = self.optional_masks.iter().map(|m| m.id + 1).max().unwrap_or(0);
        let hue = (id as f32 * 0.27).fract();
        let mut mask = OptionalMask::new(id, name, particula::color::hsl_to_rgb(hue, 0.7, 0.55));
        mask.data = data;
        let slug = mask.slug.clone();
        self.optional_masks.push(mask);
        self.rebuild();
        slug
    }

    pub fn load_edits(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.edits = EditList::load(path)?;
        self.rebuild();
        Ok(())
    }

    /// Change the edit list and re-extract.
    pub fn update_edits(&mut self, f: impl FnOnce(&mut EditList)) {
        f(&mut self.edits);
        self.rebuild();
    }

    pub fn push_edit(&mut self, edit: ParticleEdit) -> u64 {
        let id = self.edits.push(edit);
        self.rebuild();
        id
    }

    // ========================================================================
    // Mask painting
    // ========================================================================

    /// Snapshot the mask before a brush stroke, creating it if needed.
    pub fn begin_mask_stroke(&mut self) -> bool {
        let Some(image) = &self.image else {
            return false;
        };
        let mask = self
            .mask
            .get_or_insert_with(|| MaskBitmap::new(image.width(), image.height()));
        self.mask_history.record(mask);
        true
    }

    pub fn paint_mask(&mut self, center: Vec2, radius: f32, masked: bool) -> bool {
        let Some(mask) = &mut self.mask else {
            return false;
        };
        mask.paint(center, radius, masked);
        self.rebuild();
        true
    }

    pub fn undo_mask(&mut self) -> bool {
        let restored = match &mut self.mask {
            Some(mask) => self.mask_history.undo(mask),
            None => false,
        };
        if restored {
            self.rebuild();
        }
        restored
    }

    pub fn redo_mask(&mut self) -> bool {
        let restored = match &mut self.mask {
            Some(mask) => self.mask_history.redo(mask),
            None => false,
        };
        if restored {
            self.rebuild();
        }
        restored
    }

    pub fn can_undo_mask(&self) -> bool {
        self.mask_history.can_undo()
    }

    pub fn can_redo_mask(&self) -> bool {
        self.mask_history.can_redo()
    }

    // ========================================================================
    // Config and rebuilds
    // ========================================================================

    /// Classify a config change the same way [`Project::apply_config`] will.
    pub fn classify(&self, config: &ParticleConfig) -> ConfigChange {
        if self.config == *config {
            ConfigChange::Unchanged
        } else if self.config.affects_sampling(config) {
            ConfigChange::Resampled
        } else if self.config.requires_reinit(config) {
            ConfigChange::Reinitialized
        } else {
            ConfigChange::Live
        }
    }

    pub fn apply_config(&mut self, config: ParticleConfig) -> ConfigChange {
        let change = self.classify(&config);
        self.config = config;
        match change {
            ConfigChange::Unchanged => {}
            ConfigChange::Resampled => self.rebuild(),
            ConfigChange::Reinitialized => {
                if let Some(engine) = &mut self.engine {
                    let scene = engine.scene().clone();
                    engine.reinitialize(scene, self.config.clone());
                }
            }
            ConfigChange::Live => {
                if let Some(engine) = &mut self.engine {
                    engine.update_config(self.config.clone());
                }
            }
        }
        log::debug!("config change: {change:?}");
        change
    }

    /// Re-extract the scene and restart the engine on it.
    pub fn rebuild(&mut self) {
        let Some(image) = &self.image else {
            self.engine = None;
            return;
        };
        let mut input = ExtractionInput::new(image, &self.config)
            .with_optional_masks(&self.optional_masks)
            .with_edits(&self.edits);
        if let Some(mask) = &self.mask {
            input = input.with_mask(mask);
        }
        let scene = Scene::extract(&input);

        match &mut self.engine {
            Some(engine) => engine.reinitialize(scene, self.config.clone()),
            None => self.engine = Some(Engine::new(scene, self.config.clone())),
        }
    }

    /// Generate code for the current scene. Empty when no image is loaded.
    pub fn export(&self, variant: ExportVariant) -> ExportBundle {
        generate(self.scene(), &self.config, variant)
    }
}
