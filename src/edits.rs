//! Manual particle edits.
//!
//! Edits are replayed on top of every extraction. They are never applied
//! destructively: a delete edit is a circular exclusion zone evaluated each
//! time particles are extracted, so removing the edit brings the particles
//! back.

use crate::color::Rgb;
use crate::error::EditError;
use crate::ConfigEnum;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What an edit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ConfigEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EditKind {
    /// Append a particle after the raster-sampled ones.
    Add,
    /// Exclude every particle strictly within `radius`.
    Delete,
    /// Recolor or resize every particle strictly within `radius`.
    Modify,
}

/// One manual edit, in image pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleEdit {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: EditKind,
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional_mask_slugs: Option<Vec<String>>,
}

impl ParticleEdit {
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Whether `point` lies strictly inside this edit's radius.
    ///
    /// A missing or zero radius contains nothing.
    #[inline]
    pub fn covers(&self, point: Vec2) -> bool {
        let radius = self.radius.unwrap_or(0.0);
        radius > 0.0 && point.distance(self.position()) < radius
    }
}

/// Append-only, ordered list of edits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditList {
    edits: Vec<ParticleEdit>,
}

impl EditList {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.edits.iter().map(|e| e.id + 1).max().unwrap_or(1)
    }

    /// Append an edit, assigning it the next free id. Returns that id.
    pub fn push(&mut self, mut edit: ParticleEdit) -> u64 {
        edit.id = self.next_id();
        let id = edit.id;
        self.edits.push(edit);
        id
    }

    /// Append a manually placed particle.
    pub fn add(&mut self, at: Vec2, color: Option<Rgb>, size: Option<f32>, slugs: Vec<String>) -> u64 {
        self.push(ParticleEdit {
            id: 0,
            kind: EditKind::Add,
            x: at.x,
            y: at.y,
            color,
            size,
            radius: None,
            optional_mask_slugs: (!slugs.is_empty()).then_some(slugs),
        })
    }

    /// Append a circular exclusion zone.
    pub fn delete(&mut self, at: Vec2, radius: f32) -> u64 {
        self.push(ParticleEdit {
            id: 0,
            kind: EditKind::Delete,
            x: at.x,
            y: at.y,
            color: None,
            size: None,
            radius: Some(radius),
            optional_mask_slugs: None,
        })
    }

    /// Append a recolor/resize zone.
    pub fn modify(&mut self, at: Vec2, radius: f32, color: Option<Rgb>, size: Option<f32>) -> u64 {
        self.push(ParticleEdit {
            id: 0,
            kind: EditKind::Modify,
            x: at.x,
            y: at.y,
            color,
            size,
            radius: Some(radius),
            optional_mask_slugs: None,
        })
    }

    pub fn clear(&mut self) {
        self.edits.clear();
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticleEdit> {
        self.edits.iter()
    }

    /// Edits of one kind, in list order.
    pub fn of_kind(&self, kind: EditKind) -> impl Iterator<Item = &ParticleEdit> {
        self.edits.iter().filter(move |e| e.kind == kind)
    }

    /// Whether any delete edit excludes `point`.
    pub fn is_deleted(&self, point: Vec2) -> bool {
        self.of_kind(EditKind::Delete).any(|e| e.covers(point))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EditError::Io {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EditError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| EditError::Io {
            path: PathBuf::from(path),
            source,
        })
    }
}

impl FromIterator<ParticleEdit> for EditList {
    fn from_iter<I: IntoIterator<Item = ParticleEdit>>(iter: I) -> Self {
        let mut list = EditList::new();
        for edit in iter {
            list.push(edit);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let mut edits = EditList::new();
        assert_eq!(edits.delete(Vec2::ZERO, 1.0), 1);
        assert_eq!(edits.add(Vec2::ONE, None, None, vec![]), 2);
        assert_eq!(edits.len(), 2);
    }

    #[test]
    fn test_delete_zone_is_strict() {
        let mut edits = EditList::new();
        edits.delete(Vec2::new(2.0, 2.0), 1.0);
        assert!(edits.is_deleted(Vec2::new(2.0, 2.0)));
        assert!(edits.is_deleted(Vec2::new(2.5, 2.5)));
        assert!(!edits.is_deleted(Vec2::new(3.0, 2.0)));
        assert!(!edits.is_deleted(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_zero_radius_deletes_nothing() {
        let mut edits = EditList::new();
        edits.delete(Vec2::new(2.0, 2.0), 0.0);
        assert!(!edits.is_deleted(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_json_shape() {
        let mut edits = EditList::new();
        edits.add(Vec2::new(1.0, 2.0), Some(Rgb::new(255, 0, 0)), Some(3.0), vec!["eye".into()]);
        let json = serde_json::to_value(&edits).unwrap();
        assert_eq!(json[0]["type"], "add");
        assert_eq!(json[0]["color"], "#ff0000");
        assert_eq!(json[0]["optional_mask_slugs"][0], "eye");
        assert!(json[0].get("radius").is_none());

        let back: EditList = serde_json::from_value(json).unwrap();
        assert_eq!(back, edits);
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("edits.json");
        let mut edits = EditList::new();
        edits.modify(Vec2::new(4.0, 4.0), 2.0, None, Some(6.0));
        edits.save(&path).unwrap();
        assert_eq!(EditList::load(&path).unwrap(), edits);
    }
}
