// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use super::prim::{Prim, PrimId, Specifier};
use super::prim_path::PrimPath;

pub const DEFAULT_TIME_CODES_PER_SECOND: f64 = 24.0;

/// Root layer metadata recognized by the outline reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerMetadata {
    pub default_prim: Option<String>,
    pub doc: Option<String>,
    pub time_codes_per_second: Option<f64>,
    pub frames_per_second: Option<f64>,
    pub start_time_code: Option<f64>,
    pub end_time_code: Option<f64>,
    pub up_axis: Option<String>,
    pub meters_per_unit: Option<f64>,
    pub sub_layers: Vec<String>,
}

/// An opened stage: the prim tree of one root layer.
///
/// Prims live in an arena; index 0 is always the pseudo-root.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    root_layer: PathBuf,
    identifier: String,
    metadata: LayerMetadata,
    prims: Vec<Prim>,
    index: BTreeMap<PrimPath, PrimId>,
}

impl Stage {
    pub fn new(root_layer: impl Into<PathBuf>) -> Self {
        let root_layer = root_layer.into();
        let identifier = root_layer.display().to_string();
        let root_id = PrimId(0);
        let pseudo_root = Prim::new(root_id, None, PrimPath::root(), Specifier::Def, "");

        let mut index = BTreeMap::new();
        index.insert(PrimPath::root(), root_id);

        Self {
            root_layer,
            identifier,
            metadata: LayerMetadata::default(),
            prims: vec![pseudo_root],
            index,
        }
    }

    pub fn root_layer(&self) -> &Path {
        &self.root_layer
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// File name of the root layer.
    pub fn display_name(&self) -> &str {
        self.root_layer.file_name().and_then(|name| name.to_str()).unwrap_or(&self.identifier)
    }

    pub fn metadata(&self) -> &LayerMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut LayerMetadata {
        &mut self.metadata
    }

    /// Root layer plus its sublayers. Sublayers are listed, never opened.
    pub fn layer_count(&self) -> usize {
        1 + self.metadata.sub_layers.len()
    }

    pub fn time_codes_per_second(&self) -> f64 {
        self.metadata
            .time_codes_per_second
            .or(self.metadata.frames_per_second)
            .unwrap_or(DEFAULT_TIME_CODES_PER_SECOND)
    }

    pub fn pseudo_root(&self) -> &Prim {
        &self.prims[0]
    }

    pub fn prim(&self, id: PrimId) -> &Prim {
        &self.prims[id.0]
    }

    pub fn prim_mut(&mut self, id: PrimId) -> &mut Prim {
        &mut self.prims[id.0]
    }

    pub fn prim_at_path(&self, path: &PrimPath) -> Option<&Prim> {
        self.index.get(path).map(|id| self.prim(*id))
    }

    /// Every authored prim except the pseudo-root, in arena order.
    pub fn authored_prims(&self) -> impl Iterator<Item = &Prim> {
        self.prims.iter().skip(1)
    }

    /// Adds a child prim spec, or merges into an existing sibling of the same name.
    ///
    /// A later `def` upgrades an earlier `over`, and a non-empty type name replaces the
    /// existing one.
    pub fn define_prim(
        &mut self,
        parent: PrimId,
        name: &str,
        specifier: Specifier,
        type_name: impl Into<SmolStr>,
    ) -> PrimId {
        let type_name = type_name.into();
        let path = self.prim(parent).path().child(name);

        if let Some(&existing) = self.index.get(&path) {
            let prim = self.prim_mut(existing);
            if specifier != Specifier::Over {
                prim.set_specifier(specifier);
            }
            if !type_name.is_empty() {
                prim.set_type_name(type_name);
            }
            return existing;
        }

        let id = PrimId(self.prims.len());
        self.prims.push(Prim::new(id, Some(parent), path.clone(), specifier, type_name));
        self.prim_mut(parent).push_child(id);
        self.index.insert(path, id);
        id
    }

    pub fn parent(&self, prim: &Prim) -> Option<&Prim> {
        prim.parent_id().map(|id| self.prim(id))
    }

    /// True when the prim and all its ancestors carry a defining specifier.
    pub fn is_defined(&self, prim: &Prim) -> bool {
        self.ancestors_inclusive(prim).all(|prim| prim.specifier() != Specifier::Over)
    }

    /// True when the prim or any ancestor is a `class`.
    pub fn is_abstract(&self, prim: &Prim) -> bool {
        self.ancestors_inclusive(prim).any(|prim| prim.specifier() == Specifier::Class)
    }

    /// The default traversal predicate: active, defined, not abstract.
    pub fn is_traversable(&self, prim: &Prim) -> bool {
        prim.is_active() && self.is_defined(prim) && !self.is_abstract(prim)
    }

    /// Children that pass the default traversal predicate.
    pub fn children<'a>(&'a self, prim: &'a Prim) -> impl Iterator<Item = &'a Prim> + 'a {
        prim.child_ids()
            .iter()
            .map(move |id| self.prim(*id))
            .filter(move |child| self.is_traversable(child))
    }

    /// Depth-first pre-order walk under the pseudo-root, pruning subtrees whose root fails
    /// the default predicate.
    pub fn traverse(&self) -> Traverse<'_> {
        let mut stack = Vec::new();
        push_children_reversed(self, self.pseudo_root(), &mut stack);
        Traverse { stage: self, stack }
    }

    /// Resolves the `defaultPrim` metadata to a root prim.
    pub fn default_prim(&self) -> Option<&Prim> {
        let name = self.metadata.default_prim.as_deref()?;
        let name = name.trim_start_matches('/');
        if name.is_empty() || name.contains('/') {
            return None;
        }
        self.prim_at_path(&PrimPath::root().child(name))
    }

    pub fn has_default_prim(&self) -> bool {
        self.default_prim().is_some()
    }

    fn ancestors_inclusive<'a>(&'a self, prim: &'a Prim) -> impl Iterator<Item = &'a Prim> + 'a {
        std::iter::successors(Some(prim), move |prim| self.parent(prim))
            .filter(|prim| !prim.is_pseudo_root())
    }
}

fn push_children_reversed<'a>(stage: &'a Stage, prim: &'a Prim, stack: &mut Vec<PrimId>) {
    let start = stack.len();
    stack.extend(stage.children(prim).map(Prim::id));
    stack[start..].reverse();
}

pub struct Traverse<'a> {
    stage: &'a Stage,
    stack: Vec<PrimId>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a Prim;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let prim = self.stage.prim(id);
        push_children_reversed(self.stage, prim, &mut self.stack);
        Some(prim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stage() -> Stage {
        let mut stage = Stage::new("/tmp/sample.usda");
        let root = stage.pseudo_root().id();
        let world = stage.define_prim(root, "World", Specifier::Def, "Xform");
        stage.define_prim(world, "a", Specifier::Def, "Sphere");
        let hidden = stage.define_prim(world, "hidden", Specifier::Def, "Xform");
        stage.prim_mut(hidden).set_active(false);
        stage.define_prim(hidden, "under_hidden", Specifier::Def, "Cube");
        stage.define_prim(world, "b", Specifier::Def, "Cube");
        let proto = stage.define_prim(root, "Proto", Specifier::Class, "Xform");
        stage.define_prim(proto, "inner", Specifier::Def, "Mesh");
        stage.define_prim(root, "Patch", Specifier::Over, "");
        stage.metadata_mut().default_prim = Some("World".to_owned());
        stage
    }

    #[test]
    fn traverse_is_preorder_and_prunes_inactive_abstract_and_undefined() {
        let stage = sample_stage();
        let visited = stage.traverse().map(|prim| prim.path().as_str()).collect::<Vec<_>>();
        assert_eq!(visited, vec!["/World", "/World/a", "/World/b"]);
    }

    #[test]
    fn definedness_and_abstractness_consider_ancestors() {
        let mut stage = sample_stage();
        let patch = stage.prim_at_path(&"/Patch".parse().unwrap()).unwrap().id();
        let child = stage.define_prim(patch, "child", Specifier::Def, "Mesh");

        assert!(!stage.is_defined(stage.prim(child)));

        let inner = stage.prim_at_path(&"/Proto/inner".parse().unwrap()).unwrap();
        assert!(stage.is_defined(inner));
        assert!(stage.is_abstract(inner));
    }

    #[test]
    fn define_prim_merges_repeated_specs() {
        let mut stage = sample_stage();
        let root = stage.pseudo_root().id();
        let patch = stage.define_prim(root, "Patch", Specifier::Def, "Scope");

        let prim = stage.prim(patch);
        assert_eq!(prim.specifier(), Specifier::Def);
        assert_eq!(prim.type_name(), "Scope");
        assert_eq!(stage.authored_prims().filter(|prim| prim.name() == "Patch").count(), 1);
    }

    #[test]
    fn default_prim_resolves_root_prims_only() {
        let mut stage = sample_stage();
        assert_eq!(stage.default_prim().map(|prim| prim.path().as_str()), Some("/World"));

        stage.metadata_mut().default_prim = Some("World/a".to_owned());
        assert!(!stage.has_default_prim());

        stage.metadata_mut().default_prim = Some("Missing".to_owned());
        assert!(!stage.has_default_prim());
    }

    #[test]
    fn time_codes_fall_back_to_frames_then_default() {
        let mut stage = sample_stage();
        assert_eq!(stage.time_codes_per_second(), DEFAULT_TIME_CODES_PER_SECOND);

        stage.metadata_mut().frames_per_second = Some(30.0);
        assert_eq!(stage.time_codes_per_second(), 30.0);

        stage.metadata_mut().time_codes_per_second = Some(48.0);
        assert_eq!(stage.time_codes_per_second(), 48.0);
    }
}
