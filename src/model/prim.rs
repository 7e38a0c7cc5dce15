// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of usd-mcp and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smol_str::SmolStr;

use super::prim_path::PrimPath;

/// Index of a prim inside its owning [`crate::model::Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier {
    Def,
    Over,
    Class,
}

impl Specifier {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Def => "def",
            Self::Over => "over",
            Self::Class => "class",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "def" => Some(Self::Def),
            "over" => Some(Self::Over),
            "class" => Some(Self::Class),
            _ => None,
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variability {
    #[default]
    Varying,
    Uniform,
    Config,
}

impl Variability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Varying => "varying",
            Self::Uniform => "uniform",
            Self::Config => "config",
        }
    }
}

/// An attribute declaration. The value is kept as the authored source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: SmolStr,
    pub type_name: SmolStr,
    pub custom: bool,
    pub variability: Variability,
    pub default_value: Option<String>,
    pub has_time_samples: bool,
    pub connections: Vec<String>,
}

impl Attribute {
    pub fn new(name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            custom: false,
            variability: Variability::Varying,
            default_value: None,
            has_time_samples: false,
            connections: Vec::new(),
        }
    }

    /// `None` is an explicit value block, not a value.
    pub fn has_value(&self) -> bool {
        self.has_time_samples || self.default_value.as_deref().is_some_and(|value| value != "None")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    pub name: SmolStr,
    pub custom: bool,
    pub targets: Vec<String>,
}

impl Relationship {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self { name: name.into(), custom: false, targets: Vec::new() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Attribute(Attribute),
    Relationship(Relationship),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(attr) => &attr.name,
            Self::Relationship(rel) => &rel.name,
        }
    }

    pub fn is_custom(&self) -> bool {
        match self {
            Self::Attribute(attr) => attr.custom,
            Self::Relationship(rel) => rel.custom,
        }
    }
}

/// A prim spec as authored in the root layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Prim {
    id: PrimId,
    parent: Option<PrimId>,
    path: PrimPath,
    type_name: SmolStr,
    specifier: Specifier,
    active: bool,
    kind: Option<String>,
    instanceable: bool,
    has_references: bool,
    has_payloads: bool,
    properties: Vec<Property>,
    children: Vec<PrimId>,
}

impl Prim {
    pub(crate) fn new(
        id: PrimId,
        parent: Option<PrimId>,
        path: PrimPath,
        specifier: Specifier,
        type_name: impl Into<SmolStr>,
    ) -> Self {
        Self {
            id,
            parent,
            path,
            type_name: type_name.into(),
            specifier,
            active: true,
            kind: None,
            instanceable: false,
            has_references: false,
            has_payloads: false,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> PrimId {
        self.id
    }

    pub fn parent_id(&self) -> Option<PrimId> {
        self.parent
    }

    pub fn path(&self) -> &PrimPath {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn is_pseudo_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn set_type_name(&mut self, type_name: impl Into<SmolStr>) {
        self.type_name = type_name.into();
    }

    pub fn specifier(&self) -> Specifier {
        self.specifier
    }

    pub fn set_specifier(&mut self, specifier: Specifier) {
        self.specifier = specifier;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_kind(&mut self, kind: Option<String>) {
        self.kind = kind;
    }

    pub fn is_instanceable(&self) -> bool {
        self.instanceable
    }

    pub fn set_instanceable(&mut self, instanceable: bool) {
        self.instanceable = instanceable;
    }

    pub fn has_authored_references(&self) -> bool {
        self.has_references
    }

    pub fn set_has_authored_references(&mut self, value: bool) {
        self.has_references = value;
    }

    pub fn has_authored_payloads(&self) -> bool {
        self.has_payloads
    }

    pub fn set_has_authored_payloads(&mut self, value: bool) {
        self.has_payloads = value;
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|prop| prop.name() == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|prop| prop.name() == name)
    }

    pub fn push_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Authored children in declaration order, including ones traversal would skip.
    pub fn child_ids(&self) -> &[PrimId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: PrimId) {
        self.children.push(child);
    }
}
