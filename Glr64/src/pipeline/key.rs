//! Material deduplication key
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use std::fmt;

use indexmap::IndexSet;
use serde::Serialize;

use crate::formats::glr::{TextureState, TriangleState};

/// Texture fields that take part in material identity.
///
/// Tiles that only differ in their masks share a material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TextureKey {
    pub crc: u64,
    pub wrap_s: u8,
    pub wrap_t: u8,
}

impl From<&TextureState> for TextureKey {
    fn from(tex: &TextureState) -> Self {
        Self {
            crc: tex.crc,
            wrap_s: tex.wrap_s,
            wrap_t: tex.wrap_t,
        }
    }
}

/// The nine RDP state fields that fully determine a material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MaterialKey {
    pub combiner_mux: u64,
    pub other_mode: u64,
    pub geometry_mode: u32,
    pub tex0: TextureKey,
    pub tex1: TextureKey,
}

impl MaterialKey {
    pub fn from_state(state: &TriangleState) -> Self {
        Self {
            combiner_mux: state.combiner_mux,
            other_mode: state.other_mode,
            geometry_mode: state.geometry_mode,
            tex0: TextureKey::from(&state.tex0),
            tex1: TextureKey::from(&state.tex1),
        }
    }

    pub fn textures(&self) -> [TextureKey; 2] {
        [self.tex0, self.tex1]
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mux {:016X} othermode {:016X} geom {:08X} tex0 {:016X}/{}/{} tex1 {:016X}/{}/{}",
            self.combiner_mux,
            self.other_mode,
            self.geometry_mode,
            self.tex0.crc,
            self.tex0.wrap_s,
            self.tex0.wrap_t,
            self.tex1.crc,
            self.tex1.wrap_s,
            self.tex1.wrap_t,
        )
    }
}

/// Unique material keys in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialTable {
    keys: IndexSet<MaterialKey>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `key`, inserting it at the end if unseen.
    pub fn intern(&mut self, key: MaterialKey) -> usize {
        self.keys.insert_full(key).0
    }

    pub fn index_of(&self, key: &MaterialKey) -> Option<usize> {
        self.keys.get_index_of(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &MaterialKey> {
        self.keys.iter()
    }
}

impl<'a> IntoIterator for &'a MaterialTable {
    type Item = &'a MaterialKey;
    type IntoIter = indexmap::set::Iter<'a, MaterialKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}
