//! The "currently selected" value held by selection state.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::EntityId;

/// Either nothing is selected or exactly one entity is.
///
/// On the wire a selection is a single integer where `0` means
/// [`Selection::None`]; this is the sentinel used for "no selection / show all".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection<Id> {
    /// Nothing selected.
    None,
    /// The entity with this id is selected.
    One(Id),
}

impl<Id: EntityId> Selection<Id> {
    /// Raw wire value of [`Selection::None`].
    pub const SENTINEL: u32 = 0;

    /// Interprets a raw wire value, mapping the sentinel to [`Selection::None`].
    pub fn from_raw(raw: u32) -> Self {
        if raw == Self::SENTINEL {
            Self::None
        } else {
            Self::One(Id::from_raw(raw))
        }
    }

    /// Returns the raw wire value.
    pub fn raw(&self) -> u32 {
        match self {
            Self::None => Self::SENTINEL,
            Self::One(id) => id.raw(),
        }
    }

    /// Returns the selected id, if any.
    pub fn id(&self) -> Option<Id> {
        match self {
            Self::None => None,
            Self::One(id) => Some(*id),
        }
    }

    /// Returns true if nothing is selected.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns true if `id` is the selected entity.
    pub fn is(&self, id: Id) -> bool {
        matches!(self, Self::One(selected) if *selected == id)
    }
}

impl<Id> Default for Selection<Id> {
    fn default() -> Self {
        Self::None
    }
}

impl<Id: EntityId> From<Id> for Selection<Id> {
    fn from(id: Id) -> Self {
        Self::from_raw(id.raw())
    }
}

impl<Id: EntityId> Serialize for Selection<Id> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.raw())
    }
}

impl<'de, Id: EntityId> Deserialize<'de> for Selection<Id> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::from_raw)
    }
}
