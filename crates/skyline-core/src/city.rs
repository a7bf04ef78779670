//! Layout output: one [`ComponentLayout`] box per entity, collected in a [`CityLayout`].

use std::fmt;

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{SeqAccess, Visitor},
    ser::SerializeSeq,
};

use crate::{
    geometry::{Point, Rect, Size},
    identifier::Id,
};

/// Box of a single entity: footprint, height and position.
///
/// Positions refer to the box's top-left corner on the ground plane, with
/// `position_y` as its elevation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentLayout {
    pub height: f32,
    pub width: f32,
    pub depth: f32,
    pub position_x: f32,
    pub position_y: f32,
    pub position_z: f32,
}

impl ComponentLayout {
    /// Ground-plane corner of the box.
    pub fn position(&self) -> Point {
        Point::new(self.position_x, self.position_z)
    }

    /// Ground-plane footprint of the box.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.depth)
    }

    /// Ground-plane rectangle covered by the box.
    pub fn footprint(&self) -> Rect {
        Rect::new(self.position(), self.size())
    }

    pub fn set_position(&mut self, position: Point) {
        self.position_x = position.x();
        self.position_z = position.z();
    }

    pub fn set_size(&mut self, size: Size) {
        self.width = size.width();
        self.depth = size.depth();
    }
}

/// Mapping from entity id to its computed box.
///
/// Iteration follows insertion order, which keeps serialized output stable
/// for identical inputs. On the wire the layout is an array of
/// `[id, layout]` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityLayout {
    boxes: IndexMap<Id, ComponentLayout>,
}

impl CityLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            boxes: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts a box, returning the previous one for the same id.
    pub fn insert(&mut self, id: Id, layout: ComponentLayout) -> Option<ComponentLayout> {
        self.boxes.insert(id, layout)
    }

    /// Looks up the box of `id`. Accepts an [`Id`] or a plain name.
    pub fn get(&self, id: &str) -> Option<&ComponentLayout> {
        self.boxes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ComponentLayout> {
        self.boxes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.boxes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Id, &ComponentLayout)> {
        self.boxes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&Id, &mut ComponentLayout)> {
        self.boxes.iter_mut()
    }
}

impl FromIterator<(Id, ComponentLayout)> for CityLayout {
    fn from_iter<I: IntoIterator<Item = (Id, ComponentLayout)>>(iter: I) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}

impl Serialize for CityLayout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.boxes.len()))?;
        for entry in &self.boxes {
            seq.serialize_element(&entry)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for CityLayout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = CityLayout;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of [id, layout] pairs")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut layout = CityLayout::with_capacity(seq.size_hint().unwrap_or_default());
                while let Some((id, component)) = seq.next_element::<(Id, ComponentLayout)>()? {
                    layout.insert(id, component);
                }
                Ok(layout)
            }
        }

        deserializer.deserialize_seq(PairsVisitor)
    }
}
