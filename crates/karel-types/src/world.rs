//! The grid world: dimensions, walls, beepers, the agent and its bag.

use crate::Direction;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A 1-based grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The neighbouring coordinate one unit towards `direction`.
    ///
    /// Returns `None` when the step would leave the unsigned coordinate
    /// space; the grid boundary itself is not checked here.
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = u32::try_from(i64::from(self.x) + dx).ok()?;
        let y = u32::try_from(i64::from(self.y) + dy).ok()?;
        Some(Position { x, y })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Agent location plus facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub x: u32,
    pub y: u32,
    pub facing: Direction,
}

impl Pose {
    pub fn new(x: u32, y: u32, facing: Direction) -> Self {
        Self { x, y, facing }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(1, 1, Direction::East)
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) facing {}", self.x, self.y, self.facing)
    }
}

/// A wall on one edge of a cell.
///
/// `direction` names the edge: a wall at `(3, 2) north` sits between
/// `(3, 2)` and `(3, 3)` and blocks both of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    pub x: u32,
    pub y: u32,
    pub direction: Direction,
}

impl Wall {
    pub fn new(x: u32, y: u32, direction: Direction) -> Self {
        Self { x, y, direction }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

/// A non-empty stack of beepers on one cell, as exposed to serializers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeeperPile {
    pub x: u32,
    pub y: u32,
    pub count: u32,
}

/// The agent's carried beepers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BeeperBag {
    Finite(u32),
    Unbounded,
}

impl BeeperBag {
    pub const EMPTY: BeeperBag = BeeperBag::Finite(0);

    pub fn has_beepers(&self) -> bool {
        !matches!(self, Self::Finite(0))
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Self::Unbounded)
    }

    /// Beepers held, `None` when unbounded.
    pub fn count(&self) -> Option<u32> {
        match self {
            Self::Finite(n) => Some(*n),
            Self::Unbounded => None,
        }
    }

    /// Take one beeper out. Returns `false` if the bag is empty.
    pub fn take(&mut self) -> bool {
        match self {
            Self::Finite(0) => false,
            Self::Finite(n) => {
                *n -= 1;
                true
            }
            Self::Unbounded => true,
        }
    }

    /// Put one beeper in. An unbounded bag stays unbounded.
    pub fn give(&mut self) {
        if let Self::Finite(n) = self {
            *n = n.saturating_add(1);
        }
    }
}

impl Default for BeeperBag {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Display for BeeperBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count() {
            Some(n) => write!(f, "{n}"),
            None => f.write_str("infinity"),
        }
    }
}

impl Serialize for BeeperBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.count() {
            Some(n) => serializer.serialize_u32(n),
            None => serializer.serialize_str("infinity"),
        }
    }
}

impl<'de> Deserialize<'de> for BeeperBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BagVisitor;

        impl Visitor<'_> for BagVisitor {
            type Value = BeeperBag;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a beeper count or \"infinity\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<BeeperBag, E> {
                u32::try_from(v)
                    .map(BeeperBag::Finite)
                    .map_err(|_| E::custom("beeper count out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<BeeperBag, E> {
                u64::try_from(v)
                    .map_err(|_| E::custom("beeper count must not be negative"))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<BeeperBag, E> {
                match v.to_ascii_lowercase().as_str() {
                    "infinity" | "infinite" => Ok(BeeperBag::Unbounded),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(BagVisitor)
    }
}

/// The complete simulation state.
///
/// Beeper counts are kept private so that a zero count can never be
/// stored: absence and zero mean the same thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    #[serde(deserialize_with = "positive")]
    pub width: u32,
    #[serde(deserialize_with = "positive")]
    pub height: u32,
    pub walls: Vec<Wall>,
    #[serde(with = "beeper_layout")]
    beepers: BTreeMap<Position, u32>,
    pub agent: Pose,
    pub bag: BeeperBag,
}

impl World {
    /// An empty world of the given size with the agent at `(1, 1)` facing east.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            walls: Vec::new(),
            beepers: BTreeMap::new(),
            agent: Pose::default(),
            bag: BeeperBag::EMPTY,
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        (1..=self.width).contains(&pos.x) && (1..=self.height).contains(&pos.y)
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn beepers_at(&self, pos: Position) -> u32 {
        self.beepers.get(&pos).copied().unwrap_or(0)
    }

    /// Overwrite the count on a cell; zero removes the entry.
    pub fn set_beepers(&mut self, pos: Position, count: u32) {
        if count == 0 {
            self.beepers.remove(&pos);
        } else {
            self.beepers.insert(pos, count);
        }
    }

    pub fn add_beeper(&mut self, pos: Position) {
        let count = self.beepers.entry(pos).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Remove one beeper. Returns `false` (and changes nothing) if the cell is empty.
    pub fn remove_beeper(&mut self, pos: Position) -> bool {
        match self.beepers.get_mut(&pos) {
            Some(count) if *count > 1 => {
                *count -= 1;
                true
            }
            Some(_) => {
                self.beepers.remove(&pos);
                true
            }
            None => false,
        }
    }

    /// Non-empty cells in ascending `(x, y)` order.
    pub fn beepers(&self) -> impl Iterator<Item = (Position, u32)> + '_ {
        self.beepers.iter().map(|(pos, count)| (*pos, *count))
    }

    pub fn beeper_piles(&self) -> Vec<BeeperPile> {
        self.beepers()
            .map(|(pos, count)| BeeperPile {
                x: pos.x,
                y: pos.y,
                count,
            })
            .collect()
    }

    pub fn total_beepers(&self) -> u64 {
        self.beepers.values().map(|c| u64::from(*c)).sum()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Grid dimensions start at 1.
fn positive<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = u32::deserialize(deserializer)?;
    if value == 0 {
        return Err(de::Error::invalid_value(
            de::Unexpected::Unsigned(0),
            &"a dimension of at least 1",
        ));
    }
    Ok(value)
}

mod beeper_layout {
    use super::{BeeperPile, Position};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        beepers: &BTreeMap<Position, u32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let piles: Vec<BeeperPile> = beepers
            .iter()
            .map(|(pos, count)| BeeperPile {
                x: pos.x,
                y: pos.y,
                count: *count,
            })
            .collect();
        piles.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<Position, u32>, D::Error> {
        let piles = Vec::<BeeperPile>::deserialize(deserializer)?;
        Ok(piles
            .into_iter()
            .filter(|p| p.count > 0)
            .map(|p| (Position::new(p.x, p.y), p.count))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_world() {
        let w = World::default();
        assert_eq!((w.width, w.height), (1, 1));
        assert_eq!(w.agent, Pose::new(1, 1, Direction::East));
        assert_eq!(w.bag, BeeperBag::EMPTY);
        assert!(w.walls.is_empty());
        assert_eq!(w.beepers().count(), 0);
    }

    #[test]
    fn test_remove_last_beeper_clears_entry() {
        let mut w = World::new(3, 3);
        let p = Position::new(2, 2);
        w.set_beepers(p, 2);
        assert!(w.remove_beeper(p));
        assert_eq!(w.beepers_at(p), 1);
        assert!(w.remove_beeper(p));
        assert_eq!(w.beepers_at(p), 0);
        assert_eq!(w.beepers().count(), 0);
        assert!(!w.remove_beeper(p));
    }

    #[test]
    fn test_set_zero_removes() {
        let mut w = World::new(2, 2);
        let p = Position::new(1, 2);
        w.set_beepers(p, 4);
        w.set_beepers(p, 0);
        assert!(w.beeper_piles().is_empty());
    }

    #[test]
    fn test_bag_take_and_give() {
        let mut bag = BeeperBag::Finite(1);
        assert!(bag.take());
        assert_eq!(bag, BeeperBag::EMPTY);
        assert!(!bag.take());
        bag.give();
        assert_eq!(bag, BeeperBag::Finite(1));

        let mut inf = BeeperBag::Unbounded;
        assert!(inf.take());
        inf.give();
        assert_eq!(inf, BeeperBag::Unbounded);
    }

    #[test]
    fn test_position_step_saturates_at_zero() {
        assert_eq!(Position::new(0, 1).step(Direction::West), None);
        assert_eq!(
            Position::new(2, 2).step(Direction::North),
            Some(Position::new(2, 3))
        );
    }

    #[test]
    fn test_world_json_shape() {
        let mut w = World::new(3, 2);
        w.add_wall(Wall::new(1, 1, Direction::North));
        w.set_beepers(Position::new(2, 1), 3);
        w.bag = BeeperBag::Unbounded;
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["beepers"][0]["count"], 3);
        assert_eq!(json["walls"][0]["direction"], "north");
        assert_eq!(json["agent"]["facing"], "east");
        assert_eq!(json["bag"], "infinity");

        let back: World = serde_json::from_value(json).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn test_deserialize_drops_zero_piles() {
        let json = r#"{"width":2,"height":2,"walls":[],
            "beepers":[{"x":1,"y":1,"count":0},{"x":2,"y":2,"count":1}],
            "agent":{"x":1,"y":1,"facing":"north"},"bag":0}"#;
        let w: World = serde_json::from_str(json).unwrap();
        assert_eq!(w.beeper_piles(), vec![BeeperPile { x: 2, y: 2, count: 1 }]);
        assert_eq!(w.bag, BeeperBag::EMPTY);
    }

    #[test]
    fn test_deserialize_rejects_zero_dimensions() {
        let json = r#"{"width":0,"height":2,"walls":[],"beepers":[],
            "agent":{"x":1,"y":1,"facing":"east"},"bag":0}"#;
        let err = serde_json::from_str::<World>(json).unwrap_err();
        assert!(err.to_string().contains("at least 1"));

        let json = r#"{"width":2,"height":0,"walls":[],"beepers":[],
            "agent":{"x":1,"y":1,"facing":"east"},"bag":0}"#;
        assert!(serde_json::from_str::<World>(json).is_err());
    }
}
