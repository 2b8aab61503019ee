//! Primitive actions and conditions.
//!
//! Names resolve by table lookup to a tagged operation. Actions mutate the
//! world and may fail; conditions only read it.

use crate::error::{RunError, RunResult};
use karel_types::{Direction, World};
use karel_world::is_blocked;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calls accepted as statements that do nothing.
pub const NO_OP_CALLS: &[&str] = &["pass", "run_karel_program"];

/// A primitive action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Move,
    TurnLeft,
    PickBeeper,
    PutBeeper,
}

const COMMANDS: &[(&str, Command)] = &[
    ("move", Command::Move),
    ("turn_left", Command::TurnLeft),
    ("pick_beeper", Command::PickBeeper),
    ("put_beeper", Command::PutBeeper),
];

impl Command {
    pub fn from_name(name: &str) -> Option<Self> {
        COMMANDS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
    }

    pub fn name(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|(_, c)| *c == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    /// Apply to `world`. On error the world is unchanged.
    pub fn apply(self, world: &mut World) -> RunResult<()> {
        let here = world.agent.position();
        match self {
            Self::Move => {
                let pose = world.agent;
                if is_blocked(world, here, pose.facing) {
                    return Err(RunError::MovementBlocked { pose });
                }
                let next = here
                    .step(pose.facing)
                    .ok_or(RunError::MovementBlocked { pose })?;
                world.agent.x = next.x;
                world.agent.y = next.y;
            }
            Self::TurnLeft => world.agent.facing = world.agent.facing.turn_left(),
            Self::PickBeeper => {
                if !world.remove_beeper(here) {
                    return Err(RunError::NoBeeperHere {
                        x: here.x,
                        y: here.y,
                    });
                }
                world.bag.give();
            }
            Self::PutBeeper => {
                if !world.bag.take() {
                    return Err(RunError::BagEmpty);
                }
                world.add_beeper(here);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A primitive read-only test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    FrontIsClear,
    FrontIsBlocked,
    LeftIsClear,
    LeftIsBlocked,
    RightIsClear,
    RightIsBlocked,
    BeepersPresent,
    NoBeepersPresent,
    BeepersInBag,
    NoBeepersInBag,
    Facing(Direction),
    NotFacing(Direction),
}

const CONDITIONS: &[(&str, Condition)] = &[
    ("front_is_clear", Condition::FrontIsClear),
    ("front_is_blocked", Condition::FrontIsBlocked),
    ("left_is_clear", Condition::LeftIsClear),
    ("left_is_blocked", Condition::LeftIsBlocked),
    ("right_is_clear", Condition::RightIsClear),
    ("right_is_blocked", Condition::RightIsBlocked),
    ("beepers_present", Condition::BeepersPresent),
    ("no_beepers_present", Condition::NoBeepersPresent),
    ("beepers_in_bag", Condition::BeepersInBag),
    ("no_beepers_in_bag", Condition::NoBeepersInBag),
    ("facing_north", Condition::Facing(Direction::North)),
    ("facing_south", Condition::Facing(Direction::South)),
    ("facing_east", Condition::Facing(Direction::East)),
    ("facing_west", Condition::Facing(Direction::West)),
    ("not_facing_north", Condition::NotFacing(Direction::North)),
    ("not_facing_south", Condition::NotFacing(Direction::South)),
    ("not_facing_east", Condition::NotFacing(Direction::East)),
    ("not_facing_west", Condition::NotFacing(Direction::West)),
];

impl Condition {
    pub fn from_name(name: &str) -> Option<Self> {
        CONDITIONS.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
    }

    pub fn name(self) -> &'static str {
        CONDITIONS
            .iter()
            .find(|(_, c)| *c == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    /// Every condition name, in table order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        CONDITIONS.iter().map(|(n, _)| *n)
    }

    pub fn evaluate(self, world: &World) -> bool {
        let pose = world.agent;
        let here = pose.position();
        match self {
            Self::FrontIsClear => !is_blocked(world, here, pose.facing),
            Self::FrontIsBlocked => is_blocked(world, here, pose.facing),
            Self::LeftIsClear => !is_blocked(world, here, pose.facing.turn_left()),
            Self::LeftIsBlocked => is_blocked(world, here, pose.facing.turn_left()),
            Self::RightIsClear => !is_blocked(world, here, pose.facing.turn_right()),
            Self::RightIsBlocked => is_blocked(world, here, pose.facing.turn_right()),
            Self::BeepersPresent => world.beepers_at(here) > 0,
            Self::NoBeepersPresent => world.beepers_at(here) == 0,
            Self::BeepersInBag => world.bag.has_beepers(),
            Self::NoBeepersInBag => !world.bag.has_beepers(),
            Self::Facing(d) => pose.facing == d,
            Self::NotFacing(d) => pose.facing != d,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
