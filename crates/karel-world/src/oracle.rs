//! Movement legality.

use karel_types::{Direction, Position, World};

/// Whether leaving `pos` towards `direction` is blocked.
///
/// The grid edge always blocks. Otherwise a wall blocks if it is recorded
/// on this side of the edge (`pos`, `direction`) or on the far side
/// (neighbour cell, opposite direction).
pub fn is_blocked(world: &World, pos: Position, direction: Direction) -> bool {
    let at_edge = match direction {
        Direction::North => pos.y >= world.height,
        Direction::South => pos.y <= 1,
        Direction::East => pos.x >= world.width,
        Direction::West => pos.x <= 1,
    };
    if at_edge {
        return true;
    }
    let Some(neighbour) = pos.step(direction) else {
        return true;
    };
    let opposite = direction.opposite();

    world.walls.iter().any(|wall| {
        let here = wall.position();
        (here == pos && wall.direction == direction)
            || (here == neighbour && wall.direction == opposite)
    })
}

pub fn is_clear(world: &World, pos: Position, direction: Direction) -> bool {
    !is_blocked(world, pos, direction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use karel_types::Wall;

    #[test]
    fn test_edges_block_in_every_direction() {
        let world = World::new(1, 1);
        for d in Direction::ALL {
            assert!(is_blocked(&world, Position::new(1, 1), d), "{d}");
        }
    }

    #[test]
    fn test_edges_block_even_with_unrelated_walls() {
        let mut world = World::new(3, 3);
        world.add_wall(Wall::new(2, 2, Direction::East));
        assert!(is_blocked(&world, Position::new(3, 2), Direction::East));
        assert!(is_blocked(&world, Position::new(2, 3), Direction::North));
        assert!(is_blocked(&world, Position::new(2, 1), Direction::South));
        assert!(is_blocked(&world, Position::new(1, 2), Direction::West));
    }

    #[test]
    fn test_interior_is_clear() {
        let world = World::new(3, 3);
        for d in Direction::ALL {
            assert!(is_clear(&world, Position::new(2, 2), d), "{d}");
        }
    }

    #[test]
    fn test_wall_blocks_from_both_sides() {
        let mut world = World::new(3, 3);
        world.add_wall(Wall::new(2, 1, Direction::North));
        assert!(is_blocked(&world, Position::new(2, 1), Direction::North));
        assert!(is_blocked(&world, Position::new(2, 2), Direction::South));
        assert!(is_clear(&world, Position::new(2, 2), Direction::North));
        assert!(is_clear(&world, Position::new(1, 1), Direction::North));
    }

    #[test]
    fn test_wall_recorded_on_far_side() {
        let mut world = World::new(4, 1);
        world.add_wall(Wall::new(3, 1, Direction::West));
        assert!(is_blocked(&world, Position::new(2, 1), Direction::East));
        assert!(is_blocked(&world, Position::new(3, 1), Direction::West));
        assert!(is_clear(&world, Position::new(3, 1), Direction::East));
    }

    #[test]
    fn test_duplicate_walls_are_harmless() {
        let mut world = World::new(2, 1);
        world.add_wall(Wall::new(1, 1, Direction::East));
        world.add_wall(Wall::new(1, 1, Direction::East));
        world.add_wall(Wall::new(2, 1, Direction::West));
        assert!(is_blocked(&world, Position::new(1, 1), Direction::East));
    }
}
