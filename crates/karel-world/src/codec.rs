//! World text codec.
//!
//! One declaration per line, `keyword: params`, keywords case-insensitive:
//!
//! ```text
//! Dimension: (7, 5)
//! Wall: (3, 2); west
//! Beeper: (6, 3); 1
//! Karel: (3, 4); east
//! BeeperBag: infinity
//! ```
//!
//! Parsing is lenient: blank, unknown or malformed lines are skipped and
//! never produce an error. Missing declarations keep the defaults of
//! [`World::default`].

use karel_types::{BeeperBag, Direction, Pose, Position, Wall, World};
use std::fmt::Write;
use tracing::trace;

/// Parse world text into a [`World`].
pub fn parse_world(text: &str) -> World {
    let mut world = World::default();

    for (idx, line) in text.split('\n').enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || !trimmed.contains(':') {
            continue;
        }
        // Only the segment between the first and second colon is read.
        let mut parts = trimmed.split(':');
        let keyword = parts.next().unwrap_or("").trim().to_lowercase();
        let params = parts.next().unwrap_or("").trim().to_lowercase();

        let applied = match keyword.as_str() {
            "dimension" => apply_dimension(&mut world, &params),
            "wall" => apply_wall(&mut world, &params),
            "beeper" => apply_beeper(&mut world, &params),
            "karel" => apply_karel(&mut world, &params),
            "beeperbag" => {
                world.bag = parse_bag(&params);
                true
            }
            _ => false,
        };
        if !applied {
            trace!(line = idx + 1, keyword = %keyword, "ignoring world line");
        }
    }

    world
}

/// Write `world` in the canonical text format.
///
/// Walls keep their stored order; beepers are listed in ascending `(x, y)` order.
pub fn format_world(world: &World) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Dimension: ({}, {})", world.width, world.height);
    for wall in &world.walls {
        let _ = writeln!(out, "Wall: ({}, {}); {}", wall.x, wall.y, wall.direction);
    }
    for (pos, count) in world.beepers() {
        let _ = writeln!(out, "Beeper: ({}, {}); {}", pos.x, pos.y, count);
    }
    let _ = writeln!(
        out,
        "Karel: ({}, {}); {}",
        world.agent.x, world.agent.y, world.agent.facing
    );
    let _ = writeln!(out, "BeeperBag: {}", world.bag);
    out
}

// ── Declarations ──────────────────────────────────────────────────────

fn apply_dimension(world: &mut World, params: &str) -> bool {
    match search(params, |s| s.coords()) {
        Some((w, h)) if w > 0 && h > 0 => {
            world.width = w;
            world.height = h;
            true
        }
        _ => false,
    }
}

fn apply_wall(world: &mut World, params: &str) -> bool {
    match search(params, |s| s.coords_then_direction()) {
        Some((x, y, direction)) => {
            world.add_wall(Wall::new(x, y, direction));
            true
        }
        None => false,
    }
}

fn apply_beeper(world: &mut World, params: &str) -> bool {
    let found = search(params, |s| {
        let (x, y) = s.coords()?;
        s.expect(b';')?;
        s.skip_whitespace();
        Some((x, y, s.number()?))
    });
    match found {
        Some((x, y, count)) => {
            // Later declarations for the same cell replace earlier ones.
            world.set_beepers(Position::new(x, y), count);
            true
        }
        None => false,
    }
}

fn apply_karel(world: &mut World, params: &str) -> bool {
    match search(params, |s| s.coords_then_direction()) {
        Some((x, y, facing)) => {
            world.agent = Pose::new(x, y, facing);
            true
        }
        None => false,
    }
}

/// `infinity`/`infinite` or a count read from the leading digits; anything else is 0.
fn parse_bag(params: &str) -> BeeperBag {
    if params == "infinity" || params == "infinite" {
        return BeeperBag::Unbounded;
    }
    let digits = params.strip_prefix('+').unwrap_or(params);
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return BeeperBag::EMPTY;
    }
    BeeperBag::Finite(digits.parse().unwrap_or(u32::MAX))
}

// ── Scanner ───────────────────────────────────────────────────────────

/// Byte cursor over a parameter string.
struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Some(())
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        &self.src[start..self.pos]
    }

    fn number(&mut self) -> Option<u32> {
        let digits = self.take_while(|b| b.is_ascii_digit());
        std::str::from_utf8(digits).ok()?.parse().ok()
    }

    fn word(&mut self) -> Option<&'a str> {
        let word = self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        if word.is_empty() {
            return None;
        }
        std::str::from_utf8(word).ok()
    }

    /// `(X, Y)` with optional whitespace after the comma.
    fn coords(&mut self) -> Option<(u32, u32)> {
        self.expect(b'(')?;
        let x = self.number()?;
        self.expect(b',')?;
        self.skip_whitespace();
        let y = self.number()?;
        self.expect(b')')?;
        Some((x, y))
    }

    /// `(X, Y); direction`
    fn coords_then_direction(&mut self) -> Option<(u32, u32, Direction)> {
        let (x, y) = self.coords()?;
        self.expect(b';')?;
        self.skip_whitespace();
        let direction = self.word()?.parse().ok()?;
        Some((x, y, direction))
    }
}

/// Try `pattern` at every `(` in `params`, returning the leftmost match.
fn search<T>(params: &str, pattern: impl Fn(&mut Scanner<'_>) -> Option<T>) -> Option<T> {
    params
        .match_indices('(')
        .find_map(|(pos, _)| {
            let mut scanner = Scanner {
                src: params.as_bytes(),
                pos,
            };
            pattern(&mut scanner)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_empty_text() {
        assert_eq!(parse_world(""), World::default());
    }

    #[test]
    fn test_parse_bag_variants() {
        assert_eq!(parse_bag("infinity"), BeeperBag::Unbounded);
        assert_eq!(parse_bag("infinite"), BeeperBag::Unbounded);
        assert_eq!(parse_bag("12"), BeeperBag::Finite(12));
        assert_eq!(parse_bag("3 beepers"), BeeperBag::Finite(3));
        assert_eq!(parse_bag("lots"), BeeperBag::EMPTY);
        assert_eq!(parse_bag("-4"), BeeperBag::EMPTY);
        assert_eq!(parse_bag(""), BeeperBag::EMPTY);
    }

    #[test]
    fn test_search_finds_later_match() {
        let found = search("(a) (2, 3)", |s| s.coords());
        assert_eq!(found, Some((2, 3)));
    }

    #[test]
    fn test_coords_reject_space_before_comma() {
        assert_eq!(search("(2 , 3)", |s| s.coords()), None);
        assert_eq!(search("(2,3)", |s| s.coords()), Some((2, 3)));
        assert_eq!(search("(2,    3)", |s| s.coords()), Some((2, 3)));
    }
}
