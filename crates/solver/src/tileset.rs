//! Tile rules for the reference solver.
//!
//! Every tile carries one socket label per face. Two cells are compatible
//! across a face when the touching sockets carry the same label. Rotations
//! are quarter turns about +Z, so they only permute the four side sockets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use voxscape_common::{Face, TileId};

/// Socket label on one face of a tile.
pub type Socket = u8;

/// Maximum number of tile variants (tile × rotation); one bit per variant in a
/// cell's domain mask.
pub const MAX_VARIANTS: usize = 64;

/// Which quarter-turn rotations of a tile are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotations {
    One,
    Two,
    Four,
}

impl Rotations {
    fn count(self) -> u8 {
        match self {
            Rotations::One => 1,
            Rotations::Two => 2,
            Rotations::Four => 4,
        }
    }
}

/// Declaration of one tile type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRule {
    pub id: TileId,
    pub weight: f32,
    /// Socket labels in `Face::ALL` order: +X, -X, +Y, -Y, +Z, -Z.
    pub sockets: [Socket; 6],
    pub rotations: Rotations,
}

/// A tile in one specific orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub rule: usize,
    /// Quarter turns counter-clockwise about +Z.
    pub turns: u8,
    pub sockets: [Socket; 6],
}

/// Errors from tile set construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TileSetError {
    #[error("tile set is empty")]
    Empty,
    #[error("duplicate tile id: {0}")]
    Duplicate(TileId),
    #[error("tile {0} has a non-positive weight")]
    NonPositiveWeight(TileId),
    #[error("{count} variants exceed the limit of {MAX_VARIANTS}")]
    TooManyVariants { count: usize },
}

/// Validated tile rules with precomputed adjacency masks.
#[derive(Debug, Clone)]
pub struct TileSet {
    rules: Vec<TileRule>,
    variants: Vec<Variant>,
    /// `compat[v][face]` = mask of variants allowed on the far side of `face`.
    compat: Vec<[u64; 6]>,
}

impl TileSet {
    pub fn new(rules: Vec<TileRule>) -> Result<Self, TileSetError> {
        if rules.is_empty() {
            return Err(TileSetError::Empty);
        }
        let mut seen = BTreeSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.clone()) {
                return Err(TileSetError::Duplicate(rule.id.clone()));
            }
            if rule.weight <= 0.0 || !rule.weight.is_finite() {
                return Err(TileSetError::NonPositiveWeight(rule.id.clone()));
            }
        }

        let variants: Vec<Variant> = rules
            .iter()
            .enumerate()
            .flat_map(|(rule, r)| {
                (0..r.rotations.count()).map(move |turns| Variant {
                    rule,
                    turns,
                    sockets: rotate_sockets(r.sockets, turns),
                })
            })
            .collect();
        if variants.len() > MAX_VARIANTS {
            return Err(TileSetError::TooManyVariants {
                count: variants.len(),
            });
        }

        let compat = variants
            .iter()
            .map(|a| {
                let mut faces = [0u64; 6];
                for face in Face::ALL {
                    for (j, b) in variants.iter().enumerate() {
                        if a.sockets[face.index()] == b.sockets[face.opposite().index()] {
                            faces[face.index()] |= 1 << j;
                        }
                    }
                }
                faces
            })
            .collect();

        Ok(Self {
            rules,
            variants,
            compat,
        })
    }

    /// The castle-wall tile set the default mesh catalog is authored for.
    ///
    /// Every side pattern of wall / air sockets has a flat tile, so the set
    /// only contradicts through the two-storey junction.
    pub fn castle() -> Self {
        const AIR: Socket = 0;
        const GROUND: Socket = 1;
        const WALL: Socket = 2;
        const TOWER: Socket = 3;
        let rule = |id: &str, weight: f32, sockets: [Socket; 6], rotations| TileRule {
            id: TileId::from(id),
            weight,
            sockets,
            rotations,
        };
        let rules = vec![
            rule("empty", 3.0, [AIR; 6], Rotations::One),
            rule(
                "ground",
                1.0,
                [GROUND, GROUND, GROUND, GROUND, AIR, AIR],
                Rotations::One,
            ),
            rule(
                "WallGate2",
                0.5,
                [WALL, AIR, AIR, AIR, AIR, AIR],
                Rotations::Four,
            ),
            rule(
                "WallStraight1",
                1.0,
                [WALL, WALL, AIR, AIR, AIR, AIR],
                Rotations::Two,
            ),
            rule(
                "WallGate1",
                0.3,
                [WALL, WALL, AIR, AIR, AIR, AIR],
                Rotations::Two,
            ),
            rule(
                "WallCurved1",
                0.6,
                [WALL, AIR, WALL, AIR, AIR, AIR],
                Rotations::Four,
            ),
            rule(
                "WallJunction1",
                0.4,
                [WALL, WALL, WALL, AIR, AIR, AIR],
                Rotations::Four,
            ),
            rule(
                "WallJunction_Middle",
                0.2,
                [WALL, WALL, WALL, WALL, AIR, AIR],
                Rotations::One,
            ),
            rule(
                "WallJunction_Tall",
                0.2,
                [WALL, WALL, WALL, WALL, TOWER, AIR],
                Rotations::One,
            ),
            rule(
                "WallJunction_TallUpper",
                0.2,
                [AIR, AIR, AIR, AIR, AIR, TOWER],
                Rotations::One,
            ),
        ];
        match Self::new(rules) {
            Ok(set) => set,
            Err(e) => unreachable!("castle tile set is malformed: {e}"),
        }
    }

    pub fn rules(&self) -> &[TileRule] {
        &self.rules
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Mask with every variant set.
    pub fn full_mask(&self) -> u64 {
        match self.variants.len() {
            MAX_VARIANTS => u64::MAX,
            n => (1u64 << n) - 1,
        }
    }

    /// Mask of every variant of the named tiles. Unknown ids contribute nothing.
    pub fn mask_of<'a>(&self, ids: impl IntoIterator<Item = &'a TileId>) -> u64 {
        let ids: BTreeSet<&str> = ids.into_iter().map(TileId::as_str).collect();
        self.variants
            .iter()
            .enumerate()
            .filter(|(_, v)| ids.contains(self.rules[v.rule].id.as_str()))
            .fold(0, |mask, (i, _)| mask | 1 << i)
    }

    /// Variants allowed across `face` from a cell holding any of `mask`.
    pub fn allowed_across(&self, mask: u64, face: Face) -> u64 {
        let mut allowed = 0;
        let mut m = mask;
        while m != 0 {
            let v = m.trailing_zeros() as usize;
            allowed |= self.compat[v][face.index()];
            m &= m - 1;
        }
        allowed
    }

    pub fn tile_of(&self, variant: usize) -> &TileRule {
        &self.rules[self.variants[variant].rule]
    }
}

/// Rotate side sockets by `turns` quarter turns counter-clockwise about +Z.
///
/// A quarter turn carries +X → +Y → -X → -Y → +X.
fn rotate_sockets(sockets: [Socket; 6], turns: u8) -> [Socket; 6] {
    let mut s = sockets;
    for _ in 0..turns {
        let [px, nx, py, ny, pz, nz] = s;
        s = [ny, py, px, nx, pz, nz];
    }
    s
}
