//! Move application. Every letter is one row of `TURNS`: the face it spins
//! (if any), the layers it reaches, and the 4-cycle of sticker strips it
//! carries around the cube.

use std::ops::Range;

use itertools::Itertools;
use log::trace;

use crate::{CubeOrder, CubeState, Face, Move, MoveBase};

/// How one coordinate of a strip cell follows from the layer depth `d`
/// (0 is the layer touching the turning face) and the position `j` along the
/// strip
#[derive(Debug, Clone, Copy)]
enum Coord {
    /// `d`
    Near,
    /// `N-1-d`
    Far,
    /// `j`
    Along,
    /// `N-1-j`
    Against,
}

impl Coord {
    fn resolve(self, last: usize, depth: usize, j: usize) -> usize {
        match self {
            Coord::Near => depth,
            Coord::Far => last - depth,
            Coord::Along => j,
            Coord::Against => last - j,
        }
    }
}

/// A row or column of one face, described by how its cells are addressed
#[derive(Debug, Clone, Copy)]
struct Strip {
    face: Face,
    row: Coord,
    col: Coord,
}

impl Strip {
    fn cell(self, last: usize, depth: usize, j: usize) -> (usize, usize) {
        (
            self.row.resolve(last, depth, j),
            self.col.resolve(last, depth, j),
        )
    }
}

const fn strip(face: Face, row: Coord, col: Coord) -> Strip {
    Strip { face, row, col }
}

#[derive(Debug, Clone, Copy)]
enum Layers {
    /// The outer layer, plus the one behind it for wide moves
    Outer,
    /// The middle layer counted from the near side of the cycle
    Middle,
    /// The middle layer counted from the far side of the cycle
    MiddleFromFar,
}

#[derive(Debug)]
struct LayerTurn {
    spins: Option<Face>,
    layers: Layers,
    /// Each strip takes the stickers of the strip after it, and the last takes
    /// those of the first
    cycle: [Strip; 4],
}

use Coord::{Against, Along, Far, Near};

const U_CYCLE: [Strip; 4] = [
    strip(Face::F, Near, Along),
    strip(Face::R, Near, Along),
    strip(Face::B, Near, Along),
    strip(Face::L, Near, Along),
];

const D_CYCLE: [Strip; 4] = [
    strip(Face::F, Far, Along),
    strip(Face::L, Far, Along),
    strip(Face::B, Far, Along),
    strip(Face::R, Far, Along),
];

const R_CYCLE: [Strip; 4] = [
    strip(Face::U, Along, Far),
    strip(Face::F, Along, Far),
    strip(Face::D, Along, Far),
    strip(Face::B, Against, Near),
];

const L_CYCLE: [Strip; 4] = [
    strip(Face::U, Along, Near),
    strip(Face::B, Against, Far),
    strip(Face::D, Along, Near),
    strip(Face::F, Along, Near),
];

const F_CYCLE: [Strip; 4] = [
    strip(Face::U, Far, Along),
    strip(Face::L, Against, Far),
    strip(Face::D, Near, Against),
    strip(Face::R, Along, Near),
];

const B_CYCLE: [Strip; 4] = [
    strip(Face::U, Near, Along),
    strip(Face::R, Along, Far),
    strip(Face::D, Far, Against),
    strip(Face::L, Against, Near),
];

/// Indexed by `MoveBase`. The slices reuse the cycle of the face they run
/// parallel to: M follows L, E follows D, S follows F.
static TURNS: [LayerTurn; 9] = [
    LayerTurn {
        spins: Some(Face::U),
        layers: Layers::Outer,
        cycle: U_CYCLE,
    },
    LayerTurn {
        spins: Some(Face::D),
        layers: Layers::Outer,
        cycle: D_CYCLE,
    },
    LayerTurn {
        spins: Some(Face::L),
        layers: Layers::Outer,
        cycle: L_CYCLE,
    },
    LayerTurn {
        spins: Some(Face::R),
        layers: Layers::Outer,
        cycle: R_CYCLE,
    },
    LayerTurn {
        spins: Some(Face::F),
        layers: Layers::Outer,
        cycle: F_CYCLE,
    },
    LayerTurn {
        spins: Some(Face::B),
        layers: Layers::Outer,
        cycle: B_CYCLE,
    },
    LayerTurn {
        spins: None,
        layers: Layers::Middle,
        cycle: L_CYCLE,
    },
    LayerTurn {
        spins: None,
        layers: Layers::MiddleFromFar,
        cycle: D_CYCLE,
    },
    LayerTurn {
        spins: None,
        layers: Layers::MiddleFromFar,
        cycle: F_CYCLE,
    },
];

impl LayerTurn {
    fn of(base: MoveBase) -> &'static LayerTurn {
        &TURNS[base as usize]
    }

    /// The depths this turn reaches on a cube of the given order
    fn depths(&self, order: CubeOrder, wide: bool) -> Range<usize> {
        match self.layers {
            Layers::Outer if wide && order.has_inner_layer() => 0..2,
            Layers::Outer => 0..1,
            Layers::Middle if order.has_slices() => {
                let middle = order.middle();
                middle..middle + 1
            }
            Layers::MiddleFromFar if order.has_slices() => {
                let depth = order.last() - order.middle();
                depth..depth + 1
            }
            Layers::Middle | Layers::MiddleFromFar => 0..0,
        }
    }

    /// One clockwise quarter turn. Reads only from `snapshot` and writes only
    /// to the returned state.
    fn quarter_turn(&self, snapshot: &CubeState, depths: Range<usize>) -> CubeState {
        let order = snapshot.order();
        let last = order.last();
        let mut next = snapshot.clone();

        if let Some(face) = self.spins {
            next[face] = snapshot[face].rotated_clockwise();
        }

        for depth in depths {
            for (dest, src) in self.cycle.iter().circular_tuple_windows() {
                for j in 0..order.get() {
                    next[dest.face][dest.cell(last, depth, j)] =
                        snapshot[src.face][src.cell(last, depth, j)];
                }
            }
        }

        next
    }
}

/// Apply one move and return the resulting state. `state` is left untouched.
///
/// A half turn is two clockwise quarter turns and a prime is three. Slice
/// moves on a cube without a middle layer leave the stickers where they are,
/// and wide moves on a 2x2 only turn the outer layer.
#[must_use]
pub fn apply(state: &CubeState, move_: Move) -> CubeState {
    let turn = LayerTurn::of(move_.base());
    let depths = turn.depths(state.order(), move_.is_wide());

    if turn.spins.is_none() && depths.is_empty() {
        trace!(target: "turns", "{move_} has no layer to turn on a {} cube", state.order());
        return state.clone();
    }

    let mut next = turn.quarter_turn(state, depths.clone());
    for _ in 1..move_.quarter_turns() {
        next = turn.quarter_turn(&next, depths.clone());
    }
    next
}

/// Apply one move written in notation. Text that does not name a move leaves
/// the state as it was.
#[must_use]
pub fn apply_notation(state: &CubeState, text: &str) -> CubeState {
    match Move::parse_lenient(text) {
        Some(move_) => apply(state, move_),
        None => {
            trace!(target: "turns", "Ignoring unknown move {text:?}");
            state.clone()
        }
    }
}

impl CubeState {
    /// Apply a move, see `turns::apply`
    #[must_use]
    pub fn apply(&self, move_: Move) -> CubeState {
        apply(self, move_)
    }

    /// Apply every move in order
    #[must_use]
    pub fn apply_all(&self, moves: impl IntoIterator<Item = Move>) -> CubeState {
        moves
            .into_iter()
            .fold(self.clone(), |state, move_| apply(&state, move_))
    }
}
