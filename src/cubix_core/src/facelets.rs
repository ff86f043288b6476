use std::{
    fmt,
    ops::{Index, IndexMut},
};

use itertools::Itertools;

use crate::CubeOrder;

/// The six sticker colors. Every face starts out in its own color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Yellow,
    Orange,
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Self; 6] = {
        use Color::*;
        [White, Yellow, Orange, Red, Green, Blue]
    };

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Color::White => 'W',
            Color::Yellow => 'Y',
            Color::Orange => 'O',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Blue => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Face {
    U,
    D,
    L,
    R,
    F,
    B,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [U, D, L, R, F, B];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// The color this face carries when the cube is solved
    #[must_use]
    pub fn color(self) -> Color {
        match self {
            Face::U => Color::White,
            Face::D => Color::Yellow,
            Face::L => Color::Orange,
            Face::R => Color::Red,
            Face::F => Color::Green,
            Face::B => Color::Blue,
        }
    }
}

/// An N×N grid of stickers in the face's own frame: rows go down, columns go
/// right.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FaceGrid {
    size: usize,
    cells: Box<[Color]>,
}

impl FaceGrid {
    #[must_use]
    pub fn filled(size: usize, color: Color) -> FaceGrid {
        FaceGrid {
            size,
            cells: vec![color; size * size].into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.cells.chunks_exact(self.size)
    }

    #[must_use]
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    #[must_use]
    pub fn is_uniform(&self) -> bool {
        self.cells.iter().all_equal()
    }

    /// Turn the grid a quarter clockwise: the sticker at (r, c) lands on
    /// (c, N-1-r).
    #[must_use]
    pub fn rotated_clockwise(&self) -> FaceGrid {
        let last = self.size - 1;
        let mut out = self.clone();
        for (r, c) in (0..self.size).cartesian_product(0..self.size) {
            out[(c, last - r)] = self[(r, c)];
        }
        out
    }

    /// Turn the grid a quarter counter-clockwise: the sticker at (r, c) lands
    /// on (N-1-c, r).
    #[must_use]
    pub fn rotated_counter_clockwise(&self) -> FaceGrid {
        let last = self.size - 1;
        let mut out = self.clone();
        for (r, c) in (0..self.size).cartesian_product(0..self.size) {
            out[(last - c, r)] = self[(r, c)];
        }
        out
    }
}

impl Index<(usize, usize)> for FaceGrid {
    type Output = Color;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(row < self.size && col < self.size);
        &self.cells[row * self.size + col]
    }
}

impl IndexMut<(usize, usize)> for FaceGrid {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        debug_assert!(row < self.size && col < self.size);
        &mut self.cells[row * self.size + col]
    }
}

impl fmt::Debug for FaceGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rows().map(|row| row.iter().join("")))
            .finish()
    }
}

/// Every sticker of an N×N cube. All six faces are always present and always
/// N×N.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CubeState {
    order: CubeOrder,
    faces: [FaceGrid; 6],
}

impl CubeState {
    #[must_use]
    pub fn solved(order: CubeOrder) -> CubeState {
        CubeState {
            order,
            faces: Face::ALL.map(|face| FaceGrid::filled(order.get(), face.color())),
        }
    }

    #[must_use]
    pub fn order(&self) -> CubeOrder {
        self.order
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        Face::ALL
            .iter()
            .all(|&face| self[face].cells().iter().all(|&color| color == face.color()))
    }

    /// Every sticker, face by face in `Face::ALL` order
    pub fn facelets(&self) -> impl Iterator<Item = Color> + '_ {
        self.faces.iter().flat_map(|grid| grid.cells().iter().copied())
    }

    /// How many stickers of each color the cube carries, indexed like
    /// `Color::ALL`
    #[must_use]
    pub fn color_counts(&self) -> [usize; 6] {
        let mut counts = [0; 6];
        for color in self.facelets() {
            counts[color as usize] += 1;
        }
        counts
    }
}

impl Index<Face> for CubeState {
    type Output = FaceGrid;

    fn index(&self, face: Face) -> &Self::Output {
        &self.faces[face as usize]
    }
}

impl IndexMut<Face> for CubeState {
    fn index_mut(&mut self, face: Face) -> &mut Self::Output {
        &mut self.faces[face as usize]
    }
}

impl fmt::Debug for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for face in Face::ALL {
            map.entry(&face, &self[face]);
        }
        map.finish()
    }
}

/// Prints the unfolded net: U on top, then L F R B side by side, then D.
impl fmt::Display for CubeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.order.get();
        let indent = " ".repeat(size * 2 + 1);
        let row_text = |face: Face, row: usize| {
            (0..size).map(|col| self[face][(row, col)]).join(" ")
        };

        for row in 0..size {
            writeln!(f, "{indent}{}", row_text(Face::U, row))?;
        }
        for row in 0..size {
            let band = [Face::L, Face::F, Face::R, Face::B]
                .into_iter()
                .map(|face| row_text(face, row))
                .join("  ");
            writeln!(f, "{band}")?;
        }
        for row in 0..size {
            writeln!(f, "{indent}{}", row_text(Face::D, row))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(size: usize) -> FaceGrid {
        // Give each cell a distinguishable color so rotations can be traced
        let mut grid = FaceGrid::filled(size, Color::White);
        for (i, cell) in grid.cells.iter_mut().enumerate() {
            *cell = Color::ALL[i % 6];
        }
        grid
    }

    #[test]
    fn solved_faces_carry_their_color() {
        let state = CubeState::solved(CubeOrder::new(4).unwrap());
        assert!(state.is_solved());
        for face in Face::ALL {
            assert_eq!(state[face].size(), 4);
            assert!(state[face].is_uniform());
            assert_eq!(state[face][(3, 0)], face.color());
        }
        assert_eq!(state.color_counts(), [16; 6]);
    }

    #[test]
    fn clockwise_rotation_moves_the_top_row_to_the_right_column() {
        let grid = numbered(3);
        let rotated = grid.rotated_clockwise();
        for c in 0..3 {
            assert_eq!(rotated[(c, 2)], grid[(0, c)]);
        }
        assert_eq!(rotated[(1, 1)], grid[(1, 1)]);
    }

    #[test]
    fn counter_clockwise_undoes_clockwise() {
        for size in 2..=5 {
            let grid = numbered(size);
            assert_eq!(grid.rotated_clockwise().rotated_counter_clockwise(), grid);

            let thrice = grid
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(thrice, grid.rotated_counter_clockwise());
        }
    }

    #[test]
    fn net_layout() {
        let state = CubeState::solved(CubeOrder::new(2).unwrap());
        let expected = concat!(
            "     W W\n",
            "     W W\n",
            "O O  G G  R R  B B\n",
            "O O  G G  R R  B B\n",
            "     Y Y\n",
            "     Y Y\n",
        );
        assert_eq!(state.to_string(), expected);

        let lines = CubeState::solved(CubeOrder::new(3).unwrap())
            .to_string()
            .lines()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        assert_eq!(lines[0], "       W W W");
        assert_eq!(lines[3], "O O O  G G G  R R R  B B B");
        assert_eq!(lines[8], "       Y Y Y");
    }
}
