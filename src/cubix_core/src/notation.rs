use std::{fmt, str::FromStr};

use log::trace;
use thiserror::Error;

use crate::Face;

/// The layer a move letter names: one of the six faces or one of the three
/// slices
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveBase {
    U,
    D,
    L,
    R,
    F,
    B,
    M,
    E,
    S,
}

impl MoveBase {
    pub const ALL: [Self; 9] = {
        use MoveBase::*;
        let v = [U, D, L, R, F, B, M, E, S];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// Read a move letter. The flag is set when the letter was lowercase,
    /// which marks a wide move.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<(MoveBase, bool)> {
        let base = match letter.to_ascii_uppercase() {
            'U' => MoveBase::U,
            'D' => MoveBase::D,
            'L' => MoveBase::L,
            'R' => MoveBase::R,
            'F' => MoveBase::F,
            'B' => MoveBase::B,
            'M' => MoveBase::M,
            'E' => MoveBase::E,
            'S' => MoveBase::S,
            _ => return None,
        };

        Some((base, letter.is_ascii_lowercase()))
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            MoveBase::U => 'U',
            MoveBase::D => 'D',
            MoveBase::L => 'L',
            MoveBase::R => 'R',
            MoveBase::F => 'F',
            MoveBase::B => 'B',
            MoveBase::M => 'M',
            MoveBase::E => 'E',
            MoveBase::S => 'S',
        }
    }

    /// The face that turns along with this move, if the move is a face turn
    #[must_use]
    pub fn face(self) -> Option<Face> {
        match self {
            MoveBase::U => Some(Face::U),
            MoveBase::D => Some(Face::D),
            MoveBase::L => Some(Face::L),
            MoveBase::R => Some(Face::R),
            MoveBase::F => Some(Face::F),
            MoveBase::B => Some(Face::B),
            MoveBase::M | MoveBase::E | MoveBase::S => None,
        }
    }

    #[must_use]
    pub fn is_slice(self) -> bool {
        self.face().is_none()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Direction {
    Clockwise,
    Half,
    CounterClockwise,
}

impl Direction {
    /// How many clockwise quarter turns make up this direction
    #[must_use]
    pub fn quarter_turns(self) -> usize {
        match self {
            Direction::Clockwise => 1,
            Direction::Half => 2,
            Direction::CounterClockwise => 3,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Direction {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::Half => Direction::Half,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Direction::Clockwise => "",
            Direction::Half => "2",
            Direction::CounterClockwise => "'",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    base: MoveBase,
    direction: Direction,
    wide: bool,
}

impl Move {
    #[must_use]
    pub fn new(base: MoveBase, direction: Direction) -> Move {
        Move {
            base,
            direction,
            wide: false,
        }
    }

    #[must_use]
    pub fn widened(self) -> Move {
        Move { wide: true, ..self }
    }

    #[must_use]
    pub fn base(self) -> MoveBase {
        self.base
    }

    #[must_use]
    pub fn direction(self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn is_wide(self) -> bool {
        self.wide
    }

    #[must_use]
    pub fn quarter_turns(self) -> usize {
        self.direction.quarter_turns()
    }

    /// The move that undoes this one
    #[must_use]
    pub fn inverse(self) -> Move {
        Move {
            direction: self.direction.inverse(),
            ..self
        }
    }

    /// Read one move the lenient way: the first character picks the layer, a
    /// `2` anywhere makes it a half turn, otherwise a `'` anywhere makes it
    /// counter-clockwise. A lowercase letter or a `w` anywhere makes it wide.
    /// Anything else in the token is ignored.
    #[must_use]
    pub fn parse_lenient(text: &str) -> Option<Move> {
        let mut chars = text.chars();
        let (base, lowercase) = MoveBase::from_letter(chars.next()?)?;
        let rest = chars.as_str();

        let direction = if rest.contains('2') {
            Direction::Half
        } else if rest.contains('\'') {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        };

        Some(Move {
            base,
            direction,
            wide: lowercase || rest.contains('w'),
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0:?} does not start with a move letter")]
pub struct UnknownMove(pub String);

impl FromStr for Move {
    type Err = UnknownMove;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse_lenient(s).ok_or_else(|| UnknownMove(s.to_owned()))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base.letter())?;
        if self.wide && !self.base.is_slice() {
            write!(f, "w")?;
        }
        write!(f, "{}", self.direction.suffix())
    }
}

/// One step of an algorithm: the move as it was written alongside the move it
/// denotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: Box<str>,
    move_: Move,
}

impl Token {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn as_move(&self) -> Move {
        self.move_
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Remove every `(...)` group. An opening parenthesis that is never closed is
/// kept as ordinary text.
fn strip_comments(algorithm: &str) -> String {
    let mut out = String::with_capacity(algorithm.len());
    let mut rest = algorithm;

    while let Some(open) = rest.find('(') {
        let Some(close) = rest[open..].find(')') else {
            break;
        };

        out.push_str(&rest[..open]);
        trace!(target: "notation", "Dropping comment {:?}", &rest[open..=open + close]);
        rest = &rest[open + close + 1..];
    }

    out.push_str(rest);
    out
}

/// Split an algorithm into the steps to play. Parenthesized commentary is
/// dropped and any fragment that does not start with a move letter is skipped
/// rather than reported.
#[must_use]
pub fn parse_algorithm(algorithm: &str) -> Vec<Token> {
    strip_comments(algorithm)
        .split_whitespace()
        .filter_map(|fragment| match Move::parse_lenient(fragment) {
            Some(move_) => Some(Token {
                text: fragment.into(),
                move_,
            }),
            None => {
                trace!(target: "notation", "Skipping fragment {fragment:?}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(algorithm: &str) -> Vec<String> {
        parse_algorithm(algorithm)
            .iter()
            .map(|token| token.text().to_owned())
            .collect()
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(texts("R U (hold 2 sec) F'"), ["R", "U", "F'"]);
        assert_eq!(texts("(repeat 3 times) R2 (x) (y)"), ["R2"]);
        // Comments glue their neighbours together, like the catalog's text does
        assert_eq!(texts("R(x)U"), ["RU"]);
        assert_eq!(texts("R (unclosed U"), ["R", "U"]);
    }

    #[test]
    fn empty_algorithms() {
        assert!(parse_algorithm("").is_empty());
        assert!(parse_algorithm(" \t\n ").is_empty());
        assert!(parse_algorithm("(only a comment)").is_empty());
    }

    #[test]
    fn illegal_fragments_are_skipped() {
        assert_eq!(texts("x R y2 z' 42 U , D"), ["R", "U", "D"]);
        assert_eq!(texts("R, U. F!"), ["R,", "U.", "F!"]);
    }

    #[test]
    fn modifiers() {
        let parse = |text: &str| Move::parse_lenient(text).unwrap();

        assert_eq!(parse("R").direction(), Direction::Clockwise);
        assert_eq!(parse("R'").direction(), Direction::CounterClockwise);
        assert_eq!(parse("R2").direction(), Direction::Half);
        // The half turn marker wins over a prime
        assert_eq!(parse("R2'").direction(), Direction::Half);
        assert_eq!(parse("R'2").direction(), Direction::Half);
        assert_eq!(parse("R'!").direction(), Direction::CounterClockwise);

        assert_eq!(parse("R").quarter_turns(), 1);
        assert_eq!(parse("R2").quarter_turns(), 2);
        assert_eq!(parse("R'").quarter_turns(), 3);
    }

    #[test]
    fn wide_markers() {
        let parse = |text: &str| Move::parse_lenient(text).unwrap();

        assert!(!parse("R").is_wide());
        assert!(parse("Rw").is_wide());
        assert!(parse("Rw2").is_wide());
        assert!(parse("r").is_wide());
        assert!(parse("u'").is_wide());
        assert_eq!(parse("r'").base(), MoveBase::R);

        // Lowercase slices are read like their uppercase letters
        assert_eq!(parse("m").base(), MoveBase::M);
        assert_eq!(parse("m").to_string(), "M");
    }

    #[test]
    fn display_and_inverse() {
        let moves = ["R", "U'", "F2", "Lw'", "M2", "S'"];
        for text in moves {
            assert_eq!(text.parse::<Move>().unwrap().to_string(), text);
        }

        assert_eq!(Move::parse_lenient("r").unwrap().to_string(), "Rw");
        assert_eq!(Move::parse_lenient("R'").unwrap().inverse().to_string(), "R");
        assert_eq!(Move::parse_lenient("Uw").unwrap().inverse().to_string(), "Uw'");
        assert_eq!(Move::parse_lenient("E2").unwrap().inverse().to_string(), "E2");
        assert_eq!("Q".parse::<Move>(), Err(UnknownMove("Q".to_owned())));
        assert_eq!("".parse::<Move>(), Err(UnknownMove(String::new())));
        assert_eq!(
            UnknownMove("x2".to_owned()).to_string(),
            "\"x2\" does not start with a move letter"
        );
    }

    #[test]
    fn tokens_keep_their_text() {
        let tokens = parse_algorithm("Rw2 u' M2");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].to_string(), "Rw2");
        assert_eq!(tokens[1].as_move(), Move::new(MoveBase::U, Direction::CounterClockwise).widened());
        assert_eq!(tokens[2].as_move(), Move::new(MoveBase::M, Direction::Half));
    }
}
