use cubix_core::{Color, CubeState, Face};
use itertools::Itertools;
use owo_colors::{DynColors, OwoColorize};
use player::Player;

fn paint(color: Color) -> DynColors {
    match color {
        Color::White => DynColors::Rgb(0xff, 0xff, 0xff),
        Color::Yellow => DynColors::Rgb(0xff, 0xd5, 0x00),
        Color::Orange => DynColors::Rgb(0xff, 0x58, 0x00),
        Color::Red => DynColors::Rgb(0xc4, 0x1e, 0x3a),
        Color::Green => DynColors::Rgb(0x00, 0x9e, 0x60),
        Color::Blue => DynColors::Rgb(0x00, 0x51, 0xba),
    }
}

/// The unfolded net, with every sticker drawn in its own color when `color`
/// is set
pub fn render(state: &CubeState, color: bool) -> String {
    if !color {
        return state.to_string();
    }

    let size = state.order().get();
    let indent = " ".repeat(size * 2 + 1);
    let row_text = |face: Face, row: usize| {
        state[face]
            .rows()
            .nth(row)
            .into_iter()
            .flatten()
            .map(|&sticker| sticker.letter().color(paint(sticker)).bold().to_string())
            .join(" ")
    };

    let mut out = String::new();
    for row in 0..size {
        out += &format!("{indent}{}\n", row_text(Face::U, row));
    }
    for row in 0..size {
        let band = [Face::L, Face::F, Face::R, Face::B]
            .into_iter()
            .map(|face| row_text(face, row))
            .join("  ");
        out += &format!("{band}\n");
    }
    for row in 0..size {
        out += &format!("{indent}{}\n", row_text(Face::D, row));
    }
    out
}

/// Every step on one line with the current one marked, followed by the
/// position
pub fn breadcrumb(player: &Player, color: bool) -> String {
    let steps = player
        .steps()
        .iter()
        .enumerate()
        .map(|(i, token)| {
            if Some(i) == player.step_index() {
                if color {
                    token.reversed().bold().to_string()
                } else {
                    format!("[{token}]")
                }
            } else {
                token.to_string()
            }
        })
        .join(" ");

    let applied = player.step_index().map_or(0, |k| k + 1);
    format!("{steps}\nStep {applied}/{}", player.len())
}

/// Print the breadcrumb and the net to stdout
pub fn show(player: &Player, color: bool) {
    println!("{}", breadcrumb(player, color));
    print!("{}", render(player.state(), color));
}

#[cfg(test)]
mod tests {
    use cubix_core::CubeOrder;

    use super::*;

    #[test]
    fn plain_net_is_the_display() {
        let player = Player::new("R U", CubeOrder::new(4).unwrap());
        assert_eq!(render(player.state(), false), player.state().to_string());
    }

    #[test]
    fn colored_net_keeps_the_letters() {
        let state = CubeState::solved(CubeOrder::new(3).unwrap());
        let net = render(&state, true);
        assert_eq!(net.lines().count(), 9);
        assert!(net.contains('W') && net.contains('Y') && net.contains('\u{1b}'));
    }

    #[test]
    fn breadcrumb_marks_the_current_step() {
        let mut player = Player::new("R U (x) F'", CubeOrder::new(3).unwrap());
        assert_eq!(breadcrumb(&player, false), "R U F'\nStep 0/3");

        player.next();
        player.next();
        assert_eq!(breadcrumb(&player, false), "R [U] F'\nStep 2/3");
    }
}
