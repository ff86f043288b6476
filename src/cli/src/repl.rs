use std::{
    io,
    str::FromStr,
    thread,
    time::{Duration, Instant},
};

use color_eyre::eyre::{WrapErr, eyre};
use crossbeam_channel::{Receiver, at, never, select, unbounded};
use log::{debug, warn};
use player::{Player, Speed};

use crate::net;

const HELP: &str = "\
n, next          apply the next step (an empty line does the same)
p, prev, previous
                 go back one step
r, reset         back to the solved cube, stops playing
play             step automatically until the end
stop, pause      stop stepping automatically
t, toggle        play or pause
speed <S>        lazy, normal, swift, expert or a number of milliseconds
g, goto <K>      show the cube after K steps, 0 is the solved cube
load <ALG>       play a different algorithm on the same cube
show             print the cube again
h, help, ?       print this list
q, quit, exit    leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Reset,
    Play,
    Pause,
    Toggle,
    Speed(Duration),
    Goto(usize),
    Load(String),
    Show,
    Help,
    Quit,
}

fn parse_interval(text: &str) -> color_eyre::Result<Duration> {
    if let Ok(ms) = text.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }

    Ok(text.parse::<Speed>()?.interval())
}

impl FromStr for Command {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (word, rest) = s
            .split_once(char::is_whitespace)
            .map_or((s, ""), |(word, rest)| (word, rest.trim()));

        Ok(match word {
            "" | "n" | "next" => Command::Next,
            "p" | "prev" | "previous" => Command::Previous,
            "r" | "reset" => Command::Reset,
            "play" => Command::Play,
            "stop" | "pause" => Command::Pause,
            "t" | "toggle" => Command::Toggle,
            "speed" => Command::Speed(parse_interval(rest)?),
            "g" | "goto" => Command::Goto(
                rest.parse()
                    .wrap_err_with(|| format!("`{rest}` is not a number of steps"))?,
            ),
            "load" => Command::Load(rest.to_owned()),
            "show" => Command::Show,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(eyre!("Unknown command `{word}`, try `help`")),
        })
    }
}

fn execute(player: &mut Player, command: &Command, color: bool) {
    let now = Instant::now();

    match *command {
        Command::Next => {
            if !player.next() {
                eprintln!("Already at the last step");
                return;
            }
        }
        Command::Previous => {
            if !player.previous() {
                eprintln!("Already at the solved cube");
                return;
            }
        }
        Command::Reset => player.reset(),
        Command::Play => {
            if !player.play(now) {
                eprintln!("Nothing left to play, `reset` to start over");
            }
            return;
        }
        Command::Pause => {
            player.pause();
            return;
        }
        Command::Toggle => {
            player.toggle_play(now);
            return;
        }
        Command::Speed(interval) => {
            player.set_interval(interval, now);
            eprintln!("Stepping every {interval:?}");
            return;
        }
        Command::Goto(applied) => {
            if let Err(e) = player.seek(applied.checked_sub(1)) {
                eprintln!("{e}");
                return;
            }
        }
        Command::Load(ref algorithm) => {
            let order = player.order();
            player.load(algorithm, order);
        }
        Command::Show => {}
        Command::Help => {
            eprintln!("{HELP}");
            return;
        }
        Command::Quit => return,
    }

    net::show(player, color);
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();

    thread::spawn(move || {
        for line in io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!(target: "repl", "Failed to read stdin: {e}");
                    break;
                }
            }
        }
    });

    rx
}

/// Read commands from stdin until `quit` or the end of input, stepping
/// automatically in between while playing
pub fn run(mut player: Player, color: bool) {
    eprintln!("Type `help` for the list of commands");
    net::show(&player, color);

    let mut input = spawn_stdin_reader();
    let mut input_open = true;

    loop {
        let wake = match player.next_deadline(Instant::now()) {
            Some(deadline) => at(deadline),
            // Nothing is scheduled and nothing more can be typed
            None if !input_open => break,
            None => never(),
        };

        let mut closed = false;
        select! {
            recv(input) -> line => match line {
                Ok(line) => match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => {
                        debug!(target: "repl", "{command:?}");
                        execute(&mut player, &command, color);
                    }
                    Err(e) => eprintln!("{e}"),
                },
                Err(_) => closed = true,
            },
            recv(wake) -> _ => {
                if player.poll(Instant::now()).is_some() {
                    net::show(&player, color);
                }
            },
        }

        if closed {
            debug!(target: "repl", "Input closed");
            input = never();
            input_open = false;
        }
    }
}
