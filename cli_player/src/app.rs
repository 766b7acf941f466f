use merge_core::{CellCoord, CellView, GeoPosition, Notification, Presenter, SaveStore, Session, StepDirection};

/// One parsed line of player input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Step(StepDirection),
    Interact(CellCoord),
    Mode(ModeArg),
    Feed(GeoPosition),
    Look,
    NewGame,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Manual,
    Gps,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err("empty command".to_string());
    };
    let command = match head {
        "n" | "north" => Command::Step(StepDirection::North),
        "s" | "south" => Command::Step(StepDirection::South),
        "e" | "east" => Command::Step(StepDirection::East),
        "w" | "west" => Command::Step(StepDirection::West),
        "take" => {
            let arg = words.next().ok_or("usage: take I,J")?;
            let (i, j) = arg.split_once(',').ok_or("usage: take I,J")?;
            let i = i.trim().parse::<i32>().map_err(|err| err.to_string())?;
            let j = j.trim().parse::<i32>().map_err(|err| err.to_string())?;
            Command::Interact(CellCoord::new(i, j))
        }
        "mode" => match words.next() {
            Some("gps") => Command::Mode(ModeArg::Gps),
            Some("manual") => Command::Mode(ModeArg::Manual),
            _ => return Err("usage: mode gps|manual".to_string()),
        },
        "feed" => {
            let lat = words
                .next()
                .ok_or("usage: feed LAT LON")?
                .parse::<f64>()
                .map_err(|err| err.to_string())?;
            let lon = words
                .next()
                .ok_or("usage: feed LAT LON")?
                .parse::<f64>()
                .map_err(|err| err.to_string())?;
            Command::Feed(GeoPosition::new(lat, lon))
        }
        "look" | "l" => Command::Look,
        "new" => Command::NewGame,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}, try 'help'")),
    };
    if words.next().is_some() {
        return Err("trailing arguments, try 'help'".to_string());
    }
    Ok(command)
}

pub const HELP: &str = "\
commands:
  n / s / e / w      step one cell (manual mode)
  take I,J           interact with cell I,J (pickup / drop / merge)
  mode gps|manual    switch movement driver
  feed LAT LON       push a simulated device position update
  look               redraw the grid
  new                start a new game (clears the save slot)
  quit               exit";

/// Prints everything the core reports; the terminal stand-in for the map
/// collaborator.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn refresh_cell(&mut self, view: CellView) {
        match view.content {
            Some(token) => println!("  [cell {}] now shows {token}", view.coord),
            None => println!("  [cell {}] now empty", view.coord),
        }
    }

    fn center_on(&mut self, position: GeoPosition) {
        println!("  [camera] centered on {position}");
    }

    fn notify(&mut self, notification: Notification) {
        println!("  >> {notification}");
    }
}

/// ASCII rendering of the square window around the player, north at the top.
pub fn render_grid<S: SaveStore>(session: &Session<S>, radius: u32) -> String {
    let player = session.player_cell();
    let views = session.view(radius);
    let side = (radius * 2 + 1) as usize;

    let mut out = String::new();
    // `view` walks di ascending; flip so north is the first row.
    for row in (0..side).rev() {
        for col in 0..side {
            let view = &views[row * side + col];
            let value = match view.content {
                Some(token) => token.to_string(),
                None => ".".to_string(),
            };
            let glyph = if view.coord == player {
                format!("[{value}]")
            } else {
                value
            };
            out.push_str(&format!("{glyph:>6} "));
        }
        out.push('\n');
    }
    let held = match session.state().held {
        Some(token) => token.to_string(),
        None => "nothing".to_string(),
    };
    out.push_str(&format!(
        "player at cell {player}, holding {held}, goal {}\n",
        session.config().win_threshold
    ));
    out
}
