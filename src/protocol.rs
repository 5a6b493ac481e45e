//! Line-oriented text protocol for playing against the engine.
//!
//! Each request is one line: an optional numeric id, a command and its
//! arguments. Each response is `=` (success) or `?` (failure), the id if one
//! was given, then the message and a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version` - Engine identification
//! - `list_commands` - List all supported commands
//! - `known_command <cmd>` - Check if a command is supported
//! - `quit` - Exit the program
//! - `board` - Show the board
//! - `status` - Scores, turns left, direction, held card and phase
//! - `play <pit>` - Sow from one of the player's pits (1-5)
//! - `card` - Play the held card
//! - `restart` - Start a new game
//!
//! ## Example
//!
//! ```ignore
//! use oanquan::game::GameConfig;
//! use oanquan::protocol::TextEngine;
//! let mut engine = TextEngine::new(GameConfig::default(), false);
//! engine.run()?;
//! ```

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use crate::board::Direction;
use crate::game::{ComputerTurn, Game, GameConfig, GameObserver, Pause};
use crate::endgame::FinalScore;

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "board",
    "card",
    "known_command",
    "list_commands",
    "name",
    "play",
    "quit",
    "restart",
    "status",
    "version",
];

/// Observer that collects notices for the next response and optionally
/// sleeps through pauses.
#[derive(Debug, Default)]
pub struct TextObserver {
    notices: Vec<String>,
    realtime: bool,
}

impl TextObserver {
    fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

impl GameObserver for TextObserver {
    fn notice(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn pause(&mut self, pause: Pause) {
        if self.realtime {
            std::thread::sleep(pause.duration());
        }
    }
}

/// Text front end around a [`Game`].
pub struct TextEngine {
    game: Game<TextObserver>,
}

impl TextEngine {
    /// `realtime` makes the engine wait out every animation pause.
    pub fn new(config: GameConfig, realtime: bool) -> Self {
        let observer = TextObserver {
            notices: Vec::new(),
            realtime,
        };
        Self {
            game: Game::with_observer(config, observer),
        }
    }

    pub fn game(&self) -> &Game<TextObserver> {
        &self.game
    }

    /// Run the command loop on stdin and stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        let (success, mut message) = match command {
            "name" => (true, "oanquan".to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "board" => (true, self.game.board().to_string()),

            "status" => (true, self.status()),

            "restart" => {
                self.game.restart();
                (true, self.game.board().to_string())
            }

            "play" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let Ok(pit) = args[0].parse::<usize>() else {
                    return (false, "invalid pit".to_string());
                };
                match self.game.select_pit(pit) {
                    Ok(report) => {
                        let mut out = format!(
                            "you sowed pit {pit} and captured {}\n",
                            report.sow.captured
                        );
                        if let Some(computer) = &report.computer {
                            describe_computer(&mut out, computer);
                        }
                        if let Some(score) = report.final_score {
                            describe_final(&mut out, score);
                        }
                        out.push_str(&self.game.board().to_string());
                        (true, out)
                    }
                    Err(e) => (false, e.to_string()),
                }
            }

            "card" => match self.game.use_held_card() {
                Ok(report) => {
                    let mut out = format!("played {}\n", report.card);
                    if let Some(computer) = &report.computer {
                        describe_computer(&mut out, computer);
                    }
                    if let Some(score) = report.final_score {
                        describe_final(&mut out, score);
                    }
                    out.push_str(&self.game.board().to_string());
                    (true, out)
                }
                Err(e) => (false, e.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        };

        // Notices are already reflected in failure messages.
        let notices = self.game.observer_mut().drain();
        if success {
            for notice in notices {
                let _ = writeln!(message, "\n# {notice}");
            }
        }
        (success, message.trim_end().to_string())
    }

    fn status(&self) -> String {
        let turn = self.game.turn();
        let direction = match turn.direction {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        };
        let card = turn
            .held_card
            .map(|c| c.to_string())
            .unwrap_or_else(|| "none".to_string());
        format!(
            "player {} computer {}\nturns {} direction {direction} card {card}\nphase {}",
            turn.player_score,
            turn.computer_score,
            turn.player_turns_remaining,
            self.game.phase()
        )
    }
}

fn describe_computer(out: &mut String, computer: &ComputerTurn) {
    let _ = writeln!(
        out,
        "computer sowed pit {} and captured {}",
        computer.search.best_pit, computer.sow.captured
    );
}

fn describe_final(out: &mut String, score: FinalScore) {
    let _ = writeln!(
        out,
        "final score: player {} computer {} ({})",
        score.player,
        score.computer,
        score.winner()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TextEngine {
        TextEngine::new(GameConfig::default().with_seed(7), false)
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = TextEngine::parse_id("123 board");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "board");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = TextEngine::parse_id("board");
        assert_eq!(id, None);
        assert_eq!(cmd, "board");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();
        assert_eq!(engine.execute("known_command", &["play"]), (true, "true".to_string()));
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "false".to_string()));
    }

    #[test]
    fn test_play_rejects_bad_pits() {
        let mut engine = engine();
        let (success, message) = engine.execute("play", &["8"]);
        assert!(!success);
        assert!(message.contains("outside"), "{message}");

        let (success, _) = engine.execute("play", &["x"]);
        assert!(!success);
    }

    #[test]
    fn test_card_without_card() {
        let mut engine = engine();
        let (success, message) = engine.execute("card", &[]);
        assert!(!success);
        assert!(message.contains("no card held"), "{message}");
    }

    #[test]
    fn test_play_and_restart() {
        let mut engine = engine();
        let (success, message) = engine.execute("play", &["3"]);
        assert!(success);
        assert!(message.starts_with("you sowed pit 3 and captured 6"), "{message}");

        let (success, _) = engine.execute("restart", &[]);
        assert!(success);
        assert_eq!(engine.game().turn().player_score, 0);
    }

    #[test]
    fn test_run_with_writes_responses() {
        let mut engine = engine();
        let input = b"1 name\nbogus\nquit\nboard\n";
        let mut output = Vec::new();
        engine.run_with(&input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("=1 oanquan\n\n"));
        assert!(text.contains("? unknown command: bogus"));
        // Nothing after quit.
        assert!(!text.contains("[10]"));
    }
}
