//! Interactive session commands

use std::str::FromStr;

use thiserror::Error;

/// One line typed into the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `p`: toggle play/pause
    PlayPause,
    /// `s <ms>`: seek to an absolute position
    Seek(i64),
    /// `f`: skip forward by the configured step
    Forward,
    /// `b`: skip back by the configured step
    Back,
    /// `o <path>`: open another file
    Open(String),
    /// `r`: unload the current track
    Reset,
    /// `i`: print the current status
    Info,
    /// `h`: print the command list
    Help,
    /// `q`: leave the session
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type h for help)")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("Not a position in milliseconds: '{0}'")]
    InvalidPosition(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "p" | "play" | "pause" => Ok(Self::PlayPause),
            "s" | "seek" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("s"));
                }
                rest.parse()
                    .map(Self::Seek)
                    .map_err(|_| CommandError::InvalidPosition(rest.to_string()))
            }
            "f" | "forward" => Ok(Self::Forward),
            "b" | "back" => Ok(Self::Back),
            "o" | "open" => {
                if rest.is_empty() {
                    Err(CommandError::MissingArgument("o"))
                } else {
                    Ok(Self::Open(rest.to_string()))
                }
            }
            "r" | "reset" => Ok(Self::Reset),
            "i" | "info" => Ok(Self::Info),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  p          play/pause
  s <ms>     seek to position
  f / b      skip forward / back
  o <path>   open file
  r          reset (unload)
  i          status
  h          help
  q          quit";
