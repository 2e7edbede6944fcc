//! The fixed command table.
//!
//! Two routes, two actions, two fixed replies. Anything else is left to the
//! HTTP layer's default handling.

use crate::output::Level;

/// Content type of every reply.
pub const TEXT_PLAIN: &str = "text/plain";

/// A command triggered by an inbound request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `/on`: drive the gate to its active level.
    Assert,
    /// `/off`: drive the gate to its inactive level.
    Deassert,
}

impl Command {
    /// Every command, in registration order.
    pub const ALL: [Command; 2] = [Command::Assert, Command::Deassert];

    /// Match a request path exactly. Query strings must already be stripped.
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.path() == path)
    }

    /// Route path for this command.
    pub const fn path(self) -> &'static str {
        match self {
            Command::Assert => "/on",
            Command::Deassert => "/off",
        }
    }

    /// Level written to the output.
    pub const fn level(self) -> Level {
        match self {
            Command::Assert => Level::Asserted,
            Command::Deassert => Level::Deasserted,
        }
    }

    /// Fixed acknowledgement sent back to the client.
    pub const fn reply(self) -> Reply {
        let body = match self {
            Command::Assert => "MOSFET ON",
            Command::Deassert => "MOSFET OFF",
        };
        Reply {
            status: 200,
            content_type: TEXT_PLAIN,
            body,
        }
    }
}

/// A response as the HTTP layer should send it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: &'static str,
}

/// Outcome of dispatching a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The path matched a command, which has been executed.
    Handled(Reply),
    /// No command for this path; the HTTP layer answers with its default.
    Unrouted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_command_matches_its_path() {
        for command in Command::ALL {
            assert_eq!(Command::from_path(command.path()), Some(command));
        }
    }

    #[test]
    fn test_path_match_is_exact() {
        assert_eq!(Command::from_path("/on/"), None);
        assert_eq!(Command::from_path("/ON"), None);
        assert_eq!(Command::from_path("on"), None);
        assert_eq!(Command::from_path("/status"), None);
        assert_eq!(Command::from_path(""), None);
    }

    #[test]
    fn test_fixed_replies() {
        assert_eq!(
            Command::Assert.reply(),
            Reply {
                status: 200,
                content_type: "text/plain",
                body: "MOSFET ON",
            }
        );
        assert_eq!(Command::Deassert.reply().body, "MOSFET OFF");
        assert_eq!(Command::Deassert.reply().status, 200);
    }
}
