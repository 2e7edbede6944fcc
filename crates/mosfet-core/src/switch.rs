//! Gate switch state and the command server.
//!
//! The gate level is the only runtime state of the device. It lives in
//! [`GateSwitch`], which is owned by the [`CommandServer`] and changed only
//! through the two commands.

use log::{debug, info};

use crate::command::{Command, Dispatch, Reply};
use crate::output::{DigitalOutput, Level};

/// Owns the gate output and mirrors the last level written to it.
#[derive(Debug)]
pub struct GateSwitch<O> {
    output: O,
    level: Level,
}

impl<O: DigitalOutput> GateSwitch<O> {
    /// Take ownership of `output` and drive it to the inactive level.
    pub fn new(mut output: O) -> Self {
        output.write(Level::Deasserted);
        Self {
            output,
            level: Level::Deasserted,
        }
    }

    /// Drive the gate to its active level.
    pub fn assert(&mut self) -> Reply {
        self.execute(Command::Assert)
    }

    /// Drive the gate to its inactive level.
    pub fn deassert(&mut self) -> Reply {
        self.execute(Command::Deassert)
    }

    /// Write the command's level and return its fixed reply.
    ///
    /// Every invocation writes the pin, even when the level is unchanged.
    pub fn execute(&mut self, command: Command) -> Reply {
        let level = command.level();
        self.output.write(level);
        if self.level != level {
            info!("Gate {} -> {}", self.level, level);
        }
        self.level = level;
        command.reply()
    }

    /// Last level written.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

/// Dispatches request paths to the gate switch, one request at a time.
///
/// Callers share it behind a single lock; each dispatch runs to completion
/// before the next one starts.
#[derive(Debug)]
pub struct CommandServer<O> {
    switch: GateSwitch<O>,
    handled: u64,
}

impl<O: DigitalOutput> CommandServer<O> {
    /// Create a server around a fresh switch. The output is deasserted here.
    pub fn new(output: O) -> Self {
        Self {
            switch: GateSwitch::new(output),
            handled: 0,
        }
    }

    /// Route a request path. A query string, if present, is ignored.
    pub fn dispatch(&mut self, path: &str) -> Dispatch {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        match Command::from_path(path) {
            Some(command) => Dispatch::Handled(self.handle(command)),
            None => {
                debug!("No route for {}", path);
                Dispatch::Unrouted
            }
        }
    }

    /// Execute a command that has already been routed.
    pub fn handle(&mut self, command: Command) -> Reply {
        self.handled += 1;
        debug!("Request #{} -> {:?}", self.handled, command);
        self.switch.execute(command)
    }

    /// Number of commands executed since startup.
    pub fn handled(&self) -> u64 {
        self.handled
    }

    pub fn switch(&self) -> &GateSwitch<O> {
        &self.switch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MockOutput;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_initial_state_is_deasserted() {
        let probe = MockOutput::new();
        let switch = GateSwitch::new(probe.clone());

        assert_eq!(switch.level(), Level::Deasserted);
        assert_eq!(probe.writes(), vec![Level::Deasserted]);
    }

    #[test]
    fn test_assert_sets_level_and_replies_on() {
        let mut switch = GateSwitch::new(MockOutput::new());

        let reply = switch.assert();

        assert_eq!(switch.level(), Level::Asserted);
        assert_eq!((reply.status, reply.body), (200, "MOSFET ON"));
        assert_eq!(switch.output().last(), Some(Level::Asserted));
    }

    #[test]
    fn test_deassert_sets_level_and_replies_off() {
        let mut switch = GateSwitch::new(MockOutput::new());
        switch.assert();

        let reply = switch.deassert();

        assert_eq!(switch.level(), Level::Deasserted);
        assert_eq!((reply.status, reply.body), (200, "MOSFET OFF"));
    }

    #[test]
    fn test_assert_is_idempotent() {
        let probe = MockOutput::new();
        let mut switch = GateSwitch::new(probe.clone());

        let first = switch.assert();
        let second = switch.assert();

        assert_eq!(first, second);
        assert_eq!(switch.level(), Level::Asserted);
        // Both commands reach the pin.
        assert_eq!(
            probe.writes(),
            vec![Level::Deasserted, Level::Asserted, Level::Asserted]
        );
    }

    #[test]
    fn test_last_write_wins() {
        let mut switch = GateSwitch::new(MockOutput::new());

        switch.assert();
        switch.deassert();

        assert_eq!(switch.level(), Level::Deasserted);
    }

    #[test]
    fn test_dispatch_routes_fixed_paths() {
        let probe = MockOutput::new();
        let mut server = CommandServer::new(probe.clone());

        assert_eq!(
            server.dispatch("/on"),
            Dispatch::Handled(Command::Assert.reply())
        );
        assert_eq!(server.switch().level(), Level::Asserted);

        assert_eq!(
            server.dispatch("/off"),
            Dispatch::Handled(Command::Deassert.reply())
        );
        assert_eq!(server.switch().level(), Level::Deasserted);
        assert_eq!(server.handled(), 2);
    }

    #[test]
    fn test_dispatch_ignores_query_string() {
        let mut server = CommandServer::new(MockOutput::new());

        assert_eq!(
            server.dispatch("/on?source=test"),
            Dispatch::Handled(Command::Assert.reply())
        );
    }

    #[test]
    fn test_unrouted_path_leaves_pin_untouched() {
        let probe = MockOutput::new();
        let mut server = CommandServer::new(probe.clone());
        server.dispatch("/on");

        assert_eq!(server.dispatch("/status"), Dispatch::Unrouted);
        assert_eq!(server.dispatch("/"), Dispatch::Unrouted);

        assert_eq!(server.switch().level(), Level::Asserted);
        assert_eq!(probe.writes().len(), 2);
        assert_eq!(server.handled(), 1);
    }
}
