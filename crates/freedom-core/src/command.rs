use std::collections::HashMap;
use std::time::Instant;

use freedom_metrics::format::{format_clock, format_count};
use freedom_metrics::StationId;

use crate::bus::EventBus;
use crate::console::Console;
use crate::registry::ModuleRegistry;
use crate::session::DashboardSession;

/// Result of running a console command.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandOutput {
    /// Lines to append to the console.
    Lines(Vec<String>),
    /// The dashboard should shut down.
    Quit,
}

impl CommandOutput {
    fn line(text: impl Into<String>) -> Self {
        Self::Lines(vec![text.into()])
    }
}

/// Everything a command may touch.
pub struct CommandContext<'a> {
    pub registry: &'a mut ModuleRegistry,
    pub console: &'a mut Console,
    pub bus: &'a mut EventBus,
    pub session: &'a mut DashboardSession,
    pub started_at: Instant,
    pub now: Instant,
}

pub trait Command {
    fn name(&self) -> &'static str;
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }
    fn description(&self) -> &'static str;
    fn usage(&self) -> &'static str {
        self.name()
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> CommandOutput;
}

/// Console commands by name and alias. `help` is answered by the registry
/// itself since it needs the full command list.
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    lookup: HashMap<&'static str, usize>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    pub fn register(&mut self, cmd: Box<dyn Command>) {
        let idx = self.commands.len();
        self.lookup.insert(cmd.name(), idx);
        for alias in cmd.aliases() {
            self.lookup.insert(*alias, idx);
        }
        self.commands.push(cmd);
    }

    pub fn commands(&self) -> &[Box<dyn Command>] {
        &self.commands
    }

    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandOutput {
        let mut parts = input.split_whitespace();
        let Some(name) = parts.next() else {
            return CommandOutput::Lines(Vec::new());
        };
        let args: Vec<&str> = parts.collect();

        if name == "help" || name == "?" {
            return self.help(args.first().copied());
        }
        match self.lookup.get(name) {
            Some(&idx) => self.commands[idx].execute(&args, ctx),
            None => CommandOutput::line(format!(
                "unknown command: '{}'. Type 'help' for available commands.",
                name
            )),
        }
    }

    fn help(&self, topic: Option<&str>) -> CommandOutput {
        if let Some(topic) = topic {
            return match self.lookup.get(topic) {
                Some(&idx) => {
                    let cmd = &self.commands[idx];
                    let mut lines = vec![format!("{}: {}", cmd.usage(), cmd.description())];
                    if !cmd.aliases().is_empty() {
                        lines.push(format!("  aliases: {}", cmd.aliases().join(", ")));
                    }
                    CommandOutput::Lines(lines)
                }
                None => CommandOutput::line(format!("no help for '{}'", topic)),
            };
        }
        let width = self
            .commands
            .iter()
            .map(|c| c.usage().len())
            .max()
            .unwrap_or(0)
            .max("help [command]".len());
        let mut lines = vec![format!("  {:width$}  List commands", "help [command]")];
        lines.extend(
            self.commands
                .iter()
                .map(|c| format!("  {:width$}  {}", c.usage(), c.description())),
        );
        CommandOutput::Lines(lines)
    }
}

pub struct ClearCommand;

impl Command for ClearCommand {
    fn name(&self) -> &'static str {
        "clear"
    }
    fn aliases(&self) -> &'static [&'static str] {
        &["cls"]
    }
    fn description(&self) -> &'static str {
        "Clear the console"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        ctx.console.clear();
        CommandOutput::Lines(Vec::new())
    }
}

pub struct PanelsCommand;

impl Command for PanelsCommand {
    fn name(&self) -> &'static str {
        "panels"
    }
    fn aliases(&self) -> &'static [&'static str] {
        &["mods"]
    }
    fn description(&self) -> &'static str {
        "List dashboard panels"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let active = ctx.registry.active_id();
        CommandOutput::Lines(
            ctx.registry
                .list()
                .into_iter()
                .map(|(id, title)| {
                    let marker = if Some(id) == active { " *" } else { "" };
                    format!("  {:<10} {}{}", id, title, marker)
                })
                .collect(),
        )
    }
}

pub struct SwitchCommand;

impl Command for SwitchCommand {
    fn name(&self) -> &'static str {
        "switch"
    }
    fn aliases(&self) -> &'static [&'static str] {
        &["sw"]
    }
    fn description(&self) -> &'static str {
        "Show another panel"
    }
    fn usage(&self) -> &'static str {
        "switch <panel>"
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let Some(id) = args.first() else {
            return CommandOutput::line("usage: switch <panel>");
        };
        match ctx.registry.activate(id) {
            Ok(events) => {
                ctx.bus.publish_all(events);
                let title = ctx.registry.active().map_or("?", |m| m.title());
                CommandOutput::line(format!("panel: {}", title))
            }
            Err(e) => CommandOutput::line(format!("error: {}", e)),
        }
    }
}

pub struct StationCommand;

impl Command for StationCommand {
    fn name(&self) -> &'static str {
        "station"
    }
    fn description(&self) -> &'static str {
        "Show or select the station"
    }
    fn usage(&self) -> &'static str {
        "station [1|2]"
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let Some(arg) = args.first() else {
            let profile = ctx.session.station().profile();
            return CommandOutput::line(format!(
                "station {}: {}",
                profile.id.number(),
                profile.name
            ));
        };
        let station = match arg.parse::<u8>() {
            Ok(n) => StationId::try_from(n),
            Err(_) => return CommandOutput::line(format!("error: not a station number: {}", arg)),
        };
        match station {
            Ok(id) => {
                ctx.session.switch_station(id);
                CommandOutput::line(format!("station: {}", id.profile().name))
            }
            Err(e) => CommandOutput::line(format!("error: {}", e)),
        }
    }
}

pub struct RateCommand;

impl Command for RateCommand {
    fn name(&self) -> &'static str {
        "rate"
    }
    fn description(&self) -> &'static str {
        "Show or set the refresh interval in seconds"
    }
    fn usage(&self) -> &'static str {
        "rate [10-60]"
    }
    fn execute(&self, args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let Some(arg) = args.first() else {
            return CommandOutput::line(format!("refresh: {}s", ctx.session.refresh_secs()));
        };
        let secs = match arg.parse::<u64>() {
            Ok(secs) => secs,
            Err(_) => return CommandOutput::line(format!("error: not a number: {}", arg)),
        };
        match ctx.session.set_refresh_secs(secs) {
            Ok(()) => CommandOutput::line(format!("refresh: {}s", secs)),
            Err(e) => CommandOutput::line(format!("error: {}", e)),
        }
    }
}

pub struct RefreshCommand;

impl Command for RefreshCommand {
    fn name(&self) -> &'static str {
        "refresh"
    }
    fn description(&self) -> &'static str {
        "Run a refresh cycle now"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        ctx.session.refresh_now();
        CommandOutput::line("refresh queued")
    }
}

pub struct StatusCommand;

impl Command for StatusCommand {
    fn name(&self) -> &'static str {
        "status"
    }
    fn description(&self) -> &'static str {
        "Show session status"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let session = &*ctx.session;
        let mut lines = vec![
            format!("station:  {}", session.station().profile().name),
            format!("refresh:  {}s", session.refresh_secs()),
            format!("next in:  {}s", session.remaining(ctx.now).as_secs()),
            format!("cycles:   {}", session.cycles()),
        ];
        if let Some(snap) = session.latest() {
            lines.push(format!(
                "audience: {} ({})",
                format_count(u64::from(snap.live.current_listeners)),
                snap.live.trend.arrow()
            ));
            lines.push(format!("on air:   {} avec {}", snap.program.name, snap.program.host));
        }
        CommandOutput::Lines(lines)
    }
}

pub struct SnapshotCommand;

impl Command for SnapshotCommand {
    fn name(&self) -> &'static str {
        "snapshot"
    }
    fn aliases(&self) -> &'static [&'static str] {
        &["snap"]
    }
    fn description(&self) -> &'static str {
        "Dump the latest live values as JSON"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let Some(snap) = ctx.session.latest() else {
            return CommandOutput::line("no snapshot yet");
        };
        let value = serde_json::json!({
            "station": snap.station.id,
            "cycle": snap.cycle,
            "generated_at": snap.generated_at,
            "live": snap.live,
            "program": snap.program,
            "deltas": snap.deltas,
        });
        match serde_json::to_string_pretty(&value) {
            Ok(json) => CommandOutput::Lines(json.lines().map(str::to_string).collect()),
            Err(e) => CommandOutput::line(format!("error: {}", e)),
        }
    }
}

pub struct UptimeCommand;

impl Command for UptimeCommand {
    fn name(&self) -> &'static str {
        "uptime"
    }
    fn description(&self) -> &'static str {
        "Show dashboard uptime"
    }
    fn execute(&self, _args: &[&str], ctx: &mut CommandContext) -> CommandOutput {
        let secs = ctx.now.saturating_duration_since(ctx.started_at).as_secs();
        CommandOutput::line(format!("uptime: {}", format_clock(secs)))
    }
}

pub struct EchoCommand;

impl Command for EchoCommand {
    fn name(&self) -> &'static str {
        "echo"
    }
    fn description(&self) -> &'static str {
        "Print a message"
    }
    fn usage(&self) -> &'static str {
        "echo <message>"
    }
    fn execute(&self, args: &[&str], _ctx: &mut CommandContext) -> CommandOutput {
        CommandOutput::line(args.join(" "))
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name(&self) -> &'static str {
        "quit"
    }
    fn aliases(&self) -> &'static [&'static str] {
        &["exit", "q"]
    }
    fn description(&self) -> &'static str {
        "Leave the dashboard"
    }
    fn execute(&self, _args: &[&str], _ctx: &mut CommandContext) -> CommandOutput {
        CommandOutput::Quit
    }
}

/// Registry holding every built-in command.
pub fn builtin_registry() -> CommandRegistry {
    let mut reg = CommandRegistry::new();
    reg.register(Box::new(ClearCommand));
    reg.register(Box::new(PanelsCommand));
    reg.register(Box::new(SwitchCommand));
    reg.register(Box::new(StationCommand));
    reg.register(Box::new(RateCommand));
    reg.register(Box::new(RefreshCommand));
    reg.register(Box::new(StatusCommand));
    reg.register(Box::new(SnapshotCommand));
    reg.register(Box::new(UptimeCommand));
    reg.register(Box::new(EchoCommand));
    reg.register(Box::new(QuitCommand));
    reg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::time::Duration;

    use chrono::{NaiveDate, NaiveDateTime};

    use crate::event::Event;
    use crate::module::Module;
    use crate::session::generator_factory;

    struct FakePanel(&'static str, &'static str);

    impl Module for FakePanel {
        fn id(&self) -> &'static str {
            self.0
        }
        fn title(&self) -> &'static str {
            self.1
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 2)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    struct Fixture {
        registry: ModuleRegistry,
        console: Console,
        bus: EventBus,
        session: DashboardSession,
        started_at: Instant,
    }

    impl Fixture {
        fn new() -> Self {
            let mut registry = ModuleRegistry::new();
            registry.register(Box::new(FakePanel("live", "Audience"))).unwrap();
            registry.register(Box::new(FakePanel("tech", "Technique"))).unwrap();
            let session = DashboardSession::with_factory(
                StationId::One,
                generator_factory(Some(3), noon),
                Duration::from_secs(30),
                noon,
            );
            Self {
                registry,
                console: Console::default(),
                bus: EventBus::new(),
                session,
                started_at: Instant::now(),
            }
        }

        fn run(&mut self, input: &str) -> CommandOutput {
            let mut ctx = CommandContext {
                registry: &mut self.registry,
                console: &mut self.console,
                bus: &mut self.bus,
                session: &mut self.session,
                started_at: self.started_at,
                now: self.started_at + Duration::from_secs(3725),
            };
            builtin_registry().execute(input, &mut ctx)
        }

        fn lines(&mut self, input: &str) -> Vec<String> {
            match self.run(input) {
                CommandOutput::Lines(lines) => lines,
                CommandOutput::Quit => panic!("unexpected quit for {input}"),
            }
        }
    }

    #[test]
    fn blank_input_prints_nothing() {
        let mut f = Fixture::new();
        assert!(f.lines("   ").is_empty());
    }

    #[test]
    fn unknown_command() {
        let mut f = Fixture::new();
        assert!(f.lines("weather")[0].contains("unknown command: 'weather'"));
    }

    #[test]
    fn help_lists_every_command() {
        let mut f = Fixture::new();
        let lines = f.lines("help");
        assert_eq!(lines.len(), builtin_registry().commands().len() + 1);
        assert!(lines.iter().any(|l| l.contains("rate [10-60]")));
        assert_eq!(f.lines("?"), lines);
    }

    #[test]
    fn help_for_one_command() {
        let mut f = Fixture::new();
        let lines = f.lines("help q");
        assert!(lines[0].starts_with("quit:"));
        assert!(lines[1].contains("exit"));
        assert!(f.lines("help nope")[0].contains("no help"));
    }

    #[test]
    fn clear_empties_console() {
        let mut f = Fixture::new();
        f.console.print("one\ntwo");
        f.lines("cls");
        assert!(f.console.lines().is_empty());
    }

    #[test]
    fn panels_marks_active() {
        let mut f = Fixture::new();
        let lines = f.lines("panels");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("live") && lines[0].ends_with('*'));
        assert!(!lines[1].ends_with('*'));
    }

    #[test]
    fn switch_publishes_lifecycle() {
        let mut f = Fixture::new();
        assert_eq!(f.lines("switch tech"), vec!["panel: Technique"]);
        assert_eq!(f.registry.active_id(), Some("tech"));
        let events = f.bus.drain();
        assert!(matches!(&events[1], Event::ModuleActivated { id } if id == "tech"));
    }

    #[test]
    fn switch_errors() {
        let mut f = Fixture::new();
        assert!(f.lines("switch")[0].starts_with("usage"));
        assert!(f.lines("sw nope")[0].starts_with("error"));
    }

    #[test]
    fn station_switches_session() {
        let mut f = Fixture::new();
        assert!(f.lines("station")[0].starts_with("station 1"));
        assert!(f.lines("station 2")[0].contains("92.7"));
        assert_eq!(f.session.station(), StationId::Two);
        assert!(f.lines("station 3")[0].contains("invalid station id 3"));
        assert!(f.lines("station two")[0].starts_with("error"));
    }

    #[test]
    fn rate_validates_range() {
        let mut f = Fixture::new();
        assert_eq!(f.lines("rate"), vec!["refresh: 30s"]);
        assert_eq!(f.lines("rate 15"), vec!["refresh: 15s"]);
        assert_eq!(f.session.refresh_secs(), 15);
        assert!(f.lines("rate 5")[0].contains("between 10 and 60"));
        assert!(f.lines("rate fast")[0].starts_with("error"));
        assert_eq!(f.session.refresh_secs(), 15);
    }

    #[test]
    fn refresh_forces_cycle() {
        let mut f = Fixture::new();
        let t0 = Instant::now();
        f.session.poll(t0);
        f.lines("refresh");
        assert!(f.session.poll(t0).is_some());
    }

    #[test]
    fn status_before_and_after_cycle() {
        let mut f = Fixture::new();
        assert_eq!(f.lines("status").len(), 4);
        f.session.poll(Instant::now());
        let lines = f.lines("status");
        assert_eq!(lines.len(), 6);
        assert!(lines[5].contains("LE FREEDOM DE 12H-15H"));
    }

    #[test]
    fn snapshot_dumps_json() {
        let mut f = Fixture::new();
        assert_eq!(f.lines("snapshot"), vec!["no snapshot yet"]);
        f.session.poll(Instant::now());
        let json = f.lines("snap").join("\n");
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["cycle"], 1);
        assert!(value["live"]["current_listeners"].as_u64().unwrap() >= 15_000);
    }

    #[test]
    fn uptime_formats_clock() {
        let mut f = Fixture::new();
        assert_eq!(f.lines("uptime"), vec!["uptime: 01:02:05"]);
    }

    #[test]
    fn echo_joins_args() {
        let mut f = Fixture::new();
        assert_eq!(f.lines("echo la   radio"), vec!["la radio"]);
        assert_eq!(f.lines("echo"), vec![""]);
    }

    #[test]
    fn quit_and_aliases() {
        let mut f = Fixture::new();
        for input in ["quit", "exit", "q"] {
            assert_eq!(f.run(input), CommandOutput::Quit);
        }
    }
}
