use std::any::Any;
use std::collections::HashMap;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};

use freedom_config::DashboardConfig;
use freedom_core::{
    bus::EventBus,
    command::{self, CommandContext, CommandOutput, CommandRegistry},
    console::{Console, CONSOLE_CAPACITY},
    event::Event,
    logging::{self, LogBuffer},
    module::Module,
    registry::{Cycle, ModuleRegistry},
    session::DashboardSession,
    state::AppState,
};
use freedom_metrics::StationId;
use freedom_ui::{
    console::render_console,
    dove::Dove,
    layout::dashboard_layout,
    renderer::HeroRenderer,
    shell::{render_shell, ShellView},
};

use freedom_mod_communes::CommunesPanel;
use freedom_mod_live::LivePanel;
use freedom_mod_programme::ProgrammePanel;
use freedom_mod_social::SocialPanel;
use freedom_mod_tech::TechPanel;

/// A type-erased render function that downcasts a panel via `Any` and draws
/// its hero area.
type RenderFn = Box<dyn Fn(&dyn Any, &mut Frame, Rect)>;

/// Rows of the HUD strip: four dove frame rows, its caption, and two borders.
const HUD_HEIGHT: u16 = 7;
const DOVE_WIDTH: u16 = 16;
/// Step applied by the `+` and `-` keys.
const RATE_STEP_SECS: i64 = 5;

/// Keys handled by the shell before panels see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShellAction {
    Quit,
    Cycle(Cycle),
    Station(StationId),
    Rate(i64),
    Refresh,
}

fn shell_action(key: &KeyEvent) -> Option<ShellAction> {
    match key.code {
        KeyCode::Char('q') => Some(ShellAction::Quit),
        KeyCode::Tab => Some(ShellAction::Cycle(Cycle::Next)),
        KeyCode::BackTab => Some(ShellAction::Cycle(Cycle::Prev)),
        KeyCode::Char('1') => Some(ShellAction::Station(StationId::One)),
        KeyCode::Char('2') => Some(ShellAction::Station(StationId::Two)),
        KeyCode::Char('+') => Some(ShellAction::Rate(RATE_STEP_SECS)),
        KeyCode::Char('-') => Some(ShellAction::Rate(-RATE_STEP_SECS)),
        KeyCode::Char('r') => Some(ShellAction::Refresh),
        _ => None,
    }
}

struct App {
    state: AppState,
    registry: ModuleRegistry,
    bus: EventBus,
    session: DashboardSession,
    log_buffer: LogBuffer,
    console: Console,
    commands: CommandRegistry,
    render_map: HashMap<String, RenderFn>,
    dove: Dove,
}

/// Register a panel that also implements `HeroRenderer`.
///
/// Inserts the panel into the registry and captures a type-aware render
/// closure in `render_map` so the app can call `render_hero` without
/// knowing the concrete panel type.
fn register_module<M: Module + HeroRenderer + 'static>(
    registry: &mut ModuleRegistry,
    render_map: &mut HashMap<String, RenderFn>,
    module: M,
) -> Result<()> {
    let id = module.id().to_string();
    render_map.insert(
        id,
        Box::new(|any, f, area| {
            if let Some(m) = any.downcast_ref::<M>() {
                m.render_hero(f, area);
            }
        }),
    );
    registry.register(Box::new(module))
}

impl App {
    fn new(session: DashboardSession, log_buffer: LogBuffer) -> Result<Self> {
        let mut registry = ModuleRegistry::new();
        let mut render_map: HashMap<String, RenderFn> = HashMap::new();
        register_module(&mut registry, &mut render_map, LivePanel::new())?;
        register_module(&mut registry, &mut render_map, CommunesPanel::new())?;
        register_module(&mut registry, &mut render_map, ProgrammePanel::new())?;
        register_module(&mut registry, &mut render_map, SocialPanel::new())?;
        register_module(&mut registry, &mut render_map, TechPanel::new())?;

        Ok(Self {
            state: AppState::new(),
            registry,
            bus: EventBus::new(),
            session,
            log_buffer,
            console: Console::new(CONSOLE_CAPACITY),
            commands: command::builtin_registry(),
            render_map,
            dove: Dove::new(Instant::now()),
        })
    }

    /// Move new tracing entries into the console scrollback.
    fn sync_logs(&mut self) {
        for entry in logging::drain_buffer(&self.log_buffer) {
            self.console.push_log(entry);
        }
    }

    /// Run a refresh cycle if one is due and fan the snapshot out.
    fn poll_session(&mut self, now: Instant) {
        if let Some(snap) = self.session.poll(now) {
            self.dove.set_trend(snap.live.trend, now);
            self.state.status_line = snap.on_air_line();
            self.bus.publish(Event::Snapshot(snap));
        }
    }

    /// Execute a console command. Returns true when the app should quit.
    fn dispatch_command(&mut self, input: &str) -> bool {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.console.print(&format!("> {}", trimmed));

        let mut ctx = CommandContext {
            registry: &mut self.registry,
            console: &mut self.console,
            bus: &mut self.bus,
            session: &mut self.session,
            started_at: self.state.started_at,
            now: Instant::now(),
        };

        match self.commands.execute(trimmed, &mut ctx) {
            CommandOutput::Lines(lines) => {
                for line in lines {
                    self.console.print(&line);
                }
                false
            }
            CommandOutput::Quit => true,
        }
    }

    fn apply(&mut self, action: ShellAction) {
        match action {
            ShellAction::Quit => self.bus.publish(Event::Quit),
            ShellAction::Cycle(direction) => {
                let lifecycle = self.registry.cycle(direction);
                self.bus.publish_all(lifecycle);
            }
            ShellAction::Station(id) => {
                if id != self.session.station() {
                    self.session.switch_station(id);
                    self.state.status_line = format!("Bascule vers {}...", id.profile().short_name);
                }
            }
            ShellAction::Rate(delta) => {
                let secs = self.session.adjust_refresh_secs(delta);
                self.state.status_line = format!("Rafraîchissement toutes les {}s", secs);
            }
            ShellAction::Refresh => self.session.refresh_now(),
        }
    }

    /// Console keys while it is open. Returns true when the app should quit.
    fn console_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Enter => {
                let input = self.console.submit();
                return self.dispatch_command(&input);
            }
            KeyCode::Backspace => self.console.input.backspace(),
            KeyCode::Left => self.console.input.left(),
            KeyCode::Right => self.console.input.right(),
            KeyCode::Home => self.console.input.home(),
            KeyCode::End => self.console.input.end(),
            KeyCode::Up => self.console.recall_prev(),
            KeyCode::Down => self.console.recall_next(),
            KeyCode::PageUp => self.console.scroll_up(10),
            KeyCode::PageDown => self.console.scroll_down(10),
            KeyCode::Esc => self.console.toggle(),
            KeyCode::Char(c) => self.console.input.insert(c),
            _ => {}
        }
        false
    }

    fn draw(&self, f: &mut Frame) {
        let rects = dashboard_layout(f.area(), HUD_HEIGHT, DOVE_WIDTH);
        let profile = self.session.station().profile();
        let clock = chrono::Local::now().format("%d/%m/%Y %H:%M:%S").to_string();
        let remaining = self.session.remaining(Instant::now());

        let (hud_left, hud_right) = match self.registry.active() {
            Some(m) => {
                let hud = m.hud();
                let mut left = hud.left_lines;
                left.push("Tab panneau  1/2 station".into());
                left.push("+/- cadence  r  ~ console".into());
                (left, hud.right_lines)
            }
            None => (Vec::new(), Vec::new()),
        };

        let tabs: Vec<&str> = self.registry.list().into_iter().map(|(_, t)| t).collect();
        let active_tab = self
            .registry
            .active_id()
            .and_then(|id| self.registry.list().iter().position(|(i, _)| *i == id))
            .unwrap_or(0);

        let view = ShellView {
            station_name: profile.name,
            frequency: profile.frequency,
            tabs,
            active_tab,
            clock: &clock,
            on_air: self.session.latest().is_some(),
            status_line: &self.state.status_line,
            next_refresh_secs: remaining.as_secs(),
            refresh_secs: self.session.refresh_secs(),
            hud_left,
            hud_right,
            dove_lines: self.dove.lines(),
        };

        let render_map = &self.render_map;
        render_shell(f, rects, view, |f, hero_area| {
            if let Some(m) = self.registry.active() {
                if let Some(render_fn) = render_map.get(m.id()) {
                    render_fn(m.as_any(), f, hero_area);
                }
            }
        });

        let footer = format!("{} - cycle {}", profile.short_name, self.session.cycles());
        render_console(f, f.area(), &self.console, &footer);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> Result<()> {
    let config = DashboardConfig::load()?;
    let log_buffer = logging::init(&config.logging);
    tracing::info!(
        station = config.station,
        refresh_secs = config.refresh_secs,
        "Freedom dashboard starting up"
    );
    let session = DashboardSession::from_config(&config)?;

    let app = App::new(session, log_buffer)?;

    let mut terminal = setup_terminal()?;
    let res = run(&mut terminal, app);
    restore_terminal(terminal)?;
    tracing::info!("Freedom dashboard stopped");
    res
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut app: App) -> Result<()> {
    let tick_interval = Duration::from_millis(100);
    let poll_timeout = Duration::from_millis(16);
    let mut last_tick = Instant::now();

    loop {
        app.sync_logs();

        let now = Instant::now();
        app.dove.tick(now);
        app.poll_session(now);

        terminal.draw(|f| app.draw(f))?;

        if event::poll(poll_timeout)? {
            match event::read()? {
                CEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.code == KeyCode::Char('~') || key.code == KeyCode::Char('`') {
                        app.console.toggle();
                    } else if app.console.visible {
                        if app.console_key(key) {
                            return Ok(());
                        }
                    } else if let Some(action) = shell_action(&key) {
                        app.apply(action);
                    } else {
                        app.bus.publish(Event::Key(key));
                    }
                }
                CEvent::Resize(cols, rows) => {
                    app.bus.publish(Event::Resize { cols, rows });
                }
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_interval {
            last_tick = Instant::now();
            app.bus.publish(Event::Tick { now: last_tick });
        }

        for ev in app.bus.drain() {
            if matches!(ev, Event::Quit) {
                return Ok(());
            }
            app.registry.broadcast(&ev);
        }
    }
}
