//! Simulator application state and event loop

use crate::engine::Device;
use crate::hal::sim::{PanelBuffer, SimFlash, SystemClock};
use crate::memory::NUM_CELLS;
use crate::ui::theme::{led_to_color, DEFAULT_THEME};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// The clock speeds the stock host offers, in instructions per second.
pub const CLOCK_SPEEDS: [u8; 6] = [1, 2, 5, 10, 20, 40];

/// Screen refresh budget. The device itself is polled far more often so
/// tick coalescing stays realistic.
const FRAME: Duration = Duration::from_millis(33);

/// The simulator: one device plus its simulated hardware.
pub struct App {
    /// The device under simulation
    pub device: Device,

    /// Wall-clock tick source
    pub clock: SystemClock,

    /// Simulated non-volatile region, saved to a host file on exit
    pub flash: SimFlash,

    /// What the light cells currently show
    pub panel: PanelBuffer,

    /// Program file to (re)load, if one was given
    pub source_path: Option<PathBuf>,

    /// Status message to display
    pub status_message: String,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    pub fn new(
        device: Device,
        clock: SystemClock,
        flash: SimFlash,
        panel: PanelBuffer,
        source_path: Option<PathBuf>,
    ) -> Self {
        App {
            device,
            clock,
            flash,
            panel,
            source_path,
            status_message: String::from("Ready"),
            should_quit: false,
        }
    }

    /// Deliver one raw command buffer to the device, exactly as the host
    /// link would.
    pub fn send(&mut self, buffer: &[u8]) {
        self.device
            .process(buffer, &mut self.clock, &mut self.flash, &mut self.panel);
    }

    /// Load (or reload) the program file: reset, then deliver the text in
    /// link-sized chunks.
    pub fn load_program_file(&mut self) {
        let Some(path) = self.source_path.clone() else {
            self.status_message = String::from("No program file given");
            return;
        };

        match fs::read_to_string(&path) {
            Ok(source) => {
                self.send(&[1]);
                for chunk in source.as_bytes().chunks(63) {
                    let mut buffer = Vec::with_capacity(64);
                    buffer.push(2);
                    buffer.extend_from_slice(chunk);
                    self.send(&buffer);
                }
                self.status_message = format!("Loaded {}", path.display());
            }
            Err(e) => {
                self.status_message = format!("Load failed: {}", e);
            }
        }
    }

    /// Run the simulator event loop.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let mut last_draw: Option<Instant> = None;

        loop {
            // poll the tick counter at roughly millisecond rate; drawing
            // happens on its own cadence
            self.device.exec(&mut self.clock, &mut self.panel);

            if last_draw.map_or(true, |t| t.elapsed() >= FRAME) {
                terminal.draw(|f| self.render(f))?;
                last_draw = Some(Instant::now());
            }

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(1))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::F(5) => {
                self.send(&[3]);
                self.status_message = String::from("Running");
            }
            KeyCode::Char('n') | KeyCode::F(6) => {
                self.send(&[4]);
                self.status_message = String::from("Stepped");
            }
            KeyCode::Char('x') | KeyCode::F(7) => {
                self.send(&[1]);
                self.status_message = String::from("Reset");
            }
            KeyCode::Char('s') => {
                let speed = self.next_speed();
                self.send(&[5, speed]);
                self.status_message = format!("Clock speed {} ips", speed);
            }
            KeyCode::Char('h') => {
                let on = !self.device.settings().tapehead_highlighting;
                self.send(&[6, on as u8]);
                self.status_message = format!(
                    "Tapehead highlighting {}",
                    if on { "on" } else { "off" }
                );
            }
            KeyCode::Char('w') => {
                self.send(&[7]);
                self.status_message = String::from("Stored program and settings");
            }
            KeyCode::Char('l') => {
                self.load_program_file();
            }
            _ => {}
        }
    }

    /// The next clock speed in the cycle after the current one.
    fn next_speed(&self) -> u8 {
        let current = self.device.settings().clock_speed;
        let index = CLOCK_SPEEDS.iter().position(|&s| s == current);
        match index {
            Some(i) => CLOCK_SPEEDS[(i + 1) % CLOCK_SPEEDS.len()],
            None => CLOCK_SPEEDS[0],
        }
    }

    fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(f.area());

        self.render_tape(f, chunks[0]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(chunks[1]);

        self.render_program(f, middle[0]);

        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(middle[1]);

        self.render_variables(f, side[0]);
        self.render_status(f, side[1]);

        self.render_footer(f, chunks[2]);
    }

    fn render_tape(&self, f: &mut Frame, area: Rect) {
        let theme = &DEFAULT_THEME;

        let cells: Vec<Span> = self
            .panel
            .leds()
            .iter()
            .map(|&led| Span::styled("██", Style::default().fg(led_to_color(led))))
            .collect();

        let head = self.device.machine().tape().head();
        let marker = match head {
            h if h < 0 => String::from("◂"),
            h if (h as usize) < NUM_CELLS => format!("{}▲", " ".repeat(h as usize * 2)),
            _ => format!("{}▸", " ".repeat(NUM_CELLS * 2)),
        };

        let lines = vec![
            Line::from(cells),
            Line::from(Span::styled(marker, Style::default().fg(theme.primary))),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Tape")
            .border_style(Style::default().fg(theme.border_focused));
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_program(&self, f: &mut Frame, area: Rect) {
        let theme = &DEFAULT_THEME;
        let machine = self.device.machine();
        let text = machine.program().as_str();
        let pos = machine.pos();

        let mut lines: Vec<Line> = Vec::new();
        let mut spans: Vec<Span> = Vec::new();
        let mut in_comment = false;

        for (i, ch) in text.char_indices() {
            if ch == '\n' {
                lines.push(Line::from(std::mem::take(&mut spans)));
                in_comment = false;
                continue;
            }

            if ch == ';' {
                in_comment = true;
            }

            let mut style = Style::default().fg(if in_comment {
                theme.comment
            } else if ch == '#' || ch == '^' {
                theme.primary
            } else {
                theme.fg
            });

            if i == pos {
                style = style.bg(theme.cursor_bg).add_modifier(Modifier::BOLD);
            }

            spans.push(Span::styled(ch.to_string(), style));
        }
        lines.push(Line::from(spans));

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Program")
            .border_style(Style::default().fg(theme.border_normal));
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_variables(&self, f: &mut Frame, area: Rect) {
        let theme = &DEFAULT_THEME;

        let lines: Vec<Line> = self
            .device
            .machine()
            .variables()
            .iter()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(format!("${}", name), Style::default().fg(theme.primary)),
                    Span::styled(format!(" = {}", value), Style::default().fg(theme.fg)),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Variables")
            .border_style(Style::default().fg(theme.border_normal));
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let theme = &DEFAULT_THEME;
        let machine = self.device.machine();

        let (state, state_color) = if machine.is_halted() {
            ("Halted", theme.error)
        } else if self.device.is_running() {
            if machine.wait_periods() > 0 {
                ("Waiting", theme.primary)
            } else {
                ("Running", theme.success)
            }
        } else {
            ("Stopped", theme.comment)
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("State: ", Style::default().fg(theme.comment)),
                Span::styled(state, Style::default().fg(state_color)),
            ]),
            Line::from(vec![
                Span::styled("Speed: ", Style::default().fg(theme.comment)),
                Span::styled(
                    format!("{} ips", self.device.settings().clock_speed),
                    Style::default().fg(theme.fg),
                ),
            ]),
            Line::from(vec![
                Span::styled("Head:  ", Style::default().fg(theme.comment)),
                Span::styled(
                    format!("{}", machine.tape().head()),
                    Style::default().fg(theme.fg),
                ),
            ]),
            Line::from(vec![
                Span::styled("Bytes: ", Style::default().fg(theme.comment)),
                Span::styled(
                    format!("{}/256", machine.program().len()),
                    Style::default().fg(theme.fg),
                ),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Machine")
            .border_style(Style::default().fg(theme.border_normal));
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let theme = &DEFAULT_THEME;

        let line = Line::from(vec![
            Span::styled(
                "q quit  r run  n step  x reset  s speed  h highlight  w store  l reload   ",
                Style::default().fg(theme.comment),
            ),
            Span::styled(self.status_message.as_str(), Style::default().fg(theme.fg)),
        ]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_normal));
        f.render_widget(Paragraph::new(vec![line]).block(block), area);
    }
}
