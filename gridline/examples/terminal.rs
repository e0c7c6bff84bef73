//! Terminal Example
//!
//! A process table driven by gridline and drawn with crossterm:
//! - Virtualized rows with expandable detail lines
//! - Pinned pid and cpu columns with shadows while scrolled
//! - Client-side sorting on name and cpu
//! - Row add/remove transitions driven by a background task
//! - Mouse column resizing and a draggable horizontal scrollbar
//!
//! Keys: Up/Down move, Space selects, `a` toggles all, Enter expands,
//! `s`/`c` sort by name/cpu, `n` spawns a row, `d` kills the current row,
//! `r` resets column widths, Left/Right scroll horizontally, `q` quits.

use std::fs::File;
use std::io::{self, Stdout, Write};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{cursor, execute, queue};
use futures::StreamExt;
use gridline::prelude::*;
use log::{LevelFilter, debug, info};
use simplelog::{Config, WriteLogger};
use tokio::time::{Duration, interval};

const EXPANDED_HEIGHT: f64 = 3.0;
const EDGE_TOLERANCE: f64 = 1.0;

// ============================================================================
// Data
// ============================================================================

#[derive(Debug, Clone)]
struct Process {
    pid: u32,
    name: String,
    owner: &'static str,
    cpu: f64,
    command: String,
}

impl Process {
    fn new(pid: u32) -> Self {
        const NAMES: [&str; 6] = [
            "postgres",
            "nginx",
            "cargo",
            "rust-analyzer",
            "sshd",
            "tokio-rt",
        ];
        const OWNERS: [&str; 3] = ["root", "www", "dev"];
        let name = NAMES[pid as usize % NAMES.len()];
        Self {
            pid,
            name: format!("{name}-{pid}"),
            owner: OWNERS[pid as usize % OWNERS.len()],
            cpu: f64::from((pid * 37) % 1000) / 10.0,
            command: format!("/usr/bin/{name} --worker {pid} --config /etc/{name}/{name}.conf"),
        }
    }

    fn cell(&self, column: &str) -> String {
        match column {
            "pid" => self.pid.to_string(),
            "name" => self.name.clone(),
            "owner" => self.owner.to_string(),
            "cpu" => format!("{:.1}%", self.cpu),
            "command" => self.command.clone(),
            _ => String::new(),
        }
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("pid").title("PID").width(7.0).fixed(FixedSide::Start),
        Column::new("name")
            .title("NAME")
            .min_width(18.0)
            .sortable()
            .resizable(),
        Column::new("owner").title("OWNER").width(8.0),
        Column::new("command")
            .title("COMMAND")
            .min_width(60.0)
            .resizable(),
        Column::new("cpu")
            .title("CPU")
            .width(8.0)
            .sortable()
            .fixed(FixedSide::End),
    ]
}

fn build_grid() -> Result<Grid<Process, u32>, GridError> {
    let mut config = GridConfig::new()
        .virtualized(1.0)
        .overscan(2)
        .selection(SelectionMode::Multiple)
        .expandable()
        .highlight(Duration::from_millis(800))
        .fade_out(Duration::from_millis(400));
    config.selection_column_width = 4.0;
    config.expansion_column_width = 2.0;

    Grid::builder(columns(), RowIdentity::new(|p: &Process| p.pid))
        .config(config)
        .sort_mode(
            SortMode::client()
                .comparator("name", |a: &Process, b: &Process| a.name.cmp(&b.name))
                .comparator("cpu", |a: &Process, b: &Process| a.cpu.total_cmp(&b.cpu)),
        )
        .disabled(|p: &Process| p.owner == "root")
        .rows((1..=200).map(Process::new).collect())
        .build()
}

// ============================================================================
// Terminal
// ============================================================================

/// Raw mode and alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, cursor::Show);
    }
}

// ============================================================================
// Renderer
// ============================================================================

struct TerminalRenderer {
    out: Stdout,
    width: u16,
    height: u16,
    cursor: Option<u32>,
}

/// One line of cells, written left to right with clipping.
struct Line(Vec<char>);

impl Line {
    fn new(width: usize) -> Self {
        Self(vec![' '; width])
    }

    fn put(&mut self, left: f64, width: f64, text: &str) {
        let start = left.round() as i64;
        let len = width.round().max(0.0) as i64;
        for i in 0..len {
            let x = start + i;
            if x < 0 || x as usize >= self.0.len() {
                continue;
            }
            let ch = if i == len - 1 {
                ' '
            } else {
                text.chars().nth(i as usize).unwrap_or(' ')
            };
            self.0[x as usize] = ch;
        }
    }

    fn mark(&mut self, x: f64, ch: char) {
        let x = x.round() as i64;
        if x >= 0 && (x as usize) < self.0.len() {
            self.0[x as usize] = ch;
        }
    }

    fn text(&self) -> String {
        self.0.iter().collect()
    }
}

/// On-screen left edge of each column, pinned columns clamped to their edges.
fn placements(snapshot: &RenderSnapshot<Process, u32>, container: f64) -> Vec<f64> {
    let mut natural = 0.0;
    snapshot
        .columns
        .iter()
        .map(|column| {
            let left = natural - snapshot.scroll_left;
            natural += column.width;
            match column.fixed {
                Some(offset) if offset.side == FixedSide::Start => left.max(offset.offset),
                Some(offset) => left.min(container - offset.offset - column.width),
                None => left,
            }
        })
        .collect()
}

impl TerminalRenderer {
    fn new(width: u16, height: u16) -> Self {
        Self {
            out: io::stdout(),
            width,
            height,
            cursor: None,
        }
    }

    fn body_height(&self) -> u16 {
        self.height.saturating_sub(2)
    }

    /// Fill a line, drawing scrolling columns first so pinned ones cover them.
    fn line(
        &self,
        snapshot: &RenderSnapshot<Process, u32>,
        cell: impl Fn(&RenderColumn) -> String,
    ) -> String {
        let lefts = placements(snapshot, f64::from(self.width));
        let mut line = Line::new(self.width as usize);
        for pinned in [false, true] {
            for (column, &left) in snapshot.columns.iter().zip(&lefts) {
                if column.fixed.is_some() != pinned {
                    continue;
                }
                line.put(left, column.width, &cell(column));
                if snapshot.fixed.has_shadow(&column.key) {
                    match column.fixed.map(|o| o.side) {
                        Some(FixedSide::Start) => line.mark(left + column.width - 1.0, '│'),
                        Some(FixedSide::End) => line.mark(left, '│'),
                        None => {}
                    }
                }
            }
        }
        line.text()
    }

    fn header(&self, snapshot: &RenderSnapshot<Process, u32>) -> String {
        self.line(snapshot, |column| match column.key.as_str() {
            "__selection" if snapshot.all_selected => "[x]".into(),
            "__selection" if snapshot.indeterminate => "[-]".into(),
            "__selection" => "[ ]".into(),
            _ if column.action => String::new(),
            _ => {
                let title = column.title.clone().unwrap_or_else(|| column.key.clone());
                match column.sort {
                    SortDirection::Ascending => format!("{title} ▲"),
                    SortDirection::Descending => format!("{title} ▼"),
                    SortDirection::None => title,
                }
            }
        })
    }

    fn row_line(
        &self,
        snapshot: &RenderSnapshot<Process, u32>,
        row: &RenderedRow<Process, u32>,
    ) -> String {
        self.line(snapshot, |column| match column.key.as_str() {
            "__selection" if row.flags.disabled => " - ".into(),
            "__selection" if row.flags.selected => "[x]".into(),
            "__selection" => "[ ]".into(),
            "__expansion" if row.flags.expanded => "▾".into(),
            "__expansion" => "▸".into(),
            "__drag" => "::".into(),
            key => row.row.cell(key),
        })
    }

    fn row_color(&self, row: &RenderedRow<Process, u32>) -> Color {
        if row.flags.fading_out {
            Color::DarkGrey
        } else if row.flags.deleting {
            Color::Red
        } else if row.flags.adding {
            Color::Green
        } else if row.flags.disabled {
            Color::Grey
        } else {
            Color::Reset
        }
    }

    fn scrollbar(&self, snapshot: &RenderSnapshot<Process, u32>) -> String {
        let track = HorizontalTrack::new(
            0.0,
            f64::from(self.width),
            snapshot.content_width(),
            f64::from(self.width),
            snapshot.scroll_left,
        );
        let mut line = Line::new(self.width as usize);
        for x in 0..self.width {
            let x = f64::from(x);
            line.mark(x, if track.handle_contains(x) { '█' } else { '░' });
        }
        line.text()
    }
}

impl HostRenderer<Process, u32> for TerminalRenderer {
    type Error = io::Error;

    fn render(&mut self, snapshot: &RenderSnapshot<Process, u32>) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        let header = self.header(snapshot);
        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            SetAttribute(Attribute::Bold),
            Print(header),
            SetAttribute(Attribute::Reset)
        )?;

        let body = f64::from(self.body_height());
        let mut y = snapshot.window.map(|w| w.padding_top).unwrap_or(0.0) - snapshot.scroll_top;
        for row in &snapshot.rows {
            let height = if row.flags.expanded { EXPANDED_HEIGHT } else { 1.0 };
            if y >= body {
                break;
            }
            if y + height > 0.0 {
                let line = self.row_line(snapshot, row);
                let reverse = row.flags.selected || row.flags.dragging;
                let current = self.cursor == Some(row.key);
                let color = self.row_color(row);
                for offset in 0..height as usize {
                    let line_y = y + offset as f64;
                    if line_y < 0.0 || line_y >= body {
                        continue;
                    }
                    let text = if offset == 0 {
                        line.clone()
                    } else if offset == 1 {
                        format!("      owner {}  cpu {:.1}%", row.row.owner, row.row.cpu)
                    } else {
                        format!("      {}", row.row.command)
                    };
                    queue!(
                        self.out,
                        cursor::MoveTo(0, line_y as u16 + 1),
                        SetForegroundColor(color)
                    )?;
                    if reverse {
                        queue!(self.out, SetAttribute(Attribute::Reverse))?;
                    }
                    if current {
                        queue!(self.out, SetAttribute(Attribute::Bold))?;
                    }
                    queue!(self.out, Print(text), SetAttribute(Attribute::Reset), ResetColor)?;
                }
            }
            y += height;
        }

        let footer = self.scrollbar(snapshot);
        queue!(
            self.out,
            cursor::MoveTo(0, self.height.saturating_sub(1)),
            Print(footer)
        )?;
        self.out.flush()
    }
}

// ============================================================================
// Input
// ============================================================================

struct App {
    grid: Grid<Process, u32>,
    renderer: TerminalRenderer,
    cursor: usize,
    next_pid: u32,
    scrollbar_grab: Option<f64>,
    redraw: bool,
    quit: bool,
}

impl App {
    fn new(grid: Grid<Process, u32>, width: u16, height: u16) -> Self {
        let app = Self {
            grid,
            renderer: TerminalRenderer::new(width, height),
            cursor: 0,
            next_pid: 201,
            scrollbar_grab: None,
            redraw: true,
            quit: false,
        };
        app.resize(width, height);
        app
    }

    fn resize(&self, width: u16, height: u16) {
        if let Err(e) = self.grid.handle_gesture(GestureEvent::Resize {
            width: f64::from(width),
        }) {
            debug!("resize rejected: {e}");
        }
        self.grid.set_viewport(f64::from(height.saturating_sub(2)));
    }

    fn current(&self) -> Option<Process> {
        self.grid.page_rows().get(self.cursor).cloned()
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.grid.page_rows().len();
        if len == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
        self.grid.handle().scroll_to_index(self.cursor, ScrollAlign::Auto);
    }

    fn scroll_by(&self, dx: f64, dy: f64) {
        let snapshot = self.grid.snapshot();
        let max_left = (snapshot.content_width() - f64::from(self.renderer.width)).max(0.0);
        let _ = self.grid.handle_gesture(GestureEvent::Scroll {
            top: snapshot.scroll_top + dy,
            left: (snapshot.scroll_left + dx).min(max_left),
        });
    }

    /// Every expanded row is three lines tall.
    fn remeasure(&self) {
        for key in self.grid.expanded() {
            self.grid.measure_row(key, EXPANDED_HEIGHT);
        }
    }

    fn spawn_process(&mut self) {
        let process = Process::new(self.next_pid);
        self.next_pid += 1;
        let pid = process.pid;
        let mut rows = self.grid.rows();
        rows.insert(self.cursor.min(rows.len()), process);
        match self
            .grid
            .update_data_source(rows, DataSourceHints::new().added([pid]))
        {
            Ok(()) => info!("spawned {pid}"),
            Err(e) => debug!("spawn failed: {e}"),
        }
    }

    fn kill_current(&self) {
        let Some(process) = self.current() else {
            return;
        };
        let rows: Vec<Process> = self
            .grid
            .rows()
            .into_iter()
            .filter(|p| p.pid != process.pid)
            .collect();
        match self
            .grid
            .update_data_source(rows, DataSourceHints::new().removed([process.pid]))
        {
            Ok(()) => info!("killed {}", process.pid),
            Err(e) => debug!("kill failed: {e}"),
        }
    }

    fn sort(&self, column: &str) {
        match self.grid.sort_by(column) {
            Ok(state) => debug!("sorted: {state:?}"),
            Err(e) => debug!("sort rejected: {e}"),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-(self.renderer.body_height() as isize)),
            KeyCode::PageDown => self.move_cursor(self.renderer.body_height() as isize),
            KeyCode::Left => self.scroll_by(-4.0, 0.0),
            KeyCode::Right => self.scroll_by(4.0, 0.0),
            KeyCode::Char(' ') => {
                if let Some(process) = self.current() {
                    self.grid.toggle_row_selection(process.pid);
                }
            }
            KeyCode::Char('a') => {
                self.grid.toggle_all_selection();
            }
            KeyCode::Enter => {
                if let Some(process) = self.current() {
                    self.grid.toggle_expand(process.pid);
                    self.remeasure();
                }
            }
            KeyCode::Char('s') => self.sort("name"),
            KeyCode::Char('c') => self.sort("cpu"),
            KeyCode::Char('n') => self.spawn_process(),
            KeyCode::Char('d') => self.kill_current(),
            KeyCode::Char('r') => self.grid.reset_column_widths(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let footer = self.renderer.height.saturating_sub(1);
        let x = f64::from(mouse.column);
        match mouse.kind {
            MouseEventKind::ScrollDown => return self.scroll_by(0.0, 3.0),
            MouseEventKind::ScrollUp => return self.scroll_by(0.0, -3.0),
            _ => {}
        }

        let snapshot = self.grid.snapshot();
        let viewport = f64::from(self.renderer.width);
        let track = HorizontalTrack::new(
            0.0,
            viewport,
            snapshot.content_width(),
            viewport,
            snapshot.scroll_left,
        );
        match (mouse.kind, self.scrollbar_grab) {
            (MouseEventKind::Down(MouseButton::Left), _) if mouse.row == footer => {
                if track.handle_contains(x) {
                    self.scrollbar_grab = Some(track.grab_offset(x));
                }
                return;
            }
            (MouseEventKind::Drag(MouseButton::Left), Some(grab)) => {
                let gesture =
                    track.drag_to(x, grab, snapshot.content_width(), viewport, snapshot.scroll_top);
                let _ = self.grid.handle_gesture(gesture);
                return;
            }
            (MouseEventKind::Up(MouseButton::Left), Some(_)) => {
                self.scrollbar_grab = None;
                return;
            }
            _ => {}
        }

        let grid = &self.grid;
        if let Some(gesture) = from_mouse(mouse, 1.0, |x| grid.resize_edge_at(x, EDGE_TOLERANCE)) {
            if let Err(e) = grid.handle_gesture(gesture) {
                debug!("gesture rejected: {e}");
            }
        }
    }

    fn handle_event(&mut self, event: Event) {
        self.redraw = true;
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.renderer.width = width;
                self.renderer.height = height;
                self.resize(width, height);
            }
            _ => {}
        }
    }

    fn draw(&mut self) -> io::Result<()> {
        self.redraw = false;
        self.renderer.cursor = self.current().map(|p| p.pid);
        self.grid.render(&mut self.renderer)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let grid = build_grid()?;
    grid.subscribe(|event| debug!("grid event: {:?}", event.kind()));
    let driver = TransitionDriver::spawn(&grid);

    let _guard = TerminalGuard::new()?;
    let (width, height) = terminal::size()?;
    let mut app = App::new(grid, width, height);
    let mut events = EventStream::new();
    let mut frames = interval(Duration::from_millis(33));

    while !app.quit {
        tokio::select! {
            Some(event) = events.next() => app.handle_event(event?),
            _ = frames.tick() => {
                if app.redraw || app.grid.is_dirty() {
                    app.draw()?;
                }
            }
        }
    }

    app.grid.teardown();
    driver.shutdown();
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Ok(log_file) = File::create("terminal.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
    }
}
