use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use log::{debug, warn};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, stdout, Stdout, Write};

use block_drop::{CellPos, Config, GridCell, Piece, Point, Session, SessionEvent};

// ============================================================================
// Visual Constants
// ============================================================================

const BLOCK_CHAR: &str = "█";
const SHADE_CHAR: &str = "·";
const EMPTY_CHAR: &str = " ";

/// Largest piece drawn in a holding slot, in sub-cells.
const SLOT_CELLS: u16 = 3;

// ============================================================================
// Screen Layout
// ============================================================================

/// Regions computed by the layout pass, outer rectangles including borders.
#[derive(Default)]
struct Screen {
    grid: Rect,
    slots: Vec<Rect>,
    footer: Rect,
}

impl Screen {
    fn slot_at(&self, column: u16, row: u16) -> Option<usize> {
        self.slots.iter().position(|r| {
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        })
    }
}

fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

/// Terminal extent of `count` cells of `size` plus `padding`, clamped to `u16`.
fn extent(count: usize, size: u16, padding: u16) -> u16 {
    u16::try_from(count)
        .unwrap_or(u16::MAX)
        .saturating_mul(size)
        .saturating_add(padding)
}

fn compute_screen(area: Rect, config: &Config, slots: usize) -> Screen {
    let grid_width = extent(config.grid_width, config.cell_width, 2);
    let grid_height = extent(config.grid_height, config.cell_height, 2);
    let slot_width = extent(SLOT_CELLS as usize, config.cell_width, 4);
    let slot_height = extent(SLOT_CELLS as usize, config.cell_height, 2);
    let holding_width = extent(slots, slot_width, 0);
    let total_width = grid_width.max(holding_width);
    let total_height = grid_height.saturating_add(slot_height).saturating_add(2);

    let main_area = centered_rect(total_width, total_height, area);
    let vertical = Layout::vertical([
        Constraint::Length(grid_height),
        Constraint::Length(slot_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let grid_row = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(grid_width),
        Constraint::Fill(1),
    ])
    .split(vertical[0]);

    let mut constraints = vec![Constraint::Fill(1)];
    constraints.extend(std::iter::repeat(Constraint::Length(slot_width)).take(slots));
    constraints.push(Constraint::Fill(1));
    let holding_row = Layout::horizontal(constraints).split(vertical[1]);

    Screen {
        grid: grid_row[1],
        slots: holding_row[1..=slots].to_vec(),
        footer: Rect {
            x: area.x,
            y: vertical[2].y,
            width: area.width,
            height: vertical[2].height,
        },
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}

/// Top-left of the piece drawn inside a holding slot.
fn slot_origin(slot: Rect) -> Point {
    let area = inner(slot);
    Point::new(area.x as i32 + 1, area.y as i32)
}

// ============================================================================
// App
// ============================================================================

struct Grab {
    slot: usize,
    /// Pointer position relative to the piece's top-left when it was grabbed.
    dx: i32,
    dy: i32,
}

struct App {
    config: Config,
    session: Session,
    screen: Screen,
    grab: Option<Grab>,
    status: String,
}

impl App {
    fn new(config: Config) -> Self {
        let session = Session::new(&config);
        Self {
            config,
            session,
            screen: Screen::default(),
            grab: None,
            status: "Drag a piece onto the board".into(),
        }
    }

    fn restart(&mut self) {
        self.session = Session::new(&self.config);
        self.grab = None;
        self.status = "New board".into();
    }

    /// Recomputes screen regions and writes cell bounds into the grid.
    fn layout(&mut self, area: Rect) {
        self.screen = compute_screen(area, &self.config, self.session.holding().len());
        let grid_area = inner(self.screen.grid);
        self.session.grid_mut().layout(
            Point::new(grid_area.x as i32, grid_area.y as i32),
            self.config.cell_width as i32,
            self.config.cell_height as i32,
        );
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        let pointer = Point::new(mouse.column as i32, mouse.row as i32);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.grab.is_none() => {
                let Some(slot) = self.screen.slot_at(mouse.column, mouse.row) else {
                    return Ok(());
                };
                if self.session.piece(slot).is_none() {
                    return Ok(());
                }
                let origin = slot_origin(self.screen.slots[slot]);
                let grab = Grab {
                    slot,
                    dx: pointer.x - origin.x,
                    dy: pointer.y - origin.y,
                };
                self.session.pick_up(slot)?;
                self.session
                    .drag_changed(slot, pointer.offset(-grab.dx, -grab.dy))?;
                self.grab = Some(grab);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(grab) = &self.grab {
                    self.session
                        .drag_changed(grab.slot, pointer.offset(-grab.dx, -grab.dy))?;
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(grab) = self.grab.take() {
                    self.session.drag_ended(grab.slot)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn drain_events(&mut self) {
        for event in self.session.take_events() {
            debug!("session event: {:?}", event);
            match event {
                SessionEvent::PiecePlaced { cells, .. } => {
                    self.status = format!("Placed {} cells", cells);
                }
                SessionEvent::PieceReturned(_) => {
                    self.status = "That piece does not fit there".into();
                }
                SessionEvent::HoldingRefilled => {
                    self.status = "New pieces".into();
                }
                SessionEvent::PiecePickedUp(_) | SessionEvent::PreviewChanged { .. } => {}
            }
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render(frame: &mut Frame, app: &App) {
    render_grid(frame, app);
    for slot in 0..app.screen.slots.len() {
        render_slot(frame, app, slot);
    }
    render_floating_piece(frame, app);
    render_footer(frame, app);
}

fn cell_span(app: &App, pos: CellPos, cell: &GridCell, preview_fits: bool) -> Span<'static> {
    let symbol = |s: &str| s.repeat(app.config.cell_width as usize);
    if cell.is_occupied() {
        let color = if app.session.conflicts().contains(&pos) {
            Color::Red
        } else {
            Color::Green
        };
        Span::styled(symbol(BLOCK_CHAR), Style::default().fg(color))
    } else if cell.is_highlighted() {
        let color = if preview_fits { Color::White } else { Color::Red };
        Span::styled(symbol(BLOCK_CHAR), Style::default().fg(color))
    } else if (pos.col / 3 + 3 * (pos.row / 3)) % 2 == 0 {
        // Alternate shading of the 3x3 boxes
        Span::styled(symbol(SHADE_CHAR), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(symbol(EMPTY_CHAR))
    }
}

fn render_grid(frame: &mut Frame, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Block Drop ")
        .title_alignment(Alignment::Center);
    frame.render_widget(block, app.screen.grid);

    let grid = app.session.grid();
    let preview_fits = app
        .session
        .dragged_slot()
        .and_then(|slot| app.session.piece(slot))
        .is_some_and(|piece| piece.fits_current_position);

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..grid.height() {
        let spans: Vec<Span> = (0..grid.width())
            .filter_map(|col| {
                let cell = grid.cell_at(row, col).ok()?;
                Some(cell_span(app, CellPos::new(row, col), cell, preview_fits))
            })
            .collect();
        for _ in 0..app.config.cell_height {
            lines.push(Line::from(spans.clone()));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner(app.screen.grid));
}

fn piece_lines(
    piece: &Piece,
    cell_width: u16,
    cell_height: u16,
    color: Color,
) -> Vec<Line<'static>> {
    let shape = piece.shape();
    let mut lines = Vec::new();
    for row in 0..shape.rows() {
        let spans: Vec<Span> = (0..shape.cols())
            .map(|col| {
                if shape.is_filled(row, col) {
                    Span::styled(BLOCK_CHAR.repeat(cell_width as usize), Style::default().fg(color))
                } else {
                    Span::raw(EMPTY_CHAR.repeat(cell_width as usize))
                }
            })
            .collect();
        for _ in 0..cell_height {
            lines.push(Line::from(spans.clone()));
        }
    }
    lines
}

fn render_slot(frame: &mut Frame, app: &App, slot: usize) {
    let area = app.screen.slots[slot];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", slot + 1))
        .title_alignment(Alignment::Center);
    frame.render_widget(block, area);

    let Some(piece) = app.session.piece(slot) else {
        return;
    };
    let color = if piece.is_being_dragged {
        Color::DarkGray
    } else {
        Color::Cyan
    };
    let origin = slot_origin(area);
    let content = inner(area);
    let target = Rect {
        x: origin.x as u16,
        y: origin.y as u16,
        width: content.width.saturating_sub(1),
        height: content.height,
    };
    let lines = piece_lines(piece, app.config.cell_width, app.config.cell_height, color);
    frame.render_widget(Paragraph::new(lines), target);
}

/// Draws the dragged piece under the pointer while it is away from the board;
/// over the board the preview shows where it lands.
fn render_floating_piece(frame: &mut Frame, app: &App) {
    let Some(piece) = app.session.dragged_slot().and_then(|slot| app.session.piece(slot)) else {
        return;
    };
    if app.session.grid().find_cell_containing(piece.drag_position).is_some() {
        return;
    }

    let area = frame.size();
    let cell_width = app.config.cell_width as i32;
    let cell_height = app.config.cell_height as i32;
    let symbol = BLOCK_CHAR.repeat(cell_width as usize);
    let style = Style::default().fg(Color::Cyan);

    for (row, col) in piece.shape().filled_cells() {
        let x = piece.drag_position.x + col as i32 * cell_width;
        for line in 0..cell_height {
            let y = piece.drag_position.y + row as i32 * cell_height + line;
            let visible = x >= area.x as i32
                && y >= area.y as i32
                && x + cell_width <= (area.x + area.width) as i32
                && y < (area.y + area.height) as i32;
            if visible {
                frame.buffer_mut().set_string(x as u16, y as u16, &symbol, style);
            }
        }
    }
}

fn render_footer(frame: &mut Frame, app: &App) {
    let area = app.screen.footer;
    if area.height == 0 {
        return;
    }
    let lines = vec![
        Line::from(app.status.as_str()),
        Line::from(Span::styled(
            "Mouse: drag pieces | R: New board | Q/ESC: Quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Main Loop
// ============================================================================

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, config: Config) -> Result<()> {
    let mut app = App::new(config);

    loop {
        app.layout(terminal.size()?);
        terminal.draw(|frame| render(frame, &app))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                KeyCode::Char('r') | KeyCode::Char('R') => app.restart(),
                _ => {}
            },
            Event::Mouse(mouse) => {
                if let Err(err) = app.handle_mouse(mouse) {
                    warn!("ignoring mouse event: {:#}", err);
                }
            }
            _ => {}
        }

        app.drain_events();
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::from_env().context("loading configuration")?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, config);

    let restored = restore_terminal(&mut stdout());

    result?;
    restored?;
    Ok(())
}

/// Runs every restore step even if an earlier one fails, then reports the first error.
fn restore_terminal<W: Write>(out: &mut W) -> io::Result<()> {
    let restored = [
        out.execute(DisableMouseCapture).map(|_| ()),
        disable_raw_mode(),
        out.execute(LeaveAlternateScreen).map(|_| ()),
    ];
    restored.into_iter().collect()
}
