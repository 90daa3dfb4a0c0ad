use std::io::{Stdout, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracelane_core::model::Lane;
use tracelane_core::view::{SelectedEvents, TraceView};
use tracelane_protocol::{
    self as protocol, LineStyle, Modifiers, PointerButton, PointerButtons, RenderCommand,
    TextAlign, ThemeToken,
};

/// Logical pixels per terminal row. One column is one pixel.
const ROW_PX: f64 = 10.0;
const LIST_ROWS: u16 = 8;
const HELP: &str =
    "drag: select | right-drag: pan | wheel: zoom | z/Z: zoom sel/all | x/X: drop/keep lanes | r: reload | q: quit";

fn to_color(color: protocol::Color) -> Color {
    let [r, g, b, _] = color.to_rgba8();
    Color::Rgb(r, g, b)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: protocol::Color,
    bg: protocol::Color,
}

/// Character grid the render commands are rasterized into.
struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    fn new(width: u16, height: u16) -> Self {
        let blank = Cell {
            ch: ' ',
            fg: protocol::Color::WHITE,
            bg: protocol::Color::BLACK,
        };
        Self {
            width,
            height,
            cells: vec![blank; usize::from(width) * usize::from(height)],
        }
    }

    fn cell_mut(&mut self, col: i64, row: i64) -> Option<&mut Cell> {
        let col = u16::try_from(col).ok().filter(|c| *c < self.width)?;
        let row = u16::try_from(row).ok().filter(|r| *r < self.height)?;
        self.cells
            .get_mut(usize::from(row) * usize::from(self.width) + usize::from(col))
    }

    /// Rows whose centre lies inside `[y, y + h)`, or the row holding `y`
    /// when the span is thinner than a row.
    fn rows(y: f64, h: f64) -> std::ops::Range<i64> {
        let first = ((y / ROW_PX) - 0.5).ceil() as i64;
        let last = (((y + h) / ROW_PX) - 0.5).ceil() as i64;
        if last > first {
            first..last
        } else {
            let row = (y / ROW_PX).floor() as i64;
            row..row + 1
        }
    }

    fn cols(x: f64, w: f64) -> std::ops::Range<i64> {
        let first = x.floor() as i64;
        let last = (x + w).ceil() as i64;
        first..last.max(first + 1)
    }

    fn draw(&mut self, commands: &[RenderCommand]) {
        for cmd in commands {
            match cmd {
                RenderCommand::FillRect { rect, paint, .. } => {
                    if rect.w <= 0.0 || rect.h <= 0.0 {
                        continue;
                    }
                    let color = paint.resolve();
                    for row in Self::rows(rect.y, rect.h) {
                        for col in Self::cols(rect.x, rect.w) {
                            if let Some(cell) = self.cell_mut(col, row) {
                                cell.bg = color.over(cell.bg);
                                cell.ch = ' ';
                            }
                        }
                    }
                }
                RenderCommand::DrawLine {
                    from,
                    to,
                    paint,
                    style,
                    ..
                } => {
                    // The frame only draws vertical lines.
                    let glyph = match style {
                        LineStyle::Dotted => '┊',
                        LineStyle::Solid => '│',
                    };
                    let col = from.x.floor() as i64;
                    let (top, bottom) = (from.y.min(to.y), from.y.max(to.y));
                    let color = paint.resolve();
                    for row in Self::rows(top, bottom - top) {
                        if let Some(cell) = self.cell_mut(col, row) {
                            cell.ch = glyph;
                            cell.fg = color;
                        }
                    }
                }
                RenderCommand::DrawText {
                    position,
                    text,
                    paint,
                    font_size,
                    align,
                } => {
                    let len = text.chars().count() as i64;
                    let x = position.x.round() as i64;
                    let start = match align {
                        TextAlign::Left => x,
                        TextAlign::Center => x - len / 2,
                        TextAlign::Right => x - len,
                    };
                    let row = ((position.y - font_size * 0.5) / ROW_PX).floor() as i64;
                    let color = paint.resolve();
                    for (i, ch) in (0i64..).zip(text.chars()) {
                        if let Some(cell) = self.cell_mut(start + i, row) {
                            cell.ch = ch;
                            cell.fg = color;
                        }
                    }
                }
                RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
            }
        }
    }

    fn blit(&self, buf: &mut Buffer, area: Rect) {
        for row in 0..self.height.min(area.height) {
            for col in 0..self.width.min(area.width) {
                let cell = self.cells[usize::from(row) * usize::from(self.width) + usize::from(col)];
                buf[(area.x + col, area.y + row)]
                    .set_char(cell.ch)
                    .set_fg(to_color(cell.fg))
                    .set_bg(to_color(cell.bg));
            }
        }
    }
}

struct RenamePrompt {
    lane: usize,
    name: String,
}

struct App<'a> {
    view: &'a mut TraceView,
    title: &'a str,
    held: PointerButtons,
    rename: Option<RenamePrompt>,
    status: Option<String>,
    list_scroll: u16,
    canvas_area: Rect,
    quit: bool,
}

fn modifiers(m: KeyModifiers) -> Modifiers {
    Modifiers {
        shift: m.contains(KeyModifiers::SHIFT),
        alt: m.contains(KeyModifiers::ALT),
        ctrl: m.contains(KeyModifiers::CONTROL),
    }
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
    }
}

impl App<'_> {
    fn draw(&mut self, frame: &mut Frame) {
        let [header, canvas, list, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(LIST_ROWS),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        self.canvas_area = canvas;

        let header_text = format!(
            " tracelane: {} | {} lanes",
            self.title,
            self.view.lanes().len()
        );
        frame.render_widget(
            Paragraph::new(header_text).style(Style::default().fg(Color::White).bg(Color::DarkGray)),
            header,
        );

        self.view
            .resize(f64::from(canvas.width), f64::from(canvas.height) * ROW_PX);
        let mut raster = Canvas::new(canvas.width, canvas.height);
        raster.draw(&self.view.render());
        raster.blit(frame.buffer_mut(), canvas);

        frame.render_widget(
            Paragraph::new(self.list_lines())
                .scroll((self.list_scroll, 0))
                .block(Block::default().borders(Borders::TOP)),
            list,
        );

        let status_text = match &self.rename {
            Some(prompt) => format!("rename lane {}: {}_", prompt.lane, prompt.name),
            None => self
                .status
                .clone()
                .or_else(|| self.view.hover_text())
                .unwrap_or_else(|| HELP.to_string()),
        };
        frame.render_widget(
            Paragraph::new(status_text).style(Style::default().fg(Color::Gray)),
            status,
        );
    }

    fn list_lines(&self) -> Vec<Line<'static>> {
        match self.view.selected_events() {
            SelectedEvents::Events(events) => events
                .iter()
                .map(|event| {
                    Line::from(Span::styled(
                        event.text.clone(),
                        Style::default().fg(to_color(event.color)),
                    ))
                })
                .collect(),
            SelectedEvents::TooMany(_) => self
                .view
                .selected_events()
                .lines()
                .into_iter()
                .map(|line| {
                    Line::from(Span::styled(
                        line,
                        Style::default().fg(to_color(ThemeToken::ListText.color())),
                    ))
                })
                .collect(),
        }
    }

    fn pointer_pos(&self, column: u16, row: u16) -> Option<(f64, f64)> {
        let area = self.canvas_area;
        if column < area.x || row < area.y || row >= area.y + area.height {
            return None;
        }
        let x = f64::from(column - area.x);
        let y = f64::from(row - area.y) * ROW_PX + ROW_PX / 2.0;
        Some((x, y))
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let mods = modifiers(mouse.modifiers);
        let pos = self.pointer_pos(mouse.column, mouse.row);
        let response = match (mouse.kind, pos) {
            (MouseEventKind::Down(button), Some((x, y))) => {
                let button = pointer_button(button);
                self.held.set(button, true);
                self.view.pointer_down(x, y, button, mods)
            }
            (MouseEventKind::Up(button), _) => {
                self.held.set(pointer_button(button), false);
                self.view.pointer_up()
            }
            (MouseEventKind::Drag(_) | MouseEventKind::Moved, Some((x, y))) => {
                self.view.pointer_move(x, y, self.held, mods)
            }
            (MouseEventKind::ScrollUp, _) => self.view.wheel(0.0, 120.0, mods),
            (MouseEventKind::ScrollDown, _) => self.view.wheel(0.0, -120.0, mods),
            (MouseEventKind::ScrollLeft, _) => self.view.wheel(-ROW_PX, 0.0, mods),
            (MouseEventKind::ScrollRight, _) => self.view.wheel(ROW_PX, 0.0, mods),
            _ => return,
        };
        if response.selection_changed {
            self.list_scroll = 0;
        }
        if let Some(lane) = response.rename_lane {
            let name = self
                .view
                .lane(lane)
                .map(|l| l.name.to_string())
                .unwrap_or_default();
            self.rename = Some(RenamePrompt { lane, name });
        }
    }

    fn on_rename_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.rename.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => {
                if let Some(prompt) = self.rename.take()
                    && !self.view.rename_lane(prompt.lane, prompt.name)
                {
                    log::warn!("lane {} disappeared before rename", prompt.lane);
                }
            }
            KeyCode::Esc => self.rename = None,
            KeyCode::Backspace => {
                prompt.name.pop();
            }
            KeyCode::Char(c) => prompt.name.push(c),
            _ => {}
        }
    }

    fn on_key(&mut self, key: KeyEvent, reload: &mut impl FnMut() -> Result<Vec<Lane>>) {
        if self.rename.is_some() {
            self.on_rename_key(key);
            return;
        }
        let mods = modifiers(key.modifiers);
        self.status = None;
        let pan = self.view.viewport().time.delta() * 0.1;
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('c') if mods.ctrl => self.quit = true,
            KeyCode::Char('r') => match reload() {
                Ok(lanes) => {
                    self.view.set_lanes(lanes);
                    self.status = Some(format!("reloaded {}", self.title));
                }
                Err(err) => {
                    log::warn!("reload failed: {err:#}");
                    self.status = Some(format!("reload failed: {err:#}"));
                }
            },
            KeyCode::Esc => {
                self.view.key(protocol::KeyCode::Escape, mods);
            }
            KeyCode::Char('+' | '=') => {
                self.view.key(protocol::KeyCode::Plus, mods);
            }
            KeyCode::Char('-') => {
                self.view.key(protocol::KeyCode::Minus, mods);
            }
            KeyCode::Char(c) => {
                let response = self.view.key(protocol::KeyCode::Char(c), mods);
                if response.selection_changed {
                    self.list_scroll = 0;
                }
            }
            KeyCode::Left => self.view.viewport_mut().pan_by(-pan),
            KeyCode::Right => self.view.viewport_mut().pan_by(pan),
            KeyCode::Up => {
                let viewport = self.view.viewport_mut();
                viewport.scroll_y = (viewport.scroll_y - ROW_PX).max(0.0);
            }
            KeyCode::Down => self.view.viewport_mut().scroll_y += ROW_PX,
            KeyCode::PageUp => self.list_scroll = self.list_scroll.saturating_sub(LIST_ROWS - 1),
            KeyCode::PageDown => self.list_scroll = self.list_scroll.saturating_add(LIST_ROWS - 1),
            _ => {}
        }
    }
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<'_>,
    reload: &mut impl FnMut() -> Result<Vec<Lane>>,
) -> Result<()> {
    while !app.quit {
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key, reload),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}

/// Run `body`, then `restore` whether or not `body` failed. The first
/// error wins.
fn with_restore<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(
        stdout(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        cursor::Show
    )?;
    Ok(())
}

/// Run the interactive viewer until the user quits. `reload` re-reads the
/// trace from its source.
pub fn run(
    view: &mut TraceView,
    title: &str,
    mut reload: impl FnMut() -> Result<Vec<Lane>>,
) -> Result<()> {
    enable_raw_mode()?;
    with_restore(
        || {
            let mut stdout = stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            let backend = CrosstermBackend::new(stdout);
            let mut terminal = Terminal::new(backend)?;

            let mut app = App {
                view,
                title,
                held: PointerButtons::NONE,
                rename: None,
                status: None,
                list_scroll: 0,
                canvas_area: Rect::default(),
                quit: false,
            };
            event_loop(&mut terminal, &mut app, &mut reload)
        },
        restore_terminal,
    )
}

#[cfg(test)]
mod tests {
    use tracelane_protocol::{Paint, Point, Rect as PxRect};

    use super::*;

    fn cell(canvas: &Canvas, col: usize, row: usize) -> Cell {
        canvas.cells[row * usize::from(canvas.width) + col]
    }

    #[test]
    fn fill_covers_rows_by_centre() {
        let mut canvas = Canvas::new(10, 4);
        let red = protocol::Color::rgb(1.0, 0.0, 0.0);
        canvas.draw(&[RenderCommand::fill(PxRect::new(2.0, 10.0, 3.0, 20.0), red)]);
        assert_eq!(cell(&canvas, 2, 1).bg, red);
        assert_eq!(cell(&canvas, 4, 2).bg, red);
        assert_eq!(cell(&canvas, 2, 0).bg, protocol::Color::BLACK);
        assert_eq!(cell(&canvas, 2, 3).bg, protocol::Color::BLACK);
        assert_eq!(cell(&canvas, 5, 1).bg, protocol::Color::BLACK);
    }

    #[test]
    fn thin_fill_lands_in_its_row() {
        let mut canvas = Canvas::new(4, 4);
        let white = protocol::Color::WHITE;
        canvas.draw(&[RenderCommand::fill(PxRect::new(0.0, 21.0, 1.0, 1.0), white)]);
        assert_eq!(cell(&canvas, 0, 2).bg, white);
    }

    #[test]
    fn translucent_fill_blends() {
        let mut canvas = Canvas::new(1, 1);
        canvas.draw(&[RenderCommand::fill(
            PxRect::new(0.0, 0.0, 1.0, 10.0),
            protocol::Color::WHITE.with_alpha(0.5),
        )]);
        let [r, g, b, _] = cell(&canvas, 0, 0).bg.to_rgba8();
        assert!((127..=128).contains(&r));
        assert_eq!((r, g), (g, b));
    }

    #[test]
    fn aligned_text_and_dotted_line() {
        let mut canvas = Canvas::new(20, 3);
        canvas.draw(&[
            RenderCommand::DrawText {
                position: Point::new(20.0, 13.0),
                text: "abc".into(),
                paint: Paint::Theme(ThemeToken::InfoText),
                font_size: 10.0,
                align: TextAlign::Right,
            },
            RenderCommand::DrawLine {
                from: Point::new(5.0, 0.0),
                to: Point::new(5.0, 30.0),
                paint: Paint::Theme(ThemeToken::SelectionEdge),
                width: 1.0,
                style: LineStyle::Dotted,
            },
        ]);
        let row0: String = (0..20).map(|c| cell(&canvas, c, 0).ch).collect();
        assert!(row0.ends_with("abc"));
        assert_eq!(cell(&canvas, 5, 2).ch, '┊');
        assert_eq!(cell(&canvas, 17, 0).fg, ThemeToken::InfoText.color());
    }

    #[test]
    fn restore_runs_after_failed_setup() {
        let mut restored = false;
        let result: Result<()> = with_restore(
            || anyhow::bail!("no terminal"),
            || {
                restored = true;
                Ok(())
            },
        );
        assert!(restored);
        assert_eq!(result.unwrap_err().to_string(), "no terminal");
    }

    #[test]
    fn restore_failure_is_reported_after_success() {
        let result = with_restore(|| Ok(7), || anyhow::bail!("still raw"));
        assert_eq!(result.unwrap_err().to_string(), "still raw");
        assert_eq!(with_restore(|| Ok(7), || Ok(())).unwrap(), 7);
    }

    #[test]
    fn off_canvas_commands_are_clipped() {
        let mut canvas = Canvas::new(2, 2);
        canvas.draw(&[
            RenderCommand::fill(PxRect::new(-5.0, -20.0, 100.0, 100.0), protocol::Color::WHITE),
            RenderCommand::DrawText {
                position: Point::new(-1.0, 200.0),
                text: "far away".into(),
                paint: Paint::Theme(ThemeToken::ListText),
                font_size: 10.0,
                align: TextAlign::Left,
            },
        ]);
        assert!(canvas.cells.iter().all(|c| c.bg == protocol::Color::WHITE && c.ch == ' '));
    }
}
