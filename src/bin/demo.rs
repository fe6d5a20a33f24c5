//! Terminal demo - drive the keyboard with the mouse.
//!
//! The keyboard is scaled to fill the terminal below two status lines. Click
//! or drag on keys to type; hold backspace to repeat; drag on space to move
//! the cursor. `Tab` rotates, `F2` toggles dark appearance, `Esc` quits.
//!
//! Logs go to stderr: `RUST_LOG=spark_keyboard=debug spark-keyboard-demo 2>demo.log`

use std::io::{stdout, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use spark_keyboard::{
    InputModeList, Key, KeyboardController, Orientation, Point, PointerEvent, PointerPhase,
    ProfileRegistry, Size, TextDocumentProxy,
};

/// Lines above the keyboard: document text and status.
const HEADER_LINES: u16 = 2;
const IDLE_POLL: Duration = Duration::from_millis(250);

// =============================================================================
// HOST DOCUMENT
// =============================================================================

#[derive(Default)]
struct Document {
    text: Vec<char>,
    cursor: usize,
    status: String,
}

impl TextDocumentProxy for Document {
    fn insert_text(&mut self, text: &str) {
        for c in text.chars() {
            self.text.insert(self.cursor, c);
            self.cursor += 1;
        }
    }

    fn delete_backward(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.text.remove(self.cursor);
        }
    }

    fn adjust_text_position(&mut self, offset: i64) {
        let target = self.cursor as i64 + offset;
        self.cursor = target.clamp(0, self.text.len() as i64) as usize;
    }
}

impl InputModeList for Document {
    fn handle_input_mode_list(&mut self, anchor: &Key, event: &PointerEvent) {
        self.status = format!(
            "input mode list requested from {} ({:?})",
            anchor.action().label(),
            event.phase
        );
    }
}

// =============================================================================
// TERMINAL
// =============================================================================

/// Restores the terminal on drop, including on early return.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Points per terminal cell on each axis.
#[derive(Debug, Clone, Copy)]
struct Scale {
    x: f64,
    y: f64,
}

impl Scale {
    fn for_terminal(keyboard: Size) -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let key_rows = rows.saturating_sub(HEADER_LINES).max(1);
        Ok(Self {
            x: keyboard.width / f64::from(cols.max(1)),
            y: keyboard.height / f64::from(key_rows),
        })
    }

    /// Centre of a terminal cell in keyboard coordinates.
    fn to_point(self, column: u16, row: u16) -> Option<Point> {
        let row = row.checked_sub(HEADER_LINES)?;
        Some(Point::new(
            (f64::from(column) + 0.5) * self.x,
            (f64::from(row) + 0.5) * self.y,
        ))
    }

    fn to_cell(self, point: Point) -> (u16, u16) {
        let column = (point.x / self.x).floor().max(0.0) as u16;
        let row = (point.y / self.y).floor().max(0.0) as u16;
        (column, row + HEADER_LINES)
    }
}

fn render(out: &mut Stdout, controller: &KeyboardController<Document>, scale: Scale) -> std::io::Result<()> {
    let document = controller.host();
    let mut line: String = document.text.iter().collect();
    line.insert(
        line.char_indices().nth(document.cursor).map_or(line.len(), |(index, _)| index),
        '|',
    );

    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        Print(line.replace('\n', "⏎")),
        MoveTo(0, 1),
        Print(&document.status)
    )?;

    if let Some(view) = controller.keyboard_view() {
        if view.dark_appearance() {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }

        for (frame, key) in view.visible_keys() {
            let (column, row) = scale.to_cell(Point::new(frame.x, frame.y + frame.height / 2.0));
            let cells = ((frame.width / scale.x).floor() as usize).max(1);
            let label: String = key.action().label().chars().take(cells).collect();
            queue!(out, MoveTo(column, row), Print(label))?;
        }

        queue!(out, SetAttribute(Attribute::Reset))?;
    }

    out.flush()
}

fn pointer_phase(kind: MouseEventKind) -> Option<PointerPhase> {
    match kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerPhase::Down),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerPhase::Move),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerPhase::Up),
        _ => None,
    }
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let mut controller = KeyboardController::new(
        Document::default(),
        ProfileRegistry::builtin(),
        Size::new(375.0, 812.0),
    )?;
    let mut orientation = Orientation::Portrait;
    let mut dark = false;

    let _guard = TerminalGuard::enter()?;
    let mut out = stdout();

    loop {
        let keyboard = controller.active_profile().keyboard_size;
        let scale = Scale::for_terminal(keyboard)?;
        render(&mut out, &controller, scale)?;

        let timeout = controller
            .next_timer_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);

        if poll(timeout)? {
            match read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Esc => break,
                    KeyCode::Tab => {
                        orientation = match orientation {
                            Orientation::Portrait => Orientation::Landscape,
                            Orientation::Landscape => Orientation::Portrait,
                        };
                        controller.will_rotate(orientation)?;
                    }
                    KeyCode::F(2) => {
                        dark = !dark;
                        controller.set_dark_appearance(dark)?;
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    if let Some(phase) = pointer_phase(mouse.kind) {
                        // Over the header there is no key; releases still end the touch.
                        let location = scale
                            .to_point(mouse.column, mouse.row)
                            .unwrap_or(Point::new(-1.0, -1.0));
                        controller.handle_pointer(&PointerEvent::new(0, location, phase, Instant::now()));
                    }
                }
                _ => {}
            }
        }

        controller.advance(Instant::now());
    }

    Ok(())
}
