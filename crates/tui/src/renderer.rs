use std::io::{self, Stdout, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Block,
};
use rig_monitor_core::Canvas;
use rig_monitor_core::input::KeySource;
use rig_monitor_core::model::Frame;
use rig_monitor_core::views::Panel;
use rig_monitor_protocol::{RenderCommand, ThemeToken};

/// Each terminal cell shows two vertically stacked canvas pixels.
const UPPER_HALF_BLOCK: char = '▀';

fn theme_to_color(token: ThemeToken) -> Color {
    let [r, g, b] = token.rgb();
    Color::Rgb(r, g, b)
}

/// Key presses from the controlling terminal.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<char>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char(c) => Some(c),
                _ => None,
            },
            _ => None,
        })
    }
}

/// The canvas window: the terminal in raw mode on the alternate screen.
pub struct TerminalDisplay {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalDisplay {
    pub fn open() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    /// Draw the canvas and the scan plot side by side, with a one-line header.
    pub fn draw(&mut self, canvas: &Canvas, scan: &Panel, header: &str) -> Result<()> {
        self.terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(" rig-monitor | {header} | 0-5 mode | space quit "))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let content = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            if content.width == 0 || content.height == 0 {
                return;
            }
            let [canvas_area, scan_area] =
                Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).areas(content);
            let buf = frame.buffer_mut();
            blit(buf, canvas_area, &canvas.pixels, false);
            // Scan returns are a few pixels wide; pooling keeps them visible.
            blit(buf, scan_area, &scan.pixels, true);

            let (canvas_w, canvas_h) = canvas.pixels.dimensions();
            if canvas_area.width == 0 || canvas_area.height == 0 || canvas_w == 0 || canvas_h == 0 {
                return;
            }
            // Text overlays land on the cell holding their vertical center.
            for cmd in &canvas.overlays {
                let RenderCommand::DrawText {
                    position,
                    text,
                    color,
                    font_size,
                    ..
                } = cmd;
                let center_y = (position.y - font_size / 2.0).max(0.0);
                let col = (position.x * f64::from(canvas_area.width) / f64::from(canvas_w)) as u16;
                let row = (center_y * f64::from(canvas_area.height) / f64::from(canvas_h)) as u16;
                if row >= canvas_area.height || col >= canvas_area.width {
                    continue;
                }
                let fg = theme_to_color(*color);
                let bg = theme_to_color(ThemeToken::Background);
                for (i, ch) in text.chars().enumerate() {
                    let x = canvas_area.x + col + i as u16;
                    if x >= canvas_area.x + canvas_area.width {
                        break;
                    }
                    buf[(x, canvas_area.y + row)].set_char(ch).set_fg(fg).set_bg(bg);
                }
            }
        })?;
        Ok(())
    }

    /// Leave raw mode and the alternate screen.
    pub fn close(mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

/// Scale `image` into `area`, two pixel rows per cell. With `pool` each half
/// cell shows the brightest pixel it covers instead of the nearest one.
fn blit(buf: &mut Buffer, area: Rect, image: &Frame, pool: bool) {
    let (width, height) = image.dimensions();
    if area.width == 0 || area.height == 0 || width == 0 || height == 0 {
        return;
    }
    let cols = u32::from(area.width);
    let rows = u32::from(area.height) * 2;
    let sample = |row: u32, col: u32| -> Color {
        let (x0, y0) = (col * width / cols, row * height / rows);
        let [r, g, b] = if pool {
            let x1 = ((col + 1) * width / cols).max(x0 + 1).min(width);
            let y1 = ((row + 1) * height / rows).max(y0 + 1).min(height);
            (y0..y1)
                .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                .map(|(x, y)| image.get_pixel(x, y).0)
                .max_by_key(|[r, g, b]| u16::from(*r) + u16::from(*g) + u16::from(*b))
                .unwrap_or([0, 0, 0])
        } else {
            image.get_pixel(x0, y0).0
        };
        Color::Rgb(r, g, b)
    };

    for row in 0..area.height {
        for col in 0..area.width {
            let top = sample(u32::from(row) * 2, u32::from(col));
            let bottom = sample(u32::from(row) * 2 + 1, u32::from(col));
            buf[(area.x + col, area.y + row)]
                .set_char(UPPER_HALF_BLOCK)
                .set_fg(top)
                .set_bg(bottom);
        }
    }
}
