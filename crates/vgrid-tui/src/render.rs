//! Grid rendering.
//!
//! The display lays out in pixels; a terminal cell is
//! [`CELL_WIDTH_PX`] by [`CELL_HEIGHT_PX`].

use crate::app::{App, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::colors;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use vgrid_core::display::{CellSnapshot, SectionSnapshot};
use vgrid_core::{ActorBox, DisplaySnapshot};

/// Pixel box to terminal cells, relative to `area`. `None` when nothing of
/// the box is inside the area.
// Pixel coords to u16 terminal coords, clamped to the area first
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn to_cells(bounds: ActorBox, area: Rect) -> Option<Rect> {
    let x1 = (bounds.x1 / CELL_WIDTH_PX).floor();
    let y1 = (bounds.y1 / CELL_HEIGHT_PX).floor();
    let x2 = (bounds.x2 / CELL_WIDTH_PX).floor();
    let y2 = (bounds.y2 / CELL_HEIGHT_PX).floor();

    let left = x1.max(0.0);
    let top = y1.max(0.0);
    let right = x2.min(f32::from(area.width));
    let bottom = y2.min(f32::from(area.height));
    if right <= left || bottom <= top {
        return None;
    }

    Some(Rect::new(
        area.x + left as u16,
        area.y + top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Truncate text to `max_len` chars with an ellipsis.
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn icon_glyph(cell: &CellSnapshot) -> String {
    cell.icon
        .as_deref()
        .and_then(|icon| icon.chars().find(char::is_ascii_alphanumeric))
        .or_else(|| cell.name.chars().next())
        .map_or_else(|| "?".to_string(), |c| c.to_uppercase().to_string())
}

fn dimmed(style: Style, opacity: f64) -> Style {
    if opacity < 1.0 {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

fn render_cell(f: &mut Frame, cell: &CellSnapshot, area: Rect, opacity: f64) {
    let border = if cell.focused {
        colors::ACCENT
    } else {
        colors::BORDER
    };
    let bg = if cell.focused {
        colors::CELL_FOCUSED
    } else {
        colors::SURFACE
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(dimmed(Style::default().fg(border), opacity))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let name_style = if cell.focused {
        Style::default()
            .fg(colors::TEXT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(colors::SUBTEXT)
    };
    let lines = vec![
        Line::from(Span::styled(
            icon_glyph(cell),
            dimmed(Style::default().fg(colors::ACCENT), opacity),
        ))
        .centered(),
        Line::from(Span::styled(
            truncate_text(&cell.name, usize::from(inner.width)),
            dimmed(name_style, opacity),
        ))
        .centered(),
    ];

    // Push the name to the bottom of the cell, like a label under an icon
    let pad = inner.height.saturating_sub(2) / 2;
    let body = Rect::new(inner.x, inner.y + pad, inner.width, inner.height - pad);
    f.render_widget(Paragraph::new(lines), body);
}

fn render_section(
    f: &mut Frame,
    snapshot: &DisplaySnapshot,
    section: &SectionSnapshot,
    origin: ActorBox,
    area: Rect,
) {
    let offset = |b: ActorBox| {
        ActorBox::new(
            origin.x1 + b.x1,
            origin.y1 + b.y1,
            b.width(),
            b.height(),
        )
    };

    if let Some(label) = &section.label
        && let Some(rect) = to_cells(offset(label.bounds), area)
    {
        let line = Line::from(Span::styled(
            label.text,
            dimmed(
                Style::default()
                    .fg(colors::FAVORITE)
                    .add_modifier(Modifier::BOLD),
                snapshot.opacity,
            ),
        ));
        f.render_widget(
            Paragraph::new(line),
            Rect::new(rect.x, rect.y, rect.width, 1),
        );
    }

    let grid = offset(section.grid);
    for cell in &section.cells {
        let bounds = ActorBox::new(
            grid.x1 + cell.bounds.x1,
            grid.y1 + cell.bounds.y1,
            cell.bounds.width(),
            cell.bounds.height(),
        );
        if let Some(rect) = to_cells(bounds, area) {
            render_cell(f, cell, rect, snapshot.opacity);
        }
    }
}

/// Render the help bar at the bottom.
fn render_help_bar(f: &mut Frame, app: &App, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(colors::ACCENT));
    let text = |t: &'static str| Span::styled(t, Style::default().fg(colors::SUBTEXT));

    let mut spans = vec![
        key("arrows/hjkl"),
        text(": nav  "),
        key("Enter"),
        text(": launch  "),
        key("f"),
        text(": favorite  "),
        key("s"),
        text(": section  "),
        key("o"),
        text(": sort  "),
        key("+/-"),
        text(": columns  "),
        key("q"),
        text(": quit"),
    ];
    if let Some(status) = &app.status_message {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::default().fg(colors::FAVORITE),
        ));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(colors::SURFACE)),
        area,
    );
}

/// Draw one frame and keep the display's viewport in sync with the body area.
pub fn render(f: &mut Frame, app: &App) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(colors::BG)), area);

    let [header, body, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    app.set_terminal_size(body.width, body.height);
    let snapshot = app.display.snapshot();

    let settings = app.settings().get();
    let title = format!(
        " Applications ({}) | {} columns | {:?} sort{}",
        snapshot.cell_count(),
        settings.columns,
        settings.app_sorting,
        if app.search_active { " | searching" } else { "" },
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            title,
            Style::default()
                .fg(colors::TEXT)
                .add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().bg(colors::SURFACE)),
        header,
    );

    if snapshot.visible && snapshot.cell_count() == 0 {
        f.render_widget(
            Paragraph::new("No applications to display")
                .style(Style::default().fg(colors::SUBTEXT)),
            body,
        );
    } else if snapshot.visible {
        #[allow(clippy::cast_possible_truncation)] // scroll offsets are small pixel values
        let scroll = snapshot.scroll as f32;
        let origin = ActorBox::new(
            snapshot.content.x1,
            snapshot.content.y1 - scroll,
            snapshot.content.width(),
            snapshot.content.height(),
        );
        for section in &snapshot.sections {
            render_section(f, &snapshot, section, origin, body);
        }
    }

    render_help_bar(f, app, help);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cells_maps_pixels() {
        let area = Rect::new(0, 1, 80, 20);
        let rect = to_cells(ActorBox::new(16.0, 32.0, 80.0, 96.0), area).unwrap();
        assert_eq!(rect, Rect::new(2, 3, 10, 6));
    }

    #[test]
    fn test_to_cells_clips_to_area() {
        let area = Rect::new(0, 0, 20, 10);

        // Scrolled partly above the top
        let rect = to_cells(ActorBox::new(0.0, -32.0, 80.0, 96.0), area).unwrap();
        assert_eq!(rect, Rect::new(0, 0, 10, 4));

        // Runs past the right edge
        let rect = to_cells(ActorBox::new(120.0, 0.0, 80.0, 16.0), area).unwrap();
        assert_eq!(rect.width, 5);

        assert_eq!(to_cells(ActorBox::new(0.0, 200.0, 80.0, 96.0), area), None);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Calculator", 20), "Calculator");
        assert_eq!(truncate_text("Calculator", 7), "Calc...");
    }
}
