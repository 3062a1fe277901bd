use crate::app::App;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};
use tui_roads::braille::{BrailleCanvas, BLANK};
use tui_roads::map::{draw_path, MotionState, RenderPlan, StyleTier};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let title = app.network().label().unwrap_or("Roads");
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor_pos = app.mouse_pixel_pos().and_then(|(px, py)| {
        let cx = (px / 2) as u16;
        let cy = (py / 4) as u16;
        (cx < inner.width && cy < inner.height).then_some((cx, cy))
    });

    let map_widget = MapWidget {
        layers: rasterize(app.plan(), inner.width as usize, inner.height as usize),
        cursor_pos,
    };
    frame.render_widget(map_widget, inner);
}

/// One canvas per style tier
struct TierLayers {
    minor: BrailleCanvas,
    major: BrailleCanvas,
}

fn rasterize(plan: Option<&RenderPlan>, width: usize, height: usize) -> TierLayers {
    let mut layers = TierLayers {
        minor: BrailleCanvas::new(width, height),
        major: BrailleCanvas::new(width, height),
    };
    let Some(plan) = plan else {
        return layers;
    };

    for (tier, items) in plan.batches() {
        let thick = tier.stroke().weight > 1.0;
        let canvas = match tier {
            StyleTier::Minor => &mut layers.minor,
            StyleTier::Major => &mut layers.major,
        };
        for item in items {
            draw_path(canvas, &item.path, thick);
        }
    }
    layers
}

struct MapWidget {
    layers: TierLayers,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    /// Copy non-blank glyphs of a canvas into the buffer in one colour
    fn render_layer(canvas: &BrailleCanvas, style: Style, area: Rect, buf: &mut Buffer) {
        for (row_idx, row_str) in canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                if ch == BLANK {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_style(style);
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Minor roads first so major roads win shared cells
        Self::render_layer(&self.layers.minor, Style::default().fg(Color::DarkGray), area, buf);
        Self::render_layer(
            &self.layers.major,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            area,
            buf,
        );

        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(" Scale: ", dim),
        Span::styled(app.scale_label(), Style::default().fg(Color::Yellow)),
        Span::styled(" ", dim),
    ];

    let (motion, motion_color) = match app.motion() {
        MotionState::Still => ("still", Color::Green),
        MotionState::Moving => ("moving", Color::Magenta),
    };
    spans.push(Span::styled(motion, Style::default().fg(motion_color)));

    if let Some(plan) = app.plan() {
        let stats = &plan.stats;
        spans.push(Span::styled(
            format!(
                " | tol {:.2} | roads {}/{} | pts {}/{}",
                plan.tolerance,
                stats.roads_visible,
                stats.roads_total,
                stats.points_out,
                stats.points_in
            ),
            dim,
        ));
    }

    spans.push(Span::styled(" | ", dim));
    match (app.load_error(), app.center_coords()) {
        (Some(err), _) => {
            spans.push(Span::styled(err.to_string(), Style::default().fg(Color::Red)));
        }
        (None, Some(coords)) => spans.push(Span::styled(coords, Style::default().fg(Color::Cyan))),
        (None, None) if app.network().is_empty() => {
            spans.push(Span::styled("no network", dim));
        }
        (None, None) => {}
    }

    spans.push(Span::styled(" | hjkl:pan +/-:zoom r:reset c:clear q:quit", dim));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
