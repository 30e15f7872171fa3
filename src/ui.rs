use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::App;
use crate::template::{Field, HourlyBlock, Template};

const MISSING: &str = "--";

/// Colors for the two visual modes
#[derive(Copy, Clone, Debug)]
struct Palette {
    background: Color,
    text: Color,
    border: Color,
    title: Color,
    value: Color,
    muted: Color,
}

impl Palette {
    fn for_mode(light_mode: bool) -> Self {
        if light_mode {
            Self {
                background: Color::White,
                text: Color::Black,
                border: Color::Blue,
                title: Color::Magenta,
                value: Color::Blue,
                muted: Color::DarkGray,
            }
        } else {
            Self {
                background: Color::Reset,
                text: Color::Reset,
                border: Color::Cyan,
                title: Color::Yellow,
                value: Color::Green,
                muted: Color::DarkGray,
            }
        }
    }

    fn block<'a>(&self, title: &'a str) -> Block<'a> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border))
            .border_type(BorderType::Rounded);
        if title.is_empty() {
            block
        } else {
            block
                .title(Span::styled(title, Style::default().fg(self.title)))
                .title_alignment(Alignment::Left)
        }
    }
}

/// Short display name for an icon path or URL, e.g. `04d` or `cloudy`
pub fn icon_label(icon: &str) -> &str {
    let name = icon.rsplit('/').next().unwrap_or(icon);
    name.trim_end_matches(".png").trim_end_matches("@2x")
}

fn field<'a>(template: &'a Template, field: Field) -> &'a str {
    template.get(field).unwrap_or(MISSING)
}

pub fn draw(f: &mut Frame, app: &App<impl crate::prefs::KeyValueStore>) {
    let palette = Palette::for_mode(app.light_mode);
    let area = f.area();
    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(7),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, rows[0], app, palette);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    draw_current(f, middle[0], &app.template, palette);
    draw_daily(f, middle[1], &app.template, palette);
    draw_hourly(f, rows[2], app.template.hourly(), palette);

    let status = app.status.as_deref().unwrap_or(
        "Enter search  Ctrl-L locate  Ctrl-T theme  Esc quit",
    );
    f.render_widget(
        Paragraph::new(Span::styled(status, Style::default().fg(palette.muted))),
        rows[3],
    );

    if let Some(overlay) = app.template.overlay() {
        draw_overlay(f, area, overlay);
    }
    if let Some(alert) = &app.alert {
        draw_alert(f, area, alert, palette);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App<impl crate::prefs::KeyValueStore>, palette: Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
        ])
        .split(area);

    let search = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(app.search.as_str(), Style::default().fg(palette.value)),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(palette.block(" Search city "));
    f.render_widget(search, columns[0]);

    if app.template.has(Field::LocationButton) {
        let label = match app.city() {
            Some(_) => field(&app.template, Field::LocationButton).to_string(),
            None => " Current location".to_string(),
        };
        let button = Paragraph::new(vec![
            Line::from(Span::styled(label, Style::default().fg(palette.value))),
            Line::from(Span::styled(" Ctrl-L", Style::default().fg(palette.muted))),
        ])
        .block(palette.block(" Location "));
        f.render_widget(button, columns[1]);
    }

    let clock = Paragraph::new(vec![
        Line::from(Span::styled(
            field(&app.template, Field::LiveTime),
            Style::default().fg(palette.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(field(&app.template, Field::LiveDate)),
    ])
    .alignment(Alignment::Center)
    .block(palette.block(""));
    f.render_widget(clock, columns[2]);

    let switch = if app.theme_switch { "[x]" } else { "[ ]" };
    let theme = Paragraph::new(vec![
        Line::from(format!(" {switch} Light")),
        Line::from(Span::styled(" Ctrl-T", Style::default().fg(palette.muted))),
    ])
    .block(palette.block(" Theme "));
    f.render_widget(theme, columns[3]);
}

fn draw_current(f: &mut Frame, area: Rect, template: &Template, palette: Palette) {
    let title = format!(" {} ", field(template, Field::City));
    let mut rows = vec![Row::new(vec![Cell::from("")])];

    let mut push = |label: &'static str, field: Field, bold: bool| {
        if let Some(value) = template.get(field) {
            let mut style = Style::default().fg(palette.value);
            if bold {
                style = style.add_modifier(Modifier::BOLD);
            }
            rows.push(Row::new(vec![
                Cell::from(label),
                Cell::from(value.to_string()).style(style),
            ]));
        }
    };
    push(" Temperature", Field::Temperature, true);
    push(" ", Field::FeelsLike, false);
    push(" Conditions", Field::Condition, false);
    push(" Humidity", Field::Humidity, false);
    push(" Wind", Field::Wind, false);
    push(" Pressure", Field::Pressure, false);
    push(" ", Field::Sunrise, false);
    push(" ", Field::Sunset, false);

    if let Some(icon) = template.get(Field::Icon) {
        rows.push(Row::new(vec![
            Cell::from(" Icon"),
            Cell::from(icon_label(icon).to_string()).style(Style::default().fg(palette.muted)),
        ]));
    }

    let table = Table::new(rows, [Constraint::Length(13), Constraint::Min(10)])
        .block(palette.block(&title));
    f.render_widget(table, area);
}

fn draw_daily(f: &mut Frame, area: Rect, template: &Template, palette: Palette) {
    let rows = template.forecast_slots().chunks(2).map(|pair| {
        let image = pair[0].image.as_deref().map(icon_label).unwrap_or("");
        let label = pair.get(1).map(|slot| slot.text.as_str()).unwrap_or(MISSING);
        Row::new(vec![
            Cell::from(format!(" {image}")).style(Style::default().fg(palette.muted)),
            Cell::from(pair[0].text.clone()).style(
                Style::default()
                    .fg(palette.value)
                    .add_modifier(Modifier::BOLD),
            ),
            Cell::from(label.to_string()),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Min(10),
        ],
    )
    .block(palette.block(" 5 Day Forecast "));
    f.render_widget(table, area);
}

fn draw_hourly(f: &mut Frame, area: Rect, blocks: &[HourlyBlock], palette: Palette) {
    let outer = palette.block(" Hourly ");
    let inner = outer.inner(area);
    f.render_widget(outer, area);
    if blocks.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled(MISSING, Style::default().fg(palette.muted)))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, blocks.len() as u32); blocks.len()])
        .split(inner);
    for (block, area) in blocks.iter().zip(columns.iter()) {
        let icon = block.icon.as_deref().map(icon_label).unwrap_or(MISSING);
        let lines = vec![
            Line::from(Span::styled(
                block.time.as_str(),
                Style::default().fg(palette.title),
            )),
            Line::from(Span::styled(icon, Style::default().fg(palette.muted))),
            Line::from(Span::styled(
                block.temperature.as_str(),
                Style::default().fg(palette.value).add_modifier(Modifier::BOLD),
            )),
            Line::from(block.wind.as_str()),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), *area);
    }
}

fn draw_overlay(f: &mut Frame, area: Rect, text: &str) {
    let width = (text.len() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let rect = Rect {
        x: area.right().saturating_sub(width),
        y: area.bottom().saturating_sub(height),
        width,
        height,
    };
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(text)
            .style(Style::default().fg(Color::White).bg(Color::Black))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .style(Style::default().fg(Color::White).bg(Color::Black)),
            ),
        rect,
    );
}

/// Centered popup, three fifths of the screen wide
fn alert_rect(area: Rect) -> Rect {
    let width = (area.width / 5 * 3).max(20).min(area.width);
    let height = 6.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_alert(f: &mut Frame, area: Rect, message: &str, palette: Palette) {
    let rect = alert_rect(area);
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(vec![
            Line::from(message),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to dismiss",
                Style::default().fg(palette.muted),
            )),
        ])
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(palette.block(" Alert ").border_style(Style::default().fg(Color::Red))),
        rect,
    );
}
