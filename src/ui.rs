use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::config::GameConfig;
use crate::history::History;
use crate::session::{Phase, SessionView};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

/// Everything one frame needs, borrowed from the running app
pub struct GameScreen<'a> {
    pub view: &'a SessionView,
    pub typed: &'a str,
    /// Set while the player is editing their name
    pub name_draft: Option<&'a str>,
    pub history: &'a History,
    pub player_name: &'a str,
    pub config: &'a GameConfig,
}

impl Widget for &GameScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // hud
                Constraint::Length(1), // settings
                Constraint::Min(3),    // prompt
                Constraint::Length(3), // input
                Constraint::Length(1), // legend
                Constraint::Length(8), // history
            ])
            .split(area);

        let hud = &self.view.hud;
        let time_style = if hud.time_left <= 5 && self.view.phase == Phase::Running {
            red_bold_style
        } else {
            bold_style
        };
        Paragraph::new(Line::from(vec![
            Span::styled(format!("⏱ {}s", hud.time_left), time_style),
            Span::raw("   "),
            Span::styled(format!("score {}", hud.score), bold_style),
            Span::raw("   "),
            Span::styled(format!("acc {}%", hud.accuracy_percent), bold_style),
            Span::raw("   "),
            Span::styled(format!("streak {}", hud.streak), bold_style),
            Span::raw("   "),
            Span::styled(format!("best {}", hud.best_score), green_bold_style),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let player = if self.player_name.is_empty() {
            "unnamed"
        } else {
            self.player_name
        };
        let settings_line = match self.name_draft {
            Some(draft) => Line::from(vec![
                Span::styled(format!("name: {draft}"), green_bold_style),
                Span::styled("▏", dim_bold_style),
                Span::styled("  enter saves · esc cancels", italic_style),
            ]),
            None => Line::from(Span::styled(
                format!(
                    "{} · {} · {}s · {}",
                    player, self.config.difficulty, self.config.duration_secs, self.view.phase
                ),
                italic_style,
            )),
        };
        Paragraph::new(settings_line)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let prompt_line = match self.view.phase {
            Phase::Idle => Line::from(Span::styled(
                "Ready? Press Enter to start!",
                Style::default().fg(Color::Yellow).patch(bold_style),
            )),
            Phase::Ended => Line::from(Span::styled(
                format!("Time's up! {} points. Enter plays again.", hud.score),
                Style::default().fg(Color::Yellow).patch(bold_style),
            )),
            Phase::Paused => Line::from(Span::styled(
                "PAUSED - Tab to resume",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            )),
            Phase::Running => Line::from(vec![
                Span::styled(self.view.prompt.confirmed_prefix.clone(), green_bold_style),
                Span::styled(self.view.prompt.remaining_suffix.clone(), dim_bold_style),
            ]),
        };
        let prompt_area = chunks[2];
        let pad = prompt_area.height.saturating_sub(1) / 2;
        let centered = Rect {
            y: prompt_area.y + pad,
            height: prompt_area.height.min(1),
            ..prompt_area
        };
        Paragraph::new(prompt_line)
            .alignment(Alignment::Center)
            .render(centered, buf);

        let input_style = if self.view.prompt.on_track {
            green_bold_style
        } else {
            red_bold_style
        };
        let inner_width = chunks[3].width.saturating_sub(2) as usize;
        let visible = tail_fitting(self.typed, inner_width.saturating_sub(1));
        Paragraph::new(Line::from(vec![
            Span::styled(visible.to_string(), input_style),
            Span::styled("▏", dim_bold_style),
        ]))
        .block(Block::default().borders(Borders::ALL).title("type here"))
        .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            "enter start/submit · space submit · tab pause · ^r reset · ^s edit name · esc quit",
            italic_style.add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        let items: Vec<ListItem> = self
            .history
            .iter()
            .map(|e| {
                ListItem::new(format!(
                    "{}  score {}  acc {}%  streak {}  {}s",
                    e.player_name, e.final_score, e.accuracy_percent, e.max_streak, e.duration_secs
                ))
            })
            .collect();
        List::new(items)
            .block(Block::default().borders(Borders::TOP).title("history"))
            .render(chunks[5], buf);
    }
}

/// Longest suffix of `s` that fits in `width` terminal columns.
pub fn tail_fitting(s: &str, width: usize) -> &str {
    if s.width() <= width {
        return s;
    }
    let mut start = s.len();
    let mut used = 0;
    for (idx, c) in s.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &s[start..]
}
