use crate::tui::theme::*;
use lexicard_core::{SessionSummary, SessionTotals, Word};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub enum RightPane<'a> {
    Card { word: &'a Word, phase: u32, reveal: bool },
    Summary(SessionSummary),
    Empty(&'a str),
}

pub struct LeftPane<'a> {
    pub totals: SessionTotals,
    pub remaining: usize,
    pub due_total: usize,
    pub word_count: usize,
    pub status: Option<&'a str>,
}

pub fn draw_ui(f: &mut Frame, area: Rect, left: LeftPane, right: RightPane) {
    let body = Rect { height: area.height.saturating_sub(1), ..area };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(body);
    draw_session(f, chunks[0], &left);
    draw_right(f, chunks[1], right);

    let foot = Paragraph::new(Line::from(vec![
        Span::raw(" space reveal  "),
        Span::raw(" 1/f forgot  "),
        Span::raw(" 2/v vague  "),
        Span::raw(" 3/r remembered  "),
        Span::raw(" Enter new session  "),
        Span::raw(" q quit "),
    ]))
    .style(footer_style());
    let fh = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };
    f.render_widget(foot, fh);
}

fn draw_session(f: &mut Frame, area: Rect, left: &LeftPane) {
    let t = left.totals;
    let mut lines = vec![
        Line::from(Span::raw("Session").style(title_style())),
        Line::from(""),
        Line::from(format!("done       {}/{}", t.completed, t.total)),
        Line::from(format!("first try  {}", t.correct)),
        Line::from(format!("in queue   {}", left.remaining)),
        Line::from(""),
        Line::from(format!("due now    {}", left.due_total)),
        Line::from(format!("words      {}", left.word_count)),
    ];
    if let Some(msg) = left.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::raw(msg).style(status_style())));
    }
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_right(f: &mut Frame, area: Rect, pane: RightPane) {
    match pane {
        RightPane::Empty(msg) => {
            let p = Paragraph::new(msg)
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Review").borders(Borders::ALL));
            f.render_widget(p, area);
        }
        RightPane::Summary(s) => {
            let text = vec![
                Line::from(Span::raw("Session complete").style(title_style())),
                Line::from(""),
                Line::from(format!("reviewed   {}", s.completed)),
                Line::from(format!("first try  {}/{}", s.correct, s.total)),
                Line::from(format!("accuracy   {}%", s.accuracy)),
                Line::from(""),
                Line::from(Span::raw("Enter starts a new session.").style(hint_style())),
            ];
            let p = Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Review").borders(Borders::ALL));
            f.render_widget(p, area);
        }
        RightPane::Card { word, phase, reveal } => {
            let title = Block::default().title("Review").borders(Borders::ALL);
            let inner = Rect {
                x: area.x + 1,
                y: area.y + 1,
                width: area.width.saturating_sub(2),
                height: area.height.saturating_sub(2),
            };
            f.render_widget(title, area);

            let q = Paragraph::new(Line::from(vec![
                Span::raw(format!(" phase {} ", phase)).style(phase_style(phase)),
                Span::raw("  "),
                Span::raw(&word.word).style(title_style()),
            ]))
            .wrap(Wrap { trim: true });
            f.render_widget(q, inner);

            if reveal {
                let ans_area = Rect {
                    x: inner.x,
                    y: inner.y + 2,
                    width: inner.width,
                    height: inner.height.saturating_sub(2),
                };
                let mut text = vec![Line::from(word.definition.as_str())];
                if !word.example.is_empty() {
                    text.push(Line::from(""));
                    text.push(Line::from(vec![
                        Span::raw("e.g. ").style(hint_style()),
                        Span::raw(&word.example),
                    ]));
                }
                let a = Paragraph::new(text).wrap(Wrap { trim: true });
                f.render_widget(a, ans_area);
            }
        }
    }
}
