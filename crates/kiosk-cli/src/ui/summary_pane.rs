//! Summary pane — right panel, shows the AI summary for the selection.

use kiosk_core::summary::Summary;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, Displayed, SummaryPane};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the summary pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = app
    .selected_product_id
    .and_then(|id| app.products.iter().find(|p| p.id == id))
    .map(|p| format!(" {} ", p.title))
    .unwrap_or_else(|| " Summary ".to_string());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  if app.selected_product_id.is_none() {
    let hint = Paragraph::new("Select a product and press Enter.")
      .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, inner);
    return;
  }

  let lines = match &app.pane {
    SummaryPane::Probing => vec![dim_line("Loading…")],

    SummaryPane::Absent => vec![
      dim_line("No summary yet."),
      Line::from(""),
      hint_line("[g] generate an AI summary"),
    ],

    SummaryPane::Generating { previous } => {
      let mut lines = vec![
        Line::from(Span::styled(
          "Generating summary…",
          Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
      ];
      if let Some(previous) = previous {
        lines.extend(displayed_lines(previous));
      }
      lines
    }

    SummaryPane::Shown(displayed) => {
      let mut lines = displayed_lines(displayed);
      lines.push(Line::from(""));
      lines.push(hint_line("[g] regenerate"));
      lines
    }

    SummaryPane::Failed { message, previous } => {
      let mut lines = vec![
        Line::from(Span::styled(
          message.clone(),
          Style::default().fg(Color::Red),
        )),
        Line::from(""),
        hint_line("[g] try again"),
      ];
      if let Some(previous) = previous {
        lines.push(Line::from(""));
        lines.extend(displayed_lines(previous));
      }
      lines
    }
  };

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

// ─── Summary formatting ───────────────────────────────────────────────────────

fn displayed_lines(displayed: &Displayed) -> Vec<Line<'static>> {
  let mut lines = summary_lines(&displayed.summary);

  let mut meta_parts: Vec<String> = Vec::new();
  if let Some(model) = &displayed.model {
    meta_parts.push(model.clone());
  }
  match displayed.cached {
    Some(true) => meta_parts.push("cached".into()),
    Some(false) => meta_parts.push("freshly generated".into()),
    None => {}
  }
  if !meta_parts.is_empty() {
    lines.push(Line::from(""));
    lines.push(dim_line_owned(meta_parts.join("  ·  ")));
  }

  lines
}

/// Both summary shapes render; the switch on the variant is deliberate —
/// no field probing.
fn summary_lines(summary: &Summary) -> Vec<Line<'static>> {
  match summary {
    Summary::Structured { one_liner, pros, cons, best_for } => {
      let mut lines = vec![
        Line::from(Span::styled(
          one_liner.clone(),
          Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
      ];

      if !pros.is_empty() {
        lines.push(section_line("Pros", Color::Green));
        for item in pros {
          lines.push(bullet_line("+", item, Color::Green));
        }
        lines.push(Line::from(""));
      }

      if !cons.is_empty() {
        lines.push(section_line("Cons", Color::Red));
        for item in cons {
          lines.push(bullet_line("-", item, Color::Red));
        }
        lines.push(Line::from(""));
      }

      if !best_for.is_empty() {
        lines.push(section_line("Best for", Color::Cyan));
        for item in best_for {
          lines.push(bullet_line("*", item, Color::Cyan));
        }
      }

      lines
    }

    Summary::Freeform { text } => {
      vec![Line::from(Span::raw(text.clone()))]
    }
  }
}

// ─── Small helpers ────────────────────────────────────────────────────────────

fn section_line(label: &str, color: Color) -> Line<'static> {
  Line::from(Span::styled(
    label.to_string(),
    Style::default().fg(color).add_modifier(Modifier::BOLD),
  ))
}

fn bullet_line(bullet: &str, text: &str, color: Color) -> Line<'static> {
  Line::from(vec![
    Span::styled(format!("  {bullet} "), Style::default().fg(color)),
    Span::raw(text.to_string()),
  ])
}

fn dim_line(text: &'static str) -> Line<'static> {
  Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn dim_line_owned(text: String) -> Line<'static> {
  Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn hint_line(text: &'static str) -> Line<'static> {
  Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}
