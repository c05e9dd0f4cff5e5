//! Product list pane — left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::App;

/// Render the product list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let title = format!(" Products ({}) ", app.products.len());

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = app
    .products
    .iter()
    .enumerate()
    .map(|(i, product)| {
      let is_cursor = i == app.list_cursor;

      let style = if is_cursor {
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD)
      } else {
        Style::default()
      };

      let price = product
        .price
        .map(|p| format!("${p:.2}"))
        .unwrap_or_default();

      let mut spans = vec![Span::styled(product.title.clone(), style)];
      if let Some(brand) = &product.brand {
        spans.push(Span::styled(
          format!("  {brand}"),
          style.fg(if is_cursor { Color::White } else { Color::DarkGray }),
        ));
      }
      if !price.is_empty() {
        spans.push(Span::styled(
          format!("  {price}"),
          style.fg(if is_cursor { Color::White } else { Color::Green }),
        ));
      }

      ListItem::new(Line::from(spans))
    })
    .collect();

  let inner_area = block.inner(area);
  f.render_widget(block, area);

  // Scrollable list with cursor tracking.
  let mut state = ListState::default();
  state.select(if app.products.is_empty() {
    None
  } else {
    Some(app.list_cursor)
  });

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}
