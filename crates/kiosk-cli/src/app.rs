//! Application state machine and event dispatcher.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kiosk_core::{product::Product, summary::Summary};

use crate::client::ApiClient;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the product list; right pane previews the selection.
  ProductList,
  /// Focus on the product detail / summary pane.
  ProductDetail,
}

// ─── Summary pane state ───────────────────────────────────────────────────────

/// A summary currently on screen, with its display metadata.
#[derive(Debug, Clone)]
pub struct Displayed {
  pub summary: Summary,
  pub model:   Option<String>,
  /// `Some(true)` when the server answered from its cache.
  pub cached:  Option<bool>,
}

/// What the summary pane shows for the selected product.
///
/// `Absent` is deliberately not an error — a product without a summary
/// renders the generate affordance. A failure keeps whatever summary was
/// previously displayed.
#[derive(Debug, Clone)]
pub enum SummaryPane {
  /// Probe request in flight.
  Probing,
  /// Probe came back empty; no summary has been generated yet.
  Absent,
  /// Generation in flight; the trigger is disabled until it resolves.
  Generating { previous: Option<Displayed> },
  /// A summary is on screen; the trigger now reads "regenerate".
  Shown(Displayed),
  /// Generation failed. Rendered inline; `previous` stays visible.
  Failed {
    message:  String,
    previous: Option<Displayed>,
  },
}

impl SummaryPane {
  /// The summary content currently visible, if any.
  pub fn displayed(&self) -> Option<&Displayed> {
    match self {
      Self::Shown(d) => Some(d),
      Self::Generating { previous } | Self::Failed { previous, .. } => previous.as_ref(),
      Self::Probing | Self::Absent => None,
    }
  }

  pub fn is_generating(&self) -> bool { matches!(self, Self::Generating { .. }) }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// All products returned by the API on startup.
  pub products: Vec<Product>,

  /// Cursor position within the product list.
  pub list_cursor: usize,

  /// Id of the currently-selected product (detail pane).
  pub selected_product_id: Option<i64>,

  /// Summary pane state for the selected product.
  pub pane: SummaryPane,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,
}

impl App {
  /// Create an [`App`] with an empty product list.
  pub fn new(client: ApiClient) -> Self {
    Self {
      screen: Screen::ProductList,
      products: Vec::new(),
      list_cursor: 0,
      selected_product_id: None,
      pane: SummaryPane::Absent,
      status_msg: String::new(),
      client: Arc::new(client),
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the catalog from the API and populate `self.products`.
  pub async fn load_products(&mut self) -> anyhow::Result<()> {
    self.status_msg = "Loading products…".into();
    match self.client.list_products().await {
      Ok(products) => {
        self.products = products;
        self.list_cursor = 0;
        self.status_msg = String::new();
        Ok(())
      }
      Err(e) => {
        self.status_msg = format!("Error: {e}");
        Err(e)
      }
    }
  }

  /// The product under the list cursor, if any.
  pub fn cursor_product(&self) -> Option<&Product> {
    self.products.get(self.list_cursor)
  }

  // ── Summary controller ────────────────────────────────────────────────────

  /// Probe the cache for `product_id`. An empty result is "no summary
  /// yet", never an error state; only transport problems set a status
  /// message.
  async fn probe_summary(&mut self, product_id: i64) {
    self.pane = SummaryPane::Probing;
    match self.client.get_summary(product_id).await {
      Ok(Some(view)) => {
        self.pane = SummaryPane::Shown(Displayed {
          summary: view.summary,
          model:   Some(view.meta.model),
          cached:  Some(true),
        });
      }
      Ok(None) => self.pane = SummaryPane::Absent,
      Err(e) => {
        self.pane = SummaryPane::Absent;
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  /// Trigger generation for the selected product.
  ///
  /// When a summary is already on screen the request is sent with
  /// `force=true` — regenerate must bypass the server cache or it would
  /// hand back the same record. Ignored while a request is in flight.
  async fn generate(&mut self) {
    let Some(product_id) = self.selected_product_id else {
      return;
    };
    if self.pane.is_generating() {
      return;
    }

    let previous = self.pane.displayed().cloned();
    let force = previous.is_some();
    self.pane = SummaryPane::Generating { previous: previous.clone() };
    self.status_msg = "Generating summary…".into();

    match self.client.generate_summary(product_id, force).await {
      Ok(generated) => {
        self.pane = SummaryPane::Shown(Displayed {
          summary: generated.summary,
          model:   None,
          cached:  Some(generated.cached),
        });
        self.status_msg = String::new();
      }
      Err(e) => {
        // Keep whatever was displayed before the attempt.
        self.pane = SummaryPane::Failed {
          message: format!("Couldn't generate summary: {e}"),
          previous,
        };
        self.status_msg = String::new();
      }
    }
  }

  /// Transition to `ProductDetail` for `product_id`, probing the cache.
  async fn open_detail(&mut self, product_id: i64) {
    self.selected_product_id = Some(product_id);
    self.screen = Screen::ProductDetail;
    self.probe_summary(product_id).await;
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.screen {
      Screen::ProductList => self.handle_list_key(key).await,
      Screen::ProductDetail => self.handle_detail_key(key).await,
    }
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        if !self.products.is_empty() && self.list_cursor + 1 < self.products.len() {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
        }
      }

      // Open detail
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_product().map(|p| p.id) {
          self.open_detail(id).await;
        }
      }

      // Reload catalog
      KeyCode::Char('r') => {
        self.load_products().await.ok();
      }

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      // Quit
      KeyCode::Char('q') => return Ok(false),

      // Back to list
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::ProductList;
        self.selected_product_id = None;
        self.pane = SummaryPane::Absent;
      }

      // Generate / regenerate
      KeyCode::Char('g') => {
        self.generate().await;
      }

      // Switch products without leaving detail
      KeyCode::Char(']') | KeyCode::PageDown => {
        if !self.products.is_empty() && self.list_cursor + 1 < self.products.len() {
          self.list_cursor += 1;
          if let Some(id) = self.cursor_product().map(|p| p.id) {
            self.open_detail(id).await;
          }
        }
      }
      KeyCode::Char('[') | KeyCode::PageUp => {
        if self.list_cursor > 0 {
          self.list_cursor -= 1;
          if let Some(id) = self.cursor_product().map(|p| p.id) {
            self.open_detail(id).await;
          }
        }
      }

      _ => {}
    }
    Ok(true)
  }
}
