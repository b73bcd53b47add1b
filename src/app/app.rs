use std::io;

use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use derive_getters::Getters;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    widgets::TableState,
};
use reqwest::Client;
use strum::IntoEnumIterator;
use tracing::{debug, error, info};

use crate::{
    api::{DataSource, HarvestPayload},
    app::{
        HarvestState, HoldingsView,
        harvest::SelectionState,
        table::SortKey,
        ui,
    },
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Reload,
    Quit,
}

#[derive(Getters)]
pub struct App {
    state: HarvestState,
    view: HoldingsView,
    table_state: TableState,
    source: DataSource,
    #[getter(skip)]
    client: Client,
    popup_message: Option<String>,
    error_popup: Option<String>,
    show_disclaimer: bool,
    loaded_at: Option<DateTime<Local>>,
}

impl App {
    pub fn new(source: DataSource) -> Self {
        Self {
            state: HarvestState::new(),
            view: HoldingsView::new(),
            table_state: TableState::default(),
            source,
            client: Client::new(),
            popup_message: None,
            error_popup: None,
            show_disclaimer: false,
            loaded_at: None,
        }
    }

    fn show_popup(&mut self, message: &str) {
        self.popup_message = Some(message.to_string());
    }

    fn clear_popup(&mut self) {
        self.popup_message = None;
    }

    fn show_error_popup(&mut self, message: &str) {
        self.error_popup = Some(message.to_string());
    }

    fn clear_error_popup(&mut self) {
        self.error_popup = None;
    }

    pub fn status_line(&self) -> String {
        let loaded = self
            .loaded_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| String::from("never"));
        format!("Source: {} | Loaded: {}", self.source, loaded)
    }

    /// Fetches from the configured source. On failure the current state is
    /// kept and the error is shown until dismissed.
    pub async fn load(&mut self) {
        match self.source.fetch(&self.client).await {
            Ok(payload) => self.apply_payload(payload),
            Err(e) => {
                error!(source = %self.source, error = ?e, "failed to load harvest data");
                self.show_error_popup(&format!("Error loading data: {:#}", e));
            }
        }
    }

    pub fn apply_payload(&mut self, payload: HarvestPayload) {
        let (capital_gains, holdings) = payload.into_parts();
        self.state.load_baseline(capital_gains);
        self.state.load_holdings(holdings);
        self.table_state.select(None);
        self.loaded_at = Some(Local::now());
        info!(
            holdings = self.state.holdings().len(),
            "harvest data applied"
        );
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Flow {
        if self.error_popup.is_some() {
            return match code {
                KeyCode::Char('q') => Flow::Quit,
                KeyCode::Char('r') => {
                    self.clear_error_popup();
                    Flow::Reload
                }
                KeyCode::Enter | KeyCode::Esc => {
                    self.clear_error_popup();
                    Flow::Continue
                }
                _ => Flow::Continue,
            };
        }

        match code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('r') => return Flow::Reload,
            KeyCode::Esc => self.table_state.select(None),
            KeyCode::Down => self.move_cursor(true),
            KeyCode::Up => self.move_cursor(false),
            KeyCode::Char(' ') => self.toggle_highlighted(),
            KeyCode::Char('a') => match self.state.selection_state() {
                SelectionState::All => self.state.clear_selection(),
                SelectionState::None | SelectionState::Partial => self.state.select_all(),
            },
            KeyCode::Char('c') => self.state.clear_selection(),
            KeyCode::Char(digit @ '1'..='4') => {
                let index = digit.to_digit(10).map_or(0, |d| d as usize - 1);
                if let Some(key) = SortKey::iter().nth(index) {
                    debug!(%key, "sorting holdings");
                    self.view.toggle_sort(key);
                }
            }
            KeyCode::Char('v') => {
                if self.view.is_expandable(self.state.holdings().len()) {
                    self.view.toggle_show_all();
                    self.clamp_cursor();
                }
            }
            KeyCode::Char('i') => self.show_disclaimer = !self.show_disclaimer,
            _ => {}
        }

        Flow::Continue
    }

    fn visible_len(&self) -> usize {
        self.view.visible(self.state.holdings()).len()
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) if down => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    fn clamp_cursor(&mut self) {
        let len = self.visible_len();
        if let Some(i) = self.table_state.selected() {
            self.table_state
                .select(if len == 0 { None } else { Some(i.min(len - 1)) });
        }
    }

    fn toggle_highlighted(&mut self) {
        let Some(i) = self.table_state.selected() else {
            return;
        };

        let id = self
            .view
            .visible(self.state.holdings())
            .get(i)
            .map(|holding| holding.id().clone());

        if let Some(id) = id {
            debug!(%id, "toggling holding");
            self.state.toggle_selection(id);
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_app(&mut terminal).await;

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn run_app<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.reload(terminal).await?;

        loop {
            self.draw(terminal)?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match self.handle_key(key.code) {
                    Flow::Quit => return Ok(()),
                    Flow::Reload => self.reload(terminal).await?,
                    Flow::Continue => {}
                }
            }
        }
    }

    async fn reload<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.show_popup("Loading holdings...");
        self.draw(terminal)?;

        self.load().await;

        self.clear_popup();
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let status = self.status_line();
        terminal.draw(|frame| {
            ui::render(
                frame,
                &self.state,
                &self.view,
                &mut self.table_state,
                &status,
                &self.popup_message,
                &self.error_popup,
                self.show_disclaimer,
            )
        })?;
        Ok(())
    }
}
