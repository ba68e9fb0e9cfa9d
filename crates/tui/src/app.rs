use std::time::Duration;

use api_types::expense::TotalSpent;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    client::Client,
    config::AppConfig,
    error::{AppError, Result},
    query::{Query, QueryCache},
    ui,
};

pub const TOTAL_SPENT_KEY: &str = "get-total-spent";

pub struct App {
    client: Client,
    cache: QueryCache<TotalSpent>,
    theme: ui::Theme,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url, &config.username, &config.password)?;
        Ok(Self {
            client,
            cache: QueryCache::new(),
            theme: ui::Theme::default(),
            should_quit: false,
        })
    }

    /// Subscribe to the total spent, fetching it unless already cached.
    pub fn total_spent(&self) -> Query<TotalSpent> {
        let client = self.client.clone();
        self.cache
            .query(TOTAL_SPENT_KEY, move || async move { client.total_spent().await })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);
        let mut total_spent = self.total_spent();

        while !self.should_quit {
            let state = total_spent.state();
            terminal
                .draw(|frame| ui::render(frame, &state, &self.theme))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            } else {
                tokio::task::yield_now().await;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            _ => {}
        }
    }
}
