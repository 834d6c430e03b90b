use crate::cart::http::HttpCartService;
use crate::catalog::http::HttpCatalogService;
use crate::config;
use crate::event::Event;
use crate::logging;
use crate::search::CardLinks;
use crate::session::StoreSession;
use crate::storefront::{Storefront, StorefrontState};
use crate::tui::App;
use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event as TermEvent, EventStream, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(100);

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Load configuration, wire the services and run the terminal storefront
pub async fn run() -> Result<()> {
    let config = config::load_or_create_config()?;
    let _log_guard = logging::init(&config)?;

    tracing::info!(
        api = %config.api_base_url,
        site = %config.site_base_url,
        "starting tienda"
    );

    let session = StoreSession::new(&config)?;
    let catalog = Arc::new(HttpCatalogService::new(&session, config.api_base_url.clone()));
    let cart = Arc::new(HttpCartService::new(
        session.clone(),
        config.csrf_cookie_name.clone(),
    ));

    let (tx, rx) = mpsc::unbounded_channel();
    let storefront = Storefront::new(
        catalog,
        cart,
        Duration::from_millis(config.confirm_delay_ms),
        tx,
    );
    let state = StorefrontState::new(CardLinks {
        site_base_url: config.site_base_url.clone(),
        placeholder_image: config.placeholder_image(),
    });

    let mut app = App::new(state, storefront, rx);

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut app).await;
    restore_terminal(&mut terminal)?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "storefront exited with error");
    }
    result
}

async fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK_RATE);

    app.start();

    loop {
        app.poll_events();
        terminal
            .draw(|frame| app.render(frame))
            .context("Failed to draw frame")?;

        if app.should_quit() {
            break;
        }

        let event = tokio::select! {
            maybe = events.next() => match maybe {
                Some(Ok(event)) => translate(event),
                Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                None => break,
            },
            _ = tick.tick() => Some(Event::Tick),
        };

        if let Some(event) = event {
            app.handle_event(event)?;
        }
    }

    tracing::info!("storefront closed");
    Ok(())
}

fn translate(event: TermEvent) -> Option<Event> {
    match event {
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        TermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
        TermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}
