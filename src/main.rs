use log::{debug, error, info};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::watch;
use trusty_ballot::config::Config;
use trusty_ballot::handlers::App;
use trusty_ballot::tally::{RandomIncrements, TallyEngine};
use trusty_ballot::tasks::countdown::{Countdown, TimeLeft, run_countdown};

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let catalog = match config.load_catalog() {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            error!("Failed to load catalog: {}", e);
            return;
        }
    };

    let tally = match TallyEngine::start(catalog.initial_results(), config.tally_interval, RandomIncrements::new()) {
        Ok(tally) => tally,
        Err(e) => {
            error!("Failed to start tally engine: {}", e);
            return;
        }
    };

    // --- Background tasks ---
    let mut updates = tally.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            debug!("Results updated (revision {})", *updates.borrow_and_update());
        }
    });

    let Some(countdown) = Countdown::closing_in(config.closes_in_minutes) else {
        error!("Closing time is out of range: {} minutes", config.closes_in_minutes);
        return;
    };
    let (clock_tx, mut clock_rx) = watch::channel(TimeLeft::default());
    tokio::spawn(run_countdown(countdown, clock_tx));
    tokio::spawn(async move {
        while clock_rx.changed().await.is_ok() {
            debug!("Polls close in {}", *clock_rx.borrow_and_update());
        }
    });
    // --- End background tasks ---

    let mut app = App::new(catalog, tally, countdown);
    info!("Ready. Type 'help' for commands.");

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply = app.handle_line(&line);
        if let Err(e) = stdout.write_all(format!("{}\n", reply.text).as_bytes()).await {
            error!("Failed to write output: {}", e);
            break;
        }
        if let Err(e) = stdout.flush().await {
            error!("Failed to flush output: {}", e);
            break;
        }
        if reply.quit {
            break;
        }
    }
}
