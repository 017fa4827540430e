// ============================================================================
// LazyCoin - Navigateur Coinpaprika dans le terminal
// ============================================================================
// Liste des 100 premiers coins, page détail avec cotation et graphique
// 14 jours, données chargées depuis l'API publique Coinpaprika
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : worker thread avec runtime tokio pour les appels API
// 4. Fan-in par génération : les trois fetches du détail arrivent dans
//    n'importe quel ordre, tagués, et l'agrégateur fait le tri
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use lazycoin::api::{fetch_coin_list, fetch_historical, fetch_metadata, fetch_price_snapshot};
use lazycoin::app::App;
use lazycoin::detail::{ApplyOutcome, SlotUpdate};
use lazycoin::models::{CoinListing, HistoricalWindow};
use lazycoin::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand / AppResult : communication avec le worker thread
// ============================================================================
// Command pattern avec channels : l'event loop envoie des commandes au
// worker, le worker exécute les fetches async et renvoie des résultats.
// Les résultats du détail sont tagués avec leur génération : c'est le
// mécanisme d'annulation logique (pas d'abort réseau, juste du tri à
// l'arrivée).
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Charger (ou recharger) la liste des coins
    LoadCoinList,

    /// Lancer les trois fetches du détail pour un coin
    /// La génération vient de DetailAggregator::begin
    OpenCoin { coin_id: String, generation: u64 },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Liste des coins chargée avec succès
    CoinListLoaded(Vec<CoinListing>),

    /// Échec du chargement de la liste
    CoinListError(String),

    /// Un des trois fetches du détail est settled (résultat OU échec)
    DetailSlot { generation: u64, update: SlotUpdate },
}

// ============================================================================
// Initialisation du logging
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les println! ne fonctionnent pas une fois le TUI lancé, on log vers
/// ./logs/lazycoin.log avec rotation quotidienne.
///
/// # Utilisation
/// ```bash
/// tail -f ./logs/lazycoin.log
/// RUST_LOG=lazycoin=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazycoin.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazycoin=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Logging d'abord : si l'init échoue, on continue quand même
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("LazyCoin starting up");

    // État partagé entre l'event loop et le worker
    let app = Arc::new(Mutex::new(App::new()));

    // Channels de communication avec le worker
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx);

    // Premier chargement : la liste des coins, en arrière-plan
    {
        let mut app_lock = app.lock().unwrap();
        app_lock.start_loading(Some("Chargement de la liste...".to_string()));
    }
    command_tx
        .send(AppCommand::LoadCoinList)
        .context("Worker thread indisponible")?;

    // Setup du terminal en mode TUI
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// Thread séparé qui possède le runtime tokio. Chaque commande est traitée
// en spawnant des tâches : le worker reste disponible pour la commande
// suivante même si un fetch traîne.
// ============================================================================

/// Worker thread qui exécute les fetches en arrière-plan
///
/// Pour OpenCoin, les trois fetches sont spawnés comme trois tâches
/// indépendantes : chacune envoie son propre AppResult::DetailSlot dès
/// qu'elle se termine, dans n'importe quel ordre. Aucune annulation
/// réseau : une tâche d'une génération dépassée va au bout, et son
/// résultat est jeté par l'agrégateur.
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker exiting");
                return;
            }
        };

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::LoadCoinList => {
                            let tx = result_tx.clone();
                            runtime.spawn(async move {
                                match fetch_coin_list().await {
                                    Ok(coins) => {
                                        info!(coins = coins.len(), "Coin list loaded");
                                        let _ = tx.send(AppResult::CoinListLoaded(coins));
                                    }
                                    Err(e) => {
                                        error!(error = %e, "Failed to load coin list");
                                        let _ = tx.send(AppResult::CoinListError(e.to_string()));
                                    }
                                }
                            });
                        }

                        AppCommand::OpenCoin { coin_id, generation } => {
                            // La fenêtre est calculée à l'émission :
                            // end = maintenant, start = end - 14 jours
                            let window = HistoricalWindow::last_two_weeks();

                            let id = coin_id.clone();
                            let tx = result_tx.clone();
                            runtime.spawn(async move {
                                let update = SlotUpdate::Metadata(fetch_metadata(&id).await);
                                let _ = tx.send(AppResult::DetailSlot { generation, update });
                            });

                            let id = coin_id.clone();
                            let tx = result_tx.clone();
                            runtime.spawn(async move {
                                let update = SlotUpdate::Snapshot(fetch_price_snapshot(&id).await);
                                let _ = tx.send(AppResult::DetailSlot { generation, update });
                            });

                            let id = coin_id;
                            let tx = result_tx.clone();
                            runtime.spawn(async move {
                                let update =
                                    SlotUpdate::Historical(fetch_historical(&id, window).await);
                                let _ = tx.send(AppResult::DetailSlot { generation, update });
                            });
                        }
                    }
                }
                Err(_) => {
                    // Channel fermé : l'application se termine
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// Pattern classique : résultats du worker -> render -> input.
// ============================================================================

/// Exécute la boucle principale de l'application
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // ========================================
        // 0. RÉSULTATS : draine tout ce que le worker a envoyé
        // ========================================
        // Les trois slots d'un détail peuvent arriver dans la même
        // itération : on applique tout, l'agrégateur gère l'ordre
        while let Ok(result) = result_rx.try_recv() {
            let mut app_lock = app.lock().unwrap();
            handle_result(&mut app_lock, result);
        }

        // ========================================
        // 1. RENDER : dessine l'interface
        // ========================================
        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        // ========================================
        // 2. INPUT : traite les événements
        // ========================================
        if let Ok(event) = events.next() {
            let mut app_lock = app.lock().unwrap();
            handle_event(&mut app_lock, event, &command_tx);
        }
    }

    Ok(())
}

// ============================================================================
// Traitement des résultats du worker
// ============================================================================

/// Applique un résultat du worker à l'état de l'application
fn handle_result(app: &mut App, result: AppResult) {
    match result {
        AppResult::CoinListLoaded(coins) => {
            info!(coins = coins.len(), "Updating coin list");
            app.set_coins(coins);
            app.stop_loading();
            app.error_message = None;
        }

        AppResult::CoinListError(error) => {
            error!(error = %error, "Coin list unavailable");
            app.stop_loading();
            app.set_error(error);
        }

        AppResult::DetailSlot { generation, update } => {
            // L'agrégateur jette lui-même les générations dépassées
            match app.detail.apply(generation, update) {
                ApplyOutcome::Ready => {
                    debug!(generation, "Detail view completed");
                }
                ApplyOutcome::Recorded | ApplyOutcome::Stale => {}
            }
        }
    }
}

// ============================================================================
// Gestion des événements clavier
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
fn handle_event(app: &mut App, event: lazycoin::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lazycoin::ui::events::{
        is_down_event, is_enter_event, is_escape_event, is_quit_event, is_refresh_event,
        is_up_event, Event,
    };

    match event {
        // 'q' : quit two-step (première pression arme, deuxième quitte)
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // Navigation dans la liste
        Event::Key(_) if is_up_event(&event) && app.is_on_listing() => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_listing() => {
            app.cancel_quit();
            app.navigate_down();
        }

        // Enter : ouvrir la page détail du coin sélectionné
        Event::Key(_) if is_enter_event(&event) && app.is_on_listing() => {
            app.cancel_quit();
            if let Some((coin_id, generation)) = app.open_selected_coin() {
                info!(coin = %coin_id, generation, "User opened coin detail");
                let _ = command_tx.send(AppCommand::OpenCoin { coin_id, generation });
            }
        }

        // ESC : retour à la liste depuis le détail
        // Les fetches en vol continueront, leurs résultats seront jetés
        Event::Key(_) if is_escape_event(&event) && app.is_on_detail() => {
            app.cancel_quit();
            debug!("User returned to listing");
            app.back_to_listing();
        }

        // 'r' sur la liste : recharger la liste
        Event::Key(_) if is_refresh_event(&event) && app.is_on_listing() => {
            app.cancel_quit();
            info!("User requested coin list reload");
            app.start_loading(Some("Rechargement de la liste...".to_string()));
            let _ = command_tx.send(AppCommand::LoadCoinList);
        }

        // 'r' sur le détail : relancer toute la séquence pour le même coin
        // (nouvelle génération, les résultats précédents deviennent périmés)
        Event::Key(_) if is_refresh_event(&event) && app.is_on_detail() => {
            app.cancel_quit();
            if let Some(view) = app.detail_view() {
                let coin_id = view.coin_id.clone();
                let name_hint = view.name_hint.clone();
                let generation = app.detail.begin(coin_id.clone(), name_hint);
                info!(coin = %coin_id, generation, "User requested detail reload");
                let _ = command_tx.send(AppCommand::OpenCoin { coin_id, generation });
            }
        }

        Event::Tick => {
            // Tick régulier : rien à faire, le render suit
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;
    Ok(())
}
