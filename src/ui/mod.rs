// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
//
// La couche présentation est un pur consommateur : elle lit l'état de App
// et le view-model CoinDetail, elle ne déclenche aucun fetch elle-même.
// ============================================================================

pub mod events;  // Gestion des événements clavier
pub mod listing; // Rendu de la liste des coins
pub mod detail;  // Rendu de la page détail
pub mod chart;   // Rendu du graphique de prix

use ratatui::Frame;

use crate::app::{App, Screen};

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};

/// Dessine l'interface complète
///
/// Routing par match sur l'écran courant : le compilateur garantit que
/// tous les écrans sont gérés.
pub fn render(frame: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Listing => listing::render_listing(frame, app),
        Screen::Detail => detail::render_detail(frame, app),
    }
}
