// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Garantit la cohérence de l'état
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Enum pour state machine : un seul écran actif à la fois
// ============================================================================

use crate::detail::{CoinDetail, DetailAggregator};
use crate::models::CoinListing;

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
///
/// State machine à deux écrans, calquée sur les deux routes de la version
/// web d'origine : la liste des coins et la page détail d'un coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : liste des 100 premiers coins
    Listing,

    /// Vue détail : métadonnées + cotation + graphique 14 jours
    Detail,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Liste des coins (vide tant que le fetch initial n'a pas abouti)
    pub coins: Vec<CoinListing>,

    /// Index du coin sélectionné dans la liste
    pub selected_index: usize,

    /// Agrégateur de la vue détail (génération + trois slots + view-model)
    pub detail: DetailAggregator,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// Two-step quit : première pression de 'q' arme la confirmation,
    /// deuxième pression quitte, toute autre touche annule
    pub confirm_quit: bool,

    /// Indique si des données sont en cours de chargement
    pub is_loading: bool,

    /// Message de chargement optionnel affiché à l'utilisateur
    pub loading_message: Option<String>,

    /// Dernière erreur à afficher (liste injoignable, etc.)
    pub error_message: Option<String>,
}

impl App {
    /// Crée une nouvelle instance de App, sur la liste, sans données
    pub fn new() -> Self {
        Self {
            running: true,
            current_screen: Screen::Listing,
            coins: Vec::new(),
            selected_index: 0,
            detail: DetailAggregator::new(),
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            error_message: None,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Navigation dans la liste
    // ========================================================================

    /// Navigue vers le haut dans la liste
    ///
    /// CONCEPT RUST : saturating_sub évite le panic sur unsigned
    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Navigue vers le bas dans la liste
    pub fn navigate_down(&mut self) {
        let max_index = self.coins.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Retourne le coin sélectionné dans la liste
    pub fn selected_coin(&self) -> Option<&CoinListing> {
        self.coins.get(self.selected_index)
    }

    /// Remplace la liste des coins (résultat du fetch initial)
    pub fn set_coins(&mut self, coins: Vec<CoinListing>) {
        self.coins = coins;
        // Garde l'index dans les bornes si la liste a rétréci
        self.selected_index = self.selected_index.min(self.coins.len().saturating_sub(1));
    }

    // ========================================================================
    // Transitions Liste <-> Détail
    // ========================================================================

    /// Ouvre la vue détail pour le coin sélectionné
    ///
    /// Démarre une nouvelle génération d'agrégation et retourne son tag
    /// avec l'identifiant du coin, pour que l'appelant lance les trois
    /// fetches. Retourne None si la liste est vide.
    ///
    /// Appelable aussi depuis la vue détail : rouvrir pendant un Pending
    /// relance toute la séquence avec une génération fraîche, et les
    /// résultats de la précédente seront jetés.
    pub fn open_selected_coin(&mut self) -> Option<(String, u64)> {
        let coin = self.selected_coin()?;
        let coin_id = coin.id.clone();
        // Le nom vient de la liste, comme le state de navigation de la
        // version web : purement cosmétique en attendant les métadonnées
        let name_hint = Some(coin.name.clone());

        let generation = self.detail.begin(coin_id.clone(), name_hint);
        self.current_screen = Screen::Detail;
        Some((coin_id, generation))
    }

    /// Retourne à la liste et abandonne la vue détail
    ///
    /// Les fetches encore en vol ne sont pas interrompus : leurs résultats
    /// seront simplement jetés à l'arrivée (génération dépassée).
    pub fn back_to_listing(&mut self) {
        self.detail.close();
        self.current_screen = Screen::Listing;
    }

    /// Retourne le view-model de la vue détail courante
    pub fn detail_view(&self) -> Option<&CoinDetail> {
        self.detail.view()
    }

    /// Vérifie si on est sur la liste
    pub fn is_on_listing(&self) -> bool {
        self.current_screen == Screen::Listing
    }

    /// Vérifie si on est sur la vue détail
    pub fn is_on_detail(&self) -> bool {
        self.current_screen == Screen::Detail
    }

    // ========================================================================
    // Confirmation de quit
    // ========================================================================

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // État de chargement
    // ========================================================================

    /// Démarre le chargement avec un message optionnel
    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    /// Termine le chargement
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    /// Vérifie si des données sont en cours de chargement
    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }

    /// Enregistre une erreur à afficher
    pub fn set_error(&mut self, message: String) {
        self.error_message = Some(message);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::DetailStatus;

    fn sample_coins() -> Vec<CoinListing> {
        let json = r#"[
            {"id": "btc-bitcoin", "name": "Bitcoin", "symbol": "BTC", "rank": 1,
             "is_new": false, "is_active": true, "type": "coin"},
            {"id": "eth-ethereum", "name": "Ethereum", "symbol": "ETH", "rank": 2,
             "is_new": false, "is_active": true, "type": "coin"},
            {"id": "usdt-tether", "name": "Tether", "symbol": "USDT", "rank": 3,
             "is_new": false, "is_active": true, "type": "token"}
        ]"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert!(app.is_on_listing());
        assert!(app.coins.is_empty());
        assert!(app.detail_view().is_none());
    }

    #[test]
    fn test_navigation() {
        let mut app = App::new();
        app.set_coins(sample_coins());

        assert_eq!(app.selected_index, 0);

        app.navigate_down();
        assert_eq!(app.selected_index, 1);
        app.navigate_down();
        assert_eq!(app.selected_index, 2);

        // Navigate down au max : reste à 2
        app.navigate_down();
        assert_eq!(app.selected_index, 2);

        app.navigate_up();
        assert_eq!(app.selected_index, 1);
        app.navigate_up();
        app.navigate_up();
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn test_open_selected_coin_starts_detail() {
        let mut app = App::new();
        app.set_coins(sample_coins());
        app.navigate_down();

        let (coin_id, generation) = app.open_selected_coin().unwrap();
        assert_eq!(coin_id, "eth-ethereum");
        assert!(generation > 0);
        assert!(app.is_on_detail());

        // Le view-model Pending est publié immédiatement, avec le nom de
        // la liste comme hint
        let view = app.detail_view().unwrap();
        assert_eq!(view.status, DetailStatus::Pending);
        assert_eq!(view.title(), "Ethereum");
    }

    #[test]
    fn test_open_with_empty_list_does_nothing() {
        let mut app = App::new();
        assert!(app.open_selected_coin().is_none());
        assert!(app.is_on_listing());
    }

    #[test]
    fn test_back_to_listing_discards_detail() {
        let mut app = App::new();
        app.set_coins(sample_coins());
        app.open_selected_coin().unwrap();

        app.back_to_listing();
        assert!(app.is_on_listing());
        assert!(app.detail_view().is_none());
    }

    #[test]
    fn test_reopen_bumps_generation() {
        // Changement de coin pendant un Pending : nouvelle génération,
        // l'ancienne devient périmée
        let mut app = App::new();
        app.set_coins(sample_coins());

        let (_, first) = app.open_selected_coin().unwrap();
        app.navigate_down();
        let (_, second) = app.open_selected_coin().unwrap();

        assert!(second > first);
        assert_eq!(app.detail_view().unwrap().coin_id, "eth-ethereum");
    }

    #[test]
    fn test_quit_confirmation_two_step() {
        let mut app = App::new();

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        assert!(app.is_running());

        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.request_quit();
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_set_coins_clamps_selection() {
        let mut app = App::new();
        app.set_coins(sample_coins());
        app.navigate_down();
        app.navigate_down();
        assert_eq!(app.selected_index, 2);

        // La liste rétrécit : l'index reste dans les bornes
        app.set_coins(sample_coins().into_iter().take(1).collect());
        assert_eq!(app.selected_index, 0);
    }
}
