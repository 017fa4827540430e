// ============================================================================
// LazyCoin - Library
// ============================================================================
// Expose les modules publics pour les tests
// ============================================================================

pub mod api;    // Client API Coinpaprika
pub mod models; // Structures de données
pub mod detail; // Agrégateur de la vue détail (le cœur)
pub mod app;    // État de l'application
pub mod ui;     // Interface utilisateur
