// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// Les formes JSON "souples" de l'API Coinpaprika sont re-exprimées ici en
// structures explicites : champs obligatoires vs optionnels, dates typées.
// ============================================================================

pub mod listing;    // Liste des coins (GET /coins)
pub mod metadata;   // Métadonnées descriptives (GET /coins/{id})
pub mod snapshot;   // Cotation instantanée (GET /tickers/{id})
pub mod historical; // Historique OHLCV + série de graphique

// Re-export des structures principales pour simplifier les imports
pub use historical::{ChartSeries, HistoricalPoint, HistoricalWindow, LOOKBACK_SECS};
pub use listing::CoinListing;
pub use metadata::{CoinMetadata, ReferenceLink};
pub use snapshot::PriceSnapshot;
