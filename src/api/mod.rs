// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client API pour récupérer les données crypto
// depuis Coinpaprika
// ============================================================================

pub mod paprika; // Client API Coinpaprika

// Re-export des fonctions et types principaux
pub use paprika::{
    fetch_coin_list, fetch_historical, fetch_metadata, fetch_price_snapshot, FetchError,
    API_BASE, LISTING_PREFIX,
};
