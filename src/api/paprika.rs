// ============================================================================
// API Client : Coinpaprika
// ============================================================================
// Récupère les données crypto depuis l'API publique Coinpaprika
//
// Quatre opérations indépendantes, une requête réseau chacune :
// - fetch_coin_list      : GET /coins
// - fetch_metadata       : GET /coins/{id}
// - fetch_price_snapshot : GET /tickers/{id}
// - fetch_historical     : GET /coins/{id}/ohlcv/historical?start=..&end=..
//
// Pas de retry, pas de timeout au-delà du défaut du transport, pas de
// récupération d'erreur ici : chaque échec remonte typé à l'appelant.
//
// CONCEPTS RUST :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. thiserror : erreurs typées qui distinguent transport / statut / parsing
// 3. On lit le body en texte puis serde_json::from_str, pour que les
//    échecs de parsing soient clairement des Malformed et pas des Network
// ============================================================================

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::models::{CoinListing, CoinMetadata, HistoricalPoint, HistoricalWindow, PriceSnapshot};

/// Base de l'API Coinpaprika (v1, publique, sans clé)
pub const API_BASE: &str = "https://api.coinpaprika.com/v1";

/// Nombre de coins gardés de la liste complète (~4000 entrées à la source)
pub const LISTING_PREFIX: usize = 100;

// ============================================================================
// Erreurs typées de la couche API
// ============================================================================

/// Échec d'une opération de fetch
///
/// CONCEPT RUST : thiserror
/// - #[derive(Error)] génère l'implémentation de std::error::Error
/// - #[error("...")] définit le message Display
/// - #[from] permet la conversion automatique avec l'opérateur ?
#[derive(Debug, Error)]
pub enum FetchError {
    /// Échec au niveau transport (DNS, connexion, TLS, ...)
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// L'API a répondu avec un statut HTTP non-succès
    #[error("coinpaprika returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// Le body ne correspond pas à la forme attendue
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ============================================================================
// Helpers internes
// ============================================================================

/// Crée le client HTTP avec un User-Agent explicite
fn http_client() -> Result<reqwest::Client, FetchError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("lazycoin/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Effectue un GET et parse le body JSON vers T
///
/// Une seule requête, pas de retry. Le body est lu en texte puis parsé
/// séparément : un body invalide donne FetchError::Malformed, pas Network.
async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    debug!(url = %url, "Sending HTTP request to Coinpaprika");

    let client = http_client()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    if !status.is_success() {
        error!(status = %status, url = %url, "Coinpaprika returned error status");
        return Err(FetchError::Status(status));
    }

    let body = response.text().await?;
    let parsed = serde_json::from_str(&body)?;
    Ok(parsed)
}

// ============================================================================
// Construction des URLs
// ============================================================================

fn coin_list_url() -> String {
    format!("{}/coins", API_BASE)
}

fn metadata_url(coin_id: &str) -> String {
    format!("{}/coins/{}", API_BASE, coin_id)
}

fn snapshot_url(coin_id: &str) -> String {
    format!("{}/tickers/{}", API_BASE, coin_id)
}

fn historical_url(coin_id: &str, window: HistoricalWindow) -> String {
    format!(
        "{}/coins/{}/ohlcv/historical?start={}&end={}",
        API_BASE, coin_id, window.start, window.end
    )
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Récupère la liste des coins, tronquée aux LISTING_PREFIX premiers
///
/// L'API retourne la liste complète triée par rang ; on ne garde que le
/// préfixe fixe (pas de pagination).
#[instrument]
pub async fn fetch_coin_list() -> Result<Vec<CoinListing>, FetchError> {
    let mut coins: Vec<CoinListing> = get_json(&coin_list_url()).await?;
    coins.truncate(LISTING_PREFIX);

    debug!(coins = coins.len(), "Fetched coin list");
    Ok(coins)
}

/// Récupère les métadonnées descriptives d'un coin
#[instrument]
pub async fn fetch_metadata(coin_id: &str) -> Result<CoinMetadata, FetchError> {
    let metadata: CoinMetadata = get_json(&metadata_url(coin_id)).await?;

    debug!(coin = %metadata.id, links = metadata.links().len(), "Fetched coin metadata");
    Ok(metadata)
}

/// Récupère la cotation instantanée d'un coin
#[instrument]
pub async fn fetch_price_snapshot(coin_id: &str) -> Result<PriceSnapshot, FetchError> {
    let snapshot: PriceSnapshot = get_json(&snapshot_url(coin_id)).await?;

    debug!(coin = %snapshot.id, price = snapshot.price_usd(), "Fetched price snapshot");
    Ok(snapshot)
}

/// Récupère l'historique OHLCV d'un coin sur la fenêtre donnée
///
/// L'appelant calcule la fenêtre (14 jours se terminant maintenant, voir
/// HistoricalWindow::last_two_weeks). La séquence retournée est triée par
/// temps croissant ; elle peut être vide pour un coin trop récent.
#[instrument(skip(window), fields(start = window.start, end = window.end))]
pub async fn fetch_historical(
    coin_id: &str,
    window: HistoricalWindow,
) -> Result<Vec<HistoricalPoint>, FetchError> {
    let points: Vec<HistoricalPoint> = get_json(&historical_url(coin_id, window)).await?;

    debug!(coin = %coin_id, points = points.len(), "Fetched historical data");
    Ok(points)
}

// ============================================================================
// Tests unitaires
// ============================================================================
