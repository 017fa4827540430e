// ============================================================================
// Structure : PriceSnapshot
// ============================================================================
// Cotation instantanée d'un coin (GET /tickers/{id})
//
// Un snapshot est figé au moment du fetch : il est remplacé en bloc par un
// fetch ultérieur, jamais modifié champ par champ.
//
// CONCEPTS RUST :
// 1. Structures imbriquées : le JSON contient quotes.USD, on reflète la
//    même hiérarchie avec deux structs
// 2. #[serde(rename = "USD")] : le nom JSON est en majuscules
// ============================================================================

use serde::Deserialize;

/// Cotation en dollars (objet imbriqué quotes.USD)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsdQuote {
    /// Prix actuel en USD
    pub price: f64,

    /// Capitalisation de marché
    #[serde(default)]
    pub market_cap: Option<f64>,

    /// Volume échangé sur 24h
    #[serde(default)]
    pub volume_24h: Option<f64>,

    /// Variations en pourcentage sur plusieurs fenêtres
    #[serde(default)]
    pub percent_change_1h: Option<f64>,
    #[serde(default)]
    pub percent_change_24h: Option<f64>,
    #[serde(default)]
    pub percent_change_7d: Option<f64>,
    #[serde(default)]
    pub percent_change_30d: Option<f64>,
    #[serde(default)]
    pub percent_change_1y: Option<f64>,

    /// Prix le plus haut jamais atteint (all-time high)
    #[serde(default)]
    pub ath_price: Option<f64>,

    /// Date de l'all-time high (ISO-8601, telle quelle)
    #[serde(default)]
    pub ath_date: Option<String>,
}

/// Conteneur des cotations par devise
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Quotes {
    #[serde(rename = "USD")]
    pub usd: UsdQuote,
}

/// Cotation instantanée complète d'un coin
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceSnapshot {
    /// Identifiant du coin
    pub id: String,

    /// Nom complet
    pub name: String,

    /// Symbole
    pub symbol: String,

    /// Rang par capitalisation
    #[serde(default)]
    pub rank: i64,

    /// Offre en circulation
    #[serde(default)]
    pub circulating_supply: Option<f64>,

    /// Offre totale
    #[serde(default)]
    pub total_supply: Option<f64>,

    /// Offre maximale (0 ou absente si illimitée)
    #[serde(default)]
    pub max_supply: Option<f64>,

    /// Cotations par devise (USD uniquement pour l'instant)
    pub quotes: Quotes,
}

impl PriceSnapshot {
    /// Prix actuel en USD
    pub fn price_usd(&self) -> f64 {
        self.quotes.usd.price
    }

    /// Variation 24h en pourcentage
    pub fn change_24h(&self) -> Option<f64> {
        self.quotes.usd.percent_change_24h
    }

    /// Retourne true si le coin est en hausse sur 24h
    pub fn is_positive(&self) -> bool {
        self.change_24h().map(|c| c >= 0.0).unwrap_or(false)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
