// ============================================================================
// Structure : CoinListing
// ============================================================================
// Représente une crypto-monnaie dans la liste principale (GET /coins)
//
// CONCEPTS RUST :
// 1. #[derive(Deserialize)] : désérialisation JSON automatique avec serde
// 2. #[serde(rename = "...")] : mapper un champ JSON réservé ("type")
// 3. Option<T> : champs que l'API peut omettre
// ============================================================================

use serde::Deserialize;

/// Une crypto-monnaie telle que retournée par la liste Coinpaprika
///
/// L'API retourne ~4000 entrées ; l'application n'en garde que les 100
/// premières (voir `api::LISTING_PREFIX`).
#[derive(Debug, Clone, Deserialize)]
pub struct CoinListing {
    /// Identifiant opaque du coin (ex: "btc-bitcoin")
    /// C'est la clé utilisée pour toutes les requêtes de détail
    pub id: String,

    /// Nom complet (ex: "Bitcoin")
    pub name: String,

    /// Symbole (ex: "BTC")
    pub symbol: String,

    /// Rang par capitalisation
    pub rank: i64,

    /// Le coin est-il récent ?
    #[serde(default)]
    pub is_new: bool,

    /// Le coin est-il encore actif ?
    #[serde(default)]
    pub is_active: bool,

    /// Type d'actif (ex: "coin", "token")
    /// CONCEPT RUST : "type" est un mot-clé, on renomme le champ
    #[serde(rename = "type", default)]
    pub coin_type: Option<String>,
}

impl CoinListing {
    /// Formatte le coin pour l'affichage dans la liste
    ///
    /// Format : "   1  Bitcoin              BTC"
    pub fn display(&self) -> String {
        // Tronque le nom à 24 caractères avec ellipse si nécessaire
        let truncated_name = if self.name.chars().count() <= 24 {
            self.name.clone()
        } else {
            let truncated: String = self.name.chars().take(23).collect();
            format!("{}…", truncated)
        };

        let marker = if self.is_new { "●" } else { " " };

        format!(
            "{:>4}  {:<24} {:<8} {}",
            self.rank, truncated_name, self.symbol, marker
        )
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_listing_parse() {
        // Extrait réel de GET /coins
        let json = r#"{
            "id": "btc-bitcoin",
            "name": "Bitcoin",
            "symbol": "BTC",
            "rank": 1,
            "is_new": false,
            "is_active": true,
            "type": "coin"
        }"#;

        let coin: CoinListing = serde_json::from_str(json).unwrap();
        assert_eq!(coin.id, "btc-bitcoin");
        assert_eq!(coin.symbol, "BTC");
        assert_eq!(coin.rank, 1);
        assert!(coin.is_active);
        assert_eq!(coin.coin_type.as_deref(), Some("coin"));
    }

    #[test]
    fn test_coin_listing_display() {
        let coin = CoinListing {
            id: "eth-ethereum".to_string(),
            name: "Ethereum".to_string(),
            symbol: "ETH".to_string(),
            rank: 2,
            is_new: false,
            is_active: true,
            coin_type: Some("coin".to_string()),
        };

        let line = coin.display();
        assert!(line.contains("Ethereum"));
        assert!(line.contains("ETH"));
    }

    #[test]
    fn test_coin_listing_display_truncates_long_name() {
        let coin = CoinListing {
            id: "x".to_string(),
            name: "Un nom de coin beaucoup trop long pour la liste".to_string(),
            symbol: "XXX".to_string(),
            rank: 99,
            is_new: true,
            is_active: true,
            coin_type: None,
        };

        let line = coin.display();
        assert!(line.contains('…'));
    }
}
