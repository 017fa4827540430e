// ============================================================================
// Structure : CoinMetadata
// ============================================================================
// Attributs descriptifs d'un coin (GET /coins/{id})
//
// Données "froides" : nom, description, liens externes... Elles changent
// rarement et sont en lecture seule une fois récupérées.
//
// CONCEPTS RUST :
// 1. Required vs Optional : l'API omet beaucoup de champs selon le coin,
//    on rend l'optionnel explicite avec Option<T> plutôt que de laisser
//    serde échouer sur un champ manquant
// 2. #[serde(default)] : valeur par défaut si le champ est absent du JSON
// ============================================================================

use serde::Deserialize;

/// Un lien externe associé au coin (site web, explorer, reddit, etc.)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceLink {
    /// URL du lien
    pub url: String,

    /// Type de lien (ex: "website", "explorer", "reddit")
    #[serde(rename = "type")]
    pub link_type: String,
}

/// Métadonnées descriptives d'un coin
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinMetadata {
    /// Identifiant du coin (ex: "btc-bitcoin")
    pub id: String,

    /// Nom complet (ex: "Bitcoin")
    pub name: String,

    /// Symbole (ex: "BTC")
    pub symbol: String,

    /// Rang par capitalisation
    #[serde(default)]
    pub rank: i64,

    /// Description libre (peut être absente pour les petits coins)
    #[serde(default)]
    pub description: Option<String>,

    /// Le coin est-il récent ?
    #[serde(default)]
    pub is_new: bool,

    /// Le coin est-il encore actif ?
    #[serde(default)]
    pub is_active: bool,

    /// Le code est-il open source ?
    #[serde(default)]
    pub open_source: bool,

    /// Date de démarrage (ISO-8601, telle quelle)
    #[serde(default)]
    pub started_at: Option<String>,

    /// Type de preuve (ex: "proof of work")
    #[serde(default)]
    pub proof_type: Option<String>,

    /// Algorithme de hash (ex: "SHA256")
    #[serde(default)]
    pub hash_algorithm: Option<String>,

    /// Liens externes détaillés
    /// CONCEPT RUST : Vec::default() == vec![] si le champ est absent
    #[serde(default)]
    pub links_extended: Vec<ReferenceLink>,
}

impl CoinMetadata {
    /// Retourne la liste plate des liens (url + type) pour l'affichage
    ///
    /// La couche présentation les rend tels quels, dans l'ordre de l'API.
    pub fn links(&self) -> &[ReferenceLink] {
        &self.links_extended
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_parse_full() {
        // Extrait (raccourci) de GET /coins/btc-bitcoin
        let json = r#"{
            "id": "btc-bitcoin",
            "name": "Bitcoin",
            "symbol": "BTC",
            "rank": 1,
            "is_new": false,
            "is_active": true,
            "type": "coin",
            "description": "Bitcoin is a cryptocurrency and worldwide payment system.",
            "open_source": true,
            "started_at": "2009-01-03T00:00:00Z",
            "proof_type": "proof of work",
            "hash_algorithm": "SHA256",
            "links_extended": [
                {"url": "https://bitcoin.org", "type": "website"},
                {"url": "https://blockchair.com/bitcoin", "type": "explorer"}
            ]
        }"#;

        let meta: CoinMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.name, "Bitcoin");
        assert_eq!(meta.rank, 1);
        assert!(meta.open_source);
        assert_eq!(meta.links().len(), 2);
        assert_eq!(meta.links()[0].link_type, "website");
        assert_eq!(meta.links()[1].url, "https://blockchair.com/bitcoin");
    }

    #[test]
    fn test_metadata_parse_minimal() {
        // Les petits coins omettent la plupart des champs
        let json = r#"{
            "id": "xyz-newcoin",
            "name": "NewCoin",
            "symbol": "XYZ"
        }"#;

        let meta: CoinMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.id, "xyz-newcoin");
        assert!(meta.description.is_none());
        assert!(meta.links().is_empty());
        assert!(!meta.is_active);
    }
}
