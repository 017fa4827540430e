// ============================================================================
// Structures : HistoricalPoint, HistoricalWindow, ChartSeries
// ============================================================================
// Données historiques OHLCV d'un coin (GET /coins/{id}/ohlcv/historical)
// et leur transformation en série prête pour le graphique
//
// CONCEPTS RUST :
// 1. DateTime<Utc> : chrono désérialise directement les dates ISO-8601
// 2. Fonction pure : ChartSeries::from_points ne fait que transformer,
//    aucun tri ni interpolation (l'API garantit l'ordre chronologique)
// 3. Invariant : timestamps.len() == values.len(), toujours
// ============================================================================

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Largeur de la fenêtre historique : 14 jours, en secondes
pub const LOOKBACK_SECS: i64 = 60 * 60 * 24 * 14;

/// Un enregistrement OHLCV pour un intervalle de temps fixe
///
/// La séquence retournée par l'API est triée par temps croissant et couvre
/// la fenêtre demandée.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalPoint {
    /// Ouverture de l'intervalle
    pub time_open: DateTime<Utc>,

    /// Clôture de l'intervalle (sert d'axe X au graphique)
    pub time_close: DateTime<Utc>,

    /// Prix d'ouverture (Open)
    pub open: f64,

    /// Prix le plus haut (High)
    pub high: f64,

    /// Prix le plus bas (Low)
    pub low: f64,

    /// Prix de clôture (Close)
    pub close: f64,

    /// Volume échangé
    #[serde(default)]
    pub volume: f64,

    /// Capitalisation de marché
    #[serde(default)]
    pub market_cap: f64,
}

/// Fenêtre temporelle de la requête historique (bornes epoch en secondes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalWindow {
    /// Début de la fenêtre (end - 14 jours)
    pub start: i64,

    /// Fin de la fenêtre (maintenant)
    pub end: i64,
}

impl HistoricalWindow {
    /// Construit la fenêtre de 14 jours se terminant à `end`
    pub fn ending_at(end: i64) -> Self {
        Self {
            start: end - LOOKBACK_SECS,
            end,
        }
    }

    /// Construit la fenêtre de 14 jours se terminant maintenant
    pub fn last_two_weeks() -> Self {
        Self::ending_at(Utc::now().timestamp())
    }
}

/// Série prête pour le graphique : deux axes parallèles
///
/// Chaque point historique contribue son time_close à `timestamps[i]` et
/// son close à `values[i]`, dans l'ordre d'entrée.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    /// Axe X : dates de clôture, ordre chronologique
    pub timestamps: Vec<DateTime<Utc>>,

    /// Axe Y : prix de clôture
    pub values: Vec<f64>,
}

impl ChartSeries {
    /// Normalise une séquence de points historiques en série de graphique
    ///
    /// Fonction pure : pas de tri, pas d'interpolation, pas de remplissage
    /// de trous. Une entrée vide produit une série vide (pas une erreur) —
    /// c'est le cas d'un coin trop récent pour avoir un historique.
    pub fn from_points(points: &[HistoricalPoint]) -> Self {
        Self {
            timestamps: points.iter().map(|p| p.time_close).collect(),
            values: points.iter().map(|p| p.close).collect(),
        }
    }

    /// Retourne le nombre de points de la série
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Vérifie si la série est vide
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Calcule les bornes (min, max) des prix de la série
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }

        // fold() pour calculer min et max en un seul passage
        Some(self.values.iter().fold(
            (f64::MAX, f64::MIN),
            |(min, max), &v| (min.min(v), max.max(v)),
        ))
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn point(day: u32, close: f64) -> HistoricalPoint {
        let time_close = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
        HistoricalPoint {
            time_open: time_close - chrono::Duration::days(1),
            time_close,
            open: close - 5.0,
            high: close + 10.0,
            low: close - 10.0,
            close,
            volume: 1000.0,
            market_cap: 0.0,
        }
    }

    #[test]
    fn test_historical_point_parse() {
        // Extrait réel de GET /coins/btc-bitcoin/ohlcv/historical
        let json = r#"[{
            "time_open": "2024-01-01T00:00:00Z",
            "time_close": "2024-01-01T23:59:59Z",
            "open": 42280.23,
            "high": 44184.17,
            "low": 42180.77,
            "close": 44167.33,
            "volume": 18426978601,
            "market_cap": 827596053000
        }]"#;

        let points: Vec<HistoricalPoint> = serde_json::from_str(json).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].close, 44167.33);
        assert_eq!(points[0].time_close.timestamp(), 1704153599);
    }

    #[test]
    fn test_window_is_fourteen_days() {
        // start == end - 1209600, pour n'importe quel end
        let window = HistoricalWindow::ending_at(1_700_000_000);
        assert_eq!(window.end, 1_700_000_000);
        assert_eq!(window.end - window.start, 1_209_600);

        let other = HistoricalWindow::ending_at(42);
        assert_eq!(other.start, 42 - 1_209_600);
    }

    #[test]
    fn test_normalize_empty_input() {
        let series = ChartSeries::from_points(&[]);
        assert!(series.is_empty());
        assert!(series.timestamps.is_empty());
        assert!(series.values.is_empty());
        assert!(series.value_bounds().is_none());
    }

    #[test]
    fn test_normalize_preserves_order_and_length() {
        let points = vec![point(1, 100.0), point(2, 110.0), point(3, 95.0)];
        let series = ChartSeries::from_points(&points);

        assert_eq!(series.timestamps.len(), series.values.len());
        assert_eq!(series.values, vec![100.0, 110.0, 95.0]);
        assert_eq!(series.timestamps[0], points[0].time_close);
        assert_eq!(series.timestamps[2], points[2].time_close);
    }

    #[test]
    fn test_value_bounds() {
        let points = vec![point(1, 100.0), point(2, 110.0), point(3, 95.0)];
        let series = ChartSeries::from_points(&points);
        assert_eq!(series.value_bounds(), Some((95.0, 110.0)));
    }
}
