// ============================================================================
// Detail Aggregator - Orchestration de la vue détail d'un coin
// ============================================================================
// Coordonne les trois fetches d'un coin (métadonnées, cotation, historique),
// réconcilie leurs arrivées indépendantes et publie UN view-model cohérent.
//
// State machine par identifiant, deux états : Pending → Ready.
// La transition se produit exactement une fois, quand les trois opérations
// sont "settled" (résultat OU échec).
//
// Annulation logique par génération : chaque requête en vol est taguée avec
// la génération active à son émission. Un changement de coin incrémente la
// génération ; les résultats tagués d'une génération dépassée sont jetés
// silencieusement. C'est ce qui empêche une réponse lente d'un coin
// précédent d'écraser la vue courante.
//
// CONCEPTS RUST :
// 1. Option<Option<T>> : le slot d'accumulation
//    - None          : pas encore settled
//    - Some(None)    : settled, le fetch a échoué (champ absent)
//    - Some(Some(v)) : settled, résultat disponible
// 2. u64 monotone : le compteur de génération ne revient jamais en arrière
// ============================================================================

use tracing::{debug, info, warn};

use crate::api::FetchError;
use crate::models::{ChartSeries, CoinMetadata, HistoricalPoint, PriceSnapshot};

// ============================================================================
// View-Model
// ============================================================================

/// État d'agrégation de la vue détail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStatus {
    /// Au moins un fetch est encore en vol
    Pending,

    /// Les trois fetches sont settled, le view-model est complet
    Ready,
}

/// Le view-model unique remis à la couche présentation
///
/// Immuable pour les consommateurs : il est remplacé en bloc au passage à
/// Ready, jamais mis à jour champ par champ de manière visible.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinDetail {
    /// Identifiant du coin (ex: "btc-bitcoin")
    pub coin_id: String,

    /// Nom transmis par l'écran de navigation (purement cosmétique,
    /// affiché en attendant les métadonnées)
    pub name_hint: Option<String>,

    /// Métadonnées descriptives (None si le fetch a échoué)
    pub metadata: Option<CoinMetadata>,

    /// Cotation instantanée (None si le fetch a échoué)
    pub snapshot: Option<PriceSnapshot>,

    /// Série de graphique sur 14 jours (vide si échec ou coin trop récent)
    pub chart: ChartSeries,

    /// Pending ou Ready
    pub status: DetailStatus,
}

impl CoinDetail {
    /// Crée le view-model initial, en Pending, sans aucune donnée
    fn pending(coin_id: String, name_hint: Option<String>) -> Self {
        Self {
            coin_id,
            name_hint,
            metadata: None,
            snapshot: None,
            chart: ChartSeries::default(),
            status: DetailStatus::Pending,
        }
    }

    /// Titre à afficher : hint de navigation, sinon nom des métadonnées,
    /// sinon l'identifiant brut (même cascade que la page d'origine)
    pub fn title(&self) -> &str {
        if let Some(hint) = &self.name_hint {
            return hint;
        }
        if let Some(meta) = &self.metadata {
            return &meta.name;
        }
        &self.coin_id
    }

    /// Vérifie si la vue est complète
    pub fn is_ready(&self) -> bool {
        self.status == DetailStatus::Ready
    }
}

// ============================================================================
// Settlement des slots
// ============================================================================

/// Le résultat d'un des trois fetches, prêt à être appliqué à l'agrégateur
///
/// Chaque variant transporte le Result complet : l'agrégateur décide de la
/// politique de dégradation, pas l'appelant.
#[derive(Debug)]
pub enum SlotUpdate {
    Metadata(Result<CoinMetadata, FetchError>),
    Snapshot(Result<PriceSnapshot, FetchError>),
    Historical(Result<Vec<HistoricalPoint>, FetchError>),
}

impl SlotUpdate {
    /// Nom du slot pour les logs
    fn label(&self) -> &'static str {
        match self {
            SlotUpdate::Metadata(_) => "metadata",
            SlotUpdate::Snapshot(_) => "snapshot",
            SlotUpdate::Historical(_) => "historical",
        }
    }
}

/// Ce qui s'est passé quand on a appliqué un SlotUpdate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Résultat d'une génération dépassée, jeté sans effet
    Stale,

    /// Slot enregistré, il en manque encore
    Recorded,

    /// Troisième slot settled : le view-model Ready vient d'être publié
    Ready,
}

// ============================================================================
// L'agrégateur
// ============================================================================

/// Agrégateur de la vue détail : un accumulateur à trois slots optionnels
/// plus un tag de génération
///
/// Une seule instance vit dans l'App ; chaque ouverture de coin démarre une
/// nouvelle génération. L'ordre d'arrivée des trois résultats est
/// indifférent, et les vérifications de settlement dupliquées sont sans
/// effet (le passage à Ready est gardé par le statut).
pub struct DetailAggregator {
    /// Génération active ; les résultats tagués autrement sont jetés
    generation: u64,

    /// Slots d'accumulation (None = pas settled, Some(None) = échec)
    metadata: Option<Option<CoinMetadata>>,
    snapshot: Option<Option<PriceSnapshot>>,
    historical: Option<Option<Vec<HistoricalPoint>>>,

    /// View-model courant (None tant qu'aucun coin n'a été ouvert)
    view: Option<CoinDetail>,
}

impl DetailAggregator {
    /// Crée un agrégateur sans requête active
    pub fn new() -> Self {
        Self {
            generation: 0,
            metadata: None,
            snapshot: None,
            historical: None,
            view: None,
        }
    }

    /// Démarre une nouvelle génération pour `coin_id`
    ///
    /// Publie immédiatement un view-model Pending et retourne le tag de
    /// génération à attacher aux trois fetches. Toute opération encore en
    /// vol pour la génération précédente devient ipso facto périmée.
    pub fn begin(&mut self, coin_id: String, name_hint: Option<String>) -> u64 {
        self.generation += 1;
        self.metadata = None;
        self.snapshot = None;
        self.historical = None;

        info!(coin = %coin_id, generation = self.generation, "Starting detail aggregation");
        self.view = Some(CoinDetail::pending(coin_id, name_hint));
        self.generation
    }

    /// Abandonne la vue courante (retour à la liste)
    ///
    /// Incrémente la génération pour que les résultats encore en vol soient
    /// jetés à leur arrivée.
    pub fn close(&mut self) {
        self.generation += 1;
        self.metadata = None;
        self.snapshot = None;
        self.historical = None;
        self.view = None;
    }

    /// Applique le résultat d'un fetch tagué `generation`
    ///
    /// C'est le cœur du fan-in : chaque arrivée remplit son slot, puis le
    /// settlement est re-vérifié. Au troisième slot, le view-model Ready est
    /// assemblé et remplace le Pending en bloc.
    pub fn apply(&mut self, generation: u64, update: SlotUpdate) -> ApplyOutcome {
        // Annulation logique : mauvaise génération -> poubelle, sans erreur
        if generation != self.generation || self.view.is_none() {
            debug!(
                slot = update.label(),
                tagged = generation,
                current = self.generation,
                "Discarding stale result"
            );
            return ApplyOutcome::Stale;
        }

        // Politique d'échec : un fetch raté dégrade son champ en absent,
        // il n'interrompt pas les deux autres et n'empêche pas Ready
        match update {
            SlotUpdate::Metadata(result) => {
                self.metadata = Some(Self::settle("metadata", result));
            }
            SlotUpdate::Snapshot(result) => {
                self.snapshot = Some(Self::settle("snapshot", result));
            }
            SlotUpdate::Historical(result) => {
                self.historical = Some(Self::settle("historical", result));
            }
        }

        self.try_complete()
    }

    /// Transforme un Result en contenu de slot, en loggant l'échec
    fn settle<T>(slot: &'static str, result: Result<T, FetchError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(slot = slot, error = %e, "Fetch failed, field degrades to absent");
                None
            }
        }
    }

    /// Vérifie le settlement et publie le view-model Ready si complet
    ///
    /// Idempotent : tant qu'un slot manque, ou si la vue est déjà Ready,
    /// l'appel est sans effet.
    fn try_complete(&mut self) -> ApplyOutcome {
        if !self.is_settled() {
            return ApplyOutcome::Recorded;
        }

        // La transition Pending -> Ready ne se produit qu'une fois
        let Some(view) = &self.view else {
            return ApplyOutcome::Recorded;
        };
        if view.is_ready() {
            return ApplyOutcome::Recorded;
        }

        // Un historique raté est traité comme une séquence vide : le
        // graphique vide est un état valide, pas une erreur
        let points = self
            .historical
            .take()
            .flatten()
            .unwrap_or_default();
        let chart = ChartSeries::from_points(&points);

        let ready = CoinDetail {
            coin_id: view.coin_id.clone(),
            name_hint: view.name_hint.clone(),
            metadata: self.metadata.take().flatten(),
            snapshot: self.snapshot.take().flatten(),
            chart,
            status: DetailStatus::Ready,
        };

        info!(
            coin = %ready.coin_id,
            generation = self.generation,
            has_metadata = ready.metadata.is_some(),
            has_snapshot = ready.snapshot.is_some(),
            chart_points = ready.chart.len(),
            "Detail view ready"
        );

        // Remplacement en bloc : les consommateurs ne voient jamais un
        // view-model partiellement mis à jour
        self.view = Some(ready);
        ApplyOutcome::Ready
    }

    /// Les trois fetches de la génération courante sont-ils settled ?
    fn is_settled(&self) -> bool {
        self.metadata.is_some() && self.snapshot.is_some() && self.historical.is_some()
    }

    /// Retourne le view-model courant (None si aucun coin ouvert)
    pub fn view(&self) -> Option<&CoinDetail> {
        self.view.as_ref()
    }

    /// Génération active (pour les tests et les logs)
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for DetailAggregator {
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
    use chrono::{TimeZone, Utc};

    // ------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------

    fn sample_metadata() -> CoinMetadata {
        serde_json::from_str(
            r#"{
                "id": "btc-bitcoin",
                "name": "Bitcoin",
                "symbol": "BTC",
                "rank": 1,
                "is_active": true,
                "links_extended": [
                    {"url": "https://bitcoin.org", "type": "website"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn sample_snapshot() -> PriceSnapshot {
        serde_json::from_str(
            r#"{
                "id": "btc-bitcoin",
                "name": "Bitcoin",
                "symbol": "BTC",
                "rank": 1,
                "quotes": { "USD": { "price": 43250.77 } }
            }"#,
        )
        .unwrap()
    }

    fn sample_points(count: u32) -> Vec<HistoricalPoint> {
        (1..=count)
            .map(|day| {
                let time_close = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
                HistoricalPoint {
                    time_open: time_close - chrono::Duration::days(1),
                    time_close,
                    open: 100.0,
                    high: 120.0,
                    low: 90.0,
                    close: 100.0 + day as f64,
                    volume: 0.0,
                    market_cap: 0.0,
                }
            })
            .collect()
    }

    fn network_error() -> FetchError {
        FetchError::Status(reqwest::StatusCode::BAD_GATEWAY)
    }

    // ------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------

    #[test]
    fn test_begin_publishes_pending_view() {
        let mut agg = DetailAggregator::new();
        assert!(agg.view().is_none());

        agg.begin("btc-bitcoin".to_string(), Some("Bitcoin".to_string()));

        let view = agg.view().unwrap();
        assert_eq!(view.status, DetailStatus::Pending);
        assert_eq!(view.coin_id, "btc-bitcoin");
        assert_eq!(view.title(), "Bitcoin"); // hint avant les métadonnées
        assert!(view.chart.is_empty());
    }

    #[test]
    fn test_ready_after_three_settlements() {
        let mut agg = DetailAggregator::new();
        let generation = agg.begin("btc-bitcoin".to_string(), None);

        assert_eq!(
            agg.apply(generation, SlotUpdate::Metadata(Ok(sample_metadata()))),
            ApplyOutcome::Recorded
        );
        assert_eq!(
            agg.apply(generation, SlotUpdate::Snapshot(Ok(sample_snapshot()))),
            ApplyOutcome::Recorded
        );
        assert_eq!(
            agg.apply(generation, SlotUpdate::Historical(Ok(sample_points(15)))),
            ApplyOutcome::Ready
        );

        let view = agg.view().unwrap();
        assert!(view.is_ready());
        assert_eq!(view.chart.timestamps.len(), 15);
        assert_eq!(view.chart.values.len(), 15);
        assert_eq!(view.metadata.as_ref().unwrap().name, "Bitcoin");
        assert_eq!(view.snapshot.as_ref().unwrap().price_usd(), 43250.77);
    }

    #[test]
    fn test_all_six_orderings_commute() {
        // Les trois fetches peuvent arriver dans n'importe quel ordre :
        // les 6 permutations doivent produire un view-model identique,
        // avec exactement une transition vers Ready
        let orderings: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];

        let mut views = Vec::new();

        for ordering in orderings {
            let mut agg = DetailAggregator::new();
            let generation = agg.begin("btc-bitcoin".to_string(), None);

            let mut ready_count = 0;
            for slot in ordering {
                let update = match slot {
                    0 => SlotUpdate::Metadata(Ok(sample_metadata())),
                    1 => SlotUpdate::Snapshot(Ok(sample_snapshot())),
                    _ => SlotUpdate::Historical(Ok(sample_points(5))),
                };
                if agg.apply(generation, update) == ApplyOutcome::Ready {
                    ready_count += 1;
                }
            }

            assert_eq!(ready_count, 1, "Ready doit se produire exactement une fois");
            views.push(agg.view().unwrap().clone());
        }

        for view in &views[1..] {
            assert_eq!(view, &views[0], "le view-model dépend de l'ordre d'arrivée");
        }
    }

    #[test]
    fn test_failed_snapshot_still_reaches_ready() {
        let mut agg = DetailAggregator::new();
        let generation = agg.begin("btc-bitcoin".to_string(), None);

        agg.apply(generation, SlotUpdate::Metadata(Ok(sample_metadata())));
        agg.apply(generation, SlotUpdate::Snapshot(Err(network_error())));
        let outcome = agg.apply(generation, SlotUpdate::Historical(Ok(sample_points(3))));

        assert_eq!(outcome, ApplyOutcome::Ready);

        let view = agg.view().unwrap();
        assert!(view.is_ready());
        assert!(view.snapshot.is_none()); // champ dégradé en absent
        assert!(view.metadata.is_some());
        assert_eq!(view.chart.len(), 3);
    }

    #[test]
    fn test_failed_historical_degrades_to_empty_chart() {
        let mut agg = DetailAggregator::new();
        let generation = agg.begin("btc-bitcoin".to_string(), None);

        agg.apply(generation, SlotUpdate::Metadata(Ok(sample_metadata())));
        agg.apply(generation, SlotUpdate::Snapshot(Ok(sample_snapshot())));
        let outcome = agg.apply(generation, SlotUpdate::Historical(Err(network_error())));

        assert_eq!(outcome, ApplyOutcome::Ready);

        let view = agg.view().unwrap();
        assert!(view.is_ready()); // pas de chemin d'erreur fatal
        assert!(view.chart.is_empty());
        assert_eq!(view.chart.timestamps.len(), view.chart.values.len());
    }

    #[test]
    fn test_empty_historical_is_valid() {
        // Coin tout neuf : l'API retourne une séquence vide
        let mut agg = DetailAggregator::new();
        let generation = agg.begin("xyz-newcoin".to_string(), None);

        agg.apply(generation, SlotUpdate::Metadata(Err(network_error())));
        agg.apply(generation, SlotUpdate::Snapshot(Ok(sample_snapshot())));
        let outcome = agg.apply(generation, SlotUpdate::Historical(Ok(vec![])));

        assert_eq!(outcome, ApplyOutcome::Ready);
        assert!(agg.view().unwrap().chart.is_empty());
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut agg = DetailAggregator::new();

        // Première génération : un seul slot arrive
        let gen_btc = agg.begin("btc-bitcoin".to_string(), None);
        agg.apply(gen_btc, SlotUpdate::Metadata(Ok(sample_metadata())));

        // L'utilisateur change de coin avant le settlement complet
        let gen_eth = agg.begin("eth-ethereum".to_string(), None);
        assert_ne!(gen_btc, gen_eth);

        // Les résultats tardifs de la génération btc sont jetés...
        assert_eq!(
            agg.apply(gen_btc, SlotUpdate::Snapshot(Ok(sample_snapshot()))),
            ApplyOutcome::Stale
        );
        assert_eq!(
            agg.apply(gen_btc, SlotUpdate::Historical(Ok(sample_points(10)))),
            ApplyOutcome::Stale
        );

        // ...et la vue eth reste Pending, sans aucune fuite inter-coin
        let view = agg.view().unwrap();
        assert_eq!(view.coin_id, "eth-ethereum");
        assert_eq!(view.status, DetailStatus::Pending);
        assert!(view.metadata.is_none());

        // La nouvelle génération se complète normalement
        agg.apply(gen_eth, SlotUpdate::Metadata(Err(network_error())));
        agg.apply(gen_eth, SlotUpdate::Snapshot(Err(network_error())));
        let outcome = agg.apply(gen_eth, SlotUpdate::Historical(Ok(sample_points(2))));
        assert_eq!(outcome, ApplyOutcome::Ready);
        assert_eq!(agg.view().unwrap().coin_id, "eth-ethereum");
    }

    #[test]
    fn test_results_after_close_are_discarded() {
        let mut agg = DetailAggregator::new();
        let generation = agg.begin("btc-bitcoin".to_string(), None);

        // Retour à la liste : la vue est abandonnée
        agg.close();
        assert!(agg.view().is_none());

        // Les résultats tardifs n'ont aucun effet
        assert_eq!(
            agg.apply(generation, SlotUpdate::Metadata(Ok(sample_metadata()))),
            ApplyOutcome::Stale
        );
        assert!(agg.view().is_none());
    }

    #[test]
    fn test_title_fallback_cascade() {
        let mut agg = DetailAggregator::new();
        let generation = agg.begin("btc-bitcoin".to_string(), None);

        // Sans hint ni métadonnées : l'identifiant brut
        assert_eq!(agg.view().unwrap().title(), "btc-bitcoin");

        agg.apply(generation, SlotUpdate::Metadata(Ok(sample_metadata())));
        agg.apply(generation, SlotUpdate::Snapshot(Err(network_error())));
        agg.apply(generation, SlotUpdate::Historical(Ok(vec![])));

        // Une fois Ready : le nom des métadonnées
        assert_eq!(agg.view().unwrap().title(), "Bitcoin");
    }
}
