// ============================================================================
// Chart - Rendu du graphique de prix sur 14 jours
// ============================================================================
// Affiche un graphique ligne construit depuis une ChartSeries déjà
// normalisée : le widget est un pur renderer, il ne retravaille pas la
// série (pas de tri, pas d'interpolation)
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::ChartSeries;

/// Dessine le graphique ligne pour la série donnée
///
/// Une série vide (coin trop récent ou fetch historique en échec) affiche
/// un placeholder : c'est un état valide, pas une erreur.
pub fn render_price_chart(frame: &mut Frame, series: &ChartSeries, positive: bool, area: Rect) {
    if series.is_empty() {
        render_empty_chart(frame, area);
        return;
    }

    // Convertit la série en points (x, y) pour ratatui
    let points: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, &close)| (i as f64, close))
        .collect();

    // Bornes Y avec une marge de 5% pour que le graphique respire
    let (min_price, max_price) = series.value_bounds().unwrap_or((0.0, 1.0));
    let margin = (max_price - min_price) * 0.05;
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;

    let color = if positive { Color::Green } else { Color::Red };

    let datasets = vec![Dataset::default()
        .name("Close")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    // Labels X : première et dernière date de clôture de la série
    let first_label = series
        .timestamps
        .first()
        .map(|t| t.format("%d/%m").to_string())
        .unwrap_or_default();
    let last_label = series
        .timestamps
        .last()
        .map(|t| t.format("%d/%m").to_string())
        .unwrap_or_default();

    let x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len().saturating_sub(1)) as f64])
        .labels(vec![
            Span::raw(first_label),
            Span::raw(""),
            Span::raw(last_label),
        ]);

    let y_axis = Axis::default()
        .title("Prix ($)")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_price(y_min)),
            Span::raw(format_price((y_min + y_max) / 2.0)),
            Span::raw(format_price(y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" CHART (past 2 weeks) "),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Formatte un prix pour les labels d'axe
///
/// Les gros prix perdent leurs décimales, les petits coins les gardent
/// (un label "$0" pour un coin à 0.0042$ ne sert à rien).
fn format_price(value: f64) -> String {
    if value >= 100.0 {
        format!("${:.0}", value)
    } else if value >= 1.0 {
        format!("${:.2}", value)
    } else {
        format!("${:.4}", value)
    }
}

/// Affiche un placeholder quand la série est vide
fn render_empty_chart(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" CHART (past 2 weeks) ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Pas de données historiques",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_large() {
        assert_eq!(format_price(43250.77), "$43251");
    }

    #[test]
    fn test_format_price_medium() {
        assert_eq!(format_price(43.257), "$43.26");
    }

    #[test]
    fn test_format_price_small() {
        assert_eq!(format_price(0.0042), "$0.0042");
    }
}
