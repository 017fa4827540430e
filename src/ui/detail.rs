// ============================================================================
// Detail - Rendu de la page détail d'un coin
// ============================================================================
// Dessine la vue détail depuis le view-model CoinDetail : titre, lignes
// d'aperçu (rang / symbole / prix), description, offre, graphique 14 jours
// et liste des liens externes — la même page que la route Coin de la
// version web d'origine
//
// La couche présentation ne connaît que le view-model : tant qu'il est
// Pending elle affiche "Loading..." (avec le nom transmis par la
// navigation comme titre), et elle rend les champs absents en les
// omettant, sans traitement d'erreur
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::detail::CoinDetail;
use crate::ui::chart;

/// Dessine l'écran détail complet
pub fn render_detail(frame: &mut Frame, app: &App) {
    let Some(view) = app.detail_view() else {
        // Pas de vue active : ne devrait pas arriver sur cet écran
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Titre
            Constraint::Length(4),  // Aperçu (rank / symbol / price / supply)
            Constraint::Length(4),  // Description
            Constraint::Min(8),     // Graphique
            Constraint::Length(6),  // Liens
            Constraint::Length(3),  // Footer
        ])
        .split(frame.size())
        .to_vec();

    render_title(frame, view, chunks[0]);

    if view.is_ready() {
        render_overview(frame, view, chunks[1]);
        render_description(frame, view, chunks[2]);

        let positive = view
            .snapshot
            .as_ref()
            .map(|s| s.is_positive())
            .unwrap_or(true);
        chart::render_price_chart(frame, &view.chart, positive, chunks[3]);

        render_links(frame, view, chunks[4]);
    } else {
        render_loading(frame, chunks[3]);
    }

    render_footer(frame, app, chunks[5]);
}

/// Dessine le titre : hint de navigation, puis nom des métadonnées
fn render_title(frame: &mut Frame, view: &CoinDetail, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = vec![Line::from(Span::styled(
        view.title().to_string(),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine les lignes d'aperçu : Rank / Symbol / Price puis Supply
///
/// Chaque champ absent est simplement omis (remplacé par "—") : un fetch
/// raté ne produit pas d'écran d'erreur
fn render_overview(frame: &mut Frame, view: &CoinDetail, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Overview ");

    let rank = view
        .metadata
        .as_ref()
        .map(|m| m.rank.to_string())
        .unwrap_or_else(|| "—".to_string());

    let symbol = view
        .metadata
        .as_ref()
        .map(|m| m.symbol.clone())
        .unwrap_or_else(|| "—".to_string());

    let price = view
        .snapshot
        .as_ref()
        .map(|s| format!("${:.2}", s.price_usd()))
        .unwrap_or_else(|| "—".to_string());

    let total_supply = view
        .snapshot
        .as_ref()
        .and_then(|s| s.total_supply)
        .map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| "—".to_string());

    let max_supply = view
        .snapshot
        .as_ref()
        .and_then(|s| s.max_supply)
        .map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| "—".to_string());

    let text = vec![
        Line::from(vec![
            Span::styled("Rank: ", Style::default().fg(Color::Gray)),
            Span::raw(rank),
            Span::raw("   "),
            Span::styled("Symbol: ", Style::default().fg(Color::Gray)),
            Span::raw(symbol),
            Span::raw("   "),
            Span::styled("Price: ", Style::default().fg(Color::Gray)),
            Span::styled(price, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Total Supply: ", Style::default().fg(Color::Gray)),
            Span::raw(total_supply),
            Span::raw("   "),
            Span::styled("Max Supply: ", Style::default().fg(Color::Gray)),
            Span::raw(max_supply),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine la description du coin
fn render_description(frame: &mut Frame, view: &CoinDetail, area: Rect) {
    let description = view
        .metadata
        .as_ref()
        .and_then(|m| m.description.clone())
        .unwrap_or_else(|| "Pas de description".to_string());

    let paragraph = Paragraph::new(description)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Dessine la liste plate des liens externes (url + type)
fn render_links(frame: &mut Frame, view: &CoinDetail, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Links ");

    let links = view
        .metadata
        .as_ref()
        .map(|m| m.links())
        .unwrap_or_default();

    if links.is_empty() {
        let paragraph = Paragraph::new(Span::styled(
            "Aucun lien",
            Style::default().fg(Color::Gray),
        ))
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = links
        .iter()
        .map(|link| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10}", link.link_type),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(link.url.clone(), Style::default().fg(Color::Blue)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Affiche l'indicateur de chargement tant que la vue est Pending
fn render_loading(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le footer avec les instructions
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = if app.is_awaiting_quit_confirmation() {
        vec![Line::from(Span::styled(
            "Presser 'q' à nouveau pour quitter",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))]
    } else {
        vec![Line::from(vec![
            Span::styled("ESC", Style::default().fg(Color::Yellow)),
            Span::raw(" Retour  "),
            Span::styled("r", Style::default().fg(Color::Yellow)),
            Span::raw(" Recharger  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" Quitter"),
        ])]
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
