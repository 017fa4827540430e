// ============================================================================
// Listing - Rendu de la liste des coins
// ============================================================================
// Dessine l'écran principal : les 100 premiers coins par rang, avec
// navigation au clavier, équivalent de la page d'accueil de la version web
//
// CONCEPTS RATATUI :
// 1. Layout : découpage de l'écran en header / contenu / footer
// 2. List widget : liste avec surbrillance de l'item sélectionné
// 3. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;

/// Dessine l'écran liste complet
pub fn render_listing(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, chunks[0]);
    render_coin_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

/// Dessine le header avec le titre
fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyCoin ")
        .title_alignment(Alignment::Center);

    let text = vec![Line::from(Span::styled(
        "📀 CryptoCoins Data 📀",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine la liste des coins avec surbrillance
fn render_coin_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Top {} coins ", app.coins.len().max(1)));

    // Liste vide : soit en cours de chargement, soit en erreur
    if app.coins.is_empty() {
        let message = if app.is_loading_data() {
            app.loading_message
                .clone()
                .unwrap_or_else(|| "Loading...".to_string())
        } else if let Some(error) = &app.error_message {
            format!("Erreur : {}", error)
        } else {
            "Aucun coin".to_string()
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    // Construit les items de la liste
    let items: Vec<ListItem> = app
        .coins
        .iter()
        .map(|coin| {
            let style = if coin.is_active {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            ListItem::new(Line::from(Span::styled(coin.display(), style)))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    // ListState permet à ratatui de scroller automatiquement vers la
    // sélection quand la liste dépasse la hauteur de l'écran
    let mut state = ListState::default();
    state.select(Some(app.selected_index));

    frame.render_stateful_widget(list, area, &mut state);
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
            Span::styled("↑↓/jk", Style::default().fg(Color::Yellow)),
            Span::raw(" Naviguer  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" Détail  "),
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
