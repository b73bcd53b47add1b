use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use rust_decimal::Decimal;
use strum::IntoEnumIterator;

use crate::{
    app::{
        HarvestState, HoldingsView,
        format::{abbreviate, format_currency, sign_prefix, signed_abbreviation},
        harvest::SelectionState,
        table::SortKey,
    },
    models::{CapitalGainsSnapshot, GainBucket, GainTier, Holding},
};

const DISCLAIMERS: [&str; 5] = [
    "Tax-loss harvesting may not be allowed where you file taxes. Consult your tax advisor before making any decisions.",
    "Tax harvesting does not apply to derivatives or futures, which are usually treated separately as business income.",
    "Price and market value data comes from a price aggregator, not from individual exchanges, so values may differ slightly from your exchange.",
    "Some countries do not have a short-term / long-term split. There, treat everything as long-term.",
    "Only realized losses are considered for harvesting. Unrealized losses in held assets are not counted.",
];

const KEY_HINTS: &str =
    "↑/↓ move  space select  a all  c clear  1-4 sort  v view  i notes  r reload  q quit";

#[allow(clippy::too_many_arguments)]
pub fn render(
    frame: &mut Frame,
    state: &HarvestState,
    view: &HoldingsView,
    table_state: &mut TableState,
    status: &str,
    popup_message: &Option<String>,
    error_popup: &Option<String>,
    show_disclaimer: bool,
) {
    let disclaimer_height = if show_disclaimer { 12 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(disclaimer_height),
            Constraint::Length(9),
            Constraint::Min(0),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], status);
    render_disclaimer(frame, chunks[1], show_disclaimer);
    render_cards(frame, chunks[2], state);
    render_holdings(frame, chunks[3], state, view, table_state);

    if let Some(message) = popup_message {
        render_popup(frame, "Please wait", message, Color::Yellow);
    }

    if let Some(error) = error_popup {
        render_popup(frame, "Error (Enter to dismiss)", error, Color::Red);
    }
}

fn render_header(frame: &mut Frame, area: Rect, status: &str) {
    let title = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                "Tax Harvesting",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(status, Style::default().fg(Color::DarkGray)),
        ]),
        Line::styled(KEY_HINTS, Style::default().fg(Color::DarkGray)),
    ])
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(title, area);
}

fn render_disclaimer(frame: &mut Frame, area: Rect, expanded: bool) {
    let block = Block::default()
        .title("Important Notes & Disclaimers")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    let text = if expanded {
        Text::from(
            DISCLAIMERS
                .iter()
                .map(|note| Line::from(format!("• {}", note)))
                .collect::<Vec<_>>(),
        )
    } else {
        Text::from(Line::styled(
            "Press i to read before using the numbers below.",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_cards(frame: &mut Frame, area: Rect, state: &HarvestState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let summary = state.summary();
    let post = if state.selection().is_empty() {
        state.baseline()
    } else {
        state.projected()
    };

    render_card(
        frame,
        columns[0],
        "Pre Harvesting",
        state.baseline(),
        Line::from(format!(
            "Realised Capital Gains: {}",
            format_currency(Some(*summary.pre_net()), false)
        )),
        None,
        Style::default(),
    );

    render_card(
        frame,
        columns[1],
        "After Harvesting",
        post,
        Line::from(format!(
            "Effective Capital Gains: {}",
            format_currency(Some(*summary.post_net()), false)
        )),
        summary.savings().map(|savings| {
            Line::styled(
                format!(
                    "You are going to save upto {}",
                    format_currency(Some(savings), false)
                ),
                Style::default().add_modifier(Modifier::BOLD),
            )
        }),
        Style::default().fg(Color::White).bg(Color::Blue),
    );
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    snapshot: &CapitalGainsSnapshot,
    total: Line<'static>,
    savings: Option<Line<'static>>,
    style: Style,
) {
    let block = Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .style(style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(GainTier::iter().map(|tier| right(tier.to_string())))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = vec![
        gain_row("Profits", snapshot, |bucket| *bucket.profits()),
        gain_row("Losses", snapshot, |bucket| *bucket.losses()),
        gain_row("Net Capital Gains", snapshot, GainBucket::net)
            .style(Style::default().add_modifier(Modifier::BOLD)),
    ];

    let widths = [
        Constraint::Length(18),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];
    let table = Table::new(rows, widths).header(header);
    frame.render_widget(table, parts[0]);

    frame.render_widget(
        Paragraph::new(total.style(Style::default().add_modifier(Modifier::BOLD))),
        parts[2],
    );

    if let Some(savings) = savings {
        frame.render_widget(Paragraph::new(savings), parts[3]);
    }
}

fn gain_row(
    label: &'static str,
    snapshot: &CapitalGainsSnapshot,
    value: impl Fn(&GainBucket) -> Decimal,
) -> Row<'static> {
    Row::new(
        std::iter::once(Cell::from(label)).chain(
            GainTier::iter()
                .map(|tier| right(format_currency(Some(value(snapshot.bucket(tier))), false))),
        ),
    )
}

fn render_holdings(
    frame: &mut Frame,
    area: Rect,
    state: &HarvestState,
    view: &HoldingsView,
    table_state: &mut TableState,
) {
    let holdings = state.holdings();

    if holdings.is_empty() {
        let empty_message = Paragraph::new("No holdings to display. Press r to reload.")
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().title("Holdings").borders(Borders::ALL));
        frame.render_widget(empty_message, area);
        return;
    }

    let header_checkbox = match state.selection_state() {
        SelectionState::All => "[x]",
        SelectionState::Partial => "[-]",
        SelectionState::None => "[ ]",
    };

    let header_cells = std::iter::once(format!("{} Asset", header_checkbox))
        .chain(
            SortKey::iter()
                .enumerate()
                .map(|(i, key)| format!("{} {} {}", i + 1, key, view.sort_arrow(key))),
        )
        .chain(std::iter::once(String::from("Amount to sell")))
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).style(Style::default()).height(1);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let visible = view.visible(holdings);
    let highlighted = table_state.selected().and_then(|i| visible.get(i).copied());

    let dim = Style::default().fg(Color::DarkGray);
    let rows = visible.iter().map(|holding| {
        let selected = state.is_selected(holding.id());
        let ticker = holding.ticker();

        let asset = Text::from(vec![
            Line::from(format!("{} {}", checkbox(selected), ticker)),
            Line::styled(format!("    {}", holding.name()), dim),
        ]);
        let quantity = Text::from(vec![
            Line::from(format!(
                "{} {}",
                abbreviate(Some(*holding.total_quantity())),
                ticker
            )),
            Line::styled(
                format!("$ {}/{}", abbreviate(Some(*holding.average_cost())), ticker),
                dim,
            ),
        ]);
        let price = format!("$ {}", abbreviate(Some(*holding.current_price())));
        let amount_to_sell = if selected {
            abbreviate(Some(*holding.total_quantity()))
        } else {
            String::from("0.0000")
        };

        let cells = [
            Cell::from(asset),
            Cell::from(quantity),
            Cell::from(price),
            tier_cell(holding, GainTier::ShortTerm),
            tier_cell(holding, GainTier::LongTerm),
            Cell::from(format!("{} {}", amount_to_sell, ticker)),
        ];

        Row::new(cells).height(2)
    });

    let widths = [
        Constraint::Length(30),
        Constraint::Length(22),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(18),
    ];

    let mut block = Block::default()
        .title(format!(
            "Holdings ({} of {} selected)",
            state.selection().len(),
            holdings.len()
        ))
        .borders(Borders::ALL);
    if view.is_expandable(holdings.len()) {
        let hint = if *view.show_all() {
            String::from("v: View less")
        } else {
            format!("v: View all ({})", holdings.len())
        };
        block = block.title_bottom(Line::from(hint));
    }

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, parts[0], table_state);
    frame.render_widget(Paragraph::new(detail_line(highlighted)).style(dim), parts[1]);
}

fn detail_line(holding: Option<&Holding>) -> Line<'static> {
    let Some(holding) = holding else {
        return Line::from(" Highlight a row with ↑/↓ for details");
    };

    Line::from(format!(
        " {} ({})  Value: {}  Logo: {}",
        holding.name(),
        holding.ticker(),
        format_currency(Some(holding.market_value()), false),
        holding.logo_url().as_deref().unwrap_or("-")
    ))
}

fn tier_cell(holding: &Holding, tier: GainTier) -> Cell<'static> {
    match holding.tier(tier) {
        Some(tier_gain) => {
            let gain = *tier_gain.gain();
            let color = if gain < Decimal::ZERO {
                Color::Red
            } else if gain > Decimal::ZERO {
                Color::Green
            } else {
                Color::Reset
            };

            Cell::from(Text::from(vec![
                Line::from(format!("$ {}", signed_abbreviation(gain))),
                Line::from(format!(
                    "{}{} {}",
                    sign_prefix(gain),
                    abbreviate(Some(tier_gain.balance().abs())),
                    holding.ticker()
                )),
            ]))
            .style(Style::default().fg(color))
        }
        None => Cell::from("-"),
    }
}

fn checkbox(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

fn right(text: String) -> Cell<'static> {
    Cell::from(Line::from(text).alignment(Alignment::Right))
}

fn render_popup(frame: &mut Frame, title: &str, message: &str, color: Color) {
    let popup_area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(message.to_string())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .style(Style::default().fg(color)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
