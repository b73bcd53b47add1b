#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend, widgets::TableState};
    use serde_json::json;

    use crate::{
        app::{HarvestState, HoldingsView, ui::render},
        models::HoldingId,
        test::{holdings_from, scenario},
    };

    fn draw(state: &HarvestState, error: Option<String>, highlight: Option<usize>) -> String {
        let backend = TestBackend::new(160, 60);
        let mut terminal = Terminal::new(backend).unwrap();
        let view = HoldingsView::new();
        let mut table_state = TableState::default().with_selected(highlight);

        terminal
            .draw(|frame| {
                render(
                    frame,
                    state,
                    &view,
                    &mut table_state,
                    "Source: test",
                    &None,
                    &error,
                    false,
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn scenario_state() -> HarvestState {
        let (gains, holdings) = scenario();
        let mut state = HarvestState::new();
        state.load_baseline(gains);
        state.load_holdings(holdings);
        state
    }

    #[test]
    fn cards_show_pre_and_post_harvest() {
        let mut state = scenario_state();
        let screen = draw(&state, None, None);

        assert!(screen.contains("Pre Harvesting"));
        assert!(screen.contains("After Harvesting"));
        assert!(screen.contains("Realised Capital Gains: $ 120"));
        assert!(!screen.contains("You are going to save"));
        assert!(screen.contains("Holdings (0 of 2 selected)"));

        state.toggle_selection(HoldingId::from("A"));
        state.toggle_selection(HoldingId::from("B"));
        let screen = draw(&state, None, None);

        assert!(screen.contains("Effective Capital Gains: $ 105"));
        assert!(screen.contains("You are going to save upto $ 15"));
        assert!(screen.contains("Holdings (2 of 2 selected)"));
    }

    #[test]
    fn empty_holdings_and_errors() {
        let screen = draw(
            &HarvestState::new(),
            Some(String::from("Error loading data: boom")),
            None,
        );

        assert!(screen.contains("No holdings to display"));
        assert!(screen.contains("Error loading data: boom"));
    }

    #[test]
    fn highlighted_row_shows_details() {
        let mut state = HarvestState::new();
        state.load_holdings(holdings_from(json!([
            { "coin": "BTC", "coinName": "Bitcoin", "totalHolding": 2, "currentPrice": 3000,
              "logo": "https://img.example/btc.png" },
            { "coin": "ETH" }
        ])));

        let screen = draw(&state, None, None);
        assert!(screen.contains("Highlight a row"));
        assert!(!screen.contains("btc.png"));

        let screen = draw(&state, None, Some(0));
        assert!(
            screen.contains("Bitcoin (BTC)  Value: $ 6,000  Logo: https://img.example/btc.png")
        );

        let screen = draw(&state, None, Some(1));
        assert!(screen.contains("ETH (ETH)  Value: $ 0  Logo: -"));
    }
}
