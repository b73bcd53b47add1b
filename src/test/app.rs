#[cfg(test)]
mod tests {
    use std::{io::Write, path::PathBuf};

    use crossterm::event::KeyCode;
    use tempfile::NamedTempFile;

    use crate::{
        api::DataSource,
        app::{App, Flow, SelectionState, SortDirection, SortKey},
        models::HoldingId,
    };

    async fn bundled_app() -> App {
        let mut app = App::new(DataSource::Bundled);
        app.load().await;
        app
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            assert_eq!(app.handle_key(*key), Flow::Continue);
        }
    }

    #[tokio::test]
    async fn loads_bundled_sample() {
        let app = bundled_app().await;

        assert_eq!(app.state().holdings().len(), 8);
        assert!(app.loaded_at().is_some());
        assert!(app.error_popup().is_none());
        assert!(app.status_line().contains("bundled sample"));
        assert_eq!(app.state().projected(), app.state().baseline());
    }

    #[tokio::test]
    async fn space_toggles_highlighted_row() {
        let mut app = bundled_app().await;

        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.state().selection().is_empty());

        press(&mut app, &[KeyCode::Down, KeyCode::Char(' ')]);
        assert!(app.state().is_selected(&HoldingId::from("USDC")));
        assert_eq!(app.state().selection_state(), SelectionState::Partial);

        press(&mut app, &[KeyCode::Char(' ')]);
        assert!(app.state().selection().is_empty());
    }

    #[tokio::test]
    async fn select_all_then_clear() {
        let mut app = bundled_app().await;

        press(&mut app, &[KeyCode::Char('a')]);
        assert_eq!(app.state().selection_state(), SelectionState::All);
        assert_ne!(app.state().projected(), app.state().baseline());

        press(&mut app, &[KeyCode::Char('a')]);
        assert_eq!(app.state().selection_state(), SelectionState::None);

        press(&mut app, &[KeyCode::Char('a'), KeyCode::Char('c')]);
        assert_eq!(app.state().projected(), app.state().baseline());
    }

    #[tokio::test]
    async fn cursor_wraps_within_visible_rows() {
        let mut app = bundled_app().await;

        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.table_state().selected(), Some(0));

        press(&mut app, &[KeyCode::Up]);
        assert_eq!(app.table_state().selected(), Some(3));

        press(&mut app, &[KeyCode::Down]);
        assert_eq!(app.table_state().selected(), Some(0));

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.table_state().selected(), None);
    }

    #[tokio::test]
    async fn view_all_expands_and_collapse_clamps_cursor() {
        let mut app = bundled_app().await;

        press(&mut app, &[KeyCode::Char('v')]);
        assert!(*app.view().show_all());

        press(&mut app, &[KeyCode::Up, KeyCode::Up]);
        assert_eq!(app.table_state().selected(), Some(7));

        press(&mut app, &[KeyCode::Char('v')]);
        assert!(!*app.view().show_all());
        assert_eq!(app.table_state().selected(), Some(3));
    }

    #[tokio::test]
    async fn digits_sort_columns() {
        let mut app = bundled_app().await;

        press(&mut app, &[KeyCode::Char('2')]);
        assert_eq!(
            *app.view().sort(),
            Some((SortKey::CurrentPrice, SortDirection::Asc))
        );

        press(&mut app, &[KeyCode::Char('2')]);
        assert_eq!(
            *app.view().sort(),
            Some((SortKey::CurrentPrice, SortDirection::Desc))
        );

        press(&mut app, &[KeyCode::Char('4')]);
        assert_eq!(
            *app.view().sort(),
            Some((SortKey::LongTerm, SortDirection::Asc))
        );
    }

    #[tokio::test]
    async fn quit_reload_and_disclaimer() {
        let mut app = bundled_app().await;

        assert_eq!(app.handle_key(KeyCode::Char('q')), Flow::Quit);
        assert_eq!(app.handle_key(KeyCode::Char('r')), Flow::Reload);

        press(&mut app, &[KeyCode::Char('i')]);
        assert!(*app.show_disclaimer());
        press(&mut app, &[KeyCode::Char('i')]);
        assert!(!*app.show_disclaimer());
    }

    #[tokio::test]
    async fn failed_load_shows_error_until_dismissed() {
        let mut app = App::new(DataSource::Files {
            capital_gains: PathBuf::from("/nonexistent/capital_gains.json"),
            holdings: PathBuf::from("/nonexistent/holdings.json"),
        });
        app.load().await;

        let message = app.error_popup().clone().unwrap();
        assert!(message.starts_with("Error loading data"));
        assert!(app.state().holdings().is_empty());
        assert!(app.loaded_at().is_none());

        press(&mut app, &[KeyCode::Char('a'), KeyCode::Char('v')]);
        assert!(app.error_popup().is_some());
        assert!(!*app.view().show_all());

        press(&mut app, &[KeyCode::Enter]);
        assert!(app.error_popup().is_none());
    }

    #[tokio::test]
    async fn reload_key_retries_from_error_popup() {
        let mut app = App::new(DataSource::Files {
            capital_gains: PathBuf::from("/nonexistent/capital_gains.json"),
            holdings: PathBuf::from("/nonexistent/holdings.json"),
        });
        app.load().await;
        assert!(app.error_popup().is_some());

        assert_eq!(app.handle_key(KeyCode::Char('r')), Flow::Reload);
        assert!(app.error_popup().is_none());

        app.load().await;
        assert!(app.error_popup().is_some());
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_data() {
        let mut gains = NamedTempFile::new().unwrap();
        gains
            .write_all(br#"{ "stcg": { "profits": 100, "losses": 20 } }"#)
            .unwrap();
        let mut holdings = NamedTempFile::new().unwrap();
        holdings
            .write_all(br#"[{ "coin": "BTC", "stcg": { "gain": -30 } }]"#)
            .unwrap();

        let mut app = App::new(DataSource::Files {
            capital_gains: gains.path().to_path_buf(),
            holdings: holdings.path().to_path_buf(),
        });
        app.load().await;
        press(&mut app, &[KeyCode::Char('a')]);
        let before = app.state().clone();

        holdings.close().unwrap();
        app.load().await;

        assert!(app.error_popup().is_some());
        assert_eq!(app.state(), &before);
    }
}
