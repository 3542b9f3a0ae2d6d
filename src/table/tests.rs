//! Tests for the table component.

use super::*;
use crate::column::ColumnDescriptor;
use crate::error::ExportError;
use crate::search::SearchToken;
use crate::sort::SortDirection;
use crate::storage::MemoryStore;
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use crossterm::event::{KeyCode, KeyModifiers};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

fn columns() -> Vec<ColumnDescriptor> {
    vec![
        ColumnDescriptor::new("name", "Name"),
        ColumnDescriptor::new("age", "Age"),
        ColumnDescriptor::new("city", "City"),
    ]
}

fn people(n: usize) -> Vec<Value> {
    (1..=n)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("person {i:02}"),
                "age": 20 + (i % 7),
                "city": if i % 2 == 0 { "Oslo" } else { "Lima" },
            })
        })
        .collect()
}

fn table(n: usize) -> Model<Value> {
    Model::with_config(
        columns(),
        people(n),
        TableConfig::new()
            .with_pagination(true)
            .with_page_size(10)
            .with_selectable(true),
    )
}

fn press(code: KeyCode) -> Msg {
    Box::new(KeyMsg {
        key: code,
        modifiers: KeyModifiers::NONE,
    })
}

fn char_key(c: char) -> Msg {
    press(KeyCode::Char(c))
}

/// Delivers the debounce tick the table is currently waiting for.
fn settle(model: &mut Model<Value>) -> Option<bubbletea_rs::Cmd> {
    let msg = model
        .debouncer
        .pending_msg()
        .expect("a search term should be pending");
    model.update(Box::new(msg))
}

fn ids(rows: &[Value]) -> Vec<String> {
    rows.iter().map(|r| r["id"].to_string()).collect()
}

fn plain_view(model: &Model<Value>) -> String {
    strip_ansi_escapes::strip_str(model.view())
}

type Calls = Arc<Mutex<Vec<(String, SearchToken)>>>;

fn server_table(calls: &Calls) -> Model<Value> {
    let calls = Arc::clone(calls);
    Model::with_config(columns(), people(5), TableConfig::new()).with_search_handler(
        move |term, token| {
            calls.lock().unwrap().push((term.to_string(), token));
            None
        },
    )
}

/// Answers every request with the people living in the city named by the term.
fn city_search(term: &str, token: SearchToken) -> Option<Cmd> {
    let rows: Vec<Value> = people(5)
        .into_iter()
        .filter(|r| r["city"].as_str().is_some_and(|c| c.eq_ignore_ascii_case(term)))
        .collect();
    let cmd: Cmd = Box::pin(async move { Some(Box::new(SearchResultsMsg { token, rows }) as Msg) });
    Some(cmd)
}

#[test]
fn test_pipeline_sorts_filters_and_paginates() {
    let mut model = table(25);
    assert_eq!(model.total_pages(), 3);
    assert_eq!(model.page_rows().len(), 10);

    let _ = model.set_search_input("oslo");
    assert_eq!(model.search_term(), "", "term applies only once input settles");
    settle(&mut model);
    assert_eq!(model.search_term(), "oslo");
    assert_eq!(model.filtered_rows().len(), 12);
    assert_eq!(model.total_pages(), 2);

    model.handle_sort("age");
    let ages: Vec<i64> = model
        .filtered_rows()
        .iter()
        .map(|r| r["age"].as_i64().unwrap())
        .collect();
    assert!(ages.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(model.filtered_rows().len(), 12);
}

#[test]
fn test_mixed_column_sorts_numbers_before_text() {
    let rows = vec![
        json!({"id": 1, "age": "10"}),
        json!({"id": 2, "age": 9}),
        json!({"id": 3, "age": "b"}),
    ];
    let mut model = Model::new(columns(), rows);
    model.handle_sort("age");
    assert_eq!(ids(model.filtered_rows()), vec!["2", "1", "3"]);
    model.handle_sort("age");
    assert_eq!(ids(model.filtered_rows()), vec!["3", "1", "2"]);
}

#[test]
fn test_new_result_set_resets_sort() {
    let mut model = table(25);
    model.handle_sort("age");
    model.set_search_term("oslo");
    assert!(model.state().sort_state().is_none());
    assert_eq!(model.filtered_rows()[0]["id"], 2);

    model.handle_sort("age");
    model.set_search_term("oslo");
    assert_eq!(
        model.state().sort_state().direction_for("age"),
        Some(SortDirection::Asc),
        "re-applying the same term keeps the sort"
    );

    let _ = model.set_search_input("lima");
    settle(&mut model);
    assert!(model.state().sort_state().is_none());

    model.handle_sort("name");
    model.set_api_search_results(people(3));
    assert!(model.state().sort_state().is_none());

    model.handle_sort("name");
    model.clear_api_search_results();
    assert!(model.state().sort_state().is_none());

    model.handle_sort("name");
    model.clear_search();
    assert!(model.state().sort_state().is_none());

    model.handle_sort("name");
    model.set_data(people(10));
    assert_eq!(
        model.state().sort_state().direction_for("name"),
        Some(SortDirection::Asc),
        "reloading the same result set keeps the sort"
    );
}

#[test]
fn test_shrinking_data_clamps_page() {
    let mut model = table(25);
    model.go_to_page(3);
    assert_eq!(model.page(), 3);
    assert_eq!(model.page_rows().len(), 5);

    model.set_data(people(5));
    assert_eq!(model.page(), 1);
    assert_eq!(model.page_rows().len(), 5);
}

#[test]
fn test_search_change_returns_to_first_page() {
    let mut model = table(25);
    model.go_to_page(2);
    let _ = model.set_search_input("person");
    assert_eq!(model.page(), 1);
}

#[test]
fn test_debounce_applies_only_last_term() {
    let mut model = table(25);
    let _ = model.set_search_input("o");
    let first = model.debouncer.pending_msg().unwrap();
    let _ = model.set_search_input("os");
    let _ = model.set_search_input("osl");

    assert!(model.update(Box::new(first)).is_none());
    assert_eq!(model.search_term(), "");

    settle(&mut model);
    assert_eq!(model.search_term(), "osl");
    assert!(!model.debouncer.is_pending());
}

#[test]
fn test_selection_survives_paging() {
    let mut model = table(25);
    assert!(model.toggle_row_selection("1"));

    model.go_to_page(2);
    model.select_all(true);
    assert_eq!(model.selection().len(), 11);
    assert!(model.is_all_selected());

    model.go_to_page(1);
    assert!(model.is_indeterminate());
    assert!(model.selection().is_selected("1"));
    assert!(model.selection().is_selected("15"));

    model.select_all(false);
    assert!(model.selection().is_empty());
}

#[test]
fn test_disabled_rows_are_never_selected() {
    let mut model = table(25).with_disabled_rows(|r| r["id"] == 2);
    assert!(!model.toggle_row_selection("2"));

    model.select_all(true);
    assert_eq!(model.selection().len(), 9);
    assert!(!model.selection().is_selected("2"));
    assert!(model.is_all_selected());
}

#[test]
fn test_selection_requires_selectable_table() {
    let mut model = Model::new(columns(), people(3));
    assert!(!model.toggle_row_selection("1"));
    model.select_all(true);
    assert!(model.selection().is_empty());
}

#[test]
fn test_search_change_drops_select_all_matching() {
    let mut model = table(25);
    model.toggle_row_selection("1");
    let all: Vec<String> = (1..=25).map(|i| i.to_string()).collect();
    model.select_all_matching(&all);
    assert_eq!(model.selection().len(), 25);

    model.set_search_term("lima");
    assert_eq!(model.selection().len(), 1);
    assert!(model.selection().is_selected("1"));
}

#[test]
fn test_select_all_key_uses_all_matching_ids() {
    let all: Vec<String> = (1..=25).map(|i| i.to_string()).collect();
    let mut model = table(25).with_all_matching_ids(all);
    model.focus();

    model.update(char_key('a'));
    assert_eq!(model.selection().len(), 25);
    assert!(model.selection().is_selected("25"));

    model.update(char_key('a'));
    assert!(model.selection().is_empty());

    model.update(char_key('a'));
    model.set_search_term("lima");
    assert!(model.selection().is_empty(), "captured ids belong to the old search");
    assert!(model.all_matching_ids().is_none());

    model.update(char_key('a'));
    assert_eq!(model.selection().len(), 10, "falls back to the current page");

    let lima: Vec<String> = (1..=25).step_by(2).map(|i| i.to_string()).collect();
    model.clear_selection();
    model.set_all_matching_ids(Some(lima));
    model.update(char_key('a'));
    assert_eq!(model.selection().len(), 13);
}

#[test]
fn test_server_search_uses_longer_window() {
    let calls = Calls::default();
    let mut model = server_table(&calls);
    let _ = model.set_search_input("li");
    assert_eq!(model.debouncer.window(), DEFAULT_SERVER_DEBOUNCE);
    assert!(calls.lock().unwrap().is_empty());

    settle(&mut model);
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "li");
    assert!(model.is_searching());
}

#[test]
fn test_server_search_discards_stale_results() {
    let calls = Calls::default();
    let mut model = server_table(&calls);

    let _ = model.set_search_input("li");
    settle(&mut model);
    let _ = model.set_search_input("lim");
    settle(&mut model);
    let (first, second) = {
        let calls = calls.lock().unwrap();
        (calls[0].1, calls[1].1)
    };

    model.update(Box::new(SearchResultsMsg {
        token: first,
        rows: people(1),
    }));
    assert_eq!(model.filtered_rows().len(), 5, "stale results are ignored");
    assert!(model.is_searching());

    let hits: Vec<Value> = people(5).into_iter().filter(|r| r["city"] == "Lima").collect();
    model.update(Box::new(SearchResultsMsg {
        token: second,
        rows: hits,
    }));
    assert_eq!(ids(model.filtered_rows()), vec!["1", "3", "5"]);
    assert!(!model.is_searching());
}

#[test]
fn test_server_search_burst_sends_only_final_term() {
    let calls = Calls::default();
    let mut model = server_table(&calls);

    let _ = model.set_search_input("a");
    let first = model.debouncer.pending_msg().unwrap();
    let _ = model.set_search_input("ab");
    let second = model.debouncer.pending_msg().unwrap();
    let _ = model.set_search_input("abc");

    assert!(model.update(Box::new(first)).is_none());
    assert!(model.update(Box::new(second)).is_none());
    assert!(calls.lock().unwrap().is_empty());

    settle(&mut model);
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "abc");
}

#[tokio::test]
async fn test_initial_term_reaches_search_handler() {
    let mut model = Model::with_config(columns(), people(5), TableConfig::new())
        .with_search_handler(city_search)
        .with_search_term("lima");
    assert!(model.is_searching());
    assert!(model.search_token().is_some());

    let cmd = model.init().expect("initial request");
    assert!(model.init().is_none());
    let msg = cmd.await.expect("handler answers");
    model.update(msg);

    assert!(!model.is_searching());
    assert!(model.search_token().is_none());
    assert_eq!(ids(model.filtered_rows()), vec!["1", "3", "5"]);
}

#[tokio::test]
async fn test_term_set_before_handler_is_forwarded_on_focus() {
    let mut model = Model::with_config(columns(), people(5), TableConfig::new())
        .with_search_term("oslo")
        .with_search_handler(city_search);
    assert_eq!(model.search_term(), "oslo");
    assert!(model.is_searching());

    let cmd = model.focus().expect("initial request");
    let msg = cmd.await.expect("handler answers");
    model.update(msg);
    assert!(!model.is_searching());
    assert_eq!(ids(model.filtered_rows()), vec!["2", "4"]);
    assert!(model.focus().is_none());
}

#[test]
fn test_server_search_skips_duplicate_terms() {
    let calls = Calls::default();
    let mut model = server_table(&calls);
    model.set_search_term("lima");
    model.set_search_term("lima");
    assert_eq!(calls.lock().unwrap().len(), 1);
}

#[test]
fn test_sort_during_server_search_reissues_request() {
    let calls = Calls::default();
    let mut model = server_table(&calls);
    model.set_search_term("lima");
    model.handle_sort("name");

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].0, "lima");
    assert!(calls[1].1 > calls[0].1);
}

#[test]
fn test_clear_search_notifies_handler() {
    let calls = Calls::default();
    let mut model = server_table(&calls);
    model.set_search_term("lima");
    let token = calls.lock().unwrap()[0].1;

    model.clear_search();
    assert_eq!(model.search_term(), "");
    assert_eq!(model.search_input(), "");
    assert!(!model.is_searching());
    assert_eq!(calls.lock().unwrap().last().unwrap().0, "");
    assert!(!model.accept_search_results(token, people(1)));
}

#[test]
fn test_api_results_override_filtering() {
    let mut model = table(25);
    model.set_search_term("oslo");
    model.set_api_search_results(people(25).into_iter().skip(20).collect());
    assert_eq!(ids(model.filtered_rows()), vec!["21", "22", "23", "24", "25"]);

    model.clear_api_search_results();
    assert_eq!(model.filtered_rows().len(), 12);

    model.set_api_search_results(people(2));
    model.clear_search();
    assert_eq!(model.filtered_rows().len(), 25);
}

#[test]
fn test_bulk_action_receives_selected_rows() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut model = table(25).with_bulk_action(BulkAction::new("archive", move |rows: &[Value]| {
        sink.lock().unwrap().extend(ids(rows));
    }));

    assert!(!model.run_bulk_action(0), "nothing selected");
    model.toggle_row_selection("3");
    model.toggle_row_selection("1");
    assert!(model.run_bulk_action(0));
    assert!(!model.run_bulk_action(4));
    assert_eq!(*seen.lock().unwrap(), vec!["1", "3"]);
    assert_eq!(model.bulk_action_labels(), vec!["archive"]);
}

#[test]
fn test_export_writes_csv_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = Model::with_config(
        columns(),
        people(3),
        TableConfig::new().with_export(dir.path(), "people"),
    );
    model.toggle_column_visibility("age");

    let outcome = model.export().unwrap();
    let path = dir.path().join("people.csv");
    assert_eq!(outcome, ExportOutcome::Written(path.clone()));
    let text = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        text,
        "Name,City\nperson 01,Lima\nperson 02,Oslo\nperson 03,Lima\n"
    );
}

#[test]
fn test_export_refusals() {
    let model = Model::new(columns(), people(3));
    assert!(matches!(model.export(), Err(ExportError::Disabled)));

    let dir = tempfile::tempdir().unwrap();
    let model = Model::with_config(
        columns(),
        Vec::<Value>::new(),
        TableConfig::new().with_export(dir.path(), "empty"),
    );
    assert!(matches!(model.export(), Err(ExportError::NoData)));
    assert!(!dir.path().join("empty.csv").exists());
}

#[test]
fn test_custom_exporter() {
    let exported = Arc::new(Mutex::new((0, Vec::new())));
    let sink = Arc::clone(&exported);
    let mut model = table(25).with_exporter(move |rows, columns| {
        let mut guard = sink.lock().unwrap();
        guard.0 = rows.len();
        guard.1 = columns.iter().map(|c| c.key.clone()).collect();
        Ok(())
    });
    model.set_search_term("oslo");

    assert_eq!(model.export().unwrap(), ExportOutcome::Custom);
    let guard = exported.lock().unwrap();
    assert_eq!(guard.0, 12);
    assert_eq!(guard.1, vec!["name", "age", "city"]);
}

#[test]
fn test_keys_ignored_without_focus() {
    let mut model = table(5);
    model.update(char_key('s'));
    assert!(model.state().sort_state().is_none());

    model.focus();
    model.update(char_key('s'));
    assert_eq!(
        model.state().sort_state().direction_for("name"),
        Some(SortDirection::Asc)
    );

    model.blur();
    model.update(char_key('s'));
    assert_eq!(
        model.state().sort_state().direction_for("name"),
        Some(SortDirection::Asc)
    );
}

#[test]
fn test_keyboard_column_workflow() {
    let mut model = table(5);
    model.focus();

    model.update(char_key('x'));
    let visible: Vec<&str> = model.visible_columns().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(visible, vec!["age", "city"]);

    assert_eq!(model.focused_column_key().as_deref(), Some("age"));
    model.update(char_key('m'));
    assert!(model.keyboard_drag().is_active());
    model.update(char_key('>'));
    assert_eq!(model.keyboard_drag().target(), Some("city"));
    model.update(press(KeyCode::Enter));

    assert!(!model.keyboard_drag().is_active());
    assert_eq!(model.state().column_order(), &["name", "city", "age"]);
    assert_eq!(model.focused_column_key().as_deref(), Some("age"));

    model.update(Box::new(KeyMsg {
        key: KeyCode::Char('R'),
        modifiers: KeyModifiers::SHIFT,
    }));
    assert_eq!(model.state().column_order(), &["name", "age", "city"]);
    assert_eq!(model.visible_columns().len(), 3);
}

#[test]
fn test_cancelled_move_keeps_order() {
    let mut model = table(5);
    model.focus();
    model.update(char_key('m'));
    model.update(char_key('>'));
    model.update(press(KeyCode::Esc));
    assert_eq!(model.state().column_order(), &["name", "age", "city"]);
}

#[test]
fn test_pointer_drag() {
    let mut model = table(5);
    assert!(model.pointer_drag_start("city"));
    model.pointer_drag_over("name");
    assert!(model.pointer_drag_end());
    assert_eq!(model.state().column_order(), &["city", "name", "age"]);
}

#[test]
fn test_column_menu_keys() {
    let mut model = table(5);
    model.focus();
    model.update(char_key('c'));
    assert!(model.column_menu().is_open());

    model.update(press(KeyCode::Down));
    model.update(press(KeyCode::Enter));
    assert!(!model.state().is_visible("age"));

    model.update(press(KeyCode::Esc));
    assert!(!model.column_menu().is_open());
    assert!(plain_view(&model).contains("Name"));
    assert!(!plain_view(&model).contains("Age"));
}

#[test]
fn test_search_editing_keys() {
    let mut model = table(25);
    model.focus();
    model.update(char_key('/'));
    assert!(model.is_editing_search());

    model.update(char_key('o'));
    model.update(char_key('s'));
    model.update(char_key('x'));
    model.update(press(KeyCode::Backspace));
    assert_eq!(model.search_input(), "os");
    assert!(model.visible_columns().len() == 3, "typing does not trigger table keys");

    model.update(press(KeyCode::Enter));
    assert!(!model.is_editing_search());
    settle(&mut model);
    assert_eq!(model.search_term(), "os");

    model.update(Box::new(KeyMsg {
        key: KeyCode::Char('l'),
        modifiers: KeyModifiers::CONTROL,
    }));
    assert_eq!(model.search_term(), "");
}

#[test]
fn test_row_keys() {
    let activated = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&activated);
    let mut model = table(25)
        .with_bulk_action(BulkAction::new("noop", |_: &[Value]| {}))
        .on_row_activate(move |row: &Value| sink.lock().unwrap().push(row["id"].to_string()));
    model.focus();

    model.update(char_key('j'));
    model.update(char_key('j'));
    assert_eq!(model.cursor(), 2);
    model.update(char_key(' '));
    assert!(model.selection().is_selected("3"));
    model.update(press(KeyCode::Enter));
    assert_eq!(*activated.lock().unwrap(), vec!["3"]);

    model.update(char_key(']'));
    assert_eq!(model.page(), 2);
    model.update(press(KeyCode::End));
    assert_eq!(model.page(), 3);
    assert_eq!(model.cursor(), 2);
    model.update(press(KeyCode::Home));
    assert_eq!(model.page(), 1);
}

#[test]
fn test_layout_persists_across_tables() {
    let store = MemoryStore::new();
    let config = || TableConfig::new().with_storage(Arc::new(store.clone()), "people");

    let mut first = Model::with_config(columns(), people(3), config());
    first.toggle_column_visibility("city");
    first.reorder_columns("age", "name");

    let second = Model::with_config(columns(), people(3), config());
    let visible: Vec<&str> = second.visible_columns().iter().map(|c| c.key.as_str()).collect();
    assert_eq!(visible, vec!["age", "name"]);
}

#[test]
fn test_view_messages() {
    let mut model = Model::new(columns(), Vec::<Value>::new());
    assert!(plain_view(&model).contains(DEFAULT_EMPTY_MESSAGE));

    model.set_loading(true);
    let view = plain_view(&model);
    assert!(view.contains(DEFAULT_LOADING_MESSAGE));
    assert!(!view.contains(DEFAULT_EMPTY_MESSAGE));

    let model = Model::with_config(
        columns(),
        Vec::<Value>::new(),
        TableConfig::new().with_empty_message("Nothing here"),
    );
    assert!(plain_view(&model).contains("Nothing here"));
}

#[test]
fn test_view_rows_and_header() {
    let mut model = table(25);
    model.handle_sort("name");
    let view = plain_view(&model);
    assert!(view.contains("Name ▲"));
    assert!(view.contains("person 01"));
    assert!(!view.contains("person 11"));
    assert!(view.contains("Showing 1-10 of 25"));
    assert!(view.contains("[1]"));

    model.toggle_row_selection("2");
    let view = plain_view(&model);
    assert!(view.contains("[-]"));
    assert!(view.contains("1 selected"));
}

#[test]
fn test_view_truncates_wide_cells() {
    let rows = vec![json!({"id": 1, "name": "a".repeat(50), "age": 1, "city": "x"})];
    let model = Model::with_config(columns(), rows, TableConfig::new().with_max_cell_width(8));
    let view = plain_view(&model);
    assert!(view.contains("aaaaaaa…"));
    assert!(!view.contains(&"a".repeat(9)));
}

#[test]
fn test_renderers() {
    let model = table(3)
        .with_cell_renderer(|row: &Value, key| format!("<{}>", row[key].as_str().unwrap_or("?")))
        .with_row_renderer(|row: &Value| {
            [("name".to_string(), row["name"].as_str().unwrap_or("").to_uppercase())]
                .into_iter()
                .collect()
        })
        .with_actions(|row: &Value| format!("edit #{}", row["id"]));
    let view = plain_view(&model);
    assert!(view.contains("PERSON 01"));
    assert!(view.contains("<Lima>"));
    assert!(view.contains("Actions"));
    assert!(view.contains("edit #1"));
}
