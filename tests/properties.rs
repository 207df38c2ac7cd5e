mod common;

use common::{contact, contact_list, contacts, numbered, Contact};
use listkeeper::list::{
    handle_event, ChangeLog, Event, FetchStatus, ListChange, ListCoordinator, ViewBinding,
};
use listkeeper::list::search::prefix_filter;
use listkeeper::list::SectionChange;
use listkeeper::{IndexPath, Section, SectionedCoordinator};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

/// One mutation of a flat list; indices are reduced modulo the row count
/// plus one, so some of them fall out of range.
#[derive(Debug, Clone)]
enum Mutation {
    Append(Vec<u8>),
    Prepend(Vec<u8>),
    Update(usize, u8),
    Delete(usize),
    Clear,
}

fn mutation() -> impl Strategy<Value = Mutation> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..6).prop_map(Mutation::Append),
        prop::collection::vec(any::<u8>(), 0..6).prop_map(Mutation::Prepend),
        (any::<usize>(), any::<u8>()).prop_map(|(index, value)| Mutation::Update(index, value)),
        any::<usize>().prop_map(Mutation::Delete),
        Just(Mutation::Clear),
    ]
}

fn user(n: u8) -> Contact {
    contact(&format!("u{n}@x"))
}

fn users(values: &[u8]) -> Vec<Contact> {
    values.iter().copied().map(user).collect()
}

proptest! {
    #[test]
    fn rows_follow_every_mutation(mutations in prop::collection::vec(mutation(), 0..40)) {
        let (mut list, _log, _) = contact_list(0, 20);
        let mut expected: Vec<Contact> = Vec::new();

        for mutation in mutations {
            match mutation {
                Mutation::Append(values) => {
                    list.append_data(users(&values));
                    expected.extend(users(&values));
                }
                Mutation::Prepend(values) => {
                    list.prepend_data(users(&values));
                    expected.splice(0..0, users(&values));
                }
                Mutation::Update(index, value) => {
                    let index = index % (expected.len() + 1);
                    let result = list.update_data(user(value), index);
                    if index < expected.len() {
                        prop_assert!(result.is_ok());
                        expected[index] = user(value);
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Mutation::Delete(index) => {
                    let index = index % (expected.len() + 1);
                    let result = list.delete_data(index);
                    if index < expected.len() {
                        prop_assert_eq!(result.ok(), Some(expected.remove(index)));
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                Mutation::Clear => {
                    list.clear_data(true);
                    expected.clear();
                }
            }
            prop_assert_eq!(list.rows(), expected.as_slice());
            prop_assert_eq!(list.visible(), list.rows());
        }
    }

    #[test]
    fn empty_query_restores_every_row(
        seed in prop::collection::vec(any::<u8>(), 0..10),
        rounds in prop::collection::vec(("[a-z0-9@]{0,3}", prop::collection::vec(any::<u8>(), 0..4)), 1..12),
    ) {
        let (mut list, _log, _) = contact_list(0, 20);
        list.set_data(users(&seed));
        let mut total = seed.len();

        for (query, batch) in rounds {
            list.set_search_query(query.as_str());
            prop_assert!(list.count() <= list.rows().len());
            total += batch.len();
            list.append_data(users(&batch));
            list.set_search_query("");
            prop_assert_eq!(list.visible(), list.rows());
        }
        prop_assert_eq!(list.count(), total);
    }

    #[test]
    fn repeated_near_end_signals_request_one_page(page_size in 1usize..30, repeats in 1usize..20) {
        let (mut list, log, pages) = contact_list(0, page_size);
        list.set_data(numbered(0..page_size));

        for _ in 0..repeats {
            handle_event(&mut list, &Event::NearEnd { index: page_size - 1 }).unwrap();
        }

        prop_assert_eq!(pages.borrow().clone(), vec![1]);
        let started = log
            .changes()
            .iter()
            .filter(|c| matches!(c, ListChange::FetchStarted { .. }))
            .count();
        prop_assert_eq!(started, 1);
    }
}

#[test]
fn clear_with_reset_restores_start_state() {
    let (mut list, _log, _) = contact_list(3, 2);
    list.append_data(numbered(0..2));
    assert!(list.near_end(1));
    list.append_data(numbered(2..4));
    assert!(list.near_end(3));
    assert_eq!(list.pagination().current_page(), 5);

    list.clear_data(true);

    assert!(list.rows().is_empty());
    assert!(list.visible().is_empty());
    assert_eq!(list.pagination().current_page(), 3);
    assert_eq!(list.fetch_status(), FetchStatus::Idle);
    assert!(!list.has_more());
}

#[test]
fn late_page_after_reload_still_appends() {
    let (mut list, _log, _) = contact_list(0, 2);
    list.set_data(numbered(0..2));
    assert!(list.near_end(1));

    list.clear_data(true);
    list.append_data(numbered(5..7));

    assert_eq!(list.rows().len(), 2);
    assert_eq!(list.fetch_status(), FetchStatus::Idle);
}

/// Deletes every row reported as updated, from inside the notification.
struct DeleteOnUpdate;

impl ViewBinding<Contact> for DeleteOnUpdate {
    fn on_change(&mut self, change: &ListChange, list: &mut ListCoordinator<Contact>) {
        if let ListChange::ItemUpdated { index } = *change {
            list.delete_data(index).unwrap();
        }
    }
}

#[test]
fn bindings_can_mutate_while_being_notified() {
    let log = ChangeLog::default();
    let mut list: ListCoordinator<Contact> = ListCoordinator::default();
    list.subscribe(DeleteOnUpdate);
    list.subscribe(log.clone());
    list.set_data(contacts(&["a@x", "b@x"]));
    log.take();

    list.update_data(contact("x@x"), 0).unwrap();

    assert_eq!(list.rows(), contacts(&["b@x"]).as_slice());
    assert_eq!(
        log.take(),
        vec![ListChange::ItemUpdated { index: 0 }, ListChange::ItemRemoved { index: 0 }]
    );
}

#[test]
fn sectioned_search_tracks_rendered_paths() {
    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&changes);

    let mut list = SectionedCoordinator::new();
    list.set_filter(prefix_filter(|c: &Contact| c.email.clone()));
    list.subscribe(move |change, _list| sink.borrow_mut().push(*change));

    list.set_data(vec![
        Section::titled("x.com", contacts(&["ann@x", "bob@x"])),
        Section::titled("y.com", contacts(&["amy@y"])),
    ]);
    list.append_data(vec![Section::titled("x.com", contacts(&["abe@x"]))]);
    assert_eq!(list.row_count(0), 3);

    list.set_search_query("b");
    assert_eq!(list.section_count(), 1);
    assert_eq!(list.object_at(IndexPath::new(0, 0)), Some(&contact("bob@x")));

    list.update_data(contact("bea@x"), IndexPath::new(0, 0)).unwrap();
    assert_eq!(list.sections()[0].rows[1], contact("bea@x"));

    list.set_search_query("");
    assert_eq!(list.section_count(), 2);
    assert_eq!(list.title_at(1), Some("y.com"));
    assert!(changes
        .borrow()
        .iter()
        .all(|c| matches!(c, SectionChange::Reloaded { .. } | SectionChange::EmptyState { .. })));
}
