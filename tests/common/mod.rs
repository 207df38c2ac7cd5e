//! Shared test fixtures.

#![allow(dead_code)]

use listkeeper::list::search::prefix_filter;
use listkeeper::list::{ChangeLog, ListCoordinator, Pagination};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub email: String,
}

pub fn contact(email: &str) -> Contact {
    Contact {
        email: email.to_string(),
    }
}

pub fn contacts(emails: &[&str]) -> Vec<Contact> {
    emails.iter().map(|e| contact(e)).collect()
}

/// Page numbers the page handler was called with.
pub type PageRequests = Rc<RefCell<Vec<u32>>>;

/// Coordinator with an email prefix filter, a recording binding and a page
/// handler that only records the requested page.
pub fn contact_list(start_page: u32, page_size: usize) -> (ListCoordinator<Contact>, ChangeLog, PageRequests) {
    let log = ChangeLog::default();
    let pages = PageRequests::default();
    let requests = Rc::clone(&pages);

    let mut list = ListCoordinator::new(Pagination::new(start_page, page_size));
    list.set_filter(prefix_filter(|c: &Contact| c.email.clone()));
    list.subscribe(log.clone());
    list.set_page_handler(move |_list: &mut ListCoordinator<Contact>, page| {
        requests.borrow_mut().push(page);
    });
    (list, log, pages)
}

pub fn numbered(range: std::ops::Range<usize>) -> Vec<Contact> {
    range.map(|n| contact(&format!("user{n}@example.com"))).collect()
}
