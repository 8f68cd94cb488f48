//! Baseline seed data.
//!
//! Three accounts (two regular users and one admin) and one book per
//! account. The data is fixed at build time and never derived from
//! request input.

use vampi_storage::{BookRecord, SeedSet, UserRecord};

const USERS: [(&str, &str, &str, bool); 3] = [
    ("name1", "mail1@mail.com", "pass1", false),
    ("name2", "mail2@mail.com", "pass2", false),
    ("admin", "admin@mail.com", "pass1", true),
];

const BOOKS: [(&str, &str); 3] = [
    ("bookTitle77", "name1"),
    ("bookTitle85", "name2"),
    ("bookTitle47", "admin"),
];

/// The baseline rows written by every seeding path.
#[must_use]
pub fn baseline() -> SeedSet {
    let users = USERS
        .iter()
        .map(|(username, email, password, admin)| UserRecord {
            username: (*username).to_owned(),
            email: (*email).to_owned(),
            password: (*password).to_owned(),
            admin: *admin,
        })
        .collect();

    let books = BOOKS
        .iter()
        .map(|(title, owner)| BookRecord {
            title: (*title).to_owned(),
            secret: format!("secret for {title}"),
            owner: (*owner).to_owned(),
        })
        .collect();

    SeedSet { users, books }
}
