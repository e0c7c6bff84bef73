#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use gridline::events::GridEvent;
use gridline::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: u32,
    pub name: &'static str,
    pub age: u32,
    pub active: bool,
}

pub fn user(id: u32, name: &'static str, age: u32) -> User {
    User {
        id,
        name,
        age,
        active: true,
    }
}

/// ada 36, bob 25, cy 41 (inactive), dee 30, eve 25.
pub fn users() -> Vec<User> {
    vec![
        user(1, "ada", 36),
        user(2, "bob", 25),
        User {
            active: false,
            ..user(3, "cy", 41)
        },
        user(4, "dee", 30),
        user(5, "eve", 25),
    ]
}

pub fn many_users(count: u32) -> Vec<User> {
    (0..count).map(|id| user(id, "user", 20)).collect()
}

pub fn identity() -> RowIdentity<User, u32> {
    RowIdentity::new(|u: &User| u.id)
}

pub fn columns() -> Vec<Column> {
    vec![
        Column::new("name").title("Name").sortable(),
        Column::new("age").title("Age").width(80.0).sortable(),
    ]
}

pub fn grid(config: GridConfig) -> Grid<User, u32> {
    Grid::builder(columns(), identity())
        .config(config)
        .rows(users())
        .disabled(|u: &User| !u.active)
        .build()
        .unwrap()
}

pub fn ids(rows: &[User]) -> Vec<u32> {
    rows.iter().map(|u| u.id).collect()
}

pub type Recorded = Arc<Mutex<Vec<GridEvent<User, u32>>>>;

/// Collect every event the grid publishes.
pub fn record(grid: &Grid<User, u32>) -> Recorded {
    let events: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    grid.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

pub fn kinds(events: &Recorded) -> Vec<GridEventKind> {
    events.lock().unwrap().iter().map(|e| e.kind()).collect()
}
