//! A component that embeds a `ConnectionOwner`, so its reactions stop when
//! it is dropped.
//!
//! Run with: `RUST_LOG=debug cargo run -p ftui-observer --example owner_composition`

use std::cell::Cell;
use std::rc::Rc;

use ftui_observer::{ConnectionOwner, Subject};

struct StatusBar {
    connections: ConnectionOwner,
    clicks: Cell<u32>,
}

impl StatusBar {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            connections: ConnectionOwner::new(),
            clicks: Cell::new(0),
        })
    }

    fn attach(self: &Rc<Self>, clicked: &Subject<(u16, u16)>) {
        self.connections
            .connect_method(clicked, self, StatusBar::on_click);
    }

    fn on_click(&self, x: u16, y: u16) {
        self.clicks.set(self.clicks.get() + 1);
        println!("status bar: click #{} at ({x}, {y})", self.clicks.get());
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let clicked = Subject::<(u16, u16)>::new();
    let status = StatusBar::new();
    status.attach(&clicked);

    clicked.notify((3, 4));
    clicked.notify((10, 1));
    println!("observers before drop: {}", clicked.len());

    drop(status);
    println!("observers after drop: {}", clicked.len());
    clicked.notify((0, 0));
}
