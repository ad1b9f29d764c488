//! Forward one subject into another that carries fewer values.
//!
//! Run with: `cargo run -p ftui-observer --example chain_subjects`

use ftui_observer::{BlockGuard, BlockableSubject, ConnectionOwner, Subject};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let key_pressed = Subject::<(char, u64)>::new();
    let typed = BlockableSubject::<(char,)>::new();
    let owner = ConnectionOwner::new();

    owner.connect_subject(&key_pressed, &typed);
    owner.connect(&typed, |c: char| println!("typed {c:?}"));
    owner.connect(&key_pressed, |c: char, at: u64| println!("pressed {c:?} at {at}ms"));

    key_pressed.notify(('a', 10));
    {
        let _paused = BlockGuard::new(&typed);
        key_pressed.notify(('b', 20));
    }
    key_pressed.notify(('c', 30));
}
