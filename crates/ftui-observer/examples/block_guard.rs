//! Mute a subject for the duration of a scope.
//!
//! Run with: `cargo run -p ftui-observer --example block_guard`

use ftui_observer::{BlockGuard, BlockableSubject, connect};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let subject = BlockableSubject::<(&'static str,)>::new();
    let _printer = connect(&subject, |text: &'static str| println!("{text}"));

    subject.notify(("Hello World!",));
    {
        let _blocked = BlockGuard::new(&subject);
        subject.notify(("Blocked!",));
    }
    subject.notify(("Hello World again!",));

    let was_blocked = subject.set_block_state(true);
    subject.notify(("Still blocked",));
    subject.set_block_state(was_blocked);
    subject.notify(("Back to normal",));
}
