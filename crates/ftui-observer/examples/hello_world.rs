//! Connect a few reactions of different shapes and notify once.
//!
//! Run with: `RUST_LOG=trace cargo run -p ftui-observer --example hello_world`

use ftui_observer::{ConnectionOwner, Subject};

fn greet(greeting: &'static str) {
    println!("free function: {greeting}");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let subject = Subject::<(&'static str, u32)>::new();
    let owner = ConnectionOwner::new();

    owner.connect(&subject, greet);
    owner.connect(&subject, |greeting: &'static str, times: u32| {
        for _ in 0..times {
            println!("closure: {greeting}");
        }
    });
    owner.connect(&subject, || println!("no parameters needed"));

    subject.notify(("Hello World!", 2));
}
