//! Parse a saved message and print a summary.
//!
//! ```text
//! RUST_LOG=debug cargo run --example parse_message -- message.eml
//! ```
use std::env;
use std::error::Error;
use std::fs;

use popmail::Message;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let path = env::args().nth(1).ok_or("usage: parse_message <file>")?;
    let raw = fs::read(&path)?;
    let message = Message::from_text(&String::from_utf8_lossy(&raw));

    println!("{}", message);
    Ok(())
}
