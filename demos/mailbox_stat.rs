//! Read a captured `STAT` reply and `RETR` reply and parse both.
//!
//! ```text
//! cargo run --example mailbox_stat -- "+OK 2 320" retr-1.txt
//! ```
use std::env;
use std::error::Error;
use std::fs;

use popmail::response::{parse_stat, retr_lines};
use popmail::Message;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let stat = args.next().ok_or("usage: mailbox_stat <stat reply> [retr reply file]")?;

    let mailbox = parse_stat(&stat)?;
    if mailbox.is_failure() {
        println!("server refused STAT: {}", stat.trim());
        return Ok(());
    }
    println!("{}", mailbox);

    if let Some(path) = args.next() {
        let response = fs::read_to_string(&path)?;
        let message = Message::parse(retr_lines(&response)?);
        println!("{}", message);
    }
    Ok(())
}
