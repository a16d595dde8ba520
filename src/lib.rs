#![cfg_attr(all(feature = "nightly", test), feature(test))]
//! Tolerant parsing of email messages retrieved over POP3.
//!
//! ```
//! use popmail::Message;
//!
//! let message = Message::from_text(
//!     "Message-ID: <1@example.org>\r\n\
//!      From: \"Ann Example\" <Ann@Example.org>\r\n\
//!      To: bob@example.org\r\n\
//!      \r\n\
//!      Hello Bob",
//! );
//! assert_eq!(message.id, "1@example.org");
//! assert_eq!(message.sender.email_address, "ann@example.org");
//! assert_eq!(message.subject, "(No Subject)");
//! assert_eq!(message.body, "Hello Bob");
//! ```

#[macro_use]
extern crate lazy_static;

pub use address::Person;
pub use body::MimeBodyExtractor;
pub use config::ParserConfig;
pub use header::{FromHeader, HeaderFieldExtractor, HeaderFields};
pub use message::{Message, NO_ID};
pub use response::MailboxStat;
pub use results::{ParsingError, ParsingResult};

pub mod config;
pub mod finisher;
pub mod mimeheaders;
pub mod response;
pub mod results;
pub mod rfc2045;
pub mod rfc2047;
pub mod rfc5322;
pub mod rfc822;
pub mod utils;
mod address;
mod body;
mod header;
mod message;
