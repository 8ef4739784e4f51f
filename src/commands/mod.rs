//! The three user actions of a session: find PDFs on a page, open one, ask about it.

pub mod chat;
pub mod knowledge;

pub use chat::ask;
pub use knowledge::{find_pdfs, open_pdf};
