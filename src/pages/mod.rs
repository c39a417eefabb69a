//! Pages - stato locale delle due schermate
//!
//! Le pagine usano le stesse operazioni dei servizi HTTP ma trasformano ogni
//! errore in una stringa leggibile nel proprio stato, senza propagarlo.

pub mod account;
pub mod messages;

pub use account::{AccountPage, Clipboard, NameEditor};
pub use messages::{MessagesPage, RenameCategoryModal};
