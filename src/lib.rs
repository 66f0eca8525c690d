//! Export of OVI phone backup databases as XML.
//!
//! # Intention
//!
//! - Read the `Contact` or `messages` table of a backup SQLite file.
//! - Render every row as a `<contact>`/`<message>` element holding one child
//!   element per present column.
//!
//! # Architectural Boundaries
//!
//! - One shared pipeline; the differences between the two exports live in
//!   [`profile::Profile`], never in duplicated code paths.
//! - The whole document is built in memory before anything is written, so a
//!   failed run leaves stdout empty.

pub mod cli;
pub mod error;
pub mod export;
pub mod mapper;
pub mod profile;
pub mod serializer;
pub mod sqlite;
pub mod tree;

pub use error::ExportError;
pub use export::export;
pub use profile::Profile;
