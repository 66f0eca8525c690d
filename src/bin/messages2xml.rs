//! Write the `messages` table of an OVI backup file as XML to stdout.
//!
//! ```text
//! messages2xml msg_db.sqlite
//! ```

use std::process::ExitCode;

use ovi_backup_xml::{cli, Profile};

fn main() -> ExitCode {
    cli::main(
        "messages2xml",
        "Write the messages of an OVI backup database as XML to stdout",
        Profile::messages(),
    )
}
