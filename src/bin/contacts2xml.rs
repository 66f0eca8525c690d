//! Write the `Contact` table of an OVI backup file as XML to stdout.
//!
//! ```text
//! contacts2xml MDataStore.db3
//! ```

use std::process::ExitCode;

use ovi_backup_xml::{cli, Profile};

fn main() -> ExitCode {
    cli::main(
        "contacts2xml",
        "Write the contacts of an OVI backup database as XML to stdout",
        Profile::contacts(),
    )
}
