//! # photo-archive CLI
//!
//! ## Usage
//! ```bash
//! photo-archive sort --source ~/Inbox --target ~/Archive
//! photo-archive dedup --directory ~/Archive --input dupes.txt --apply
//! photo-archive list ~/Inbox
//! ```

mod cli;

use photo_archive::Result;

fn main() -> Result<()> {
    cli::run()
}
