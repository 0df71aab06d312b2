//! # Inventory API document writer
//!
//! Prints the OpenAPI document of the inventory API, or writes it to the
//! path given as the first argument. The tracing level is read from
//! `TYPED_OAS_LOG`.

use std::path::PathBuf;

use typed_oas_sample_app::Result;
use typed_oas_sample_app::build_document;
use typed_oas_sample_app::logging::TracingLevel;
use typed_oas_sample_app::write_document;

fn main() -> Result<()> {
    TracingLevel::init_stderr_tracing();

    let output = std::env::args_os().nth(1).map(PathBuf::from);
    let doc = build_document()?;
    write_document(&doc, output.as_deref())
}
