//! Build script for facadec
//!
//! Generates client source for the test fixtures into `OUT_DIR`, so the
//! integration tests can compile and call it.

use std::path::{Path, PathBuf};

use facade_emit::{generate_rust, EmitOptions};
use facade_eval::CompiledSchema;
use facade_schema::SchemaSet;

const FIXTURES: &[&str] = &["pinger", "client"];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=tests/fixtures/");

    let Some(out_dir) = std::env::var_os("OUT_DIR").map(PathBuf::from) else {
        panic!("OUT_DIR is not set");
    };
    let fixtures = Path::new("tests/fixtures");

    for name in FIXTURES {
        let input = fixtures.join(format!("{name}.json"));
        let text = match std::fs::read_to_string(&input) {
            Ok(text) => text,
            Err(e) => panic!("failed to read {}: {e}", input.display()),
        };
        let set = match SchemaSet::from_json(&text) {
            Ok(set) => set,
            Err(e) => panic!("failed to compile {}: [{}] {e}", input.display(), e.code()),
        };
        let source = generate_rust(&CompiledSchema::synthesize(set), &EmitOptions::default());

        let output = out_dir.join(format!("{name}_client.rs"));
        if let Err(e) = std::fs::write(&output, source) {
            panic!("failed to write {}: {e}", output.display());
        }
    }
}
