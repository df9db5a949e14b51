//! Dumps the FloatChat OpenAPI document as pretty-printed JSON, either to
//! stdout or to the path given with `--output`.
//!
//! Usage:
//!   cargo run --bin generate_openapi
//!   cargo run --bin generate_openapi -- --output openapi.json

use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    process,
};

use floatchat::api::handlers::ApiDoc;
use utoipa::OpenApi;

fn output_path(args: &[String]) -> Option<PathBuf> {
    args.windows(2)
        .find(|pair| pair[0] == "--output")
        .map(|pair| PathBuf::from(&pair[1]))
}

fn main() {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .expect("OpenAPI document should serialise");

    let args: Vec<String> = env::args().collect();
    match output_path(&args) {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &json) {
                eprintln!("error: cannot write {}: {e}", path.display());
                process::exit(1);
            }
            eprintln!("OpenAPI document written to {}", path.display());
        }
        None => {
            io::stdout()
                .write_all(json.as_bytes())
                .expect("writing to stdout should not fail");
        }
    }
}
