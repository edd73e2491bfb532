// Build script: mirrors the demo site in `static/` into `dist/`. The wasm pkg
// itself is produced by wasm-pack (see `src/main.rs`), which re-enters this
// script, so nothing here may invoke wasm-pack.
use std::{fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static/index.html");

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let static_dir = Path::new("static");
    if static_dir.exists() {
        let opts = CopyOptions {
            overwrite: true,
            content_only: true,
            ..CopyOptions::new()
        };
        if let Err(e) = copy(static_dir, out_dir, &opts) {
            println!("cargo:warning=copying static/ to dist/ failed: {e}");
        }
    }
}
