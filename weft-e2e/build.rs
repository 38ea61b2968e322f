use std::path::{Path, PathBuf};

use weft_cli::{BuildOptions, build};
use weft_compiler::Target;

fn main() {
    println!("cargo:rerun-if-changed=views");
    let views = Path::new(env!("CARGO_MANIFEST_DIR")).join("views");
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    for (target, dir) in [(Target::Dom, "dom"), (Target::Ssr, "ssr")] {
        let options = BuildOptions::new(out_dir.join(dir)).with_target(target);
        build(&views, &options).expect("compile views");
    }
}
