use std::path::Path;

use protobuf_codegen::Codegen;

const PROTO_DIR: &str = "proto";
const SRC: [&str; 1] = ["proto/xplane.proto"];

fn main() {
    for src in SRC {
        let srcpath = Path::new(src);
        if !srcpath.exists() {
            panic!("Missing protobuf schema {}", srcpath.display());
        }
        println!("cargo:rerun-if-changed={}", src);
    }

    // Pure rust parser, so the build does not depend on a system protoc.
    Codegen::new()
        .pure()
        .includes([PROTO_DIR])
        .inputs(SRC)
        .cargo_out_dir("protos")
        .run_from_script();
}
