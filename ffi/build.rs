use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=RXHR_HEADER_DIR");

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let bindings = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("RXHR_H")
        .with_cpp_compat(true)
        .generate();

    let bindings = match bindings {
        Ok(bindings) => bindings,
        Err(err) => {
            println!("cargo:warning=skipping rxhr.h generation: {err}");
            return;
        }
    };

    bindings.write_to_file(out_dir.join("rxhr.h"));

    // Opt-in copy for C consumers that want the header at a fixed path.
    if let Ok(dir) = env::var("RXHR_HEADER_DIR") {
        let dir = PathBuf::from(dir);
        if fs::create_dir_all(&dir).is_ok() {
            bindings.write_to_file(dir.join("rxhr.h"));
        }
    }
}
