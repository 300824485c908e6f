fn main() {
    // The parameter value accessors and the message suite are C-variadic.
    // Rust can call variadic function pointers but not define variadic
    // functions, so those suite slots live in a small C shim that decodes
    // the va_list and calls back into Rust.
    println!("cargo:rerun-if-changed=src/shim.c");
    cc::Build::new().file("src/shim.c").compile("testhost_shim");
}
