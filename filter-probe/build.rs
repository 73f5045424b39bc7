fn main() {
    #[cfg(feature = "libpng")]
    libpng::compile_shim();
}

/// Builds the `do_filter` accessor against a libpng source tree.
///
/// `LIBPNG_SOURCE_DIR` must point at the libpng sources (for `pngpriv.h`
/// and `pngstruct.h`). `LIBPNG_BUILD_DIR` is added to the include path when
/// the generated `pnglibconf.h` lives outside the sources, and
/// `LIBPNG_LIB_DIR` to the link search path when `libpng16` is not
/// installed system-wide.
#[cfg(feature = "libpng")]
mod libpng {
    use std::env;
    use std::path::PathBuf;

    pub fn compile_shim() {
        println!("cargo:rerun-if-changed=shim/do_filter.c");
        println!("cargo:rerun-if-env-changed=LIBPNG_SOURCE_DIR");
        println!("cargo:rerun-if-env-changed=LIBPNG_BUILD_DIR");
        println!("cargo:rerun-if-env-changed=LIBPNG_LIB_DIR");

        let Some(source_dir) = env::var_os("LIBPNG_SOURCE_DIR").map(PathBuf::from) else {
            panic!("the libpng feature needs LIBPNG_SOURCE_DIR to point at the libpng sources");
        };

        let mut build = cc::Build::new();
        build.file("shim/do_filter.c").include(&source_dir);
        if let Some(build_dir) = env::var_os("LIBPNG_BUILD_DIR") {
            build.include(build_dir);
        }
        build.compile("filter_probe_shim");

        if let Some(lib_dir) = env::var_os("LIBPNG_LIB_DIR") {
            println!("cargo:rustc-link-search=native={}", PathBuf::from(lib_dir).display());
        }
    }
}
