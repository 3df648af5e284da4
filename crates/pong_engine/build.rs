use gl_generator::{Api, Fallbacks, GlobalGenerator, Profile, Registry};

// WebGL 2.0 == OpenGL ES 3.0, so a single binding set serves both targets.
fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let path = std::path::Path::new(&out_dir).join("gles_bindings.rs");
    let mut file = std::fs::File::create(path).unwrap();
    Registry::new(Api::Gles2, (3, 0), Profile::Core, Fallbacks::All, [])
        .write_bindings(GlobalGenerator, &mut file)
        .unwrap();
}
