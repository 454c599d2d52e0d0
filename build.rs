//! Build script for the confluence-push project
//!
//! Embeds build metadata for runtime access

use std::env;

/// Entry point for the build script.
fn main() {
  // Store the target architecture; it is embedded in the HTTP user agent so
  // server logs can identify the client platform.
  println!("cargo:rustc-env=TARGET={}", env::var("TARGET").unwrap_or_default());

  // Re-run when this build script is modified
  println!("cargo:rerun-if-changed=build.rs");

  // Re-run when target architecture changes during cross-compilation
  println!("cargo:rerun-if-env-changed=TARGET");
}
