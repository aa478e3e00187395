// build.rs

use chrono::Utc;
use std::{env, error::Error, fs, path::Path};

// Stamps the build time into the banner the binary logs at startup.
fn main() -> Result<(), Box<dyn Error>> {
    let out_dir = env::var("OUT_DIR")?;
    let build_date = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

    fs::write(
        Path::new(&out_dir).join("build_info.rs"),
        format!("pub const BUILD_DATE: &str = \"{}\";\n", build_date),
    )?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
