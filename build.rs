use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets/textures");
    println!("cargo:rerun-if-env-changed=YURT_ASSETS");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets = manifest_dir.join("assets");
    if !assets.join("textures").exists() {
        // The scene still renders, every map falls back to a placeholder.
        println!("cargo:warning=no assets/textures directory, textures will be missing at runtime");
        return Ok(());
    }

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&[assets], out_dir, &copy_options)?;

    Ok(())
}
