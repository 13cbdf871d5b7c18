//! Batch Resize - Letterbox a set of image files to 1920x1280
//!
//! This example shows:
//! - Building sources from files on disk (media type from the extension)
//! - Skipping unreadable files and running a per-item batch, so one bad file
//!   does not stop the rest
//! - Saving each output under its original file name
//!
//! Run with: cargo run --example batch_resize -p resize-core -- <out-dir> <image>...
//! Set RUST_LOG=debug to see the computed layouts.

use resize_core::{compose_each, CompositionParams, SourceImage};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let out_dir = PathBuf::from(args.next().ok_or("usage: batch_resize <out-dir> <image>...")?);
    let inputs: Vec<PathBuf> = args.map(PathBuf::from).collect();

    std::fs::create_dir_all(&out_dir)?;

    // Unreadable files are reported and left out of the batch
    let mut loaded = Vec::with_capacity(inputs.len());
    let mut sources = Vec::with_capacity(inputs.len());
    for path in &inputs {
        match SourceImage::from_path(path) {
            Ok(source) => {
                loaded.push(path);
                sources.push(source);
            }
            Err(err) => log::error!("{}: {}", path.display(), err),
        }
    }

    let params = CompositionParams::default();
    let results = compose_each(&sources, &params);

    for (index, (path, result)) in loaded.iter().zip(results).enumerate() {
        match result {
            Ok(output) => {
                let target = out_dir.join(output.download_name(index));
                std::fs::write(&target, &output.bytes)?;
                log::info!("wrote {} ({} bytes)", target.display(), output.bytes.len());
            }
            Err(err) => log::error!("{}: {}", path.display(), err),
        }
    }

    Ok(())
}
