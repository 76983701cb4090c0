use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use pulldown_core::{AppConfig, SpriteSet, Sprites};

/// Dump the forward, backward and spin sequences as numbered PNG files
pub fn run(config: &AppConfig, out: &Path) -> Result<()> {
    let sprites = Sprites::from_config(&config.refresh)?;
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    let mut written = 0;
    for (name, set) in [
        ("forward", &sprites.forward),
        ("backward", &sprites.backward),
        ("spin", &sprites.spin),
    ] {
        written += write_set(out, name, set)?;
    }

    let (width, height) = sprites.dimensions();
    println!(
        "Wrote {} frames ({}x{}) to {}",
        written,
        width,
        height,
        out.display()
    );
    Ok(())
}

fn write_set(out: &Path, name: &str, set: &SpriteSet) -> Result<usize> {
    for (i, frame) in set.frames().iter().enumerate() {
        let path = out.join(format!("{}_{:02}.png", name, i));
        frame
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote frame");
    }
    Ok(set.len())
}
