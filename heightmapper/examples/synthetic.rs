//! Render a synthetic grid in every output mode, without touching the network.
//!
//! Run with: cargo run --example synthetic -- /tmp/out

use std::env;
use std::path::PathBuf;

use heightmapper::color::ColorMap;
use heightmapper::contour::ContourClassifier;
use heightmapper::{HeightGrid, HeightmapError, NumberFormat, Renderer};

fn main() -> Result<(), HeightmapError> {
    let out_dir = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example synthetic -- /path/to/output/dir");
        std::process::exit(1);
    });
    std::fs::create_dir_all(&out_dir)?;

    // A cone-shaped hill rising from 450 m to 900 m
    let grid = HeightGrid::from_fn(120, 80, |x, y| {
        let dx = x as f32 - 60.0;
        let dy = y as f32 - 40.0;
        (900.0 - (dx * dx + dy * dy).sqrt() * 8.0).max(450.0)
    });

    let renderers = [
        (
            "hill.txt",
            Renderer::Raw {
                format: NumberFormat::Fixed(1),
            },
        ),
        ("hill_gray.png", Renderer::Grayscale { scale: 2.0 }),
        (
            "hill_topo.png",
            Renderer::Topographic {
                scale: 4.0,
                contours: ContourClassifier::new(25.0).expect("positive spacing"),
                colors: ColorMap::default(),
            },
        ),
    ];

    for (name, renderer) in renderers {
        let path = out_dir.join(name);
        renderer.render(&grid)?.write_to(Some(&path))?;
        println!("Wrote {}", path.display());
    }

    let (min, max) = grid.valid_range()?;
    println!("Height range: {}m - {}m", min, max);
    Ok(())
}
