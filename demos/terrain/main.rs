//! Terrain demo: reconstructs a synthetic depth scan and prints what the
//! pipeline found.
//!
//! The scene is a floor with a gentle ramp and a steep step, sampled on a
//! regular grid the way a depth sensor delivers an organized cloud.
//!
//! Usage:
//! ```text
//! cargo run --example terrain               # cube size 0.3
//! cargo run --example terrain -- 0.2        # custom cube size
//! RUST_LOG=patchmesh=debug cargo run --example terrain
//! ```

use patchmesh::operations::query::CubeReport;
use patchmesh::operations::Reconstruct;
use patchmesh::source::{BuildSourceMesh, DepthGrid};
use patchmesh::tessellation::{AccessibilityFilter, ExportMesh};
use patchmesh::{PatchMeshError, ReconstructionParams};

const ROWS: usize = 60;
const COLS: usize = 60;
const SPACING: f64 = 0.05;

/// Height of the synthetic scene at `(x, z)`.
fn height(x: f64, z: f64) -> f64 {
    let ramp = if x > 1.0 { (x - 1.0) * 0.4 } else { 0.0 };
    let step = if z > 2.0 { 0.6 } else { 0.0 };
    ramp + step
}

#[allow(clippy::cast_precision_loss)]
fn scan() -> DepthGrid {
    DepthGrid::from_fn(ROWS, COLS, |r, c| {
        let (x, z) = (c as f64 * SPACING, r as f64 * SPACING);
        // A dropout band, as sensors produce on dark surfaces.
        if (25..28).contains(&c) && (10..14).contains(&r) {
            return None;
        }
        Some(patchmesh::math::Point3::new(x, height(x, z), z))
    })
}

fn main() -> Result<(), PatchMeshError> {
    // Default: WARN for everything, INFO for patchmesh.
    // Override with RUST_LOG env var (e.g. RUST_LOG=patchmesh=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("patchmesh=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cube_size = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<f64>().ok())
        .unwrap_or(0.3);
    let params = ReconstructionParams::default().with_cube_size(cube_size);

    let grid = scan();
    let mesh = BuildSourceMesh::new(&grid).execute()?;
    let result = Reconstruct::from_mesh(&mesh).with_params(params).execute()?;

    let stats = result.stats;
    println!("source triangles   {}", mesh.len());
    println!("cubes              {} ({} with a plane)", stats.cubes, stats.planar_cubes);
    println!("vertices           {}", stats.vertices);
    println!("triangles          {}", stats.triangles);
    println!("  candidate        {}", stats.candidates);
    println!("  inaccessible     {}", stats.inaccessible);
    println!("stitch merges      {}", stats.merges);

    let walkable = ExportMesh::new(AccessibilityFilter::Candidate).execute(&result.store)?;
    println!("walkable area      {:.3}", walkable.area());

    if let Some(&first) = result.store.cube_ids().first() {
        println!();
        print!("{}", CubeReport::new(first).execute(&result.store)?);
    }
    Ok(())
}
