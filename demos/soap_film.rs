//! Relaxes a soap film over a saddle-shaped ring and prints mesh statistics.
//!
//! Usage:
//! ```text
//! cargo run --example soap_film                  # 4 refinements, 4 smoothing steps
//! cargo run --example soap_film -- 6 10          # refinements, smoothing steps
//! RUST_LOG=lamina=debug cargo run --example soap_film
//! ```

use lamina::film::{FilmParams, SoapFilm, WavyRing};
use lamina::math::{Point3, Vector3};
use lamina::{Generator, LaminaError};

/// Parses `[refinements] [smoothing_steps]`, falling back to defaults.
fn parse_args() -> FilmParams {
    let args: Vec<usize> = std::env::args()
        .skip(1)
        .filter_map(|a| a.parse().ok())
        .collect();
    let defaults = FilmParams::default();
    FilmParams {
        refinements: args.first().copied().unwrap_or(defaults.refinements),
        smoothing_steps: args.get(1).copied().unwrap_or(defaults.smoothing_steps),
    }
    .clamped()
}

fn main() -> Result<(), LaminaError> {
    // Default: WARN for everything, INFO for lamina.
    // Override with RUST_LOG (e.g. RUST_LOG=lamina=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("lamina=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let params = parse_args();
    let saddle = WavyRing {
        radius: 1.0,
        amplitude: 0.35,
        waves: 2,
    };

    let mesh = SoapFilm::new(saddle, params).build()?;
    let height = mesh.max_distance_from_plane(&Point3::origin(), &Vector3::z());

    println!(
        "refinements={} smoothing_steps={}",
        params.refinements, params.smoothing_steps
    );
    println!("vertices:  {}", mesh.vertex_count());
    println!("triangles: {}", mesh.triangle_count());
    println!("area:      {:.6}", mesh.surface_area());
    println!("max |z|:   {height:.6}");
    if let Some((lo, hi)) = mesh.bounding_box() {
        println!("bounds:    {lo} .. {hi}");
    }
    Ok(())
}
