//! Example: fit a line to a two-cluster point cloud.
//!
//! Writes the cloud to `cloud.csv` and the best line to `line.csv`.
//! Run with `RUST_LOG=debug` to see every promotion.

use consensus::datasets::two_cluster_cloud;
use consensus::{Line, Ransac, RansacSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("=== Two-Cluster Line Fitting Example ===\n");

    let mut rng = rand::thread_rng();
    let cloud = two_cluster_cloud(100, &mut rng);
    println!("Generated {} points in two clusters\n", cloud.len());

    let settings = RansacSettings::new(1000, 0.5, 10, 2)?;
    let mut engine = Ransac::new(settings);
    let mut line = Line::default();

    cloud.to_file("cloud.csv")?;

    let Some(result) = engine.run(&cloud, &mut line)? else {
        println!("No consensus set exceeded {} points", settings.threshold_point);
        return Ok(());
    };

    println!("Results:");
    println!(
        "  Consensus set: {} of {} points (found in trial {})",
        result.inliers.len(),
        cloud.len(),
        result.trial
    );
    println!("  Loss: {:.6}", result.loss);

    let best = &result.model;
    println!(
        "\nBest line: {:.4}x + {:.4}y + {:.4} = 0",
        best.a(),
        best.b(),
        best.c()
    );
    if let Some((slope, intercept)) = best.to_slope_intercept() {
        println!("  In slope-intercept form: y = {slope:.4}x + {intercept:.4}");
    }

    best.to_file("line.csv")?;
    println!("\nWrote cloud.csv and line.csv");

    Ok(())
}
