//! Command-line driver for the arm's forward kinematics.
//!
//! With no arguments it runs the three reference angle sets through the default
//! arm and prints the resulting transforms as JSON, one document per set.

use anyhow::{Context, Result, bail};
use arm_kinematics::{
    ChainConfig, ChainPoses, ForwardKinematicsSolver, HomogeneousTransform, LINK_COUNT, LinkRole,
    REFERENCE_ANGLE_SETS,
};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Forward kinematics of a four-joint serial arm
#[derive(Parser)]
#[command(name = "arm-fk")]
#[command(about = "Compute joint and end-effector poses for a four-joint arm", long_about = None)]
#[command(version)]
struct Cli {
    /// One set of joint angles in degrees, comma separated (repeatable).
    /// Defaults to the reference sets.
    #[arg(long, allow_hyphen_values = true)]
    angles: Vec<String>,

    /// Link lengths l1,l2,l3,l4 (overrides the config file)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    links: Option<Vec<f64>>,

    /// JSON file with a chain configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Solve the angle sets in parallel
    #[arg(long)]
    parallel: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Table,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let angle_sets = angle_sets(&cli)?;

    let solver = ForwardKinematicsSolver::four_joint_arm(config)
        .context("failed to build the arm geometry")?;
    info!(
        sets = angle_sets.len(),
        parallel = cli.parallel,
        "solving forward kinematics"
    );

    let results = solve_all(&solver, &angle_sets, cli.parallel);
    for (angles, result) in angle_sets.iter().zip(results) {
        let poses = result.with_context(|| format!("failed to solve angles {angles:?}"))?;
        match cli.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&poses)?),
            Format::Table => print_table(angles, &poses),
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<ChainConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => ChainConfig::default(),
    };

    if let Some(links) = &cli.links {
        config.link_lengths = links.as_slice().try_into().with_context(|| {
            format!("expected {LINK_COUNT} link lengths, got {}", links.len())
        })?;
    }

    Ok(config)
}

fn angle_sets(cli: &Cli) -> Result<Vec<Vec<f64>>> {
    if cli.angles.is_empty() {
        return Ok(REFERENCE_ANGLE_SETS.iter().map(|a| a.to_vec()).collect());
    }

    cli.angles.iter().map(|set| parse_angle_set(set)).collect()
}

fn parse_angle_set(set: &str) -> Result<Vec<f64>> {
    if set.trim().is_empty() {
        bail!("empty angle set");
    }
    set.split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .with_context(|| format!("invalid angle {s:?} in {set:?}"))
        })
        .collect()
}

/// One result per set, in input order whether or not the sets run in parallel.
fn solve_all(
    solver: &ForwardKinematicsSolver,
    angle_sets: &[Vec<f64>],
    parallel: bool,
) -> Vec<arm_kinematics::Result<ChainPoses>> {
    if parallel {
        solver.solve_batch(angle_sets)
    } else {
        angle_sets.iter().map(|a| solver.solve(a)).collect()
    }
}

fn print_table(angles: &[f64], poses: &ChainPoses) {
    println!("angles {angles:?}");
    poses.present(&mut |role: LinkRole, pose: &HomogeneousTransform| {
        let p = pose.translation();
        println!(
            "  {:<14} ({:>10.6}, {:>10.6}, {:>10.6})",
            role.to_string(),
            p.x,
            p.y,
            p.z
        );
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use arm_kinematics::{DEFAULT_LINK_LENGTHS, KinematicsError};

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("arm-fk").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_reference_sets_and_geometry() {
        let cli = cli(&[]);
        assert_eq!(load_config(&cli).unwrap(), ChainConfig::default());
        assert_eq!(angle_sets(&cli).unwrap().len(), REFERENCE_ANGLE_SETS.len());
    }

    #[test]
    fn links_override_lengths() {
        let config = load_config(&cli(&["--links", "1,2,3,4"])).unwrap();
        assert_eq!(config.link_lengths, [1.0, 2.0, 3.0, 4.0]);
        assert_ne!(config.link_lengths, DEFAULT_LINK_LENGTHS);
    }

    #[test]
    fn links_with_wrong_count_are_rejected() {
        for links in ["1,2,3", "1,2,3,4,5"] {
            let err = load_config(&cli(&["--links", links])).unwrap_err();
            assert!(err.to_string().contains("expected 4 link lengths"), "{err}");
        }
    }

    #[test]
    fn non_numeric_links_fail_to_parse() {
        assert!(Cli::try_parse_from(["arm-fk", "--links", "1,two,3,4"]).is_err());
    }

    #[test]
    fn negative_links_reach_validation() {
        let config = load_config(&cli(&["--links", "1.8,-6,4,4"])).unwrap();
        assert_eq!(
            ForwardKinematicsSolver::four_joint_arm(config).unwrap_err(),
            KinematicsError::invalid_link_length(1, -6.0)
        );
    }

    #[test]
    fn angles_accept_negative_values() {
        let sets = angle_sets(&cli(&["--angles", "-10,20,-30,40", "--angles", "0,0,0,0"])).unwrap();
        assert_eq!(sets, vec![vec![-10.0, 20.0, -30.0, 40.0], vec![0.0; 4]]);
    }

    #[test]
    fn empty_angle_sets_are_rejected() {
        assert!(parse_angle_set("").is_err());
        assert!(parse_angle_set("   ").is_err());
    }

    #[test]
    fn malformed_angle_sets_are_rejected() {
        let err = parse_angle_set("1,x,3,4").unwrap_err();
        assert!(err.to_string().contains("\"x\""), "{err}");
        assert!(parse_angle_set("1,,3,4").is_err());
        assert!(parse_angle_set("1;2;3;4").is_err());
    }

    #[test]
    fn short_angle_sets_fail_at_solve() {
        let sets = angle_sets(&cli(&["--angles", "1,2,3"])).unwrap();
        let solver = ForwardKinematicsSolver::four_joint_arm(ChainConfig::default()).unwrap();
        let results = solve_all(&solver, &sets, false);
        assert_eq!(results[0], Err(KinematicsError::arity_mismatch(4, 3)));
    }

    #[test]
    fn infinite_angles_fail_at_solve() {
        let sets = vec![parse_angle_set("inf,0,0,0").unwrap()];
        let solver = ForwardKinematicsSolver::four_joint_arm(ChainConfig::default()).unwrap();
        assert!(matches!(
            solve_all(&solver, &sets, true)[0],
            Err(KinematicsError::NonFiniteAngle { index: 0, .. })
        ));
    }

    #[test]
    fn parallel_output_keeps_input_order() {
        let mut sets: Vec<Vec<f64>> = REFERENCE_ANGLE_SETS.iter().map(|a| a.to_vec()).collect();
        sets.extend((0..32).map(|i| vec![f64::from(i) * 7.0, -15.0, 10.0, -20.0]));
        let solver = ForwardKinematicsSolver::four_joint_arm(ChainConfig::default()).unwrap();

        let sequential = solve_all(&solver, &sets, false);
        let parallel = solve_all(&solver, &sets, true);
        assert_eq!(parallel, sequential);
        for (angles, result) in sets.iter().zip(&parallel) {
            assert_eq!(result.as_ref().unwrap(), &solver.solve(angles).unwrap());
        }
    }
}
