//! CLI utility for floor plan navigation meshes, routes and model alignment

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use glam::Vec3;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use wayfind_align::{CameraPose, HeadingSample, PoseRegistrar};
use wayfind_common::rad_to_deg;
use wayfind_mesh::{BuildContext, FloorPlan, NavMesh, NavMeshBuilder, NavMeshConfig};
use wayfind_query::{PathPlanner, PathProvider};
use wayfind_session::to_directives;

/// A CLI utility for building walkable meshes from floor plans and planning routes
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a navigation mesh from a floor plan
    Build {
        /// Floor plan file (JSON)
        #[clap(long, value_parser)]
        plan: PathBuf,

        /// Output navigation mesh file (JSON)
        #[clap(long, value_parser)]
        output: Option<PathBuf>,

        /// Distance under which room corners are merged
        #[clap(long, default_value = "0.001")]
        weld_tolerance: f32,

        /// Height of the walkable floor
        #[clap(long, default_value = "0.0")]
        floor_height: f32,

        /// Do not split room edges at corners of neighbouring rooms
        #[clap(long)]
        no_split: bool,
    },

    /// List the destination rooms of a floor plan
    Rooms {
        /// Floor plan file (JSON)
        #[clap(long, value_parser)]
        plan: PathBuf,
    },

    /// Find a route between two rooms or positions
    FindPath {
        /// Floor plan file (JSON)
        #[clap(long, value_parser)]
        plan: PathBuf,

        /// Prebuilt navigation mesh file (JSON); built from the plan when omitted
        #[clap(long, value_parser)]
        mesh: Option<PathBuf>,

        /// Start room name or position (x,y,z); the reference start room when omitted
        #[clap(long)]
        from: Option<String>,

        /// Destination room name or position (x,y,z)
        #[clap(long)]
        to: String,

        /// Output path file
        #[clap(long, value_parser)]
        output: Option<PathBuf>,
    },

    /// Align the model to a heading and camera pose
    Align {
        /// Floor plan file (JSON)
        #[clap(long, value_parser)]
        plan: PathBuf,

        /// Compass heading in degrees
        #[clap(long, allow_hyphen_values = true)]
        heading: f32,

        /// Camera position (x,y,z)
        #[clap(long, value_parser = parse_vector, allow_hyphen_values = true)]
        camera: Vec3,

        /// Camera forward direction (x,y,z)
        #[clap(long, value_parser = parse_vector, default_value = "0,0,1", allow_hyphen_values = true)]
        forward: Vec3,
    },
}

/// Parse a comma-separated vector
fn parse_vector(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').collect();

    if parts.len() != 3 {
        return Err(format!(
            "Vector must have 3 components, got {}",
            parts.len()
        ));
    }

    let x = parts[0].trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = parts[1].trim().parse::<f32>().map_err(|e| e.to_string())?;
    let z = parts[2].trim().parse::<f32>().map_err(|e| e.to_string())?;

    Ok(Vec3::new(x, y, z))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Build {
            plan,
            output,
            weld_tolerance,
            floor_height,
            no_split,
        } => {
            let config = NavMeshConfig::new()
                .with_weld_tolerance(weld_tolerance)
                .with_floor_height(floor_height)
                .with_split_collinear_edges(!no_split);
            let plan = load_plan(&plan)?;
            build_mesh(&plan, output.as_deref(), config).map(|_| ())
        }
        Commands::Rooms { plan } => list_rooms(&plan),
        Commands::FindPath {
            plan,
            mesh,
            from,
            to,
            output,
        } => find_path(
            &plan,
            mesh.as_deref(),
            from.as_deref(),
            &to,
            output.as_deref(),
        ),
        Commands::Align {
            plan,
            heading,
            camera,
            forward,
        } => align(&plan, heading, CameraPose::new(camera, forward)),
    }
}

fn load_plan(path: &Path) -> Result<FloorPlan> {
    println!("Loading floor plan from {}...", path.display());
    let plan = FloorPlan::load_from_json(path)
        .with_context(|| format!("Failed to load floor plan: {}", path.display()))?;
    println!(
        "Floor plan loaded: {} rooms, {} walls",
        plan.rooms.len(),
        plan.walls.len()
    );
    Ok(plan)
}

/// Build a navigation mesh from a floor plan
fn build_mesh(plan: &FloorPlan, output: Option<&Path>, config: NavMeshConfig) -> Result<NavMesh> {
    println!("Building navigation mesh...");
    let mut ctx = BuildContext::new();
    let nav_mesh = NavMeshBuilder::new(config)
        .build(plan, &mut ctx)
        .context("Failed to build navigation mesh")?;
    ctx.log_timer_summary();

    println!(
        "Navigation mesh built: {} vertices, {} triangles, {} groups",
        nav_mesh.verts().len(),
        nav_mesh.face_count(),
        nav_mesh.group_count()
    );

    if let Some(output) = output {
        println!("Saving navigation mesh to {}...", output.display());
        nav_mesh
            .save_to_json(output)
            .with_context(|| format!("Failed to save navigation mesh: {}", output.display()))?;
        println!("Saved navigation mesh as JSON");
    }

    Ok(nav_mesh)
}

/// List the destination rooms of a floor plan
fn list_rooms(plan_path: &Path) -> Result<()> {
    let plan = load_plan(plan_path)?;
    let start = plan.start_room().map(|r| r.name.as_str());

    println!("Destinations:");
    for (i, room) in plan.rooms.iter().enumerate() {
        let center = room.center(0.0);
        let marker = if Some(room.name.as_str()) == start {
            " (start)"
        } else {
            ""
        };
        println!(
            "{}: {} at {},{}{}",
            i,
            room.display_name(),
            center.x,
            center.z,
            marker
        );
    }

    Ok(())
}

/// Resolves a room name, display name or `x,y,z` position
fn resolve_point(plan: &FloorPlan, value: &str, floor_height: f32) -> Result<Vec3> {
    if let Ok(point) = parse_vector(value) {
        return Ok(point);
    }

    plan.rooms
        .iter()
        .find(|room| room.name == value || room.display_name() == value)
        .map(|room| room.center(floor_height))
        .ok_or_else(|| anyhow!("Unknown room or position: {:?}", value))
}

/// Find a route between two rooms or positions
fn find_path(
    plan_path: &Path,
    mesh_path: Option<&Path>,
    from: Option<&str>,
    to: &str,
    output: Option<&Path>,
) -> Result<()> {
    let plan = load_plan(plan_path)?;
    let nav_mesh = match mesh_path {
        Some(mesh_path) => {
            println!("Loading navigation mesh from {}...", mesh_path.display());
            NavMesh::load_from_json(mesh_path).with_context(|| {
                format!("Failed to load navigation mesh: {}", mesh_path.display())
            })?
        }
        None => build_mesh(&plan, None, NavMeshConfig::default())?,
    };
    let floor_height = nav_mesh.verts().first().map_or(0.0, |v| v.y);

    let start = match from {
        Some(from) => resolve_point(&plan, from, floor_height)?,
        None => plan
            .start_point(floor_height)
            .ok_or_else(|| anyhow!("Floor plan has no start room"))?,
    };
    let end = resolve_point(&plan, to, floor_height)?;

    println!("Finding path from {:?} to {:?}...", start, end);

    let planner = PathPlanner::new(nav_mesh);
    let path = planner
        .find_path(start, end)
        .map_err(|e| anyhow!("Failed to find path: {}", e))?;
    let directives = to_directives(&path);

    println!(
        "Found path with {} waypoints, {} segments, length {:.2}",
        path.len(),
        directives.len(),
        directives.iter().map(|s| s.length).sum::<f32>()
    );

    if let Some(output_path) = output {
        println!("Saving path to {}...", output_path.display());

        let mut file = File::create(output_path)
            .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;

        writeln!(file, "# Path from {:?} to {:?}", start, end)?;
        writeln!(file, "# {} waypoints", path.len())?;

        for waypoint in &path {
            writeln!(file, "{},{},{}", waypoint.x, waypoint.y, waypoint.z)?;
        }
    } else {
        println!("Path:");
        for (i, waypoint) in path.iter().enumerate() {
            println!("{}: {},{},{}", i, waypoint.x, waypoint.y, waypoint.z);
        }
        println!("Directives:");
        for (i, segment) in directives.iter().enumerate() {
            println!(
                "{}: {:.2} along {:.3},{:.3},{:.3}",
                i, segment.length, segment.direction.x, segment.direction.y, segment.direction.z
            );
        }
    }

    Ok(())
}

/// Align the model to a heading and camera pose
fn align(plan_path: &Path, heading: f32, camera: CameraPose) -> Result<()> {
    let plan = load_plan(plan_path)?;
    let heading =
        HeadingSample::new(heading).ok_or_else(|| anyhow!("Heading must be a finite number"))?;
    let model_start = plan
        .start_point(0.0)
        .ok_or_else(|| anyhow!("Floor plan has no start room"))?;

    let mut registrar = PoseRegistrar::new(model_start, plan.forward_direction());
    registrar.on_heading(heading);
    if !registrar.recalibrate(&camera).is_aligned() {
        return Err(anyhow!("Recalibration did not produce a transform"));
    }

    let transform = *registrar.transform();
    let user = registrar.track(&camera);

    println!("Heading: {:.1} deg", heading.degrees());
    println!(
        "Rotation: {:.4} rad ({:.1} deg)",
        transform.rotation_y,
        rad_to_deg(transform.rotation_y)
    );
    println!(
        "Translation: {},{},{}",
        transform.translation.x, transform.translation.y, transform.translation.z
    );
    println!("User position: {},{},{}", user.x, user.y, user.z);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_mesh::test_plan_helpers::create_demo_plan;

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("1,2.5,-3"), Ok(Vec3::new(1.0, 2.5, -3.0)));
        assert_eq!(parse_vector(" 1, 2, 3"), Ok(Vec3::new(1.0, 2.0, 3.0)));
        assert!(parse_vector("1,2").is_err());
        assert!(parse_vector("a,b,c").is_err());
    }

    #[test]
    fn test_resolve_point() {
        let plan = create_demo_plan();

        let lobby = resolve_point(&plan, "ENTRANCE LOBBY", 0.0).unwrap();
        assert_eq!(lobby, Vec3::new(5.0, 0.0, 4.0));
        let lab = resolve_point(&plan, "LAB 1", 1.0).unwrap();
        assert_eq!(lab, Vec3::new(18.0, 1.0, 10.0));
        let point = resolve_point(&plan, "3,0,4", 0.0).unwrap();
        assert_eq!(point, Vec3::new(3.0, 0.0, 4.0));
        assert!(resolve_point(&plan, "ROOF", 0.0).is_err());
    }

    #[test]
    fn test_bundled_demo_plan() {
        let plan = FloorPlan::from_json_str(include_str!("../../../data/demo_floor_plan.json"))
            .unwrap();
        assert_eq!(plan, create_demo_plan());
    }
}
