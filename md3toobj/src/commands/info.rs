//! Model information display

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use q3_md3::{Md3Model, validate};

use crate::utils::{add_table_row, create_table};

pub fn execute(paths: &[PathBuf]) -> Result<ExitCode> {
    let mut status = ExitCode::SUCCESS;

    for path in paths {
        if let Err(e) = handle_info(path) {
            eprintln!("Error: {e:#}");
            status = ExitCode::FAILURE;
        }
    }

    Ok(status)
}

fn handle_info(path: &Path) -> Result<()> {
    println!("Loading MD3 model: {}", path.display());

    let model = Md3Model::load(path)
        .with_context(|| format!("Failed to load MD3 model from {}", path.display()))?;
    let header = &model.header;

    println!("\n=== MD3 Model Information ===");
    println!("Name: {}", model.name());
    println!("Version: {}", header.version);
    println!("Flags: {:#x}", header.flags);
    println!(
        "Frames: {}, Tags: {}, Surfaces: {}, Skins: {}",
        header.num_frames, header.num_tags, header.num_surfaces, header.num_skins
    );
    println!(
        "Vertices per frame: {}, Triangles: {}",
        model.total_vertices(),
        model.total_triangles()
    );

    if !model.frames.is_empty() {
        println!("\n=== Frames ===");
        let mut table = create_table(&["#", "Name", "Radius", "Origin", "Min", "Max"]);
        for (index, frame) in model.frames.iter().enumerate() {
            add_table_row(
                &mut table,
                vec![
                    index.to_string(),
                    frame.name.clone(),
                    format!("{:.2}", frame.radius),
                    format_vec(frame.local_origin.to_array()),
                    format_vec(frame.min_bounds.to_array()),
                    format_vec(frame.max_bounds.to_array()),
                ],
            );
        }
        table.printstd();
    }

    println!("\n=== Surfaces ===");
    let mut table = create_table(&["#", "Name", "Frames", "Vertices", "Triangles", "Shaders"]);
    for (index, surface) in model.surfaces.iter().enumerate() {
        let shaders: Vec<&str> = surface.shaders.iter().map(|s| s.name.as_str()).collect();
        add_table_row(
            &mut table,
            vec![
                index.to_string(),
                surface.name().to_string(),
                surface.header.num_frames.to_string(),
                surface.num_verts().to_string(),
                surface.triangles.len().to_string(),
                shaders.join(", "),
            ],
        );
    }
    table.printstd();

    if let Some(tags) = &model.tags {
        println!("\n=== Tags (frame 0) ===");
        let mut table = create_table(&["Name", "Origin", "Axis X", "Axis Y", "Axis Z"]);
        for tag in tags {
            add_table_row(
                &mut table,
                vec![
                    tag.name.clone(),
                    format_vec(tag.origin.to_array()),
                    format_vec(tag.axis[0].to_array()),
                    format_vec(tag.axis[1].to_array()),
                    format_vec(tag.axis[2].to_array()),
                ],
            );
        }
        table.printstd();
    }

    let issues = validate(&model);
    if issues.is_empty() {
        println!("\nNo validation issues found.");
    } else {
        println!("\n=== Validation Issues ===");
        for issue in &issues {
            println!("  - {issue}");
        }
    }

    Ok(())
}

fn format_vec(v: [f32; 3]) -> String {
    format!("({:.2}, {:.2}, {:.2})", v[0], v[1], v[2])
}
