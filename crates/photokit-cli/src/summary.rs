use std::path::Path;

use console::Style;
use photokit_core::config::ProjectConfig;
use photokit_core::frame::Position;
use photokit_core::pipeline::ReductionSummary;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn fmt_position(p: &Position) -> String {
    format!("({:.1}, {:.1})", p.x, p.y)
}

pub fn print_config_summary(config: &ProjectConfig, threads: usize) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Photokit Reduction"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(18)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Raw"),
        s.path.apply_to(config.paths.raw_dir.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Calibration"),
        s.path.apply_to(config.paths.calibration_dir.display())
    );
    if config.output.save_reduced_frames {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Reduced"),
            s.path.apply_to(config.paths.reduced_dir.display())
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Reduced"),
            s.disabled.apply_to("not saved")
        );
    }
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threads"),
        s.value.apply_to(threads)
    );
    println!();

    // Target
    let obs = &config.observation;
    println!("  {}", s.header.apply_to("Target"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Name"),
        s.value.apply_to(&obs.target_name)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Position"),
        s.value.apply_to(fmt_position(&obs.target_position))
    );
    if obs.comparison_positions.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Comparison"),
            s.disabled.apply_to("none (raw target flux)")
        );
    } else {
        let list: Vec<String> = obs.comparison_positions.iter().map(fmt_position).collect();
        println!(
            "    {:<12}{}",
            s.label.apply_to("Comparison"),
            s.value.apply_to(list.join(" "))
        );
    }
    println!();

    // Photometry
    let phot = &config.photometry;
    println!("  {}", s.header.apply_to("Photometry"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Aperture"),
        s.value.apply_to(format!("r = {}", phot.aperture_radius))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Annulus"),
        s.value
            .apply_to(format!("{} .. {}", phot.annulus_inner, phot.annulus_outer))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Time"),
        s.method.apply_to(config.analysis.time_unit)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Normalize"),
        if config.analysis.normalize_light_curve {
            s.method.apply_to("median")
        } else {
            s.disabled.apply_to("off")
        }
    );
    if !config.standard_stars.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Standards"),
            s.value.apply_to(format!(
                "{} star(s), filters {}",
                config.standard_stars.len(),
                obs.filters.join("/")
            ))
        );
    }
    println!();
}

pub fn print_run_summary(summary: &ReductionSummary) {
    let s = Styles::new();
    let print_path = |label: &str, path: Option<&Path>| match path {
        Some(p) => println!(
            "    {:<12}{}",
            s.label.apply_to(label),
            s.path.apply_to(p.display())
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to(label),
            s.disabled.apply_to("skipped")
        ),
    };

    println!();
    println!("  {}", s.header.apply_to("Results"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(format!(
            "{} bias, {} flat, {} science",
            summary.bias_frames, summary.flat_frames, summary.science_frames
        ))
    );
    print_path("Master bias", summary.master_bias.as_deref());
    print_path("Master flat", summary.master_flat.as_deref());
    println!(
        "    {:<12}{}",
        s.label.apply_to("Reduced"),
        s.value.apply_to(format!("{} written", summary.reduced_files.len()))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Light curve"),
        s.value.apply_to(format!("{} points", summary.light_curve.len()))
    );
    print_path("Saved to", summary.light_curve_file.as_deref());
    for zp in &summary.zero_points {
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("ZP {}", zp.filter)),
            s.value
                .apply_to(format!("{:.3} ({} stars)", zp.zero_point, zp.n_stars))
        );
    }
    if summary.calibration_file.is_some() {
        print_path("Calibration", summary.calibration_file.as_deref());
    }
    println!();
}
