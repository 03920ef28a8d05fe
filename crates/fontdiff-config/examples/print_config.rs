/// Print the effective fontdiff configuration.
///
/// Run with: cargo run -p fontdiff-config --example print_config [-- path/to/fontdiff.toml]

fn main() {
    let path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = match fontdiff_config::FontDiffConfig::load(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    println!("=== fontdiff configuration ===\n");

    println!("Page:");
    println!("  Size: {} x {}", config.page.width, config.page.height);
    println!("  Margin: {}", config.page.margin);
    println!();

    println!("Text:");
    println!("  Font Size: {}", config.text.font_size);
    println!("  Weight: {}", config.text.weight);
    println!("  Language: {:?}", config.text.language);
    println!("  Direction: {:?}", config.text.direction);
    println!();

    println!("Diff:");
    println!("  Oversample: {}", config.diff.oversample);
    println!("  Merge Threshold: {}", config.diff.merge_threshold);
    println!("  Removal Color: #{:06x}", config.diff.removal_color);
    println!();

    println!("Output:");
    println!("  Directory: {}", config.output.dir.display());
    println!("  Scale: {}", config.output.scale);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
