/// Print the effective configuration
///
/// Run with: cargo run -p unveil-config --example print_config

fn main() {
    let config = unveil_config::UnveilConfig::load();

    println!("=== Unveil Configuration ===\n");

    println!("Gate:");
    println!("  Delay: {} ms", config.gate.delay_ms);
    println!();

    println!("Reveal Defaults:");
    println!("  Delay: {} ms", config.reveal.delay_ms);
    println!("  Duration: {} ms", config.reveal.duration_ms);
    println!("  Stagger: {} ms", config.reveal.stagger_ms);
    println!("  Scroll Threshold: {}", config.reveal.scroll_threshold);
    println!();

    println!("Viewport: {} x {}", config.viewport.width, config.viewport.height);
    println!();

    println!("Form:");
    println!("  Endpoint: {}", config.form.endpoint);
    println!("  Support Email: {}", config.form.support_email);
    println!("  Confirmation: {} ms", config.form.confirmation_ms);
    println!("  Timeout: {} ms", config.form.timeout_ms);
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
