use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::config::Config;

pub fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if !config_path.exists() {
        Config::create_default_config(&config_path)?;
        println!("{} {}", "Created".green(), config_path.display());
    }

    let config = Config::load_from(&config_path)?;

    println!("{}", "Paths".bold());
    println!("  Config:       {}", config_path.display());
    println!();
    println!("{}", "Settings".bold());
    println!("  strict:       {}", config.policy.strict);
    println!(
        "  escalate:     {}",
        if config.policy.escalate.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            config
                .policy
                .escalate
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }
    );
    println!(
        "  minute_step:  {}",
        config
            .policy
            .minute_step
            .map(|s| s.to_string())
            .unwrap_or_else(|| "(off)".dimmed().to_string())
    );
    println!("  student:      {}", config.student());

    Ok(())
}
