//! `irbot check`: validate configuration and print what the gateway would
//! enforce.

use anyhow::Result;
use irbot_core::{GatewayConfig, Role};

pub fn run(config: &GatewayConfig) -> Result<()> {
    config.validate()?;

    println!("Configuration OK");
    println!();
    println!("Service: {} ({})", config.service.name, config.service.bind);
    println!("Audit log: {}", config.audit.log_path().display());
    println!(
        "Scripts: {} {} <script> <host> (from {}, max {} concurrent)",
        config.executor.interpreter,
        config.executor.interpreter_args.join(" "),
        config.executor.scripts_dir.display(),
        config.executor.max_concurrent_scripts
    );

    println!();
    println!("Roles (lowest first):");
    for role in Role::ALL {
        println!("  {}", role);
    }

    println!();
    println!("Users ({}):", config.users.len());
    for (user, role) in &config.users {
        println!("  {:<24} {}", user, role);
    }

    println!();
    let catalog = config.catalog();
    println!("Actions ({}):", catalog.len());
    for action in catalog.iter() {
        let gate = match (action.internal, action.min_role) {
            (true, _) => "internal".to_string(),
            (false, Some(role)) => format!(">= {}", role),
            (false, None) => "unreachable".to_string(),
        };
        println!("  {:<24} {:<12} {}", action.name, gate, action.script);
    }

    Ok(())
}
