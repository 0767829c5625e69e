use colored::Colorize;
use std::io::Write;

/// Split a --profiles value into profile names.
pub fn parse_profiles(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Ask the operator for confirmation unless --yes was given.
pub fn confirm_action(message: &str, yes: bool) -> bool {
    if yes {
        return true;
    }

    print!("{} [y/N] ", message);
    if std::io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }

    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Print the resolved service list.
pub fn print_services(services: &[String]) {
    println!("{}", format!("services ({}):", services.len()).bold());
    for service in services {
        println!("  • {}", service.cyan());
    }
}
