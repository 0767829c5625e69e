//! Profile resolution
//!
//! Turns a requested profile set into the concrete, ordered list of
//! services to act on. The resolved set is exactly the union of the
//! requested profiles' services; dependencies never pull in services
//! outside that union, they only order the services within it.

use crate::error::{ConfigError, Result};
use crate::model::Deployment;
use std::collections::HashSet;
use tracing::debug;

/// Resolve the service set for a profile request.
///
/// - An empty request falls back to `default_profiles`; if none are
///   configured either, resolution fails.
/// - Every requested profile must exist; all unknown names are
///   collected into a single error.
/// - The union keeps first-seen order, duplicates collapsed, then
///   `depends_on` edges within the set reorder it so dependencies
///   come first. Callers stopping services iterate in reverse.
pub fn resolve_services(deployment: &Deployment, requested: &[String]) -> Result<Vec<String>> {
    let profiles: &[String] = if requested.is_empty() {
        &deployment.default_profiles
    } else {
        requested
    };

    if profiles.is_empty() {
        return Err(ConfigError::NoProfilesSelected);
    }

    let unknown: Vec<String> = profiles
        .iter()
        .filter(|p| !deployment.profiles.contains_key(*p))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ConfigError::UnknownProfiles(unknown));
    }

    // Union with first-seen order.
    let mut union: Vec<String> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for profile in profiles {
        for service in &deployment.profiles[profile] {
            if seen.insert(service.as_str()) {
                union.push(service.clone());
            }
        }
    }

    debug!(profiles = ?profiles, services = ?union, "Resolved profile union");

    order_by_dependencies(deployment, union)
}

/// Reorder the resolved set so that every service comes after the
/// services it depends on. Dependencies outside the set are ignored.
fn order_by_dependencies(deployment: &Deployment, union: Vec<String>) -> Result<Vec<String>> {
    let in_set: HashSet<&str> = union.iter().map(String::as_str).collect();

    let mut ordered: Vec<String> = Vec::with_capacity(union.len());
    let mut done: HashSet<String> = HashSet::new();
    let mut visiting: Vec<String> = Vec::new();

    fn visit(
        name: &str,
        deployment: &Deployment,
        in_set: &HashSet<&str>,
        ordered: &mut Vec<String>,
        done: &mut HashSet<String>,
        visiting: &mut Vec<String>,
    ) -> Result<()> {
        if done.contains(name) {
            return Ok(());
        }
        if visiting.iter().any(|v| v == name) {
            let mut cycle: Vec<&str> = visiting.iter().map(String::as_str).collect();
            cycle.push(name);
            return Err(ConfigError::DependencyCycle(cycle.join(" -> ")));
        }

        visiting.push(name.to_string());
        if let Some(service) = deployment.services.get(name) {
            for dep in &service.depends_on {
                if in_set.contains(dep.as_str()) {
                    visit(dep, deployment, in_set, ordered, done, visiting)?;
                }
            }
        }
        visiting.pop();

        done.insert(name.to_string());
        ordered.push(name.to_string());
        Ok(())
    }

    for name in &union {
        visit(
            name,
            deployment,
            &in_set,
            &mut ordered,
            &mut done,
            &mut visiting,
        )?;
    }

    Ok(ordered)
}
