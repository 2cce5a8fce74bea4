//! Poisson-distributed user-to-group membership assignment.

use entraseed_graph::{Directory, DirectoryGroup, DirectoryUser, GraphError};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use tracing::{info, warn};

use crate::error::{CliError, CliResult};

/// Assigns each group a random sample of users, sized by a Poisson draw
/// around `avg_users_per_group`.
///
/// Users are drawn without replacement per group, so one user joins one
/// group at most once while still appearing across many groups. Individual
/// rejected additions are logged and skipped; credential failures abort
/// the run.
pub async fn assign_memberships(
    directory: &Directory,
    users: &[DirectoryUser],
    groups: &[DirectoryGroup],
    avg_users_per_group: f64,
    rng: &mut impl Rng,
) -> CliResult<usize> {
    if users.is_empty() || groups.is_empty() {
        warn!("No users or groups available, skipping membership assignment");
        return Ok(0);
    }

    let poisson = Poisson::new(avg_users_per_group)
        .map_err(|e| CliError::Validation(format!("invalid members-per-group average: {e}")))?;

    info!(
        "Assigning users to {} groups (average {} per group)",
        groups.len(),
        avg_users_per_group
    );

    let mut assigned = 0usize;
    for (i, group) in groups.iter().enumerate() {
        let drawn = poisson.sample(rng) as usize;
        let count = drawn.min(users.len());
        if count == 0 {
            continue;
        }

        for user in users.choose_multiple(rng, count) {
            match directory.add_member(&group.id, &user.id).await {
                Ok(()) => assigned += 1,
                Err(e @ GraphError::Auth(_)) => return Err(e.into()),
                Err(e) => warn!(
                    "Failed to add {} to {}: {}",
                    user.display_name, group.display_name, e
                ),
            }
        }

        if (i + 1) % 10 == 0 {
            info!("Assigned members to {}/{} groups", i + 1, groups.len());
        }
    }

    info!("Created {} memberships", assigned);
    Ok(assigned)
}
