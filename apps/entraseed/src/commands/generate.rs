//! The `generate` command: seed users, groups, and memberships.

use clap::Args;
use entraseed_graph::{Directory, DirectoryGroup, GraphError, NewGroup};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};
use tracing::{info, warn};

use crate::commands::ConnectionArgs;
use crate::error::{CliError, CliResult};
use crate::hierarchy::{clamp_branch, root_quota, Forest};
use crate::membership::assign_memberships;
use crate::naming::{child_group_spec, root_group_spec, user_spec};
use crate::output;
use crate::tag::RunTag;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Number of users to create.
    #[arg(long, default_value_t = 1000)]
    pub total_users: usize,

    /// Number of groups to create.
    #[arg(long, default_value_t = 100)]
    pub total_groups: usize,

    /// Average subgroups attached per eligible parent and growth pass.
    #[arg(long, default_value_t = 2.0)]
    pub avg_subgroups_per_group: f64,

    /// Average users assigned per group.
    #[arg(long, default_value_t = 10.0)]
    pub avg_users_per_group: f64,

    /// Deepest allowed nesting level; top-level groups sit at level 0.
    #[arg(long, default_value_t = 5)]
    pub max_depth: usize,

    /// Users per $batch request (1 to 20).
    #[arg(long, default_value_t = 20)]
    pub batch_size: usize,

    /// Skip user creation.
    #[arg(long)]
    pub skip_users: bool,

    /// Skip group creation.
    #[arg(long)]
    pub skip_groups: bool,

    /// Skip membership assignment.
    #[arg(long)]
    pub skip_memberships: bool,

    /// Reuse objects from an earlier run instead of creating new ones.
    #[arg(long)]
    pub use_existing_tag: Option<String>,
}

impl GenerateArgs {
    fn plan(&self) -> GenerationPlan {
        GenerationPlan {
            total_users: self.total_users,
            total_groups: self.total_groups,
            avg_subgroups_per_group: self.avg_subgroups_per_group,
            avg_users_per_group: self.avg_users_per_group,
            max_depth: self.max_depth,
            batch_size: self.batch_size,
            skip_users: self.skip_users,
            skip_groups: self.skip_groups,
            skip_memberships: self.skip_memberships,
        }
    }
}

/// What one generation run should produce.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub total_users: usize,
    pub total_groups: usize,
    pub avg_subgroups_per_group: f64,
    pub avg_users_per_group: f64,
    pub max_depth: usize,
    pub batch_size: usize,
    pub skip_users: bool,
    pub skip_groups: bool,
    pub skip_memberships: bool,
}

/// What one generation run actually produced.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub tag: String,
    pub users_created: usize,
    pub groups_created: usize,
    pub root_groups: usize,
    pub hierarchy_depth: usize,
    pub memberships_created: usize,
}

pub async fn execute(args: GenerateArgs) -> CliResult<()> {
    validate(&args)?;

    let tag = match &args.use_existing_tag {
        Some(existing) => RunTag::from_existing(existing.clone()),
        None => RunTag::generate(),
    };
    info!("Run tag: {}", tag);

    let directory = Directory::new(args.connection.to_graph_config())?;
    let mut rng = StdRng::from_entropy();

    let report = run(&directory, &tag, &args.plan(), &mut rng).await?;
    print_summary(&report);
    Ok(())
}

fn validate(args: &GenerateArgs) -> CliResult<()> {
    if args.batch_size == 0 || args.batch_size > 20 {
        return Err(CliError::Validation(
            "--batch-size must be between 1 and 20".to_string(),
        ));
    }
    if !args.avg_subgroups_per_group.is_finite() || args.avg_subgroups_per_group <= 0.0 {
        return Err(CliError::Validation(
            "--avg-subgroups-per-group must be positive".to_string(),
        ));
    }
    if !args.avg_users_per_group.is_finite() || args.avg_users_per_group <= 0.0 {
        return Err(CliError::Validation(
            "--avg-users-per-group must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Runs the three generation phases in order: users, groups, memberships.
///
/// Skipped creation phases fall back to looking up existing objects by
/// tag when a later phase still needs them.
pub async fn run(
    directory: &Directory,
    tag: &RunTag,
    plan: &GenerationPlan,
    rng: &mut impl Rng,
) -> CliResult<GenerationReport> {
    let mut report = GenerationReport {
        tag: tag.to_string(),
        ..GenerationReport::default()
    };

    let users = if !plan.skip_users {
        let domain = directory
            .config()
            .tenant_domain
            .as_deref()
            .ok_or_else(|| {
                CliError::Validation("--tenant-domain is required to create users".to_string())
            })?;

        info!("Creating {} users", plan.total_users);
        let mut specs = Vec::with_capacity(plan.total_users);
        for i in 1..=plan.total_users {
            specs.push(user_spec(i, tag, domain, rng));
        }

        let created = directory.create_users(&specs, plan.batch_size).await?;
        report.users_created = created.len();
        created
    } else if !plan.skip_memberships {
        info!("Looking up existing users tagged {}", tag);
        directory.find_users_by_tag(tag.as_str()).await?
    } else {
        Vec::new()
    };

    let groups = if !plan.skip_groups {
        let (created, forest) = build_group_hierarchy(directory, tag, plan, rng).await?;
        report.groups_created = created.len();
        report.root_groups = forest.root_count();
        report.hierarchy_depth = forest.max_observed_depth();
        created
    } else if !plan.skip_memberships {
        info!("Looking up existing groups with prefix {}", tag.group_prefix());
        directory
            .find_groups_by_name_prefix(&tag.group_prefix())
            .await?
    } else {
        Vec::new()
    };

    if !plan.skip_memberships {
        report.memberships_created =
            assign_memberships(directory, &users, &groups, plan.avg_users_per_group, rng).await?;
    }

    Ok(report)
}

/// Creates the group forest: a root phase for roughly 30% of the budget,
/// then growth passes that attach Poisson-sized child sets to every
/// parent still under the depth bound.
async fn build_group_hierarchy(
    directory: &Directory,
    tag: &RunTag,
    plan: &GenerationPlan,
    rng: &mut impl Rng,
) -> CliResult<(Vec<DirectoryGroup>, Forest)> {
    let mut groups = Vec::with_capacity(plan.total_groups);
    let mut forest = Forest::new();
    if plan.total_groups == 0 {
        return Ok((groups, forest));
    }

    let poisson = Poisson::new(plan.avg_subgroups_per_group)
        .map_err(|e| CliError::Validation(format!("invalid subgroup average: {e}")))?;

    let mut next_index = 1usize;

    let quota = root_quota(plan.total_groups).min(plan.total_groups);
    info!("Creating {} root groups", quota);
    for _ in 0..quota {
        if let Some(group) =
            try_create_group(directory, &root_group_spec(next_index, tag, rng)).await?
        {
            forest.record_root(group.id.clone());
            groups.push(group);
        }
        next_index += 1;
    }

    while groups.len() < plan.total_groups {
        let mut attempted_this_pass = 0usize;
        let mut created_this_pass = 0usize;

        let parents = forest.eligible_parents(plan.max_depth);
        if parents.is_empty() {
            // Everything sits at the depth bound; grow sideways instead.
            attempted_this_pass += 1;
            if let Some(group) =
                try_create_group(directory, &root_group_spec(next_index, tag, rng)).await?
            {
                forest.record_root(group.id.clone());
                groups.push(group);
                created_this_pass += 1;
            }
            next_index += 1;
        } else {
            for parent_id in parents {
                let remaining = plan.total_groups - groups.len();
                if remaining == 0 {
                    break;
                }

                let drawn = poisson.sample(rng) as usize;
                for _ in 0..clamp_branch(drawn, remaining) {
                    attempted_this_pass += 1;
                    if let Some(group) =
                        try_create_group(directory, &child_group_spec(next_index, tag, rng)).await?
                    {
                        forest.record_child(&parent_id, group.id.clone());
                        groups.push(group);
                        created_this_pass += 1;
                    }
                    next_index += 1;
                }
            }
        }

        if attempted_this_pass > 0 && created_this_pass == 0 {
            warn!(
                "No group creation succeeded this pass, stopping at {}/{} groups",
                groups.len(),
                plan.total_groups
            );
            break;
        }
        info!("Created {}/{} groups", groups.len(), plan.total_groups);
    }

    Ok((groups, forest))
}

/// Creates one group, swallowing per-item failures.
///
/// Credential failures are the exception: nothing later in the run could
/// succeed, so they abort.
async fn try_create_group(
    directory: &Directory,
    spec: &NewGroup,
) -> CliResult<Option<DirectoryGroup>> {
    match directory.create_group(spec).await {
        Ok(group) => Ok(Some(group)),
        Err(e @ GraphError::Auth(_)) => Err(e.into()),
        Err(e) => {
            warn!("Failed to create group {}: {}", spec.display_name, e);
            Ok(None)
        }
    }
}

fn print_summary(report: &GenerationReport) {
    output::print_header("TEST DATA GENERATION SUMMARY");
    output::print_key_value("Run tag", &report.tag);
    output::print_key_value("Users created", &report.users_created.to_string());
    output::print_key_value("Groups created", &report.groups_created.to_string());
    output::print_key_value("Root groups", &report.root_groups.to_string());
    output::print_key_value("Hierarchy depth", &report.hierarchy_depth.to_string());
    output::print_key_value(
        "Memberships created",
        &report.memberships_created.to_string(),
    );
    output::print_success("Generation finished");
    output::print_next_steps(&[format!(
        "Clean up when finished: entraseed cleanup --tag '{}' --tenant-id <tenant> \
         --client-id <client> --client-secret <secret> --confirm",
        report.tag
    )]);
}
