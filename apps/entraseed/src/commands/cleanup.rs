//! The `cleanup` command: remove everything one run created.

use clap::Args;
use entraseed_graph::{Directory, DirectoryGroup, DirectoryUser, GraphError};
use tracing::{info, warn};

use crate::commands::ConnectionArgs;
use crate::error::CliResult;
use crate::output;
use crate::tag::RunTag;

/// Objects listed per category before the preview collapses to a count.
const PREVIEW_LIMIT: usize = 10;

#[derive(Debug, Args)]
pub struct CleanupArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Run tag whose objects should be removed.
    #[arg(long)]
    pub tag: String,

    /// Actually delete; without this flag the command only previews.
    #[arg(long)]
    pub confirm: bool,

    /// Only remove users.
    #[arg(long)]
    pub users_only: bool,

    /// Only remove groups.
    #[arg(long, conflicts_with = "users_only")]
    pub groups_only: bool,
}

/// What one cleanup run found and removed.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub tag: String,
    pub dry_run: bool,
    pub users_found: usize,
    pub groups_found: usize,
    pub users_deleted: usize,
    pub groups_deleted: usize,
    pub users_failed: usize,
    pub groups_failed: usize,
}

pub async fn execute(args: CleanupArgs) -> CliResult<()> {
    let directory = Directory::new(args.connection.to_graph_config())?;
    let report = run(&directory, &args).await?;

    if !report.dry_run {
        output::print_header("CLEANUP SUMMARY");
        output::print_key_value("Run tag", &report.tag);
        output::print_key_value(
            "Users deleted",
            &format!("{}/{}", report.users_deleted, report.users_found),
        );
        output::print_key_value(
            "Groups deleted",
            &format!("{}/{}", report.groups_deleted, report.groups_found),
        );

        let failed = report.users_failed + report.groups_failed;
        if failed > 0 {
            output::print_warning(&format!("{failed} deletions failed; re-run cleanup to retry"));
        } else {
            output::print_success("Cleanup finished");
        }
    }
    Ok(())
}

/// Finds the tagged objects and, when confirmed, deletes them one by one.
///
/// Users are removed before groups. A deletion Graph rejects is counted
/// and skipped; only credential failures abort.
pub async fn run(directory: &Directory, args: &CleanupArgs) -> CliResult<CleanupReport> {
    let tag = RunTag::from_existing(args.tag.clone());
    let mut report = CleanupReport {
        tag: tag.to_string(),
        dry_run: !args.confirm,
        ..CleanupReport::default()
    };

    let users = if args.groups_only {
        Vec::new()
    } else {
        info!("Looking up users tagged {}", tag);
        directory.find_users_by_tag(tag.as_str()).await?
    };
    let groups = if args.users_only {
        Vec::new()
    } else {
        info!("Looking up groups with prefix {}", tag.group_prefix());
        directory
            .find_groups_by_name_prefix(&tag.group_prefix())
            .await?
    };
    report.users_found = users.len();
    report.groups_found = groups.len();

    if report.dry_run {
        preview(&users, &groups);
        return Ok(report);
    }

    for (i, user) in users.iter().enumerate() {
        match directory.delete_user(&user.id).await {
            Ok(()) => report.users_deleted += 1,
            Err(e @ GraphError::Auth(_)) => return Err(e.into()),
            Err(e) => {
                report.users_failed += 1;
                warn!("Failed to delete user {}: {}", user.user_principal_name, e);
            }
        }
        if (i + 1) % 20 == 0 {
            info!("Processed {}/{} users", i + 1, users.len());
        }
    }

    for (i, group) in groups.iter().enumerate() {
        match directory.delete_group(&group.id).await {
            Ok(()) => report.groups_deleted += 1,
            Err(e @ GraphError::Auth(_)) => return Err(e.into()),
            Err(e) => {
                report.groups_failed += 1;
                warn!("Failed to delete group {}: {}", group.display_name, e);
            }
        }
        if (i + 1) % 20 == 0 {
            info!("Processed {}/{} groups", i + 1, groups.len());
        }
    }

    Ok(report)
}

fn preview(users: &[DirectoryUser], groups: &[DirectoryGroup]) {
    output::print_warning("Dry run: nothing will be deleted");

    println!("\nUsers that would be deleted: {}", users.len());
    for user in users.iter().take(PREVIEW_LIMIT) {
        println!("  - {} ({})", user.display_name, user.user_principal_name);
    }
    if users.len() > PREVIEW_LIMIT {
        println!("  ... and {} more", users.len() - PREVIEW_LIMIT);
    }

    println!("\nGroups that would be deleted: {}", groups.len());
    for group in groups.iter().take(PREVIEW_LIMIT) {
        println!("  - {}", group.display_name);
    }
    if groups.len() > PREVIEW_LIMIT {
        println!("  ... and {} more", groups.len() - PREVIEW_LIMIT);
    }

    output::print_info("Re-run with --confirm to delete these objects.");
}
