//! The `tags` command: list leftover run tags in the tenant.

use std::collections::BTreeMap;

use clap::Args;
use entraseed_graph::Directory;

use crate::commands::ConnectionArgs;
use crate::error::CliResult;
use crate::output;
use crate::tag::{parse_group_display_name, TAG_MARKER};

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// How much of one run is still in the tenant.
#[derive(Debug, Default)]
pub struct TagCounts {
    pub users: usize,
    pub groups: usize,
}

pub async fn execute(args: TagsArgs) -> CliResult<()> {
    let directory = Directory::new(args.connection.to_graph_config())?;
    let summary = scan(&directory).await?;

    if summary.is_empty() {
        println!("No leftover test data found.");
        return Ok(());
    }

    println!("Leftover run tags:\n");
    for (tag, counts) in &summary {
        println!("  {}: {} users, {} groups", tag, counts.users, counts.groups);
    }
    output::print_info("Remove a run with: entraseed cleanup --tag <tag> --confirm");
    Ok(())
}

/// Scans all tagged users and groups and buckets them per run tag.
///
/// Counts come from the two listings alone; no per-tag queries are made.
pub async fn scan(directory: &Directory) -> CliResult<BTreeMap<String, TagCounts>> {
    let mut summary: BTreeMap<String, TagCounts> = BTreeMap::new();

    for user in directory.find_users_by_tag_prefix(TAG_MARKER).await? {
        if let Some(tag) = user.employee_id {
            summary.entry(tag).or_default().users += 1;
        }
    }

    let group_prefix = format!("TEST-{TAG_MARKER}");
    for group in directory.find_groups_by_name_prefix(&group_prefix).await? {
        if let Some(tag) = parse_group_display_name(&group.display_name) {
            summary.entry(tag).or_default().groups += 1;
        }
    }

    Ok(summary)
}
