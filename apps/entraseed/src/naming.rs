//! Name pools and payload builders for synthetic users and groups.
//!
//! Everything generated here is deliberately recognizable as test data:
//! group names carry the `TEST-{tag}-` prefix and users carry the run tag
//! in `employeeId`, so cleanup can find it all again.

use entraseed_graph::{NewGroup, NewUser, PasswordProfile};
use rand::Rng;

use crate::tag::RunTag;

/// Initial password for generated accounts; they are never signed into.
pub const TEST_PASSWORD: &str = "TempPassword123!";

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Christopher", "Nancy", "Daniel", "Lisa", "Matthew", "Betty", "Anthony",
    "Margaret", "Mark", "Sandra", "Donald", "Ashley", "Steven", "Kimberly", "Paul", "Emily",
    "Andrew", "Donna", "Joshua", "Michelle",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores",
];

const JOB_TITLES: &[&str] = &[
    "Software Engineer",
    "Product Manager",
    "Data Analyst",
    "HR Specialist",
    "Marketing Manager",
    "Sales Representative",
    "Financial Analyst",
    "Operations Manager",
    "Customer Success Manager",
    "DevOps Engineer",
];

const DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Product",
    "Data & Analytics",
    "Human Resources",
    "Marketing",
    "Sales",
    "Finance",
    "Operations",
    "Customer Success",
    "IT",
];

const OFFICE_LOCATIONS: &[&str] = &[
    "Building A",
    "Building B",
    "Building C",
    "Remote - US",
    "Remote - EU",
    "New York Office",
    "London Office",
    "Tokyo Office",
    "Sydney Office",
    "Toronto Office",
];

/// Department suffixes for top-level groups.
const GROUP_DEPARTMENTS: &[&str] = &[
    "Engineering",
    "Sales",
    "Marketing",
    "Finance",
    "HR",
    "Operations",
    "IT",
];

const ROLES: &[&str] = &[
    "Developers",
    "Managers",
    "Analysts",
    "Consultants",
    "Architects",
    "Administrators",
];

const REGIONS: &[&str] = &["EMEA", "APAC", "Americas", "North", "South"];

const SENIORITIES: &[&str] = &["Senior", "Junior", "Lead"];

const PROJECT_WORDS: &[&str] = &[
    "Alpha", "Beta", "Gamma", "Delta", "Omega", "Phoenix", "Falcon", "Eagle",
];

const GROUP_PHRASES: &[&str] = &[
    "synchronized scalable hierarchy",
    "distributed membership fan-out",
    "nested access simulation",
    "directory stress scenario",
    "profiled sync workload",
    "layered entitlement sample",
    "bulk provisioning exercise",
    "replicated org structure",
];

fn pick<'a>(rng: &mut impl Rng, items: &'a [&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// Builds the creation payload for one user.
///
/// `index` keeps mail nicknames unique within a run; the tag keeps them
/// unique across runs.
pub fn user_spec(index: usize, tag: &RunTag, domain: &str, rng: &mut impl Rng) -> NewUser {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let nickname = format!("u{}{:06}", tag, index);

    NewUser {
        account_enabled: true,
        display_name: format!("{first} {last}"),
        given_name: first.to_string(),
        surname: last.to_string(),
        user_principal_name: format!("{nickname}@{domain}"),
        mail_nickname: nickname,
        password_profile: PasswordProfile {
            password: TEST_PASSWORD.to_string(),
            force_change_password_next_sign_in: false,
        },
        job_title: pick(rng, JOB_TITLES).to_string(),
        department: pick(rng, DEPARTMENTS).to_string(),
        office_location: pick(rng, OFFICE_LOCATIONS).to_string(),
        employee_id: tag.as_str().to_string(),
    }
}

/// Builds the creation payload for a top-level group.
pub fn root_group_spec(index: usize, tag: &RunTag, rng: &mut impl Rng) -> NewGroup {
    let suffix = pick(rng, GROUP_DEPARTMENTS).to_string();
    group_spec(index, tag, &suffix, rng)
}

/// Builds the creation payload for a nested group.
pub fn child_group_spec(index: usize, tag: &RunTag, rng: &mut impl Rng) -> NewGroup {
    let suffix = match rng.gen_range(0..4) {
        0 => pick(rng, ROLES).to_string(),
        1 => format!("{} Team", pick(rng, REGIONS)),
        2 => format!("Project {}", pick(rng, PROJECT_WORDS)),
        _ => format!("{} {}", pick(rng, SENIORITIES), pick(rng, ROLES)),
    };
    group_spec(index, tag, &suffix, rng)
}

fn group_spec(index: usize, tag: &RunTag, suffix: &str, rng: &mut impl Rng) -> NewGroup {
    NewGroup {
        display_name: format!("TEST-{}-TestGroup{:04} {}", tag, index, suffix),
        mail_nickname: format!("g{}{:06}", tag, index),
        description: format!("Test group for load testing - {}", pick(rng, GROUP_PHRASES)),
        group_types: vec![],
        security_enabled: true,
        mail_enabled: false,
    }
}
