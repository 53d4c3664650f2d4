//! Checks on the reporting structure of the senior posts.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::error::Error;
use std::fmt::Display;

use log::{debug, info};

use crate::model::*;
use crate::posts::*;

/// Maximum number of steps from a post up to the top post.
pub const MAX_DEPTH: usize = 100;

/// Problems that leave nothing to display.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum GraphError {
    /// No post reports to `XX`.
    NoTopPost,
}

impl Error for GraphError {}

impl Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::NoTopPost => write!(
                f,
                "Could not find a senior post with \"Reports to Senior Post\" value of \"XX\" (i.e. the top role)"
            ),
        }
    }
}

/// Failure to reach the top from one post.
#[derive(Eq, PartialEq, Debug, Clone)]
enum WalkError {
    /// The path came back to a post already on it.
    Loop(Vec<String>),
    TooDeep(Vec<String>),
    /// `path` leads to `missing`, which is not a senior post.
    Unknown { path: Vec<String>, missing: String },
}

/// The reporting structure, keyed by post reference.
struct Hierarchy<'a> {
    reports_to: HashMap<&'a str, &'a str>,
    top_refs: HashSet<&'a str>,
    /// Top post reached from each post already walked.
    top_by_ref: HashMap<&'a str, &'a str>,
}

impl<'a> Hierarchy<'a> {
    fn new(posts: &[&'a SeniorPost]) -> Hierarchy<'a> {
        let mut reports_to: HashMap<&'a str, &'a str> = HashMap::new();
        let mut top_refs: HashSet<&'a str> = HashSet::new();
        for post in posts.iter() {
            // With repeated references, the last row wins.
            reports_to.insert(post.post_ref.as_str(), post.reports_to.as_str());
            if post.is_top() {
                top_refs.insert(post.post_ref.as_str());
            }
        }
        Hierarchy {
            reports_to,
            top_refs,
            top_by_ref: HashMap::new(),
        }
    }

    /// Follows the reporting lines from `start` until a top post.
    fn walk(&mut self, start: &'a str) -> Result<&'a str, WalkError> {
        let mut path: Vec<&'a str> = Vec::new();
        let mut current = start;
        let top = loop {
            path.push(current);
            if self.top_refs.contains(current) {
                break current;
            }
            if path[..path.len() - 1].contains(&current) {
                return Err(WalkError::Loop(owned(&path)));
            }
            if path.len() > MAX_DEPTH {
                return Err(WalkError::TooDeep(owned(&path)));
            }
            if let Some(top) = self.top_by_ref.get(current) {
                break *top;
            }
            match self.reports_to.get(current) {
                Some(boss) => current = *boss,
                None => {
                    return Err(WalkError::Unknown {
                        path: owned(&path[..path.len() - 1]),
                        missing: current.to_string(),
                    })
                }
            }
        };
        for r in path.iter() {
            self.top_by_ref.insert(*r, top);
        }
        Ok(top)
    }

    /// The known references, numbers first and in numeric order.
    fn known_refs(&self) -> String {
        let mut numbers: Vec<i64> = Vec::new();
        let mut others: Vec<&str> = Vec::new();
        for r in self.reports_to.keys() {
            match r.parse::<i64>() {
                Ok(n) => numbers.push(n),
                Err(_) => others.push(*r),
            }
        }
        numbers.sort_unstable();
        others.sort_unstable();
        let items: Vec<String> = numbers
            .iter()
            .map(|n| n.to_string())
            .chain(others.iter().map(|s| format!("'{}'", s)))
            .collect();
        format!("[{}]", items.join(", "))
    }
}

fn owned(path: &[&str]) -> Vec<String> {
    path.iter().map(|s| s.to_string()).collect()
}

/// Drops the job-share duplicates: rows identical in every column that a
/// job share has in common. The first row of each group is kept.
fn collapse_job_shares<'a>(posts: &[&'a SeniorPost]) -> Vec<&'a SeniorPost> {
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    posts
        .iter()
        .filter(|p| seen.insert(shared_values(p)))
        .cloned()
        .collect()
}

fn shared_columns() -> impl Iterator<Item = SeniorColumn> {
    SeniorColumn::ALL
        .into_iter()
        .filter(|c| !c.may_differ_in_job_share())
}

fn shared_values(post: &SeniorPost) -> Vec<String> {
    shared_columns().map(|c| post.value(c)).collect()
}

/// Rows that share a reference but could not be merged as a job share.
fn job_share_errors(posts: &[&SeniorPost]) -> Vec<Diagnostic> {
    let mut by_ref: Vec<(&str, Vec<&SeniorPost>)> = Vec::new();
    for post in posts.iter() {
        let r = post.post_ref.as_str();
        if is_top_marker(r) || is_not_in_post_marker(r) {
            continue;
        }
        match by_ref.iter_mut().find(|(k, _)| *k == r) {
            Some((_, group)) => group.push(*post),
            None => by_ref.push((r, vec![*post])),
        }
    }

    let mut errors: Vec<Diagnostic> = Vec::new();
    for (r, group) in by_ref.iter().filter(|(_, g)| g.len() > 1) {
        for (i, first) in group.iter().enumerate() {
            for second in group[i + 1..].iter() {
                let different: Vec<SeniorColumn> = shared_columns()
                    .filter(|c| first.value(*c) != second.value(*c))
                    .collect();
                if let Some(col) = different.first() {
                    let col_name = column_name(col.index());
                    let titles: Vec<String> = different
                        .iter()
                        .map(|c| format!("\"{}\"", c.title()))
                        .collect();
                    errors.push(Diagnostic::with_cell(
                        format!(
                            "Sheet \"{}\" - cells {}{} and {}{} should have the same value. \"Post Unique Reference\" value \"{}\" appears in multiple rows, indicating a job share. It is required for job share rows to have identical values in particular columns and that is not the case in this sheet. Rows {} and {} should not have different values for {}.",
                            SENIOR_SHEET_NAME,
                            col_name,
                            first.row,
                            col_name,
                            second.row,
                            r,
                            first.row,
                            second.row,
                            titles.join(", ")
                        ),
                        first.cell(*col),
                    ));
                }
            }
        }
    }
    errors
}

/// Verifies the reporting structure of an organogram.
///
/// Every senior post must lead, through its "Reports to Senior Post" value,
/// to a top post (one reporting to `XX`), and every junior post must report
/// to an existing senior post. Eliminated posts are ignored, job-share rows
/// are merged.
///
/// Returns the problems found, or an error if there is no top post at all.
pub fn verify_graph(
    senior: &[SeniorPost],
    junior: &[JuniorPost],
) -> Result<Vec<Diagnostic>, GraphError> {
    let mut errors: Vec<Diagnostic> = Vec::new();

    let current: Vec<&SeniorPost> = senior.iter().filter(|p| !p.is_eliminated()).collect();
    let posts = collapse_job_shares(&current);
    debug!(
        "verify_graph: {} senior rows, {} after eliminations and job shares",
        senior.len(),
        posts.len()
    );

    errors.extend(job_share_errors(&posts));

    if !posts.iter().any(|p| p.is_top()) {
        info!("verify_graph: no top post");
        return Err(GraphError::NoTopPost);
    }

    let senior_post_refs: HashSet<&str> = posts.iter().map(|p| p.post_ref.as_str()).collect();
    let unknown_bosses: BTreeSet<&str> = posts
        .iter()
        .map(|p| p.reports_to.as_str())
        .filter(|r| !senior_post_refs.contains(r) && !is_top_marker(r))
        .collect();
    for r in unknown_bosses {
        errors.push(Diagnostic::new(format!(
            "Senior post reporting to unknown senior post \"{}\"",
            r
        )));
    }

    let mut self_reporting: HashSet<&str> = HashSet::new();
    for post in posts.iter() {
        if post.post_ref == post.reports_to {
            errors.push(Diagnostic::in_cell(
                SENIOR_SHEET_NAME,
                post.cell(SeniorColumn::ReportsTo),
                &format!(
                    "Senior post reports to him/herself. ref:\"{}\"",
                    post.post_ref
                ),
            ));
            self_reporting.insert(post.post_ref.as_str());
        }
    }

    let mut hierarchy = Hierarchy::new(&posts);
    for post in posts.iter() {
        let r = post.post_ref.as_str();
        match hierarchy.walk(r) {
            Ok(top) if !hierarchy.top_refs.contains(top) => {
                errors.push(Diagnostic::new(format!(
                    "Reporting from Senior post {} \"{}\" up to the top results in \"{}\" rather than \"XX\"",
                    post.row, r, top
                )));
            }
            Ok(_) => {}
            Err(WalkError::TooDeep(path)) => {
                errors.push(Diagnostic::new(format!(
                    "Could not follow the reporting structure from Senior post {} \"{}\" up to the top in {} steps - is there a loop? Posts: {}",
                    post.row,
                    r,
                    MAX_DEPTH,
                    path.join(" ")
                )));
            }
            Err(WalkError::Loop(path)) => {
                // Already reported as a self-report.
                let last = path.last().map(|s| s.as_str()).unwrap_or_default();
                if !self_reporting.contains(last) {
                    errors.push(Diagnostic::new(format!(
                        "Reporting structure from Senior post {} \"{}\" ended up in a loop: {}",
                        post.row,
                        r,
                        path.join(" ")
                    )));
                }
            }
            Err(WalkError::Unknown { path, missing }) => {
                let mut msg = format!(
                    "Post reports to unknown post ref:\"{}\". Known post refs:\"{}\"",
                    missing,
                    hierarchy.known_refs()
                );
                for via in path.iter().rev() {
                    msg = format!("Error with senior post \"{}\": {}", via, msg);
                }
                errors.push(Diagnostic::new(msg));
            }
        }
    }

    let eliminated: HashSet<&str> = senior
        .iter()
        .filter(|p| p.is_eliminated())
        .map(|p| p.post_ref.as_str())
        .collect();
    let bad_junior_refs: BTreeSet<&str> = junior
        .iter()
        .map(|j| j.reporting_senior_post.as_str())
        .filter(|r| !senior_post_refs.contains(r))
        .collect();
    for r in bad_junior_refs {
        let kind = if eliminated.contains(r) {
            "Eliminated"
        } else {
            "unknown"
        };
        errors.push(Diagnostic::new(format!(
            "Junior post reporting to {} senior post \"{}\"",
            kind, r
        )));
    }

    info!("verify_graph: {} errors", errors.len());
    Ok(errors)
}
