use super::with_output;
use flatpack::config::Settings;
use flatpack::error::Result;
use flatpack::git::GitRepo;
use flatpack::rules::RuleSet;
use flatpack::scope::collect;
use flatpack::writer::write_plan;
use std::path::Path;

/// Preview scope and redaction decisions without reading file bodies
pub fn plan(repo: &Path, output: Option<&Path>, include_untracked: Option<bool>) -> Result<()> {
    let repo = GitRepo::open(repo)?;
    let root = repo.root();

    let settings = Settings::resolve(root, include_untracked);
    let rules = RuleSet::load(root);
    let scope = collect(root, &repo, settings.include_untracked, &rules)?;

    with_output(output, |out| {
        write_plan(out, root, &scope, &rules, &settings)
    })
}
