use super::with_output;
use flatpack::config::Settings;
use flatpack::error::Result;
use flatpack::git::GitRepo;
use flatpack::rules::RuleSet;
use flatpack::scope::collect;
use flatpack::writer::write_dump;
use std::path::Path;

/// Flatten the repository containing `repo` into one text stream
pub fn dump(repo: &Path, output: Option<&Path>, include_untracked: Option<bool>) -> Result<()> {
    let repo = GitRepo::open(repo)?;
    let root = repo.root();

    let settings = Settings::resolve(root, include_untracked);
    let rules = RuleSet::load(root);
    let scope = collect(root, &repo, settings.include_untracked, &rules)?;

    with_output(output, |out| {
        write_dump(out, root, &scope, &rules, &settings)
    })?;

    if let Some(path) = output {
        eprintln!("Wrote {} from repo root: {}", path.display(), root.display());
    }

    Ok(())
}
